//! Model creation from chunk meshes, and the caches that hold the results.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use lattice_mesh::ChunkMesh;

use crate::cache::Cache;

/// Errors that can occur while turning a mesh into a model.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("mesh has {vertices} vertices, limit is {limit}")]
    MeshTooLarge { vertices: usize, limit: usize },

    #[error("index buffer length {0} is not a multiple of 3")]
    MalformedIndices(usize),

    #[error("model backend unavailable: {0}")]
    Unavailable(String),
}

/// Handle to an uploaded model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModelHandle {
    pub id: u64,
    pub vertex_count: usize,
    pub index_count: usize,
}

/// Handle to a loaded texture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureHandle {
    pub id: u64,
    pub name: String,
}

/// Turns a finished chunk mesh into something the renderer can draw.
pub trait ModelFactory: Send + Sync {
    fn create_model(&self, mesh: &ChunkMesh) -> Result<ModelHandle, RenderError>;
}

/// [`ModelFactory`] that validates meshes and issues handles without a GPU.
#[derive(Debug)]
pub struct HeadlessModelFactory {
    next_id: AtomicU64,
    max_vertices: usize,
}

impl HeadlessModelFactory {
    pub fn new() -> Self {
        Self::with_vertex_limit(usize::MAX)
    }

    /// Rejects meshes with more than `max_vertices` vertices.
    pub fn with_vertex_limit(max_vertices: usize) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            max_vertices,
        }
    }

    /// Number of models created so far.
    pub fn created(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed) - 1
    }
}

impl Default for HeadlessModelFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelFactory for HeadlessModelFactory {
    fn create_model(&self, mesh: &ChunkMesh) -> Result<ModelHandle, RenderError> {
        if mesh.vertices.len() > self.max_vertices {
            return Err(RenderError::MeshTooLarge {
                vertices: mesh.vertices.len(),
                limit: self.max_vertices,
            });
        }
        if mesh.indices.len() % 3 != 0 {
            return Err(RenderError::MalformedIndices(mesh.indices.len()));
        }
        Ok(ModelHandle {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            vertex_count: mesh.vertices.len(),
            index_count: mesh.indices.len(),
        })
    }
}

/// Everything the streaming workers need to publish a chunk's model.
pub struct RenderResources {
    pub factory: Arc<dyn ModelFactory>,
    pub models: Cache<ModelHandle>,
    pub textures: Cache<TextureHandle>,
    /// Texture every chunk drawable refers to.
    pub texture_key: String,
}

impl RenderResources {
    /// Bundles `factory` with empty caches and registers `texture_key`.
    pub fn new(factory: Arc<dyn ModelFactory>, texture_key: impl Into<String>) -> Self {
        let texture_key = texture_key.into();
        let textures = Cache::new();
        textures.insert(
            texture_key.clone(),
            TextureHandle {
                id: 0,
                name: texture_key.clone(),
            },
        );
        Self {
            factory,
            models: Cache::new(),
            textures,
            texture_key,
        }
    }

    /// Headless factory with the given texture key.
    pub fn headless(texture_key: impl Into<String>) -> Self {
        Self::new(Arc::new(HeadlessModelFactory::new()), texture_key)
    }
}
