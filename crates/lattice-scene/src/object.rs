//! Scene objects and their drawables.

use glam::{Quat, Vec3};

use lattice_voxel::{ChunkCoord, ChunkId, block_size};

/// Identity of an object inside a [`crate::Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectId {
    /// The game object of a streamed chunk.
    Chunk(ChunkId),
    /// Anything else placed in the scene.
    Entity(u64),
}

impl From<ChunkId> for ObjectId {
    fn from(id: ChunkId) -> Self {
        Self::Chunk(id)
    }
}

/// What an object is. Dispatch on this with `match`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    Chunk { coord: ChunkCoord },
    Observer,
    Prop,
}

impl ObjectKind {
    pub fn is_chunk(&self) -> bool {
        matches!(self, Self::Chunk { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Chunk { .. } => "chunk",
            Self::Observer => "observer",
            Self::Prop => "prop",
        }
    }
}

/// Renderable attachment: a transform plus the cache keys of its model and texture.
#[derive(Clone, Debug, PartialEq)]
pub struct Drawable {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub model_key: String,
    pub texture_key: String,
}

impl Drawable {
    /// An unrotated, unit-scale drawable at `position`.
    pub fn at(position: Vec3, model_key: impl Into<String>, texture_key: impl Into<String>) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            model_key: model_key.into(),
            texture_key: texture_key.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub drawable: Option<Drawable>,
}

impl SceneObject {
    /// The game object for a chunk, drawn at its world origin with the model
    /// cached under the chunk's cache key. Meshes are in block units, so the
    /// drawable is scaled by the world size of one block.
    pub fn chunk(
        id: ChunkId,
        coord: ChunkCoord,
        chunk_size: f32,
        texture_key: impl Into<String>,
    ) -> Self {
        let mut drawable =
            Drawable::at(coord.world_origin(chunk_size), coord.cache_key(), texture_key);
        drawable.scale = Vec3::splat(block_size(chunk_size));
        Self {
            id: id.into(),
            kind: ObjectKind::Chunk { coord },
            drawable: Some(drawable),
        }
    }
}
