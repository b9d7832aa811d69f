//! Chunk meshing: neighbor-aware face culling into vertex/index buffers.

pub mod builder;
pub mod chunk_mesh;
pub mod face_direction;
pub mod neighbors;

pub use builder::ChunkMeshBuilder;
pub use chunk_mesh::{ChunkMesh, FaceInfo, MeshVertex};
pub use face_direction::{FaceDirection, FaceSet};
pub use neighbors::{ChunkNeighbors, NeighborSide};
