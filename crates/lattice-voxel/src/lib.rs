//! Voxel storage for streamed terrain: chunk coordinates, blocks, dense block grids, and the
//! chunk lifecycle state machine shared by generation, meshing, and the streaming scheduler.

pub mod block;
pub mod chunk;
pub mod coord;
pub mod grid;

pub use block::{ATLAS_TILES, Block, BlockKind, ColliderId};
pub use chunk::{Chunk, ChunkId, ChunkIdAllocator, ChunkState, StepAccess, StepStatus};
pub use coord::{ChunkCoord, VoxelCoord, block_size};
pub use grid::{BlockGrid, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_VOLUME, CHUNK_WIDTH};
