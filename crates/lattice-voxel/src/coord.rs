//! Chunk-grid and chunk-local voxel coordinates.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::grid::{CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_VOLUME, CHUNK_WIDTH};

/// World-space edge length of one block when a chunk spans `chunk_size` units.
pub fn block_size(chunk_size: f32) -> f32 {
    chunk_size / CHUNK_WIDTH as f32
}

/// Identifies a chunk column on the horizontal chunk grid.
///
/// Chunks span the full world height, so only `x` and `z` are needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// Chunk-grid X coordinate.
    pub x: i32,
    /// Chunk-grid Z coordinate.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns the chunk containing the world-space position.
    ///
    /// Uses floor division so negative positions map to negative chunks
    /// (`-0.5` lands in chunk `-1`, not `0`).
    pub fn from_world(position: Vec3, chunk_size: f32) -> Self {
        Self {
            x: (position.x / chunk_size).floor() as i32,
            z: (position.z / chunk_size).floor() as i32,
        }
    }

    /// Returns the coordinate offset by `(dx, dz)` chunks.
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// The four edge-adjacent neighbors, in `+X, -X, +Z, -Z` order.
    pub const fn neighbors(self) -> [ChunkCoord; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }

    /// World-space position of the chunk's minimum corner (at `y = 0`).
    pub fn world_origin(self, chunk_size: f32) -> Vec3 {
        Vec3::new(self.x as f32 * chunk_size, 0.0, self.z as f32 * chunk_size)
    }

    /// World-space center of the chunk's footprint (at `y = 0`).
    pub fn world_center(self, chunk_size: f32) -> Vec3 {
        self.world_origin(chunk_size) + Vec3::new(chunk_size * 0.5, 0.0, chunk_size * 0.5)
    }

    /// Cache and scene key for this chunk, unique per `(x, z)`.
    pub fn cache_key(self) -> String {
        format!("Chunk_{}_{}", self.x, self.z)
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// A cell position local to a chunk, bounded to `[0,16) x [0,64) x [0,16)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoxelCoord {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

impl VoxelCoord {
    /// Creates a coordinate, returning `None` if any axis is out of range.
    pub fn new(x: u8, y: u8, z: u8) -> Option<Self> {
        Self::in_bounds(x as i32, y as i32, z as i32).then_some(Self { x, y, z })
    }

    /// Returns `true` if the signed position lies inside a chunk.
    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_WIDTH as i32).contains(&x)
            && (0..CHUNK_HEIGHT as i32).contains(&y)
            && (0..CHUNK_DEPTH as i32).contains(&z)
    }

    /// Converts a linear cell index back to a coordinate (x varies fastest).
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= CHUNK_VOLUME {
            return None;
        }
        let x = index % CHUNK_WIDTH;
        let y = (index / CHUNK_WIDTH) % CHUNK_HEIGHT;
        let z = index / (CHUNK_WIDTH * CHUNK_HEIGHT);
        Some(Self {
            x: x as u8,
            y: y as u8,
            z: z as u8,
        })
    }

    /// Linear cell index: `x + y * 16 + z * 16 * 64`.
    pub fn index(self) -> usize {
        self.x as usize
            + self.y as usize * CHUNK_WIDTH
            + self.z as usize * CHUNK_WIDTH * CHUNK_HEIGHT
    }

    /// World-space center of this cell inside the given chunk.
    pub fn world_center(self, chunk: ChunkCoord, chunk_size: f32) -> Vec3 {
        let cell = Vec3::new(self.x as f32, self.y as f32, self.z as f32);
        chunk.world_origin(chunk_size) + (cell + 0.5) * block_size(chunk_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_world_floors_negative_positions() {
        assert_eq!(
            ChunkCoord::from_world(Vec3::new(-0.5, 10.0, 0.5), 16.0),
            ChunkCoord::new(-1, 0)
        );
        assert_eq!(
            ChunkCoord::from_world(Vec3::new(16.0, 0.0, 31.9), 16.0),
            ChunkCoord::new(1, 1)
        );
    }

    #[test]
    fn test_cache_key_format() {
        assert_eq!(ChunkCoord::new(3, -7).cache_key(), "Chunk_3_-7");
        assert_ne!(
            ChunkCoord::new(1, 11).cache_key(),
            ChunkCoord::new(11, 1).cache_key()
        );
    }

    #[test]
    fn test_neighbors_are_edge_adjacent() {
        let c = ChunkCoord::new(2, 2);
        for n in c.neighbors() {
            assert_eq!((n.x - c.x).abs() + (n.z - c.z).abs(), 1);
        }
    }

    #[test]
    fn test_block_centers_scale_with_chunk_size() {
        let last = VoxelCoord::new(15, 0, 0).unwrap();
        let center = last.world_center(ChunkCoord::new(1, 0), 32.0);
        assert_eq!(center, Vec3::new(63.0, 1.0, 1.0));

        let first = VoxelCoord::new(0, 63, 0).unwrap();
        let center = first.world_center(ChunkCoord::new(-1, 0), 8.0);
        assert_eq!(center, Vec3::new(-7.75, 31.75, 0.25));

        let center = last.world_center(ChunkCoord::new(0, 0), 16.0);
        assert_eq!(center, Vec3::new(15.5, 0.5, 0.5));
    }

    #[test]
    fn test_index_is_x_fastest() {
        let a = VoxelCoord::new(1, 0, 0).unwrap();
        let b = VoxelCoord::new(0, 1, 0).unwrap();
        let c = VoxelCoord::new(0, 0, 1).unwrap();
        assert_eq!(a.index(), 1);
        assert_eq!(b.index(), CHUNK_WIDTH);
        assert_eq!(c.index(), CHUNK_WIDTH * CHUNK_HEIGHT);
    }

    #[test]
    fn test_index_roundtrip_at_extremes() {
        let last = VoxelCoord::from_index(CHUNK_VOLUME - 1).unwrap();
        assert_eq!((last.x, last.y, last.z), (15, 63, 15));
        assert_eq!(last.index(), CHUNK_VOLUME - 1);
        assert!(VoxelCoord::from_index(CHUNK_VOLUME).is_none());
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(VoxelCoord::new(16, 0, 0).is_none());
        assert!(VoxelCoord::new(0, 64, 0).is_none());
        assert!(VoxelCoord::new(15, 63, 15).is_some());
    }
}
