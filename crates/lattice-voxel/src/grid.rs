//! Dense block storage for a 16×64×16 chunk.
//!
//! Every cell holds an `Option<Block>`; `None` is air. Cells are laid out
//! linearly with x varying fastest, then y, then z (see [`VoxelCoord::index`]).

use crate::block::{Block, BlockKind};
use crate::coord::VoxelCoord;

/// Chunk extent along X, in cells.
pub const CHUNK_WIDTH: usize = 16;
/// Chunk extent along Y (world height), in cells.
pub const CHUNK_HEIGHT: usize = 64;
/// Chunk extent along Z, in cells.
pub const CHUNK_DEPTH: usize = 16;
/// Total number of cells in a chunk (16 × 64 × 16).
pub const CHUNK_VOLUME: usize = CHUNK_WIDTH * CHUNK_HEIGHT * CHUNK_DEPTH;

/// Dense per-chunk voxel storage.
#[derive(Clone, Debug)]
pub struct BlockGrid {
    cells: Vec<Option<Block>>,
    solid: usize,
}

impl BlockGrid {
    /// Creates a grid with every cell set to air.
    pub fn new() -> Self {
        Self {
            cells: vec![None; CHUNK_VOLUME],
            solid: 0,
        }
    }

    /// Creates a grid with every cell set to a block of `kind`.
    pub fn filled(kind: BlockKind) -> Self {
        Self {
            cells: vec![Some(Block::new(kind)); CHUNK_VOLUME],
            solid: CHUNK_VOLUME,
        }
    }

    /// Returns the block at `at`, or `None` for air.
    pub fn get(&self, at: VoxelCoord) -> Option<&Block> {
        self.cells[at.index()].as_ref()
    }

    /// Signed lookup. Positions outside the chunk read as air with a warning.
    pub fn get_signed(&self, x: i32, y: i32, z: i32) -> Option<&Block> {
        if !VoxelCoord::in_bounds(x, y, z) {
            tracing::warn!("BlockGrid::get out of bounds: ({}, {}, {})", x, y, z);
            return None;
        }
        self.cells[Self::signed_index(x, y, z)].as_ref()
    }

    /// Returns `true` if the cell holds a block.
    pub fn is_solid(&self, at: VoxelCoord) -> bool {
        self.cells[at.index()].is_some()
    }

    /// Signed solidity test for positions already known to be in bounds.
    ///
    /// Out-of-range positions report `false` without logging; callers deciding
    /// cross-chunk visibility resolve those through a neighbor instead.
    pub fn is_solid_signed(&self, x: i32, y: i32, z: i32) -> bool {
        VoxelCoord::in_bounds(x, y, z) && self.cells[Self::signed_index(x, y, z)].is_some()
    }

    /// Writes a cell and returns the previous contents.
    pub fn set(&mut self, at: VoxelCoord, block: Option<Block>) -> Option<Block> {
        let slot = &mut self.cells[at.index()];
        let previous = std::mem::replace(slot, block);
        match (previous.is_some(), slot.is_some()) {
            (false, true) => self.solid += 1,
            (true, false) => self.solid -= 1,
            _ => {}
        }
        previous
    }

    /// Clears a cell to air and returns what was there.
    pub fn take(&mut self, at: VoxelCoord) -> Option<Block> {
        self.set(at, None)
    }

    /// Mutable access to a block in place (for attaching side resources).
    pub fn get_mut(&mut self, at: VoxelCoord) -> Option<&mut Block> {
        self.cells[at.index()].as_mut()
    }

    /// Number of non-air cells.
    pub fn solid_count(&self) -> usize {
        self.solid
    }

    /// Returns `true` if every cell is air.
    pub fn is_empty(&self) -> bool {
        self.solid == 0
    }

    /// Iterates over all solid cells with their coordinates.
    pub fn iter_solid(&self) -> impl Iterator<Item = (VoxelCoord, &Block)> {
        self.cells.iter().enumerate().filter_map(|(i, cell)| {
            let block = cell.as_ref()?;
            VoxelCoord::from_index(i).map(|at| (at, block))
        })
    }

    fn signed_index(x: i32, y: i32, z: i32) -> usize {
        x as usize + y as usize * CHUNK_WIDTH + z as usize * CHUNK_WIDTH * CHUNK_HEIGHT
    }
}

impl Default for BlockGrid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::ColliderId;

    fn at(x: u8, y: u8, z: u8) -> VoxelCoord {
        VoxelCoord::new(x, y, z).unwrap()
    }

    #[test]
    fn test_new_grid_is_all_air() {
        let grid = BlockGrid::new();
        assert!(grid.is_empty());
        assert!(grid.get(at(0, 0, 0)).is_none());
        assert!(grid.get(at(15, 63, 15)).is_none());
    }

    #[test]
    fn test_set_then_get_roundtrip() {
        let mut grid = BlockGrid::new();
        grid.set(at(5, 40, 9), Some(Block::new(BlockKind::Stone)));
        assert_eq!(grid.get(at(5, 40, 9)).map(|b| b.kind), Some(BlockKind::Stone));
        assert!(!grid.is_solid(at(4, 40, 9)));
        assert!(!grid.is_solid(at(5, 41, 9)));
        assert_eq!(grid.solid_count(), 1);
    }

    #[test]
    fn test_solid_count_tracks_overwrites_and_takes() {
        let mut grid = BlockGrid::new();
        grid.set(at(1, 1, 1), Some(Block::new(BlockKind::Dirt)));
        grid.set(at(1, 1, 1), Some(Block::new(BlockKind::Grass)));
        assert_eq!(grid.solid_count(), 1);

        let taken = grid.take(at(1, 1, 1));
        assert_eq!(taken.map(|b| b.kind), Some(BlockKind::Grass));
        assert_eq!(grid.solid_count(), 0);

        // Taking air is a no-op.
        assert!(grid.take(at(1, 1, 1)).is_none());
        assert_eq!(grid.solid_count(), 0);
    }

    #[test]
    fn test_get_signed_out_of_bounds_reads_air() {
        let grid = BlockGrid::filled(BlockKind::Stone);
        assert!(grid.get_signed(-1, 0, 0).is_none());
        assert!(grid.get_signed(0, 64, 0).is_none());
        assert!(grid.get_signed(0, 0, 16).is_none());
        assert!(grid.get_signed(0, 0, 0).is_some());
    }

    #[test]
    fn test_filled_grid_counts_every_cell() {
        let grid = BlockGrid::filled(BlockKind::Bedrock);
        assert_eq!(grid.solid_count(), CHUNK_VOLUME);
        assert_eq!(grid.iter_solid().count(), CHUNK_VOLUME);
    }

    #[test]
    fn test_get_mut_attaches_collider() {
        let mut grid = BlockGrid::new();
        grid.set(at(2, 3, 4), Some(Block::new(BlockKind::Sand)));
        if let Some(block) = grid.get_mut(at(2, 3, 4)) {
            block.collider = Some(ColliderId(77));
        }
        assert_eq!(
            grid.get(at(2, 3, 4)).and_then(|b| b.collider),
            Some(ColliderId(77))
        );
    }
}
