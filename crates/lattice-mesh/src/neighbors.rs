//! Cross-chunk occupancy lookups for face culling.
//!
//! A chunk's boundary faces depend on the adjacent cell in one of its four
//! edge-adjacent neighbors. Cells that cannot be resolved (the neighbor chunk is
//! not loaded, or the position is above or below the world's vertical range)
//! count as solid, so faces toward them are suppressed until real data arrives.
//! The same rule applies to all six directions.

use lattice_voxel::{BlockGrid, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH, ChunkCoord};

/// One of the four horizontal sides of a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NeighborSide {
    PosX,
    NegX,
    PosZ,
    NegZ,
}

impl NeighborSide {
    pub const ALL: [NeighborSide; 4] = [Self::PosX, Self::NegX, Self::PosZ, Self::NegZ];

    /// Coordinate of the neighbor on this side of `center`.
    pub fn of(self, center: ChunkCoord) -> ChunkCoord {
        match self {
            Self::PosX => center.offset(1, 0),
            Self::NegX => center.offset(-1, 0),
            Self::PosZ => center.offset(0, 1),
            Self::NegZ => center.offset(0, -1),
        }
    }
}

/// Borrowed grids of up to four edge-adjacent neighbors.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChunkNeighbors<'a> {
    pub pos_x: Option<&'a BlockGrid>,
    pub neg_x: Option<&'a BlockGrid>,
    pub pos_z: Option<&'a BlockGrid>,
    pub neg_z: Option<&'a BlockGrid>,
}

impl<'a> ChunkNeighbors<'a> {
    /// No neighbors resolved.
    pub fn none() -> Self {
        Self::default()
    }

    /// Sets the neighbor on `side`.
    pub fn with(mut self, side: NeighborSide, grid: &'a BlockGrid) -> Self {
        *self.slot_mut(side) = Some(grid);
        self
    }

    pub fn get(&self, side: NeighborSide) -> Option<&'a BlockGrid> {
        match side {
            NeighborSide::PosX => self.pos_x,
            NeighborSide::NegX => self.neg_x,
            NeighborSide::PosZ => self.pos_z,
            NeighborSide::NegZ => self.neg_z,
        }
    }

    /// Number of resolved neighbors.
    pub fn resolved(&self) -> usize {
        NeighborSide::ALL
            .iter()
            .filter(|side| self.get(**side).is_some())
            .count()
    }

    /// Returns `true` if the signed cell position, relative to `center`, is
    /// occupied or unresolvable.
    pub fn is_occupied(&self, center: &BlockGrid, x: i32, y: i32, z: i32) -> bool {
        if y < 0 || y >= CHUNK_HEIGHT as i32 {
            return true;
        }

        let (w, d) = (CHUNK_WIDTH as i32, CHUNK_DEPTH as i32);
        let side = if x < 0 {
            Some(NeighborSide::NegX)
        } else if x >= w {
            Some(NeighborSide::PosX)
        } else if z < 0 {
            Some(NeighborSide::NegZ)
        } else if z >= d {
            Some(NeighborSide::PosZ)
        } else {
            None
        };

        match side {
            None => center.is_solid_signed(x, y, z),
            Some(side) => match self.get(side) {
                Some(grid) => grid.is_solid_signed(x.rem_euclid(w), y, z.rem_euclid(d)),
                None => true,
            },
        }
    }

    fn slot_mut(&mut self, side: NeighborSide) -> &mut Option<&'a BlockGrid> {
        match side {
            NeighborSide::PosX => &mut self.pos_x,
            NeighborSide::NegX => &mut self.neg_x,
            NeighborSide::PosZ => &mut self.pos_z,
            NeighborSide::NegZ => &mut self.neg_z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_voxel::{Block, BlockKind, VoxelCoord};

    #[test]
    fn test_vertical_out_of_range_is_occupied() {
        let center = BlockGrid::new();
        let n = ChunkNeighbors::none();
        assert!(n.is_occupied(&center, 0, -1, 0));
        assert!(n.is_occupied(&center, 0, 64, 0));
        assert!(!n.is_occupied(&center, 0, 10, 0));
    }

    #[test]
    fn test_missing_neighbor_is_occupied() {
        let center = BlockGrid::new();
        let n = ChunkNeighbors::none();
        assert!(n.is_occupied(&center, -1, 5, 5));
        assert!(n.is_occupied(&center, 16, 5, 5));
        assert!(n.is_occupied(&center, 5, 5, -1));
        assert!(n.is_occupied(&center, 5, 5, 16));
    }

    #[test]
    fn test_resolved_neighbor_maps_to_its_edge() {
        let center = BlockGrid::new();
        let mut east = BlockGrid::new();
        east.set(VoxelCoord::new(0, 7, 3).unwrap(), Some(Block::new(BlockKind::Stone)));
        let west = BlockGrid::new();

        let n = ChunkNeighbors::none()
            .with(NeighborSide::PosX, &east)
            .with(NeighborSide::NegX, &west);
        assert_eq!(n.resolved(), 2);

        assert!(n.is_occupied(&center, 16, 7, 3));
        assert!(!n.is_occupied(&center, 16, 7, 4));
        assert!(!n.is_occupied(&center, -1, 7, 3));
    }

    #[test]
    fn test_side_of_matches_coord_neighbors() {
        let c = ChunkCoord::new(4, -2);
        let sides: Vec<_> = NeighborSide::ALL.iter().map(|s| s.of(c)).collect();
        assert_eq!(sides, c.neighbors().to_vec());
    }
}
