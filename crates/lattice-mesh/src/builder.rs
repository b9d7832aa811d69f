//! Face-culled chunk meshing.
//!
//! For each solid block, a face is emitted iff the adjacent cell is empty. The
//! adjacent cell may live in this chunk or, across a horizontal boundary, in one
//! of the four neighbors; see [`ChunkNeighbors::is_occupied`] for how unresolved
//! cells are treated.

use lattice_voxel::{BlockGrid, VoxelCoord};

use crate::chunk_mesh::ChunkMesh;
use crate::face_direction::{FaceDirection, FaceSet};
use crate::neighbors::ChunkNeighbors;

/// Builds culled meshes for chunks. Rebuilding is always safe; the output
/// depends only on the grids passed in.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChunkMeshBuilder;

impl ChunkMeshBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Returns the visible faces of the block at `at` (none for air).
    pub fn visible_faces(
        &self,
        center: &BlockGrid,
        neighbors: &ChunkNeighbors<'_>,
        at: VoxelCoord,
    ) -> FaceSet {
        if !center.is_solid(at) {
            return FaceSet::EMPTY;
        }
        FaceDirection::ALL
            .into_iter()
            .filter(|dir| {
                let [x, y, z] = dir.neighbor_cell(at);
                !neighbors.is_occupied(center, x, y, z)
            })
            .collect()
    }

    /// Emits one quad per visible block face.
    pub fn build(&self, center: &BlockGrid, neighbors: &ChunkNeighbors<'_>) -> ChunkMesh {
        let mut mesh = ChunkMesh::new();
        for (at, block) in center.iter_solid() {
            for dir in self.visible_faces(center, neighbors, at).iter() {
                mesh.push_face(at, dir, block.kind);
            }
        }
        tracing::trace!(
            "meshed {} solid blocks into {} faces ({} neighbors resolved)",
            center.solid_count(),
            mesh.face_count(),
            neighbors.resolved()
        );
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighbors::NeighborSide;
    use lattice_voxel::{Block, BlockKind};

    fn at(x: u8, y: u8, z: u8) -> VoxelCoord {
        VoxelCoord::new(x, y, z).unwrap()
    }

    fn single(x: u8, y: u8, z: u8) -> BlockGrid {
        let mut grid = BlockGrid::new();
        grid.set(at(x, y, z), Some(Block::new(BlockKind::Stone)));
        grid
    }

    #[test]
    fn test_empty_chunk_has_no_faces() {
        let mesh = ChunkMeshBuilder::new().build(&BlockGrid::new(), &ChunkNeighbors::none());
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_all_solid_with_solid_neighbors_has_no_vertices() {
        let center = BlockGrid::filled(BlockKind::Stone);
        let solid = BlockGrid::filled(BlockKind::Stone);
        let neighbors = NeighborSide::ALL
            .iter()
            .fold(ChunkNeighbors::none(), |n, side| n.with(*side, &solid));

        let mesh = ChunkMeshBuilder::new().build(&center, &neighbors);
        assert_eq!(mesh.vertices.len(), 0);
        assert_eq!(mesh.indices.len(), 0);
    }

    #[test]
    fn test_single_block_with_absent_neighbors() {
        let grid = single(8, 32, 8);
        let mesh = ChunkMeshBuilder::new().build(&grid, &ChunkNeighbors::none());
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
    }

    #[test]
    fn test_single_block_with_empty_neighbors() {
        let grid = single(8, 32, 8);
        let air = BlockGrid::new();
        let neighbors = NeighborSide::ALL
            .iter()
            .fold(ChunkNeighbors::none(), |n, side| n.with(*side, &air));
        let mesh = ChunkMeshBuilder::new().build(&grid, &neighbors);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
    }

    #[test]
    fn test_boundary_face_suppressed_when_neighbor_absent() {
        let grid = single(0, 10, 5);
        let mesh = ChunkMeshBuilder::new().build(&grid, &ChunkNeighbors::none());
        assert_eq!(mesh.count_faces_for_direction(FaceDirection::NegX), 0);
        assert_eq!(mesh.face_count(), 5);
    }

    #[test]
    fn test_boundary_face_visible_when_neighbor_cell_empty() {
        let grid = single(0, 10, 5);
        let air = BlockGrid::new();
        let neighbors = ChunkNeighbors::none().with(NeighborSide::NegX, &air);
        let mesh = ChunkMeshBuilder::new().build(&grid, &neighbors);
        assert_eq!(mesh.count_faces_for_direction(FaceDirection::NegX), 1);
        assert_eq!(mesh.face_count(), 6);
    }

    #[test]
    fn test_boundary_face_culled_by_solid_neighbor_cell() {
        let grid = single(15, 10, 5);
        let east = single(0, 10, 5);
        let neighbors = ChunkNeighbors::none().with(NeighborSide::PosX, &east);
        let mesh = ChunkMeshBuilder::new().build(&grid, &neighbors);
        assert_eq!(mesh.count_faces_for_direction(FaceDirection::PosX), 0);
    }

    #[test]
    fn test_z_boundary_uses_same_policy_as_x() {
        let grid = single(5, 10, 15);
        let mesh = ChunkMeshBuilder::new().build(&grid, &ChunkNeighbors::none());
        assert_eq!(mesh.count_faces_for_direction(FaceDirection::PosZ), 0);

        let air = BlockGrid::new();
        let neighbors = ChunkNeighbors::none().with(NeighborSide::PosZ, &air);
        let mesh = ChunkMeshBuilder::new().build(&grid, &neighbors);
        assert_eq!(mesh.count_faces_for_direction(FaceDirection::PosZ), 1);
    }

    #[test]
    fn test_vertical_extremes_are_suppressed() {
        let mut grid = single(4, 0, 4);
        grid.set(at(4, 63, 4), Some(Block::new(BlockKind::Snow)));
        let mesh = ChunkMeshBuilder::new().build(&grid, &ChunkNeighbors::none());
        assert_eq!(mesh.count_faces_for_direction(FaceDirection::NegY), 0);
        // The top block's upward face and the bottom block's downward face are both hidden.
        assert_eq!(mesh.face_count(), 10);
    }

    #[test]
    fn test_adjacent_blocks_share_no_face() {
        let mut grid = single(4, 4, 4);
        grid.set(at(5, 4, 4), Some(Block::new(BlockKind::Stone)));
        let mesh = ChunkMeshBuilder::new().build(&grid, &ChunkNeighbors::none());
        assert_eq!(mesh.face_count(), 10);
    }

    #[test]
    fn test_rebuild_yields_same_face_set() {
        let mut grid = BlockGrid::new();
        for x in 0..16u8 {
            for z in 0..16u8 {
                let h = 3 + (x as usize * 7 + z as usize * 3) % 9;
                for y in 0..h as u8 {
                    grid.set(at(x, y, z), Some(Block::new(BlockKind::Dirt)));
                }
            }
        }
        let air = BlockGrid::new();
        let neighbors = ChunkNeighbors::none().with(NeighborSide::NegZ, &air);
        let builder = ChunkMeshBuilder::new();
        let a = builder.build(&grid, &neighbors);
        let b = builder.build(&grid, &neighbors);
        assert_eq!(a.face_set(), b.face_set());
        assert!(!a.is_empty());
    }
}
