//! Chunk mesh data: vertex and index buffers produced by the mesh builder.

use lattice_voxel::{ATLAS_TILES, BlockKind, VoxelCoord};

use crate::face_direction::FaceDirection;

/// A single vertex in a chunk mesh, laid out for direct GPU upload.
///
/// Layout (32 bytes total):
///   - `[0..12]`  position `[f32; 3]` in chunk-local coordinates
///   - `[12..24]` normal `[f32; 3]`
///   - `[24..32]` uv `[f32; 2]` into the single-row terrain atlas
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(MeshVertex, [u8; 32]);

/// One emitted quad: which block face it covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceInfo {
    pub voxel: VoxelCoord,
    pub direction: FaceDirection,
}

/// The mesh output of a chunk meshing pass.
///
/// Each visible face contributes 4 vertices and 6 indices (two triangles).
#[derive(Clone, Debug, Default)]
pub struct ChunkMesh {
    /// Vertex buffer.
    pub vertices: Vec<MeshVertex>,
    /// Index buffer (triangles, 3 indices per triangle).
    pub indices: Vec<u32>,
    /// One entry per emitted quad.
    pub faces: Vec<FaceInfo>,
}

impl ChunkMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes the quad covering the `direction` face of the block at `voxel`.
    pub fn push_face(&mut self, voxel: VoxelCoord, direction: FaceDirection, kind: BlockKind) {
        let (layer_axis, u_axis, v_axis) = direction.quad_axes();
        let normal = direction.normal();
        let cell = [voxel.x as f32, voxel.y as f32, voxel.z as f32];

        // Positive faces sit on the far side of the cell.
        let layer_pos = if direction.is_positive() {
            cell[layer_axis] + 1.0
        } else {
            cell[layer_axis]
        };

        let (u, v) = (cell[u_axis], cell[v_axis]);
        let corners = [(u, v), (u + 1.0, v), (u + 1.0, v + 1.0), (u, v + 1.0)];

        let tile = kind.atlas_tile() as f32;
        let tiles = ATLAS_TILES as f32;
        let (u0, u1) = (tile / tiles, (tile + 1.0) / tiles);
        let uvs = [[u0, 0.0], [u1, 0.0], [u1, 1.0], [u0, 1.0]];

        let base = self.vertices.len() as u32;

        for (i, &(cu, cv)) in corners.iter().enumerate() {
            let mut position = [0.0_f32; 3];
            position[layer_axis] = layer_pos;
            position[u_axis] = cu;
            position[v_axis] = cv;

            self.vertices.push(MeshVertex {
                position,
                normal,
                uv: uvs[i],
            });
        }

        // Corners run counter-clockwise around +normal_axis; negative faces
        // reverse the winding so every quad is CCW seen from outside the block.
        if direction.is_positive() {
            self.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        } else {
            self.indices
                .extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
        }

        self.faces.push(FaceInfo { voxel, direction });
    }

    /// Counts the quads emitted for a specific face direction.
    pub fn count_faces_for_direction(&self, direction: FaceDirection) -> usize {
        self.faces
            .iter()
            .filter(|f| f.direction == direction)
            .count()
    }

    /// Total number of quads.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// The set of visible faces, independent of emission order.
    pub fn face_set(&self) -> Vec<FaceInfo> {
        let mut faces = self.faces.clone();
        faces.sort_unstable();
        faces
    }

    /// Raw vertex bytes for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
