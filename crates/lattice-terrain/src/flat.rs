//! Fixed-placement generator: the same layered column everywhere.

use lattice_voxel::{BlockKind, CHUNK_HEIGHT, Chunk, StepStatus, VoxelCoord};

use crate::error::StepError;
use crate::generator::{ChunkGenerator, StepContext, place_step};

/// Bedrock at `y = 0`, stone, three layers of dirt, and grass on top at
/// `ground_height - 1`. Cells at or above `ground_height` are air.
#[derive(Clone, Copy, Debug)]
pub struct FlatGenerator {
    ground_height: u8,
}

impl FlatGenerator {
    /// `ground_height` is clamped to the chunk's vertical range.
    pub fn new(ground_height: u8) -> Self {
        Self {
            ground_height: ground_height.min(CHUNK_HEIGHT as u8),
        }
    }

    pub fn ground_height(&self) -> u8 {
        self.ground_height
    }

    /// The block placed at `at`, identical in every chunk.
    pub fn block_at(&self, at: VoxelCoord) -> Option<BlockKind> {
        let top = self.ground_height;
        match at.y {
            y if y >= top => None,
            0 => Some(BlockKind::Bedrock),
            y if y + 1 == top => Some(BlockKind::Grass),
            y if y + 4 >= top => Some(BlockKind::Dirt),
            _ => Some(BlockKind::Stone),
        }
    }
}

impl Default for FlatGenerator {
    fn default() -> Self {
        Self::new(8)
    }
}

impl ChunkGenerator for FlatGenerator {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn generate_step(&self, chunk: &Chunk, ctx: &StepContext<'_>) -> Result<StepStatus, StepError> {
        place_step(chunk, ctx, |_, at| self.block_at(at))
    }
}
