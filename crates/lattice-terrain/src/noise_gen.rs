//! Noise-layered generator: fBm heightmap columns with material bands.

use lattice_voxel::{
    BlockKind, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH, Chunk, ChunkCoord, StepStatus, VoxelCoord,
};

use crate::error::StepError;
use crate::generator::{ChunkGenerator, StepContext, place_step};
use crate::heightmap::{HeightmapParams, HeightmapSampler};

/// Material banding applied on top of the heightmap.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseLayers {
    /// Column height where the noise offset is zero.
    pub base_height: f64,
    /// Columns whose surface is at or below this height are sand.
    pub sea_level: u8,
    /// Surface blocks at or above this height are snow.
    pub snow_line: u8,
    /// Thickness of the dirt (or sand) band under the surface block.
    pub soil_depth: u8,
}

impl Default for NoiseLayers {
    fn default() -> Self {
        Self {
            base_height: 24.0,
            sea_level: 18,
            snow_line: 34,
            soil_depth: 3,
        }
    }
}

/// Deterministic per seed: the same chunk coordinate always yields the same blocks.
pub struct NoiseGenerator {
    sampler: HeightmapSampler,
    layers: NoiseLayers,
}

impl NoiseGenerator {
    pub fn new(params: HeightmapParams, layers: NoiseLayers) -> Self {
        Self {
            sampler: HeightmapSampler::new(params),
            layers,
        }
    }

    /// Surface height of the world column under `(x, z)` of `chunk`, in
    /// `1..=CHUNK_HEIGHT - 1`.
    pub fn column_height(&self, chunk: ChunkCoord, x: u8, z: u8) -> u8 {
        let wx = chunk.x as f64 * CHUNK_WIDTH as f64 + x as f64;
        let wz = chunk.z as f64 * CHUNK_DEPTH as f64 + z as f64;
        let h = self.layers.base_height + self.sampler.sample(wx, wz);
        h.round().clamp(1.0, (CHUNK_HEIGHT - 1) as f64) as u8
    }

    pub fn block_at(&self, chunk: ChunkCoord, at: VoxelCoord) -> Option<BlockKind> {
        let height = self.column_height(chunk, at.x, at.z);
        if at.y >= height {
            return None;
        }
        if at.y == 0 {
            return Some(BlockKind::Bedrock);
        }

        let surface = height - 1;
        let shore = surface <= self.layers.sea_level;
        let kind = if at.y == surface {
            if shore {
                BlockKind::Sand
            } else if surface >= self.layers.snow_line {
                BlockKind::Snow
            } else {
                BlockKind::Grass
            }
        } else if at.y + self.layers.soil_depth >= surface {
            if shore { BlockKind::Sand } else { BlockKind::Dirt }
        } else {
            BlockKind::Stone
        };
        Some(kind)
    }

    pub fn layers(&self) -> &NoiseLayers {
        &self.layers
    }
}

impl ChunkGenerator for NoiseGenerator {
    fn name(&self) -> &'static str {
        "noise"
    }

    fn generate_step(&self, chunk: &Chunk, ctx: &StepContext<'_>) -> Result<StepStatus, StepError> {
        place_step(chunk, ctx, |coord, at| self.block_at(coord, at))
    }
}
