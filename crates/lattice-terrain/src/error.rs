use thiserror::Error;

use lattice_physics::PhysicsError;
use lattice_voxel::ChunkCoord;

/// Failure of a single generation or disposal step.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("physics: {0}")]
    Physics(#[from] PhysicsError),

    #[error("chunk {coord}: {reason}")]
    Failed { coord: ChunkCoord, reason: String },
}
