use thiserror::Error;

use lattice_scene::RenderError;
use lattice_terrain::StepError;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("failed to spawn {name} worker: {source}")]
    Spawn {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("step failed: {0}")]
    Step(#[from] StepError),

    #[error("model creation failed: {0}")]
    Render(#[from] RenderError),

    #[error("worker panicked: {0}")]
    Panicked(String),
}
