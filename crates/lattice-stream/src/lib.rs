//! Chunk streaming around a moving observer.
//!
//! [`WorldCoordinator`] runs on the simulation thread: each tick it reads the
//! observer's position, reloads the [`StreamingWindow`] when the observer has
//! left the current center, and asks the [`ChunkScheduler`] for new chunks or
//! hands it the ones that fell out of the window. The scheduler owns two worker
//! threads, one filling and meshing chunks and one tearing them down.

pub mod coordinator;
pub mod error;
pub mod priority;
pub mod queue;
pub mod scheduler;
pub mod window;

pub use coordinator::{CoordinatorStats, Observer, TickReport, WorldCoordinator};
pub use error::SchedulerError;
pub use priority::{PriorityMetric, PriorityPolicy};
pub use queue::{QueueState, WorkQueue};
pub use scheduler::{
    ChunkScheduler, Collaborators, SchedulerEvent, SchedulerOptions, SchedulerStats,
};
pub use window::{ChunkSource, ReloadReport, StreamingWindow};
