//! Configuration for the Lattice streaming world.
//!
//! Settings persist to disk as a RON file, tolerate missing and unknown
//! fields, and can be overridden from the command line.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE, Config, DebugConfig, GeneratorKind, MAX_RADIUS, PhysicsConfig, PriorityMode,
    RenderConfig, SimulationConfig, StreamConfig, TerrainConfig, default_config_dir,
};
pub use error::ConfigError;
