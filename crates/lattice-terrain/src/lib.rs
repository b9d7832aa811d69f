//! Incremental chunk generation and teardown.
//!
//! A [`ChunkGenerator`] fills a chunk one cell per [`ChunkGenerator::generate_step`]
//! call and tears it down one cell per [`ChunkGenerator::dispose_step`] call, so
//! the streaming workers never block on a whole chunk at once.

pub mod error;
pub mod flat;
pub mod generator;
pub mod heightmap;
pub mod noise_gen;

pub use error::StepError;
pub use flat::FlatGenerator;
pub use generator::{ChunkGenerator, StepContext, place_step};
pub use heightmap::{HeightmapParams, HeightmapSampler};
pub use noise_gen::{NoiseGenerator, NoiseLayers};
