//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, GeneratorKind};

/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "lattice", about = "Headless voxel chunk streaming")]
pub struct CliArgs {
    /// Window radius in chunks.
    #[arg(long)]
    pub radius: Option<u32>,

    /// Terrain seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Terrain generator.
    #[arg(long, value_enum)]
    pub generator: Option<GeneratorKind>,

    /// Number of simulation ticks to run.
    #[arg(long)]
    pub ticks: Option<u32>,

    /// Log filter (error, warn, info, debug, trace, or per-target directives).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Config directory (overrides the platform default).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(radius) = args.radius {
            self.stream.radius = radius;
        }
        if let Some(seed) = args.seed {
            self.terrain.seed = seed;
        }
        if let Some(generator) = args.generator {
            self.terrain.generator = generator;
        }
        if let Some(ticks) = args.ticks {
            self.simulation.ticks = ticks;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
