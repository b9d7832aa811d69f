//! Configuration sections with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

const APP_NAME: &str = "lattice";

/// Platform config directory for Lattice, or `./lattice` when the OS has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub stream: StreamConfig,
    pub terrain: TerrainConfig,
    pub physics: PhysicsConfig,
    pub render: RenderConfig,
    pub simulation: SimulationConfig,
    pub debug: DebugConfig,
}

/// Order in which pending chunks are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum PriorityMode {
    #[default]
    NearestFirst,
    FarthestFirst,
    Fifo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum GeneratorKind {
    /// Fixed layered ground.
    Flat,
    /// Seeded fBm heightmap.
    #[default]
    Noise,
}

/// Largest accepted window radius, in chunks.
pub const MAX_RADIUS: u32 = 64;

/// Streaming window settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamConfig {
    /// Chunks kept on each side of the observer's chunk.
    pub radius: u32,
    /// World units per chunk edge.
    pub chunk_size: f32,
    /// Extra chunks the observer may stray from the center before a reload.
    pub reload_margin: u32,
    pub priority: PriorityMode,
}

/// Terrain generator selection and parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    pub generator: GeneratorKind,
    pub seed: u32,
    /// Surface height for the flat generator.
    pub ground_height: u8,
    /// Surface height where the noise offset is zero.
    pub base_height: f64,
    pub octaves: u32,
    pub base_frequency: f64,
    pub amplitude: f64,
    pub persistence: f64,
    pub lacunarity: f64,
    pub sea_level: u8,
    pub snow_line: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Give every generated block a static collider.
    pub block_colliders: bool,
    /// Collider budget; creation fails once it is reached.
    pub max_colliders: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Texture cache key used by chunk drawables.
    pub texture_key: String,
}

/// Scripted observer driving the headless demo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub ticks: u32,
    /// Wall-clock pause between ticks in milliseconds.
    pub tick_ms: u64,
    /// Observer speed in world units per tick.
    pub observer_speed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (e.g. "info", "lattice_stream=debug").
    pub log_level: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            radius: 4,
            chunk_size: 16.0,
            reload_margin: 0,
            priority: PriorityMode::NearestFirst,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorKind::Noise,
            seed: 0,
            ground_height: 8,
            base_height: 24.0,
            octaves: 4,
            base_frequency: 0.01,
            amplitude: 12.0,
            persistence: 0.5,
            lacunarity: 2.0,
            sea_level: 18,
            snow_line: 34,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            block_colliders: true,
            max_colliders: 4_000_000,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            texture_key: "terrain_atlas".to_string(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            tick_ms: 16,
            observer_speed: 0.5,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from `config_dir`, or write and return the defaults.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE);

        if path.exists() {
            let config = Self::read(&path)?;
            config.validate()?;
            log::info!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", path.display());
            Ok(config)
        }
    }

    /// Save config to `config_dir` as pretty RON.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&path, serialized).map_err(|source| ConfigError::Write { path, source })?;
        log::debug!("Saved config to {}", config_dir.display());
        Ok(())
    }

    /// Re-read the file; `Some` only if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = Self::read(&config_dir.join(CONFIG_FILE))?;
        fresh.validate()?;
        if &fresh != self {
            log::info!("Config reloaded with changes");
            Ok(Some(fresh))
        } else {
            Ok(None)
        }
    }

    /// Rejects values the streaming world cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stream.radius > MAX_RADIUS {
            return Err(ConfigError::Invalid {
                field: "stream.radius",
                reason: format!("at most {MAX_RADIUS} chunks, got {}", self.stream.radius),
            });
        }
        if self.stream.reload_margin > self.stream.radius {
            return Err(ConfigError::Invalid {
                field: "stream.reload_margin",
                reason: format!(
                    "must not exceed the radius ({}), got {}",
                    self.stream.radius, self.stream.reload_margin
                ),
            });
        }
        if !(self.stream.chunk_size.is_finite() && self.stream.chunk_size > 0.0) {
            return Err(ConfigError::Invalid {
                field: "stream.chunk_size",
                reason: format!("must be positive, got {}", self.stream.chunk_size),
            });
        }
        if self.terrain.octaves == 0 {
            return Err(ConfigError::Invalid {
                field: "terrain.octaves",
                reason: "at least one octave is required".to_string(),
            });
        }
        if self.terrain.ground_height > 64 {
            return Err(ConfigError::Invalid {
                field: "terrain.ground_height",
                reason: format!("chunks are 64 blocks tall, got {}", self.terrain.ground_height),
            });
        }
        if self.simulation.observer_speed < 0.0 {
            return Err(ConfigError::Invalid {
                field: "simulation.observer_speed",
                reason: "must not be negative".to_string(),
            });
        }
        Ok(())
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
