//! Headless streaming demo.
//!
//! Walks an observer along a slowly curving path and lets the window stream
//! chunks in and out around it. Configuration is loaded from `config.ron`
//! and can be overridden via CLI flags:
//! `cargo run -p lattice-demo -- --radius 2 --generator flat --ticks 300`.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use glam::Vec3;
use tracing::{error, info};

use lattice_config::{CliArgs, Config, GeneratorKind, PriorityMode, default_config_dir};
use lattice_physics::{ColliderWorld, RapierColliderWorld};
use lattice_scene::{HeadlessModelFactory, HeadlessScene, RenderResources, Scene};
use lattice_stream::{
    ChunkScheduler, Collaborators, PriorityPolicy, SchedulerError, SchedulerOptions,
    StreamingWindow, WorldCoordinator,
};
use lattice_terrain::{ChunkGenerator, FlatGenerator, HeightmapParams, NoiseGenerator, NoiseLayers};

/// Radians the heading turns per tick.
const TURN_RATE: f32 = 0.004;

fn priority_policy(mode: PriorityMode) -> PriorityPolicy {
    match mode {
        PriorityMode::NearestFirst => PriorityPolicy::NearestFirst,
        PriorityMode::FarthestFirst => PriorityPolicy::FarthestFirst,
        PriorityMode::Fifo => PriorityPolicy::Fifo,
    }
}

fn build_generator(config: &Config) -> Arc<dyn ChunkGenerator> {
    let terrain = &config.terrain;
    match terrain.generator {
        GeneratorKind::Flat => Arc::new(FlatGenerator::new(terrain.ground_height)),
        GeneratorKind::Noise => Arc::new(NoiseGenerator::new(
            HeightmapParams {
                seed: terrain.seed,
                octaves: terrain.octaves,
                base_frequency: terrain.base_frequency,
                amplitude: terrain.amplitude,
                persistence: terrain.persistence,
                lacunarity: terrain.lacunarity,
            },
            NoiseLayers {
                base_height: terrain.base_height,
                sea_level: terrain.sea_level,
                snow_line: terrain.snow_line,
                ..NoiseLayers::default()
            },
        )),
    }
}

/// Observer position after `tick` ticks along the scripted path.
fn scripted_step(position: Vec3, tick: u32, speed: f32) -> Vec3 {
    let heading = tick as f32 * TURN_RATE;
    position + Vec3::new(heading.cos(), 0.0, heading.sin()) * speed
}

fn run(config: &Config) -> Result<(), SchedulerError> {
    let scene = Arc::new(HeadlessScene::new());
    let colliders = Arc::new(RapierColliderWorld::new(config.physics.max_colliders));
    let factory = Arc::new(HeadlessModelFactory::new());
    let render = Arc::new(RenderResources::new(
        factory.clone(),
        config.render.texture_key.clone(),
    ));
    let generator = build_generator(config);
    info!(
        "streaming with {} terrain, radius {}, seed {}",
        generator.name(),
        config.stream.radius,
        config.terrain.seed
    );

    let scheduler = ChunkScheduler::spawn(
        Collaborators {
            generator,
            colliders: colliders.clone(),
            scene: scene.clone(),
            render: render.clone(),
        },
        SchedulerOptions {
            chunk_size: config.stream.chunk_size,
            block_colliders: config.physics.block_colliders,
            priority: priority_policy(config.stream.priority),
        },
    )?;

    let half = config.stream.chunk_size * 0.5;
    let position = Rc::new(Cell::new(Vec3::new(half, 48.0, half)));
    let observer = {
        let position = Rc::clone(&position);
        move || Some(position.get())
    };

    let window = StreamingWindow::new(
        config.stream.radius,
        config.stream.chunk_size,
        config.stream.reload_margin,
    );
    let mut world = WorldCoordinator::new(window, scheduler, observer, scene.clone());

    let started = Instant::now();
    let pause = Duration::from_millis(config.simulation.tick_ms);
    for tick in 0..config.simulation.ticks {
        let report = world.tick();
        if let Some(reload) = report.reload {
            tracing::debug!(
                "tick {}: reload +{} -{} ={}",
                tick,
                reload.requested,
                reload.rejected,
                reload.retained
            );
        }
        position.set(scripted_step(
            position.get(),
            tick,
            config.simulation.observer_speed,
        ));
        if !pause.is_zero() {
            std::thread::sleep(pause);
        }
    }

    let totals = world.stats();
    let final_position = position.get();
    let sched = world.shutdown();
    info!(
        "{} ticks in {:.2?}: {} reloads, {} published, {} remeshed, {} torn down, {} faulted",
        totals.ticks,
        started.elapsed(),
        totals.reloads,
        totals.published,
        totals.remeshed,
        totals.torn_down,
        totals.faulted
    );
    info!(
        "observer ended at [{:.1}, {:.1}, {:.1}]; generated {}, disposed {}, abandoned {}",
        final_position.x,
        final_position.y,
        final_position.z,
        sched.generated,
        sched.disposed,
        sched.pending_create + sched.pending_dispose
    );
    info!(
        "scene {} objects, {} models built ({} cached), {} colliders",
        scene.object_count(),
        factory.created(),
        render.models.len(),
        colliders.collider_count()
    );
    Ok(())
}

fn main() {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(2);
    }

    let log_dir = config_dir.join("logs");
    lattice_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = run(&config) {
        error!("streaming failed: {e}");
        std::process::exit(1);
    }
}
