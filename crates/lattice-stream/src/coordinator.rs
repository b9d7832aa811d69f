//! Per-tick driver tying the observer, the window, and the scheduler together.

use std::sync::Arc;

use glam::Vec3;

use lattice_scene::Scene;

use crate::scheduler::{ChunkScheduler, SchedulerEvent, SchedulerStats};
use crate::window::{ReloadReport, StreamingWindow};

/// Something whose position the window follows.
pub trait Observer {
    /// World-space position, or `None` if it cannot be read this tick.
    fn position(&self) -> Option<Vec3>;
}

impl<F> Observer for F
where
    F: Fn() -> Option<Vec3>,
{
    fn position(&self) -> Option<Vec3> {
        self()
    }
}

/// Result of one [`WorldCoordinator::tick`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Observer position used, `None` if the tick was skipped.
    pub position: Option<Vec3>,
    /// Set when the window was reloaded this tick.
    pub reload: Option<ReloadReport>,
    /// Scheduler events drained this tick.
    pub events: Vec<SchedulerEvent>,
    /// Objects in the scene after the tick.
    pub scene_objects: usize,
}

impl TickReport {
    pub fn skipped(&self) -> bool {
        self.position.is_none()
    }
}

/// Running totals across ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoordinatorStats {
    pub ticks: u64,
    pub skipped: u64,
    pub reloads: u64,
    pub published: u64,
    pub remeshed: u64,
    pub torn_down: u64,
    pub faulted: u64,
}

/// Owns the window and the scheduler; call [`WorldCoordinator::tick`] once per
/// simulation step from a single thread.
pub struct WorldCoordinator<O> {
    window: StreamingWindow,
    scheduler: ChunkScheduler,
    observer: O,
    scene: Arc<dyn Scene>,
    stats: CoordinatorStats,
}

impl<O: Observer> WorldCoordinator<O> {
    pub fn new(
        window: StreamingWindow,
        scheduler: ChunkScheduler,
        observer: O,
        scene: Arc<dyn Scene>,
    ) -> Self {
        Self {
            window,
            scheduler,
            observer,
            scene,
            stats: CoordinatorStats::default(),
        }
    }

    pub fn tick(&mut self) -> TickReport {
        self.stats.ticks += 1;
        let Some(position) = self.observer.position() else {
            self.stats.skipped += 1;
            tracing::debug!("observer position unavailable, tick skipped");
            return TickReport {
                scene_objects: self.scene.object_count(),
                ..Default::default()
            };
        };

        self.scheduler.set_observer(position);

        let reload = if self.window.needs_reload(position) {
            let report = self.window.reload(position, &self.scheduler);
            self.stats.reloads += 1;
            self.log_window(&report);
            Some(report)
        } else {
            None
        };

        let events = self.scheduler.drain_events();
        for event in &events {
            match event {
                SchedulerEvent::Published { .. } => self.stats.published += 1,
                SchedulerEvent::Remeshed { .. } => self.stats.remeshed += 1,
                SchedulerEvent::TornDown { .. } => self.stats.torn_down += 1,
                SchedulerEvent::Faulted { .. } => self.stats.faulted += 1,
            }
        }

        TickReport {
            position: Some(position),
            reload,
            events,
            scene_objects: self.scene.object_count(),
        }
    }

    fn log_window(&self, report: &ReloadReport) {
        let Some((min, max)) = self.window.world_bounds() else {
            return;
        };
        let sched = self.scheduler.stats();
        tracing::info!(
            "window [{:.1}, {:.1}, {:.1}] .. [{:.1}, {:.1}, {:.1}]: +{} -{} ={} | scene {} chunks {} | pending {}/{} resident {}",
            min.x,
            min.y,
            min.z,
            max.x,
            max.y,
            max.z,
            report.requested,
            report.rejected,
            report.retained,
            self.scene.object_count(),
            self.scene.count_of(&|kind| kind.is_chunk()),
            sched.pending_create,
            sched.pending_dispose,
            sched.resident
        );
    }

    pub fn window(&self) -> &StreamingWindow {
        &self.window
    }

    pub fn scheduler(&self) -> &ChunkScheduler {
        &self.scheduler
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn stats(&self) -> CoordinatorStats {
        self.stats
    }

    pub fn scheduler_stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    /// Stops both workers and returns the final scheduler counters.
    pub fn shutdown(mut self) -> SchedulerStats {
        self.scheduler.shutdown();
        let stats = self.scheduler.stats();
        tracing::info!(
            "streaming stopped after {} ticks: generated {} disposed {} faulted {}",
            self.stats.ticks,
            stats.generated,
            stats.disposed,
            stats.faulted
        );
        stats
    }
}
