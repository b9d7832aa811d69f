//! Two-pipeline chunk scheduler.
//!
//! Creation and disposal each have a [`WorkQueue`] and one long-lived worker
//! thread. The creation worker pops the best-ranked pending chunk, runs its
//! generation steps to completion, meshes it against whatever neighbors are
//! resident, and publishes it to the scene. The disposal worker pops rejected
//! chunks in request order and runs their disposal steps to completion.
//!
//! A chunk lives in exactly one of: the creation queue, a worker's hands, the
//! disposal queue, or the resident set (published). Request and reject keep
//! that true under the queue locks, always taken creation-first.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, unbounded};
use dashmap::DashMap;
use glam::Vec3;

use lattice_mesh::{ChunkMeshBuilder, ChunkNeighbors, NeighborSide};
use lattice_physics::ColliderWorld;
use lattice_scene::{ModelHandle, RenderResources, Scene, SceneObject};
use lattice_terrain::{ChunkGenerator, StepContext};
use lattice_voxel::{Chunk, ChunkCoord, ChunkId, ChunkIdAllocator, ChunkState};

use crate::error::SchedulerError;
use crate::priority::{PriorityMetric, PriorityPolicy};
use crate::queue::WorkQueue;
use crate::window::ChunkSource;

/// External systems the workers drive.
#[derive(Clone)]
pub struct Collaborators {
    pub generator: Arc<dyn ChunkGenerator>,
    pub colliders: Arc<dyn ColliderWorld>,
    pub scene: Arc<dyn Scene>,
    pub render: Arc<RenderResources>,
}

#[derive(Clone, Copy, Debug)]
pub struct SchedulerOptions {
    /// World units per chunk edge.
    pub chunk_size: f32,
    /// Create a static collider per generated block.
    pub block_colliders: bool,
    /// Creation order; disposal is always first come, first served.
    pub priority: PriorityPolicy,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            chunk_size: 16.0,
            block_colliders: true,
            priority: PriorityPolicy::NearestFirst,
        }
    }
}

/// Progress notifications from the workers.
#[derive(Clone, Debug, PartialEq)]
pub enum SchedulerEvent {
    /// Generated, meshed, and attached to the scene.
    Published {
        id: ChunkId,
        coord: ChunkCoord,
        vertices: usize,
    },
    /// Mesh rebuilt after a neighbor was published.
    Remeshed {
        id: ChunkId,
        coord: ChunkCoord,
        revision: u64,
    },
    /// Disposal finished; the chunk holds no blocks or side resources.
    TornDown { id: ChunkId, coord: ChunkCoord },
    /// A step or collaborator failed; the chunk was abandoned.
    Faulted {
        id: ChunkId,
        coord: ChunkCoord,
        reason: String,
    },
}

impl SchedulerEvent {
    pub fn id(&self) -> ChunkId {
        match self {
            Self::Published { id, .. }
            | Self::Remeshed { id, .. }
            | Self::TornDown { id, .. }
            | Self::Faulted { id, .. } => *id,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        match self {
            Self::Published { coord, .. }
            | Self::Remeshed { coord, .. }
            | Self::TornDown { coord, .. }
            | Self::Faulted { coord, .. } => *coord,
        }
    }
}

/// Point-in-time counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub pending_create: usize,
    pub pending_dispose: usize,
    /// Chunks currently held by a worker (0..=2).
    pub in_flight: usize,
    /// Published chunks.
    pub resident: usize,
    pub generated: u64,
    pub disposed: u64,
    pub faulted: u64,
}

struct Shared {
    options: SchedulerOptions,
    collab: Collaborators,
    metric: Box<dyn PriorityMetric>,
    mesher: ChunkMeshBuilder,
    create: WorkQueue<Arc<Chunk>>,
    dispose: WorkQueue<Arc<Chunk>>,
    resident: DashMap<ChunkCoord, Arc<Chunk>>,
    /// Held while the resident set changes or a model is built from it.
    meshing: Mutex<()>,
    ids: ChunkIdAllocator,
    observer: Mutex<Vec3>,
    events: Sender<SchedulerEvent>,
    generated: AtomicU64,
    disposed: AtomicU64,
    faulted: AtomicU64,
}

/// Owns the creation and disposal workers. Dropping it shuts them down.
pub struct ChunkScheduler {
    shared: Arc<Shared>,
    events: Receiver<SchedulerEvent>,
    workers: Vec<JoinHandle<()>>,
}

impl ChunkScheduler {
    /// Starts both workers, ranking creation work by `options.priority`.
    pub fn spawn(collab: Collaborators, options: SchedulerOptions) -> Result<Self, SchedulerError> {
        Self::spawn_with_metric(collab, options, Box::new(options.priority))
    }

    /// Starts both workers with a custom creation ranking.
    pub fn spawn_with_metric(
        collab: Collaborators,
        options: SchedulerOptions,
        metric: Box<dyn PriorityMetric>,
    ) -> Result<Self, SchedulerError> {
        let (tx, rx) = unbounded();
        let shared = Arc::new(Shared {
            options,
            collab,
            metric,
            mesher: ChunkMeshBuilder::new(),
            create: WorkQueue::new("create"),
            dispose: WorkQueue::new("dispose"),
            resident: DashMap::new(),
            meshing: Mutex::new(()),
            ids: ChunkIdAllocator::new(),
            observer: Mutex::new(Vec3::ZERO),
            events: tx,
            generated: AtomicU64::new(0),
            disposed: AtomicU64::new(0),
            faulted: AtomicU64::new(0),
        });

        let mut scheduler = Self {
            shared: Arc::clone(&shared),
            events: rx,
            workers: Vec::with_capacity(2),
        };

        let loops: [(&'static str, fn(&Shared)); 2] = [
            ("chunk-create", Shared::run_creation),
            ("chunk-dispose", Shared::run_disposal),
        ];
        for (name, body) in loops {
            let worker = Arc::clone(&shared);
            let handle = thread::Builder::new()
                .name(name.into())
                .spawn(move || body(&worker))
                .map_err(|source| SchedulerError::Spawn { name, source })?;
            scheduler.workers.push(handle);
        }

        tracing::debug!(
            "chunk scheduler started (priority {:?}, colliders {})",
            options.priority,
            options.block_colliders
        );
        Ok(scheduler)
    }

    /// Returns the chunk for `coord`, queueing a fresh one for creation if no
    /// pipeline or the resident set already has it. Never blocks on work.
    pub fn request_chunk(&self, coord: ChunkCoord) -> Arc<Chunk> {
        self.shared.request(coord)
    }

    /// Hands a chunk that left the window back to the scheduler.
    ///
    /// Pending creation is cancelled outright. A chunk being generated right
    /// now is flagged and routed to disposal once its generation finishes.
    /// Anything that was generated is queued for disposal.
    pub fn reject_chunk(&self, chunk: &Arc<Chunk>) {
        self.shared.reject(chunk)
    }

    /// Updates the position creation work is ranked against.
    pub fn set_observer(&self, position: Vec3) {
        *self
            .shared
            .observer
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = position;
    }

    /// The published chunk at `coord`, if any.
    pub fn resident(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.shared.resident_at(coord)
    }

    /// Worker notifications, in the order each worker produced them.
    pub fn events(&self) -> &Receiver<SchedulerEvent> {
        &self.events
    }

    /// Everything received since the last drain.
    pub fn drain_events(&self) -> Vec<SchedulerEvent> {
        self.events.try_iter().collect()
    }

    pub fn stats(&self) -> SchedulerStats {
        let (pending_create, create_busy) = {
            let q = self.shared.create.lock();
            (q.len(), q.active().is_some())
        };
        let (pending_dispose, dispose_busy) = {
            let q = self.shared.dispose.lock();
            (q.len(), q.active().is_some())
        };
        SchedulerStats {
            pending_create,
            pending_dispose,
            in_flight: create_busy as usize + dispose_busy as usize,
            resident: self.shared.resident.len(),
            generated: self.shared.generated.load(Ordering::Relaxed),
            disposed: self.shared.disposed.load(Ordering::Relaxed),
            faulted: self.shared.faulted.load(Ordering::Relaxed),
        }
    }

    pub fn options(&self) -> &SchedulerOptions {
        &self.shared.options
    }

    /// Closes both queues without waiting. Workers finish the chunk in their
    /// hands, abandon everything pending, and exit.
    pub fn begin_shutdown(&self) {
        self.shared.create.close();
        self.shared.dispose.close();
    }

    /// Closes both queues and joins the workers.
    pub fn shutdown(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        self.begin_shutdown();
        for handle in self.workers.drain(..) {
            let name = handle.thread().name().unwrap_or("worker").to_owned();
            if handle.join().is_err() {
                tracing::error!("{} worker exited by panic", name);
            }
        }
        tracing::debug!("chunk scheduler stopped");
    }
}

impl Drop for ChunkScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl ChunkSource for ChunkScheduler {
    fn request_chunk(&self, coord: ChunkCoord) -> Arc<Chunk> {
        ChunkScheduler::request_chunk(self, coord)
    }

    fn reject_chunk(&self, chunk: &Arc<Chunk>) {
        ChunkScheduler::reject_chunk(self, chunk)
    }
}

impl Shared {
    fn request(&self, coord: ChunkCoord) -> Arc<Chunk> {
        let mut create = self.create.lock();

        if let Some(active) = create.active().filter(|c| c.coord() == coord) {
            active.clear_rejected();
            return Arc::clone(active);
        }
        if let Some(pending) = create.find(|c| c.coord() == coord) {
            return Arc::clone(pending);
        }

        {
            let mut dispose = self.dispose.lock();
            if let Some(chunk) = dispose.remove_where(|c| c.coord() == coord) {
                chunk.clear_rejected();
                tracing::debug!("chunk {} {} reclaimed from disposal", chunk.id(), coord);
                return chunk;
            }
            if let Some(live) = self.resident_at(coord) {
                let tearing_down = dispose.active().is_some_and(|c| Arc::ptr_eq(c, &live));
                if !tearing_down {
                    return live;
                }
            }
        }

        let chunk = Arc::new(Chunk::new(self.ids.allocate(), coord));
        if create.push(Arc::clone(&chunk)) {
            drop(create);
            self.create.notify();
            tracing::trace!("chunk {} {} queued for creation", chunk.id(), coord);
        } else {
            tracing::warn!("chunk {} requested after shutdown, not queued", coord);
        }
        chunk
    }

    fn reject(&self, chunk: &Arc<Chunk>) {
        let mut create = self.create.lock();

        if create.remove_where(|c| Arc::ptr_eq(c, chunk)).is_some() {
            tracing::trace!("chunk {} {} cancelled before generation", chunk.id(), chunk.coord());
            return;
        }
        if create.active().is_some_and(|c| Arc::ptr_eq(c, chunk)) {
            chunk.mark_rejected();
            tracing::debug!("chunk {} {} rejected mid-generation", chunk.id(), chunk.coord());
            return;
        }
        if !chunk.is_initialized() && chunk.state() != ChunkState::Faulted {
            return;
        }
        if matches!(chunk.state(), ChunkState::Disposing | ChunkState::TornDown) {
            return;
        }

        let mut dispose = self.dispose.lock();
        if dispose.find(|c| Arc::ptr_eq(c, chunk)).is_some() {
            return;
        }
        chunk.mark_rejected();
        if dispose.push(Arc::clone(chunk)) {
            drop(dispose);
            self.dispose.notify();
        }
    }

    fn resident_at(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.resident.get(&coord).map(|entry| Arc::clone(entry.value()))
    }

    fn score(&self, chunk: &Chunk) -> f32 {
        let observer = *self.observer.lock().unwrap_or_else(PoisonError::into_inner);
        self.metric
            .score(chunk.coord(), observer, self.options.chunk_size)
    }

    fn step_context(&self) -> StepContext<'_> {
        StepContext {
            colliders: self.collab.colliders.as_ref(),
            scene: self.collab.scene.as_ref(),
            models: &self.collab.render.models,
            chunk_size: self.options.chunk_size,
            block_colliders: self.options.block_colliders,
        }
    }

    fn emit(&self, event: SchedulerEvent) {
        // The receiver lives in `ChunkScheduler`, which joins the workers
        // before it is dropped.
        let sent = self.events.send(event);
        debug_assert!(sent.is_ok(), "scheduler event receiver dropped");
    }

    // -- creation -----------------------------------------------------------

    fn run_creation(&self) {
        tracing::debug!("creation worker running");
        while let Some(chunk) = self.create.pop_best(|c| self.score(c)) {
            if let Err(err) = guarded(|| self.create_chunk(&chunk)) {
                self.fault(&chunk, &err);
            }

            let mut create = self.create.lock();
            create.clear_active();
            if chunk.is_rejected() {
                let pushed = self.dispose.lock().push(Arc::clone(&chunk));
                drop(create);
                if pushed {
                    self.dispose.notify();
                    tracing::debug!(
                        "chunk {} {} routed to disposal after generation",
                        chunk.id(),
                        chunk.coord()
                    );
                }
            }
        }
        tracing::debug!("creation worker exiting");
    }

    fn create_chunk(&self, chunk: &Arc<Chunk>) -> Result<(), SchedulerError> {
        let ctx = self.step_context();
        let mut steps = 1usize;
        while !self.collab.generator.generate_step(chunk, &ctx)?.is_complete() {
            steps += 1;
        }
        chunk.mark_initialized();
        self.generated.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            "chunk {} {} generated by {} in {} steps ({} solid)",
            chunk.id(),
            chunk.coord(),
            self.collab.generator.name(),
            steps,
            chunk.blocks().solid_count()
        );
        self.publish(chunk)
    }

    fn publish(&self, chunk: &Arc<Chunk>) -> Result<(), SchedulerError> {
        let coord = chunk.coord();
        let meshing = self.meshing.lock().unwrap_or_else(PoisonError::into_inner);
        let model = self.build_model(chunk)?;
        chunk.record_mesh_build(model.id);
        chunk.set_state(ChunkState::Meshed);

        self.collab.scene.add_game_object(SceneObject::chunk(
            chunk.id(),
            coord,
            self.options.chunk_size,
            self.collab.render.texture_key.clone(),
        ));
        self.resident.insert(coord, Arc::clone(chunk));
        drop(meshing);
        self.emit(SchedulerEvent::Published {
            id: chunk.id(),
            coord,
            vertices: model.vertex_count,
        });

        // Neighbors meshed before this chunk existed treated its side as solid.
        self.remesh_neighbors(coord);
        Ok(())
    }

    /// Rebuilds every resident neighbor of `coord` after its content changed.
    fn remesh_neighbors(&self, coord: ChunkCoord) {
        for side in NeighborSide::ALL {
            let Some(neighbor) = self.resident_at(side.of(coord)) else {
                continue;
            };
            if let Err(err) = self.remesh(&neighbor) {
                tracing::warn!(
                    "remesh of chunk {} {} failed: {}",
                    neighbor.id(),
                    neighbor.coord(),
                    err
                );
            }
        }
    }

    fn remesh(&self, chunk: &Arc<Chunk>) -> Result<(), SchedulerError> {
        let meshing = self.meshing.lock().unwrap_or_else(PoisonError::into_inner);
        if chunk.state() != ChunkState::Meshed {
            return Ok(());
        }
        let model = self.build_model(chunk)?;
        drop(meshing);
        let revision = chunk.record_mesh_build(model.id);
        if chunk.state() != ChunkState::Meshed {
            // Disposal began while meshing and has already dropped the old entry.
            self.collab
                .render
                .models
                .remove_if(&chunk.coord().cache_key(), |h| h.id == model.id);
            return Ok(());
        }
        self.emit(SchedulerEvent::Remeshed {
            id: chunk.id(),
            coord: chunk.coord(),
            revision,
        });
        Ok(())
    }

    /// Meshes `chunk` against its resident neighbors and caches the model
    /// under the chunk's key, replacing any earlier one. Callers hold
    /// `meshing`.
    fn build_model(&self, chunk: &Chunk) -> Result<ModelHandle, SchedulerError> {
        let coord = chunk.coord();
        let adjacent = NeighborSide::ALL.map(|side| self.resident_at(side.of(coord)));
        let grids = adjacent.each_ref().map(|c| c.as_ref().map(|c| c.blocks()));

        let mut neighbors = ChunkNeighbors::none();
        for (side, grid) in NeighborSide::ALL.into_iter().zip(&grids) {
            if let Some(grid) = grid {
                neighbors = neighbors.with(side, grid);
            }
        }

        let mesh = self.mesher.build(&chunk.blocks(), &neighbors);
        let model = self.collab.render.factory.create_model(&mesh)?;
        self.collab.render.models.insert(coord.cache_key(), model);
        tracing::trace!(
            "chunk {} {} meshed: {} faces, {} of 4 neighbors",
            chunk.id(),
            coord,
            mesh.face_count(),
            neighbors.resolved()
        );
        Ok(model)
    }

    // -- disposal -----------------------------------------------------------

    fn run_disposal(&self) {
        tracing::debug!("disposal worker running");
        while let Some(chunk) = self.dispose.pop_best(|_| 0.0) {
            if let Err(err) = guarded(|| self.dispose_chunk(&chunk)) {
                self.fault(&chunk, &err);
            }
            self.dispose.finish();
        }
        tracing::debug!("disposal worker exiting");
    }

    fn dispose_chunk(&self, chunk: &Arc<Chunk>) -> Result<(), SchedulerError> {
        chunk.set_state(ChunkState::Disposing);
        let meshing = self.meshing.lock().unwrap_or_else(PoisonError::into_inner);
        let was_resident = self
            .resident
            .remove_if(&chunk.coord(), |_, live| Arc::ptr_eq(live, chunk))
            .is_some();
        drop(meshing);

        // Neighbors that saw this chunk's faces now border an unresolved side.
        if was_resident {
            self.remesh_neighbors(chunk.coord());
        }

        let ctx = self.step_context();
        while !self.collab.generator.dispose_step(chunk, &ctx)?.is_complete() {}

        chunk.set_state(ChunkState::TornDown);
        self.disposed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("chunk {} {} torn down", chunk.id(), chunk.coord());
        self.emit(SchedulerEvent::TornDown {
            id: chunk.id(),
            coord: chunk.coord(),
        });
        Ok(())
    }

    fn fault(&self, chunk: &Chunk, err: &SchedulerError) {
        chunk.set_state(ChunkState::Faulted);
        self.faulted.fetch_add(1, Ordering::Relaxed);
        tracing::error!("chunk {} {} faulted: {}", chunk.id(), chunk.coord(), err);
        self.emit(SchedulerEvent::Faulted {
            id: chunk.id(),
            coord: chunk.coord(),
            reason: err.to_string(),
        });
    }
}

/// Runs one unit of work, turning a panic into an error so the worker survives.
fn guarded(work: impl FnOnce() -> Result<(), SchedulerError>) -> Result<(), SchedulerError> {
    panic::catch_unwind(AssertUnwindSafe(work))
        .unwrap_or_else(|payload| Err(SchedulerError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lattice_physics::RapierColliderWorld;
    use lattice_scene::HeadlessScene;
    use lattice_terrain::FlatGenerator;

    use super::*;

    struct Rig {
        scheduler: ChunkScheduler,
        scene: Arc<HeadlessScene>,
        colliders: Arc<RapierColliderWorld>,
        render: Arc<RenderResources>,
    }

    fn rig(block_colliders: bool) -> Rig {
        let scene = Arc::new(HeadlessScene::new());
        let colliders = Arc::new(RapierColliderWorld::new(usize::MAX));
        let render = Arc::new(RenderResources::headless("terrain"));
        let scheduler = ChunkScheduler::spawn(
            Collaborators {
                generator: Arc::new(FlatGenerator::new(4)),
                colliders: colliders.clone(),
                scene: scene.clone(),
                render: render.clone(),
            },
            SchedulerOptions {
                block_colliders,
                ..Default::default()
            },
        )
        .unwrap();
        Rig {
            scheduler,
            scene,
            colliders,
            render,
        }
    }

    fn next_event(rig: &Rig) -> SchedulerEvent {
        rig.scheduler
            .events()
            .recv_timeout(Duration::from_secs(10))
            .expect("scheduler event")
    }

    fn wait_published(rig: &Rig, coord: ChunkCoord) {
        loop {
            if let SchedulerEvent::Published { coord: c, .. } = next_event(rig) {
                if c == coord {
                    return;
                }
            }
        }
    }

    #[test]
    fn test_request_publishes_chunk() {
        let rig = rig(true);
        let coord = ChunkCoord::new(2, -1);
        let chunk = rig.scheduler.request_chunk(coord);
        wait_published(&rig, coord);

        assert_eq!(chunk.state(), ChunkState::Meshed);
        assert!(chunk.is_initialized());
        assert!(rig.scene.contains(chunk.id().into()));
        assert!(rig.render.models.contains("Chunk_2_-1"));
        assert_eq!(rig.colliders.collider_count(), 16 * 16 * 4);
        assert!(Arc::ptr_eq(&rig.scheduler.resident(coord).unwrap(), &chunk));
        assert!(Arc::ptr_eq(&rig.scheduler.request_chunk(coord), &chunk));
    }

    #[test]
    fn test_neighbor_publish_remeshes_existing_chunk() {
        let rig = rig(false);
        let a = rig.scheduler.request_chunk(ChunkCoord::new(0, 0));
        wait_published(&rig, a.coord());
        assert_eq!(a.mesh_revision(), 1);
        let before = rig.render.models.get("Chunk_0_0").unwrap();

        let b = rig.scheduler.request_chunk(ChunkCoord::new(1, 0));
        wait_published(&rig, b.coord());
        match next_event(&rig) {
            SchedulerEvent::Remeshed { id, revision, .. } => {
                assert_eq!(id, a.id());
                assert_eq!(revision, 2);
            }
            other => panic!("expected remesh, got {other:?}"),
        }
        // Solid meets solid across the shared boundary, so no faces appear.
        let after = rig.render.models.get("Chunk_0_0").unwrap();
        assert_eq!(after.vertex_count, before.vertex_count);
        assert_ne!(after.id, before.id);
    }

    #[test]
    fn test_reject_published_chunk_tears_it_down() {
        let rig = rig(true);
        let coord = ChunkCoord::new(0, 3);
        let chunk = rig.scheduler.request_chunk(coord);
        wait_published(&rig, coord);

        rig.scheduler.reject_chunk(&chunk);
        loop {
            if let SchedulerEvent::TornDown { id, .. } = next_event(&rig) {
                assert_eq!(id, chunk.id());
                break;
            }
        }
        assert_eq!(chunk.state(), ChunkState::TornDown);
        assert!(chunk.blocks().is_empty());
        assert_eq!(rig.colliders.collider_count(), 0);
        assert_eq!(rig.scene.object_count(), 0);
        assert!(!rig.render.models.contains("Chunk_0_3"));
        assert!(rig.scheduler.resident(coord).is_none());

        let stats = rig.scheduler.stats();
        assert_eq!(stats.generated, 1);
        assert_eq!(stats.disposed, 1);
        assert_eq!(stats.resident, 0);
    }

    #[test]
    fn test_request_after_teardown_builds_new_instance() {
        let rig = rig(false);
        let coord = ChunkCoord::new(5, 5);
        let first = rig.scheduler.request_chunk(coord);
        wait_published(&rig, coord);
        rig.scheduler.reject_chunk(&first);
        while !matches!(next_event(&rig), SchedulerEvent::TornDown { .. }) {}

        let second = rig.scheduler.request_chunk(coord);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_ne!(first.id(), second.id());
        wait_published(&rig, coord);
    }

    #[test]
    fn test_shutdown_is_idempotent_and_stops_queueing() {
        let mut rig = rig(false);
        rig.scheduler.shutdown();
        rig.scheduler.shutdown();
        let chunk = rig.scheduler.request_chunk(ChunkCoord::new(0, 0));
        assert_eq!(chunk.state(), ChunkState::Empty);
        assert_eq!(rig.scheduler.stats().pending_create, 0);
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
