//! A streamed chunk: block storage plus lifecycle state shared across threads.
//!
//! A [`Chunk`] is created empty when its coordinate enters the streaming window,
//! filled one cell per generation step, meshed once initialized, and torn down one
//! cell per disposal step after it leaves the window. The scheduler exclusively
//! drives a chunk while it sits in one of its pipelines; once published the scene
//! owns it until it is rejected back into the disposal pipeline.
//!
//! Block writes are only reachable through [`StepAccess`], the capability handed
//! to generation and disposal steps. Everything else gets read access.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::block::Block;
use crate::coord::{ChunkCoord, VoxelCoord};
use crate::grid::{BlockGrid, CHUNK_VOLUME};

/// Unique identity of a chunk instance, issued by a [`ChunkIdAllocator`].
///
/// Two chunks for the same coordinate (one being torn down, one freshly
/// requested) always have different ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub u64);

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues chunk ids. Owned by whoever constructs chunks (the scheduler).
#[derive(Debug, Default)]
pub struct ChunkIdAllocator {
    next: AtomicU64,
}

impl ChunkIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh id.
    pub fn allocate(&self) -> ChunkId {
        ChunkId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Number of ids issued so far.
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

/// Lifecycle state of a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChunkState {
    /// Constructed, no block decided yet.
    Empty = 0,
    /// Generation steps are running.
    Generating = 1,
    /// Every cell has been visited; no mesh yet.
    Initialized = 2,
    /// Mesh built and published.
    Meshed = 3,
    /// Disposal steps are running.
    Disposing = 4,
    /// Side resources released and detached from the scene.
    TornDown = 5,
    /// A step failed; the chunk was abandoned by its pipeline.
    Faulted = 6,
}

impl ChunkState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Empty,
            1 => Self::Generating,
            2 => Self::Initialized,
            3 => Self::Meshed,
            4 => Self::Disposing,
            5 => Self::TornDown,
            _ => Self::Faulted,
        }
    }
}

/// Outcome of a single generation or disposal step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
    /// More cells remain.
    Pending,
    /// The whole volume has been visited.
    Complete,
}

impl StepStatus {
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CursorPhase {
    Generate,
    Dispose,
}

#[derive(Debug)]
struct StepCursor {
    phase: CursorPhase,
    index: usize,
}

/// A streamed 16×64×16 chunk.
pub struct Chunk {
    id: ChunkId,
    coord: ChunkCoord,
    grid: RwLock<BlockGrid>,
    cursor: Mutex<StepCursor>,
    state: AtomicU8,
    initialized: AtomicBool,
    rejected: AtomicBool,
    mesh_revision: AtomicU64,
    model_id: AtomicU64,
}

impl Chunk {
    /// Creates an empty chunk for `coord`.
    pub fn new(id: ChunkId, coord: ChunkCoord) -> Self {
        Self {
            id,
            coord,
            grid: RwLock::new(BlockGrid::new()),
            cursor: Mutex::new(StepCursor {
                phase: CursorPhase::Generate,
                index: 0,
            }),
            state: AtomicU8::new(ChunkState::Empty as u8),
            initialized: AtomicBool::new(false),
            rejected: AtomicBool::new(false),
            mesh_revision: AtomicU64::new(0),
            model_id: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> ChunkId {
        self.id
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Read access to the block grid.
    pub fn blocks(&self) -> RwLockReadGuard<'_, BlockGrid> {
        self.grid.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> ChunkState {
        ChunkState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn set_state(&self, state: ChunkState) {
        tracing::trace!("chunk {} {} -> {:?}", self.id, self.coord, state);
        self.state.store(state as u8, Ordering::Release);
    }

    /// `true` once generation has visited the whole volume. Never reset.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Records generation completion and moves to [`ChunkState::Initialized`].
    pub fn mark_initialized(&self) {
        self.initialized.store(true, Ordering::Release);
        self.set_state(ChunkState::Initialized);
    }

    /// Flags the chunk as no longer wanted by the window.
    pub fn mark_rejected(&self) {
        self.rejected.store(true, Ordering::Release);
    }

    /// Clears the rejection flag when the window asks for the chunk again.
    pub fn clear_rejected(&self) {
        self.rejected.store(false, Ordering::Release);
    }

    pub fn is_rejected(&self) -> bool {
        self.rejected.load(Ordering::Acquire)
    }

    /// Records a (re)build whose model was issued as `model_id`, returning the
    /// new mesh revision.
    pub fn record_mesh_build(&self, model_id: u64) -> u64 {
        self.model_id.store(model_id, Ordering::Release);
        self.mesh_revision.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Number of meshes built for this chunk so far.
    pub fn mesh_revision(&self) -> u64 {
        self.mesh_revision.load(Ordering::Acquire)
    }

    /// Id of the model most recently built for this chunk.
    pub fn model_id(&self) -> Option<u64> {
        (self.mesh_revision() > 0).then(|| self.model_id.load(Ordering::Acquire))
    }

    /// Write capability for one generation step.
    ///
    /// The cursor continues from where the previous generation step left off.
    pub fn generation_access(&self) -> StepAccess<'_> {
        self.step_access(CursorPhase::Generate)
    }

    /// Write capability for one disposal step.
    ///
    /// The first disposal access rewinds the cursor to the first cell;
    /// subsequent ones continue from there.
    pub fn disposal_access(&self) -> StepAccess<'_> {
        self.step_access(CursorPhase::Dispose)
    }

    fn step_access(&self, phase: CursorPhase) -> StepAccess<'_> {
        let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
        if cursor.phase != phase {
            cursor.phase = phase;
            cursor.index = 0;
        }
        let grid = self.grid.write().unwrap_or_else(PoisonError::into_inner);
        StepAccess {
            coord: self.coord,
            cursor,
            grid,
        }
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("id", &self.id)
            .field("coord", &self.coord)
            .field("state", &self.state())
            .field("rejected", &self.is_rejected())
            .finish()
    }
}

/// Exclusive, cursor-driven write access to a chunk's blocks for one step.
///
/// Holds the chunk's cursor and grid locks until dropped, so a step should do
/// its O(1) work and return.
pub struct StepAccess<'a> {
    coord: ChunkCoord,
    cursor: MutexGuard<'a, StepCursor>,
    grid: RwLockWriteGuard<'a, BlockGrid>,
}

impl StepAccess<'_> {
    /// The chunk being stepped.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Cell under the cursor, or `None` once the volume has been visited.
    pub fn current(&self) -> Option<VoxelCoord> {
        VoxelCoord::from_index(self.cursor.index)
    }

    /// `true` when no cell has been visited yet in this phase.
    pub fn is_first_step(&self) -> bool {
        self.cursor.index == 0
    }

    /// Cells visited so far in this phase.
    pub fn visited(&self) -> usize {
        self.cursor.index
    }

    /// Moves the cursor past the current cell.
    pub fn advance(&mut self) -> StepStatus {
        if self.cursor.index < CHUNK_VOLUME {
            self.cursor.index += 1;
        }
        if self.cursor.index >= CHUNK_VOLUME {
            StepStatus::Complete
        } else {
            StepStatus::Pending
        }
    }

    /// Places a block, returning whatever occupied the cell.
    pub fn place(&mut self, at: VoxelCoord, block: Block) -> Option<Block> {
        self.grid.set(at, Some(block))
    }

    /// Clears a cell to air, returning its previous block.
    pub fn take(&mut self, at: VoxelCoord) -> Option<Block> {
        self.grid.take(at)
    }

    /// Read view of the grid being written.
    pub fn grid(&self) -> &BlockGrid {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;

    fn chunk() -> Chunk {
        Chunk::new(ChunkId(1), ChunkCoord::new(0, 0))
    }

    #[test]
    fn test_new_chunk_is_empty() {
        let c = chunk();
        assert_eq!(c.state(), ChunkState::Empty);
        assert!(!c.is_initialized());
        assert!(!c.is_rejected());
        assert!(c.blocks().is_empty());
    }

    #[test]
    fn test_allocator_issues_distinct_ids() {
        let ids = ChunkIdAllocator::new();
        let a = ids.allocate();
        let b = ids.allocate();
        assert_ne!(a, b);
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn test_cursor_persists_between_accesses() {
        let c = chunk();
        {
            let mut access = c.generation_access();
            assert!(access.is_first_step());
            access.advance();
            access.advance();
        }
        let access = c.generation_access();
        assert_eq!(access.visited(), 2);
        assert_eq!(access.current(), VoxelCoord::new(2, 0, 0));
    }

    #[test]
    fn test_advance_completes_after_full_volume() {
        let c = chunk();
        let mut access = c.generation_access();
        for _ in 0..CHUNK_VOLUME - 1 {
            assert_eq!(access.advance(), StepStatus::Pending);
        }
        assert_eq!(access.advance(), StepStatus::Complete);
        assert!(access.current().is_none());
        // Further advances stay complete.
        assert_eq!(access.advance(), StepStatus::Complete);
    }

    #[test]
    fn test_disposal_rewinds_cursor_once() {
        let c = chunk();
        {
            let mut access = c.generation_access();
            for _ in 0..10 {
                access.advance();
            }
        }
        {
            let mut access = c.disposal_access();
            assert!(access.is_first_step());
            access.advance();
        }
        let access = c.disposal_access();
        assert!(!access.is_first_step());
        assert_eq!(access.visited(), 1);
    }

    #[test]
    fn test_step_access_writes_are_visible_to_readers() {
        let c = chunk();
        let at = VoxelCoord::new(3, 4, 5).unwrap();
        c.generation_access().place(at, Block::new(BlockKind::Dirt));
        assert_eq!(c.blocks().get(at).map(|b| b.kind), Some(BlockKind::Dirt));
        assert_eq!(c.disposal_access().take(at).map(|b| b.kind), Some(BlockKind::Dirt));
        assert!(c.blocks().is_empty());
    }

    #[test]
    fn test_mark_initialized_sets_flag_and_state() {
        let c = chunk();
        c.mark_initialized();
        assert!(c.is_initialized());
        assert_eq!(c.state(), ChunkState::Initialized);
        c.set_state(ChunkState::Disposing);
        assert!(c.is_initialized(), "initialized flag survives later states");
    }

    #[test]
    fn test_rejection_flag_toggles() {
        let c = chunk();
        c.mark_rejected();
        assert!(c.is_rejected());
        c.clear_rejected();
        assert!(!c.is_rejected());
    }

    #[test]
    fn test_mesh_revision_counts_builds() {
        let c = chunk();
        assert_eq!(c.mesh_revision(), 0);
        assert_eq!(c.model_id(), None);
        assert_eq!(c.record_mesh_build(7), 1);
        assert_eq!(c.record_mesh_build(8), 2);
        assert_eq!(c.model_id(), Some(8));
    }
}
