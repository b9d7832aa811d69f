//! The two-method generator contract and the shared step helpers.

use lattice_physics::ColliderWorld;
use lattice_scene::{Cache, ModelHandle, Scene};
use lattice_voxel::{
    Block, BlockKind, Chunk, ChunkCoord, ChunkState, StepStatus, VoxelCoord, block_size,
};

use crate::error::StepError;

/// Collaborators a step may touch.
#[derive(Clone, Copy)]
pub struct StepContext<'a> {
    pub colliders: &'a dyn ColliderWorld,
    pub scene: &'a dyn Scene,
    pub models: &'a Cache<ModelHandle>,
    /// World units per chunk edge.
    pub chunk_size: f32,
    /// Create a static collider for every placed block.
    pub block_colliders: bool,
}

/// Fills and tears down chunks in bounded steps.
///
/// Both steps walk the chunk's cursor in x-fastest order, visit exactly one
/// cell per call, and report [`StepStatus::Complete`] on the call that visits
/// the last of the 16·64·16 cells. Calling again after completion is a no-op
/// that keeps reporting completion.
pub trait ChunkGenerator: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Decides and places the block under the cursor.
    fn generate_step(&self, chunk: &Chunk, ctx: &StepContext<'_>) -> Result<StepStatus, StepError>;

    /// Releases the side resources of the block under the cursor and clears it.
    ///
    /// The first call also detaches the chunk's game object from the scene and
    /// drops its cached model, if that model is still the one this chunk built.
    fn dispose_step(&self, chunk: &Chunk, ctx: &StepContext<'_>) -> Result<StepStatus, StepError> {
        let mut access = chunk.disposal_access();

        if access.is_first_step() {
            ctx.scene.remove_game_object(chunk.id().into());
            if let Some(model_id) = chunk.model_id() {
                ctx.models
                    .remove_if(&chunk.coord().cache_key(), |handle| handle.id == model_id);
            }
            tracing::trace!("chunk {} {} detached", chunk.id(), chunk.coord());
        }

        let Some(at) = access.current() else {
            return Ok(StepStatus::Complete);
        };
        if let Some(collider) = access.take(at).and_then(|block| block.collider) {
            ctx.colliders.destroy_collider(collider);
        }
        Ok(access.advance())
    }
}

/// One generation step driven by a per-cell placement rule.
///
/// `decide` sees the chunk coordinate and the cell under the cursor and
/// returns the block kind to place there (`None` for air). If collider
/// creation fails the cursor stays put and the error is returned.
pub fn place_step(
    chunk: &Chunk,
    ctx: &StepContext<'_>,
    decide: impl FnOnce(ChunkCoord, VoxelCoord) -> Option<BlockKind>,
) -> Result<StepStatus, StepError> {
    let mut access = chunk.generation_access();
    let Some(at) = access.current() else {
        return Ok(StepStatus::Complete);
    };
    if access.is_first_step() {
        chunk.set_state(ChunkState::Generating);
    }

    if let Some(kind) = decide(access.coord(), at) {
        let mut block = Block::new(kind);
        if ctx.block_colliders {
            let center = at.world_center(access.coord(), ctx.chunk_size);
            let size = block_size(ctx.chunk_size);
            block.collider = Some(ctx.colliders.create_block_collider(center, size)?);
        }
        access.place(at, block);
    }
    Ok(access.advance())
}

#[cfg(test)]
pub(crate) mod test_support {
    use lattice_physics::RapierColliderWorld;
    use lattice_scene::HeadlessScene;

    use super::*;

    pub struct Fixture {
        pub colliders: RapierColliderWorld,
        pub scene: HeadlessScene,
        pub models: Cache<ModelHandle>,
        pub block_colliders: bool,
    }

    impl Fixture {
        pub fn new(block_colliders: bool) -> Self {
            Self {
                colliders: RapierColliderWorld::new(usize::MAX),
                scene: HeadlessScene::new(),
                models: Cache::new(),
                block_colliders,
            }
        }

        pub fn ctx(&self) -> StepContext<'_> {
            StepContext {
                colliders: &self.colliders,
                scene: &self.scene,
                models: &self.models,
                chunk_size: 16.0,
                block_colliders: self.block_colliders,
            }
        }
    }

    /// Runs `step` until completion and returns the number of calls.
    pub fn run_to_completion(
        mut step: impl FnMut() -> Result<StepStatus, StepError>,
    ) -> usize {
        let mut calls = 0;
        loop {
            calls += 1;
            if step().unwrap().is_complete() {
                return calls;
            }
        }
    }
}
