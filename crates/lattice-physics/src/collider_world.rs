//! Collider lifecycle: the [`ColliderWorld`] seam and its rapier3d backend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use glam::Vec3;
use rapier3d::prelude::*;
use rustc_hash::FxHashMap;

use lattice_voxel::ColliderId;

use crate::error::PhysicsError;

/// Owner of per-block static colliders.
///
/// Implementations are shared between the generation and disposal workers,
/// so every method takes `&self`.
pub trait ColliderWorld: Send + Sync {
    /// Creates a static cube collider with edge length `size`, centered at
    /// `center` (world space).
    fn create_block_collider(&self, center: Vec3, size: f32)
        -> Result<ColliderId, PhysicsError>;

    /// Destroys a collider. Returns `false` if the id was unknown.
    fn destroy_collider(&self, id: ColliderId) -> bool;

    /// Number of live colliders.
    fn collider_count(&self) -> usize;
}

struct RapierState {
    collider_set: ColliderSet,
    island_manager: IslandManager,
    rigid_body_set: RigidBodySet,
    handles: FxHashMap<ColliderId, ColliderHandle>,
}

/// Rapier-backed [`ColliderWorld`]. Block colliders are parentless cuboids.
pub struct RapierColliderWorld {
    state: Mutex<RapierState>,
    next_id: AtomicU64,
    max_colliders: usize,
}

impl RapierColliderWorld {
    /// Creates an empty world that refuses to hold more than `max_colliders`.
    pub fn new(max_colliders: usize) -> Self {
        Self {
            state: Mutex::new(RapierState {
                collider_set: ColliderSet::new(),
                island_manager: IslandManager::new(),
                rigid_body_set: RigidBodySet::new(),
                handles: FxHashMap::default(),
            }),
            next_id: AtomicU64::new(1),
            max_colliders,
        }
    }

    pub fn max_colliders(&self) -> usize {
        self.max_colliders
    }

    /// Half-extents of a live collider's cuboid.
    pub fn collider_half_extents(&self, id: ColliderId) -> Option<Vec3> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let handle = state.handles.get(&id)?;
        let cuboid = state.collider_set.get(*handle)?.shape().as_cuboid()?;
        let h = cuboid.half_extents;
        Some(Vec3::new(h.x, h.y, h.z))
    }

    /// World-space center of a live collider.
    pub fn collider_center(&self, id: ColliderId) -> Option<Vec3> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let handle = state.handles.get(&id)?;
        let t = state.collider_set.get(*handle)?.translation();
        Some(Vec3::new(t.x, t.y, t.z))
    }
}

impl ColliderWorld for RapierColliderWorld {
    fn create_block_collider(
        &self,
        center: Vec3,
        size: f32,
    ) -> Result<ColliderId, PhysicsError> {
        if !center.is_finite() {
            return Err(PhysicsError::NonFinitePosition(center));
        }
        if !(size.is_finite() && size > 0.0) {
            return Err(PhysicsError::InvalidSize(size));
        }

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.handles.len() >= self.max_colliders {
            return Err(PhysicsError::BudgetExhausted {
                limit: self.max_colliders,
            });
        }

        let collider = ColliderBuilder::cuboid(size * 0.5, size * 0.5, size * 0.5)
            .translation(Vector::new(center.x, center.y, center.z))
            .build();
        let handle = state.collider_set.insert(collider);
        let id = ColliderId(self.next_id.fetch_add(1, Ordering::Relaxed));
        state.handles.insert(id, handle);
        Ok(id)
    }

    fn destroy_collider(&self, id: ColliderId) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(handle) = state.handles.remove(&id) else {
            tracing::warn!("destroy of unknown collider {:?}", id);
            return false;
        };
        let RapierState {
            collider_set,
            island_manager,
            rigid_body_set,
            ..
        } = &mut *state;
        collider_set
            .remove(handle, island_manager, rigid_body_set, true)
            .is_some()
    }

    fn collider_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .handles
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_destroy_collider() {
        let world = RapierColliderWorld::new(16);
        let id = world.create_block_collider(Vec3::new(0.5, 10.5, 3.5), 1.0).unwrap();
        assert_eq!(world.collider_count(), 1);

        let center = world.collider_center(id).unwrap();
        assert!((center - Vec3::new(0.5, 10.5, 3.5)).length() < 1e-5);

        assert!(world.destroy_collider(id));
        assert_eq!(world.collider_count(), 0);
        assert!(world.collider_center(id).is_none());
    }

    #[test]
    fn test_destroy_unknown_collider() {
        let world = RapierColliderWorld::new(4);
        assert!(!world.destroy_collider(ColliderId(99)));
    }

    #[test]
    fn test_ids_are_unique() {
        let world = RapierColliderWorld::new(8);
        let a = world.create_block_collider(Vec3::ZERO, 1.0).unwrap();
        let b = world.create_block_collider(Vec3::ZERO, 1.0).unwrap();
        assert_ne!(a, b);
        assert!(world.destroy_collider(a));
        assert!(!world.destroy_collider(a));
        assert_eq!(world.collider_count(), 1);
    }

    #[test]
    fn test_budget_exhausted() {
        let world = RapierColliderWorld::new(2);
        world.create_block_collider(Vec3::ZERO, 1.0).unwrap();
        world.create_block_collider(Vec3::X, 1.0).unwrap();
        let err = world.create_block_collider(Vec3::Y, 1.0).unwrap_err();
        assert!(matches!(err, PhysicsError::BudgetExhausted { limit: 2 }));
    }

    #[test]
    fn test_rejects_non_finite_center() {
        let world = RapierColliderWorld::new(2);
        let err = world
            .create_block_collider(Vec3::new(f32::NAN, 0.0, 0.0), 1.0)
            .unwrap_err();
        assert!(matches!(err, PhysicsError::NonFinitePosition(_)));
        assert_eq!(world.collider_count(), 0);
    }

    #[test]
    fn test_collider_matches_block_size() {
        let world = RapierColliderWorld::new(4);
        let id = world.create_block_collider(Vec3::splat(1.0), 2.0).unwrap();
        let half = world.collider_half_extents(id).unwrap();
        assert!((half - Vec3::ONE).length() < 1e-6);

        let err = world.create_block_collider(Vec3::ZERO, 0.0).unwrap_err();
        assert!(matches!(err, PhysicsError::InvalidSize(_)));
        assert_eq!(world.collider_count(), 1);
    }
}
