//! Per-block static colliders for streamed chunks.
//!
//! Generation steps create one half-unit cuboid collider per placed block and
//! disposal steps destroy it again. Simulation itself happens elsewhere; this
//! crate only owns the collider lifecycle.

pub mod collider_world;
pub mod error;

pub use collider_world::{ColliderWorld, RapierColliderWorld};
pub use error::PhysicsError;
