use thiserror::Error;

/// Failures reported by a [`crate::ColliderWorld`].
#[derive(Debug, Error)]
pub enum PhysicsError {
    #[error("collider budget exhausted ({limit} colliders)")]
    BudgetExhausted { limit: usize },

    #[error("collider position is not finite: {0}")]
    NonFinitePosition(glam::Vec3),

    #[error("collider size must be positive and finite, got {0}")]
    InvalidSize(f32),
}
