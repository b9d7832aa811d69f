//! Ranking of pending creation work against the observer's current position.

use glam::{Vec2, Vec3};

use lattice_voxel::ChunkCoord;

/// Scores a pending chunk at pop time; lower scores are served first.
pub trait PriorityMetric: Send + Sync {
    fn score(&self, coord: ChunkCoord, observer: Vec3, chunk_size: f32) -> f32;
}

/// Built-in metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PriorityPolicy {
    /// Closest chunk footprint center to the observer first.
    #[default]
    NearestFirst,
    FarthestFirst,
    /// Request order.
    Fifo,
}

/// Horizontal distance from the observer to the center of a chunk's footprint.
pub fn horizontal_distance(coord: ChunkCoord, observer: Vec3, chunk_size: f32) -> f32 {
    let center = coord.world_center(chunk_size);
    Vec2::new(center.x - observer.x, center.z - observer.z).length()
}

impl PriorityMetric for PriorityPolicy {
    fn score(&self, coord: ChunkCoord, observer: Vec3, chunk_size: f32) -> f32 {
        match self {
            Self::NearestFirst => horizontal_distance(coord, observer, chunk_size),
            Self::FarthestFirst => -horizontal_distance(coord, observer, chunk_size),
            Self::Fifo => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_ignores_height() {
        let d = horizontal_distance(ChunkCoord::new(0, 0), Vec3::new(8.0, 500.0, 8.0), 16.0);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_nearest_and_farthest_are_opposite() {
        let near = ChunkCoord::new(1, 0);
        let far = ChunkCoord::new(4, 0);
        let obs = Vec3::new(8.0, 0.0, 8.0);
        let nearest = PriorityPolicy::NearestFirst;
        let farthest = PriorityPolicy::FarthestFirst;
        assert!(nearest.score(near, obs, 16.0) < nearest.score(far, obs, 16.0));
        assert!(farthest.score(far, obs, 16.0) < farthest.score(near, obs, 16.0));
    }

    #[test]
    fn test_fifo_is_flat() {
        let obs = Vec3::ZERO;
        assert_eq!(
            PriorityPolicy::Fifo.score(ChunkCoord::new(9, 9), obs, 16.0),
            PriorityPolicy::Fifo.score(ChunkCoord::new(0, 0), obs, 16.0)
        );
    }
}
