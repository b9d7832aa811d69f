//! The square window of chunk coordinates kept live around the observer.

use std::sync::Arc;

use glam::Vec3;

use lattice_voxel::{CHUNK_HEIGHT, Chunk, ChunkCoord, block_size};

/// Where the window gets chunks from and returns them to.
pub trait ChunkSource {
    fn request_chunk(&self, coord: ChunkCoord) -> Arc<Chunk>;
    fn reject_chunk(&self, chunk: &Arc<Chunk>);
}

/// Outcome of one [`StreamingWindow::reload`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReloadReport {
    /// Coordinates that entered the window.
    pub requested: usize,
    /// Coordinates that left it.
    pub rejected: usize,
    /// Chunks carried over from the previous window.
    pub retained: usize,
}

/// `D × D` chunk slots (`D = 2·radius + 1`) centered on the observer's chunk.
///
/// Only the coordinator thread touches the window.
#[derive(Debug)]
pub struct StreamingWindow {
    radius: u32,
    chunk_size: f32,
    reload_margin: u32,
    center: Option<ChunkCoord>,
    slots: Vec<Option<Arc<Chunk>>>,
}

impl StreamingWindow {
    pub fn new(radius: u32, chunk_size: f32, reload_margin: u32) -> Self {
        let diameter = (2 * radius + 1) as usize;
        Self {
            radius,
            chunk_size,
            reload_margin,
            center: None,
            slots: vec![None; diameter * diameter],
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn diameter(&self) -> u32 {
        2 * self.radius + 1
    }

    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    /// Center chunk, once the first reload has run.
    pub fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    /// Minimum-corner chunk of the window.
    pub fn origin(&self) -> Option<ChunkCoord> {
        let r = self.radius as i32;
        self.center.map(|c| c.offset(-r, -r))
    }

    /// `true` if `coord` lies inside the window.
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.slot_index(coord).is_some()
    }

    /// The chunk occupying `coord`'s slot.
    pub fn get(&self, coord: ChunkCoord) -> Option<&Arc<Chunk>> {
        self.slots[self.slot_index(coord)?].as_ref()
    }

    /// Every chunk currently held, row by row.
    pub fn chunks(&self) -> impl Iterator<Item = &Arc<Chunk>> {
        self.slots.iter().flatten()
    }

    /// Every coordinate in the window, row by row.
    pub fn coords(&self) -> Vec<ChunkCoord> {
        let Some(origin) = self.origin() else {
            return Vec::new();
        };
        let d = self.diameter() as i32;
        (0..d)
            .flat_map(|dz| (0..d).map(move |dx| origin.offset(dx, dz)))
            .collect()
    }

    /// World-space bounding box of the window as `(min, max)`.
    pub fn world_bounds(&self) -> Option<(Vec3, Vec3)> {
        let origin = self.origin()?;
        let d = self.diameter() as i32;
        let min = origin.world_origin(self.chunk_size);
        let height = CHUNK_HEIGHT as f32 * block_size(self.chunk_size);
        let max = origin.offset(d, d).world_origin(self.chunk_size) + Vec3::new(0.0, height, 0.0);
        Some((min, max))
    }

    /// `true` if the observer at `position` has left the reload zone: the
    /// center chunk widened by `reload_margin` chunks on each side. Always
    /// `true` before the first reload.
    pub fn needs_reload(&self, position: Vec3) -> bool {
        let Some(center) = self.center else {
            return true;
        };
        let m = self.reload_margin as i32;
        let lower = center.offset(-m, -m).world_origin(self.chunk_size);
        let higher = center.offset(m, m).world_origin(self.chunk_size);
        let outside = |p: f32, lo: f32, hi: f32| p < lo || p >= hi + self.chunk_size;
        outside(position.x, lower.x, higher.x) || outside(position.z, lower.z, higher.z)
    }

    /// Re-centers the window on the chunk containing `position`.
    ///
    /// Chunks whose coordinate is still inside move to their new slot
    /// untouched; new coordinates are requested from `source`, and chunks
    /// that fell out are rejected back to it.
    pub fn reload(&mut self, position: Vec3, source: &dyn ChunkSource) -> ReloadReport {
        let new_center = ChunkCoord::from_world(position, self.chunk_size);
        let mut report = ReloadReport::default();

        let slot_count = self.slots.len();
        let old = std::mem::replace(&mut self.slots, vec![None; slot_count]);
        self.center = Some(new_center);

        let mut departed = Vec::new();
        for chunk in old.into_iter().flatten() {
            match self.slot_index(chunk.coord()) {
                Some(index) => {
                    self.slots[index] = Some(chunk);
                    report.retained += 1;
                }
                None => departed.push(chunk),
            }
        }

        for coord in self.coords() {
            let Some(index) = self.slot_index(coord) else {
                continue;
            };
            if self.slots[index].is_none() {
                self.slots[index] = Some(source.request_chunk(coord));
                report.requested += 1;
            }
        }

        for chunk in &departed {
            source.reject_chunk(chunk);
        }
        report.rejected = departed.len();

        tracing::debug!(
            "window recentered on {}: {} requested, {} rejected, {} retained",
            new_center,
            report.requested,
            report.rejected,
            report.retained
        );
        report
    }

    /// Rejects every held chunk and forgets the center.
    pub fn clear(&mut self, source: &dyn ChunkSource) -> usize {
        let mut rejected = 0;
        for chunk in self.slots.iter_mut().filter_map(Option::take) {
            source.reject_chunk(&chunk);
            rejected += 1;
        }
        self.center = None;
        rejected
    }

    fn slot_index(&self, coord: ChunkCoord) -> Option<usize> {
        let origin = self.origin()?;
        let d = self.diameter() as i32;
        let (dx, dz) = (coord.x - origin.x, coord.z - origin.z);
        if (0..d).contains(&dx) && (0..d).contains(&dz) {
            Some((dz * d + dx) as usize)
        } else {
            None
        }
    }
}
