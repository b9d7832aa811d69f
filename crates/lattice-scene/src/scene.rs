//! The scene collaborator that published chunks are attached to.

use std::sync::{Mutex, PoisonError};

use rustc_hash::FxHashMap;

use crate::object::{ObjectId, ObjectKind, SceneObject};

/// Receives chunk game objects from the streaming workers.
pub trait Scene: Send + Sync {
    /// Attaches an object, returning any object it replaced under the same id.
    fn add_game_object(&self, object: SceneObject) -> Option<SceneObject>;

    /// Detaches an object.
    fn remove_game_object(&self, id: ObjectId) -> Option<SceneObject>;

    fn contains(&self, id: ObjectId) -> bool;

    fn object_count(&self) -> usize;

    /// Counts objects whose kind satisfies `pred`.
    fn count_of(&self, pred: &dyn Fn(&ObjectKind) -> bool) -> usize;
}

/// In-memory [`Scene`] with no rendering attached.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    objects: Mutex<FxHashMap<ObjectId, SceneObject>>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of the object registered under `id`.
    pub fn get(&self, id: ObjectId) -> Option<SceneObject> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }
}

impl Scene for HeadlessScene {
    fn add_game_object(&self, object: SceneObject) -> Option<SceneObject> {
        tracing::trace!("scene add {:?} ({})", object.id, object.kind.label());
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(object.id, object)
    }

    fn remove_game_object(&self, id: ObjectId) -> Option<SceneObject> {
        let removed = self
            .objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        if removed.is_none() {
            tracing::debug!("scene remove of absent object {:?}", id);
        }
        removed
    }

    fn contains(&self, id: ObjectId) -> bool {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&id)
    }

    fn object_count(&self) -> usize {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn count_of(&self, pred: &dyn Fn(&ObjectKind) -> bool) -> usize {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|obj| pred(&obj.kind))
            .count()
    }
}
