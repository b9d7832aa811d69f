//! Name-keyed resource cache shared across threads.

use dashmap::DashMap;

/// A concurrent `String -> T` map. Inserting under an existing key replaces
/// the previous value.
#[derive(Debug)]
pub struct Cache<T> {
    entries: DashMap<String, T>,
}

impl<T> Default for Cache<T> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<T: Clone> Cache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, returning the entry it replaced.
    pub fn insert(&self, key: impl Into<String>, value: T) -> Option<T> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<T> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, key: &str) -> Option<T> {
        self.entries.remove(key).map(|(_, value)| value)
    }

    /// Removes the entry only if `pred` accepts its current value.
    ///
    /// The check and the removal happen atomically with respect to other
    /// writers of the same key.
    pub fn remove_if(&self, key: &str, pred: impl FnOnce(&T) -> bool) -> Option<T> {
        self.entries
            .remove_if(key, |_, value| pred(value))
            .map(|(_, value)| value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
