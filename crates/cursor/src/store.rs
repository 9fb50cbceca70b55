use std::collections::BTreeMap;

use bytes::Bytes;

/// A source of paths, keyed by object id.
pub trait PathStore {
    /// Returns the full path of an object, if it has one.
    fn get(&self, object_id: &str) -> Option<Bytes>;

    /// Returns every object id in ascending order.
    fn object_ids(&self) -> Vec<String>;
}

/// A path store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    paths: BTreeMap<String, Bytes>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the path of an object, replacing any previous path.
    pub fn put<K: Into<String>>(&mut self, object_id: K, path: Bytes) {
        self.paths.insert(object_id.into(), path);
    }

    pub fn remove(&mut self, object_id: &str) -> Option<Bytes> {
        self.paths.remove(object_id)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl PathStore for MemoryStore {
    fn get(&self, object_id: &str) -> Option<Bytes> {
        self.paths.get(object_id).cloned()
    }

    fn object_ids(&self) -> Vec<String> {
        self.paths.keys().cloned().collect()
    }
}
