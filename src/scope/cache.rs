use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::FolderBase;

/// Folder-base lookups keyed by `(folder, scope)`.
///
/// Entries live for the whole session; nothing is evicted. Folder keys are
/// lower-cased so the same directory reached with different casing shares
/// one entry.
pub struct FolderBaseCache {
    inner: RwLock<HashMap<(String, String), Arc<FolderBase>>>,
}

impl Default for FolderBaseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FolderBaseCache {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    fn key(folder: &str, scope: &str) -> (String, String) {
        (folder.to_lowercase(), scope.to_string())
    }

    pub fn get(&self, folder: &str, scope: &str) -> Option<Arc<FolderBase>> {
        let map = self.inner.read();
        map.get(&Self::key(folder, scope)).cloned()
    }

    /// Insert unless another caller got there first; returns the cached value.
    pub fn get_or_insert(&self, folder: &str, scope: &str, base: FolderBase) -> Arc<FolderBase> {
        let mut map = self.inner.write();
        map.entry(Self::key(folder, scope))
            .or_insert_with(|| Arc::new(base))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut map = self.inner.write();
        map.clear();
    }
}

impl std::fmt::Debug for FolderBaseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderBaseCache")
            .field("entries", &self.len())
            .finish()
    }
}
