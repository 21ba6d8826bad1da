//! File Registry
//! Paths the assistant has been told about through add/drop commands. This is
//! a cache of intent; nothing here checks what the assistant actually loaded.

use parking_lot::Mutex;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct FileRegistry {
    files: Mutex<HashSet<String>>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the path was not tracked before.
    pub fn add(&self, path: impl Into<String>) -> bool {
        self.files.lock().insert(path.into())
    }

    pub fn add_all<I, S>(&self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut files = self.files.lock();
        files.extend(paths.into_iter().map(Into::into));
    }

    /// Returns true when the path was tracked.
    pub fn remove(&self, path: &str) -> bool {
        self.files.lock().remove(path)
    }

    pub fn clear(&self) {
        self.files.lock().clear();
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.lock().contains(path)
    }

    pub fn len(&self) -> usize {
        self.files.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.lock().is_empty()
    }

    /// Sorted snapshot
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.files.lock().iter().cloned().collect();
        paths.sort();
        paths
    }
}
