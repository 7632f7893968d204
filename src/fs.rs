//! Filesystem capability used by the folder-structure detector
//!
//! The engine never touches the disk directly. Hosts pass a [`SourceFs`]:
//! [`DiskFs`] for real workspaces, [`MemoryFs`] for virtual documents.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Read-only view of the files around the document being annotated
pub trait SourceFs: Send + Sync {
    /// Returns true if `path` names an existing file
    fn exists(&self, path: &Path) -> bool;

    /// Content of `path`, or `None` if it is missing or unreadable
    fn read_to_string(&self, path: &Path) -> Option<String>;

    /// Names of the files directly inside `dir`
    fn list_files(&self, dir: &Path) -> Vec<String>;
}

/// [`SourceFs`] backed by `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFs;

impl SourceFs for DiskFs {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Option<String> {
        match std::fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::trace!(path = %path.display(), error = %e, "unreadable file");
                None
            }
        }
    }

    fn list_files(&self, dir: &Path) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };

        entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect()
    }
}

/// In-memory [`SourceFs`] keyed by `/`-separated paths
#[derive(Debug, Default, Clone)]
pub struct MemoryFs {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file
    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    /// Builder-style variant of [`MemoryFs::insert`]
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }
}

impl SourceFs for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> Option<String> {
        self.files.get(path).cloned()
    }

    fn list_files(&self, dir: &Path) -> Vec<String> {
        self.files
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .filter_map(|path| path.file_name())
            .filter_map(|name| name.to_str())
            .map(str::to_string)
            .collect()
    }
}
