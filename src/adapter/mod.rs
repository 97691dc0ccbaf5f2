//! Build adapter: everything the generation pipeline needs from the outside.
//!
//! - `BuildHost`: module reads with an explicit cache invalidation hook
//! - `scanner`: keyset directory listings in a stable order
//! - `cache`: file fingerprints and rebuild decisions
//! - `target`: output path templates

pub mod cache;
pub mod scanner;
pub mod target;

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

/// File access used by a generation pass.
///
/// Module reads go through a de-duplicating cache. The pipeline calls
/// `invalidate` for a file immediately before loading it, so repeated passes
/// in one process always observe the file on disk.
pub trait BuildHost: Sync {
    /// Drop any cached copy of `path`.
    fn invalidate(&self, path: &Path);

    /// Read a keyset module, reusing a cached copy when one exists.
    fn read_module(&self, path: &Path) -> io::Result<Arc<str>>;

    /// Read a plain text file, bypassing the module cache.
    fn read_text(&self, path: &Path) -> io::Result<String>;
}

/// `BuildHost` backed by the local file system.
#[derive(Debug, Default)]
pub struct DiskHost {
    modules: Mutex<HashMap<PathBuf, Arc<str>>>,
}

impl DiskHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of modules currently cached.
    pub fn cached_modules(&self) -> usize {
        self.modules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl BuildHost for DiskHost {
    fn invalidate(&self, path: &Path) {
        self.modules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path);
    }

    fn read_module(&self, path: &Path) -> io::Result<Arc<str>> {
        if let Some(cached) = self
            .modules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
        {
            return Ok(Arc::clone(cached));
        }

        // Read outside the lock; loads of different files run in parallel.
        let source: Arc<str> = fs::read_to_string(path)?.into();
        self.modules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf(), Arc::clone(&source));
        Ok(source)
    }

    fn read_text(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}
