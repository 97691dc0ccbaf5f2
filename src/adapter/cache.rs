//! Fingerprint cache used to decide whether a target must be regenerated.
//!
//! The cache lives in one JSON file per output directory and holds, for each
//! target path, named file fingerprints (e.g. the runtime class file under
//! `i18n-file`), named file lists (the keyset files that went into it) and
//! named settings that shape the output (e.g. the module name).

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    time::UNIX_EPOCH,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CACHE_FILE_NAME: &str = ".langjs-cache.json";

/// Size and modification time of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub path: PathBuf,
    pub size: u64,
    /// Milliseconds since the Unix epoch.
    pub mtime: u64,
}

impl FileInfo {
    pub fn read(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let mtime = metadata
            .modified()?
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Ok(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
            mtime,
        })
    }
}

/// Cached state of one target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetCache {
    #[serde(default)]
    pub files: BTreeMap<String, FileInfo>,
    #[serde(default)]
    pub file_lists: BTreeMap<String, Vec<FileInfo>>,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

impl TargetCache {
    /// True when the file under `key` was never recorded or changed since.
    pub fn needs_rebuild_file(&self, key: &str, path: &Path) -> bool {
        match (self.files.get(key), FileInfo::read(path)) {
            (Some(cached), Ok(current)) => *cached != current,
            _ => true,
        }
    }

    pub fn cache_file_info(&mut self, key: &str, path: &Path) -> io::Result<()> {
        self.files.insert(key.to_string(), FileInfo::read(path)?);
        Ok(())
    }

    /// True when the file list under `key` differs in membership, order or content.
    pub fn needs_rebuild_file_list(&self, key: &str, paths: &[PathBuf]) -> bool {
        let Some(cached) = self.file_lists.get(key) else {
            return true;
        };
        if cached.len() != paths.len() {
            return true;
        }
        cached
            .iter()
            .zip(paths)
            .any(|(info, path)| match FileInfo::read(path) {
                Ok(current) => *info != current,
                Err(_) => true,
            })
    }

    pub fn cache_file_list(&mut self, key: &str, paths: &[PathBuf]) -> io::Result<()> {
        let infos = paths
            .iter()
            .map(|path| FileInfo::read(path))
            .collect::<io::Result<Vec<_>>>()?;
        self.file_lists.insert(key.to_string(), infos);
        Ok(())
    }

    /// True when the setting under `key` was never recorded or had another value.
    pub fn needs_rebuild_setting(&self, key: &str, value: &str) -> bool {
        self.settings.get(key).map(String::as_str) != Some(value)
    }

    pub fn cache_setting(&mut self, key: &str, value: impl Into<String>) {
        self.settings.insert(key.to_string(), value.into());
    }
}

/// All cached targets of an output directory.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BuildCache {
    #[serde(default)]
    targets: BTreeMap<String, TargetCache>,
    #[serde(skip)]
    path: PathBuf,
}

impl BuildCache {
    /// Load the cache from `path`; a missing or unreadable cache is empty.
    pub fn load(path: &Path) -> Self {
        let targets = fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str::<BuildCache>(&content).ok())
            .map(|cache| cache.targets)
            .unwrap_or_default();
        Self {
            targets,
            path: path.to_path_buf(),
        }
    }

    pub fn target(&self, target: &Path) -> Option<&TargetCache> {
        self.targets.get(&cache_key(target))
    }

    pub fn set_target(&mut self, target: &Path, cache: TargetCache) {
        self.targets.insert(cache_key(target), cache);
    }

    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize build cache")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write build cache: {}", self.path.display()))
    }
}

fn cache_key(target: &Path) -> String {
    target.to_string_lossy().to_string()
}
