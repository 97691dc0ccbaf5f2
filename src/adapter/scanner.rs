use std::{
    fs,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::glob;
use walkdir::WalkDir;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// A file inside a keyset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysetFile {
    /// File name only, e.g. `en.js`.
    pub name: String,
    pub full_path: PathBuf,
}

/// A keyset directory (e.g. `blocks/button/button.i18n`) and its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysetDir {
    pub path: PathBuf,
    /// Files sorted by name.
    pub files: Vec<KeysetFile>,
}

/// Result of scanning levels for keyset directories.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Keyset directories in level order, then path order.
    pub dirs: Vec<KeysetDir>,
    pub skipped_count: usize,
}

/// Collect keyset directories under each level.
///
/// Levels are scanned in the given order; inside a level, directories are
/// visited sorted by file name and their files are listed sorted by name.
/// Merge precedence depends on this order, so it must not depend on the
/// file system's own listing order.
pub fn scan_keyset_dirs(
    base_dir: &Path,
    levels: &[String],
    dir_suffix: &str,
    verbose: bool,
) -> ScanResult {
    let mut result = ScanResult::default();

    for level in expand_levels(base_dir, levels, verbose) {
        for entry in WalkDir::new(&level).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    result.skipped_count += 1;
                    if verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                    continue;
                }
            };

            if !entry.file_type().is_dir() || !is_keyset_dir(entry.path(), dir_suffix) {
                continue;
            }

            match list_files(entry.path()) {
                Ok(files) => result.dirs.push(KeysetDir {
                    path: entry.path().to_path_buf(),
                    files,
                }),
                Err(e) => {
                    result.skipped_count += 1;
                    if verbose {
                        eprintln!(
                            "{} Cannot list {}: {}",
                            "warning:".bold().yellow(),
                            entry.path().display(),
                            e
                        );
                    }
                }
            }
        }
    }

    result
}

fn expand_levels(base_dir: &Path, levels: &[String], verbose: bool) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for level in levels {
        if is_glob_pattern(level) {
            // glob yields matches in alphabetical order
            let full_pattern = base_dir.join(level);
            let pattern_str = full_pattern.to_string_lossy();
            match glob(&pattern_str) {
                Ok(entries) => {
                    paths.extend(entries.flatten().filter(|entry| entry.is_dir()));
                }
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid glob pattern '{}': {}",
                            "warning:".bold().yellow(),
                            level,
                            e
                        );
                    }
                }
            }
        } else {
            let path = base_dir.join(level);
            if path.is_dir() {
                paths.push(path);
            } else if verbose {
                eprintln!(
                    "{} Level does not exist: {}",
                    "warning:".bold().yellow(),
                    path.display()
                );
            }
        }
    }
    paths
}

fn is_keyset_dir(path: &Path, dir_suffix: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.len() > dir_suffix.len() && name.ends_with(dir_suffix))
}

fn list_files(dir: &Path) -> std::io::Result<Vec<KeysetFile>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            files.push(KeysetFile {
                name: name.to_string(),
                full_path: entry.path(),
            });
        }
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}
