//! Output path templates.
//!
//! A template such as `?.lang.{lang}.js` becomes `index.lang.en.js` for base
//! name `index` and language `en`.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

pub const DEFAULT_TARGET: &str = "?.lang.{lang}.js";

const BASE_PLACEHOLDER: char = '?';
const LANG_PLACEHOLDER: &str = "{lang}";

/// Substitute the base name and language into a target template.
pub fn resolve_target_name(template: &str, base: &str, lang: &str) -> String {
    template
        .replace(BASE_PLACEHOLDER, base)
        .replace(LANG_PLACEHOLDER, lang)
}

pub fn has_lang_placeholder(template: &str) -> bool {
    template.contains(LANG_PLACEHOLDER)
}

/// Write the artifact in one step: a temporary sibling is written and then
/// renamed over the target, so readers never see a half-written file.
pub fn write_artifact(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let tmp = temp_path(path);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path).inspect_err(|_| {
        let _ = fs::remove_file(&tmp);
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
