//! Keyset file selection and merging.

use std::path::PathBuf;

use crate::{
    adapter::scanner::KeysetDir,
    core::keyset::{KeysetCollection, Lang},
};

/// Pick the keyset files that belong to `lang`, in directory order.
///
/// Only files named exactly `<lang>.js` participate; everything else in the
/// scanned directories is ignored.
pub fn select_keyset_files(dirs: &[KeysetDir], lang: &Lang) -> Vec<PathBuf> {
    let file_name = lang.keyset_file_name();
    dirs.iter()
        .flat_map(|dir| dir.files.iter())
        .filter(|file| file.name == file_name)
        .map(|file| file.full_path.clone())
        .collect()
}

/// Merge collections key by key; later collections win.
///
/// Two collections that both define a keyset contribute their keys to one
/// merged keyset. A key defined by both keeps the later value.
pub fn merge<I>(collections: I) -> KeysetCollection
where
    I: IntoIterator<Item = KeysetCollection>,
{
    let mut result = KeysetCollection::new();
    for collection in collections {
        for (name, keyset) in collection {
            let merged = result.entry(name).or_default();
            for (key, value) in keyset.iter() {
                merged.insert(key, value);
            }
        }
    }
    result
}
