//! Runtime class injected by the prologue of language artifacts.

use std::path::PathBuf;

use crate::{adapter::BuildHost, error::DependencyReadError};

/// Runtime class compiled into the binary.
pub const BUNDLED_RUNTIME: &str = include_str!("../../runtime/i18n.js");

/// Where the runtime class source comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeSource {
    /// The runtime shipped with langjs.
    Bundled,
    /// A user-provided file.
    File(PathBuf),
}

impl RuntimeSource {
    /// Read the runtime class source. The bundled runtime never touches the disk.
    pub fn read(&self, host: &dyn BuildHost) -> Result<String, DependencyReadError> {
        match self {
            RuntimeSource::Bundled => Ok(BUNDLED_RUNTIME.to_string()),
            RuntimeSource::File(path) => {
                host.read_text(path).map_err(|source| DependencyReadError {
                    path: path.clone(),
                    source,
                })
            }
        }
    }

    /// Stable identity of the source, recorded in the build cache.
    ///
    /// The bundled runtime only changes with the langjs version.
    pub fn identity(&self) -> String {
        match self {
            RuntimeSource::Bundled => format!("bundled@{}", env!("CARGO_PKG_VERSION")),
            RuntimeSource::File(path) => format!("file:{}", path.display()),
        }
    }

    pub fn file(&self) -> Option<&PathBuf> {
        match self {
            RuntimeSource::Bundled => None,
            RuntimeSource::File(path) => Some(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{io, path::Path, sync::Arc};

    use super::*;

    struct EmptyHost;

    impl BuildHost for EmptyHost {
        fn invalidate(&self, _path: &Path) {}

        fn read_module(&self, _path: &Path) -> io::Result<Arc<str>> {
            Err(io::Error::new(io::ErrorKind::NotFound, "missing"))
        }

        fn read_text(&self, _path: &Path) -> io::Result<String> {
            Err(io::Error::new(io::ErrorKind::NotFound, "missing"))
        }
    }

    #[test]
    fn test_bundled_runtime_is_read_without_disk_access() {
        let source = RuntimeSource::Bundled.read(&EmptyHost).unwrap();
        assert_eq!(source, BUNDLED_RUNTIME);
        assert!(source.contains("i18n.setLanguage = function"));
        assert!(source.contains("i18n.plural = function"));
    }

    #[test]
    fn test_missing_file_is_dependency_error() {
        let err = RuntimeSource::File(PathBuf::from("vendor/i18n.js"))
            .read(&EmptyHost)
            .unwrap_err();
        assert_eq!(err.path, PathBuf::from("vendor/i18n.js"));
    }

    #[test]
    fn test_identity() {
        assert!(RuntimeSource::Bundled.identity().starts_with("bundled@"));
        assert_eq!(
            RuntimeSource::File(PathBuf::from("/p/i18n.js")).identity(),
            "file:/p/i18n.js"
        );
    }
}
