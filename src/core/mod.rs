//! Generation engine.
//!
//! - `keyset`: data model (keysets, collections, language tags)
//! - `loader`: keyset module parsing with swc
//! - `merge`: file selection and last-writer-wins merging
//! - `template`: template compaction and function layers
//! - `codegen`: artifact text and host bootstrap
//! - `runtime`: runtime class source, bundled or from a file
//! - `pipeline`: one concurrent generation pass per language

pub mod codegen;
pub mod keyset;
pub mod loader;
pub mod merge;
pub mod pipeline;
pub mod runtime;
pub mod template;

pub use codegen::CodegenOptions;
pub use keyset::{CompiledKeyset, Keyset, KeysetCollection, Lang};
pub use pipeline::{Artifact, GenerateRequest, generate_artifact};
pub use runtime::RuntimeSource;
pub use template::Compactor;
