//! langjs - localization bundle generator
//!
//! langjs collects keyset files (`<lang>.js` modules inside `*.i18n`
//! directories), merges them per language with last-writer-wins precedence,
//! compiles every template value into a JavaScript expression and writes one
//! self-initializing bundle per language.
//!
//! ## Module Structure
//!
//! - `adapter`: File access, directory scanning, build cache and targets
//! - `cli`: Command-line interface layer (user-facing commands and reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Generation engine (load, merge, compact, generate)
//! - `error`: Error types of a generation pass

pub mod adapter;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
