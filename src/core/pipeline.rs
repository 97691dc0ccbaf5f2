//! One generation pass: load → merge → compact → generate.

use std::path::PathBuf;

use rayon::prelude::*;

use crate::{
    adapter::{BuildHost, scanner::KeysetDir},
    core::{
        codegen::{CodegenOptions, generate},
        keyset::{CompiledKeyset, KeysetCollection, Lang, count_keys},
        loader,
        merge::{merge, select_keyset_files},
        runtime::RuntimeSource,
        template::Compactor,
    },
    error::{BuildError, CompactionError, LoadError},
};

/// Inputs of a generation pass for one language.
pub struct GenerateRequest<'a> {
    pub lang: &'a Lang,
    /// Keyset directories in merge order.
    pub dirs: &'a [KeysetDir],
    /// Runtime class injected by the prologue.
    pub runtime: &'a RuntimeSource,
    pub options: &'a CodegenOptions,
}

/// Output of a successful pass.
#[derive(Debug)]
pub struct Artifact {
    pub text: String,
    /// Keyset files that went into the artifact, in merge order.
    pub sources: Vec<PathBuf>,
    pub keyset_count: usize,
    pub key_count: usize,
}

/// Run a generation pass.
///
/// Keyset files are loaded in parallel while the runtime class is read. The
/// first failure aborts the pass and no text is produced.
pub fn generate_artifact(
    host: &dyn BuildHost,
    compactor: &Compactor,
    request: &GenerateRequest<'_>,
) -> Result<Artifact, BuildError> {
    let sources = select_keyset_files(request.dirs, request.lang);

    let (class_source, collections) = rayon::join(
        || request.runtime.read(host),
        || load_all(host, &sources),
    );
    let collections = collections?;
    let class_source = class_source?;

    let merged = merge(collections);
    let key_count = count_keys(&merged);
    let compiled = compile_keysets(compactor, &merged)?;

    let text = generate(request.lang, &class_source, &compiled, request.options);
    Ok(Artifact {
        text,
        keyset_count: compiled.len(),
        key_count,
        sources,
    })
}

/// Load every file concurrently, keeping input order.
pub fn load_all(
    host: &dyn BuildHost,
    paths: &[PathBuf],
) -> Result<Vec<KeysetCollection>, LoadError> {
    paths
        .par_iter()
        .map(|path| {
            host.invalidate(path);
            loader::load(host, path)
        })
        .collect()
}

/// Compact every value of every keyset, in keyset name order.
pub fn compile_keysets(
    compactor: &Compactor,
    keysets: &KeysetCollection,
) -> Result<Vec<CompiledKeyset>, CompactionError> {
    let keysets: Vec<_> = keysets.iter().collect();
    keysets
        .into_par_iter()
        .map(|(name, keyset)| {
            let entries = keyset
                .iter()
                .map(|(key, template)| {
                    compactor
                        .compact(template)
                        .map(|expr| (key.to_string(), expr))
                        .map_err(|source| CompactionError {
                            keyset: name.clone(),
                            key: key.to_string(),
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(CompiledKeyset {
                name: name.clone(),
                entries,
            })
        })
        .collect()
}
