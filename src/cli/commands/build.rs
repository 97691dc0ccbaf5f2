//! `langjs build`: one artifact per configured language.
//!
//! Targets are independent, so they are generated in parallel. A target is
//! skipped when its artifact exists and neither the runtime class, the list
//! of keyset files nor the output settings changed since the cached build.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::super::args::{BuildArgs, BuildCommand};
use super::{BuildSummary, CommandResult, CommandSummary, TargetOutcome, TargetResult};
use crate::{
    adapter::{
        DiskHost,
        cache::{BuildCache, CACHE_FILE_NAME, TargetCache},
        scanner::{KeysetDir, scan_keyset_dirs},
        target::{resolve_target_name, write_artifact},
    },
    config::{Config, ConfigLoadResult, load_config},
    core::{
        Artifact, CodegenOptions, Compactor, GenerateRequest, Lang, RuntimeSource,
        generate_artifact, merge::select_keyset_files,
    },
    error::BuildError,
};

/// Cache key of the runtime class fingerprint.
const I18N_FILE_KEY: &str = "i18n-file";
/// Cache key of the keyset file list fingerprint.
const KEYSETS_KEY: &str = "keysets";
/// Cache key of the runtime class identity (bundled version or file path).
const RUNTIME_KEY: &str = "runtime";
/// Cache key of the module name registered by the artifact.
const MODULE_NAME_KEY: &str = "module-name";

struct TargetPlan {
    lang: Lang,
    path: PathBuf,
    sources: Vec<PathBuf>,
}

/// Shared, read-only state of one build.
struct BuildContext<'a> {
    root: &'a Path,
    dirs: &'a [KeysetDir],
    runtime: RuntimeSource,
    options: CodegenOptions,
    host: DiskHost,
    compactor: Compactor,
    force: bool,
}

pub fn build(cmd: BuildCommand) -> Result<CommandResult> {
    let args = &cmd.args;
    let cwd = env::current_dir().context("Failed to read current directory")?;
    let root = match &args.root {
        Some(root) => cwd.join(root),
        None => cwd.clone(),
    };
    let root = root
        .canonicalize()
        .with_context(|| format!("Project root does not exist: {}", root.display()))?;

    let ConfigLoadResult {
        mut config,
        from_file,
    } = load_config(&root)?;
    apply_overrides(&mut config, args, &cwd);
    config.validate()?;
    let langs = config.parsed_langs()?;

    let scan = scan_keyset_dirs(&root, &config.levels, &config.dir_suffix, args.verbose);

    let output_dir = config.resolved_output_dir(&root);
    let base = config.resolved_base(&root);
    let plans: Vec<TargetPlan> = langs
        .into_iter()
        .map(|lang| TargetPlan {
            path: output_dir.join(resolve_target_name(&config.target, &base, lang.as_str())),
            sources: select_keyset_files(&scan.dirs, &lang),
            lang,
        })
        .collect();

    let mut cache = BuildCache::load(&output_dir.join(CACHE_FILE_NAME));
    let ctx = BuildContext {
        root: &root,
        dirs: &scan.dirs,
        runtime: config.resolved_runtime(&root),
        options: CodegenOptions {
            module_name: config.module_name.clone(),
        },
        host: DiskHost::new(),
        compactor: Compactor::localized(),
        force: args.force,
    };

    let outcomes: Vec<(TargetOutcome, Option<TargetCache>)> = plans
        .par_iter()
        .map(|plan| build_target(&ctx, plan, cache.target(&plan.path)))
        .collect();

    let mut targets = Vec::with_capacity(plans.len());
    let mut cache_changed = false;
    for (plan, (outcome, target_cache)) in plans.into_iter().zip(outcomes) {
        if let Some(target_cache) = target_cache {
            cache.set_target(&plan.path, target_cache);
            cache_changed = true;
        }
        targets.push(TargetResult {
            display_path: display_path(&root, &plan.path),
            lang: plan.lang,
            outcome,
        });
    }

    if cache_changed {
        cache.save()?;
    }

    let error_count = targets.iter().filter(|t| t.outcome.is_failed()).count();
    Ok(CommandResult {
        summary: CommandSummary::Build(BuildSummary {
            targets,
            keyset_dir_count: scan.dirs.len(),
            skipped_count: scan.skipped_count,
            config_from_file: from_file,
            cached_modules: ctx.host.cached_modules(),
            layers: ctx.compactor.layer_names(),
        }),
        error_count,
    })
}

/// CLI flags take precedence over the config file. Paths given on the
/// command line are relative to the working directory.
fn apply_overrides(config: &mut Config, args: &BuildArgs, cwd: &Path) {
    if !args.langs.is_empty() {
        config.langs = args.langs.clone();
    }
    if !args.levels.is_empty() {
        config.levels = args.levels.clone();
    }
    if let Some(i18n_file) = &args.i18n_file {
        config.i18n_file = Some(cwd.join(i18n_file).to_string_lossy().to_string());
    }
    if let Some(target) = &args.target {
        config.target = target.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = cwd.join(output_dir).to_string_lossy().to_string();
    }
}

fn build_target(
    ctx: &BuildContext<'_>,
    plan: &TargetPlan,
    cached: Option<&TargetCache>,
) -> (TargetOutcome, Option<TargetCache>) {
    if !ctx.force && plan.path.exists() && is_fresh(ctx, plan, cached) {
        return (TargetOutcome::UpToDate, None);
    }

    let request = GenerateRequest {
        lang: &plan.lang,
        dirs: ctx.dirs,
        runtime: &ctx.runtime,
        options: &ctx.options,
    };
    let artifact = match generate_and_write(ctx, &request, &plan.path) {
        Ok(artifact) => artifact,
        Err(e) => return (TargetOutcome::Failed(e.to_string()), None),
    };

    let outcome = TargetOutcome::Built {
        keyset_count: artifact.keyset_count,
        key_count: artifact.key_count,
        sources: artifact
            .sources
            .iter()
            .map(|source| display_path(ctx.root, source))
            .collect(),
    };
    (outcome, fingerprint(ctx, &artifact).ok())
}

fn is_fresh(ctx: &BuildContext<'_>, plan: &TargetPlan, cached: Option<&TargetCache>) -> bool {
    cached.is_some_and(|cache| {
        !cache.needs_rebuild_setting(RUNTIME_KEY, &ctx.runtime.identity())
            && !cache.needs_rebuild_setting(MODULE_NAME_KEY, &ctx.options.module_name)
            && ctx
                .runtime
                .file()
                .is_none_or(|file| !cache.needs_rebuild_file(I18N_FILE_KEY, file))
            && !cache.needs_rebuild_file_list(KEYSETS_KEY, &plan.sources)
    })
}

fn generate_and_write(
    ctx: &BuildContext<'_>,
    request: &GenerateRequest<'_>,
    path: &Path,
) -> Result<Artifact, BuildError> {
    let artifact = generate_artifact(&ctx.host, &ctx.compactor, request)?;
    write_artifact(path, &artifact.text).map_err(|source| BuildError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(artifact)
}

fn fingerprint(ctx: &BuildContext<'_>, artifact: &Artifact) -> std::io::Result<TargetCache> {
    let mut cache = TargetCache::default();
    cache.cache_setting(RUNTIME_KEY, ctx.runtime.identity());
    cache.cache_setting(MODULE_NAME_KEY, ctx.options.module_name.as_str());
    if let Some(file) = ctx.runtime.file() {
        cache.cache_file_info(I18N_FILE_KEY, file)?;
    }
    cache.cache_file_list(KEYSETS_KEY, &artifact.sources)?;
    Ok(cache)
}

fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
