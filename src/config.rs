use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::{
    adapter::{
        scanner::is_glob_pattern,
        target::{DEFAULT_TARGET, has_lang_placeholder},
    },
    core::{Lang, RuntimeSource, codegen::DEFAULT_MODULE_NAME},
};

pub const CONFIG_FILE_NAME: &str = ".langjsrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_levels")]
    pub levels: Vec<String>,
    #[serde(default = "default_dir_suffix")]
    pub dir_suffix: String,
    #[serde(default = "default_langs")]
    pub langs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i18n_file: Option<String>,
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default = "default_module_name")]
    pub module_name: String,
}

fn default_levels() -> Vec<String> {
    vec!["blocks".to_string()]
}

fn default_dir_suffix() -> String {
    ".i18n".to_string()
}

fn default_langs() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_target() -> String {
    DEFAULT_TARGET.to_string()
}

fn default_output_dir() -> String {
    "./".to_string()
}

fn default_module_name() -> String {
    DEFAULT_MODULE_NAME.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            levels: default_levels(),
            dir_suffix: default_dir_suffix(),
            langs: default_langs(),
            i18n_file: None,
            target: default_target(),
            output_dir: default_output_dir(),
            base: None,
            module_name: default_module_name(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        for level in &self.levels {
            if is_glob_pattern(level) {
                Pattern::new(level)
                    .with_context(|| format!("Invalid glob pattern in 'levels': \"{}\"", level))?;
            }
        }

        if self.dir_suffix.is_empty() {
            bail!("'dirSuffix' must not be empty");
        }

        if self.langs.is_empty() {
            bail!("'langs' must list at least one language");
        }
        let langs = self.parsed_langs()?;

        if langs.len() > 1 && !has_lang_placeholder(&self.target) {
            bail!(
                "'target' must contain {{lang}} when building several languages: \"{}\"",
                self.target
            );
        }

        Ok(())
    }

    /// Language tags in configured order, duplicates removed.
    pub fn parsed_langs(&self) -> Result<Vec<Lang>> {
        let mut langs: Vec<Lang> = Vec::with_capacity(self.langs.len());
        for tag in &self.langs {
            let lang: Lang = tag.parse().context("Invalid entry in 'langs'")?;
            if !langs.contains(&lang) {
                langs.push(lang);
            }
        }
        Ok(langs)
    }

    /// Runtime class source. `i18nFile` is resolved against `root`; without
    /// it the bundled runtime is used.
    pub fn resolved_runtime(&self, root: &Path) -> RuntimeSource {
        match &self.i18n_file {
            Some(file) => RuntimeSource::File(resolve_path(root, file)),
            None => RuntimeSource::Bundled,
        }
    }

    pub fn resolved_output_dir(&self, root: &Path) -> PathBuf {
        resolve_path(root, &self.output_dir)
    }

    /// Base name substituted for `?` in the target template.
    ///
    /// Defaults to the output directory name, falling back to `bundle`.
    pub fn resolved_base(&self, root: &Path) -> String {
        if let Some(base) = &self.base {
            return base.clone();
        }
        let output_dir = self.resolved_output_dir(root);
        output_dir
            .canonicalize()
            .unwrap_or(output_dir)
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| "bundle".to_string())
    }
}

/// Join `path` onto `root` unless it is absolute.
pub fn resolve_path(root: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p.strip_prefix(".").unwrap_or(p))
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
