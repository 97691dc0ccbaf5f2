use std::path::PathBuf;

use super::super::ExitStatus;
use crate::core::Lang;

#[derive(Debug)]
pub enum CommandSummary {
    Build(BuildSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct InitSummary {
    /// Config file that was written, or that already existed.
    pub path: PathBuf,
    pub created: bool,
}

#[derive(Debug)]
pub struct BuildSummary {
    /// Targets in configured language order.
    pub targets: Vec<TargetResult>,
    pub keyset_dir_count: usize,
    /// Paths the scanner could not read.
    pub skipped_count: usize,
    pub config_from_file: bool,
    /// Keyset modules held by the read cache at the end of the build.
    pub cached_modules: usize,
    pub layers: Vec<&'static str>,
}

#[derive(Debug)]
pub struct TargetResult {
    pub lang: Lang,
    /// Target path relative to the project root when possible.
    pub display_path: String,
    pub outcome: TargetOutcome,
}

#[derive(Debug)]
pub enum TargetOutcome {
    Built {
        keyset_count: usize,
        key_count: usize,
        /// Keyset files in merge order, relative to the project root.
        sources: Vec<String>,
    },
    UpToDate,
    Failed(String),
}

impl TargetOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, TargetOutcome::Failed(_))
    }
}

/// Result of running langjs commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        if self.error_count > 0 {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}
