//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `build`: Generate one localization artifact per language
//! - `init`: Initialize langjs configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Build(cmd)) => cmd.args.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

#[derive(Debug, Clone, Parser)]
pub struct BuildArgs {
    /// Project root directory (default: current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Language to build (overrides config file)
    /// Can be specified multiple times: --lang en --lang ru
    #[arg(long = "lang", value_name = "TAG")]
    pub langs: Vec<String>,

    /// Level directory or glob to scan for keyset directories (overrides config file)
    #[arg(long = "level", value_name = "DIR")]
    pub levels: Vec<String>,

    /// Runtime class file injected into language artifacts (overrides config file)
    #[arg(long, value_name = "PATH")]
    pub i18n_file: Option<PathBuf>,

    /// Target file name template, `?` is the base name and `{lang}` the language
    #[arg(long, value_name = "TPL")]
    pub target: Option<String>,

    /// Directory artifacts are written to (overrides config file)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Rebuild every target even if its inputs are unchanged
    #[arg(long)]
    pub force: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct BuildCommand {
    #[command(flatten)]
    pub args: BuildArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Merge keyset files and generate a localization bundle per language
    Build(BuildCommand),
    /// Initialize a new .langjsrc.json configuration file
    Init,
}
