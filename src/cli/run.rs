//! Dispatches to the appropriate command handler based on the parsed arguments.
//!
//! Returns `Err` only when a command cannot run at all (bad config, unreadable
//! root, cache write failure). Per-target build failures are part of the
//! returned `CommandResult`.

use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, build::build, init::init},
};

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Build(cmd)) => build(cmd),
        Some(Command::Init) => init(),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
