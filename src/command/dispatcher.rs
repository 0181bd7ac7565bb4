//! Command dispatcher - finds the handler for a parsed command and runs it

use super::handlers::HandlerContext;
use super::CommandError;
use led_console_shared::Command;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Signature shared by every command handler
pub type HandlerFn = fn(&mut HandlerContext<'_>, &Command) -> CommandResult;

/// One row of the command table
#[derive(Clone, Copy)]
pub struct CommandEntry {
    pub name: &'static str,
    pub handler: HandlerFn,
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry").field("name", &self.name).finish()
    }
}

/// Result of command execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Command ran; each entry is one reply line (may be empty)
    Completed { output: Vec<String> },
    /// Command refused
    Rejected(CommandError),
}

impl CommandResult {
    /// Completed with nothing to print
    pub fn silent() -> Self {
        CommandResult::Completed { output: Vec::new() }
    }

    /// Completed with a single reply line
    pub fn reply(line: impl Into<String>) -> Self {
        CommandResult::Completed {
            output: vec![line.into()],
        }
    }

    #[cfg(test)]
    pub fn is_completed(&self) -> bool {
        matches!(self, CommandResult::Completed { .. })
    }

    /// Text to write back to the transport, one entry per line
    pub fn lines(&self) -> Vec<String> {
        match self {
            CommandResult::Completed { output } => output.clone(),
            CommandResult::Rejected(err) => {
                let mut lines = vec![format!("ERROR: {}", err)];
                if let Some(hint) = err.hint() {
                    lines.push(hint.to_string());
                }
                lines
            }
        }
    }
}

impl From<CommandError> for CommandResult {
    fn from(err: CommandError) -> Self {
        CommandResult::Rejected(err)
    }
}

/// Problems found while building a dispatcher from a table
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableError {
    #[error("command table entry {0} has an empty name")]
    EmptyName(usize),

    #[error("command '{0}' is registered more than once")]
    DuplicateName(&'static str),
}

/// Routes commands to handlers by exact, case-sensitive name
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    table: &'static [CommandEntry],
}

impl Dispatcher {
    /// Create a dispatcher over `table`, rejecting empty and duplicate names
    pub fn new(table: &'static [CommandEntry]) -> Result<Self, TableError> {
        for (index, entry) in table.iter().enumerate() {
            if entry.name.is_empty() {
                return Err(TableError::EmptyName(index));
            }
            if table[..index].iter().any(|e| e.name == entry.name) {
                return Err(TableError::DuplicateName(entry.name));
            }
        }
        Ok(Self { table })
    }

    /// Registered command names in table order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.iter().map(|entry| entry.name)
    }

    /// Find the entry for `name`
    pub fn lookup(&self, name: &str) -> Option<&CommandEntry> {
        self.table.iter().find(|entry| entry.name == name)
    }

    /// Run the handler registered for `command.name`.
    ///
    /// Unknown names, including the empty name of a blank line, are rejected
    /// without touching `ctx`.
    pub fn dispatch(&self, ctx: &mut HandlerContext<'_>, command: &Command) -> CommandResult {
        let Some(entry) = self.lookup(&command.name) else {
            warn!("[CMD] Unknown command: {:?}", command.name);
            return CommandError::UnknownCommand {
                name: command.name.clone(),
            }
            .into();
        };

        debug!(
            "[CMD] Executing {} with {} argument(s)",
            entry.name,
            command.arg_count()
        );

        let result = (entry.handler)(ctx, command);
        if let CommandResult::Rejected(err) = &result {
            warn!("[CMD] {} rejected: {}", entry.name, err);
        }
        result
    }
}
