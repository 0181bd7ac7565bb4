//! Errors reported back to the console user

use thiserror::Error;

/// Why a command was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("invalid command: {name}")]
    UnknownCommand { name: String },

    #[error("'{command}' expects {expected} argument(s), received {received}")]
    ArityMismatch {
        command: &'static str,
        expected: &'static str,
        received: usize,
    },

    #[error("blink count must be greater than zero (got '{value}')")]
    InvalidBlinkCount { value: String },

    #[error("on/off times must be greater than zero milliseconds (got '{value}')")]
    InvalidDuration { value: String },
}

impl CommandError {
    /// Extra line printed after the error, if any
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CommandError::UnknownCommand { .. } => {
                Some("Type 'ajuda' to list the available commands.")
            }
            _ => None,
        }
    }
}
