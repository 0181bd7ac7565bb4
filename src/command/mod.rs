//! Command dispatch for the LED console
//!
//! This module handles:
//! - Looking up parsed commands in the handler table
//! - Running the matching handler against the device state
//! - Turning handler outcomes into reply lines for the transport

mod dispatcher;
mod error;
pub mod handlers;

pub use dispatcher::{CommandEntry, CommandResult, Dispatcher};
pub use error::CommandError;
