//! Line console over a transport
//!
//! This module handles:
//! - Framing incoming bytes into command lines
//! - Writing replies back with CRLF line endings
//! - Reporting framing errors to the user without stopping

mod manager;

pub use manager::{Console, ConsoleEvent};
