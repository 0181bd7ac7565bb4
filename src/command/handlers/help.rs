//! Help command handler

use super::{expect_no_arguments, names, HandlerContext};
use crate::command::CommandResult;
use led_console_shared::Command;

/// Command reference printed by `ajuda`
pub const HELP_TEXT: &[&str] = &[
    "Command list:",
    "------------------",
    "status: Shows the current system state.",
    "ligarLed: Turns the LED on continuously.",
    "desligarLed: Turns the LED off.",
    "piscarLed:",
    "  Blinks the LED with different settings:",
    "  - no arguments: blinks forever, 1 second on and 1 second off.",
    "  - <blinks>: blinks the given number of times, 1 second on and 1 second off.",
    "  - <on_ms> <off_ms>: blinks forever with the given times (milliseconds).",
    "  - <blinks> <on_ms> <off_ms>: blinks the given number of times with the given times (milliseconds).",
    "ajuda: Shows this command list.",
    "------------------",
];

/// Handle `ajuda`
pub fn handle_help(_ctx: &mut HandlerContext<'_>, command: &Command) -> CommandResult {
    if let Err(err) = expect_no_arguments(names::HELP, command) {
        return err.into();
    }
    CommandResult::Completed {
        output: HELP_TEXT.iter().map(|line| line.to_string()).collect(),
    }
}
