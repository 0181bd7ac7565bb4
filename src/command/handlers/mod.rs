//! Command handlers for the console commands

mod blink;
mod help;
mod led;
mod status;

pub use blink::handle_blink;
pub use help::handle_help;
pub use led::{handle_led_off, handle_led_on};
pub use status::handle_status;

use super::{CommandEntry, CommandError};
use led_console_shared::{BlinkController, Command, LedPin};

/// Command names as typed on the console
pub mod names {
    pub const STATUS: &str = "status";
    pub const LED_ON: &str = "ligarLed";
    pub const BLINK: &str = "piscarLed";
    pub const LED_OFF: &str = "desligarLed";
    pub const HELP: &str = "ajuda";
}

/// The console's command table, scanned in this order
pub static COMMANDS: &[CommandEntry] = &[
    CommandEntry { name: names::STATUS, handler: handle_status },
    CommandEntry { name: names::LED_ON, handler: handle_led_on },
    CommandEntry { name: names::BLINK, handler: handle_blink },
    CommandEntry { name: names::LED_OFF, handler: handle_led_off },
    CommandEntry { name: names::HELP, handler: handle_help },
];

/// State a handler may read or change
pub struct HandlerContext<'a> {
    pub blink: &'a mut BlinkController,
    pub led: &'a mut dyn LedPin,
    /// Milliseconds since boot when the command arrived
    pub current_time_ms: u64,
}

/// Reject any arguments for commands that take none
fn expect_no_arguments(command_name: &'static str, command: &Command) -> Result<(), CommandError> {
    match command.arg_count() {
        0 => Ok(()),
        received => Err(CommandError::ArityMismatch {
            command: command_name,
            expected: "0",
            received,
        }),
    }
}
