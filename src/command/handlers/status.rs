//! Status command handler

use super::{expect_no_arguments, names, HandlerContext};
use crate::command::CommandResult;
use led_console_shared::Command;

/// Handle `status`: reports that the console is alive
pub fn handle_status(_ctx: &mut HandlerContext<'_>, command: &Command) -> CommandResult {
    if let Err(err) = expect_no_arguments(names::STATUS, command) {
        return err.into();
    }
    CommandResult::reply("online")
}
