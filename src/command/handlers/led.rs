//! Steady LED handlers (on, off)

use super::{expect_no_arguments, names, HandlerContext};
use crate::command::CommandResult;
use led_console_shared::{Command, Level};
use tracing::info;

/// Handle `ligarLed`: cancels any blink and holds the LED on
pub fn handle_led_on(ctx: &mut HandlerContext<'_>, command: &Command) -> CommandResult {
    if let Err(err) = expect_no_arguments(names::LED_ON, command) {
        return err.into();
    }
    set_steady(ctx, Level::High)
}

/// Handle `desligarLed`: cancels any blink and holds the LED off
pub fn handle_led_off(ctx: &mut HandlerContext<'_>, command: &Command) -> CommandResult {
    if let Err(err) = expect_no_arguments(names::LED_OFF, command) {
        return err.into();
    }
    set_steady(ctx, Level::Low)
}

fn set_steady(ctx: &mut HandlerContext<'_>, level: Level) -> CommandResult {
    if ctx.blink.is_active() {
        info!("[BLINK] Cancelled by steady LED command");
    }
    ctx.blink.stop();
    ctx.led.set_level(level);
    info!("[LED] Steady {}", level);
    CommandResult::silent()
}
