//! Device state owned by the main loop
//!
//! Holds the command table, the blink controller and the LED pin. Commands
//! and ticks both run through `&mut Device`, so a tick never sees a blink
//! configuration that is only partly applied.

use crate::command::handlers::HandlerContext;
use crate::command::{CommandResult, Dispatcher};
use led_console_shared::{parse, BlinkController, Command, LedPin, TickResult};
use tracing::{debug, info};

pub struct Device<P: LedPin> {
    dispatcher: Dispatcher,
    blink: BlinkController,
    led: P,
}

impl<P: LedPin> Device<P> {
    /// Create a device with an idle blink controller
    pub fn new(dispatcher: Dispatcher, led: P) -> Self {
        Self {
            dispatcher,
            blink: BlinkController::new(),
            led,
        }
    }

    /// Parse and execute one input line
    pub fn handle_line(&mut self, line: &str, current_time_ms: u64) -> CommandResult {
        let command = parse(line);
        debug!("[CMD] Parsed {:?} -> {:?}", line, command);
        self.execute(&command, current_time_ms)
    }

    /// Execute an already parsed command
    pub fn execute(&mut self, command: &Command, current_time_ms: u64) -> CommandResult {
        let mut ctx = HandlerContext {
            blink: &mut self.blink,
            led: &mut self.led,
            current_time_ms,
        };
        self.dispatcher.dispatch(&mut ctx, command)
    }

    /// Advance the blink state machine; call once per loop iteration
    pub fn tick(&mut self, current_time_ms: u64) -> TickResult {
        let result = self.blink.tick(current_time_ms, &mut self.led);
        match result {
            TickResult::Switched(level) => debug!("[BLINK] LED {}", level),
            TickResult::Finished(level) => info!("[BLINK] Sequence finished, LED {}", level),
            TickResult::Idle | TickResult::Holding => {}
        }
        result
    }

    #[cfg(test)]
    pub fn blink(&self) -> &BlinkController {
        &self.blink
    }

    pub fn led(&self) -> &P {
        &self.led
    }
}
