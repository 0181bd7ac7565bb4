//! LED Console Shared Types
//!
//! This crate provides the command parser, the non-blocking blink state
//! machine and the serial line codec used by the LED console binary.
//! Nothing in here performs I/O; time is always passed in as milliseconds.

pub mod blink;
pub mod codec;
pub mod command;
pub mod gpio;

use std::time::Instant;

// Re-export commonly used types at crate root
pub use blink::{BlinkController, BlinkPlan, BlinkState, TickResult};
pub use command::{parse, Command, MAX_ARGS};
pub use gpio::{LedPin, Level};

/// Default blink parameters
pub mod defaults {
    /// LED on time when `piscarLed` is given no durations
    pub const ON_DURATION_MS: u32 = 1000;

    /// LED off time when `piscarLed` is given no durations
    pub const OFF_DURATION_MS: u32 = 1000;

    /// A visible blink is one off->on and one on->off change
    pub const TRANSITIONS_PER_BLINK: u32 = 2;

    /// Longest accepted input line, in bytes
    pub const MAX_LINE_LEN: usize = 256;
}

/// Monotonic clock counting milliseconds since it was started
#[derive(Debug, Clone, Copy)]
pub struct Uptime {
    started: Instant,
}

impl Uptime {
    /// Start counting from now
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Milliseconds elapsed since [`Uptime::start`]
    pub fn millis(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

impl Default for Uptime {
    fn default() -> Self {
        Self::start()
    }
}
