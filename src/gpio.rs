//! Simulated LED output
//!
//! Stands in for the board's GPIO driver: it remembers the driven level and
//! logs every change so a console session can be followed from the logs.

use led_console_shared::{LedPin, Level};
use tracing::debug;

/// An LED pin that exists only in memory
#[derive(Debug)]
pub struct SimulatedLed {
    pin: u8,
    level: Level,
    writes: u64,
    changes: u64,
}

impl SimulatedLed {
    /// Create a pin that starts low
    pub fn new(pin: u8) -> Self {
        Self {
            pin,
            level: Level::Low,
            writes: 0,
            changes: 0,
        }
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Number of `set_level` calls, including ones that kept the level
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Number of writes that actually changed the level
    pub fn changes(&self) -> u64 {
        self.changes
    }
}

impl LedPin for SimulatedLed {
    fn set_level(&mut self, level: Level) {
        self.writes += 1;
        if level != self.level {
            self.changes += 1;
            debug!("[LED] GPIO{} {} -> {}", self.pin, self.level, level);
        }
        self.level = level;
    }

    fn level(&self) -> Level {
        self.level
    }
}
