//! Runtime configuration
//!
//! Read from `LED_CONSOLE_*` environment variables; anything unset falls back
//! to [`ConsoleConfig::default`].

use anyhow::{anyhow, bail, Result};
use led_console_shared::defaults;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_TRANSPORT: &str = "LED_CONSOLE_TRANSPORT";
pub const ENV_PORT: &str = "LED_CONSOLE_PORT";
pub const ENV_BAUD: &str = "LED_CONSOLE_BAUD";
pub const ENV_TICK_MS: &str = "LED_CONSOLE_TICK_MS";
pub const ENV_MAX_LINE: &str = "LED_CONSOLE_MAX_LINE";
pub const ENV_LED_PIN: &str = "LED_CONSOLE_LED_PIN";

/// Where command lines come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportKind {
    /// Serial device (e.g. "/dev/ttyUSB0" or "COM3")
    Serial { port: String, baud: u32 },
    /// Process stdin/stdout
    Stdio,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Serial { port, baud } => write!(f, "serial {} @ {} baud", port, baud),
            TransportKind::Stdio => write!(f, "stdio"),
        }
    }
}

/// Configuration for the console binary
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Line transport
    pub transport: TransportKind,
    /// How often the blink state machine is evaluated when no input arrives
    pub tick_interval: Duration,
    /// Longest accepted input line in bytes
    pub max_line_len: usize,
    /// GPIO number of the LED, used in logs
    pub led_pin: u8,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::Stdio,
            tick_interval: Duration::from_millis(10),
            max_line_len: defaults::MAX_LINE_LEN,
            led_pin: 2,
        }
    }
}

impl ConsoleConfig {
    pub const DEFAULT_PORT: &'static str = "/dev/ttyUSB0";
    pub const DEFAULT_BAUD: u32 = 115_200;

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let fallback = Self::default();

        let transport = match lookup(ENV_TRANSPORT).as_deref().map(str::trim) {
            None | Some("") | Some("stdio") => TransportKind::Stdio,
            Some("serial") => TransportKind::Serial {
                port: lookup(ENV_PORT).unwrap_or_else(|| Self::DEFAULT_PORT.into()),
                baud: parse_var(&lookup, ENV_BAUD, Self::DEFAULT_BAUD)?,
            },
            Some(other) => bail!("{ENV_TRANSPORT}: unknown transport '{other}' (expected 'serial' or 'stdio')"),
        };

        let tick_ms: u64 = parse_var(&lookup, ENV_TICK_MS, fallback.tick_interval.as_millis() as u64)?;
        if tick_ms == 0 {
            bail!("{ENV_TICK_MS} must be greater than zero");
        }

        let max_line_len: usize = parse_var(&lookup, ENV_MAX_LINE, fallback.max_line_len)?;
        if max_line_len == 0 {
            bail!("{ENV_MAX_LINE} must be greater than zero");
        }

        Ok(Self {
            transport,
            tick_interval: Duration::from_millis(tick_ms),
            max_line_len,
            led_pin: parse_var(&lookup, ENV_LED_PIN, fallback.led_pin)?,
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{key}: invalid value '{raw}': {e}")),
    }
}
