//! Blink command handler
//!
//! `piscarLed` accepts:
//! - no arguments: blink forever with the default timing
//! - `<count>`: blink `count` times with the default timing
//! - `<on_ms> <off_ms>`: blink forever with the given timing
//! - `<count> <on_ms> <off_ms>`: blink `count` times with the given timing
//!
//! Any validation failure leaves the controller idle and the pin untouched.

use super::{names, HandlerContext};
use crate::command::{CommandError, CommandResult};
use led_console_shared::{defaults, BlinkPlan, Command};
use tracing::info;

/// Handle `piscarLed`
pub fn handle_blink(ctx: &mut HandlerContext<'_>, command: &Command) -> CommandResult {
    match blink_plan(command) {
        Ok(plan) => {
            ctx.blink.start(plan, ctx.current_time_ms);
            match plan.transitions() {
                Some(transitions) => info!(
                    "[BLINK] Started: on={}ms off={}ms transitions={}",
                    plan.on_ms(),
                    plan.off_ms(),
                    transitions
                ),
                None => info!(
                    "[BLINK] Started: on={}ms off={}ms until stopped",
                    plan.on_ms(),
                    plan.off_ms()
                ),
            }
            CommandResult::silent()
        }
        Err(err) => {
            ctx.blink.stop();
            err.into()
        }
    }
}

fn blink_plan(command: &Command) -> Result<BlinkPlan, CommandError> {
    match command.arguments.as_slice() {
        [] => Ok(BlinkPlan::default()),
        [count] => {
            let blinks = parse_count(count)?;
            BlinkPlan::count(blinks, defaults::ON_DURATION_MS, defaults::OFF_DURATION_MS)
                .ok_or_else(|| invalid_count(count))
        }
        [on, off] => {
            let on_ms = parse_duration(on)?;
            let off_ms = parse_duration(off)?;
            // Zero durations were rejected above, so `forever` always accepts these
            BlinkPlan::forever(on_ms, off_ms).ok_or_else(|| invalid_duration(on))
        }
        [count, on, off] => {
            let blinks = parse_count(count)?;
            let on_ms = parse_duration(on)?;
            let off_ms = parse_duration(off)?;
            BlinkPlan::count(blinks, on_ms, off_ms).ok_or_else(|| invalid_count(count))
        }
        arguments => Err(CommandError::ArityMismatch {
            command: names::BLINK,
            expected: "0, 1, 2 or 3",
            received: arguments.len(),
        }),
    }
}

/// Strictly positive integer, anything else is `None`
fn parse_positive(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().filter(|v| *v > 0)
}

fn parse_count(value: &str) -> Result<u32, CommandError> {
    parse_positive(value).ok_or_else(|| invalid_count(value))
}

fn parse_duration(value: &str) -> Result<u32, CommandError> {
    parse_positive(value).ok_or_else(|| invalid_duration(value))
}

fn invalid_count(value: &str) -> CommandError {
    CommandError::InvalidBlinkCount {
        value: value.to_string(),
    }
}

fn invalid_duration(value: &str) -> CommandError {
    CommandError::InvalidDuration {
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use led_console_shared::parse;

    fn plan(line: &str) -> Result<BlinkPlan, CommandError> {
        blink_plan(&parse(line))
    }

    #[test]
    fn test_no_arguments_blinks_forever() {
        let plan = plan("piscarLed").expect("valid");
        assert_eq!((plan.on_ms(), plan.off_ms(), plan.transitions()), (1000, 1000, None));
    }

    #[test]
    fn test_count_only() {
        let plan = plan("piscarLed 5").expect("valid");
        assert_eq!((plan.on_ms(), plan.off_ms(), plan.transitions()), (1000, 1000, Some(10)));
    }

    #[test]
    fn test_durations_only() {
        let plan = plan("piscarLed 200 300").expect("valid");
        assert_eq!((plan.on_ms(), plan.off_ms(), plan.transitions()), (200, 300, None));
    }

    #[test]
    fn test_count_and_durations() {
        let plan = plan("piscarLed 3 500 250").expect("valid");
        assert_eq!((plan.on_ms(), plan.off_ms(), plan.transitions()), (500, 250, Some(6)));
    }

    #[test]
    fn test_invalid_count() {
        for line in ["piscarLed 0", "piscarLed -2", "piscarLed abc", "piscarLed 0 100 100"] {
            assert!(
                matches!(plan(line), Err(CommandError::InvalidBlinkCount { .. })),
                "{line}"
            );
        }
    }

    #[test]
    fn test_count_overflow_is_invalid_count() {
        assert_eq!(
            plan("piscarLed 4294967295"),
            Err(CommandError::InvalidBlinkCount {
                value: "4294967295".into()
            })
        );
    }

    #[test]
    fn test_invalid_duration() {
        assert_eq!(
            plan("piscarLed 100 0"),
            Err(CommandError::InvalidDuration { value: "0".into() })
        );
        assert_eq!(
            plan("piscarLed 2 -5 100"),
            Err(CommandError::InvalidDuration { value: "-5".into() })
        );
        assert!(matches!(
            plan("piscarLed 1.5 100"),
            Err(CommandError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_duration_error_names_offending_value() {
        assert_eq!(
            plan("piscarLed 250 abc"),
            Err(CommandError::InvalidDuration { value: "abc".into() })
        );
        assert_eq!(
            plan("piscarLed 0 250"),
            Err(CommandError::InvalidDuration { value: "0".into() })
        );
        assert_eq!(
            plan("piscarLed 2 250 10abc"),
            Err(CommandError::InvalidDuration { value: "10abc".into() })
        );
    }

    #[test]
    fn test_count_checked_before_durations() {
        assert!(matches!(
            plan("piscarLed 0 0 0"),
            Err(CommandError::InvalidBlinkCount { .. })
        ));
    }

    #[test]
    fn test_too_many_arguments() {
        assert_eq!(
            plan("piscarLed 1 2 3 4"),
            Err(CommandError::ArityMismatch {
                command: "piscarLed",
                expected: "0, 1, 2 or 3",
                received: 4
            })
        );
    }
}
