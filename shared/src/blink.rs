//! Non-blocking LED blink state machine
//!
//! The controller never sleeps. Each call to [`BlinkController::tick`]
//! compares the time since the last phase change with the configured on/off
//! durations and flips the pin when the phase has run its course.

use crate::defaults;
use crate::gpio::{LedPin, Level};

/// Whether a blink sequence is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkState {
    /// Pin is left alone by the tick
    Idle,
    /// Pin alternates between on and off phases
    Blinking,
}

/// Outcome of one tick evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// No sequence running, nothing written
    Idle,
    /// Current phase has not elapsed yet
    Holding,
    /// Pin was driven to the given level, sequence continues
    Switched(Level),
    /// Pin was driven to the given level and the last transition was used up
    Finished(Level),
}

/// A validated blink configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkPlan {
    on_ms: u32,
    off_ms: u32,
    /// `None` blinks until stopped
    transitions: Option<u32>,
}

impl BlinkPlan {
    /// Blink until stopped. Returns `None` if either duration is zero.
    pub fn forever(on_ms: u32, off_ms: u32) -> Option<Self> {
        if on_ms == 0 || off_ms == 0 {
            return None;
        }
        Some(Self {
            on_ms,
            off_ms,
            transitions: None,
        })
    }

    /// Blink `blinks` times. Returns `None` if any value is zero or the
    /// transition count does not fit in a `u32`.
    pub fn count(blinks: u32, on_ms: u32, off_ms: u32) -> Option<Self> {
        if blinks == 0 {
            return None;
        }
        let transitions = blinks.checked_mul(defaults::TRANSITIONS_PER_BLINK)?;
        let mut plan = Self::forever(on_ms, off_ms)?;
        plan.transitions = Some(transitions);
        Some(plan)
    }

    pub fn on_ms(&self) -> u32 {
        self.on_ms
    }

    pub fn off_ms(&self) -> u32 {
        self.off_ms
    }

    /// Number of level changes before the sequence ends, `None` if unbounded
    pub fn transitions(&self) -> Option<u32> {
        self.transitions
    }
}

impl Default for BlinkPlan {
    fn default() -> Self {
        Self {
            on_ms: defaults::ON_DURATION_MS,
            off_ms: defaults::OFF_DURATION_MS,
            transitions: None,
        }
    }
}

/// Blink timing state shared by the LED handlers and the main loop tick
#[derive(Debug)]
pub struct BlinkController {
    active: bool,
    on_duration_ms: u32,
    off_duration_ms: u32,
    remaining_transitions: Option<u32>,
    last_on_ms: u64,
    last_off_ms: u64,
}

impl Default for BlinkController {
    fn default() -> Self {
        Self::new()
    }
}

impl BlinkController {
    /// Create an idle controller with the default 1s/1s timing
    pub fn new() -> Self {
        Self {
            active: false,
            on_duration_ms: defaults::ON_DURATION_MS,
            off_duration_ms: defaults::OFF_DURATION_MS,
            remaining_transitions: None,
            last_on_ms: 0,
            last_off_ms: 0,
        }
    }

    pub fn state(&self) -> BlinkState {
        if self.active {
            BlinkState::Blinking
        } else {
            BlinkState::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn on_duration_ms(&self) -> u32 {
        self.on_duration_ms
    }

    pub fn off_duration_ms(&self) -> u32 {
        self.off_duration_ms
    }

    /// Transitions left in the current sequence, `None` if unbounded
    pub fn remaining_transitions(&self) -> Option<u32> {
        self.remaining_transitions
    }

    /// Apply `plan` and enter the blinking state.
    ///
    /// The start time counts as the beginning of an on phase, so a pin that
    /// is already high stays high for a full on duration first. A low pin
    /// keeps its off phase timed from the last off switch, so after a long
    /// idle period it switches on at the first tick.
    pub fn start(&mut self, plan: BlinkPlan, current_time_ms: u64) {
        self.on_duration_ms = plan.on_ms;
        self.off_duration_ms = plan.off_ms;
        self.remaining_transitions = plan.transitions;
        self.last_on_ms = current_time_ms;
        self.active = true;
    }

    /// Return to idle. Timing fields are kept, the pin is not touched.
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Advance the state machine. Writes `pin` only when blinking and the
    /// current phase has elapsed.
    pub fn tick(&mut self, current_time_ms: u64, pin: &mut dyn LedPin) -> TickResult {
        if !self.active {
            return TickResult::Idle;
        }
        if self.remaining_transitions == Some(0) {
            self.active = false;
            return TickResult::Idle;
        }

        let next = match pin.level() {
            Level::Low if self.phase_elapsed(current_time_ms, self.last_off_ms, self.off_duration_ms) => {
                self.last_on_ms = current_time_ms;
                Level::High
            }
            Level::High if self.phase_elapsed(current_time_ms, self.last_on_ms, self.on_duration_ms) => {
                self.last_off_ms = current_time_ms;
                Level::Low
            }
            _ => return TickResult::Holding,
        };
        pin.set_level(next);

        if let Some(remaining) = self.remaining_transitions.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }

        if self.remaining_transitions == Some(0) {
            self.active = false;
            TickResult::Finished(next)
        } else {
            TickResult::Switched(next)
        }
    }

    fn phase_elapsed(&self, current_time_ms: u64, phase_start_ms: u64, duration_ms: u32) -> bool {
        current_time_ms.saturating_sub(phase_start_ms) >= u64::from(duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct TestPin {
        level: Level,
        writes: u32,
    }

    impl LedPin for TestPin {
        fn set_level(&mut self, level: Level) {
            self.level = level;
            self.writes += 1;
        }

        fn level(&self) -> Level {
            self.level
        }
    }

    /// Tick every `step_ms` until `end_ms`, returning the number of level changes
    fn run(fsm: &mut BlinkController, pin: &mut TestPin, start_ms: u64, end_ms: u64, step_ms: u64) -> u32 {
        let mut transitions = 0;
        let mut now = start_ms;
        while now <= end_ms {
            if let TickResult::Switched(_) | TickResult::Finished(_) = fsm.tick(now, pin) {
                transitions += 1;
            }
            now += step_ms;
        }
        transitions
    }

    #[test]
    fn test_initial_state() {
        let fsm = BlinkController::new();
        assert_eq!(fsm.state(), BlinkState::Idle);
        assert_eq!(fsm.on_duration_ms(), 1000);
        assert_eq!(fsm.off_duration_ms(), 1000);
    }

    #[test]
    fn test_idle_tick_never_writes() {
        let mut fsm = BlinkController::new();
        let mut pin = TestPin::default();

        for now in (0..10_000).step_by(100) {
            assert_eq!(fsm.tick(now, &mut pin), TickResult::Idle);
        }
        assert_eq!(pin.writes, 0);
    }

    #[test]
    fn test_five_blinks_make_ten_transitions() {
        let mut fsm = BlinkController::new();
        let mut pin = TestPin::default();

        let plan = BlinkPlan::count(5, 1000, 1000).expect("valid plan");
        fsm.start(plan, 0);
        assert_eq!(fsm.remaining_transitions(), Some(10));

        let transitions = run(&mut fsm, &mut pin, 0, 60_000, 10);
        assert_eq!(transitions, 10);
        assert_eq!(fsm.state(), BlinkState::Idle);
        assert_eq!(fsm.remaining_transitions(), Some(0));
        assert_eq!(pin.level, Level::Low);
        assert_eq!(pin.writes, 10);
    }

    #[test]
    fn test_counted_blink_timeline() {
        let mut fsm = BlinkController::new();
        let mut pin = TestPin::default();

        fsm.start(BlinkPlan::count(3, 500, 250).expect("valid plan"), 0);

        assert_eq!(fsm.tick(249, &mut pin), TickResult::Holding);
        assert_eq!(fsm.tick(250, &mut pin), TickResult::Switched(Level::High));
        assert_eq!(fsm.tick(749, &mut pin), TickResult::Holding);
        assert_eq!(fsm.tick(750, &mut pin), TickResult::Switched(Level::Low));
        assert_eq!(fsm.tick(1000, &mut pin), TickResult::Switched(Level::High));
        assert_eq!(fsm.tick(1500, &mut pin), TickResult::Switched(Level::Low));
        assert_eq!(fsm.tick(1750, &mut pin), TickResult::Switched(Level::High));
        assert_eq!(fsm.remaining_transitions(), Some(1));
        assert_eq!(fsm.tick(2249, &mut pin), TickResult::Holding);
        assert_eq!(fsm.tick(2250, &mut pin), TickResult::Finished(Level::Low));

        assert_eq!(fsm.state(), BlinkState::Idle);
        assert_eq!(pin.level, Level::Low);
        assert_eq!(fsm.tick(10_000, &mut pin), TickResult::Idle);
        assert_eq!(pin.writes, 6);
    }

    #[test]
    fn test_unbounded_keeps_blinking() {
        let mut fsm = BlinkController::new();
        let mut pin = TestPin::default();

        fsm.start(BlinkPlan::default(), 0);
        let transitions = run(&mut fsm, &mut pin, 0, 100_000, 50);

        assert!(transitions >= 99);
        assert_eq!(fsm.state(), BlinkState::Blinking);
        assert_eq!(fsm.remaining_transitions(), None);
    }

    #[test]
    fn test_start_with_led_on_holds_full_on_phase() {
        let mut fsm = BlinkController::new();
        let mut pin = TestPin {
            level: Level::High,
            writes: 0,
        };

        fsm.start(BlinkPlan::forever(400, 100).expect("valid plan"), 5_000);
        assert_eq!(fsm.tick(5_399, &mut pin), TickResult::Holding);
        assert_eq!(fsm.tick(5_400, &mut pin), TickResult::Switched(Level::Low));
        assert_eq!(fsm.tick(5_500, &mut pin), TickResult::Switched(Level::High));
    }

    #[test]
    fn test_late_start_with_led_off_switches_on_first_tick() {
        let mut fsm = BlinkController::new();
        let mut pin = TestPin::default();

        fsm.start(BlinkPlan::count(1, 400, 100).expect("valid plan"), 5_000);
        assert_eq!(fsm.tick(5_000, &mut pin), TickResult::Switched(Level::High));
        assert_eq!(fsm.tick(5_399, &mut pin), TickResult::Holding);
        assert_eq!(fsm.tick(5_400, &mut pin), TickResult::Finished(Level::Low));
        assert_eq!(pin.writes, 2);
    }

    #[test]
    fn test_restart_with_led_off_times_from_last_off_switch() {
        let mut fsm = BlinkController::new();
        let mut pin = TestPin::default();

        fsm.start(BlinkPlan::count(1, 100, 100).expect("valid plan"), 0);
        assert_eq!(fsm.tick(100, &mut pin), TickResult::Switched(Level::High));
        assert_eq!(fsm.tick(200, &mut pin), TickResult::Finished(Level::Low));

        // Off phase started at 200, so a restart at 250 waits until 300
        fsm.start(BlinkPlan::forever(100, 100).expect("valid plan"), 250);
        assert_eq!(fsm.tick(299, &mut pin), TickResult::Holding);
        assert_eq!(fsm.tick(300, &mut pin), TickResult::Switched(Level::High));
    }

    #[test]
    fn test_stop_freezes_pin() {
        let mut fsm = BlinkController::new();
        let mut pin = TestPin::default();

        fsm.start(BlinkPlan::forever(100, 100).expect("valid plan"), 0);
        assert_eq!(fsm.tick(100, &mut pin), TickResult::Switched(Level::High));

        fsm.stop();
        let writes = pin.writes;
        assert_eq!(run(&mut fsm, &mut pin, 100, 5_000, 10), 0);
        assert_eq!(pin.writes, writes);
        assert_eq!(pin.level, Level::High);
    }

    #[test]
    fn test_restart_replaces_configuration() {
        let mut fsm = BlinkController::new();
        let mut pin = TestPin::default();

        fsm.start(BlinkPlan::count(2, 100, 100).expect("valid plan"), 0);
        fsm.tick(100, &mut pin);
        fsm.start(BlinkPlan::forever(300, 200).expect("valid plan"), 150);

        assert_eq!(fsm.on_duration_ms(), 300);
        assert_eq!(fsm.off_duration_ms(), 200);
        assert_eq!(fsm.remaining_transitions(), None);
    }

    #[test]
    fn test_plan_validation() {
        assert!(BlinkPlan::forever(0, 100).is_none());
        assert!(BlinkPlan::forever(100, 0).is_none());
        assert!(BlinkPlan::count(0, 100, 100).is_none());
        assert!(BlinkPlan::count(u32::MAX, 100, 100).is_none());
        assert_eq!(
            BlinkPlan::count(4, 10, 20).map(|p| p.transitions()),
            Some(Some(8))
        );
    }
}
