// TapWatch - Button Input
//
// One button drives the whole UI. Two primitives are built on top of the
// raw level read:
//   * `GestureCount`, a coarse per-tick accumulator used in ambient mode and
//     resolved into calendar / menu / sleep when the ambient minute ends.
//   * `StepValue::poll`, the field-editing step: a tap advances the value,
//     a hold past `HOLD_THRESHOLD_MS` commits it.
//
// The interrupt handler only touches `WakeLatch`, which the state machine
// drains synchronously.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::config::*;
use crate::platform::{Button, Clock};

// ---------------------------------------------------------------------------
// Ambient gesture counter
// ---------------------------------------------------------------------------

/// What an accumulated ambient count asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    Sleep,
    Calendar,
    Menu,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureCount(u32);

impl GestureCount {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Count one more tick during which the button was asserted.
    pub fn add(&mut self, ticks: u32) {
        self.0 = self.0.saturating_add(ticks);
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Read and reset.
    pub fn take(&mut self) -> u32 {
        std::mem::take(&mut self.0)
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

/// Map an accumulated count onto the action it requests.
pub fn resolve(count: u32, calendar_taps: u32, menu_taps: u32) -> GestureAction {
    if count >= menu_taps {
        GestureAction::Menu
    } else if count >= calendar_taps {
        GestureAction::Calendar
    } else {
        GestureAction::Sleep
    }
}

// ---------------------------------------------------------------------------
// Interrupt latch
// ---------------------------------------------------------------------------

/// Lock-free record of button edges seen by the interrupt handler.
///
/// Edges are only counted while armed, so presses belonging to a field
/// editor or the menu never leak into the ambient tap count.
pub struct WakeLatch {
    armed: AtomicBool,
    edges: AtomicU32,
}

impl WakeLatch {
    pub const fn new() -> Self {
        Self {
            armed: AtomicBool::new(false),
            edges: AtomicU32::new(0),
        }
    }

    /// Called from the button ISR.
    pub fn record(&self) {
        if self.armed.load(Ordering::Acquire) {
            self.edges.fetch_add(1, Ordering::AcqRel);
        }
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::Release);
    }

    /// Stop counting and drop anything already recorded.
    pub fn disarm(&self) {
        self.armed.store(false, Ordering::Release);
        self.edges.store(0, Ordering::Release);
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Edges recorded since the last call.
    pub fn take(&self) -> u32 {
        self.edges.swap(0, Ordering::AcqRel)
    }
}

impl Default for WakeLatch {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Field stepping
// ---------------------------------------------------------------------------

/// Result of one `StepValue::poll`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Button not asserted; nothing changed.
    Idle,
    /// Tap: value advanced by one (wrapping).
    Advanced,
    /// Hold: value unchanged, field is done.
    Committed,
}

/// Bounded editing cursor that wraps from `max` back to `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepValue {
    value: u8,
    min: u8,
    max: u8,
}

impl StepValue {
    /// `value` is clamped into `min..=max`.
    pub fn new(min: u8, max: u8, value: u8) -> Self {
        Self {
            value: value.clamp(min, max),
            min,
            max,
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn advance(&mut self) {
        self.value = if self.value >= self.max {
            self.min
        } else {
            self.value + 1
        };
    }

    /// Poll the button once. Blocks while the button stays asserted, until
    /// either release (tap) or the hold threshold (commit).
    pub fn poll<B, C>(&mut self, button: &mut B, clock: &mut C) -> Step
    where
        B: Button + ?Sized,
        C: Clock + ?Sized,
    {
        if !button.is_pressed() {
            return Step::Idle;
        }

        let pressed_at = clock.now_ms();
        loop {
            if !button.is_pressed() {
                self.advance();
                return Step::Advanced;
            }
            if clock.now_ms().saturating_sub(pressed_at) >= HOLD_THRESHOLD_MS {
                return Step::Committed;
            }
            clock.delay_ms(BUTTON_POLL_MS);
        }
    }
}

/// Block until the button is released or `deadline_ms` passes.
/// Returns `true` on release.
pub fn wait_release<B, C>(button: &mut B, clock: &mut C, deadline_ms: u64) -> bool
where
    B: Button + ?Sized,
    C: Clock + ?Sized,
{
    while button.is_pressed() {
        if clock.now_ms() >= deadline_ms {
            return false;
        }
        clock.delay_ms(BUTTON_POLL_MS);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedButton, SimClock};

    fn rig(presses: &[(u64, u64)]) -> (ScriptedButton, SimClock) {
        let clock = SimClock::new();
        let button = ScriptedButton::new(clock.handle(), presses);
        (button, clock)
    }

    #[test]
    fn resolve_partitions_counts() {
        for v in 0..2 {
            assert_eq!(resolve(v, 2, 5), GestureAction::Sleep);
        }
        for v in 2..5 {
            assert_eq!(resolve(v, 2, 5), GestureAction::Calendar);
        }
        for v in [5, 7, 60, u32::MAX] {
            assert_eq!(resolve(v, 2, 5), GestureAction::Menu);
        }
    }

    #[test]
    fn take_resets_count() {
        let mut count = GestureCount::default();
        count.add(1);
        count.add(1);
        assert_eq!(count.take(), 2);
        assert_eq!(count.value(), 0);
    }

    #[test]
    fn tap_wraps_past_max() {
        let (mut button, mut clock) = rig(&[(0, 150)]);
        let mut hours = StepValue::new(0, 23, 23);
        assert_eq!(hours.poll(&mut button, &mut clock), Step::Advanced);
        assert_eq!(hours.value(), 0);
        assert_eq!(clock.now_ms(), 150);
    }

    #[test]
    fn hold_commits_without_changing_value() {
        let (mut button, mut clock) = rig(&[(0, 5_000)]);
        let mut minutes = StepValue::new(0, 59, 17);
        assert_eq!(minutes.poll(&mut button, &mut clock), Step::Committed);
        assert_eq!(minutes.value(), 17);
        assert_eq!(clock.now_ms(), HOLD_THRESHOLD_MS);
    }

    #[test]
    fn released_button_is_a_no_op() {
        let (mut button, mut clock) = rig(&[]);
        let mut day = StepValue::new(1, 31, 12);
        assert_eq!(day.poll(&mut button, &mut clock), Step::Idle);
        assert_eq!(day.value(), 12);
        assert_eq!(clock.now_ms(), 0);
    }

    #[test]
    fn day_field_wraps_to_one() {
        let (mut button, mut clock) = rig(&[(0, 100)]);
        let mut day = StepValue::new(1, 31, 31);
        day.poll(&mut button, &mut clock);
        assert_eq!(day.value(), 1);
    }

    #[test]
    fn latch_ignores_edges_while_disarmed() {
        let latch = WakeLatch::new();
        latch.record();
        assert_eq!(latch.take(), 0);

        latch.arm();
        latch.record();
        latch.record();
        assert_eq!(latch.take(), 2);
        assert_eq!(latch.take(), 0);

        latch.record();
        latch.disarm();
        assert_eq!(latch.take(), 0);
    }

    #[test]
    fn wait_release_gives_up_at_deadline() {
        let (mut button, mut clock) = rig(&[(0, 10_000)]);
        assert!(!wait_release(&mut button, &mut clock, 500));
        assert!(clock.now_ms() >= 500);
    }
}
