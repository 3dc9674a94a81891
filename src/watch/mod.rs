// TapWatch - UI State Machine
//
// One `Watch` owns the board and walks the mode graph. Each mode runs to
// completion inside `step` and hands back the next mode; the dispatcher
// clears the screen on every switch and keeps the wake latch armed only
// where ambient taps are counted.

use anyhow::Result;
use embedded_graphics::pixelcolor::Rgb565;

use crate::battery::{self, BatteryLevel};
use crate::calibration::Calibration;
use crate::config::*;
use crate::events::{SleepReason, UiMode};
use crate::input::{self, GestureCount, WakeLatch};
use crate::orientation::{horizontal_rotation, Orientation};
use crate::platform::{
    Accelerometer, BatterySense, Board, CalibrationStore, Clock, Platform, StatusLed, WatchDisplay,
};
use crate::render;


/// Everything that survives a mode switch.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceState {
    pub mode: UiMode,
    pub orientation: Orientation,
    /// Ambient taps not yet resolved.
    pub gestures: GestureCount,
    pub calibration: Calibration,
}

impl DeviceState {
    pub fn new() -> Self {
        Self {
            mode: UiMode::ClockDisplay,
            orientation: Orientation::default(),
            gestures: GestureCount::default(),
            calibration: Calibration::IDENTITY,
        }
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one `Watch::step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue(UiMode),
    /// Deep sleep was requested. On hardware execution never gets here.
    PoweredDown,
}

pub struct Watch<'l, P: Platform> {
    pub(crate) board: Board<P>,
    pub(crate) state: DeviceState,
    pub(crate) latch: &'l WakeLatch,
    pub(crate) profile: Profile,
}

impl<'l, P: Platform> Watch<'l, P> {
    pub fn new(board: Board<P>, latch: &'l WakeLatch, profile: Profile) -> Self {
        Self {
            board,
            state: DeviceState::new(),
            latch,
            profile,
        }
    }

    /// Restore persisted state and bring the panel up in the default
    /// landscape rotation.
    pub fn boot(&mut self) -> Result<()> {
        self.state.calibration = match self.board.store.load() {
            Ok(Some(record)) => match record.parse::<Calibration>() {
                Ok(calibration) => {
                    log::info!("Calibration loaded: {:?}", calibration);
                    calibration
                }
                Err(e) => {
                    log::warn!("Calibration record unreadable ({:#}), using identity", e);
                    Calibration::IDENTITY
                }
            },
            Ok(None) => {
                log::info!("No calibration record, using identity");
                Calibration::IDENTITY
            }
            Err(e) => {
                log::warn!("Calibration store unavailable ({:#}), using identity", e);
                Calibration::IDENTITY
            }
        };

        if self.board.magnetometer.is_none() {
            log::warn!("Magnetometer not found, compass disabled");
        }

        self.state.mode = UiMode::ClockDisplay;
        self.state.gestures.reset();
        self.state.orientation = Orientation::default();
        self.board.display.set_sleep(false)?;
        self.board.display.set_orientation(self.state.orientation)?;
        render::clear(&mut self.board.display)?;
        self.latch.arm();
        Ok(())
    }

    /// Step until the watch powers down.
    pub fn run(&mut self) -> Result<()> {
        loop {
            if self.step()? == Flow::PoweredDown {
                return Ok(());
            }
        }
    }

    /// Run the current mode to completion and switch to the next one.
    pub fn step(&mut self) -> Result<Flow> {
        let mode = self.state.mode;
        let next = match mode {
            UiMode::Sleeping(reason) => match self.sleep(reason)? {
                Some(redirect) => redirect,
                None => return Ok(Flow::PoweredDown),
            },
            _ if self.battery_critical()? => UiMode::Sleeping(SleepReason::BatteryCritical),
            UiMode::ClockDisplay => self.run_clock()?,
            UiMode::DateOverlay => self.run_date_overlay()?,
            UiMode::MenuOverlay => self.run_menu()?,
            UiMode::Calendar => self.run_calendar()?,
            UiMode::TimeEditor => self.run_time_editor()?,
            UiMode::DateEditor => self.run_date_editor()?,
            UiMode::Compass => self.run_compass()?,
            UiMode::Calibration => self.run_calibration()?,
            UiMode::WifiScan => self.run_wifi_scan()?,
            UiMode::Game => self.run_placeholder()?,
        };

        self.transition(next)?;
        Ok(Flow::Continue(next))
    }

    fn transition(&mut self, next: UiMode) -> Result<()> {
        log::debug!("Mode {:?} -> {:?}", self.state.mode, next);

        if next.keeps_latch_armed() {
            self.latch.arm();
        } else {
            self.latch.disarm();
        }
        if !matches!(next, UiMode::Sleeping(_)) {
            render::clear(&mut self.board.display)?;
        }
        self.state.mode = next;
        Ok(())
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DeviceState {
        &mut self.state
    }

    pub fn board(&self) -> &Board<P> {
        &self.board
    }

    // -----------------------------------------------------------------------
    // Helpers shared by the modes
    // -----------------------------------------------------------------------

    pub(crate) fn battery_level(&mut self) -> Result<BatteryLevel> {
        let raw = self.board.battery.read_raw()?;
        Ok(battery::gauge(raw, &self.profile.battery))
    }

    fn battery_critical(&mut self) -> Result<bool> {
        let level = self.battery_level()?;
        if level.is_critical() {
            log::warn!("Battery critical, forcing sleep");
        }
        Ok(level.is_critical())
    }

    /// Rotate into landscape for menu-style screens and clear.
    pub(crate) fn face_horizontal(&mut self) -> Result<()> {
        let accel = self.board.accel.read_acceleration()?;
        let orientation = horizontal_rotation(accel.x);
        self.state.orientation = orientation;
        self.board.display.set_orientation(orientation)?;
        render::clear(&mut self.board.display)
    }

    pub(crate) fn deadline(&self, ms: u64) -> u64 {
        self.board.clock.now_ms() + ms
    }

    pub(crate) fn expired(&self, deadline: u64) -> bool {
        self.board.clock.now_ms() >= deadline
    }

    /// After a commit, let go of the button before anything else reads it.
    pub(crate) fn await_release(&mut self) {
        let deadline = self.deadline(RELEASE_TIMEOUT_MS);
        if !input::wait_release(&mut self.board.button, &mut self.board.clock, deadline) {
            log::warn!("Button still held after {} ms", RELEASE_TIMEOUT_MS);
        }
    }

    pub(crate) fn show_notice(&mut self, message: &str, color: Rgb565, ms: u32) -> Result<()> {
        self.face_horizontal()?;
        render::notice(&mut self.board.display, message, color)?;
        self.board.clock.delay_ms(ms);
        Ok(())
    }

    /// "Saved" with the status LED lit for the same time.
    pub(crate) fn confirm_saved(&mut self) -> Result<()> {
        self.face_horizontal()?;
        render::saved(&mut self.board.display)?;
        self.board.led.set(true)?;
        self.board.clock.delay_ms(SAVED_CONFIRM_MS);
        self.board.led.set(false)
    }
}
