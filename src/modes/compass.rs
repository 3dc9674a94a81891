// TapWatch - Compass & Calibration Screens

use anyhow::Result;
use embedded_graphics::pixelcolor::{Rgb565, RgbColor, WebColors};

use crate::compass::{self, HeadingCursor};
use crate::config::*;
use crate::events::{SleepReason, UiMode};
use crate::orientation::Orientation;
use crate::platform::{Accelerometer, Button, CalibrationStore, Clock, Magnetometer, Platform, WatchDisplay};
use crate::render;
use crate::watch::Watch;

impl<P: Platform> Watch<'_, P> {
    /// Portrait compass. The needle eases one degree per frame toward the
    /// measured heading. A press after the grace period goes back to the
    /// clock; running the full duration goes to sleep.
    pub(crate) fn run_compass(&mut self) -> Result<UiMode> {
        if self.board.magnetometer.is_none() {
            return self.no_compass();
        }

        self.state.orientation = Orientation::VerticalUp;
        self.board.display.set_orientation(Orientation::VerticalUp)?;
        render::clear(&mut self.board.display)?;
        render::compass_chrome(&mut self.board.display)?;

        let started = self.board.clock.now_ms();
        let mut cursor = HeadingCursor::new(0);
        log::debug!("Compass on");

        loop {
            let elapsed = self.board.clock.now_ms() - started;
            if elapsed >= COMPASS_DURATION_MS {
                return Ok(UiMode::Sleeping(SleepReason::Timeout));
            }
            if elapsed > COMPASS_GRACE_MS && self.board.button.is_pressed() {
                log::debug!("Compass closed after {} ms", elapsed);
                self.await_release();
                self.face_horizontal()?;
                return Ok(UiMode::ClockDisplay);
            }

            let raw = match self.board.magnetometer.as_mut() {
                Some(mag) => mag.read_magnetic()?,
                None => return self.no_compass(),
            };
            let field = self.state.calibration.apply(raw);
            let accel = self.board.accel.read_acceleration()?;
            let target = compass::heading(field, accel);

            let previous = cursor.degrees();
            let direction = cursor.advance(target);
            let (label, reciprocal) = compass::cardinal(target);

            self.board.display.set_orientation(Orientation::VerticalDown)?;
            render::compass_needle(&mut self.board.display, previous, cursor.degrees(), direction)?;
            render::compass_label(&mut self.board.display, reciprocal)?;
            self.board.display.set_orientation(Orientation::VerticalUp)?;
            render::compass_label(&mut self.board.display, label)?;

            self.board.clock.delay_ms(COMPASS_FRAME_MS);
        }
    }

    /// Sample extremes while the user rotates the watch, then persist.
    pub(crate) fn run_calibration(&mut self) -> Result<UiMode> {
        if self.board.magnetometer.is_none() {
            return self.no_compass();
        }

        self.face_horizontal()?;
        render::notice(&mut self.board.display, "Rotate", Rgb565::CSS_PURPLE)?;
        log::info!("Calibrating magnetometer, {} samples", CALIBRATION_SAMPLES);

        let calibration = match self.board.magnetometer.as_mut() {
            Some(mag) => mag.calibrate(CALIBRATION_SAMPLES, CALIBRATION_DELAY_MS)?,
            None => return self.no_compass(),
        };
        self.board.store.save(&calibration.to_record())?;
        self.state.calibration = calibration;
        log::info!(
            "Calibration saved: offset {:?} scale {:?}",
            calibration.offset,
            calibration.scale
        );

        self.confirm_saved()?;
        Ok(UiMode::Sleeping(SleepReason::Done))
    }

    fn no_compass(&mut self) -> Result<UiMode> {
        log::warn!("No magnetometer on this board");
        self.show_notice("No compass", Rgb565::RED, SAVED_CONFIRM_MS)?;
        Ok(UiMode::Sleeping(SleepReason::Done))
    }
}
