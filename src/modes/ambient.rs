// TapWatch - Ambient Clock
//
// One minute of clock face at roughly one tick per second. Taps are only
// counted here; what they mean is decided when the minute is over.

use anyhow::Result;

use crate::config::*;
use crate::events::{SleepReason, UiMode};
use crate::input::{resolve, GestureAction};
use crate::orientation::{self, Orientation};
use crate::platform::{Accelerometer, Button, Clock, Platform, RealTimeClock, WatchDisplay};
use crate::render;
use crate::watch::Watch;

impl<P: Platform> Watch<'_, P> {
    pub(crate) fn run_clock(&mut self) -> Result<UiMode> {
        self.state.gestures.reset();
        self.latch.arm();

        // Orientation whose chrome is currently on the panel.
        let mut chrome: Option<Orientation> = None;
        let mut shown_prompt: Option<GestureAction> = None;
        let mut held = false;

        for tick in 0..AMBIENT_TICKS {
            let tick_end = self.board.clock.now_ms() + AMBIENT_TICK_MS;

            let level = self.battery_level()?;
            if level.is_critical() {
                log::warn!("Battery critical at tick {}", tick);
                return Ok(UiMode::Sleeping(SleepReason::BatteryCritical));
            }

            let count = self.state.gestures.value();
            if count == 0 {
                let accel = self.board.accel.read_acceleration()?;
                let facing = orientation::classify(accel.x, accel.y, self.state.orientation);
                if chrome != Some(facing) {
                    log::debug!("Clock face {:?}", facing);
                    self.board.display.set_orientation(facing)?;
                    render::clear(&mut self.board.display)?;
                    render::clock_chrome(&mut self.board.display, facing)?;
                    self.state.orientation = facing;
                    chrome = Some(facing);
                }
                let time = self.board.rtc.read_time()?;
                render::clock_face(&mut self.board.display, facing, &time, tick, &level)?;
            } else {
                // A single tap freezes the face; more show what the taps
                // will open.
                let action = resolve(count, self.profile.calendar_taps, self.profile.menu_taps);
                if action != GestureAction::Sleep && shown_prompt != Some(action) {
                    render::clear(&mut self.board.display)?;
                    render::prompt(&mut self.board.display, prompt_label(action))?;
                    shown_prompt = Some(action);
                }
            }

            // Taps are counted on the sampled level. Edges up to this
            // sample are already reflected in it.
            held = self.board.button.is_pressed();
            self.latch.take();
            if held {
                self.state.gestures.add(1);
            }

            let now = self.board.clock.now_ms();
            if tick_end > now {
                self.board.clock.delay_ms((tick_end - now) as u32);
            }
        }

        if held {
            // Release of the press seen on the last sample.
            self.latch.take();
        }

        let count = self.state.gestures.value();
        let action = resolve(count, self.profile.calendar_taps, self.profile.menu_taps);
        log::debug!("Ambient minute over: {} tap tick(s) -> {:?}", count, action);

        Ok(match action {
            GestureAction::Calendar => {
                self.state.gestures.reset();
                UiMode::DateOverlay
            }
            GestureAction::Menu => {
                self.state.gestures.reset();
                UiMode::MenuOverlay
            }
            // Leftover taps are resolved again by the sleep controller.
            GestureAction::Sleep => UiMode::Sleeping(SleepReason::AmbientTimeout),
        })
    }

    /// Brief "Date" prompt on the way into the calendar.
    pub(crate) fn run_date_overlay(&mut self) -> Result<UiMode> {
        self.face_horizontal()?;
        render::prompt(&mut self.board.display, prompt_label(GestureAction::Calendar))?;
        self.board.clock.delay_ms(PROMPT_MS as u32);
        Ok(UiMode::Calendar)
    }
}

fn prompt_label(action: GestureAction) -> &'static str {
    match action {
        GestureAction::Menu => "Menu",
        _ => "Date",
    }
}
