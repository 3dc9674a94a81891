// TapWatch - Calendar

use anyhow::Result;

use crate::config::*;
use crate::events::{weekday_index, SleepReason, UiMode};
use crate::platform::{Button, Clock, Platform, RealTimeClock};
use crate::render;
use crate::watch::Watch;

impl<P: Platform> Watch<'_, P> {
    /// Show the date until a press or the timeout, then sleep.
    pub(crate) fn run_calendar(&mut self) -> Result<UiMode> {
        self.face_horizontal()?;

        let date = self.board.rtc.read_date()?;
        let weekday = weekday_index(date.weekday, self.profile.weekday_base);
        log::debug!("Calendar {:?} (weekday {})", date, weekday);
        render::calendar(&mut self.board.display, &date, weekday)?;

        let deadline = self.deadline(CALENDAR_TIMEOUT_MS);
        while !self.board.button.is_pressed() && !self.expired(deadline) {
            self.board.clock.delay_ms(BUTTON_POLL_MS);
        }

        render::clear(&mut self.board.display)?;
        self.board.clock.delay_ms(CALENDAR_EXIT_MS);
        Ok(UiMode::Sleeping(SleepReason::Done))
    }
}
