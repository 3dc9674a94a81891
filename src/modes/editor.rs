// TapWatch - Time & Date Editors
//
// Fields are edited one after another: tap steps the active field, hold
// commits it and moves on. The RTC is written once, after the last field,
// and never if the editor times out part way through.

use anyhow::Result;

use crate::config::*;
use crate::events::{weekday_index, CalendarDate, RtcUpdate, SleepReason, UiMode};
use crate::input::{Step, StepValue};
use crate::platform::{Clock, Platform, RealTimeClock};
use crate::render;
use crate::watch::Watch;

enum Chain {
    Committed,
    Abandoned,
}

impl<P: Platform> Watch<'_, P> {
    pub(crate) fn run_time_editor(&mut self) -> Result<UiMode> {
        self.face_horizontal()?;

        let now = self.board.rtc.read_time()?;
        let mut fields = [StepValue::new(0, 23, now.hours), StepValue::new(0, 59, now.minutes)];
        let outcome = self.edit_chain(&mut fields, |d: &mut P::Display, f: &[StepValue], active| {
            render::time_editor(d, f[0].value(), f[1].value(), active)
        })?;

        self.finish_edit(outcome, RtcUpdate::time(fields[0].value(), fields[1].value()))
    }

    /// Day, month and year on one screen, then the weekday on its own.
    pub(crate) fn run_date_editor(&mut self) -> Result<UiMode> {
        self.face_horizontal()?;

        let base = self.profile.weekday_base;
        let today = self.board.rtc.read_date()?;
        let mut fields = [
            StepValue::new(1, 31, today.day),
            StepValue::new(1, 12, today.month),
            StepValue::new(0, 99, today.year),
            StepValue::new(0, 6, weekday_index(today.weekday, base)),
        ];
        let outcome = self.edit_chain(&mut fields, |d: &mut P::Display, f: &[StepValue], active| {
            if active < 3 {
                render::date_editor(d, f[0].value(), f[1].value(), f[2].value(), active)
            } else {
                render::weekday_editor(d, f[3].value())
            }
        })?;

        let date = CalendarDate {
            day: fields[0].value(),
            month: fields[1].value(),
            year: fields[2].value(),
            weekday: fields[3].value() + base,
        };
        self.finish_edit(outcome, RtcUpdate::date(date))
    }

    /// Walk `fields` in order. Each commit resets the inactivity deadline.
    fn edit_chain<F>(&mut self, fields: &mut [StepValue], mut draw: F) -> Result<Chain>
    where
        F: FnMut(&mut P::Display, &[StepValue], usize) -> Result<()>,
    {
        let mut active = 0;
        draw(&mut self.board.display, fields, active)?;

        let mut deadline = self.deadline(EDITOR_TIMEOUT_MS);
        while active < fields.len() {
            if self.expired(deadline) {
                return Ok(Chain::Abandoned);
            }

            match fields[active].poll(&mut self.board.button, &mut self.board.clock) {
                Step::Idle => self.board.clock.delay_ms(REDRAW_POLL_MS),
                Step::Advanced => draw(&mut self.board.display, fields, active)?,
                Step::Committed => {
                    log::debug!("Field {} committed at {}", active, fields[active].value());
                    self.await_release();
                    active += 1;
                    deadline = self.deadline(EDITOR_TIMEOUT_MS);
                    if active < fields.len() {
                        render::clear(&mut self.board.display)?;
                        draw(&mut self.board.display, fields, active)?;
                    }
                }
            }
        }

        Ok(Chain::Committed)
    }

    fn finish_edit(&mut self, outcome: Chain, update: RtcUpdate) -> Result<UiMode> {
        match outcome {
            Chain::Abandoned => {
                log::info!("Edit abandoned, RTC untouched");
                Ok(UiMode::Sleeping(SleepReason::Timeout))
            }
            Chain::Committed => {
                self.board.rtc.write_all(&update)?;
                log::info!("RTC set: {:?}", update);
                self.confirm_saved()?;
                Ok(UiMode::Sleeping(SleepReason::Done))
            }
        }
    }
}
