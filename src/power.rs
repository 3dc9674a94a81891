// TapWatch - Sleep Controller
//
// Last stop before deep sleep. Taps left over from the ambient minute, plus
// any edges the interrupt latched since, still get a chance to open the
// calendar or the menu. Otherwise the board is powered down in a fixed
// order and the button is armed as the wake source.

use anyhow::Result;

use crate::events::{SleepReason, UiMode};
use crate::input::{resolve, GestureAction};
use crate::platform::{Platform, PowerManagement, StatusLed, WatchDisplay};
use crate::watch::Watch;

impl<P: Platform> Watch<'_, P> {
    /// Returns the mode to redirect into, or `None` once deep sleep has been
    /// requested.
    pub(crate) fn sleep(&mut self, reason: SleepReason) -> Result<Option<UiMode>> {
        let pending = self.state.gestures.take().saturating_add(self.latch.take());

        if reason != SleepReason::BatteryCritical {
            let action = resolve(pending, self.profile.calendar_taps, self.profile.menu_taps);
            match action {
                GestureAction::Calendar => {
                    log::debug!("{} pending tap(s), opening calendar", pending);
                    return Ok(Some(UiMode::Calendar));
                }
                GestureAction::Menu => {
                    log::debug!("{} pending tap(s), opening menu", pending);
                    return Ok(Some(UiMode::MenuOverlay));
                }
                GestureAction::Sleep => {}
            }
        }

        self.power_down(reason)?;
        Ok(None)
    }

    fn power_down(&mut self, reason: SleepReason) -> Result<()> {
        log::info!("...Zzz... ({:?})", reason);

        self.board.display.set_sleep(true)?;
        self.board.led.set(false)?;
        self.board.power.suspend_motion_sensor()?;
        self.board.power.hold_pins()?;
        self.board.power.arm_button_wake()?;
        self.latch.disarm();
        self.board.power.deep_sleep();
        Ok(())
    }
}
