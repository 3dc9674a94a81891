// TapWatch - Menu
//
// Tap cycles the entries, hold opens the one on screen.

use anyhow::Result;
use embedded_graphics::pixelcolor::{Rgb565, WebColors};

use crate::config::*;
use crate::events::{SleepReason, UiMode};
use crate::input::{Step, StepValue};
use crate::platform::{Clock, Platform};
use crate::render;
use crate::watch::Watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Exit,
    TimeSet,
    DateSet,
    Compass,
    Calibrate,
    WifiScan,
    Game,
}

impl MenuItem {
    /// Display order.
    pub const ALL: [MenuItem; 7] = [
        MenuItem::Exit,
        MenuItem::TimeSet,
        MenuItem::DateSet,
        MenuItem::Compass,
        MenuItem::Calibrate,
        MenuItem::WifiScan,
        MenuItem::Game,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Exit => "Exit",
            MenuItem::TimeSet => "Time set",
            MenuItem::DateSet => "Date set",
            MenuItem::Compass => "Compass",
            MenuItem::Calibrate => "Calibrate",
            MenuItem::WifiScan => "Wi-Fi scan",
            MenuItem::Game => "Game",
        }
    }

    pub fn target(self) -> UiMode {
        match self {
            MenuItem::Exit => UiMode::Sleeping(SleepReason::Exit),
            MenuItem::TimeSet => UiMode::TimeEditor,
            MenuItem::DateSet => UiMode::DateEditor,
            MenuItem::Compass => UiMode::Compass,
            MenuItem::Calibrate => UiMode::Calibration,
            MenuItem::WifiScan => UiMode::WifiScan,
            MenuItem::Game => UiMode::Game,
        }
    }
}

impl<P: Platform> Watch<'_, P> {
    pub(crate) fn run_menu(&mut self) -> Result<UiMode> {
        self.face_horizontal()?;

        let last = (MenuItem::ALL.len() - 1) as u8;
        let mut cursor = StepValue::new(0, last, 0);
        render::menu(&mut self.board.display, MenuItem::ALL[0].label())?;

        let mut deadline = self.deadline(MENU_TIMEOUT_MS);
        loop {
            if self.expired(deadline) {
                log::debug!("Menu idle for {} ms", MENU_TIMEOUT_MS);
                return Ok(UiMode::Sleeping(SleepReason::Timeout));
            }

            match cursor.poll(&mut self.board.button, &mut self.board.clock) {
                Step::Idle => self.board.clock.delay_ms(REDRAW_POLL_MS),
                Step::Advanced => {
                    let item = MenuItem::ALL[usize::from(cursor.value())];
                    render::menu(&mut self.board.display, item.label())?;
                    deadline = self.deadline(MENU_TIMEOUT_MS);
                }
                Step::Committed => {
                    let item = MenuItem::ALL[usize::from(cursor.value())];
                    log::info!("Menu: {}", item.label());
                    self.await_release();
                    return Ok(item.target());
                }
            }
        }
    }

    /// Entry without a screen of its own yet.
    pub(crate) fn run_placeholder(&mut self) -> Result<UiMode> {
        self.show_notice("In work.", Rgb565::CSS_GRAY, NOTICE_MS)?;
        Ok(UiMode::Sleeping(SleepReason::Done))
    }
}
