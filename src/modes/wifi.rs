// TapWatch - Wi-Fi Scan
//
// Strongest networks first, five per page. Tap pages forward (wrapping),
// hold leaves.

use anyhow::Result;
use embedded_graphics::pixelcolor::{Rgb565, WebColors};

use crate::config::*;
use crate::events::{AccessPoint, SleepReason, UiMode};
use crate::input::{Step, StepValue};
use crate::platform::{Clock, Platform, WifiScanner};
use crate::render;
use crate::watch::Watch;

/// Sort strongest first and split into display pages.
pub fn paginate(mut points: Vec<AccessPoint>) -> Vec<Vec<AccessPoint>> {
    points.sort_by(|a, b| b.rssi.cmp(&a.rssi));
    points.chunks(WIFI_PAGE_SIZE).map(<[AccessPoint]>::to_vec).collect()
}

impl<P: Platform> Watch<'_, P> {
    pub(crate) fn run_wifi_scan(&mut self) -> Result<UiMode> {
        self.face_horizontal()?;
        render::notice(&mut self.board.display, "Scanning", Rgb565::CSS_GRAY)?;

        let pages = paginate(self.board.wifi.scan()?);
        log::info!("Wi-Fi scan: {} page(s)", pages.len());
        if pages.is_empty() {
            self.show_notice("No networks", Rgb565::CSS_GRAY, SAVED_CONFIRM_MS)?;
            return Ok(UiMode::Sleeping(SleepReason::Done));
        }

        let last = u8::try_from(pages.len() - 1).unwrap_or(u8::MAX);
        let mut page = StepValue::new(0, last, 0);
        self.draw_wifi_page(&pages, page.value())?;

        let mut deadline = self.deadline(WIFI_TIMEOUT_MS);
        loop {
            if self.expired(deadline) {
                return Ok(UiMode::Sleeping(SleepReason::Timeout));
            }

            match page.poll(&mut self.board.button, &mut self.board.clock) {
                Step::Idle => self.board.clock.delay_ms(REDRAW_POLL_MS),
                Step::Advanced => {
                    self.draw_wifi_page(&pages, page.value())?;
                    deadline = self.deadline(WIFI_TIMEOUT_MS);
                }
                Step::Committed => {
                    self.await_release();
                    return Ok(UiMode::Sleeping(SleepReason::Done));
                }
            }
        }
    }

    fn draw_wifi_page(&mut self, pages: &[Vec<AccessPoint>], page: u8) -> Result<()> {
        let index = usize::from(page);
        render::clear(&mut self.board.display)?;
        render::wifi_page(&mut self.board.display, &pages[index], index, pages.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ap(ssid: &str, rssi: i8) -> AccessPoint {
        AccessPoint { ssid: ssid.to_owned(), rssi }
    }

    #[test]
    fn strongest_first_in_pages_of_five() {
        let points = (0..7).map(|i| ap(&format!("net{i}"), -90 + i * 5)).collect();
        let pages = paginate(points);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 5);
        assert_eq!(pages[1].len(), 2);
        assert_eq!(pages[0][0], ap("net6", -60));
        assert_eq!(pages[1][1], ap("net0", -90));
    }

    #[test]
    fn nothing_found_means_no_pages() {
        assert!(paginate(Vec::new()).is_empty());
    }
}
