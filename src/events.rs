// TapWatch - Shared Data Types

// ---------------------------------------------------------------------------
// Sensor Data
// ---------------------------------------------------------------------------

/// Three-axis reading: acceleration in g, magnetic field in µT.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

// ---------------------------------------------------------------------------
// Real-time clock values
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

/// Calendar date as kept by the RTC. `year` is the two-digit year in the
/// 2000s; `weekday` is the raw RTC weekday (see `Profile::weekday_base`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarDate {
    pub day: u8,
    pub month: u8,
    pub year: u8,
    pub weekday: u8,
}

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

/// Sunday-first weekday index (0..=6) from a raw RTC weekday.
pub fn weekday_index(raw: u8, base: u8) -> u8 {
    raw.wrapping_sub(base) % 7
}

pub fn is_weekend(index: u8) -> bool {
    index == 0 || index == 6
}

/// Fields committed together by `RealTimeClock::write_all`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RtcUpdate {
    pub time: Option<TimeOfDay>,
    pub date: Option<CalendarDate>,
}

impl RtcUpdate {
    pub fn time(hours: u8, minutes: u8) -> Self {
        Self {
            time: Some(TimeOfDay { hours, minutes, seconds: 0 }),
            date: None,
        }
    }

    pub fn date(date: CalendarDate) -> Self {
        Self { time: None, date: Some(date) }
    }
}

// ---------------------------------------------------------------------------
// Wi-Fi
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPoint {
    pub ssid: String,
    /// Signal strength in dBm.
    pub rssi: i8,
}

// ---------------------------------------------------------------------------
// UI modes
// ---------------------------------------------------------------------------

/// Why the watch is heading to sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepReason {
    /// The ambient minute ended.
    AmbientTimeout,
    /// "Exit" picked from the menu.
    Exit,
    /// A screen ran out of time without a commit.
    Timeout,
    /// A screen finished its job.
    Done,
    BatteryCritical,
}

/// Top-level UI state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    ClockDisplay,
    DateOverlay,
    MenuOverlay,
    Calendar,
    TimeEditor,
    DateEditor,
    Compass,
    Calibration,
    WifiScan,
    /// Menu placeholder entry without its own screen.
    Game,
    Sleeping(SleepReason),
}

impl UiMode {
    /// Modes during which the wake latch keeps counting button edges.
    pub fn keeps_latch_armed(self) -> bool {
        matches!(self, UiMode::ClockDisplay | UiMode::Sleeping(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_index_handles_one_based_rtc() {
        assert_eq!(weekday_index(1, 1), 0);
        assert_eq!(weekday_index(7, 1), 6);
        assert_eq!(weekday_index(3, 0), 3);
    }

    #[test]
    fn weekend_is_saturday_and_sunday() {
        let weekend: Vec<u8> = (0..7).filter(|d| is_weekend(*d)).collect();
        assert_eq!(weekend, vec![0, 6]);
    }

    #[test]
    fn time_update_zeroes_seconds() {
        let update = RtcUpdate::time(7, 45);
        assert_eq!(update.time.map(|t| t.seconds), Some(0));
        assert!(update.date.is_none());
    }
}
