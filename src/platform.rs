// TapWatch - Collaborator Interfaces
//
// The core never touches registers or buses. Every peripheral is reached
// through one of these traits; the firmware binary implements them for the
// T-Watch board and the tests implement them over a simulated clock.

use anyhow::Result;
use embedded_graphics::{pixelcolor::Rgb565, prelude::DrawTarget};

use crate::calibration::Calibration;
use crate::events::{AccessPoint, CalendarDate, RtcUpdate, TimeOfDay, Vector3};
use crate::orientation::Orientation;

/// Monotonic millisecond time source plus a blocking delay.
pub trait Clock {
    fn now_ms(&self) -> u64;
    fn delay_ms(&mut self, ms: u32);
}

/// Level read of the single user button.
pub trait Button {
    fn is_pressed(&mut self) -> bool;
}

/// Anything the screen renderer can draw on.
pub trait Canvas: DrawTarget<Color = Rgb565, Error = anyhow::Error> {}

impl<T> Canvas for T where T: DrawTarget<Color = Rgb565, Error = anyhow::Error> {}

pub trait WatchDisplay: Canvas {
    fn set_orientation(&mut self, orientation: Orientation) -> Result<()>;
    /// Panel sleep command plus backlight.
    fn set_sleep(&mut self, asleep: bool) -> Result<()>;
}

pub trait RealTimeClock {
    fn read_time(&mut self) -> Result<TimeOfDay>;
    fn read_date(&mut self) -> Result<CalendarDate>;
    /// Commit every field in `update` in one transaction.
    fn write_all(&mut self, update: &RtcUpdate) -> Result<()>;
}

pub trait Accelerometer {
    fn read_acceleration(&mut self) -> Result<Vector3>;
}

pub trait Magnetometer {
    /// Raw (uncalibrated) field.
    fn read_magnetic(&mut self) -> Result<Vector3>;
    /// Blocking hard/soft-iron calibration while the user rotates the watch.
    fn calibrate(&mut self, samples: u16, delay_ms: u32) -> Result<Calibration>;
}

pub trait BatterySense {
    fn read_raw(&mut self) -> Result<u16>;
}

/// Flat text record holding the magnetometer calibration.
pub trait CalibrationStore {
    fn load(&mut self) -> Result<Option<String>>;
    fn save(&mut self, record: &str) -> Result<()>;
}

pub trait WifiScanner {
    fn scan(&mut self) -> Result<Vec<AccessPoint>>;
}

pub trait StatusLed {
    fn set(&mut self, on: bool) -> Result<()>;
}

/// Target-specific power-down steps.
pub trait PowerManagement {
    /// Put the motion sensor into its low-power register state.
    fn suspend_motion_sensor(&mut self) -> Result<()>;
    /// Latch output levels on every used pin through deep sleep.
    fn hold_pins(&mut self) -> Result<()>;
    /// Wake when the button pin goes high.
    fn arm_button_wake(&mut self) -> Result<()>;
    /// Enter deep sleep. On hardware this never returns.
    fn deep_sleep(&mut self);
}

/// Binds one concrete type to each collaborator.
pub trait Platform {
    type Display: WatchDisplay;
    type Rtc: RealTimeClock;
    type Accel: Accelerometer;
    type Mag: Magnetometer;
    type Battery: BatterySense;
    type Button: Button;
    type Clock: Clock;
    type Store: CalibrationStore;
    type Wifi: WifiScanner;
    type Led: StatusLed;
    type Power: PowerManagement;
}

/// Owned peripherals of one watch.
pub struct Board<P: Platform> {
    pub display: P::Display,
    pub rtc: P::Rtc,
    pub accel: P::Accel,
    /// Absent when the magnetometer did not answer the boot-time bus scan.
    pub magnetometer: Option<P::Mag>,
    pub battery: P::Battery,
    pub button: P::Button,
    pub clock: P::Clock,
    pub store: P::Store,
    pub wifi: P::Wifi,
    pub led: P::Led,
    pub power: P::Power,
}
