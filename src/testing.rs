// TapWatch - Simulated Board
//
// Host-side stand-ins for every collaborator. All of them share one
// simulated millisecond counter, so blocking loops in the core advance
// time through `Clock::delay_ms` and scripted button presses line up.

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use anyhow::{bail, Result};
use embedded_graphics::{
    pixelcolor::{Rgb565, RgbColor},
    prelude::*,
};

use crate::calibration::Calibration;
use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::events::{AccessPoint, CalendarDate, RtcUpdate, TimeOfDay, Vector3};
use crate::input::WakeLatch;
use crate::orientation::Orientation;
use crate::platform::{
    Accelerometer, BatterySense, Board, Button, CalibrationStore, Clock, Magnetometer, Platform,
    PowerManagement, RealTimeClock, StatusLed, WatchDisplay, WifiScanner,
};

pub type TimeHandle = Rc<Cell<u64>>;

// ---------------------------------------------------------------------------
// Time & input
// ---------------------------------------------------------------------------

pub struct SimClock {
    now: TimeHandle,
    /// Stands in for the button ISR: each edge time passed by a delay is
    /// recorded into the latch.
    interrupts: Option<(Rc<WakeLatch>, Vec<u64>)>,
}

impl SimClock {
    pub fn new() -> Self {
        Self { now: Rc::new(Cell::new(0)), interrupts: None }
    }

    /// Feed `latch` with both edges of every press window.
    pub fn with_interrupts(latch: Rc<WakeLatch>, presses: &[(u64, u64)]) -> Self {
        let edges = presses.iter().flat_map(|&(start, end)| [start, end]).collect();
        Self { now: Rc::new(Cell::new(0)), interrupts: Some((latch, edges)) }
    }

    pub fn handle(&self) -> TimeHandle {
        self.now.clone()
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn delay_ms(&mut self, ms: u32) {
        let from = self.now.get();
        let to = from + u64::from(ms);
        if let Some((latch, edges)) = &self.interrupts {
            for _ in edges.iter().filter(|&&t| from < t && t <= to) {
                latch.record();
            }
        }
        self.now.set(to);
    }
}

/// Button that is down during each half-open `[start, end)` window.
pub struct ScriptedButton {
    now: TimeHandle,
    presses: Vec<(u64, u64)>,
}

impl ScriptedButton {
    pub fn new(now: TimeHandle, presses: &[(u64, u64)]) -> Self {
        Self { now, presses: presses.to_vec() }
    }
}

impl Button for ScriptedButton {
    fn is_pressed(&mut self) -> bool {
        let t = self.now.get();
        self.presses.iter().any(|&(start, end)| start <= t && t < end)
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

/// Framebuffer that remembers every pixel written since the last clear.
pub struct TestDisplay {
    size: Size,
    pixels: HashMap<(i32, i32), Rgb565>,
    out_of_bounds: usize,
    pub clears: usize,
    pub orientations: Vec<Orientation>,
    pub asleep: bool,
}

impl TestDisplay {
    pub fn new() -> Self {
        Self {
            size: Size::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            pixels: HashMap::new(),
            out_of_bounds: 0,
            clears: 0,
            orientations: Vec::new(),
            asleep: false,
        }
    }

    /// Swap the logical dimensions the way the panel does on rotation.
    pub fn set_orientation_dims(&mut self, orientation: Orientation) {
        self.size = if orientation.is_vertical() {
            Size::new(SCREEN_HEIGHT, SCREEN_WIDTH)
        } else {
            Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
        };
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        self.pixels.get(&(x, y)).copied()
    }

    pub fn out_of_bounds(&self) -> usize {
        self.out_of_bounds
    }

    pub fn lit_pixels(&self) -> usize {
        self.pixels.values().filter(|&&c| c != Rgb565::BLACK).count()
    }
}

impl OriginDimensions for TestDisplay {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for TestDisplay {
    type Color = Rgb565;
    type Error = anyhow::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if bounds.contains(point) {
                self.pixels.insert((point.x, point.y), color);
            } else {
                self.out_of_bounds += 1;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.clear();
        if color != Rgb565::BLACK {
            for point in self.bounding_box().points() {
                self.pixels.insert((point.x, point.y), color);
            }
        }
        self.clears += 1;
        Ok(())
    }
}

impl WatchDisplay for TestDisplay {
    fn set_orientation(&mut self, orientation: Orientation) -> Result<()> {
        self.set_orientation_dims(orientation);
        self.orientations.push(orientation);
        Ok(())
    }

    fn set_sleep(&mut self, asleep: bool) -> Result<()> {
        self.asleep = asleep;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sensors & storage
// ---------------------------------------------------------------------------

pub struct FakeRtc {
    pub time: TimeOfDay,
    pub date: CalendarDate,
    pub writes: Vec<RtcUpdate>,
}

impl RealTimeClock for FakeRtc {
    fn read_time(&mut self) -> Result<TimeOfDay> {
        Ok(self.time)
    }

    fn read_date(&mut self) -> Result<CalendarDate> {
        Ok(self.date)
    }

    fn write_all(&mut self, update: &RtcUpdate) -> Result<()> {
        if let Some(time) = update.time {
            self.time = time;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        self.writes.push(*update);
        Ok(())
    }
}

pub struct FakeAccel {
    pub reading: Vector3,
}

impl Accelerometer for FakeAccel {
    fn read_acceleration(&mut self) -> Result<Vector3> {
        Ok(self.reading)
    }
}

pub struct FakeMag {
    pub reading: Vector3,
    pub result: Calibration,
    pub calibrations: usize,
}

impl Magnetometer for FakeMag {
    fn read_magnetic(&mut self) -> Result<Vector3> {
        Ok(self.reading)
    }

    fn calibrate(&mut self, _samples: u16, _delay_ms: u32) -> Result<Calibration> {
        self.calibrations += 1;
        Ok(self.result)
    }
}

/// Returns `queued` readings first, then `raw` forever.
pub struct FakeBattery {
    pub raw: u16,
    pub queued: VecDeque<u16>,
}

impl BatterySense for FakeBattery {
    fn read_raw(&mut self) -> Result<u16> {
        Ok(self.queued.pop_front().unwrap_or(self.raw))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub record: Option<String>,
    pub saves: usize,
    pub fail_load: bool,
}

impl CalibrationStore for MemoryStore {
    fn load(&mut self) -> Result<Option<String>> {
        if self.fail_load {
            bail!("flash read failed");
        }
        Ok(self.record.clone())
    }

    fn save(&mut self, record: &str) -> Result<()> {
        self.record = Some(record.to_owned());
        self.saves += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeWifi {
    pub points: Vec<AccessPoint>,
    pub scans: usize,
}

impl WifiScanner for FakeWifi {
    fn scan(&mut self) -> Result<Vec<AccessPoint>> {
        self.scans += 1;
        Ok(self.points.clone())
    }
}

#[derive(Default)]
pub struct FakeLed {
    pub on: bool,
    pub switches: Vec<bool>,
}

impl StatusLed for FakeLed {
    fn set(&mut self, on: bool) -> Result<()> {
        self.on = on;
        self.switches.push(on);
        Ok(())
    }
}

/// Records each power-down step by name.
#[derive(Default)]
pub struct FakePower {
    pub steps: Vec<&'static str>,
}

impl FakePower {
    pub fn deep_sleeps(&self) -> usize {
        self.steps.iter().filter(|s| **s == "deep_sleep").count()
    }
}

impl PowerManagement for FakePower {
    fn suspend_motion_sensor(&mut self) -> Result<()> {
        self.steps.push("suspend_motion_sensor");
        Ok(())
    }

    fn hold_pins(&mut self) -> Result<()> {
        self.steps.push("hold_pins");
        Ok(())
    }

    fn arm_button_wake(&mut self) -> Result<()> {
        self.steps.push("arm_button_wake");
        Ok(())
    }

    fn deep_sleep(&mut self) {
        self.steps.push("deep_sleep");
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

pub struct Sim;

impl Platform for Sim {
    type Display = TestDisplay;
    type Rtc = FakeRtc;
    type Accel = FakeAccel;
    type Mag = FakeMag;
    type Battery = FakeBattery;
    type Button = ScriptedButton;
    type Clock = SimClock;
    type Store = MemoryStore;
    type Wifi = FakeWifi;
    type Led = FakeLed;
    type Power = FakePower;
}

/// Healthy battery, level wrist, 10:30 on Thursday 14.03.2024.
pub fn sim_board(presses: &[(u64, u64)]) -> Board<Sim> {
    board_with_clock(SimClock::new(), presses)
}

/// Like `sim_board`, with every press edge also reaching `latch`.
pub fn sim_board_with_interrupts(latch: Rc<WakeLatch>, presses: &[(u64, u64)]) -> Board<Sim> {
    board_with_clock(SimClock::with_interrupts(latch, presses), presses)
}

fn board_with_clock(clock: SimClock, presses: &[(u64, u64)]) -> Board<Sim> {
    let button = ScriptedButton::new(clock.handle(), presses);
    Board {
        display: TestDisplay::new(),
        rtc: FakeRtc {
            time: TimeOfDay { hours: 10, minutes: 30, seconds: 0 },
            date: CalendarDate { day: 14, month: 3, year: 24, weekday: 4 },
            writes: Vec::new(),
        },
        accel: FakeAccel { reading: Vector3::new(-0.9, 0.0, 0.3) },
        magnetometer: Some(FakeMag {
            reading: Vector3::new(30.0, 0.0, 0.0),
            result: Calibration { offset: [1.0, 2.0, 3.0], scale: [1.0, 0.5, 2.0] },
            calibrations: 0,
        }),
        battery: FakeBattery { raw: 280, queued: VecDeque::new() },
        button,
        clock,
        store: MemoryStore::default(),
        wifi: FakeWifi::default(),
        led: FakeLed::default(),
        power: FakePower::default(),
    }
}
