// TapWatch - Compass Math
//
// Headings are in whole degrees in the screen frame the needle is drawn
// in, where 90 points north.

use crate::events::Vector3;

const RAD_TO_DEG: f32 = 57.3;

const SECTORS: [&str; 8] = ["E", "NE", "N", "NW", "W", "SW", "S", "SE"];

/// Tilt-compensated heading (0..360) from calibrated magnetic field and
/// acceleration.
pub fn heading(mag: Vector3, accel: Vector3) -> i32 {
    let pitch = accel.y.atan2((accel.x * accel.x + accel.z * accel.z).sqrt());
    let roll = (-accel.x).atan2((accel.y * accel.y + accel.z * accel.z).sqrt());

    let x = mag.x * pitch.cos() + mag.y * roll.sin() * pitch.sin()
        - mag.z * roll.cos() * pitch.sin();
    let y = mag.y * roll.cos() + mag.z * roll.sin();

    let az = (90.0 - y.atan2(x) * RAD_TO_DEG) as i32;
    az.rem_euclid(360)
}

/// Which way the needle moves to reach `target` along the shorter arc.
pub fn direction(cursor: i32, target: i32) -> i32 {
    if cursor == target {
        0
    } else if cursor > target {
        if target < 90 && cursor > 270 {
            1
        } else {
            -1
        }
    } else if target > 270 && cursor < 90 {
        -1
    } else {
        1
    }
}

/// Needle position that chases the measured heading one degree per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadingCursor {
    degrees: i32,
}

impl HeadingCursor {
    pub fn new(degrees: i32) -> Self {
        Self { degrees: degrees.rem_euclid(360) }
    }

    pub fn degrees(&self) -> i32 {
        self.degrees
    }

    /// Step toward `target`; returns the direction taken.
    pub fn advance(&mut self, target: i32) -> i32 {
        let step = direction(self.degrees, target);
        self.degrees = (self.degrees + step).rem_euclid(360);
        step
    }
}

/// Eight-point label for a heading and for its reciprocal.
pub fn cardinal(heading: i32) -> (&'static str, &'static str) {
    let sector = ((heading.rem_euclid(360) + 22) / 45) as usize % 8;
    (SECTORS[sector], SECTORS[(sector + 4) % 8])
}
