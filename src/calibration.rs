// TapWatch - Magnetometer Calibration Record
//
// Stored as two flat text lines:
//
//     offset = (x, y, z)
//     scale = (x, y, z)

use std::fmt::Write as _;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};

use crate::events::Vector3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub offset: [f32; 3],
    pub scale: [f32; 3],
}

impl Calibration {
    pub const IDENTITY: Calibration = Calibration {
        offset: [0.0; 3],
        scale: [1.0; 3],
    };

    /// Hard-iron offset and soft-iron scale from per-axis extremes.
    pub fn from_extremes(min: [f32; 3], max: [f32; 3]) -> Self {
        let mut offset = [0.0; 3];
        let mut half_range = [0.0; 3];
        for axis in 0..3 {
            offset[axis] = (max[axis] + min[axis]) / 2.0;
            half_range[axis] = (max[axis] - min[axis]) / 2.0;
        }

        let mean = half_range.iter().sum::<f32>() / 3.0;
        let mut scale = [1.0; 3];
        for axis in 0..3 {
            if half_range[axis] > f32::EPSILON {
                scale[axis] = mean / half_range[axis];
            }
        }

        Self { offset, scale }
    }

    pub fn apply(&self, raw: Vector3) -> Vector3 {
        Vector3 {
            x: (raw.x - self.offset[0]) * self.scale[0],
            y: (raw.y - self.offset[1]) * self.scale[1],
            z: (raw.z - self.offset[2]) * self.scale[2],
        }
    }

    pub fn to_record(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "offset = {}", triple(&self.offset));
        let _ = writeln!(out, "scale = {}", triple(&self.scale));
        out
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl FromStr for Calibration {
    type Err = anyhow::Error;

    fn from_str(record: &str) -> Result<Self> {
        let mut offset = None;
        let mut scale = None;

        for line in record.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| anyhow!("missing '=' in {line:?}"))?;
            let parsed = parse_triple(value).with_context(|| format!("bad value in {line:?}"))?;
            match key.trim() {
                "offset" => offset = Some(parsed),
                "scale" => scale = Some(parsed),
                other => bail!("unknown calibration key {other:?}"),
            }
        }

        Ok(Self {
            offset: offset.ok_or_else(|| anyhow!("calibration record has no offset"))?,
            scale: scale.ok_or_else(|| anyhow!("calibration record has no scale"))?,
        })
    }
}

fn triple(v: &[f32; 3]) -> String {
    format!("({}, {}, {})", v[0], v[1], v[2])
}

fn parse_triple(text: &str) -> Result<[f32; 3]> {
    let inner = text
        .trim()
        .trim_start_matches(['(', '['])
        .trim_end_matches([')', ']']);

    let mut out = [0.0; 3];
    let mut parts = inner.split(',');
    for slot in out.iter_mut() {
        let part = parts.next().ok_or_else(|| anyhow!("expected three numbers"))?;
        *slot = part.trim().parse::<f32>()?;
    }
    if parts.next().is_some() {
        bail!("expected three numbers");
    }
    Ok(out)
}

/// Running per-axis min/max over raw magnetometer samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtremesSampler {
    min: [f32; 3],
    max: [f32; 3],
    samples: u32,
}

impl ExtremesSampler {
    pub fn new() -> Self {
        Self {
            min: [f32::MAX; 3],
            max: [f32::MIN; 3],
            samples: 0,
        }
    }

    pub fn add(&mut self, v: Vector3) {
        for (axis, value) in [v.x, v.y, v.z].into_iter().enumerate() {
            self.min[axis] = self.min[axis].min(value);
            self.max[axis] = self.max[axis].max(value);
        }
        self.samples += 1;
    }

    pub fn finish(&self) -> Calibration {
        if self.samples == 0 {
            return Calibration::IDENTITY;
        }
        Calibration::from_extremes(self.min, self.max)
    }
}

impl Default for ExtremesSampler {
    fn default() -> Self {
        Self::new()
    }
}
