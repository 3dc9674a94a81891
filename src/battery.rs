// TapWatch - Battery Gauge
//
// Maps a raw ADC reading to a colour band and a bar fill fraction. The
// bands are contiguous, so every reading lands in exactly one of them.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BatteryBand {
    /// Below the hard floor: force sleep.
    Critical,
    Red,
    Yellow,
    Green,
}

impl BatteryBand {
    pub fn color(self) -> Rgb565 {
        match self {
            BatteryBand::Critical | BatteryBand::Red => Rgb565::RED,
            BatteryBand::Yellow => Rgb565::YELLOW,
            BatteryBand::Green => Rgb565::GREEN,
        }
    }
}

/// Band edges in corrected ADC counts (`raw + offset`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryBands {
    pub offset: i32,
    /// Readings below this are critical.
    pub critical_below: i32,
    /// Highest red reading.
    pub red_max: i32,
    /// Highest yellow reading; anything above is green.
    pub yellow_max: i32,
    /// Reading drawn as an empty bar.
    pub empty: i32,
    /// Reading drawn as a full bar.
    pub full: i32,
}

impl BatteryBands {
    /// ESP32 ADC1 at 9-bit width, 11 dB attenuation, 1:2 divider.
    pub const ADC_9BIT: BatteryBands = BatteryBands {
        offset: 6,
        critical_below: 170,
        red_max: 236,
        yellow_max: 266,
        empty: 210,
        full: 297,
    };

    /// Same divider read at 12-bit width.
    pub const ADC_12BIT: BatteryBands = BatteryBands {
        offset: 48,
        critical_below: 1360,
        red_max: 1888,
        yellow_max: 2128,
        empty: 1680,
        full: 2376,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryLevel {
    pub band: BatteryBand,
    /// Bar fill, 0.0..=1.0.
    pub fill: f32,
}

impl BatteryLevel {
    pub fn is_critical(&self) -> bool {
        self.band == BatteryBand::Critical
    }

    /// Filled length of a bar `len` pixels long.
    pub fn fill_len(&self, len: u32) -> u32 {
        (self.fill * len as f32).round() as u32
    }
}

pub fn gauge(raw: u16, bands: &BatteryBands) -> BatteryLevel {
    let v = i32::from(raw) + bands.offset;

    let band = if v < bands.critical_below {
        BatteryBand::Critical
    } else if v <= bands.red_max {
        BatteryBand::Red
    } else if v <= bands.yellow_max {
        BatteryBand::Yellow
    } else {
        BatteryBand::Green
    };

    let span = (bands.full - bands.empty).max(1);
    let fill = (v.clamp(bands.empty, bands.full) - bands.empty) as f32 / span as f32;

    BatteryLevel { band, fill }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_monotonic_over_whole_range() {
        for bands in [BatteryBands::ADC_9BIT, BatteryBands::ADC_12BIT] {
            let mut last = BatteryBand::Critical;
            let mut last_fill = 0.0;
            for raw in 0..=4095u16 {
                let level = gauge(raw, &bands);
                assert!(level.band >= last, "band dropped at raw {raw}");
                assert!(level.fill >= last_fill);
                assert!((0.0..=1.0).contains(&level.fill));
                last = level.band;
                last_fill = level.fill;
            }
            assert_eq!(last, BatteryBand::Green);
        }
    }

    #[test]
    fn band_edges_match_nine_bit_table() {
        let b = BatteryBands::ADC_9BIT;
        assert_eq!(gauge(163, &b).band, BatteryBand::Critical); // 169
        assert_eq!(gauge(164, &b).band, BatteryBand::Red); // 170
        assert_eq!(gauge(230, &b).band, BatteryBand::Red); // 236
        assert_eq!(gauge(231, &b).band, BatteryBand::Yellow); // 237
        assert_eq!(gauge(260, &b).band, BatteryBand::Yellow); // 266
        assert_eq!(gauge(261, &b).band, BatteryBand::Green); // 267
    }

    #[test]
    fn fill_is_clamped() {
        let b = BatteryBands::ADC_9BIT;
        assert_eq!(gauge(0, &b).fill, 0.0);
        assert_eq!(gauge(511, &b).fill, 1.0);
        assert_eq!(gauge(511, &b).fill_len(88), 88);
        assert_eq!(gauge(204, &b).fill_len(88), 0);
    }

    #[test]
    fn only_critical_band_requests_sleep() {
        let b = BatteryBands::ADC_9BIT;
        assert!(gauge(10, &b).is_critical());
        assert!(!gauge(200, &b).is_critical());
    }
}
