// TapWatch - PCF8563 Real-Time Clock Driver
//
// Time and date live in consecutive BCD registers from 0x02. Updates are a
// single burst write so the oscillator never sees a half-set clock.

use anyhow::Context;
use tapwatch::config::*;
use tapwatch::events::{CalendarDate, RtcUpdate, TimeOfDay};
use tapwatch::platform::RealTimeClock;

use super::{lock, SharedBus};

const REG_SECONDS: u8 = 0x02;
const REG_DAYS: u8 = 0x05;

fn from_bcd(v: u8) -> u8 {
    (v >> 4) * 10 + (v & 0x0F)
}

fn to_bcd(v: u8) -> u8 {
    ((v / 10) << 4) | (v % 10)
}

pub struct Pcf8563 {
    bus: SharedBus,
}

impl Pcf8563 {
    pub fn new(bus: SharedBus) -> Self {
        Self { bus }
    }

    fn read(&self, reg: u8, buf: &mut [u8]) -> anyhow::Result<()> {
        let mut bus = lock(self.bus)?;
        bus.write_read(I2C_ADDR_PCF8563, &[reg], buf, I2C_TIMEOUT_TICKS)
            .with_context(|| format!("PCF8563 read at {reg:#04x}"))?;
        Ok(())
    }
}

impl RealTimeClock for Pcf8563 {
    fn read_time(&mut self) -> anyhow::Result<TimeOfDay> {
        let mut raw = [0u8; 3];
        self.read(REG_SECONDS, &mut raw)?;
        Ok(TimeOfDay {
            seconds: from_bcd(raw[0] & 0x7F),
            minutes: from_bcd(raw[1] & 0x7F),
            hours: from_bcd(raw[2] & 0x3F),
        })
    }

    fn read_date(&mut self) -> anyhow::Result<CalendarDate> {
        let mut raw = [0u8; 4];
        self.read(REG_DAYS, &mut raw)?;
        Ok(CalendarDate {
            day: from_bcd(raw[0] & 0x3F),
            weekday: raw[1] & 0x07,
            month: from_bcd(raw[2] & 0x1F),
            year: from_bcd(raw[3]),
        })
    }

    fn write_all(&mut self, update: &RtcUpdate) -> anyhow::Result<()> {
        let time = update.time.map(|t| [to_bcd(t.seconds), to_bcd(t.minutes), to_bcd(t.hours)]);
        let date = update
            .date
            .map(|d| [to_bcd(d.day), d.weekday & 0x07, to_bcd(d.month), to_bcd(d.year)]);

        // Register address followed by the payload, one transaction.
        let mut frame = Vec::with_capacity(8);
        match (time, date) {
            (Some(t), Some(d)) => {
                frame.push(REG_SECONDS);
                frame.extend_from_slice(&t);
                frame.extend_from_slice(&d);
            }
            (Some(t), None) => {
                frame.push(REG_SECONDS);
                frame.extend_from_slice(&t);
            }
            (None, Some(d)) => {
                frame.push(REG_DAYS);
                frame.extend_from_slice(&d);
            }
            (None, None) => return Ok(()),
        }

        let mut bus = lock(self.bus)?;
        bus.write(I2C_ADDR_PCF8563, &frame, I2C_TIMEOUT_TICKS)
            .context("PCF8563 write")?;
        Ok(())
    }
}
