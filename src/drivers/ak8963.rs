// TapWatch - AK8963 Magnetometer Driver
//
// Reached through the MPU9250 I2C bypass. Runs in 16-bit continuous mode 2
// (100 Hz) with the factory sensitivity adjustment applied to every read.

use anyhow::{bail, Context};
use esp_idf_hal::delay::FreeRtos;
use tapwatch::calibration::{Calibration, ExtremesSampler};
use tapwatch::config::*;
use tapwatch::events::Vector3;
use tapwatch::platform::Magnetometer;

use super::{lock, SharedBus};

const REG_WIA: u8 = 0x00;
const REG_HXL: u8 = 0x03; // HXL..HZH then ST2
const REG_CNTL1: u8 = 0x0A;
const REG_ASAX: u8 = 0x10;

const WIA_EXPECTED: u8 = 0x48;
const MODE_POWER_DOWN: u8 = 0x00;
const MODE_FUSE_ROM: u8 = 0x0F;
const MODE_CONT2_16BIT: u8 = 0x16;
const ST2_OVERFLOW: u8 = 0x08;

pub struct Ak8963 {
    bus: SharedBus,
    adjustment: [f32; 3],
}

impl Ak8963 {
    /// Probe the bus. `None` when nothing answers at the AK8963 address,
    /// which happens on the first boot after the battery ran flat.
    pub fn probe(bus: SharedBus) -> Option<Self> {
        let mut id = [0u8; 1];
        let found = lock(bus)
            .map(|mut b| b.write_read(I2C_ADDR_AK8963, &[REG_WIA], &mut id, I2C_TIMEOUT_TICKS).is_ok())
            .unwrap_or(false);
        if !found || id[0] != WIA_EXPECTED {
            return None;
        }
        Some(Self { bus, adjustment: [1.0; 3] })
    }

    pub fn init(&mut self) -> anyhow::Result<()> {
        let mut bus = lock(self.bus)?;

        bus.write(I2C_ADDR_AK8963, &[REG_CNTL1, MODE_POWER_DOWN], I2C_TIMEOUT_TICKS)?;
        FreeRtos::delay_ms(1);
        bus.write(I2C_ADDR_AK8963, &[REG_CNTL1, MODE_FUSE_ROM], I2C_TIMEOUT_TICKS)?;
        FreeRtos::delay_ms(1);

        let mut asa = [0u8; 3];
        bus.write_read(I2C_ADDR_AK8963, &[REG_ASAX], &mut asa, I2C_TIMEOUT_TICKS)
            .context("AK8963 fuse ROM read")?;
        for (adj, raw) in self.adjustment.iter_mut().zip(asa) {
            *adj = (f32::from(raw) - 128.0) / 256.0 + 1.0;
        }

        bus.write(I2C_ADDR_AK8963, &[REG_CNTL1, MODE_POWER_DOWN], I2C_TIMEOUT_TICKS)?;
        FreeRtos::delay_ms(1);
        bus.write(I2C_ADDR_AK8963, &[REG_CNTL1, MODE_CONT2_16BIT], I2C_TIMEOUT_TICKS)?;

        log::info!("AK8963 initialised, ASA {:?}", self.adjustment);
        Ok(())
    }
}

impl Magnetometer for Ak8963 {
    fn read_magnetic(&mut self) -> anyhow::Result<Vector3> {
        let mut bus = lock(self.bus)?;
        let mut raw = [0u8; 7];
        bus.write_read(I2C_ADDR_AK8963, &[REG_HXL], &mut raw, I2C_TIMEOUT_TICKS)
            .context("AK8963 read")?;
        if raw[6] & ST2_OVERFLOW != 0 {
            bail!("AK8963 magnetic sensor overflow");
        }

        let axis = |i: usize| {
            f32::from(i16::from_le_bytes([raw[2 * i], raw[2 * i + 1]])) * self.adjustment[i] * MAG_SCALE_16BIT
        };
        Ok(Vector3::new(axis(0), axis(1), axis(2)))
    }

    fn calibrate(&mut self, samples: u16, delay_ms: u32) -> anyhow::Result<Calibration> {
        let mut sampler = ExtremesSampler::new();
        for _ in 0..samples {
            match self.read_magnetic() {
                Ok(v) => sampler.add(v),
                Err(e) => log::debug!("Calibration sample skipped: {}", e),
            }
            FreeRtos::delay_ms(delay_ms);
        }
        Ok(sampler.finish())
    }
}
