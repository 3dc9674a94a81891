// TapWatch - MPU9250 Accelerometer Driver
//
// Register-level driver over the shared I2C bus. Only the accelerometer is
// used; the gyro stays idle. Bypass mode exposes the AK8963 on the same bus.

use anyhow::Context;
use tapwatch::config::*;
use tapwatch::events::Vector3;
use tapwatch::platform::Accelerometer;

use super::{lock, SharedBus};

// MPU9250 register addresses
const REG_INT_PIN_CFG: u8 = 0x37;
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_XOUT_H: u8 = 0x3B; // Start of 6-byte accel burst
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_WHO_AM_I: u8 = 0x75;

const PWR_SLEEP: u8 = 0x40;
const INT_BYPASS_EN: u8 = 0x02;

pub struct Mpu9250 {
    bus: SharedBus,
}

impl Mpu9250 {
    pub fn new(bus: SharedBus) -> Self {
        Self { bus }
    }

    /// Verify the device answers on the I2C bus.
    pub fn is_connected(&self) -> bool {
        let Ok(mut bus) = lock(self.bus) else {
            return false;
        };
        let mut buf = [0u8; 1];
        match bus.write_read(I2C_ADDR_MPU9250, &[REG_WHO_AM_I], &mut buf, I2C_TIMEOUT_TICKS) {
            // 0x71 for the MPU9250, 0x73 for the MPU9255 fitted to some batches.
            Ok(()) => matches!(buf[0], 0x71 | 0x73),
            Err(_) => false,
        }
    }

    /// Wake the sensor, set ±2 g and open the bypass to the magnetometer.
    pub fn init(&self) -> anyhow::Result<()> {
        let mut bus = lock(self.bus)?;

        // Clear SLEEP left over from the last power-down.
        bus.write(I2C_ADDR_MPU9250, &[REG_PWR_MGMT_1, 0x00], I2C_TIMEOUT_TICKS)
            .context("MPU9250 wake")?;
        bus.write(I2C_ADDR_MPU9250, &[REG_ACCEL_CONFIG, 0x00], I2C_TIMEOUT_TICKS)?;
        bus.write(I2C_ADDR_MPU9250, &[REG_INT_PIN_CFG, INT_BYPASS_EN], I2C_TIMEOUT_TICKS)?;

        log::info!("MPU9250 initialised (±2g, bypass on)");
        Ok(())
    }

    /// Low-power register state. The chip keeps it through deep sleep.
    pub fn suspend(&self) -> anyhow::Result<()> {
        let mut bus = lock(self.bus)?;
        bus.write(I2C_ADDR_MPU9250, &[REG_PWR_MGMT_1, PWR_SLEEP], I2C_TIMEOUT_TICKS)?;
        Ok(())
    }
}

impl Accelerometer for Mpu9250 {
    fn read_acceleration(&mut self) -> anyhow::Result<Vector3> {
        let mut bus = lock(self.bus)?;
        let mut raw = [0u8; 6];
        bus.write_read(I2C_ADDR_MPU9250, &[REG_ACCEL_XOUT_H], &mut raw, I2C_TIMEOUT_TICKS)
            .context("MPU9250 accel read")?;

        Ok(Vector3 {
            x: i16::from_be_bytes([raw[0], raw[1]]) as f32 / ACCEL_SCALE_2G,
            y: i16::from_be_bytes([raw[2], raw[3]]) as f32 / ACCEL_SCALE_2G,
            z: i16::from_be_bytes([raw[4], raw[5]]) as f32 / ACCEL_SCALE_2G,
        })
    }
}
