// TapWatch - Board Drivers
//
// Register-level drivers for the T-Watch peripherals. The I2C sensors share
// one bus behind a mutex.

pub mod ak8963;
pub mod battery;
pub mod button;
pub mod lcd;
pub mod led;
pub mod mpu9250;
pub mod pcf8563;
pub mod power;
pub mod storage;
pub mod wifi;

use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;
use esp_idf_hal::i2c::I2cDriver;

/// Thread-safe handle to a shared I2C bus.
pub type SharedBus = &'static Mutex<I2cDriver<'static>>;

pub fn lock(bus: SharedBus) -> anyhow::Result<MutexGuard<'static, I2cDriver<'static>>> {
    bus.lock().map_err(|_| anyhow!("I2C bus mutex poisoned"))
}
