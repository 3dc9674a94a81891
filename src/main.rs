// TapWatch - Firmware Entry Point
//
// Boot sequence (every wake from deep sleep runs it again):
//   1. Bring up logging, I2C, the LCD and the touch button.
//   2. Wake the MPU9250 and open its bypass so the AK8963 can be probed.
//   3. Hand every peripheral to the state machine and run it.
//
// `Watch::run` only returns once deep sleep has been requested. On error the
// watch is forced into deep sleep; the next wake is a clean boot.

mod board;
mod drivers;

use std::sync::Mutex;

use anyhow::Context;
use esp_idf_hal::gpio::{AnyInputPin, IOPin, OutputPin, PinDriver};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::prelude::*;
use esp_idf_hal::spi::{
    config::{Config as SpiConfig, DriverConfig as SpiDriverConfig, MODE_0},
    SpiDeviceDriver,
};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use tapwatch::config::*;
use tapwatch::platform::{Board, PowerManagement};
use tapwatch::{Profile, WakeLatch, Watch};

use crate::board::TWatch;
use crate::drivers::ak8963::Ak8963;
use crate::drivers::battery::AdcBattery;
use crate::drivers::button::{SystemClock, TouchButton};
use crate::drivers::lcd::Lcd;
use crate::drivers::led::Led;
use crate::drivers::mpu9250::Mpu9250;
use crate::drivers::pcf8563::Pcf8563;
use crate::drivers::power::DeepSleep;
use crate::drivers::storage::NvsStore;
use crate::drivers::wifi::Scanner;
use crate::drivers::SharedBus;

/// The only state the button interrupt touches.
static WAKE_LATCH: WakeLatch = WakeLatch::new();

fn main() -> anyhow::Result<()> {
    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("TapWatch firmware starting");

    let (mut watch, fallback) = match boot() {
        Ok(parts) => parts,
        Err(e) => {
            log::error!("Boot failed: {:#}", e);
            force_sleep(None);
            return Err(e);
        }
    };

    if let Err(e) = watch.boot().and_then(|()| watch.run()) {
        log::error!("Watch stopped: {:#}", e);
        force_sleep(Some(fallback));
        return Err(e);
    }
    Ok(())
}

fn boot() -> anyhow::Result<(Watch<'static, TWatch>, DeepSleep)> {
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // ---- I2C bus (MPU9250, AK8963, PCF8563) --------------------------------
    let i2c_config = I2cConfig::new().baudrate(400u32.kHz().into());
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21, // SDA
        peripherals.pins.gpio22, // SCL
        &i2c_config,
    )?;
    // The bus lives for the whole firmware run; deep sleep ends it.
    let bus: SharedBus = Box::leak(Box::new(Mutex::new(i2c)));

    // ---- Display -----------------------------------------------------------
    let spi = SpiDeviceDriver::new_single(
        peripherals.spi2,
        peripherals.pins.gpio18, // SCLK
        peripherals.pins.gpio19, // MOSI
        Option::<AnyInputPin>::None,
        Some(peripherals.pins.gpio5), // CS
        &SpiDriverConfig::new(),
        &SpiConfig::new().baudrate(26.MHz().into()).data_mode(MODE_0),
    )
    .context("LCD SPI init")?;
    let display = Lcd::new(
        spi,
        PinDriver::output(peripherals.pins.gpio23.downgrade_output())?,
        PinDriver::output(peripherals.pins.gpio26.downgrade_output())?,
        PinDriver::output(peripherals.pins.gpio27.downgrade_output())?,
    )?;

    // ---- Motion sensors ----------------------------------------------------
    let imu = Mpu9250::new(bus);
    if !imu.is_connected() {
        log::warn!("MPU9250 did not answer WHO_AM_I");
    }
    imu.init()?;

    let magnetometer = match Ak8963::probe(bus) {
        Some(mut mag) => match mag.init() {
            Ok(()) => Some(mag),
            Err(e) => {
                log::warn!("AK8963 init failed: {:#}", e);
                None
            }
        },
        None => None,
    };

    // ---- Button, LED, battery ---------------------------------------------
    let button = TouchButton::new(
        PinDriver::input(peripherals.pins.gpio33.downgrade())?,
        PinDriver::output(peripherals.pins.gpio25.downgrade_output())?,
        &WAKE_LATCH,
    )?;
    let led = Led::new(PinDriver::output(peripherals.pins.gpio4.downgrade_output())?);

    let board = Board::<TWatch> {
        display,
        rtc: Pcf8563::new(bus),
        accel: Mpu9250::new(bus),
        magnetometer,
        battery: AdcBattery::new()?,
        button,
        clock: SystemClock,
        store: NvsStore::new(nvs.clone())?,
        wifi: Scanner::new(peripherals.modem, sysloop, nvs)?,
        led,
        power: DeepSleep::new(Mpu9250::new(bus)),
    };

    log::info!(
        "Boot complete, magnetometer {}",
        if board.magnetometer.is_some() { "present" } else { "absent" }
    );
    Ok((Watch::new(board, &WAKE_LATCH, Profile::TWATCH_MPU9250), DeepSleep::new(imu)))
}

/// Last-resort power down when the state machine could not finish.
fn force_sleep(power: Option<DeepSleep>) {
    if let Some(mut power) = power {
        if let Err(e) = power.suspend_motion_sensor() {
            log::warn!("Motion sensor suspend failed: {:#}", e);
        }
        if let Err(e) = power.arm_button_wake() {
            log::warn!("Wake source not armed: {:#}", e);
        }
        power.deep_sleep();
    } else {
        unsafe {
            esp_idf_sys::esp_sleep_enable_ext0_wakeup(PIN_BUTTON, 1);
            esp_idf_sys::esp_deep_sleep_start();
        }
    }
}
