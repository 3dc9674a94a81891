// TapWatch - Deep Sleep
//
// Raw ESP-IDF power calls. Once `deep_sleep` runs, the next thing the CPU
// executes is the boot ROM.

use anyhow::bail;
use tapwatch::config::*;
use tapwatch::platform::PowerManagement;

use super::mpu9250::Mpu9250;

pub struct DeepSleep {
    imu: Mpu9250,
}

impl DeepSleep {
    pub fn new(imu: Mpu9250) -> Self {
        Self { imu }
    }
}

fn check(ret: esp_idf_sys::esp_err_t, what: &str) -> anyhow::Result<()> {
    if ret != esp_idf_sys::ESP_OK {
        bail!("{} failed ({})", what, ret);
    }
    Ok(())
}

impl PowerManagement for DeepSleep {
    fn suspend_motion_sensor(&mut self) -> anyhow::Result<()> {
        // The accelerometer driver has no sleep call; set PWR_MGMT_1 directly.
        self.imu.suspend()
    }

    fn hold_pins(&mut self) -> anyhow::Result<()> {
        for pin in HOLD_PINS {
            check(unsafe { esp_idf_sys::gpio_hold_en(pin) }, "gpio_hold_en")?;
        }
        unsafe { esp_idf_sys::gpio_deep_sleep_hold_en() };
        Ok(())
    }

    fn arm_button_wake(&mut self) -> anyhow::Result<()> {
        check(
            unsafe { esp_idf_sys::esp_sleep_enable_ext0_wakeup(PIN_BUTTON, 1) },
            "esp_sleep_enable_ext0_wakeup",
        )
    }

    fn deep_sleep(&mut self) {
        log::info!("Entering deep sleep, wake on button (GPIO{})", PIN_BUTTON);
        unsafe { esp_idf_sys::esp_deep_sleep_start() };
    }
}
