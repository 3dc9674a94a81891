// TapWatch - Hardware & System Configuration
// Target: LILYGO T-Watch-2020 (ESP32), MPU9250 + AK8963 variant

use crate::battery::BatteryBands;

// ---------------------------------------------------------------------------
// GPIO Pin Definitions
// ---------------------------------------------------------------------------
pub const PIN_BUTTON: i32 = 33;        // Touchpad output (active HIGH)
pub const PIN_TOUCH_POWER: i32 = 25;   // Touchpad supply rail
pub const PIN_LED: i32 = 4;            // Status LED
pub const PIN_BATTERY_ADC: i32 = 35;   // Battery divider (ADC1)
pub const PIN_I2C_SDA: i32 = 21;
pub const PIN_I2C_SCL: i32 = 22;
pub const PIN_LCD_SCLK: i32 = 18;
pub const PIN_LCD_MOSI: i32 = 19;
pub const PIN_LCD_CS: i32 = 5;
pub const PIN_LCD_DC: i32 = 23;
pub const PIN_LCD_RST: i32 = 26;
pub const PIN_LCD_BACKLIGHT: i32 = 27;

/// Pins whose level must survive deep sleep.
pub const HOLD_PINS: [i32; 14] = [27, 21, 22, 18, 19, 23, 26, 5, 25, 4, 2, 0, 12, 15];

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_MPU9250: u8 = 0x69;
pub const I2C_ADDR_AK8963: u8 = 0x0C;
pub const I2C_ADDR_PCF8563: u8 = 0x51;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Display (ST7735S, landscape native)
// ---------------------------------------------------------------------------
pub const SCREEN_WIDTH: u32 = 160;
pub const SCREEN_HEIGHT: u32 = 80;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const AMBIENT_TICK_MS: u64 = 950;
pub const AMBIENT_TICKS: u32 = 60;
pub const PROMPT_MS: u64 = 1000;
pub const HOLD_THRESHOLD_MS: u64 = 2000;
pub const RELEASE_TIMEOUT_MS: u64 = 10_000;
pub const BUTTON_POLL_MS: u32 = 10;
pub const REDRAW_POLL_MS: u32 = 20;
pub const CALENDAR_TIMEOUT_MS: u64 = 20_000;
pub const CALENDAR_EXIT_MS: u32 = 400;
pub const MENU_TIMEOUT_MS: u64 = 100_000;
pub const EDITOR_TIMEOUT_MS: u64 = 50_000;
pub const WIFI_TIMEOUT_MS: u64 = 50_000;
pub const COMPASS_DURATION_MS: u64 = 149_000;
pub const COMPASS_GRACE_MS: u64 = 6_000;
pub const COMPASS_FRAME_MS: u32 = 50;
pub const SAVED_CONFIRM_MS: u32 = 2_000;
pub const NOTICE_MS: u32 = 4_000;

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------
pub const ORIENTATION_DEAD_ZONE: f32 = 0.1;     // g
pub const ACCEL_SCALE_2G: f32 = 16384.0;        // LSB/g at ±2 g
pub const MAG_SCALE_16BIT: f32 = 0.15;          // µT/LSB in 16-bit output mode
pub const CALIBRATION_SAMPLES: u16 = 256;
pub const CALIBRATION_DELAY_MS: u32 = 200;

// ---------------------------------------------------------------------------
// Wi-Fi / Storage
// ---------------------------------------------------------------------------
pub const WIFI_PAGE_SIZE: usize = 5;
pub const NVS_NAMESPACE: &str = "tapwatch";
pub const NVS_CALIBRATION_KEY: &str = "calib";

// ---------------------------------------------------------------------------
// Device variants
// ---------------------------------------------------------------------------

/// Per-variant interaction and power thresholds.
///
/// The watch family ships with slightly different tap thresholds, weekday
/// numbering and battery dividers. Each board picks one profile at boot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    /// Ambient tap count that opens the calendar.
    pub calendar_taps: u32,
    /// Ambient tap count that opens the menu.
    pub menu_taps: u32,
    pub battery: BatteryBands,
    /// RTC weekday value that means Sunday.
    pub weekday_base: u8,
}

impl Profile {
    /// T-Watch-2020 with MPU9250, compass and Wi-Fi.
    pub const TWATCH_MPU9250: Profile = Profile {
        calendar_taps: 2,
        menu_taps: 5,
        battery: BatteryBands::ADC_9BIT,
        weekday_base: 0,
    };

    /// Variant without magnetometer, 12-bit ADC and 1-based weekdays.
    pub const TWATCH_MPU6050: Profile = Profile {
        calendar_taps: 2,
        menu_taps: 4,
        battery: BatteryBands::ADC_12BIT,
        weekday_base: 1,
    };
}

impl Default for Profile {
    fn default() -> Self {
        Self::TWATCH_MPU9250
    }
}
