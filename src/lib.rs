// TapWatch - Firmware Core
//
// Hardware-independent part of the watch: state machine, input handling,
// sensor math and drawing. The `device` feature adds the ESP32 binary that
// plugs real peripherals into `platform::Platform`.

pub mod battery;
pub mod calibration;
pub mod compass;
pub mod config;
pub mod events;
pub mod input;
pub mod modes;
pub mod orientation;
pub mod platform;
mod power;
pub mod render;
pub mod watch;

#[cfg(test)]
mod testing;

pub use config::Profile;
pub use input::WakeLatch;
pub use watch::{DeviceState, Flow, Watch};
