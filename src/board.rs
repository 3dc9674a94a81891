// TapWatch - T-Watch-2020 Board Binding
//
// Concrete collaborator types for the device build.

use tapwatch::platform::Platform;

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

pub struct TWatch;

impl Platform for TWatch {
    type Display = Lcd;
    type Rtc = Pcf8563;
    type Accel = Mpu9250;
    type Mag = Ak8963;
    type Battery = AdcBattery;
    type Button = TouchButton;
    type Clock = SystemClock;
    type Store = NvsStore;
    type Wifi = Scanner;
    type Led = Led<'static>;
    type Power = DeepSleep;
}
