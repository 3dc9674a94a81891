// TapWatch - Status LED
//
// Plain GPIO output on the board's indicator LED.

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
use tapwatch::platform::StatusLed;

pub struct Led<'d> {
    pin: PinDriver<'d, AnyOutputPin, Output>,
}

impl<'d> Led<'d> {
    pub fn new(pin: PinDriver<'d, AnyOutputPin, Output>) -> Self {
        Self { pin }
    }
}

impl StatusLed for Led<'_> {
    fn set(&mut self, on: bool) -> anyhow::Result<()> {
        if on {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }
        Ok(())
    }
}
