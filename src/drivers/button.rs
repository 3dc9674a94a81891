// TapWatch - Touch Button & Time Base
//
// The touchpad reports a plain level on GPIO33 and needs its supply rail
// on GPIO25. Both edges raise an interrupt whose only job is to record
// into the wake latch.

use std::time::Duration;

use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, Input, InterruptType, Output, PinDriver};
use tapwatch::platform::{Button, Clock};
use tapwatch::WakeLatch;

pub struct TouchButton {
    pin: PinDriver<'static, AnyIOPin, Input>,
    _power: PinDriver<'static, AnyOutputPin, Output>,
}

impl TouchButton {
    pub fn new(
        mut pin: PinDriver<'static, AnyIOPin, Input>,
        mut power: PinDriver<'static, AnyOutputPin, Output>,
        latch: &'static WakeLatch,
    ) -> anyhow::Result<Self> {
        power.set_high()?;

        pin.set_interrupt_type(InterruptType::AnyEdge)?;
        // SAFETY: the callback only touches atomics in a 'static latch.
        unsafe {
            pin.subscribe(move || latch.record())?;
        }
        pin.enable_interrupt()?;

        Ok(Self { pin, _power: power })
    }
}

impl Button for TouchButton {
    fn is_pressed(&mut self) -> bool {
        // The driver disarms the interrupt after every trigger.
        if let Err(e) = self.pin.enable_interrupt() {
            log::debug!("Button interrupt re-arm failed: {}", e);
        }
        self.pin.is_high()
    }
}

/// Milliseconds since boot plus FreeRTOS delays.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        let us = unsafe { esp_idf_sys::esp_timer_get_time() };
        Duration::from_micros(us.max(0) as u64).as_millis() as u64
    }

    fn delay_ms(&mut self, ms: u32) {
        FreeRtos::delay_ms(ms);
    }
}
