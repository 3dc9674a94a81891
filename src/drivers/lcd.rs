// TapWatch - ST7735S Panel
//
// 80x160 IPS panel on SPI2, driven through mipidsi. The wrapper turns the
// interface error into `anyhow::Error` so the renderer can use `?`.

use anyhow::anyhow;
use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};
use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_hal::spi::{SpiDeviceDriver, SpiDriver};
use mipidsi::interface::SpiInterface;
use mipidsi::models::ST7735s;
use mipidsi::options::{ColorInversion, ColorOrder, Orientation as PanelOrientation, Rotation};
use mipidsi::Builder;
use tapwatch::orientation::Orientation;
use tapwatch::platform::WatchDisplay;

type OutPin = PinDriver<'static, AnyOutputPin, Output>;
type Interface = SpiInterface<'static, SpiDeviceDriver<'static, SpiDriver<'static>>, OutPin>;
type Panel = mipidsi::Display<Interface, ST7735s, OutPin>;

// Visible window inside the controller's 132x162 RAM.
const OFFSET_X: u16 = 26;
const OFFSET_Y: u16 = 1;

pub struct Lcd {
    panel: Panel,
    backlight: OutPin,
    delay: Ets,
}

impl Lcd {
    pub fn new(
        spi: SpiDeviceDriver<'static, SpiDriver<'static>>,
        dc: OutPin,
        reset: OutPin,
        mut backlight: OutPin,
    ) -> anyhow::Result<Self> {
        // The interface keeps this buffer for the firmware's lifetime.
        let buffer: &'static mut [u8] = Box::leak(Box::new([0u8; 512]));
        let di = SpiInterface::new(spi, dc, buffer);

        let mut delay = Ets;
        let panel = Builder::new(ST7735s, di)
            .display_size(80, 160)
            .display_offset(OFFSET_X, OFFSET_Y)
            .invert_colors(ColorInversion::Inverted)
            .color_order(ColorOrder::Bgr)
            .reset_pin(reset)
            .init(&mut delay)
            .map_err(|e| anyhow!("ST7735S init failed: {:?}", e))?;

        backlight.set_high()?;
        log::info!("ST7735S initialised");
        Ok(Self { panel, backlight, delay })
    }
}

fn rotation(orientation: Orientation) -> Rotation {
    match orientation.quadrant() {
        0 => Rotation::Deg0,
        1 => Rotation::Deg90,
        2 => Rotation::Deg180,
        _ => Rotation::Deg270,
    }
}

impl OriginDimensions for Lcd {
    fn size(&self) -> Size {
        self.panel.size()
    }
}

impl DrawTarget for Lcd {
    type Color = Rgb565;
    type Error = anyhow::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.panel
            .draw_iter(pixels)
            .map_err(|e| anyhow!("LCD write failed: {:?}", e))
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        self.panel
            .fill_contiguous(area, colors)
            .map_err(|e| anyhow!("LCD write failed: {:?}", e))
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.panel
            .fill_solid(area, color)
            .map_err(|e| anyhow!("LCD write failed: {:?}", e))
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.panel
            .clear(color)
            .map_err(|e| anyhow!("LCD clear failed: {:?}", e))
    }
}

impl WatchDisplay for Lcd {
    fn set_orientation(&mut self, orientation: Orientation) -> anyhow::Result<()> {
        self.panel
            .set_orientation(PanelOrientation::new().rotate(rotation(orientation)))
            .map_err(|e| anyhow!("LCD rotation failed: {:?}", e))
    }

    fn set_sleep(&mut self, asleep: bool) -> anyhow::Result<()> {
        if asleep {
            self.backlight.set_low()?;
            self.panel
                .sleep(&mut self.delay)
                .map_err(|e| anyhow!("LCD sleep failed: {:?}", e))
        } else {
            self.panel
                .wake(&mut self.delay)
                .map_err(|e| anyhow!("LCD wake failed: {:?}", e))?;
            self.backlight.set_high()?;
            Ok(())
        }
    }
}
