// TapWatch - Screen Renderer
//
// Stateless drawing routines. Each screen has a static part (frames,
// icons) drawn once per orientation or mode change and a dynamic part
// redrawn every tick. Callers own clearing and panel rotation.

use anyhow::Result;
use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10},
        MonoFont, MonoTextStyleBuilder,
    },
    pixelcolor::{Rgb565, RgbColor, WebColors},
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle},
    text::{Baseline, Text},
};

use crate::battery::BatteryLevel;
use crate::events::{is_weekend, AccessPoint, CalendarDate, TimeOfDay, WEEKDAY_NAMES};
use crate::orientation::Orientation;
use crate::platform::Canvas;

const LARGE: MonoFont<'static> = FONT_10X20;
const SMALL: MonoFont<'static> = FONT_6X10;

const BAR_LEN: u32 = 88;
const BAR_THICKNESS: u32 = 12;

const COMPASS_CENTER: Point = Point::new(40, 80);

const ACTIVE_FIELD: Rgb565 = Rgb565::RED;
const IDLE_FIELD: Rgb565 = Rgb565::GREEN;

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

pub fn clear<D: Canvas>(d: &mut D) -> Result<()> {
    d.clear(Rgb565::BLACK)
}

pub fn two_digits(value: u8) -> String {
    format!("{value:02}")
}

fn text<D: Canvas>(d: &mut D, s: &str, x: i32, y: i32, font: &MonoFont<'_>, color: Rgb565) -> Result<()> {
    let style = MonoTextStyleBuilder::new()
        .font(font)
        .text_color(color)
        .background_color(Rgb565::BLACK)
        .build();
    Text::with_baseline(s, Point::new(x, y), style, Baseline::Top).draw(d)?;
    Ok(())
}

fn fill_rect<D: Canvas>(d: &mut D, x: i32, y: i32, w: u32, h: u32, color: Rgb565) -> Result<()> {
    Rectangle::new(Point::new(x, y), Size::new(w, h))
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(d)
}

fn frame_rect<D: Canvas>(d: &mut D, x: i32, y: i32, w: u32, h: u32, color: Rgb565) -> Result<()> {
    Rectangle::new(Point::new(x, y), Size::new(w, h))
        .into_styled(PrimitiveStyle::with_stroke(color, 1))
        .draw(d)
}

fn disc<D: Canvas>(d: &mut D, center: Point, radius: u32, stroke: Rgb565, fill: Rgb565) -> Result<()> {
    let style = PrimitiveStyleBuilder::new()
        .stroke_color(stroke)
        .stroke_width(1)
        .fill_color(fill)
        .build();
    Circle::with_center(center, radius * 2 + 1)
        .into_styled(style)
        .draw(d)
}

fn line<D: Canvas>(d: &mut D, from: Point, to: Point, color: Rgb565) -> Result<()> {
    Line::new(from, to)
        .into_styled(PrimitiveStyle::with_stroke(color, 1))
        .draw(d)
}

fn polar(center: Point, angle: f32, radius: f32) -> Point {
    Point::new(
        center.x + (angle.cos() * radius) as i32,
        center.y + (angle.sin() * radius) as i32,
    )
}

// ---------------------------------------------------------------------------
// Clock face
// ---------------------------------------------------------------------------

/// Seconds dial ring and battery frame.
pub fn clock_chrome<D: Canvas>(d: &mut D, orientation: Orientation) -> Result<()> {
    if orientation.is_vertical() {
        disc(d, Point::new(57, 77), 15, Rgb565::GREEN, Rgb565::BLACK)?;
        frame_rect(d, 10, 60, 18, 92, Rgb565::GREEN)?;
        frame_rect(d, 15, 56, 8, 5, Rgb565::GREEN)?;
        line(d, Point::new(16, 60), Point::new(21, 60), Rgb565::BLACK)
    } else {
        disc(d, Point::new(136, 26), 15, Rgb565::GREEN, Rgb565::BLACK)?;
        frame_rect(d, 14, 48, 92, 18, Rgb565::GREEN)?;
        frame_rect(d, 105, 53, 5, 8, Rgb565::GREEN)?;
        line(d, Point::new(105, 54), Point::new(105, 59), Rgb565::BLACK)
    }
}

pub fn clock_face<D: Canvas>(
    d: &mut D,
    orientation: Orientation,
    time: &TimeOfDay,
    tick: u32,
    battery: &BatteryLevel,
) -> Result<()> {
    let hhmm = format!("{}:{}", two_digits(time.hours), two_digits(time.minutes));
    let seconds = two_digits(time.seconds);

    if orientation.is_vertical() {
        text(d, &hhmm, 15, 17, &LARGE, Rgb565::WHITE)?;
        text(d, &seconds, 51, 72, &SMALL, Rgb565::YELLOW)?;
        swing(d, Point::new(57, 92), 130, [50, 64], tick)?;
    } else {
        text(d, &hhmm, 20, 14, &LARGE, Rgb565::WHITE)?;
        text(d, &seconds, 130, 21, &SMALL, Rgb565::YELLOW)?;
        swing(d, Point::new(136, 41), 60, [142, 130], tick)?;
    }

    battery_bar(d, orientation, battery)
}

/// Two-position pendulum under the seconds dial; flips every tick.
fn swing<D: Canvas>(d: &mut D, pivot: Point, y: i32, xs: [i32; 2], tick: u32) -> Result<()> {
    let (old, new) = if tick % 2 == 0 { (xs[1], xs[0]) } else { (xs[0], xs[1]) };

    line(d, pivot, Point::new(old, y), Rgb565::BLACK)?;
    disc(d, Point::new(old, y), 3, Rgb565::BLACK, Rgb565::BLACK)?;
    line(d, pivot, Point::new(new, y), Rgb565::GREEN)?;
    disc(d, Point::new(new, y), 3, Rgb565::GREEN, Rgb565::GREEN)
}

pub fn battery_bar<D: Canvas>(d: &mut D, orientation: Orientation, level: &BatteryLevel) -> Result<()> {
    let filled = level.fill_len(BAR_LEN).min(BAR_LEN);
    let color = level.band.color();

    if orientation.is_vertical() {
        // Fills from the bottom up.
        let top = 62;
        fill_rect(d, 13, top, BAR_THICKNESS, BAR_LEN - filled, Rgb565::BLACK)?;
        fill_rect(d, 13, top + (BAR_LEN - filled) as i32, BAR_THICKNESS, filled, color)
    } else {
        fill_rect(d, 18 + filled as i32, 51, BAR_LEN - filled, BAR_THICKNESS, Rgb565::BLACK)?;
        fill_rect(d, 18, 51, filled, BAR_THICKNESS, color)
    }
}

/// Transient "Date" / "Menu" overlay shown while taps accumulate.
pub fn prompt<D: Canvas>(d: &mut D, label: &str) -> Result<()> {
    text(d, label, 6, 25, &LARGE, Rgb565::CSS_PURPLE)
}

// ---------------------------------------------------------------------------
// Calendar & editors
// ---------------------------------------------------------------------------

fn weekday_color(index: u8) -> Rgb565 {
    if is_weekend(index) {
        Rgb565::RED
    } else {
        Rgb565::CSS_FOREST_GREEN
    }
}

fn weekday_name(index: u8) -> String {
    format!("{:<9}", WEEKDAY_NAMES[usize::from(index % 7)])
}

/// `weekday` is the Sunday-first index.
pub fn calendar<D: Canvas>(d: &mut D, date: &CalendarDate, weekday: u8) -> Result<()> {
    let line1 = format!(
        "{}.{}.20{}",
        two_digits(date.day),
        two_digits(date.month),
        two_digits(date.year)
    );
    text(d, &line1, 0, 10, &LARGE, Rgb565::WHITE)?;
    text(d, &weekday_name(weekday), 6, 44, &LARGE, weekday_color(weekday))
}

fn field_color(field: usize, active: usize) -> Rgb565 {
    if field == active {
        ACTIVE_FIELD
    } else {
        IDLE_FIELD
    }
}

pub fn time_editor<D: Canvas>(d: &mut D, hours: u8, minutes: u8, active: usize) -> Result<()> {
    text(d, &two_digits(hours), 35, 25, &LARGE, field_color(0, active))?;
    text(d, ":", 55, 25, &LARGE, Rgb565::GREEN)?;
    text(d, &two_digits(minutes), 65, 25, &LARGE, field_color(1, active))
}

pub fn date_editor<D: Canvas>(d: &mut D, day: u8, month: u8, year: u8, active: usize) -> Result<()> {
    text(d, &two_digits(day), 5, 25, &LARGE, field_color(0, active))?;
    text(d, ".", 25, 25, &LARGE, Rgb565::GREEN)?;
    text(d, &two_digits(month), 35, 25, &LARGE, field_color(1, active))?;
    text(d, ".20", 55, 25, &LARGE, Rgb565::GREEN)?;
    text(d, &two_digits(year), 85, 25, &LARGE, field_color(2, active))
}

pub fn weekday_editor<D: Canvas>(d: &mut D, weekday: u8) -> Result<()> {
    text(d, &weekday_name(weekday), 5, 25, &LARGE, weekday_color(weekday))
}

// ---------------------------------------------------------------------------
// Menu, notices, lists
// ---------------------------------------------------------------------------

pub fn menu<D: Canvas>(d: &mut D, label: &str) -> Result<()> {
    text(d, "menu", 0, 0, &SMALL, Rgb565::CSS_PURPLE)?;
    text(d, &format!("{label:<10}"), 10, 25, &LARGE, Rgb565::GREEN)
}

pub fn notice<D: Canvas>(d: &mut D, message: &str, color: Rgb565) -> Result<()> {
    text(d, message, 10, 25, &LARGE, color)
}

pub fn saved<D: Canvas>(d: &mut D) -> Result<()> {
    notice(d, "Saved", Rgb565::GREEN)
}

pub fn wifi_page<D: Canvas>(d: &mut D, points: &[AccessPoint], page: usize, pages: usize) -> Result<()> {
    for (row, ap) in points.iter().enumerate() {
        let ssid: String = ap.ssid.chars().take(18).collect();
        let entry = format!("{ssid:<18}{:>5}", ap.rssi);
        text(d, &entry, 2, row as i32 * 13, &SMALL, Rgb565::GREEN)?;
    }
    let footer = format!("{}/{}", page + 1, pages);
    text(d, &footer, 130, 68, &SMALL, Rgb565::CSS_GRAY)
}

// ---------------------------------------------------------------------------
// Compass (portrait frame)
// ---------------------------------------------------------------------------

pub fn compass_chrome<D: Canvas>(d: &mut D) -> Result<()> {
    disc(d, COMPASS_CENTER, 3, Rgb565::BLACK, Rgb565::GREEN)?;
    disc(d, Point::new(40, 36), 3, Rgb565::BLACK, Rgb565::CSS_GRAY)?;
    disc(d, Point::new(40, 124), 3, Rgb565::BLACK, Rgb565::CSS_GRAY)
}

/// Erase the needle at `previous` degrees and draw it at `current`. The
/// short tail leans against the direction of travel.
pub fn compass_needle<D: Canvas>(d: &mut D, previous: i32, current: i32, direction: i32) -> Result<()> {
    let prev = (previous as f32).to_radians();
    let cur = (current as f32).to_radians();
    let lean = if direction < 0 { -10.0 } else { 10.0 };

    let stale_tail = polar(COMPASS_CENTER, prev + 1.5, -lean);
    line(d, polar(COMPASS_CENTER, prev, 35.0), stale_tail, Rgb565::BLACK)?;
    line(d, polar(COMPASS_CENTER, prev, 36.0), stale_tail, Rgb565::BLACK)?;

    let tail = polar(COMPASS_CENTER, prev + 1.5, lean);
    line(d, polar(COMPASS_CENTER, cur, 34.0), tail, Rgb565::RED)
}

pub fn compass_label<D: Canvas>(d: &mut D, label: &str) -> Result<()> {
    text(d, &format!(" {label:<3}"), 10, 0, &LARGE, Rgb565::WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battery::{gauge, BatteryBands};
    use crate::testing::TestDisplay;

    #[test]
    fn digits_are_zero_padded() {
        assert_eq!(two_digits(0), "00");
        assert_eq!(two_digits(7), "07");
        assert_eq!(two_digits(59), "59");
    }

    #[test]
    fn swing_alternates_between_ticks() {
        let mut d = TestDisplay::new();
        swing(&mut d, Point::new(136, 41), 60, [142, 130], 0).unwrap();
        assert_eq!(d.pixel(142, 60), Some(Rgb565::GREEN));
        assert_eq!(d.pixel(130, 60), Some(Rgb565::BLACK));

        swing(&mut d, Point::new(136, 41), 60, [142, 130], 1).unwrap();
        assert_eq!(d.pixel(130, 60), Some(Rgb565::GREEN));
        assert_eq!(d.pixel(142, 60), Some(Rgb565::BLACK));
    }

    #[test]
    fn battery_bar_fill_matches_level() {
        let mut d = TestDisplay::new();
        let full = gauge(400, &BatteryBands::ADC_9BIT);
        battery_bar(&mut d, Orientation::Horizontal0, &full).unwrap();
        assert_eq!(d.pixel(18, 55), Some(Rgb565::GREEN));
        assert_eq!(d.pixel(105, 55), Some(Rgb565::GREEN));

        let low = gauge(215, &BatteryBands::ADC_9BIT);
        battery_bar(&mut d, Orientation::Horizontal0, &low).unwrap();
        assert_eq!(d.pixel(18, 55), Some(Rgb565::RED));
        assert_eq!(d.pixel(105, 55), Some(Rgb565::BLACK));
    }

    #[test]
    fn clock_face_stays_on_panel() {
        let time = TimeOfDay { hours: 23, minutes: 59, seconds: 58 };
        let level = gauge(250, &BatteryBands::ADC_9BIT);
        for orientation in [Orientation::Horizontal0, Orientation::VerticalUp] {
            let mut d = TestDisplay::new();
            d.set_orientation_dims(orientation);
            clock_chrome(&mut d, orientation).unwrap();
            clock_face(&mut d, orientation, &time, 3, &level).unwrap();
            assert_eq!(d.out_of_bounds(), 0, "{orientation:?}");
            assert!(d.lit_pixels() > 0);
        }
    }
}
