//! Period-wide decorations: day ticks and the midpoint band.

use chrono::{Datelike, Weekday};
use embedded_graphics::pixelcolor::Gray8;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use habitboard_core::Period;

const TICK_GAP: i32 = 3;
const TICK_LENGTH: u32 = 5;
const WEEKEND_EXTRA: u32 = 2;
const TICK_WIDTH: u32 = 2;

/// Width of the midpoint band, in days of the period.
const BAND_DAYS: f64 = 2.0;

/// X of the tick for day boundary `day` (0..=length), within `[left, left + width - TICK_WIDTH]`.
pub fn tick_x(left: i32, width: u32, day: u32, length_days: u32) -> i32 {
    let length = length_days.max(1) as f64;
    let x = left + ((day as f64 / length) * width as f64).floor() as i32;
    let max_x = (left + width as i32 - TICK_WIDTH as i32).max(left);
    x.clamp(left, max_x)
}

/// Whether the calendar day at boundary `day` falls on a weekend.
pub fn is_weekend(period: &Period, day: u32) -> bool {
    matches!(period.date_of_day(day).weekday(), Weekday::Sat | Weekday::Sun)
}

/// Draw one tick per day boundary below `top`; weekend ticks are longer.
pub fn draw_day_ticks<D>(target: &mut D, period: &Period, left: i32, width: u32, top: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    for day in 0..=period.length_days {
        let x = tick_x(left, width, day, period.length_days);
        let length = if is_weekend(period, day) {
            TICK_LENGTH + WEEKEND_EXTRA
        } else {
            TICK_LENGTH
        };
        Rectangle::new(Point::new(x, top + TICK_GAP), Size::new(TICK_WIDTH, length))
            .into_styled(PrimitiveStyle::with_fill(Gray8::BLACK))
            .draw(target)?;
    }
    Ok(())
}

/// Band centred on the period midpoint, two days wide, spanning `top..bottom`.
pub fn midpoint_band(period: &Period, left: i32, width: u32, top: i32, bottom: i32) -> Rectangle {
    let length = period.length_days.max(1) as f64;
    let band_width = ((BAND_DAYS / length) * width as f64).floor() as u32;
    let centre = left + width as i32 / 2;
    Rectangle::new(
        Point::new(centre - band_width as i32 / 2, top),
        Size::new(band_width, (bottom - top).max(0) as u32),
    )
}

/// Fill `area` with a sparse dot grid: a light tone that survives hard
/// two-level thresholding.
pub fn draw_stipple<D>(target: &mut D, area: &Rectangle) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    let dots = area
        .points()
        .filter(|p| p.x % 2 == 0 && p.y % 2 == 0)
        .map(|p| Pixel(p, Gray8::BLACK));
    target.draw_iter(dots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use chrono::NaiveDate;

    fn fortnight() -> Period {
        // Sunday
        Period::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(), 14)
    }

    #[test]
    fn test_weekend_days() {
        let period = fortnight();
        let weekends: Vec<u32> = (0..=14).filter(|&d| is_weekend(&period, d)).collect();
        assert_eq!(weekends, vec![0, 6, 7, 13, 14]);
    }

    #[test]
    fn test_ticks_cover_the_bar() {
        assert_eq!(tick_x(20, 760, 0, 14), 20);
        assert_eq!(tick_x(20, 760, 7, 14), 400);
        assert_eq!(tick_x(20, 760, 14, 14), 778);
    }

    #[test]
    fn test_weekend_ticks_are_longer() {
        let period = fortnight();
        let mut canvas = Canvas::new(Size::new(800, 40));
        draw_day_ticks(&mut canvas, &period, 20, 760, 10).unwrap();
        let bitmap = canvas.quantize();
        // Day 0 (Sunday) reaches 2px further than day 1 (Monday).
        let day1 = tick_x(20, 760, 1, 14) as u32;
        assert!(bitmap.is_black(20, 13 + 6));
        assert!(!bitmap.is_black(day1, 13 + 6));
        assert!(bitmap.is_black(day1, 13 + 4));
    }

    #[test]
    fn test_midpoint_band_geometry() {
        let band = midpoint_band(&fortnight(), 20, 760, 52, 480);
        assert_eq!(band.size.width, 108);
        assert_eq!(band.top_left, Point::new(400 - 54, 52));
        assert_eq!(band.size.height, 428);
    }

    #[test]
    fn test_stipple_is_sparse() {
        let mut canvas = Canvas::new(Size::new(20, 20));
        let area = Rectangle::new(Point::zero(), Size::new(20, 20));
        draw_stipple(&mut canvas, &area).unwrap();
        assert_eq!(canvas.quantize().black_pixels(), 100);
    }
}
