//! Header, footer and placeholder text.

use chrono::NaiveDateTime;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Gray8;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use habitboard_core::{Goal, Period};

use crate::layout::{Fonts, LayoutConfig};

const DIVIDER_THICKNESS: u32 = 2;
const TITLE_Y: i32 = 10;
const SUBTITLE_Y: i32 = 32;
const FOOTER_TEXT_GAP: i32 = 8;

/// "Oct 18 - Oct 31, 2026"
pub fn period_range_text(period: &Period) -> String {
    format!(
        "{} - {}",
        period.start.format("%b %d"),
        period.end().format("%b %d, %Y")
    )
}

/// "Day 2 of 14 (Mon)"
pub fn day_text(period: &Period, now: NaiveDateTime) -> String {
    let day = (now.date() - period.start.date())
        .num_days()
        .clamp(0, period.length_days.saturating_sub(1) as i64);
    format!("Day {} of {} ({})", day + 1, period.length_days, now.format("%a"))
}

/// "Updated: 09:30"
pub fn updated_text(now: NaiveDateTime) -> String {
    format!("Updated: {}", now.format("%H:%M"))
}

/// Whole numbers without decimals, everything else to one place.
pub fn format_amount(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Aggregate totals across goals: "Total: 7/16 (44%)".
pub fn totals_text(goals: &[Goal], period: &Period) -> String {
    let count: u64 = goals.iter().map(|g| g.progress.current_count).sum();
    let target: f64 = goals
        .iter()
        .map(|g| g.config.period_target(period.length_days))
        .sum();
    let percent = if target > 0.0 {
        (count as f64 / target * 100.0).round()
    } else {
        0.0
    };
    format!("Total: {}/{} ({:.0}%)", count, format_amount(target), percent)
}

/// Draw `text` with its top edge at `position`.
pub fn draw_text<D>(
    target: &mut D,
    text: &str,
    position: Point,
    font: &MonoFont<'_>,
    alignment: Alignment,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    let style = MonoTextStyle::new(font, Gray8::BLACK);
    let text_style = TextStyleBuilder::new()
        .alignment(alignment)
        .baseline(Baseline::Top)
        .build();
    Text::with_text_style(text, position, style, text_style).draw(target)?;
    Ok(())
}

fn draw_divider<D>(target: &mut D, layout: &LayoutConfig, width: u32, y: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    let x = layout.margins.x;
    Rectangle::new(
        Point::new(x as i32, y),
        Size::new(width.saturating_sub(2 * x), DIVIDER_THICKNESS),
    )
    .into_styled(PrimitiveStyle::with_fill(Gray8::BLACK))
    .draw(target)?;
    Ok(())
}

/// Header band: period range, day counter, and for the compact style the
/// right-aligned update time.
pub fn draw_header<D>(
    target: &mut D,
    layout: &LayoutConfig,
    fonts: &Fonts,
    width: u32,
    period: &Period,
    now: NaiveDateTime,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    let left = layout.margins.x as i32;
    let right = width as i32 - layout.margins.x as i32;

    draw_text(target, &period_range_text(period), Point::new(left, TITLE_Y), fonts.title, Alignment::Left)?;
    draw_text(target, &day_text(period, now), Point::new(left, SUBTITLE_Y), fonts.small, Alignment::Left)?;

    if !layout.has_footer() {
        draw_text(target, &updated_text(now), Point::new(right, SUBTITLE_Y), fonts.small, Alignment::Right)?;
    }

    draw_divider(target, layout, width, layout.margins.header_divider as i32)
}

/// Footer band: totals on the left, update time on the right.
pub fn draw_footer<D>(
    target: &mut D,
    layout: &LayoutConfig,
    fonts: &Fonts,
    size: Size,
    goals: &[Goal],
    period: &Period,
    now: NaiveDateTime,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    let top = size.height as i32 - layout.margins.footer_height as i32;
    let left = layout.margins.x as i32;
    let right = size.width as i32 - layout.margins.x as i32;
    let text_y = top + FOOTER_TEXT_GAP;

    draw_divider(target, layout, size.width, top)?;
    draw_text(target, &totals_text(goals, period), Point::new(left, text_y), fonts.small, Alignment::Left)?;
    draw_text(target, &updated_text(now), Point::new(right, text_y), fonts.small, Alignment::Right)
}

/// Centred message used when there are no goals to show.
pub fn draw_placeholder<D>(target: &mut D, fonts: &Fonts, size: Size, message: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    let style = MonoTextStyle::new(fonts.body, Gray8::BLACK);
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();
    let centre = Point::new(size.width as i32 / 2, size.height as i32 / 2);
    Text::with_text_style(message, centre, style, text_style).draw(target)?;
    Ok(())
}
