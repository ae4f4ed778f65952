//! The dashboard renderer.
//!
//! Layout, top to bottom:
//! ```text
//! header band (period, day N of L, update time)
//! goal rows, equal height: name + counts, then the bar with its marker
//! day ticks
//! footer (header_footer style only)
//! ```

use chrono::NaiveDateTime;
use embedded_graphics::pixelcolor::Gray8;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Alignment;
use habitboard_core::{Goal, Period};
use tracing::{debug, info};

use crate::bar::{self, BarGeometry};
use crate::bitmap::Bitmap;
use crate::calendar;
use crate::canvas::Canvas;
use crate::header::{self, format_amount};
use crate::layout::{Fonts, LayoutConfig};

/// Shown instead of goal rows when the goal list is empty.
pub const NO_GOALS_MESSAGE: &str = "No goals configured";

/// Placement of one goal row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    /// Y of the goal name
    pub top: i32,
    /// The row's progress bar
    pub bar: BarGeometry,
}

/// Renders goals into a two-level bitmap. Holds only immutable layout state.
#[derive(Debug, Clone)]
pub struct Renderer {
    layout: LayoutConfig,
    fonts: Fonts,
}

impl Renderer {
    /// Create a renderer, resolving fonts once.
    pub fn new(layout: LayoutConfig) -> Self {
        let fonts = Fonts::resolve(&layout.fonts);
        Self { layout, fonts }
    }

    /// The layout policy.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Evenly split the space between header and bottom reserve across goals.
    pub fn rows(&self, goal_count: usize, size: Size) -> Vec<RowLayout> {
        if goal_count == 0 {
            return Vec::new();
        }
        let margins = &self.layout.margins;
        let available = size
            .height
            .saturating_sub(margins.header_height)
            .saturating_sub(self.layout.bottom_reserve());
        let row_height = available as f64 / goal_count as f64;
        let bar_width = size.width.saturating_sub(2 * margins.x);

        (0..goal_count)
            .map(|i| {
                let top = margins.header_height as i32 + (i as f64 * row_height).floor() as i32;
                RowLayout {
                    top,
                    bar: BarGeometry::new(
                        margins.x as i32,
                        top + margins.bar_offset as i32,
                        bar_width,
                        self.layout.bar.height(),
                    ),
                }
            })
            .collect()
    }

    /// Render to a two-level bitmap of `size`.
    pub fn render(&self, goals: &[Goal], period: &Period, now: NaiveDateTime, size: Size) -> Bitmap {
        info!("Rendering dashboard with {} goals", goals.len());
        let mut canvas = Canvas::new(size);
        match self.draw(&mut canvas, goals, period, now) {
            Ok(()) => {}
            Err(never) => match never {},
        }
        canvas.quantize()
    }

    /// Draw the full dashboard onto any grayscale target.
    pub fn draw<D>(&self, target: &mut D, goals: &[Goal], period: &Period, now: NaiveDateTime) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Gray8>,
    {
        let size = target.bounding_box().size;
        let layout = &self.layout;
        target.clear(Gray8::WHITE)?;

        if layout.midpoint_band && period.length_days >= 14 {
            let bottom = if layout.has_footer() {
                size.height.saturating_sub(layout.margins.footer_height)
            } else {
                size.height
            };
            let band = calendar::midpoint_band(
                period,
                layout.margins.x as i32,
                size.width.saturating_sub(2 * layout.margins.x),
                layout.margins.header_divider as i32,
                bottom as i32,
            );
            calendar::draw_stipple(target, &band)?;
        }

        header::draw_header(target, layout, &self.fonts, size.width, period, now)?;

        let rows = self.rows(goals.len(), size);
        if rows.is_empty() {
            header::draw_placeholder(target, &self.fonts, size, NO_GOALS_MESSAGE)?;
        }

        for (goal, row) in goals.iter().zip(&rows) {
            self.draw_row(target, goal, row, period, size)?;
        }

        if let Some(last) = rows.last() {
            if layout.day_ticks {
                calendar::draw_day_ticks(target, period, last.bar.x, last.bar.width, last.bar.bottom())?;
            }
        }

        if layout.has_footer() {
            header::draw_footer(target, layout, &self.fonts, size, goals, period, now)?;
        }

        Ok(())
    }

    fn draw_row<D>(&self, target: &mut D, goal: &Goal, row: &RowLayout, period: &Period, size: Size) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Gray8>,
    {
        let progress = &goal.progress;
        let period_target = goal.config.period_target(period.length_days);
        debug!(
            "Row '{}' at y={} ({}/{})",
            goal.display_name,
            row.top,
            progress.current_count,
            format_amount(period_target)
        );

        header::draw_text(
            target,
            &goal.label(),
            Point::new(row.bar.x, row.top),
            self.fonts.body,
            Alignment::Left,
        )?;

        if self.layout.show_counts {
            let counts = format!(
                "{}/{}  {}d left",
                progress.current_count,
                format_amount(period_target),
                progress.days_remaining
            );
            let right = size.width as i32 - self.layout.margins.x as i32;
            header::draw_text(target, &counts, Point::new(right, row.top), self.fonts.small, Alignment::Right)?;
        }

        bar::draw_bar(target, &row.bar, progress.current_count, period_target)?;

        let fill_end = row.bar.x + row.bar.filled_width(progress.current_count, period_target) as i32;
        let marker_x = row.bar.marker_x(progress.expected_by_now, period_target);
        bar::draw_marker(target, &row.bar, &self.layout.marker, marker_x, fill_end)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}
