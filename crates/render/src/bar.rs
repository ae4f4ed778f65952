//! Segmented progress bar and the expected-progress marker.

use embedded_graphics::pixelcolor::Gray8;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment, Triangle};
use habitboard_core::fill_fraction;

use crate::layout::MarkerStyle;

const FOREGROUND: Gray8 = Gray8::BLACK;
const BACKGROUND: Gray8 = Gray8::WHITE;

/// Targets within this distance of an integer are treated as whole.
const WHOLE_EPSILON: f64 = 1e-9;

/// Pixel rectangle of one bar: columns `x..x + width`, rows `y..y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarGeometry {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl BarGeometry {
    /// Create a bar rectangle.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// `floor(fill_fraction * width)`; never exceeds the bar.
    pub fn filled_width(&self, current: u64, target: f64) -> u32 {
        let filled = (fill_fraction(current, target) * self.width as f64).floor() as u32;
        filled.min(self.width)
    }

    /// X of each internal segment boundary, or nothing for fractional targets.
    pub fn segment_dividers(&self, target: f64) -> Vec<i32> {
        let Some(segments) = whole_segments(target) else {
            return Vec::new();
        };
        (1..segments)
            .map(|i| self.x + (i as u64 * self.width as u64 / segments as u64) as i32)
            .collect()
    }

    /// Horizontal marker position, kept strictly inside the outline.
    pub fn marker_x(&self, expected: f64, target: f64) -> i32 {
        let fraction = if target > 0.0 {
            (expected / target).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let raw = self.x + (fraction * self.width as f64).floor() as i32;
        let lo = self.x + 2;
        let hi = (self.x + self.width as i32 - 2).max(lo);
        raw.clamp(lo, hi)
    }
}

/// Segment count for a whole-number target.
pub fn whole_segments(target: f64) -> Option<u32> {
    if !target.is_finite() || target < 1.0 {
        return None;
    }
    let rounded = target.round();
    if (target - rounded).abs() < WHOLE_EPSILON {
        Some(rounded as u32)
    } else {
        None
    }
}

/// Draw the fill, outline and segment dividers.
pub fn draw_bar<D>(target: &mut D, bar: &BarGeometry, current: u64, period_target: f64) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    let filled = bar.filled_width(current, period_target);
    let fill_end = bar.x + filled as i32;
    let dividers = bar.segment_dividers(period_target);

    if filled > 0 {
        Rectangle::new(Point::new(bar.x, bar.y), Size::new(filled, bar.height))
            .into_styled(PrimitiveStyle::with_fill(FOREGROUND))
            .draw(target)?;

        // Dividers show through the fill so each increment stays visible.
        for &x in dividers.iter().filter(|&&x| x < fill_end) {
            Rectangle::new(Point::new(x - 1, bar.y), Size::new(2, bar.height))
                .into_styled(PrimitiveStyle::with_fill(BACKGROUND))
                .draw(target)?;
        }
    }

    Rectangle::new(Point::new(bar.x, bar.y), Size::new(bar.width, bar.height))
        .into_styled(
            PrimitiveStyleBuilder::new()
                .stroke_color(FOREGROUND)
                .stroke_width(1)
                .stroke_alignment(StrokeAlignment::Inside)
                .build(),
        )
        .draw(target)?;

    for &x in dividers.iter().filter(|&&x| x >= fill_end) {
        Rectangle::new(Point::new(x, bar.y), Size::new(1, bar.height))
            .into_styled(PrimitiveStyle::with_fill(FOREGROUND))
            .draw(target)?;
    }

    Ok(())
}

/// Draw the dashed expected-progress marker with its arrowhead.
///
/// Dashes over the filled part of the bar are drawn in the background color.
pub fn draw_marker<D>(
    target: &mut D,
    bar: &BarGeometry,
    style: &MarkerStyle,
    marker_x: i32,
    fill_end: i32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Gray8>,
{
    let stroke = style.stroke.max(1);
    let left = marker_x - (stroke as i32) / 2;
    let top = bar.y - style.overhang as i32;
    let bottom = bar.bottom() + style.overhang as i32;
    let on_fill = marker_x < fill_end;

    let mut y = top;
    while y < bottom {
        let run_end = (y + style.dash_on.max(1) as i32).min(bottom);
        for row in y..run_end {
            let inside_bar = row > bar.y && row < bar.bottom() - 1;
            let color = if inside_bar && on_fill { BACKGROUND } else { FOREGROUND };
            Rectangle::new(Point::new(left, row), Size::new(stroke, 1))
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(target)?;
        }
        y = run_end + style.dash_off as i32;
    }

    let half = style.arrow_half_width as i32;
    let base = top - style.arrow_height as i32;
    Triangle::new(
        Point::new(marker_x - half, base),
        Point::new(marker_x + half, base),
        Point::new(marker_x, top - 1),
    )
    .into_styled(PrimitiveStyle::with_fill(FOREGROUND))
    .draw(target)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;

    fn bar() -> BarGeometry {
        BarGeometry::new(20, 30, 760, 20)
    }

    #[test]
    fn test_over_target_fills_exactly_the_bar() {
        let bar = bar();
        assert_eq!(bar.filled_width(5, 4.0), 760);
        assert_eq!(bar.filled_width(2, 4.0), 380);
        assert_eq!(bar.filled_width(0, 4.0), 0);

        let mut canvas = Canvas::new(Size::new(800, 80));
        draw_bar(&mut canvas, &bar, 5, 4.0).unwrap();
        let bitmap = canvas.quantize();
        // Nothing drawn outside the bar rectangle.
        for y in 0..80 {
            assert!(!bitmap.is_black(19, y));
            assert!(!bitmap.is_black(780, y));
        }
        for x in 0..800 {
            assert!(!bitmap.is_black(x, 29));
            assert!(!bitmap.is_black(x, 50));
        }
    }

    #[test]
    fn test_segments_match_whole_targets() {
        let bar = bar();
        for target in 1..=14u32 {
            let dividers = bar.segment_dividers(target as f64);
            assert_eq!(whole_segments(target as f64), Some(target));
            assert_eq!(dividers.len() as u32, target - 1);
            assert!(dividers.windows(2).all(|w| w[0] < w[1]));
        }
        assert_eq!(bar.segment_dividers(8.0)[3], 20 + 380);
    }

    #[test]
    fn test_fractional_targets_have_no_segments() {
        let bar = bar();
        for target in [1.5, 2.25, 0.5, 10.0 / 3.0] {
            assert_eq!(whole_segments(target), None);
            assert!(bar.segment_dividers(target).is_empty());
        }
    }

    #[test]
    fn test_marker_stays_inside_outline() {
        let bar = bar();
        for target in [1.0, 1.5, 4.0, 8.0] {
            let mut expected = 0.0;
            while expected <= target {
                let x = bar.marker_x(expected, target);
                assert!(x > bar.x + 1 && x < bar.x + bar.width as i32 - 1, "{} at {}", x, expected);
                expected += target / 97.0;
            }
            let end = bar.marker_x(target, target);
            assert!(end < bar.x + bar.width as i32 - 1);
        }
    }

    #[test]
    fn test_marker_midway() {
        assert_eq!(bar().marker_x(2.0, 4.0), 20 + 380);
    }

    #[test]
    fn test_filled_dividers_show_through() {
        let bar = BarGeometry::new(0, 0, 40, 10);
        let mut canvas = Canvas::new(Size::new(40, 10));
        draw_bar(&mut canvas, &bar, 3, 4.0).unwrap();
        let bitmap = canvas.quantize();
        // Dividers at 10, 20 sit in the fill and are cut out of it.
        assert!(!bitmap.is_black(10, 5));
        assert!(!bitmap.is_black(20, 5));
        assert!(bitmap.is_black(15, 5));
        // Divider at 30 is past the fill and drawn as a dark line.
        assert!(bitmap.is_black(30, 5));
        assert!(!bitmap.is_black(35, 5));
    }

    #[test]
    fn test_marker_is_dashed() {
        let bar = BarGeometry::new(0, 20, 100, 20);
        let style = MarkerStyle::default();
        let mut canvas = Canvas::new(Size::new(100, 60));
        draw_marker(&mut canvas, &bar, &style, 50, 0).unwrap();
        let bitmap = canvas.quantize();
        // 4 on, 3 off starting 3px above the bar.
        assert!(bitmap.is_black(50, 17));
        assert!(bitmap.is_black(50, 20));
        assert!(!bitmap.is_black(50, 21));
        assert!(!bitmap.is_black(50, 23));
        assert!(bitmap.is_black(50, 24));
        // Arrowhead above the dashes.
        assert!(bitmap.is_black(50, 15));
    }
}
