//! Layout policy for the dashboard image.
//!
//! All geometry and font choices live in one immutable [`LayoutConfig`]
//! handed to the renderer at construction.

use embedded_graphics::mono_font::{iso_8859_1, MonoFont};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Header arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStyle {
    /// Period, day and update time in a single header band
    #[default]
    Compact,
    /// Period and day in the header; totals and update time in a footer
    HeaderFooter,
}

/// Progress bar thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarStyle {
    /// 20 px bars
    #[default]
    Regular,
    /// 12 px bars for dense goal lists
    Slim,
}

impl BarStyle {
    /// Bar height in pixels.
    pub fn height(&self) -> u32 {
        match self {
            BarStyle::Regular => 20,
            BarStyle::Slim => 12,
        }
    }
}

/// Fixed pixel geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Left and right margin
    pub x: u32,
    /// Height of the header band
    pub header_height: u32,
    /// Y of the header divider line
    pub header_divider: u32,
    /// Space kept free below the last row
    pub bottom: u32,
    /// Height of the footer band, when one is drawn
    pub footer_height: u32,
    /// Distance from the top of a row to its bar
    pub bar_offset: u32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            x: 20,
            header_height: 62,
            header_divider: 52,
            bottom: 20,
            footer_height: 26,
            bar_offset: 22,
        }
    }
}

/// Expected-progress marker geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    /// Drawn run length of a dash
    pub dash_on: u32,
    /// Skipped run length between dashes
    pub dash_off: u32,
    /// Line thickness
    pub stroke: u32,
    /// How far the dashes extend above and below the bar
    pub overhang: u32,
    /// Half the width of the arrowhead base
    pub arrow_half_width: u32,
    /// Arrowhead height
    pub arrow_height: u32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            dash_on: 4,
            dash_off: 3,
            stroke: 2,
            overhang: 3,
            arrow_half_width: 4,
            arrow_height: 4,
        }
    }
}

/// Font names, resolved against the built-in bitmap fonts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontNames {
    /// Period range in the header
    pub title: String,
    /// Goal names and placeholder text
    pub body: String,
    /// Day counter, timestamps, counts
    pub small: String,
}

impl Default for FontNames {
    fn default() -> Self {
        Self {
            title: "10x20".to_string(),
            body: "9x15".to_string(),
            small: "7x13".to_string(),
        }
    }
}

/// Complete layout policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Header arrangement
    pub header: HeaderStyle,
    /// Bar thickness
    pub bar: BarStyle,
    /// Stippled band at the period midpoint (two-week periods only)
    pub midpoint_band: bool,
    /// Day ticks below the last row
    pub day_ticks: bool,
    /// Count and days-left text on each goal row
    pub show_counts: bool,
    /// Pixel geometry
    pub margins: Margins,
    /// Marker geometry
    pub marker: MarkerStyle,
    /// Fonts
    pub fonts: FontNames,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header: HeaderStyle::Compact,
            bar: BarStyle::Regular,
            midpoint_band: true,
            day_ticks: true,
            show_counts: true,
            margins: Margins::default(),
            marker: MarkerStyle::default(),
            fonts: FontNames::default(),
        }
    }
}

impl LayoutConfig {
    /// Whether a footer band is drawn.
    pub fn has_footer(&self) -> bool {
        self.header == HeaderStyle::HeaderFooter
    }

    /// Space reserved below the goal rows.
    pub fn bottom_reserve(&self) -> u32 {
        if self.has_footer() {
            self.margins.bottom + self.margins.footer_height
        } else {
            self.margins.bottom
        }
    }
}

/// Smallest built-in font, used whenever a named font is unavailable.
pub const FALLBACK_FONT: &MonoFont<'static> = &iso_8859_1::FONT_6X10;

/// Look up a built-in font by name.
pub fn find_font(name: &str) -> Option<&'static MonoFont<'static>> {
    let font = match name.to_ascii_lowercase().as_str() {
        "6x10" => &iso_8859_1::FONT_6X10,
        "6x13" => &iso_8859_1::FONT_6X13,
        "6x13_bold" => &iso_8859_1::FONT_6X13_BOLD,
        "7x13" => &iso_8859_1::FONT_7X13,
        "7x13_bold" => &iso_8859_1::FONT_7X13_BOLD,
        "8x13" => &iso_8859_1::FONT_8X13,
        "8x13_bold" => &iso_8859_1::FONT_8X13_BOLD,
        "9x15" => &iso_8859_1::FONT_9X15,
        "9x15_bold" => &iso_8859_1::FONT_9X15_BOLD,
        "9x18" => &iso_8859_1::FONT_9X18,
        "9x18_bold" => &iso_8859_1::FONT_9X18_BOLD,
        "10x20" => &iso_8859_1::FONT_10X20,
        _ => return None,
    };
    Some(font)
}

/// Resolve a font by name, falling back to [`FALLBACK_FONT`].
pub fn resolve_font(name: &str) -> &'static MonoFont<'static> {
    find_font(name).unwrap_or_else(|| {
        warn!("Font '{}' unavailable, using built-in 6x10", name);
        FALLBACK_FONT
    })
}

/// Fonts resolved once per renderer.
#[derive(Clone, Copy)]
pub struct Fonts {
    /// Header title font
    pub title: &'static MonoFont<'static>,
    /// Body font
    pub body: &'static MonoFont<'static>,
    /// Small font
    pub small: &'static MonoFont<'static>,
}

impl Fonts {
    /// Resolve every configured font.
    pub fn resolve(names: &FontNames) -> Self {
        Self {
            title: resolve_font(&names.title),
            body: resolve_font(&names.body),
            small: resolve_font(&names.small),
        }
    }
}

impl std::fmt::Debug for Fonts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fonts")
            .field("title", &self.title.character_size)
            .field("body", &self.body.character_size)
            .field("small", &self.small.character_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::Size;

    #[test]
    fn test_unknown_font_falls_back() {
        let font = resolve_font("NotoSansCJK-Regular");
        assert_eq!(font.character_size, Size::new(6, 10));
        assert_eq!(resolve_font("9X15").character_size, Size::new(9, 15));
    }

    #[test]
    fn test_footer_reserves_space() {
        let compact = LayoutConfig::default();
        assert_eq!(compact.bottom_reserve(), 20);

        let footer = LayoutConfig {
            header: HeaderStyle::HeaderFooter,
            ..LayoutConfig::default()
        };
        assert_eq!(footer.bottom_reserve(), 46);
    }

    #[test]
    fn test_layout_from_toml() {
        let layout: LayoutConfig = toml::from_str(
            r#"
            header = "header_footer"
            bar = "slim"
            day_ticks = false

            [fonts]
            body = "8x13"
            "#,
        )
        .unwrap();
        assert_eq!(layout.header, HeaderStyle::HeaderFooter);
        assert_eq!(layout.bar.height(), 12);
        assert!(layout.midpoint_band);
        assert!(!layout.day_ticks);
        assert!(layout.show_counts);
        assert_eq!(layout.fonts.body, "8x13");
        assert_eq!(layout.fonts.title, "10x20");
        assert_eq!(layout.margins, Margins::default());
    }
}
