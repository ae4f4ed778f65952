//! Habitboard renderer
//!
//! Draws goal progress onto a grayscale canvas with embedded-graphics and
//! quantizes it to a two-level bitmap sized for an e-ink panel.

#![warn(missing_docs)]

pub mod bar;
pub mod bitmap;
pub mod calendar;
pub mod canvas;
pub mod error;
pub mod header;
pub mod layout;
pub mod renderer;

pub use bitmap::Bitmap;
pub use canvas::Canvas;
pub use error::{RenderError, Result};
pub use layout::{BarStyle, FontNames, HeaderStyle, LayoutConfig, Margins, MarkerStyle};
pub use renderer::{Renderer, NO_GOALS_MESSAGE};

pub use embedded_graphics::prelude::Size;
