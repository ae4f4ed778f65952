//! Grayscale drawing surface.

use std::convert::Infallible;

use embedded_graphics::pixelcolor::Gray8;
use embedded_graphics::prelude::*;

use crate::bitmap::Bitmap;

/// Luma values below this become black when quantized.
pub const THRESHOLD: u8 = 128;

/// An 8-bit grayscale framebuffer. Out-of-bounds pixels are dropped.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Create a white canvas.
    pub fn new(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            pixels: vec![Gray8::WHITE.luma(); size.width as usize * size.height as usize],
        }
    }

    /// Luma at `point`, or `None` outside the canvas.
    pub fn luma(&self, point: Point) -> Option<u8> {
        self.index(point).map(|i| self.pixels[i])
    }

    fn index(&self, point: Point) -> Option<usize> {
        let (x, y) = (point.x, point.y);
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Reduce to two levels with a hard threshold, no dithering.
    pub fn quantize(&self) -> Bitmap {
        let mut bitmap = Bitmap::white(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let luma = self.pixels[y as usize * self.width as usize + x as usize];
                if luma < THRESHOLD {
                    bitmap.set_black(x, y);
                }
            }
        }
        bitmap
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Canvas {
    type Color = Gray8;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(point) {
                self.pixels[i] = color.luma();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn test_white_canvas_quantizes_white() {
        let canvas = Canvas::new(Size::new(40, 12));
        let bitmap = canvas.quantize();
        assert_eq!(bitmap.black_pixels(), 0);
    }

    #[test]
    fn test_black_fill_quantizes_black() {
        let mut canvas = Canvas::new(Size::new(40, 12));
        Rectangle::new(Point::new(5, 2), Size::new(10, 4))
            .into_styled(PrimitiveStyle::with_fill(Gray8::BLACK))
            .draw(&mut canvas)
            .unwrap();
        let bitmap = canvas.quantize();
        for y in 2..6 {
            for x in 5..15 {
                assert!(bitmap.is_black(x, y));
            }
        }
        assert_eq!(bitmap.black_pixels(), 40);
    }

    #[test]
    fn test_light_gray_thresholds_to_white() {
        let mut canvas = Canvas::new(Size::new(4, 4));
        canvas
            .fill_solid(&Rectangle::new(Point::zero(), Size::new(4, 4)), Gray8::new(0xd0))
            .unwrap();
        assert_eq!(canvas.quantize().black_pixels(), 0);

        canvas
            .fill_solid(&Rectangle::new(Point::zero(), Size::new(4, 4)), Gray8::new(0x60))
            .unwrap();
        assert_eq!(canvas.quantize().black_pixels(), 16);
    }

    #[test]
    fn test_empty_canvas() {
        let canvas = Canvas::new(Size::new(0, 0));
        assert_eq!(canvas.luma(Point::zero()), None);
        assert_eq!(canvas.quantize().black_pixels(), 0);
    }

    #[test]
    fn test_out_of_bounds_pixels_are_clipped() {
        let mut canvas = Canvas::new(Size::new(4, 4));
        Rectangle::new(Point::new(-10, -10), Size::new(100, 100))
            .into_styled(PrimitiveStyle::with_fill(Gray8::BLACK))
            .draw(&mut canvas)
            .unwrap();
        assert_eq!(canvas.luma(Point::new(3, 3)), Some(0));
        assert_eq!(canvas.luma(Point::new(4, 0)), None);
    }
}
