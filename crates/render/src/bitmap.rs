//! Two-level bitmap and its PNG encoding.

use crate::error::Result;

/// A strictly black/white image, one bit per pixel, rows MSB-first.
/// A set bit is white, matching 1-bit grayscale PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    bits: Vec<u8>,
}

impl Bitmap {
    /// An all-white bitmap.
    pub fn white(width: u32, height: u32) -> Self {
        let row_bytes = Self::row_bytes_for(width);
        Self {
            width,
            height,
            bits: vec![0xff; row_bytes * height as usize],
        }
    }

    fn row_bytes_for(width: u32) -> usize {
        (width as usize).div_ceil(8)
    }

    fn locate(&self, x: u32, y: u32) -> (usize, u8) {
        let byte = y as usize * Self::row_bytes_for(self.width) + x as usize / 8;
        (byte, 0x80 >> (x % 8))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Paint one pixel black. Ignored outside the bitmap.
    pub fn set_black(&mut self, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (byte, mask) = self.locate(x, y);
        self.bits[byte] &= !mask;
    }

    /// Whether the pixel is black. Pixels outside the bitmap read as white.
    pub fn is_black(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (byte, mask) = self.locate(x, y);
        self.bits[byte] & mask == 0
    }

    /// Count of black pixels.
    pub fn black_pixels(&self) -> usize {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.is_black(x, y))
            .count()
    }

    /// Encode as a 1-bit grayscale PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(png::ColorType::Grayscale);
            encoder.set_depth(png::BitDepth::One);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.bits)?;
            writer.finish()?;
        }
        Ok(out)
    }
}
