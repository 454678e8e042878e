//! # Monochrome Bitmap
//!
//! The single pixel format every renderer produces and the encoder
//! consumes. One `bool` per pixel, `true` = ink.
//!
//! ## Coordinate System
//!
//! ```text
//! (0,0) ──────────────────────► x (label length, variable)
//!   │
//!   │   ████████
//!   │   ████████
//!   ▼
//!   y (tape height, fixed per label)
//! ```

use image::{GrayImage, Luma};

/// A 2D array of single-bit pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl Bitmap {
    /// Blank (no ink) bitmap.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    /// Build a bitmap by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> bool,
    {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at `(x, y)`. Out of bounds reads as blank.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x]
    }

    /// Set a pixel. Out of bounds writes are dropped.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = on;
        }
    }

    /// Fill a rectangle, clamped to the bitmap.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, on: bool) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for py in y.min(y_end)..y_end {
            for px in x.min(x_end)..x_end {
                self.pixels[py * self.width + px] = on;
            }
        }
    }

    /// Copy `src` into this bitmap with its top-left corner at `(x, y)`.
    ///
    /// Pixels of `src` replace the destination; anything falling outside
    /// is clipped.
    pub fn paste(&mut self, src: &Bitmap, x: usize, y: usize) {
        for sy in 0..src.height {
            for sx in 0..src.width {
                self.set(x + sx, y + sy, src.get(sx, sy));
            }
        }
    }

    /// Pixels of one column, top to bottom.
    pub fn column(&self, x: usize) -> impl DoubleEndedIterator<Item = bool> + '_ {
        (0..self.height).map(move |y| self.get(x, y))
    }

    /// Number of inked pixels.
    pub fn ink_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    pub fn is_blank(&self) -> bool {
        !self.pixels.iter().any(|&p| p)
    }

    /// Grayscale image with ink as black on white.
    pub fn to_gray_image(&self) -> GrayImage {
        let mut img = GrayImage::new(self.width as u32, self.height as u32);
        for y in 0..self.height {
            for x in 0..self.width {
                let color = if self.get(x, y) { 0u8 } else { 255u8 };
                img.put_pixel(x as u32, y as u32, Luma([color]));
            }
        }
        img
    }
}

/// Pack pixel values into bytes, MSB first.
///
/// - Bit 7 (MSB) = first pixel
/// - 1 = ink, 0 = blank
/// - A partial last byte is padded with blank bits
///
/// ```
/// use dymoprint::render::bitmap::pack_bits;
///
/// assert_eq!(pack_bits([true, true, true, true, false, false, false, false]), vec![0xF0]);
/// assert_eq!(pack_bits([true; 12]), vec![0xFF, 0xF0]);
/// ```
pub fn pack_bits<I>(pixels: I) -> Vec<u8>
where
    I: IntoIterator<Item = bool>,
{
    let mut bytes = Vec::new();
    for (i, pixel) in pixels.into_iter().enumerate() {
        if i % 8 == 0 {
            bytes.push(0u8);
        }
        if pixel {
            let last = bytes.len() - 1;
            bytes[last] |= 1 << (7 - (i % 8));
        }
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_blank() {
        let bmp = Bitmap::new(10, 4);
        assert_eq!(bmp.width(), 10);
        assert_eq!(bmp.height(), 4);
        assert!(bmp.is_blank());
    }

    #[test]
    fn test_set_get_out_of_bounds() {
        let mut bmp = Bitmap::new(2, 2);
        bmp.set(5, 5, true);
        assert!(bmp.is_blank());
        assert!(!bmp.get(5, 5));
        bmp.set(1, 0, true);
        assert!(bmp.get(1, 0));
        assert_eq!(bmp.ink_count(), 1);
    }

    #[test]
    fn test_fill_rect_clamps() {
        let mut bmp = Bitmap::new(4, 4);
        bmp.fill_rect(2, 2, 10, 10, true);
        assert_eq!(bmp.ink_count(), 4);
        assert!(bmp.get(3, 3));
        assert!(!bmp.get(1, 1));
    }

    #[test]
    fn test_paste_clips() {
        let src = Bitmap::from_fn(3, 3, |_, _| true);
        let mut dst = Bitmap::new(4, 4);
        dst.paste(&src, 2, 2);
        assert_eq!(dst.ink_count(), 4);
    }

    #[test]
    fn test_column_order() {
        let mut bmp = Bitmap::new(2, 3);
        bmp.set(1, 0, true);
        let col: Vec<bool> = bmp.column(1).collect();
        assert_eq!(col, vec![true, false, false]);
        let rev: Vec<bool> = bmp.column(1).rev().collect();
        assert_eq!(rev, vec![false, false, true]);
    }

    #[test]
    fn test_pack_bits() {
        assert_eq!(pack_bits([true; 8]), vec![0xFF]);
        assert_eq!(pack_bits([false; 8]), vec![0x00]);
        assert_eq!(
            pack_bits([true, false, true, false, true, false, true, false]),
            vec![0xAA]
        );
        assert_eq!(pack_bits([true; 9]), vec![0xFF, 0x80]);
        assert_eq!(pack_bits(std::iter::empty()), Vec::<u8>::new());
    }

    #[test]
    fn test_to_gray_image() {
        let mut bmp = Bitmap::new(2, 1);
        bmp.set(0, 0, true);
        let img = bmp.to_gray_image();
        assert_eq!(img.get_pixel(0, 0).0, [0]);
        assert_eq!(img.get_pixel(1, 0).0, [255]);
    }
}
