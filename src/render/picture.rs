//! Picture rendering.
//!
//! Loads a raster file, flattens transparency onto white tape, and reduces
//! it to 1 bit. Pictures taller than the label are scaled down
//! proportionally; shorter ones keep their size and are centred
//! vertically.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, Luma, imageops::FilterType};
use log::debug;

use super::bitmap::Bitmap;
use super::dither::{self, Monochrome};
use crate::error::Error;

/// A picture element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub path: PathBuf,
    pub mode: Monochrome,
}

impl Picture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: Monochrome::default(),
        }
    }

    /// Set the monochrome conversion mode.
    pub fn mode(mut self, mode: Monochrome) -> Self {
        self.mode = mode;
        self
    }

    /// Load the file and render it exactly `height` rows tall.
    pub fn render(&self, height: usize) -> Result<Bitmap, Error> {
        let img = open(&self.path)?;
        render_image(&img, height, self.mode)
    }
}

fn open(path: &Path) -> Result<DynamicImage, Error> {
    image::ImageReader::open(path)
        .map_err(|e| Error::Resource(format!("Failed to open picture {}: {}", path.display(), e)))?
        .with_guessed_format()
        .map_err(|e| Error::Resource(format!("Failed to read picture {}: {}", path.display(), e)))?
        .decode()
        .map_err(|e| Error::Input(format!("Failed to decode picture {}: {}", path.display(), e)))
}

/// Render an already decoded image.
pub fn render_image(img: &DynamicImage, height: usize, mode: Monochrome) -> Result<Bitmap, Error> {
    if img.width() == 0 || img.height() == 0 {
        return Err(Error::Input("Picture has no pixels".to_string()));
    }
    if height == 0 {
        return Err(Error::Input("Picture height must be positive".to_string()));
    }

    let gray = flatten_to_gray(img);
    let gray = if gray.height() as usize > height {
        let width = (gray.width() as u64 * height as u64)
            .div_ceil(gray.height() as u64)
            .max(1) as u32;
        debug!(
            "scaling picture {}x{} → {}x{}",
            gray.width(),
            gray.height(),
            width,
            height
        );
        image::imageops::resize(&gray, width, height as u32, FilterType::Triangle)
    } else {
        gray
    };

    let width = gray.width() as usize;
    let top = (height - gray.height() as usize) / 2;
    let rows = gray.height() as usize;

    Ok(dither::to_bitmap(width, height, mode, |x, y| {
        if y < top || y >= top + rows {
            0.0
        } else {
            let luma = gray.get_pixel(x as u32, (y - top) as u32).0[0];
            1.0 - luma as f32 / 255.0
        }
    }))
}

/// Luminance with alpha composited over white.
fn flatten_to_gray(img: &DynamicImage) -> GrayImage {
    let rgba = img.to_rgba8();
    let mut gray = GrayImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        let value = luma * alpha + 255.0 * (1.0 - alpha);
        gray.put_pixel(x, y, Luma([value.round().clamp(0.0, 255.0) as u8]));
    }
    gray
}
