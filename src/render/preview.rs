//! PNG preview of a composed label.
//!
//! Shows the label the way it comes out of the printer: ink on white with
//! blank tape on both ends.

use std::path::Path;

use super::bitmap::Bitmap;
use crate::error::Error;

/// Blank tape shown before and after the label
pub const PREVIEW_BORDER: usize = 56;

/// Bitmap with blank borders left and right.
pub fn with_borders(label: &Bitmap) -> Bitmap {
    let mut canvas = Bitmap::new(label.width() + 2 * PREVIEW_BORDER, label.height());
    canvas.paste(label, PREVIEW_BORDER, 0);
    canvas
}

/// Save the label preview as PNG.
pub fn save_png<P: AsRef<Path>>(label: &Bitmap, path: P) -> Result<(), Error> {
    let path = path.as_ref();
    with_borders(label)
        .to_gray_image()
        .save(path)
        .map_err(|e| Error::Resource(format!("Failed to save preview {}: {}", path.display(), e)))
}
