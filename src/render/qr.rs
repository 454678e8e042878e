//! QR code rendering.
//!
//! The symbol is encoded at error correction level M with a one-module
//! quiet zone, then every module is blown up to an integer block so the
//! whole square fits the label height.
//!
//! ```text
//!         ┌─ quiet zone (1 module = block px)
//!   ┌─────┴───────────────┐   ▲
//!   │  ┌───────────────┐  │   │
//!   │  │ modules×block │  │   │ (modules + 2) × block ≤ H
//!   │  └───────────────┘  │   │
//!   └─────────────────────┘   ▼
//! ```

use log::debug;
use qrcode::{Color, EcLevel, QrCode as QrMatrix};

use super::bitmap::Bitmap;
use crate::error::Error;

/// Quiet zone width in modules
pub const QUIET_ZONE_MODULES: usize = 1;

/// A QR code element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCode {
    pub payload: String,
}

/// Geometry of a rendered QR code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrLayout {
    /// Modules per side, without quiet zone
    pub module_count: usize,
    /// Pixels per module
    pub block_size: usize,
    /// Quiet zone per side in pixels
    pub quiet_zone: usize,
}

impl QrLayout {
    /// Side length of the square in pixels
    pub fn side(&self) -> usize {
        self.module_count * self.block_size + 2 * self.quiet_zone
    }
}

impl QrCode {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    fn matrix(&self) -> Result<QrMatrix, Error> {
        QrMatrix::with_error_correction_level(self.payload.as_bytes(), EcLevel::M)
            .map_err(|e| Error::Input(format!("QR code generation failed: {}", e)))
    }

    /// Block size and quiet zone for a label `height` pixels tall.
    pub fn layout(&self, height: usize) -> Result<QrLayout, Error> {
        let module_count = self.matrix()?.width();
        layout_for(module_count, height)
    }

    /// Render the code into a bitmap exactly `height` rows tall.
    pub fn render(&self, height: usize) -> Result<Bitmap, Error> {
        let code = self.matrix()?;
        let layout = layout_for(code.width(), height)?;
        let colors = code.to_colors();
        let side = layout.side();
        let top = (height - side) / 2;

        debug!(
            "QR code: {} modules, {} px blocks, {} px square",
            layout.module_count, layout.block_size, side
        );

        let mut bitmap = Bitmap::new(side, height);
        for (i, color) in colors.iter().enumerate() {
            if *color == Color::Dark {
                let qx = i % layout.module_count;
                let qy = i / layout.module_count;
                bitmap.fill_rect(
                    layout.quiet_zone + qx * layout.block_size,
                    top + layout.quiet_zone + qy * layout.block_size,
                    layout.block_size,
                    layout.block_size,
                    true,
                );
            }
        }
        Ok(bitmap)
    }
}

fn layout_for(module_count: usize, height: usize) -> Result<QrLayout, Error> {
    let block_size = height / (module_count + 2 * QUIET_ZONE_MODULES);
    if block_size == 0 {
        return Err(Error::Input(format!(
            "Too much information to store in the QR code: {} modules do not fit {} dots",
            module_count + 2 * QUIET_ZONE_MODULES,
            height
        )));
    }
    Ok(QrLayout {
        module_count,
        block_size,
        quiet_zone: QUIET_ZONE_MODULES * block_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_payload_on_pnp_tape() {
        // Version 1 (21 modules) + 2 quiet modules = 23 → 2 px blocks on 64 dots
        let qr = QrCode::new("Tst");
        let layout = qr.layout(64).unwrap();
        assert_eq!(layout.module_count, 21);
        assert_eq!(layout.block_size, 2);
        assert_eq!(layout.quiet_zone, 2);

        let bmp = qr.render(64).unwrap();
        assert_eq!(bmp.height(), 64);
        assert_eq!(bmp.width(), 21 * 2 + 2 * 2);
    }

    #[test]
    fn test_quiet_zone_is_blank() {
        let bmp = QrCode::new("quiet").render(64).unwrap();
        let layout = QrCode::new("quiet").layout(64).unwrap();
        for x in 0..layout.quiet_zone {
            assert!(bmp.column(x).all(|p| !p));
            assert!(bmp.column(bmp.width() - 1 - x).all(|p| !p));
        }
    }

    #[test]
    fn test_height_sweep() {
        let qr = QrCode::new("https://example.com");
        for height in [31, 32, 50, 64, 99] {
            let bmp = qr.render(height).unwrap();
            assert_eq!(bmp.height(), height);
            assert_eq!(bmp.width(), qr.layout(height).unwrap().side());
        }
    }

    #[test]
    fn test_too_large_for_tape() {
        let payload = "x".repeat(400);
        let err = QrCode::new(payload).render(64).unwrap_err();
        assert!(matches!(err, Error::Input(_)), "got {:?}", err);
    }

    #[test]
    fn test_over_capacity() {
        let payload = "x".repeat(5000);
        let err = QrCode::new(payload).render(10_000).unwrap_err();
        assert!(matches!(err, Error::Input(_)));
    }
}
