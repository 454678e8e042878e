//! # Rendering Module
//!
//! Turns label elements into monochrome bitmaps of a requested height.
//!
//! ## Modules
//!
//! - [`bitmap`]: The 1-bit pixel buffer shared by every stage
//! - [`text`]: Text lines from TTF files or the built-in bitmap font
//! - [`barcode`]: Linear barcodes (Code 39/93/128, EAN, UPC)
//! - [`qr`]: QR codes scaled to the tape
//! - [`picture`]: Raster files reduced to 1 bit
//! - [`dither`]: Threshold and Bayer monochrome conversion
//! - [`preview`]: PNG output instead of printing
//!
//! Every renderer honours the same contract: the bitmap it returns is
//! exactly as tall as requested; only the width depends on the content.
//!
//! ```
//! use dymoprint::render::{qr::QrCode, text::{TextLine, Typeface}};
//!
//! let text = TextLine::new("Tst").render(&Typeface::Builtin, 64)?;
//! let code = QrCode::new("Tst").render(64)?;
//! assert_eq!(text.height(), code.height());
//! # Ok::<(), dymoprint::Error>(())
//! ```

pub mod barcode;
pub mod bitmap;
pub mod dither;
pub mod picture;
pub mod preview;
pub mod qr;
pub mod text;

pub use bitmap::Bitmap;
