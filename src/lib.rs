//! # dymoprint - Label Printing for the Dymo LabelManager PnP
//!
//! dymoprint turns text, QR codes, barcodes and pictures into labels and
//! prints them on a Dymo LabelManager PnP over raw USB HID. It provides:
//!
//! - **Rendering**: text (TTF or built-in bitmap font), QR codes, linear
//!   barcodes and pictures as 1-bit bitmaps
//! - **Layout**: elements side by side, text lines stacked, optional frame
//! - **Protocol**: the LabelManager raster command stream
//! - **Transport**: hidraw device access with sysfs discovery
//!
//! ## Quick Start
//!
//! ```no_run
//! use dymoprint::{
//!     job::{Element, JobDriver, LabelJob},
//!     printer::Capability,
//!     render::text::TextLine,
//!     transport::HidTransport,
//! };
//!
//! let cap = Capability::LABELMANAGER_PNP;
//! let job = LabelJob::new(cap)
//!     .push(Element::Text(TextLine::new("Hello")))
//!     .font("builtin");
//!
//! let mut driver = JobDriver::new(HidTransport::auto(&cap));
//! driver.run(job)?;
//! # Ok::<(), dymoprint::job::JobFailure>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`render`] | Element renderers and the bitmap type |
//! | [`compose`] | Horizontal and vertical layout |
//! | [`protocol`] | Printer command encoding |
//! | [`transport`] | Device access |
//! | [`job`] | Label jobs and the driver that runs them |
//! | [`config`] | Preferences file |
//! | [`printer`] | Device capabilities |
//! | [`server`] | Web form |
//! | [`error`] | Error types |

pub mod compose;
pub mod config;
pub mod error;
pub mod job;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod server;
pub mod transport;

// Re-exports for convenience
pub use error::Error;
pub use job::{JobDriver, LabelJob};
pub use printer::Capability;
pub use transport::HidTransport;
