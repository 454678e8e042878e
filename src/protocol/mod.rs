//! # Device Protocol
//!
//! Converts a composed label into the byte stream a printer accepts.
//!
//! ## Module Structure
//!
//! - [`commands`]: LabelManager command builders
//! - [`labelmanager`]: Encoder for the LabelManager PnP
//!
//! The byte layout of a printer model lives entirely behind [`Encoder`];
//! adding a model means adding an implementation, not touching the
//! renderers or the compositor.
//!
//! ## Usage Example
//!
//! ```
//! use dymoprint::printer::Capability;
//! use dymoprint::protocol::{Encoder, labelmanager::LabelManagerPnp};
//! use dymoprint::render::Bitmap;
//!
//! let label = Bitmap::from_fn(10, 64, |x, _| x % 2 == 0);
//! let frame = LabelManagerPnp.encode(&label, &Capability::LABELMANAGER_PNP)?;
//! assert_eq!(frame.segments().len(), 1);
//! # Ok::<(), dymoprint::Error>(())
//! ```

pub mod commands;
pub mod labelmanager;

use crate::error::Error;
use crate::printer::Capability;
use crate::render::Bitmap;

/// Bytes ready for the transport.
///
/// A frame is one or more segments. Each segment is a complete printer
/// transaction that ends with a status request, so the transport reads
/// one status reply per segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterFrame {
    segments: Vec<Vec<u8>>,
}

impl PrinterFrame {
    pub fn new(segments: Vec<Vec<u8>>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Vec<u8>] {
        &self.segments
    }

    /// All segments concatenated.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.segments.concat()
    }

    /// Total length in bytes.
    pub fn len(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A printer model's bitmap → bytes conversion.
///
/// Implementations must be deterministic: the same bitmap and capability
/// always produce a byte-identical frame.
pub trait Encoder {
    /// Model name for logs
    fn name(&self) -> &'static str;

    /// Encode a composed label.
    fn encode(&self, bitmap: &Bitmap, capability: &Capability) -> Result<PrinterFrame, Error>;
}
