//! # Printer Transport Layer
//!
//! This module delivers encoded frames to the printer.
//!
//! ## Available Transports
//!
//! - [`hidraw`]: Linux hidraw character device (USB HID)
//! - [`memory`]: In-memory sink that records frames, for tests and dry runs
//!
//! [`discover`] locates the hidraw node of a printer from its USB ids.
//!
//! A transport is handed the complete frame: nothing is written to the
//! device until every stage before it has succeeded.

pub mod discover;
pub mod hidraw;
pub mod memory;

pub use hidraw::HidTransport;
pub use memory::MemoryTransport;

use crate::error::Error;
use crate::protocol::PrinterFrame;

/// Length of the printer's reply to a status request
pub const STATUS_LEN: usize = 8;

/// Raw status bytes returned after a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReply(pub [u8; STATUS_LEN]);

/// A destination for encoded frames.
///
/// `send` is not idempotent. After a [`Error::Transport`] the printer may
/// have consumed part of the frame, so callers must not resend it blindly.
pub trait Transport {
    /// Write every segment of `frame`, reading the status reply after each.
    ///
    /// Returns one entry per segment; `None` when the printer did not
    /// answer in time.
    fn send(&mut self, frame: &PrinterFrame) -> Result<Vec<Option<StatusReply>>, Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, frame: &PrinterFrame) -> Result<Vec<Option<StatusReply>>, Error> {
        (**self).send(frame)
    }
}
