//! # Memory Transport
//!
//! Records frames instead of printing them.

use super::{STATUS_LEN, StatusReply, Transport};
use crate::error::Error;
use crate::protocol::PrinterFrame;

/// Transport that keeps every frame it is given.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    frames: Vec<PrinterFrame>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames received so far, oldest first
    pub fn frames(&self) -> &[PrinterFrame] {
        &self.frames
    }

    /// Number of `send` calls
    pub fn sends(&self) -> usize {
        self.frames.len()
    }
}

impl Transport for MemoryTransport {
    fn send(&mut self, frame: &PrinterFrame) -> Result<Vec<Option<StatusReply>>, Error> {
        self.frames.push(frame.clone());
        Ok(vec![Some(StatusReply([0; STATUS_LEN])); frame.segments().len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_frames() {
        let mut transport = MemoryTransport::new();
        let frame = PrinterFrame::new(vec![vec![1, 2], vec![3]]);
        let replies = transport.send(&frame).unwrap();
        assert_eq!(replies.len(), 2);
        assert_eq!(transport.sends(), 1);
        assert_eq!(transport.frames()[0], frame);
    }
}
