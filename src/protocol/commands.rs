//! # LabelManager Protocol Commands
//!
//! Command builders for the Dymo LabelManager PnP raster protocol.
//!
//! ## Protocol Overview
//!
//! The printer takes a plain byte stream on its HID interface. Commands
//! start with ESC; raster data is sent one printhead line at a time, each
//! line introduced by SYN.
//!
//! | Command | Bytes | Meaning |
//! |---------|-------|---------|
//! | Status request | `ESC A` | Printer answers with 8 bytes |
//! | Dot tab | `ESC B n` | Skip `n` leading bytes of every line |
//! | Tape colour | `ESC C n` | Select tape colour `n` |
//! | Bytes per line | `ESC D n` | Following lines carry `n` bytes |
//! | Cut | `ESC E` | Trigger the cutter |
//! | Line | `SYN d1..dn` | Print one line |
//!
//! A line with zero bytes per line prints blank tape, so `ESC D 0`
//! followed by a run of SYN bytes feeds the label forward.

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// SYN (Synchronous Idle) - Raster line marker
pub const SYN: u8 = 0x16;

/// # Status Request (ESC A)
///
/// Asks the printer for its 8-byte status reply.
///
/// ```
/// use dymoprint::protocol::commands;
///
/// assert_eq!(commands::status_request(), vec![0x1B, 0x41]);
/// ```
#[inline]
pub fn status_request() -> Vec<u8> {
    vec![ESC, b'A']
}

/// # Dot Tab (ESC B n)
///
/// Number of leading bytes the printer skips on every following line.
/// Lets the encoder drop blank bytes at the bottom edge of the label.
#[inline]
pub fn dot_tab(bytes: u8) -> Vec<u8> {
    vec![ESC, b'B', bytes]
}

/// # Tape Colour (ESC C n)
#[inline]
pub fn tape_color(color: u8) -> Vec<u8> {
    vec![ESC, b'C', color]
}

/// # Bytes Per Line (ESC D n)
///
/// Length of the raster lines that follow. `dot_tab + n` must not
/// exceed the printhead width in bytes.
#[inline]
pub fn bytes_per_line(bytes: u8) -> Vec<u8> {
    vec![ESC, b'D', bytes]
}

/// # Cut (ESC E)
#[inline]
pub fn cut() -> Vec<u8> {
    vec![ESC, b'E']
}

/// # Raster Line (SYN d1..dn)
///
/// ```
/// use dymoprint::protocol::commands;
///
/// assert_eq!(commands::line(&[0xF0, 0x01]), vec![0x16, 0xF0, 0x01]);
/// ```
pub fn line(data: &[u8]) -> Vec<u8> {
    let mut cmd = Vec::with_capacity(1 + data.len());
    cmd.push(SYN);
    cmd.extend_from_slice(data);
    cmd
}

/// # Blank Feed (SYN × n)
///
/// `n` empty lines. Only blank when the current bytes-per-line is 0.
pub fn skip_lines(count: usize) -> Vec<u8> {
    vec![SYN; count]
}
