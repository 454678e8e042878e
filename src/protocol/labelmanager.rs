//! # LabelManager PnP Encoder
//!
//! The printhead is 64 dots across the tape, so the label is sent
//! sideways: every bitmap column becomes one raster line.
//!
//! ## Raster Line Layout
//!
//! ```text
//!   bitmap column x             raster line (8 bytes)
//!   y=0   ┌─┐ top               ┌────────┬────────┬───┬────────┐
//!         │ │                   │ byte 0 │ byte 1 │...│ byte 7 │
//!         │ │       ──►         └────────┴────────┴───┴────────┘
//!   y=63  └─┘ bottom             bit 7 of byte 0 = bottom pixel
//! ```
//!
//! ## Line Compression
//!
//! Per transaction, the leading zero bytes shared by every line are
//! replaced by a single dot tab (`ESC B n`), and trailing zero bytes are
//! dropped from each line. `ESC D n` is only repeated when the line length
//! changes.
//!
//! ## Transactions
//!
//! Long labels are split into transactions of `chunk_lines` lines. Each
//! transaction repeats the header and ends with a status request; only the
//! last one carries the blank feed that moves the label past the cutter.

use std::iter;

use log::debug;

use super::commands;
use super::{Encoder, PrinterFrame};
use crate::error::Error;
use crate::printer::{Capability, HeadAlign};
use crate::render::Bitmap;
use crate::render::bitmap::pack_bits;

/// Tape colour sent with every transaction
const TAPE_COLOR: u8 = 0;

/// Encoder for the Dymo LabelManager PnP.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelManagerPnp;

impl Encoder for LabelManagerPnp {
    fn name(&self) -> &'static str {
        "LabelManager PnP"
    }

    fn encode(&self, bitmap: &Bitmap, capability: &Capability) -> Result<PrinterFrame, Error> {
        check_fits(bitmap, capability)?;

        let lines: Vec<Vec<u8>> = (0..bitmap.width())
            .map(|x| raster_line(bitmap, x, capability))
            .collect();

        let chunk = capability.chunk_lines.max(1);
        let mut segments = Vec::new();
        let mut rest = lines.as_slice();
        while rest.len() > chunk + 1 {
            let (head, tail) = rest.split_at(chunk);
            segments.push(encode_segment(head, 0, false));
            rest = tail;
        }
        segments.push(encode_segment(rest, capability.margin_lines, capability.auto_cut));

        let frame = PrinterFrame::new(segments);
        debug!(
            "encoded {} columns into {} segment(s), {} bytes",
            bitmap.width(),
            frame.segments().len(),
            frame.len()
        );
        Ok(frame)
    }
}

fn check_fits(bitmap: &Bitmap, capability: &Capability) -> Result<(), Error> {
    if capability.line_bytes() > u8::MAX as usize {
        return Err(Error::Configuration(format!(
            "Printhead of {} dots cannot be addressed with one-byte line lengths",
            capability.printhead_dots
        )));
    }
    if bitmap.width() == 0 {
        return Err(Error::Input("Nothing to print: the label is empty".to_string()));
    }
    if bitmap.height() > capability.printhead_dots as usize {
        return Err(Error::Overflow(format!(
            "label is {} dots tall, {} addresses {} dots",
            bitmap.height(),
            capability.name,
            capability.printhead_dots
        )));
    }
    if bitmap.width() > capability.max_columns {
        return Err(Error::Overflow(format!(
            "label is {} columns long, {} accepts at most {}",
            bitmap.width(),
            capability.name,
            capability.max_columns
        )));
    }
    Ok(())
}

/// One bitmap column as a full-width raster line, bottom pixel first.
fn raster_line(bitmap: &Bitmap, x: usize, capability: &Capability) -> Vec<u8> {
    let pad = capability.printhead_dots as usize - bitmap.height();
    let below = match capability.head_align {
        HeadAlign::Bottom => 0,
        HeadAlign::Top => pad,
        HeadAlign::Center => pad / 2,
    };
    let bits = iter::repeat_n(false, below)
        .chain(bitmap.column(x).rev())
        .chain(iter::repeat_n(false, pad - below));
    pack_bits(bits)
}

/// One printer transaction for a run of lines.
fn encode_segment(lines: &[Vec<u8>], margin: usize, cut: bool) -> Vec<u8> {
    let mut trimmed: Vec<&[u8]> = lines.iter().map(Vec::as_slice).collect();

    let mut dot_tab = 0u8;
    while trimmed.iter().all(|l| l.first() == Some(&0)) {
        for l in trimmed.iter_mut() {
            *l = &l[1..];
        }
        dot_tab += 1;
    }
    for l in trimmed.iter_mut() {
        while let Some((&0, head)) = l.split_last() {
            *l = head;
        }
    }

    let mut out = Vec::new();
    out.extend(commands::tape_color(TAPE_COLOR));
    out.extend(commands::dot_tab(dot_tab));

    let mut current_len: Option<usize> = None;
    for l in &trimmed {
        if current_len != Some(l.len()) {
            out.extend(commands::bytes_per_line(l.len() as u8));
            current_len = Some(l.len());
        }
        out.extend(commands::line(l));
    }

    if margin > 0 {
        if current_len != Some(0) {
            out.extend(commands::bytes_per_line(0));
        }
        out.extend(commands::skip_lines(margin));
    }
    if cut {
        out.extend(commands::cut());
    }
    out.extend(commands::status_request());
    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::commands::{ESC, SYN};
    use pretty_assertions::assert_eq;

    fn cap() -> Capability {
        Capability::LABELMANAGER_PNP
    }

    #[test]
    fn test_bottom_pixel_is_msb_of_first_byte() {
        let mut bmp = Bitmap::new(1, 64);
        bmp.set(0, 63, true);
        assert_eq!(raster_line(&bmp, 0, &cap()), vec![0x80, 0, 0, 0, 0, 0, 0, 0]);

        let mut bmp = Bitmap::new(1, 64);
        bmp.set(0, 0, true);
        assert_eq!(raster_line(&bmp, 0, &cap()), vec![0, 0, 0, 0, 0, 0, 0, 0x01]);
    }

    #[test]
    fn test_short_bitmap_alignment() {
        let bmp = Bitmap::from_fn(1, 16, |_, _| true);
        let at = |align| {
            let cap = Capability {
                head_align: align,
                ..cap()
            };
            raster_line(&bmp, 0, &cap)
        };
        assert_eq!(at(HeadAlign::Bottom), vec![0xFF, 0xFF, 0, 0, 0, 0, 0, 0]);
        assert_eq!(at(HeadAlign::Top), vec![0, 0, 0, 0, 0, 0, 0xFF, 0xFF]);
        assert_eq!(at(HeadAlign::Center), vec![0, 0, 0, 0xFF, 0xFF, 0, 0, 0]);
    }

    #[test]
    fn test_exact_stream_for_small_label() {
        // Two columns; the second is blank.
        // Row 47 is bottom-first index 16: byte 2, most significant bit.
        let mut bmp = Bitmap::new(2, 64);
        bmp.set(0, 47, true);
        let frame = LabelManagerPnp
            .encode(&bmp, &cap().with_margin(3))
            .unwrap();

        let expected = vec![
            ESC, b'C', 0, // tape colour
            ESC, b'B', 2, // both columns start with two zero bytes
            ESC, b'D', 1, SYN, 0x80, // column 0
            ESC, b'D', 0, SYN, // column 1 (blank)
            SYN, SYN, SYN, // margin, already at zero bytes per line
            ESC, b'A',
        ];
        assert_eq!(frame.segments().len(), 1);
        assert_eq!(frame.to_bytes(), expected);
    }

    #[test]
    fn test_shared_leading_zeros_become_dot_tab() {
        let bmp = Bitmap::from_fn(3, 64, |_, y| y == 40);
        // row 40 → bottom index 23 → byte 2, bit 0
        let frame = LabelManagerPnp.encode(&bmp, &cap().with_margin(0)).unwrap();
        let expected = vec![
            ESC, b'C', 0,
            ESC, b'B', 2,
            ESC, b'D', 1, SYN, 0x01,
            SYN, 0x01,
            SYN, 0x01,
            ESC, b'A',
        ];
        assert_eq!(frame.to_bytes(), expected);
    }

    #[test]
    fn test_margin_switches_to_zero_bytes_per_line() {
        let bmp = Bitmap::from_fn(1, 64, |_, _| true);
        let bytes = LabelManagerPnp.encode(&bmp, &cap().with_margin(2)).unwrap().to_bytes();
        let tail = &bytes[bytes.len() - 7..];
        assert_eq!(tail, &[ESC, b'D', 0, SYN, SYN, ESC, b'A']);
    }

    #[test]
    fn test_auto_cut() {
        let bmp = Bitmap::from_fn(1, 64, |_, _| true);
        let cap = Capability {
            auto_cut: true,
            ..cap().with_margin(0)
        };
        let bytes = LabelManagerPnp.encode(&bmp, &cap).unwrap().to_bytes();
        assert_eq!(&bytes[bytes.len() - 4..], &[ESC, b'E', ESC, b'A']);
    }

    #[test]
    fn test_all_blank_label() {
        let bmp = Bitmap::new(2, 64);
        let bytes = LabelManagerPnp.encode(&bmp, &cap().with_margin(0)).unwrap().to_bytes();
        assert_eq!(
            bytes,
            vec![ESC, b'C', 0, ESC, b'B', 8, ESC, b'D', 0, SYN, SYN, ESC, b'A']
        );
    }

    #[test]
    fn test_chunking() {
        let cap = Capability {
            chunk_lines: 4,
            ..cap().with_margin(5)
        };
        // 10 lines split 4 + 4 + 2
        let bmp = Bitmap::from_fn(10, 64, |_, _| true);
        let frame = LabelManagerPnp.encode(&bmp, &cap).unwrap();
        assert_eq!(frame.segments().len(), 3);

        let count_syn = |seg: &[u8]| seg.iter().filter(|&&b| b == SYN).count();
        // Full lines are 0xFF so SYN only appears as line markers and feed
        assert_eq!(count_syn(&frame.segments()[0]), 4);
        assert_eq!(count_syn(&frame.segments()[1]), 4);
        assert_eq!(count_syn(&frame.segments()[2]), 2 + 5);
        for seg in frame.segments() {
            assert_eq!(&seg[seg.len() - 2..], &[ESC, b'A']);
        }
    }

    #[test]
    fn test_chunk_plus_one_stays_together() {
        let cap = Capability {
            chunk_lines: 4,
            ..cap()
        };
        let bmp = Bitmap::from_fn(5, 64, |_, _| true);
        assert_eq!(LabelManagerPnp.encode(&bmp, &cap).unwrap().segments().len(), 1);
    }

    #[test]
    fn test_deterministic() {
        let bmp = Bitmap::from_fn(300, 64, |x, y| (x * 7 + y * 3) % 5 == 0);
        let a = LabelManagerPnp.encode(&bmp, &cap()).unwrap();
        let b = LabelManagerPnp.encode(&bmp, &cap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_too_wide_is_overflow() {
        let cap = Capability {
            max_columns: 100,
            ..cap()
        };
        let err = LabelManagerPnp.encode(&Bitmap::new(101, 64), &cap).unwrap_err();
        assert!(matches!(err, Error::Overflow(_)), "got {:?}", err);
        assert!(LabelManagerPnp.encode(&Bitmap::new(100, 64), &cap).is_ok());
    }

    #[test]
    fn test_too_tall_is_overflow() {
        let err = LabelManagerPnp.encode(&Bitmap::new(4, 65), &cap()).unwrap_err();
        assert!(matches!(err, Error::Overflow(_)));
    }

    #[test]
    fn test_empty_bitmap_rejected() {
        let err = LabelManagerPnp.encode(&Bitmap::new(0, 64), &cap()).unwrap_err();
        assert!(matches!(err, Error::Input(_)));
    }
}
