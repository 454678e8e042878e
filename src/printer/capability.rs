//! # Device Capability
//!
//! This module defines the hardware limits of supported label printers.
//!
//! ## Supported Printers
//!
//! | Model | USB id | Printhead | Bytes/line | Chunk |
//! |-------|--------|-----------|------------|-------|
//! | LabelManager PnP | 0922:1002 | 64 dots | 8 | 200 lines |
//!
//! ## Orientation
//!
//! The label is printed sideways: the printhead spans the tape height and
//! every raster line the device receives is one *column* of the label.
//!
//! ```text
//!            label length (columns, unbounded) ──►
//!   ▲      ┌──────────────────────────────────────┐
//!   │      │ T s t                                │
//! 64 dots  │                                      │
//!   │      └──────────────────────────────────────┘
//!   ▼        ▲ one raster line = one column
//! ```
//!
//! ## Usage
//!
//! ```
//! use dymoprint::printer::Capability;
//!
//! let cap = Capability::LABELMANAGER_PNP;
//! assert_eq!(cap.line_bytes(), 8);
//! assert_eq!(cap.tape_dots, 64);
//! ```

/// Where a bitmap shorter than the printhead sits within a raster line.
///
/// The first byte of a raster line drives the dots at the bottom edge of
/// the label, so `Bottom` keeps the padding at the end of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadAlign {
    Bottom,
    Top,
    #[default]
    Center,
}

/// # Device Capability
///
/// Physical and protocol limits of a label printer.
///
/// - **printhead_dots**: dots across the tape the head can address
/// - **tape_dots**: label height rendered for the loaded tape
/// - **chunk_lines**: raster lines sent per transaction before the printer
///   must be polled for status
/// - **max_columns**: longest label the encoder accepts
/// - **margin_lines**: blank lines fed after the label so it clears the cutter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    /// Printer model name
    pub name: &'static str,

    /// USB vendor id
    pub vendor_id: u16,

    /// USB product id
    pub product_id: u16,

    /// Dots on the printhead
    pub printhead_dots: u16,

    /// Rendered label height in dots
    pub tape_dots: u16,

    /// Raster lines per transaction
    pub chunk_lines: usize,

    /// Maximum label length in columns
    pub max_columns: usize,

    /// Blank lines fed after the last raster line
    pub margin_lines: usize,

    /// Placement of short bitmaps on the printhead
    pub head_align: HeadAlign,

    /// Send the cut command after the trailing feed
    pub auto_cut: bool,
}

impl Capability {
    /// # Dymo LabelManager PnP
    ///
    /// 12mm D1 tape, 64 dot printhead, manual cutter.
    ///
    /// The trailing margin of 112 lines (56 × 2) moves the end of the label
    /// past the cutter blade.
    pub const LABELMANAGER_PNP: Self = Self {
        name: "Dymo LabelManager PnP",
        vendor_id: 0x0922,
        product_id: 0x1002,
        printhead_dots: 64,
        tape_dots: 64,
        chunk_lines: 200,
        max_columns: 4096,
        margin_lines: 56 * 2,
        head_align: HeadAlign::Center,
        auto_cut: false,
    };

    /// Bytes in a full raster line
    #[inline]
    pub fn line_bytes(&self) -> usize {
        (self.printhead_dots as usize).div_ceil(8)
    }

    /// Override the trailing margin
    pub fn with_margin(mut self, lines: usize) -> Self {
        self.margin_lines = lines;
        self
    }

    /// Override the rendered tape height
    pub fn with_tape_dots(mut self, dots: u16) -> Self {
        self.tape_dots = dots;
        self
    }
}

impl Default for Capability {
    fn default() -> Self {
        Self::LABELMANAGER_PNP
    }
}

// ============================================================================
// TESTS
// ============================================================================
