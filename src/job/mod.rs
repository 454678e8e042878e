//! # Label Jobs
//!
//! A [`LabelJob`] describes one label: what goes on it, in which order,
//! and where the result goes. It is built once, then handed by value to
//! [`JobDriver::run`], which consumes it.
//!
//! ## Layout
//!
//! Elements are laid out left to right in the order they were pushed.
//! Adjacent [`Element::Text`] lines form one text block: the lines share
//! the tape height, stacked top to bottom, and may be framed.
//!
//! ```
//! use dymoprint::job::{Element, LabelJob};
//! use dymoprint::printer::Capability;
//! use dymoprint::render::{qr::QrCode, text::TextLine};
//!
//! let job = LabelJob::new(Capability::LABELMANAGER_PNP)
//!     .push(Element::QrCode(QrCode::new("https://example.com")))
//!     .push(Element::Text(TextLine::new("Shelf 3")))
//!     .push(Element::Text(TextLine::new("Cables")))
//!     .font("builtin")
//!     .frame(1);
//! assert_eq!(job.text_blocks().len(), 1);
//! ```

pub mod driver;

pub use driver::{JobDriver, JobFailure, JobState, Outcome, Stage};

use std::path::PathBuf;

use crate::compose::DEFAULT_GUTTER;
use crate::printer::Capability;
use crate::render::barcode::Barcode;
use crate::render::picture::Picture;
use crate::render::qr::QrCode;
use crate::render::text::{BUILTIN_FONT, TextLine};

/// Something placed on the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Text(TextLine),
    Barcode(Barcode),
    QrCode(QrCode),
    Image(Picture),
}

/// Where a finished label goes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Output {
    /// Encode and send to the printer
    #[default]
    Device,
    /// Write a PNG preview instead of printing
    Preview(PathBuf),
}

/// One label to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelJob {
    pub elements: Vec<Element>,
    pub capability: Capability,
    /// Font setting for text: a font file path or `builtin`
    pub font: String,
    /// Frame thickness around the text block
    pub frame: usize,
    /// Blank columns between elements
    pub gutter: usize,
    pub output: Output,
}

impl LabelJob {
    pub fn new(capability: Capability) -> Self {
        Self {
            elements: Vec::new(),
            capability,
            font: BUILTIN_FONT.to_string(),
            frame: 0,
            gutter: DEFAULT_GUTTER,
            output: Output::Device,
        }
    }

    /// Append an element after the existing ones.
    pub fn push(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    pub fn frame(mut self, thickness: usize) -> Self {
        self.frame = thickness;
        self
    }

    pub fn gutter(mut self, columns: usize) -> Self {
        self.gutter = columns;
        self
    }

    /// Write a PNG to `path` instead of printing.
    pub fn preview(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Output::Preview(path.into());
        self
    }

    /// Runs of adjacent text lines, in label order.
    pub fn text_blocks(&self) -> Vec<Vec<&TextLine>> {
        let mut blocks = Vec::new();
        let mut current = Vec::new();
        for element in &self.elements {
            if let Element::Text(line) = element {
                current.push(line);
            } else if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            blocks.push(current);
        }
        blocks
    }

    pub fn has_text(&self) -> bool {
        self.elements.iter().any(|e| matches!(e, Element::Text(_)))
    }
}
