//! # Job Driver
//!
//! Runs a [`LabelJob`] through every stage, in order:
//!
//! ```text
//! ParseSpec ─► RenderElements ─► Compose ─► Encode ─► Transport ─► Done
//!                                   │
//!                                   └─► Preview ─► Done   (preview jobs)
//!
//! any stage ─► Failed(stage)
//! ```
//!
//! Nothing is retried. A failure stops the job and reports the stage it
//! happened in. The device is only opened once the whole frame is built,
//! so a job that fails before `Transport` never touches the printer.

use std::fmt;
use std::path::PathBuf;

use log::{debug, info};

use super::{Element, LabelJob, Output};
use crate::compose::{self, Compositor, MAX_FRAME};
use crate::error::Error;
use crate::protocol::labelmanager::LabelManagerPnp;
use crate::protocol::{Encoder, PrinterFrame};
use crate::render::Bitmap;
use crate::render::preview;
use crate::render::text::{self, TextLine, Typeface};
use crate::transport::{StatusReply, Transport};

/// A step of the job pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ParseSpec,
    RenderElements,
    Compose,
    Preview,
    Encode,
    Transport,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ParseSpec => "Parsing the label",
            Self::RenderElements => "Rendering",
            Self::Compose => "Layout",
            Self::Preview => "Preview",
            Self::Encode => "Encoding",
            Self::Transport => "Printing",
        };
        f.write_str(name)
    }
}

/// Where the driver currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    ParseSpec,
    RenderElements,
    Compose,
    Preview,
    Encode,
    Transport,
    Done,
    Failed(Stage),
}

impl From<Stage> for JobState {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::ParseSpec => Self::ParseSpec,
            Stage::RenderElements => Self::RenderElements,
            Stage::Compose => Self::Compose,
            Stage::Preview => Self::Preview,
            Stage::Encode => Self::Encode,
            Stage::Transport => Self::Transport,
        }
    }
}

/// A job that stopped at `stage`.
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed: {error}")]
pub struct JobFailure {
    pub stage: Stage,
    #[source]
    pub error: Error,
}

impl JobFailure {
    /// Remediation hint carried by the underlying error
    pub fn hint(&self) -> Option<&str> {
        self.error.hint()
    }
}

/// What a finished job produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Printed {
        /// Label length in columns
        columns: usize,
        /// Bytes sent to the printer
        bytes: usize,
        /// Status reply per transaction
        replies: Vec<Option<StatusReply>>,
    },
    Previewed {
        path: PathBuf,
        columns: usize,
    },
}

/// Runs label jobs against one transport.
pub struct JobDriver<T> {
    encoder: Box<dyn Encoder + Send>,
    transport: T,
    state: JobState,
}

impl<T: Transport> JobDriver<T> {
    /// Driver for the LabelManager PnP.
    pub fn new(transport: T) -> Self {
        Self::with_encoder(transport, Box::new(LabelManagerPnp))
    }

    pub fn with_encoder(transport: T, encoder: Box<dyn Encoder + Send>) -> Self {
        Self {
            encoder,
            transport,
            state: JobState::Idle,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Run a job to completion.
    pub fn run(&mut self, job: LabelJob) -> Result<Outcome, JobFailure> {
        self.enter(Stage::ParseSpec);
        let inner_height = self.step(Stage::ParseSpec, validate(&job))?;

        self.enter(Stage::RenderElements);
        let parts = self.step(Stage::RenderElements, render_elements(&job, inner_height))?;

        self.enter(Stage::Compose);
        let label = self.step(
            Stage::Compose,
            Compositor::new(job.gutter).compose(&parts),
        )?;
        info!(
            "label is {} x {} dots ({} element(s))",
            label.width(),
            label.height(),
            parts.len()
        );

        if let Output::Preview(path) = &job.output {
            self.enter(Stage::Preview);
            self.step(Stage::Preview, preview::save_png(&label, path))?;
            self.state = JobState::Done;
            return Ok(Outcome::Previewed {
                path: path.clone(),
                columns: label.width(),
            });
        }

        self.enter(Stage::Encode);
        let encoded = self.encoder.encode(&label, &job.capability);
        let frame = self.step(Stage::Encode, encoded)?;

        self.enter(Stage::Transport);
        let sent = self.transport.send(&frame);
        let replies = self.step(Stage::Transport, sent)?;

        self.state = JobState::Done;
        Ok(Outcome::Printed {
            columns: label.width(),
            bytes: frame.len(),
            replies,
        })
    }

    /// Encode a job without sending it.
    pub fn encode_only(&mut self, job: &LabelJob) -> Result<PrinterFrame, JobFailure> {
        self.enter(Stage::ParseSpec);
        let inner_height = self.step(Stage::ParseSpec, validate(job))?;
        self.enter(Stage::RenderElements);
        let parts = self.step(Stage::RenderElements, render_elements(job, inner_height))?;
        self.enter(Stage::Compose);
        let label = self.step(Stage::Compose, Compositor::new(job.gutter).compose(&parts))?;
        self.enter(Stage::Encode);
        let encoded = self.encoder.encode(&label, &job.capability);
        let frame = self.step(Stage::Encode, encoded)?;
        self.state = JobState::Done;
        Ok(frame)
    }

    fn enter(&mut self, stage: Stage) {
        debug!("{} ({})", stage, self.encoder.name());
        self.state = stage.into();
    }

    fn step<R>(&mut self, stage: Stage, result: Result<R, Error>) -> Result<R, JobFailure> {
        result.map_err(|error| {
            debug!("{} failed: {}", stage, error);
            self.state = JobState::Failed(stage);
            JobFailure { stage, error }
        })
    }
}

/// Check the job before any work is done.
///
/// Returns the height available to text inside the frame.
fn validate(job: &LabelJob) -> Result<usize, Error> {
    if job.elements.is_empty() {
        return Err(Error::Input("Nothing to print: the label has no elements".to_string()));
    }

    let cap = &job.capability;
    if cap.tape_dots == 0 || cap.tape_dots > cap.printhead_dots {
        return Err(Error::Configuration(format!(
            "Tape height of {} dots does not fit a {} dot printhead",
            cap.tape_dots, cap.printhead_dots
        )));
    }

    let height = cap.tape_dots as usize;
    let inner_height = height.saturating_sub(2 * job.frame.min(MAX_FRAME));
    for block in job.text_blocks() {
        if block.len() > inner_height {
            return Err(Error::Input(format!(
                "{} text lines do not fit on a label {} dots high",
                block.len(),
                inner_height
            )));
        }
    }
    Ok(inner_height)
}

/// Render every element at the tape height, merging adjacent text lines
/// into blocks.
fn render_elements(job: &LabelJob, inner_height: usize) -> Result<Vec<Bitmap>, Error> {
    let height = job.capability.tape_dots as usize;
    let face = if job.has_text() {
        Some(Typeface::from_setting(&job.font)?)
    } else {
        None
    };

    let mut parts = Vec::new();
    let mut lines: Vec<&TextLine> = Vec::new();
    for element in &job.elements {
        if let Element::Text(line) = element {
            lines.push(line);
            continue;
        }
        if let Some(face) = &face
            && !lines.is_empty()
        {
            parts.push(text_block(&lines, face, height, inner_height, job.frame)?);
            lines.clear();
        }
        let bitmap = match element {
            Element::Barcode(code) => code.render(height)?,
            Element::QrCode(code) => code.render(height)?,
            Element::Image(picture) => picture.render(height)?,
            Element::Text(_) => continue,
        };
        debug!("rendered {:?} at {} columns", kind(element), bitmap.width());
        parts.push(bitmap);
    }
    if let Some(face) = &face
        && !lines.is_empty()
    {
        parts.push(text_block(&lines, face, height, inner_height, job.frame)?);
    }
    Ok(parts)
}

fn kind(element: &Element) -> &'static str {
    match element {
        Element::Text(_) => "text",
        Element::Barcode(_) => "barcode",
        Element::QrCode(_) => "qr code",
        Element::Image(_) => "picture",
    }
}

/// Stack lines into bands of the inner height, then frame the block.
fn text_block(
    lines: &[&TextLine],
    face: &Typeface,
    height: usize,
    inner_height: usize,
    frame: usize,
) -> Result<Bitmap, Error> {
    let count = lines.len();
    let bands: Vec<usize> = (0..count)
        .map(|i| {
            let (start, end) = compose::line_band(i, count, inner_height);
            end - start
        })
        .collect();
    // Every line of the block shares the glyph size of the smallest band
    let glyph_px = text::glyph_size(bands.iter().copied().min().unwrap_or(inner_height));
    let rendered = lines
        .iter()
        .zip(&bands)
        .map(|(line, &band)| line.render_sized(face, band, glyph_px))
        .collect::<Result<Vec<_>, _>>()?;
    let inner = compose::stack(&rendered, inner_height)?;

    let thickness = frame.min(MAX_FRAME);
    if thickness == 0 {
        return Ok(inner);
    }
    let mut block = Bitmap::new(inner.width(), height);
    block.paste(&inner, 0, thickness);
    Ok(compose::frame(&block, thickness))
}

// ============================================================================
// TESTS
// ============================================================================
