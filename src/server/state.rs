//! Server state and configuration.

use std::sync::Mutex;

use crate::job::{Element, JobDriver, JobFailure, LabelJob, Outcome};
use crate::printer::Capability;
use crate::render::text::TextLine;
use crate::transport::Transport;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:5000")
    pub listen_addr: String,
    /// Printer parameters, including the trailing margin
    pub capability: Capability,
    /// Font setting for label text
    pub font: String,
    /// Blank columns between elements
    pub gutter: usize,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    /// The printer. Jobs take the lock for their whole run, so only one
    /// label is printed at a time.
    printer: Mutex<Box<dyn Transport + Send>>,
}

impl AppState {
    pub fn new(config: ServerConfig, transport: Box<dyn Transport + Send>) -> Self {
        Self {
            config,
            printer: Mutex::new(transport),
        }
    }

    /// Print one line of text. Blocks until the printer is free and the
    /// job has finished.
    pub fn print_text(&self, text: &str) -> Result<Outcome, JobFailure> {
        let job = LabelJob::new(self.config.capability)
            .push(Element::Text(TextLine::new(text)))
            .font(self.config.font.as_str())
            .gutter(self.config.gutter);

        // The transport keeps no state between sends.
        let mut printer = self
            .printer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        JobDriver::new(&mut **printer).run(job)
    }
}
