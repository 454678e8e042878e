//! # Error Types
//!
//! This module defines error types used throughout the dymoprint library.
//!
//! Every variant is fatal to the job that raised it. Nothing here is
//! retried automatically: the caller decides whether to resubmit a brand
//! new job.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for dymoprint operations
#[derive(Debug, Error)]
pub enum Error {
    /// Bad configuration: unknown symbology, unparsable preferences, bad font file
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A file the job depends on (font, picture) is missing or unreadable
    #[error("Resource error: {0}")]
    Resource(String),

    /// Malformed payload or undecodable image
    #[error("Invalid input: {0}")]
    Input(String),

    /// Bitmaps handed to the compositor disagree on height
    #[error("Dimension mismatch: expected height {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Label does not fit what the device can address
    #[error("Label too large: {0}")]
    Overflow(String),

    /// Device node missing or not accessible
    #[error("Device {} is not available: {reason}", path.display())]
    DeviceUnavailable {
        path: PathBuf,
        reason: String,
        /// Remediation shown to the user
        hint: String,
    },

    /// I/O failure while talking to the device
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Remediation hint for the user, if the error carries one.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::DeviceUnavailable { hint, .. } => Some(hint),
            _ => None,
        }
    }
}
