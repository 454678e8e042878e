//! # Printer Module
//!
//! This module provides device capability descriptions.
//!
//! ## Modules
//!
//! - [`capability`]: Printhead geometry and protocol limits

pub mod capability;

pub use capability::{Capability, HeadAlign};
