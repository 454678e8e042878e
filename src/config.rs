//! # Preferences
//!
//! User preferences stored as TOML.
//!
//! ## Location
//!
//! - Linux: `$XDG_CONFIG_HOME/dymoprint/dymoprint.toml` (usually
//!   `~/.config/dymoprint/dymoprint.toml`)
//! - macOS: `~/Library/Application Support/dymoprint/dymoprint.toml`
//!
//! A missing file is created with the defaults on first use.
//!
//! ## Format
//!
//! ```toml
//! [fonts]
//! regular = "/usr/share/fonts/truetype/ubuntu-font-family/Ubuntu-R.ttf"
//! bold = "/usr/share/fonts/truetype/ubuntu-font-family/Ubuntu-B.ttf"
//! italic = "/usr/share/fonts/truetype/ubuntu-font-family/Ubuntu-RI.ttf"
//! narrow = "/usr/share/fonts/truetype/ubuntu-font-family/Ubuntu-C.ttf"
//!
//! [label]
//! margin = 112
//! gutter = 4
//! dither = "threshold"
//!
//! [device]
//! # path = "/dev/hidraw0"
//! ```
//!
//! Any font may be set to `builtin` to use the bitmap font compiled into
//! the binary. Missing keys take their default.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::compose::DEFAULT_GUTTER;
use crate::error::Error;
use crate::printer::Capability;
use crate::render::dither::Monochrome;

/// Directory under the platform config dir
pub const APP_DIR: &str = "dymoprint";

/// Preferences file name
pub const FILE_NAME: &str = "dymoprint.toml";

const UBUNTU_FONTS: &str = "/usr/share/fonts/truetype/ubuntu-font-family";

/// Font style selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    Narrow,
}

impl FromStr for FontStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" | "regular" => Ok(Self::Regular),
            "b" | "bold" => Ok(Self::Bold),
            "i" | "italic" => Ok(Self::Italic),
            "n" | "narrow" => Ok(Self::Narrow),
            other => Err(format!(
                "unknown font style '{}' (expected r, b, i or n)",
                other
            )),
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Regular => "regular",
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Narrow => "narrow",
        };
        f.write_str(name)
    }
}

/// `[fonts]`: one font setting per style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub regular: String,
    pub bold: String,
    pub italic: String,
    pub narrow: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            regular: format!("{}/Ubuntu-R.ttf", UBUNTU_FONTS),
            bold: format!("{}/Ubuntu-B.ttf", UBUNTU_FONTS),
            italic: format!("{}/Ubuntu-RI.ttf", UBUNTU_FONTS),
            narrow: format!("{}/Ubuntu-C.ttf", UBUNTU_FONTS),
        }
    }
}

impl FontConfig {
    /// Font setting for a style
    pub fn get(&self, style: FontStyle) -> &str {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
            FontStyle::Narrow => &self.narrow,
        }
    }
}

/// `[label]`: layout defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Blank lines fed after the label
    pub margin: usize,
    /// Blank columns between elements
    pub gutter: usize,
    /// Picture conversion
    pub dither: Monochrome,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            margin: Capability::LABELMANAGER_PNP.margin_lines,
            gutter: DEFAULT_GUTTER,
            dither: Monochrome::default(),
        }
    }
}

/// `[device]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DeviceConfig {
    /// Fixed hidraw node; discovered through sysfs when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// All preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Preferences {
    pub fonts: FontConfig,
    pub label: LabelConfig,
    pub device: DeviceConfig,
}

impl Preferences {
    /// Platform default location of the preferences file.
    pub fn default_path() -> Result<PathBuf, Error> {
        let dir = dirs::config_dir().ok_or_else(|| {
            Error::Configuration("Failed to determine config directory".to_string())
        })?;
        Ok(dir.join(APP_DIR).join(FILE_NAME))
    }

    /// Parse preferences from TOML text.
    pub fn parse(text: &str) -> Result<Self, Error> {
        toml::from_str(text).map_err(|e| Error::Configuration(format!("Invalid preferences: {}", e)))
    }

    /// Read preferences from `path`, writing the defaults there if the file
    /// does not exist yet.
    ///
    /// Failing to write the defaults is only a warning; the defaults are
    /// still returned.
    pub fn load_or_init(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            let prefs = Self::default();
            info!("{} not found: writing default preferences", path.display());
            if let Err(e) = prefs.save(path) {
                warn!("could not write {}: {}", path.display(), e);
            }
            return Ok(prefs);
        }

        let text = fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&text).map_err(|e| match e {
            Error::Configuration(msg) => Error::Configuration(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Write preferences to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self)
            .map_err(|e| Error::Configuration(format!("Failed to serialize preferences: {}", e)))?;
        fs::write(path, text)?;
        Ok(())
    }
}
