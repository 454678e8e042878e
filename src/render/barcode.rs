//! Linear barcode rendering.
//!
//! Uses the barcoders crate for the symbology encoders. Each module becomes
//! [`MODULE_WIDTH`] columns of ink or blank, bars run the full height minus
//! a small vertical margin, and a quiet zone pads both ends.

use std::fmt;
use std::str::FromStr;

use barcoders::sym::code39::Code39;
use barcoders::sym::code93::Code93;
use barcoders::sym::code128::Code128;
use barcoders::sym::ean8::EAN8;
use barcoders::sym::ean13::EAN13;

use super::bitmap::Bitmap;
use crate::error::Error;

/// Pixels per barcode module
pub const MODULE_WIDTH: usize = 2;

/// Blank columns on each side of the bars
pub const QUIET_ZONE: usize = 6;

/// Upper bound for the blank rows above and below the bars
pub const MAX_VERTICAL_MARGIN: usize = 8;

/// Supported barcode symbologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbology {
    Code39,
    Code93,
    Code128,
    Ean13,
    Ean8,
    UpcA,
}

impl Symbology {
    /// Names accepted on the command line.
    pub const NAMES: &'static [&'static str] = &[
        "code39", "code93", "code128", "ean", "ean13", "ean8", "gtin", "isbn13", "jan", "upc",
        "upca",
    ];
}

impl FromStr for Symbology {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "code39" => Ok(Self::Code39),
            "code93" => Ok(Self::Code93),
            "code128" => Ok(Self::Code128),
            "ean" | "ean13" | "jan" | "gtin" | "isbn13" => Ok(Self::Ean13),
            "ean8" => Ok(Self::Ean8),
            "upc" | "upca" => Ok(Self::UpcA),
            other => Err(Error::Configuration(format!(
                "Unsupported barcode symbology '{}'. Supported: {}",
                other,
                Self::NAMES.join(", ")
            ))),
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Code39 => "code39",
            Self::Code93 => "code93",
            Self::Code128 => "code128",
            Self::Ean13 => "ean13",
            Self::Ean8 => "ean8",
            Self::UpcA => "upca",
        };
        f.write_str(name)
    }
}

/// A barcode element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Barcode {
    pub symbology: Symbology,
    pub payload: String,
}

impl Barcode {
    pub fn new(symbology: Symbology, payload: impl Into<String>) -> Self {
        Self {
            symbology,
            payload: payload.into(),
        }
    }

    /// Encode the payload to modules, `1` = bar.
    pub fn modules(&self) -> Result<Vec<u8>, Error> {
        let invalid = |e: barcoders::error::Error| {
            Error::Input(format!(
                "'{}' cannot be encoded as {}: {}",
                self.payload, self.symbology, e
            ))
        };
        let modules = match self.symbology {
            Symbology::Code39 => Code39::new(&self.payload).map_err(invalid)?.encode(),
            Symbology::Code93 => Code93::new(&self.payload).map_err(invalid)?.encode(),
            Symbology::Code128 => {
                // Character set B covers upper/lower case, digits and punctuation
                let prefixed = format!("\u{0181}{}", self.payload);
                Code128::new(&prefixed).map_err(invalid)?.encode()
            }
            Symbology::Ean13 => {
                let digits = strip_check_digit(&self.payload, 12, self.symbology)?;
                EAN13::new(&digits).map_err(invalid)?.encode()
            }
            Symbology::Ean8 => {
                let digits = strip_check_digit(&self.payload, 7, self.symbology)?;
                EAN8::new(&digits).map_err(invalid)?.encode()
            }
            Symbology::UpcA => {
                // UPC-A is EAN-13 with a leading zero
                let digits = strip_check_digit(&self.payload, 11, self.symbology)?;
                EAN13::new(format!("0{}", digits)).map_err(invalid)?.encode()
            }
        };
        Ok(modules)
    }

    /// Render bars into a bitmap exactly `height` rows tall.
    pub fn render(&self, height: usize) -> Result<Bitmap, Error> {
        let modules = self.modules()?;
        let margin = MAX_VERTICAL_MARGIN.min(height / 8);
        let width = modules.len() * MODULE_WIDTH + 2 * QUIET_ZONE;

        let mut bitmap = Bitmap::new(width, height);
        for (i, &module) in modules.iter().enumerate() {
            if module == 1 {
                let x = QUIET_ZONE + i * MODULE_WIDTH;
                bitmap.fill_rect(x, margin, MODULE_WIDTH, height - 2 * margin, true);
            }
        }
        Ok(bitmap)
    }
}

/// Validate an EAN/UPC payload and return it without its check digit.
///
/// `data_len` digits are accepted as is; `data_len + 1` digits must end in
/// the correct check digit.
fn strip_check_digit(payload: &str, data_len: usize, symbology: Symbology) -> Result<String, Error> {
    if !payload.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::Input(format!(
            "{} payload must be digits only, got '{}'",
            symbology, payload
        )));
    }
    let digits: Vec<u32> = payload.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() == data_len {
        return Ok(payload.to_string());
    }
    if digits.len() != data_len + 1 {
        return Err(Error::Input(format!(
            "{} payload must have {} or {} digits, got {}",
            symbology,
            data_len,
            data_len + 1,
            digits.len()
        )));
    }
    let (data, check) = digits.split_at(data_len);
    let expected = check_digit(data);
    if check[0] != expected {
        return Err(Error::Input(format!(
            "{} check digit of '{}' should be {}",
            symbology, payload, expected
        )));
    }
    Ok(payload[..data_len].to_string())
}

/// GS1 mod-10 check digit: weights 3,1,3,… from the rightmost data digit.
fn check_digit(data: &[u32]) -> u32 {
    let sum: u32 = data
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| if i % 2 == 0 { d * 3 } else { d })
        .sum();
    (10 - sum % 10) % 10
}
