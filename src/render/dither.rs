//! # Monochrome Conversion
//!
//! Converts continuous-tone intensity to ink/no-ink decisions. Two modes:
//!
//! - **Threshold**: ink where intensity exceeds 50%. Crisp, right for
//!   line art, logos and screenshots.
//! - **Bayer**: 8x8 ordered dithering, right for photographs.
//!
//! ## The Bayer Matrix
//!
//! ```text
//!     0   1   2   3   4   5   6   7   (x mod 8)
//!   ┌───┬───┬───┬───┬───┬───┬───┬───┐
//! 0 │ 0 │32 │ 8 │40 │ 2 │34 │10 │42 │
//! 1 │48 │16 │56 │24 │50 │18 │58 │26 │
//! 2 │12 │44 │ 4 │36 │14 │46 │ 6 │38 │
//! 3 │60 │28 │52 │20 │62 │30 │54 │22 │
//! 4 │ 3 │35 │11 │43 │ 1 │33 │ 9 │41 │
//! 5 │51 │19 │59 │27 │49 │17 │57 │25 │
//! 6 │15 │47 │ 7 │39 │13 │45 │ 5 │37 │
//! 7 │63 │31 │55 │23 │61 │29 │53 │21 │
//!   └───┴───┴───┴───┴───┴───┴───┴───┘
//! (y mod 8)
//! ```
//!
//! Values are normalised with `threshold = (value + 0.5) / 64.0`, so full
//! ink always prints and full white never does.
//!
//! ## Example
//!
//! ```
//! use dymoprint::render::dither::{self, Monochrome};
//!
//! let bmp = dither::to_bitmap(16, 2, Monochrome::Threshold, |_, _| 1.0);
//! assert_eq!(bmp.ink_count(), 32);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::bitmap::Bitmap;

/// Bayer 8x8 dithering matrix
pub const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Cut-off used by [`Monochrome::Threshold`]
pub const THRESHOLD: f32 = 0.5;

/// How intensity is reduced to 1 bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Monochrome {
    #[default]
    Threshold,
    Bayer,
}

impl Monochrome {
    /// Ink decision for one pixel. `intensity`: 0.0 = white, 1.0 = black.
    #[inline]
    pub fn ink(self, x: usize, y: usize, intensity: f32) -> bool {
        match self {
            Self::Threshold => intensity > THRESHOLD,
            Self::Bayer => should_print(x, y, intensity),
        }
    }
}

impl FromStr for Monochrome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "threshold" => Ok(Self::Threshold),
            "bayer" => Ok(Self::Bayer),
            other => Err(format!(
                "Unknown dithering mode '{}'. Use 'threshold' or 'bayer'",
                other
            )),
        }
    }
}

impl fmt::Display for Monochrome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Threshold => write!(f, "threshold"),
            Self::Bayer => write!(f, "bayer"),
        }
    }
}

/// Bayer threshold for a pixel position, in (0, 1).
#[inline]
pub fn threshold(x: usize, y: usize) -> f32 {
    let matrix_value = BAYER8[y & 7][x & 7];
    (matrix_value as f32 + 0.5) / 64.0
}

/// Ordered-dither decision for a pixel.
#[inline]
pub fn should_print(x: usize, y: usize, intensity: f32) -> bool {
    intensity > threshold(x, y)
}

/// Build a bitmap from an intensity function `f(x, y) -> 0.0..=1.0`.
pub fn to_bitmap<F>(width: usize, height: usize, mode: Monochrome, intensity_fn: F) -> Bitmap
where
    F: Fn(usize, usize) -> f32,
{
    Bitmap::from_fn(width, height, |x, y| mode.ink(x, y, intensity_fn(x, y)))
}

// ============================================================================
// TESTS
// ============================================================================
