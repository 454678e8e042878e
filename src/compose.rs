//! # Label Compositor
//!
//! Lays rendered elements out into one bitmap.
//!
//! ## Horizontal
//!
//! Elements sit side by side, separated by a blank gutter, with optional
//! blank margins at both ends:
//!
//! ```text
//! │margin│ QR │gutter│ text │gutter│ picture │margin│
//! ```
//!
//! Composition is a left fold of [`append_with_gutter`], so the result of
//! `[A, B, C]` equals `[A, B]` followed by `C`.
//!
//! ## Vertical
//!
//! Text lines share the label height. Line `i` of `n` occupies rows
//! `round(i·H/n) .. round((i+1)·H/n)`, so the bands always add up to `H`.

use crate::error::Error;
use crate::render::Bitmap;

/// Default blank columns between adjacent elements
pub const DEFAULT_GUTTER: usize = 4;

/// Thickest frame drawn around a text block
pub const MAX_FRAME: usize = 3;

/// Horizontal layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compositor {
    /// Blank columns between elements
    pub gutter: usize,
    /// Blank columns before the first element
    pub leading: usize,
    /// Blank columns after the last element
    pub trailing: usize,
}

impl Default for Compositor {
    fn default() -> Self {
        Self {
            gutter: DEFAULT_GUTTER,
            leading: 0,
            trailing: 0,
        }
    }
}

impl Compositor {
    pub fn new(gutter: usize) -> Self {
        Self {
            gutter,
            ..Self::default()
        }
    }

    /// Add blank margin columns at both ends.
    pub fn margins(mut self, leading: usize, trailing: usize) -> Self {
        self.leading = leading;
        self.trailing = trailing;
        self
    }

    /// Concatenate bitmaps of equal height into one label.
    pub fn compose(&self, parts: &[Bitmap]) -> Result<Bitmap, Error> {
        let (first, rest) = parts
            .split_first()
            .ok_or_else(|| Error::Input("Nothing to print: the label has no elements".to_string()))?;

        let mut label = first.clone();
        for part in rest {
            label = append_with_gutter(&label, part, self.gutter)?;
        }

        if self.leading == 0 && self.trailing == 0 {
            return Ok(label);
        }
        let mut padded = Bitmap::new(self.leading + label.width() + self.trailing, label.height());
        padded.paste(&label, self.leading, 0);
        Ok(padded)
    }
}

/// Place `right` after `left` with `gutter` blank columns in between.
pub fn append_with_gutter(left: &Bitmap, right: &Bitmap, gutter: usize) -> Result<Bitmap, Error> {
    if left.height() != right.height() {
        return Err(Error::DimensionMismatch {
            expected: left.height(),
            actual: right.height(),
        });
    }
    let mut out = Bitmap::new(left.width() + gutter + right.width(), left.height());
    out.paste(left, 0, 0);
    out.paste(right, left.width() + gutter, 0);
    Ok(out)
}

/// Rows `[start, end)` of line `index` out of `count` in a block `height` tall.
pub fn line_band(index: usize, count: usize, height: usize) -> (usize, usize) {
    let edge = |i: usize| ((i * height) as f64 / count as f64).round() as usize;
    (edge(index), edge(index + 1))
}

/// Stack pre-rendered lines top to bottom into a block `height` tall.
///
/// Each line must already be exactly as tall as its band (see
/// [`line_band`]); lines are left-aligned and the block is as wide as the
/// widest line.
pub fn stack(lines: &[Bitmap], height: usize) -> Result<Bitmap, Error> {
    if lines.is_empty() {
        return Err(Error::Input("Nothing to stack: no text lines".to_string()));
    }
    let width = lines.iter().map(Bitmap::width).max().unwrap_or(0);
    let mut block = Bitmap::new(width, height);
    for (i, line) in lines.iter().enumerate() {
        let (start, end) = line_band(i, lines.len(), height);
        if line.height() != end - start {
            return Err(Error::DimensionMismatch {
                expected: end - start,
                actual: line.height(),
            });
        }
        block.paste(line, 0, start);
    }
    Ok(block)
}

/// Surround a block with a solid border `thickness` pixels wide.
///
/// The content is inset horizontally by the thickness; the height is kept,
/// so content in the outer rows is covered by the border. Thickness is
/// capped at [`MAX_FRAME`].
pub fn frame(block: &Bitmap, thickness: usize) -> Bitmap {
    let t = thickness.min(MAX_FRAME);
    if t == 0 {
        return block.clone();
    }
    let width = block.width() + 2 * t;
    let height = block.height();
    let mut framed = Bitmap::new(width, height);
    framed.paste(block, t, 0);
    framed.fill_rect(0, 0, width, t, true);
    framed.fill_rect(0, height.saturating_sub(t), width, t, true);
    framed.fill_rect(0, 0, t, height, true);
    framed.fill_rect(width - t, 0, t, height, true);
    framed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn solid(width: usize, height: usize) -> Bitmap {
        Bitmap::from_fn(width, height, |_, _| true)
    }

    fn stripes(width: usize, height: usize) -> Bitmap {
        Bitmap::from_fn(width, height, |x, y| (x + y) % 3 == 0)
    }

    #[test]
    fn test_single_element_passthrough() {
        let a = stripes(5, 8);
        assert_eq!(Compositor::default().compose(&[a.clone()]).unwrap(), a);
    }

    #[test]
    fn test_gutter_width() {
        let label = Compositor::new(4).compose(&[solid(3, 8), solid(2, 8)]).unwrap();
        assert_eq!(label.width(), 3 + 4 + 2);
        assert_eq!(label.height(), 8);
        for x in 3..7 {
            assert!(label.column(x).all(|p| !p), "gutter column {} inked", x);
        }
        assert!(label.column(7).all(|p| p));
    }

    #[test]
    fn test_margins() {
        let label = Compositor::new(4).margins(2, 5).compose(&[solid(3, 8)]).unwrap();
        assert_eq!(label.width(), 2 + 3 + 5);
        assert!(label.column(1).all(|p| !p));
        assert!(label.column(2).all(|p| p));
        assert!(label.column(5).all(|p| !p));
    }

    #[test]
    fn test_fold_associativity() {
        let parts = [stripes(5, 16), solid(3, 16), stripes(7, 16)];
        let compositor = Compositor::new(4);
        let all = compositor.compose(&parts).unwrap();
        let ab = compositor.compose(&parts[..2]).unwrap();
        let then_c = append_with_gutter(&ab, &parts[2], 4).unwrap();
        assert_eq!(all, then_c);

        let bc = compositor.compose(&parts[1..]).unwrap();
        let a_then = append_with_gutter(&parts[0], &bc, 4).unwrap();
        assert_eq!(all, a_then);
    }

    #[test]
    fn test_height_mismatch() {
        let err = Compositor::default()
            .compose(&[solid(2, 8), solid(2, 9)])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 8,
                actual: 9
            }
        ));
    }

    #[test]
    fn test_empty_is_input_error() {
        assert!(matches!(
            Compositor::default().compose(&[]),
            Err(Error::Input(_))
        ));
    }

    #[test]
    fn test_bands_cover_height() {
        for height in [7, 10, 64] {
            for count in 1..=5 {
                let mut next = 0;
                for i in 0..count {
                    let (start, end) = line_band(i, count, height);
                    assert_eq!(start, next);
                    next = end;
                }
                assert_eq!(next, height);
            }
        }
    }

    #[test]
    fn test_stack() {
        let (s0, e0) = line_band(0, 3, 64);
        let (s1, e1) = line_band(1, 3, 64);
        let (s2, e2) = line_band(2, 3, 64);
        let lines = [solid(4, e0 - s0), solid(9, e1 - s1), solid(2, e2 - s2)];
        let block = stack(&lines, 64).unwrap();
        assert_eq!(block.height(), 64);
        assert_eq!(block.width(), 9);
        assert!(block.get(3, 0));
        assert!(!block.get(5, 0));
        assert!(block.get(8, s1));
        assert!(!block.get(3, s2));
    }

    #[test]
    fn test_stack_rejects_wrong_band() {
        assert!(matches!(
            stack(&[solid(2, 10), solid(2, 10)], 64),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_frame() {
        let framed = frame(&Bitmap::new(10, 20), 2);
        assert_eq!(framed.width(), 14);
        assert_eq!(framed.height(), 20);
        assert!(framed.get(0, 10) && framed.get(1, 10) && !framed.get(2, 10));
        assert!(framed.get(7, 0) && framed.get(7, 19) && !framed.get(7, 2));
        // Capped
        assert_eq!(frame(&Bitmap::new(10, 20), 9).width(), 10 + 2 * MAX_FRAME);
        // No-op
        assert_eq!(frame(&Bitmap::new(10, 20), 0), Bitmap::new(10, 20));
    }
}
