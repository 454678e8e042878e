//! Text line rendering.
//!
//! Two glyph sources:
//!
//! - **TTF**: any TrueType/OpenType file, rasterised with ab_glyph. Coverage
//!   is accumulated in an f32 buffer and thresholded, so strokes stay crisp
//!   on the 1-bit tape.
//! - **Built-in**: the Spleen 6x12 and 12x24 bitmap fonts, scaled
//!   nearest-neighbour. Needs no font file at all.
//!
//! Glyphs are sized to 7/8 of the line height and drawn from the top of the
//! line; anything below the last row is clipped.

use std::fmt;
use std::fs;
use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use log::debug;
use spleen_font::{FONT_6X12, FONT_12X24, PSF2Font};

use super::bitmap::Bitmap;
use super::dither::THRESHOLD;
use crate::error::Error;

/// Glyph height relative to the line height
pub const FONT_SIZE_RATIO: f32 = 7.0 / 8.0;

/// Blank columns added after every glyph
pub const GLYPH_SPACING: usize = 1;

/// Font setting value that selects the built-in bitmap font
pub const BUILTIN_FONT: &str = "builtin";

/// Where glyphs come from.
#[derive(Clone)]
pub enum Typeface {
    Builtin,
    Ttf(FontArc),
}

impl fmt::Debug for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => write!(f, "Typeface::Builtin"),
            Self::Ttf(_) => write!(f, "Typeface::Ttf(..)"),
        }
    }
}

impl Typeface {
    /// Resolve a font setting: `builtin` or a path to a font file.
    pub fn from_setting(value: &str) -> Result<Self, Error> {
        if value.eq_ignore_ascii_case(BUILTIN_FONT) {
            return Ok(Self::Builtin);
        }
        Self::load(value)
    }

    /// Load a TTF/OTF font file.
    ///
    /// A missing or unreadable file is a resource error; a file that is
    /// not a font is a configuration error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| {
            Error::Resource(format!("Failed to read font {}: {}", path.display(), e))
        })?;
        let font = FontArc::try_from_vec(data).map_err(|e| {
            Error::Configuration(format!("{} is not a usable font: {}", path.display(), e))
        })?;
        debug!("loaded font {}", path.display());
        Ok(Self::Ttf(font))
    }
}

/// One line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
}

impl TextLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Render the line into a bitmap exactly `height` rows tall.
    ///
    /// Width follows the text; an empty line is one blank column.
    pub fn render(&self, face: &Typeface, height: usize) -> Result<Bitmap, Error> {
        self.render_sized(face, height, glyph_size(height))
    }

    /// Render with an explicit glyph size, so several lines of one block
    /// can share it. Glyphs taller than `height` are clipped.
    pub fn render_sized(&self, face: &Typeface, height: usize, glyph_px: usize) -> Result<Bitmap, Error> {
        if height == 0 {
            return Err(Error::Input("Text line height must be positive".to_string()));
        }
        let glyph_px = glyph_px.max(1);
        match face {
            Typeface::Ttf(font) => Ok(render_ttf(&self.text, font, glyph_px, height)),
            Typeface::Builtin => render_builtin(&self.text, glyph_px, height),
        }
    }
}

/// Glyph size in pixels for a line `height` rows tall.
pub fn glyph_size(height: usize) -> usize {
    ((height as f32 * FONT_SIZE_RATIO).round() as usize).max(1)
}

fn render_ttf(text: &str, font: &FontArc, glyph_px: usize, height: usize) -> Bitmap {
    let scale = PxScale::from(glyph_px as f32);
    let scaled = font.as_scaled(scale);

    // Layout: compute glyph positions
    let mut glyphs = Vec::new();
    let mut caret_x = 0.0f32;
    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        glyphs.push((glyph_id, caret_x));
        caret_x += scaled.h_advance(glyph_id) + GLYPH_SPACING as f32;
    }

    let text_width = (caret_x - GLYPH_SPACING as f32).max(0.0).ceil() as usize;
    let width = text_width.max(1);

    let baseline_y = scaled.ascent();

    let mut coverage_buf = vec![0.0f32; width * height];
    for &(glyph_id, glyph_x) in &glyphs {
        let glyph = glyph_id.with_scale_and_position(scale, ab_glyph::point(glyph_x, baseline_y));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;
                if x >= 0 && x < width as i32 && y >= 0 && y < height as i32 {
                    let idx = y as usize * width + x as usize;
                    coverage_buf[idx] = (coverage_buf[idx] + coverage).min(1.0);
                }
            });
        }
    }

    Bitmap::from_fn(width, height, |x, y| coverage_buf[y * width + x] > THRESHOLD)
}

/// Spleen cell sizes, largest first.
const SPLEEN_CELLS: [(&[u8], usize, usize); 2] = [(FONT_12X24, 12, 24), (FONT_6X12, 6, 12)];

fn render_builtin(text: &str, glyph_px: usize, height: usize) -> Result<Bitmap, Error> {
    // Largest cell that only needs scaling up; below 12 px the 6x12 cell shrinks
    let (data, cell_w, cell_h) = SPLEEN_CELLS
        .iter()
        .copied()
        .find(|&(_, _, cell_h)| glyph_px >= cell_h)
        .unwrap_or(SPLEEN_CELLS[1]);

    let mut font = PSF2Font::new(data)
        .map_err(|_| Error::Resource("Built-in font data is corrupt".to_string()))?;

    let glyph_w = ((cell_w * glyph_px) as f32 / cell_h as f32).round().max(1.0) as usize;
    let count = text.chars().count();
    let width = if count == 0 {
        1
    } else {
        count * glyph_w + (count - 1) * GLYPH_SPACING
    };

    let mut bitmap = Bitmap::new(width, height);
    for (i, ch) in text.chars().enumerate() {
        let mut cell = vec![false; cell_w * cell_h];
        let utf8 = ch.to_string();
        if let Some(glyph) = font.glyph_for_utf8(utf8.as_bytes()) {
            for (row_y, row) in glyph.enumerate() {
                for (col_x, on) in row.enumerate() {
                    if row_y < cell_h && col_x < cell_w {
                        cell[row_y * cell_w + col_x] = on;
                    }
                }
            }
        } else if !ch.is_whitespace() {
            draw_box(&mut cell, cell_w, cell_h);
        }

        let origin_x = i * (glyph_w + GLYPH_SPACING);
        for dy in 0..glyph_px {
            for dx in 0..glyph_w {
                let sx = dx * cell_w / glyph_w;
                let sy = dy * cell_h / glyph_px;
                if cell[sy * cell_w + sx] {
                    bitmap.set(origin_x + dx, dy, true);
                }
            }
        }
    }

    Ok(bitmap)
}

/// Outline box for characters the font lacks.
fn draw_box(cell: &mut [bool], width: usize, height: usize) {
    for x in 0..width {
        cell[x] = true;
        cell[(height - 1) * width + x] = true;
    }
    for y in 0..height {
        cell[y * width] = true;
        cell[y * width + width - 1] = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dejavu() -> Typeface {
        Typeface::Ttf(FontArc::try_from_slice(include_bytes!("fonts/DejaVuSans.ttf")).unwrap())
    }

    /// Rows holding at least one inked pixel.
    fn ink_rows(bmp: &Bitmap) -> Vec<usize> {
        (0..bmp.height())
            .filter(|&y| (0..bmp.width()).any(|x| bmp.get(x, y)))
            .collect()
    }

    /// Number of separate ink runs in row `y`.
    fn runs(bmp: &Bitmap, y: usize) -> usize {
        (0..bmp.width())
            .filter(|&x| bmp.get(x, y) && (x == 0 || !bmp.get(x - 1, y)))
            .count()
    }

    #[test]
    fn test_builtin_height_is_exact() {
        for height in [8, 12, 21, 32, 64, 100] {
            let bmp = TextLine::new("Tst").render(&Typeface::Builtin, height).unwrap();
            assert_eq!(bmp.height(), height, "height {}", height);
            if height >= 21 {
                assert!(!bmp.is_blank(), "height {} rendered nothing", height);
            }
        }
    }

    #[test]
    fn test_builtin_width_grows_with_text() {
        let short = TextLine::new("ab").render(&Typeface::Builtin, 64).unwrap();
        let long = TextLine::new("abcd").render(&Typeface::Builtin, 64).unwrap();
        assert!(long.width() > short.width());
    }

    #[test]
    fn test_builtin_width_formula() {
        // 64 * 7/8 = 56 px glyphs from the 12x24 cell → 28 px wide
        let bmp = TextLine::new("abc").render(&Typeface::Builtin, 64).unwrap();
        assert_eq!(bmp.width(), 3 * 28 + 2 * GLYPH_SPACING);
    }

    #[test]
    fn test_builtin_glyph_shape_in_small_band() {
        // A three-line label on 64 dots gives 21-row bands and 18 px glyphs
        let bmp = TextLine::new("H").render(&Typeface::Builtin, 21).unwrap();
        let rows = ink_rows(&bmp);
        assert!(rows.len() >= 10, "ink only in rows {:?}", rows);
        let two_strokes = rows.iter().filter(|&&y| runs(&bmp, y) == 2).count();
        assert!(two_strokes >= 8, "only {} rows show both strokes", two_strokes);
    }

    #[test]
    fn test_builtin_glyph_shape_across_sizes() {
        for glyph_px in 8..=56 {
            let bmp = TextLine::new("H")
                .render_sized(&Typeface::Builtin, 64, glyph_px)
                .unwrap();
            let rows = ink_rows(&bmp);
            assert!(rows.len() >= glyph_px / 2, "{} px: rows {:?}", glyph_px, rows);
            assert!(rows.iter().all(|&y| y < glyph_px));
            assert!(rows.iter().any(|&y| runs(&bmp, y) == 2), "{} px: no strokes", glyph_px);
        }
    }

    #[test]
    fn test_builtin_cell_choice() {
        // 18 px scales the 6x12 cell up; 24 px uses the 12x24 cell as is
        let small = TextLine::new("H").render_sized(&Typeface::Builtin, 21, 18).unwrap();
        assert_eq!(small.width(), 9);
        let large = TextLine::new("H").render_sized(&Typeface::Builtin, 30, 24).unwrap();
        assert_eq!(large.width(), 12);
    }

    #[test]
    fn test_ttf_height_is_exact() {
        let face = dejavu();
        for height in [8, 12, 21, 32, 64] {
            for text in ["Tst", "gjpq", "ÄÖÜ"] {
                let bmp = TextLine::new(text).render(&face, height).unwrap();
                assert_eq!(bmp.height(), height, "{:?} at {}", text, height);
                if height >= 21 {
                    assert!(!bmp.is_blank(), "{:?} at {} rendered nothing", text, height);
                }
            }
        }
    }

    #[test]
    fn test_ttf_ink_stays_in_glyph_rows() {
        let bmp = TextLine::new("Tst").render(&dejavu(), 64).unwrap();
        let rows = ink_rows(&bmp);
        assert!(rows.len() >= 25, "ink only in rows {:?}", rows);
        // No descenders: nothing below the 56 px glyph box
        assert!(rows.iter().all(|&y| y < glyph_size(64)), "rows {:?}", rows);
    }

    #[test]
    fn test_ttf_width_grows_with_text() {
        let face = dejavu();
        let short = TextLine::new("Tst").render(&face, 64).unwrap();
        let long = TextLine::new("Tst Tst").render(&face, 64).unwrap();
        assert!(short.width() > 10);
        assert!(long.width() > short.width() * 3 / 2);
    }

    #[test]
    fn test_ttf_glyph_size_independent_of_band() {
        let face = dejavu();
        let line = TextLine::new("Tst");
        let tight = line.render_sized(&face, 21, 18).unwrap();
        let loose = line.render_sized(&face, 22, 18).unwrap();
        assert_eq!(tight.width(), loose.width());
        assert_eq!(ink_rows(&tight), ink_rows(&loose));
    }

    #[test]
    fn test_empty_line_is_one_blank_column() {
        let bmp = TextLine::new("").render(&Typeface::Builtin, 32).unwrap();
        assert_eq!(bmp.width(), 1);
        assert_eq!(bmp.height(), 32);
        assert!(bmp.is_blank());
    }

    #[test]
    fn test_whitespace_renders_blank() {
        let bmp = TextLine::new("   ").render(&Typeface::Builtin, 32).unwrap();
        assert!(bmp.is_blank());
        assert!(bmp.width() > 1);
    }

    #[test]
    fn test_zero_height_rejected() {
        let err = TextLine::new("x").render(&Typeface::Builtin, 0).unwrap_err();
        assert!(matches!(err, Error::Input(_)));
    }

    #[test]
    fn test_missing_font_file_is_resource_error() {
        let err = Typeface::load("/nonexistent/font.ttf").unwrap_err();
        assert!(matches!(err, Error::Resource(_)), "got {:?}", err);
    }

    #[test]
    fn test_garbage_font_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();
        let err = Typeface::load(&path).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)), "got {:?}", err);
    }

    #[test]
    fn test_builtin_setting() {
        assert!(matches!(Typeface::from_setting("builtin"), Ok(Typeface::Builtin)));
        assert!(matches!(Typeface::from_setting("BUILTIN"), Ok(Typeface::Builtin)));
    }
}
