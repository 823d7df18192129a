use std::fmt;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

use crate::coords::Vec2;

/// Line height as a multiple of the font size when no font metrics are available.
const FALLBACK_LINE_FACTOR: f32 = 1.2;
/// Per-character advance as a multiple of the font size when no font is loaded.
const FALLBACK_ADVANCE_FACTOR: f32 = 0.5;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Single-line text metrics used by widget layout.
///
/// `font = None` (or an id the implementation does not know) must still return
/// a usable estimate so layout stays total.
pub trait TextMeasure {
    /// Width and line height of `text` laid out on one line.
    fn measure(&self, text: &str, font: Option<FontId>, size: f32) -> Vec2;

    /// Height of one line of text.
    fn line_height(&self, font: Option<FontId>, size: f32) -> f32 {
        self.measure("", font, size).y
    }
}

/// Owns a collection of loaded fonts.
///
/// Fonts are immutable after loading. The text renderer borrows the system
/// each frame so glyphs can be rasterized into its atlas on demand.
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// Distance from the top of a line to the next line's top.
    pub(crate) fn font_line_height(font: &fontdue::Font, size: f32) -> f32 {
        font.horizontal_line_metrics(size)
            .map(|m| m.new_line_size)
            .unwrap_or(size * FALLBACK_LINE_FACTOR)
    }

    fn estimate(text: &str, size: f32) -> Vec2 {
        let chars = text.chars().count() as f32;
        Vec2::new(chars * size * FALLBACK_ADVANCE_FACTOR, size * FALLBACK_LINE_FACTOR)
    }
}

impl TextMeasure for FontSystem {
    fn measure(&self, text: &str, font: Option<FontId>, size: f32) -> Vec2 {
        let Some(font) = font.and_then(|id| self.get(id)) else {
            return Self::estimate(text, size);
        };

        let line_h = Self::font_line_height(font, size);

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[font], &TextStyle::new(text, size, 0));

        // Pen position after each glyph rather than the bitmap right edge, so
        // trailing spaces and side bearings count towards the width.
        let w = layout
            .glyphs()
            .iter()
            .map(|g| {
                let m = font.metrics_indexed(g.key.glyph_index, size);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);

        Vec2::new(w, line_h)
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_uses_estimate() {
        let fonts = FontSystem::new();
        let m = fonts.measure("Log In", None, 20.0);
        assert_eq!(m.x, 60.0);
        assert!((m.y - 24.0).abs() < 1e-4);
    }

    #[test]
    fn unknown_id_uses_estimate() {
        let fonts = FontSystem::new();
        let m = fonts.measure("abcd", Some(FontId(3)), 10.0);
        assert_eq!(m.x, 20.0);
        assert!((fonts.line_height(Some(FontId(3)), 10.0) - 12.0).abs() < 1e-4);
    }

    #[test]
    fn empty_text_has_line_height() {
        let fonts = FontSystem::new();
        let m = fonts.measure("", None, 30.0);
        assert_eq!(m.x, 0.0);
        assert!((m.y - 36.0).abs() < 1e-4);
    }

    #[test]
    fn invalid_bytes_are_rejected() {
        let mut fonts = FontSystem::new();
        assert!(fonts.load_font(b"not a font").is_err());
        assert!(fonts.is_empty());
    }
}
