use std::fmt;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

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

/// Laid-out size of a text block in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TextExtent {
    pub width: f32,
    /// Sum of line heights (ascent + descent + gap per line).
    pub height: f32,
    /// Distance from the top of the block to the first baseline.
    pub ascent: f32,
}

/// Owns a collection of loaded fonts.
///
/// Fonts are immutable after loading. The system is owned by the application
/// and passed to the text renderer each frame so new glyphs can be
/// rasterized on demand.
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    ///
    /// Returns the `FontId` that identifies the font in draw commands.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        log::debug!("loaded font {:?} as {id:?}", font.name());
        self.fonts.push(font);
        Ok(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Returns the underlying `fontdue::Font`, if `id` is valid.
    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// Lays out `text` (honouring `\n`) and returns its extent.
    ///
    /// Unknown fonts measure as an empty block one line tall.
    #[must_use]
    pub fn measure_text(&self, text: &str, id: FontId, size: f32, max_width: Option<f32>) -> TextExtent {
        let Some(font) = self.get(id) else {
            return TextExtent { width: 0.0, height: size * 1.2, ascent: size };
        };

        let (ascent, line_height) = match font.horizontal_line_metrics(size) {
            Some(m) => (m.ascent, m.new_line_size),
            None => (size, size * 1.2),
        };

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings { max_width, ..LayoutSettings::default() });
        layout.append(&[font], &TextStyle::new(text, size, 0));

        // Pen position after each glyph, not the bitmap edge, so trailing
        // side bearings count towards the width.
        let width = layout
            .glyphs()
            .iter()
            .map(|g| {
                let m = font.metrics_indexed(g.key.glyph_index, size);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);

        let lines = layout.lines().map_or(1, |l| l.len().max(1));
        TextExtent { width, height: lines as f32 * line_height, ascent }
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
    fn garbage_bytes_fail_to_load() {
        let mut fs = FontSystem::new();
        let err = fs.load_font(b"definitely not a font");
        assert!(err.is_err());
        assert!(fs.is_empty());
    }

    #[test]
    fn unknown_font_measures_one_empty_line() {
        let fs = FontSystem::new();
        let ext = fs.measure_text("hello", FontId(3), 10.0, None);
        assert_eq!(ext.width, 0.0);
        assert!((ext.height - 12.0).abs() < 1e-4);
    }
}
