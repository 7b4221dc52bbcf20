//! 2D text overlays.
//!
//! A [`TextActor`] is positioned in display coordinates: pixels from the
//! bottom-left corner of its renderer's viewport, y up. Fonts are resolved
//! lazily per (family, bold, italic) by the render window's [`FontBook`].

use std::collections::HashMap;
use std::path::PathBuf;

use vizkit_engine::coords::{Rect, Vec2};
use vizkit_engine::paint::Color;
use vizkit_engine::text::{FontId, FontLoadError, FontSystem, TextExtent};

use crate::colors::Rgb;
use crate::painter::Painter;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum FontFamily {
    #[default]
    Arial,
    Courier,
    Times,
}

/// Which part of the text block sits at the display position.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Justification {
    #[default]
    Left,
    Centered,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextProperty {
    pub font_family: FontFamily,
    pub bold: bool,
    pub italic: bool,
    /// Logical pixels.
    pub font_size: u32,
    pub color: Rgb,
    pub opacity: f64,
    pub shadow: bool,
    /// Display pixels, +x right and +y up.
    pub shadow_offset: [i32; 2],
    pub justification: Justification,
}

impl Default for TextProperty {
    fn default() -> Self {
        Self {
            font_family: FontFamily::Arial,
            bold: false,
            italic: false,
            font_size: 12,
            color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            shadow: false,
            shadow_offset: [1, -1],
            justification: Justification::Left,
        }
    }
}

impl TextProperty {
    pub(crate) fn font_key(&self) -> FontKey {
        FontKey { family: self.font_family, bold: self.bold, italic: self.italic }
    }

    /// Black behind light text, white behind dark text.
    pub fn shadow_color(&self) -> Rgb {
        let [r, g, b] = self.color;
        if (r + g + b) / 3.0 > 0.5 { [0.0, 0.0, 0.0] } else { [1.0, 1.0, 1.0] }
    }
}

/// A string drawn over the 3D scene.
#[derive(Debug, Clone, PartialEq)]
pub struct TextActor {
    pub input: String,
    pub text_property: TextProperty,
    /// Bottom-left of the text block, in display pixels from the viewport's
    /// bottom-left corner.
    pub display_position: [i32; 2],
    pub visibility: bool,
}

impl TextActor {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            text_property: TextProperty::default(),
            display_position: [0, 0],
            visibility: true,
        }
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn set_display_position(&mut self, x: i32, y: i32) {
        self.display_position = [x, y];
    }

    pub fn text_property_mut(&mut self) -> &mut TextProperty {
        &mut self.text_property
    }

    /// Top-left corner of a block of `extent` placed at the display
    /// position inside `viewport`.
    pub(crate) fn top_left(&self, viewport: Rect, extent: TextExtent) -> Vec2 {
        let [x, y] = self.display_position;
        let shift = match self.text_property.justification {
            Justification::Left => 0.0,
            Justification::Centered => extent.width * 0.5,
            Justification::Right => extent.width,
        };
        Vec2::new(
            viewport.origin.x + x as f32 - shift,
            viewport.origin.y + viewport.size.y - y as f32 - extent.height,
        )
    }

    pub(crate) fn paint(&self, painter: &mut Painter<'_>, viewport: Rect) {
        if !self.visibility || self.input.is_empty() {
            return;
        }
        let prop = &self.text_property;
        let Some(font) = painter.font(prop.font_key()) else {
            return;
        };
        let size = prop.font_size as f32;
        let extent = painter.measure_text(&self.input, font, size);
        for (origin, color) in self.runs(viewport, extent) {
            painter.text(&self.input, font, size, color, origin);
        }
    }

    /// Top-left corners and colors of the strings to draw, back to front:
    /// the shadow (when enabled) and then the text itself.
    pub(crate) fn runs(&self, viewport: Rect, extent: TextExtent) -> Vec<(Vec2, Color)> {
        let prop = &self.text_property;
        let origin = self.top_left(viewport, extent);
        let opacity = prop.opacity.clamp(0.0, 1.0) as f32;
        let mut runs = Vec::with_capacity(2);
        if prop.shadow {
            // Offset is y up, screen is y down.
            let [dx, dy] = prop.shadow_offset;
            runs.push((origin + Vec2::new(dx as f32, -(dy as f32)), rgb_color(prop.shadow_color(), opacity)));
        }
        runs.push((origin, rgb_color(prop.color, opacity)));
        runs
    }
}

pub(crate) fn rgb_color([r, g, b]: Rgb, opacity: f32) -> Color {
    Color::from_srgb(r as f32, g as f32, b as f32, opacity)
}

// ── font resolution ───────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub(crate) struct FontKey {
    pub family: FontFamily,
    pub bold: bool,
    pub italic: bool,
}

impl FontKey {
    pub(crate) const fn regular(family: FontFamily) -> Self {
        Self { family, bold: false, italic: false }
    }
}

const FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/liberation",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/truetype/noto",
    "/usr/share/fonts/noto",
    "/Library/Fonts",
    "/System/Library/Fonts/Supplemental",
    "C:\\Windows\\Fonts",
];

/// File names to try for `key`, best match first.
fn candidate_files(key: FontKey) -> Vec<String> {
    let style = match (key.bold, key.italic) {
        (false, false) => 0,
        (true, false) => 1,
        (false, true) => 2,
        (true, true) => 3,
    };
    let pick = |names: [&str; 4]| names[style].to_string();
    match key.family {
        FontFamily::Arial => vec![
            pick(["LiberationSans-Regular.ttf", "LiberationSans-Bold.ttf", "LiberationSans-Italic.ttf", "LiberationSans-BoldItalic.ttf"]),
            pick(["Arial.ttf", "Arial Bold.ttf", "Arial Italic.ttf", "Arial Bold Italic.ttf"]),
            pick(["arial.ttf", "arialbd.ttf", "ariali.ttf", "arialbi.ttf"]),
            pick(["DejaVuSans.ttf", "DejaVuSans-Bold.ttf", "DejaVuSans-Oblique.ttf", "DejaVuSans-BoldOblique.ttf"]),
            pick(["NotoSans-Regular.ttf", "NotoSans-Bold.ttf", "NotoSans-Italic.ttf", "NotoSans-BoldItalic.ttf"]),
        ],
        FontFamily::Courier => vec![
            pick(["LiberationMono-Regular.ttf", "LiberationMono-Bold.ttf", "LiberationMono-Italic.ttf", "LiberationMono-BoldItalic.ttf"]),
            pick(["Courier New.ttf", "Courier New Bold.ttf", "Courier New Italic.ttf", "Courier New Bold Italic.ttf"]),
            pick(["cour.ttf", "courbd.ttf", "couri.ttf", "courbi.ttf"]),
            pick(["DejaVuSansMono.ttf", "DejaVuSansMono-Bold.ttf", "DejaVuSansMono-Oblique.ttf", "DejaVuSansMono-BoldOblique.ttf"]),
            pick(["NotoSansMono-Regular.ttf", "NotoSansMono-Bold.ttf", "NotoSansMono-Regular.ttf", "NotoSansMono-Bold.ttf"]),
        ],
        FontFamily::Times => vec![
            pick(["LiberationSerif-Regular.ttf", "LiberationSerif-Bold.ttf", "LiberationSerif-Italic.ttf", "LiberationSerif-BoldItalic.ttf"]),
            pick(["Times New Roman.ttf", "Times New Roman Bold.ttf", "Times New Roman Italic.ttf", "Times New Roman Bold Italic.ttf"]),
            pick(["times.ttf", "timesbd.ttf", "timesi.ttf", "timesbi.ttf"]),
            pick(["DejaVuSerif.ttf", "DejaVuSerif-Bold.ttf", "DejaVuSerif-Italic.ttf", "DejaVuSerif-BoldItalic.ttf"]),
            pick(["NotoSerif-Regular.ttf", "NotoSerif-Bold.ttf", "NotoSerif-Italic.ttf", "NotoSerif-BoldItalic.ttf"]),
        ],
    }
}

fn candidate_paths(key: FontKey) -> impl Iterator<Item = PathBuf> {
    candidate_files(key)
        .into_iter()
        .flat_map(|file| FONT_DIRS.iter().map(move |dir| PathBuf::from(dir).join(&file)))
}

/// Loaded fonts keyed by family and style.
///
/// Registered bytes win over system fonts. A style that cannot be found
/// falls back to the regular face of the family, then to any loaded font.
pub(crate) struct FontBook {
    system: FontSystem,
    resolved: HashMap<FontKey, Option<FontId>>,
    warned: bool,
}

impl FontBook {
    pub(crate) fn new() -> Self {
        Self { system: FontSystem::new(), resolved: HashMap::new(), warned: false }
    }

    pub(crate) fn system(&self) -> &FontSystem {
        &self.system
    }

    pub(crate) fn register(&mut self, key: FontKey, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let id = self.system.load_font(bytes)?;
        self.resolved.insert(key, Some(id));
        Ok(id)
    }

    pub(crate) fn resolve(&mut self, key: FontKey) -> Option<FontId> {
        if let Some(found) = self.resolved.get(&key) {
            return *found;
        }
        let mut found = self.load_from_system(key);
        if found.is_none() && (key.bold || key.italic) {
            found = self.resolve(FontKey::regular(key.family));
        }
        if found.is_none() {
            found = self.resolved.values().flatten().next().copied();
        }
        if found.is_none() && !self.warned {
            log::warn!("no font found for {key:?}; text will not be drawn");
            self.warned = true;
        }
        self.resolved.insert(key, found);
        found
    }

    fn load_from_system(&mut self, key: FontKey) -> Option<FontId> {
        for path in candidate_paths(key) {
            let Ok(bytes) = std::fs::read(&path) else {
                continue;
            };
            match self.system.load_font(&bytes) {
                Ok(id) => {
                    log::debug!("font {key:?} resolved to {}", path.display());
                    return Some(id);
                }
                Err(e) => log::warn!("skipping {}: {e}", path.display()),
            }
        }
        None
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_toolkit_conventions() {
        let p = TextProperty::default();
        assert_eq!(p.font_size, 12);
        assert_eq!(p.shadow_offset, [1, -1]);
        assert_eq!(p.color, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn shadow_contrasts_with_text_color() {
        let mut p = TextProperty::default();
        p.color = [1.0, 248.0 / 255.0, 220.0 / 255.0];
        assert_eq!(p.shadow_color(), [0.0, 0.0, 0.0]);
        p.color = [0.1, 0.2, 0.1];
        assert_eq!(p.shadow_color(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn display_position_is_measured_from_bottom_left() {
        let mut actor = TextActor::new("Hello World!");
        actor.set_display_position(20, 30);
        let vp = Rect::new(0.0, 0.0, 300.0, 300.0);
        let tl = actor.top_left(vp, block(100.0, 40.0));
        assert_eq!(tl, Vec2::new(20.0, 230.0));
    }

    #[test]
    fn display_position_is_relative_to_viewport() {
        let mut actor = TextActor::new("x");
        actor.set_display_position(5, 5);
        let vp = Rect::new(100.0, 50.0, 200.0, 100.0);
        assert_eq!(actor.top_left(vp, block(10.0, 10.0)), Vec2::new(105.0, 135.0));
    }

    #[test]
    fn justification_shifts_by_the_text_width() {
        let mut actor = TextActor::new("x");
        actor.set_display_position(50, 0);
        let vp = Rect::new(0.0, 0.0, 100.0, 100.0);
        actor.text_property.justification = Justification::Centered;
        assert_eq!(actor.top_left(vp, block(20.0, 10.0)).x, 40.0);
        actor.text_property.justification = Justification::Right;
        assert_eq!(actor.top_left(vp, block(20.0, 10.0)).x, 30.0);
    }

    fn block(width: f32, height: f32) -> TextExtent {
        TextExtent { width, height, ascent: height * 0.8 }
    }

    fn shadowed(offset: [i32; 2]) -> TextActor {
        let mut actor = TextActor::new("Hello World!");
        actor.set_display_position(20, 30);
        let prop = actor.text_property_mut();
        prop.shadow = true;
        prop.shadow_offset = offset;
        prop.color = [1.0, 248.0 / 255.0, 220.0 / 255.0];
        actor
    }

    #[test]
    fn shadow_run_precedes_text_and_is_offset_on_screen() {
        let actor = shadowed([4, 4]);
        let runs = actor.runs(Rect::new(0.0, 0.0, 300.0, 300.0), block(100.0, 40.0));
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].0, Vec2::new(24.0, 226.0));
        assert_eq!(runs[0].1, Color::from_srgb(0.0, 0.0, 0.0, 1.0));
        assert_eq!(runs[1].0, Vec2::new(20.0, 230.0));
        assert_eq!(runs[1].1, rgb_color(actor.text_property.color, 1.0));
    }

    #[test]
    fn no_shadow_means_one_run() {
        let mut actor = shadowed([4, 4]);
        actor.text_property.shadow = false;
        assert_eq!(actor.runs(Rect::new(0.0, 0.0, 300.0, 300.0), block(100.0, 40.0)).len(), 1);
    }

    #[test]
    fn paint_pushes_shadow_then_text() {
        use vizkit_engine::scene::{DrawCmd, DrawList};

        let mut book = FontBook::new();
        let Some(bytes) = candidate_paths(FontKey::default()).find_map(|p| std::fs::read(p).ok()) else {
            eprintln!("no system font installed; skipping");
            return;
        };
        book.register(FontKey::default(), &bytes).unwrap();

        let actor = shadowed([4, 4]);
        let viewport = Rect::new(0.0, 0.0, 300.0, 300.0);
        let mut list = DrawList::new();
        actor.paint(&mut Painter::new(&mut list, &mut book), viewport);

        let texts: Vec<_> = list
            .iter_in_paint_order()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Text(t) => Some(t.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(texts.len(), 2);
        let extent = book.system().measure_text("Hello World!", texts[1].font, 12.0, None);
        let expected = actor.runs(viewport, extent);
        assert_eq!((texts[0].origin, texts[0].color), expected[0]);
        assert_eq!((texts[1].origin, texts[1].color), expected[1]);
        assert_eq!(texts[0].origin - texts[1].origin, Vec2::new(4.0, -4.0));
        assert!(texts.iter().all(|t| t.text == "Hello World!" && t.size == 12.0));
    }

    #[test]
    fn bold_arial_prefers_liberation_bold() {
        let key = FontKey { family: FontFamily::Arial, bold: true, italic: false };
        let files = candidate_files(key);
        assert_eq!(files[0], "LiberationSans-Bold.ttf");
        assert!(files.iter().any(|f| f == "DejaVuSans-Bold.ttf"));
    }

    #[test]
    fn registered_bytes_must_parse() {
        let mut book = FontBook::new();
        assert!(book.register(FontKey::default(), b"nope").is_err());
        assert!(book.system().is_empty());
    }
}
