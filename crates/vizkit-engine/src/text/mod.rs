//! Font loading and text measurement.
//!
//! Glyph rasterization and atlas management live in
//! `render::shapes::text`; this module only owns parsed fonts.

mod font_system;

pub use font_system::{FontId, FontLoadError, FontSystem, TextExtent};
