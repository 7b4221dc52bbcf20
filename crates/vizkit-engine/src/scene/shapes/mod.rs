pub(crate) mod circle;
pub(crate) mod image;
pub(crate) mod line;
pub(crate) mod mesh;
pub(crate) mod rect;
pub(crate) mod text;

pub use circle::CircleCmd;
pub use image::{ImageCmd, ImageHandle};
pub use line::LineCmd;
pub use mesh::{MeshCmd, MeshVertex};
pub use rect::RectCmd;
pub use text::TextCmd;

use crate::paint::Color;

/// Stroke drawn along the outer edge of a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
}

impl Border {
    #[inline]
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}
