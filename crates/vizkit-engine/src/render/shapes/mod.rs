//! Shape renderers, one per `DrawCmd` kind.

mod batch;
mod common;

pub mod circle;
pub mod image;
pub mod line;
pub mod mesh;
pub mod rect;
pub mod text;

pub use circle::CircleRenderer;
pub use image::ImageRenderer;
pub use line::LineRenderer;
pub use mesh::MeshRenderer;
pub use rect::RectRenderer;
pub use text::TextRenderer;
