//! Color model shared between the scene and renderers.
//!
//! Geometry types remain in `coords`.

pub mod color;

pub use color::{linear_to_srgb, srgb_to_linear, Color};
