//! vizkit engine crate.
//!
//! Platform loop, GPU device and 2D draw-stream renderers used by the
//! `vizkit` toolkit. Nothing in here knows about cameras, actors or widgets;
//! the toolkit projects its scene into a [`scene::DrawList`] every frame.

pub mod device;
pub mod window;
pub mod input;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;
pub mod text;
