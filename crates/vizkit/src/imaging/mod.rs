//! Raster images: data, a drawing canvas, file IO and the image actor.

mod actor;
mod canvas;
mod data;

pub mod bmp;
pub mod jpeg;

pub use actor::ImageActor;
pub use canvas::ImageCanvasSource2D;
pub use data::ImageData;
