use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VizError>;

#[derive(Error, Debug)]
pub enum VizError {
    #[error("unknown color name: {0}")]
    UnknownColor(String),

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {path} as {format}")]
    UnsupportedFile { path: PathBuf, format: &'static str },

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("index {index} out of range (len {len})")]
    OutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Font(#[from] vizkit_engine::text::FontLoadError),

    /// Window or GPU initialization failed, or the event loop errored.
    #[error("runtime error: {0:#}")]
    Runtime(anyhow::Error),
}
