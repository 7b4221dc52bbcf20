//! Core engine-facing contracts.
//!
//! The stable interface between the runtime (platform loop) and the toolkit
//! layer. Runtime internals stay behind [`FrameCtx`].

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
