//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands
//! - provide deterministic ordering (z-index + insertion order)
//! - keep shape-specific helpers isolated per shape file under `scene::shapes`
//!
//! Ordering holds within one command kind. Across kinds the frame is
//! composed in a fixed pass order: rect, image, mesh, line, circle, text.

mod cmd;
mod key;
mod list;

pub mod shapes;

pub use cmd::DrawCmd;
pub use key::{SortKey, ZIndex};
pub use list::{DrawItem, DrawList};
pub use shapes::{
    Border,
    CircleCmd,
    ImageCmd,
    ImageHandle,
    LineCmd,
    MeshCmd,
    MeshVertex,
    RectCmd,
    TextCmd,
};
