//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! `platform::winit` translates window system events into [`InputEvent`]s.

mod frame;
mod state;
mod types;

pub(crate) mod platform;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseWheelDelta,
    PointerButtonEvent,
    PointerMoveEvent,
};
