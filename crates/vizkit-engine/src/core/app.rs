use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`crate::window::Runtime`].
///
/// Input is folded into `FrameCtx::input_frame` before each frame; there is
/// no separate per-event callback.
pub trait App {
    /// Called once per redraw of the window.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once after the window closed, before `Runtime::run` returns.
    fn on_exit(&mut self) {}
}
