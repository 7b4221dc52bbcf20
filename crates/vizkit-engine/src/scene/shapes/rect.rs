use crate::coords::Rect;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Solid rectangle draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub color: Color,
}

impl DrawList {
    /// Records a solid rectangle draw command.
    #[inline]
    pub fn push_rect(&mut self, z: ZIndex, rect: Rect, color: Color) {
        self.push(z, DrawCmd::Rect(RectCmd { rect, color }));
    }
}
