use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

use super::Border;

/// Circle draw payload. Also used for round point sprites and markers.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleCmd {
    pub center: Vec2,
    pub radius: f32,
    pub fill: Color,
    pub border: Option<Border>,
}

impl DrawList {
    /// Records a circle draw command.
    #[inline]
    pub fn push_circle(
        &mut self,
        z: ZIndex,
        center: Vec2,
        radius: f32,
        fill: Color,
        border: Option<Border>,
    ) {
        self.push(z, DrawCmd::Circle(CircleCmd { center, radius, fill, border }));
    }
}
