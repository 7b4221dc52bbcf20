use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Straight line segment with butt caps, in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCmd {
    pub p0: Vec2,
    pub p1: Vec2,
    pub width: f32,
    pub color: Color,
}

impl DrawList {
    /// Records a line segment. Zero-length segments are dropped.
    #[inline]
    pub fn push_line(&mut self, z: ZIndex, p0: Vec2, p1: Vec2, width: f32, color: Color) {
        if p0 == p1 || width <= 0.0 {
            return;
        }
        self.push(z, DrawCmd::Line(LineCmd { p0, p1, width, color }));
    }

    /// Records a connected polyline as individual segments.
    pub fn push_polyline(&mut self, z: ZIndex, points: &[Vec2], width: f32, color: Color) {
        for pair in points.windows(2) {
            self.push_line(z, pair[0], pair[1], width, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polyline_emits_one_segment_per_pair() {
        let mut dl = DrawList::new();
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)];
        dl.push_polyline(ZIndex::new(0), &pts, 1.0, Color::WHITE);
        // The duplicated middle point produces a zero-length segment that is dropped.
        assert_eq!(dl.items().len(), 2);
    }
}
