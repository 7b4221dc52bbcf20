use super::{Rect, Vec2};

/// Viewport size in logical pixels.
///
/// Renderers treat this as the coordinate basis for converting logical px
/// positions to NDC in shaders.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Converts between a y-up (bottom-left origin) point and top-left origin.
    ///
    /// The mapping is its own inverse.
    #[inline]
    pub fn flip_y(self, p: Vec2) -> Vec2 {
        Vec2::new(p.x, self.height - p.y)
    }

    /// Maps a normalized `[xmin, ymin, xmax, ymax]` box (y-up, 0..1) onto a
    /// top-left origin rect in logical pixels.
    pub fn normalized_rect(self, bounds: [f32; 4]) -> Rect {
        let [x0, y0, x1, y1] = bounds;
        let left = x0 * self.width;
        let right = x1 * self.width;
        let top = (1.0 - y1) * self.height;
        let bottom = (1.0 - y0) * self.height;
        Rect::new(left, top, right - left, bottom - top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_y_is_involution() {
        let vp = Viewport::new(300.0, 200.0);
        let p = Vec2::new(10.0, 30.0);
        assert_eq!(vp.flip_y(p), Vec2::new(10.0, 170.0));
        assert_eq!(vp.flip_y(vp.flip_y(p)), p);
    }

    #[test]
    fn normalized_rect_maps_upper_half() {
        let vp = Viewport::new(640.0, 240.0);
        let r = vp.normalized_rect([0.5, 0.5, 1.0, 1.0]);
        assert_eq!(r, Rect::new(320.0, 0.0, 320.0, 120.0));
    }

    #[test]
    fn normalized_rect_full_viewport() {
        let vp = Viewport::new(300.0, 300.0);
        assert_eq!(vp.normalized_rect([0.0, 0.0, 1.0, 1.0]), Rect::new(0.0, 0.0, 300.0, 300.0));
    }
}
