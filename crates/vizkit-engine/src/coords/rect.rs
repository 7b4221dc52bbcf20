use super::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
///
/// Used for renderer viewports and scissor regions.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { origin: Vec2::new(x, y), size: Vec2::new(w, h) }
    }

    #[inline]
    pub fn right(self) -> f32 {
        self.origin.x + self.size.x
    }

    #[inline]
    pub fn bottom(self) -> f32 {
        self.origin.y + self.size.y
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Same rectangle with non-negative width and height.
    pub fn normalized(self) -> Self {
        let (x, w) = if self.size.x < 0.0 { (self.origin.x + self.size.x, -self.size.x) } else { (self.origin.x, self.size.x) };
        let (y, h) = if self.size.y < 0.0 { (self.origin.y + self.size.y, -self.size.y) } else { (self.origin.y, self.size.y) };
        Rect::new(x, y, w, h)
    }

    /// Half-open containment, so adjacent viewports never both claim a pixel.
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        (r.origin.x..r.right()).contains(&p.x) && (r.origin.y..r.bottom()).contains(&p.y)
    }

    /// Overlap of two rectangles; `None` when they only touch or are disjoint.
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let (a, b) = (self.normalized(), other.normalized());
        let x0 = a.origin.x.max(b.origin.x);
        let y0 = a.origin.y.max(b.origin.y);
        let x1 = a.right().min(b.right());
        let y1 = a.bottom().min(b.bottom());
        (x1 > x0 && y1 > y0).then(|| Rect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_flips_negative_extents() {
        assert_eq!(Rect::new(10.0, 10.0, -4.0, -3.0).normalized(), Rect::new(6.0, 7.0, 4.0, 3.0));
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(r.normalized(), r);
    }

    #[test]
    fn adjacent_viewports_split_the_shared_edge() {
        let left = Rect::new(0.0, 0.0, 320.0, 240.0);
        let right = Rect::new(320.0, 0.0, 320.0, 240.0);
        let edge = Vec2::new(320.0, 100.0);
        assert!(!left.contains(edge));
        assert!(right.contains(edge));
        assert!(left.contains(Vec2::new(0.0, 0.0)));
        assert!(!left.contains(Vec2::new(-1.0, 5.0)));
    }

    #[test]
    fn intersect_overlap_touch_and_disjoint() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersect(Rect::new(5.0, 5.0, 10.0, 10.0)), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
        assert_eq!(a.intersect(Rect::new(10.0, 0.0, 10.0, 10.0)), None);
        assert_eq!(a.intersect(Rect::new(20.0, 20.0, 5.0, 5.0)), None);
    }

    #[test]
    fn right_bottom_and_emptiness() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!((r.right(), r.bottom()), (40.0, 60.0));
        assert!(!r.is_empty());
        assert!(Rect::new(0.0, 0.0, 0.0, 5.0).is_empty());
    }
}
