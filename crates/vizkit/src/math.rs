use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// 3D vector / point in world coordinates.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector, or zero when the length is zero or not finite.
    pub fn normalized_or_zero(self) -> Vec3 {
        let len = self.length();
        if len > 0.0 && len.is_finite() { self * (1.0 / len) } else { Vec3::ZERO }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Rotates `self` by `angle` radians about the unit `axis` (Rodrigues).
    pub fn rotated_about(self, axis: Vec3, angle: f64) -> Vec3 {
        let (s, c) = angle.sin_cos();
        self * c + axis.cross(self) * s + axis * (axis.dot(self) * (1.0 - c))
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Vec3::new(x, y, z)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Axis-aligned bounding box `[xmin, xmax, ymin, ymax, zmin, zmax]`.
///
/// A fresh box is empty (min > max) until a point is added.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds(pub [f64; 6]);

impl Bounds {
    pub const fn empty() -> Self {
        Bounds([f64::MAX, f64::MIN, f64::MAX, f64::MIN, f64::MAX, f64::MIN])
    }

    pub const fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64, zmin: f64, zmax: f64) -> Self {
        Bounds([xmin, xmax, ymin, ymax, zmin, zmax])
    }

    pub fn is_empty(&self) -> bool {
        let b = &self.0;
        b[0] > b[1] || b[2] > b[3] || b[4] > b[5]
    }

    pub fn add_point(&mut self, p: Vec3) {
        let b = &mut self.0;
        b[0] = b[0].min(p.x);
        b[1] = b[1].max(p.x);
        b[2] = b[2].min(p.y);
        b[3] = b[3].max(p.y);
        b[4] = b[4].min(p.z);
        b[5] = b[5].max(p.z);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        let (a, b) = (&self.0, &other.0);
        Bounds([
            a[0].min(b[0]),
            a[1].max(b[1]),
            a[2].min(b[2]),
            a[3].max(b[3]),
            a[4].min(b[4]),
            a[5].max(b[5]),
        ])
    }

    pub fn center(&self) -> Vec3 {
        let b = &self.0;
        Vec3::new((b[0] + b[1]) * 0.5, (b[2] + b[3]) * 0.5, (b[4] + b[5]) * 0.5)
    }

    pub fn diagonal_length(&self) -> f64 {
        let b = &self.0;
        Vec3::new(b[1] - b[0], b[3] - b[2], b[5] - b[4]).length()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn rotation_about_z() {
        let z = Vec3::new(0.0, 0.0, 1.0);
        let r = Vec3::new(1.0, 0.0, 0.0).rotated_about(z, std::f64::consts::FRAC_PI_2);
        assert!(close(r, Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn zero_vector_normalizes_to_zero() {
        assert_eq!(Vec3::ZERO.normalized_or_zero(), Vec3::ZERO);
    }

    #[test]
    fn bounds_grow_with_points() {
        let mut b = Bounds::empty();
        assert!(b.is_empty());
        b.add_point(Vec3::new(-1.0, 2.0, 0.0));
        b.add_point(Vec3::new(1.0, 4.0, 2.0));
        assert!(!b.is_empty());
        assert_eq!(b.0, [-1.0, 1.0, 2.0, 4.0, 0.0, 2.0]);
        assert!(close(b.center(), Vec3::new(0.0, 3.0, 1.0)));
    }

    #[test]
    fn union_ignores_empty_side() {
        let a = Bounds::new(0.0, 1.0, 0.0, 1.0, 0.0, 1.0);
        assert_eq!(a.union(&Bounds::empty()), a);
        assert_eq!(Bounds::empty().union(&a), a);
    }
}
