//! Triangle/line geometry and the parametric sources that produce it.

use std::f64::consts::PI;

use crate::math::{Bounds, Vec3};

/// Points plus triangle and line cells indexing into them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyData {
    pub points: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
    pub lines: Vec<[u32; 2]>,
}

impl PolyData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds::empty();
        for p in &self.points {
            b.add_point(*p);
        }
        b
    }

    /// Unnormalized face normal of triangle `t`.
    pub fn face_normal(&self, t: [u32; 3]) -> Vec3 {
        let [a, b, c] = t.map(|i| self.points[i as usize]);
        (b - a).cross(c - a)
    }

    /// Area-weighted vertex normals. Points not used by any triangle get zero.
    pub fn point_normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.points.len()];
        for &t in &self.triangles {
            if t.iter().any(|&i| i as usize >= self.points.len()) {
                continue;
            }
            let n = self.face_normal(t);
            for i in t {
                normals[i as usize] += n;
            }
        }
        normals.into_iter().map(Vec3::normalized_or_zero).collect()
    }

    /// Unique undirected edges of all triangles followed by the line cells.
    pub fn edges(&self) -> Vec<[u32; 2]> {
        let mut edges: Vec<[u32; 2]> = self
            .triangles
            .iter()
            .flat_map(|&[a, b, c]| [[a, b], [b, c], [c, a]])
            .map(|[a, b]| if a < b { [a, b] } else { [b, a] })
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges.extend(self.lines.iter().copied());
        edges
    }

    fn push_triangle_if_valid(&mut self, t: [u32; 3]) {
        if self.face_normal(t).length() > 1e-12 {
            self.triangles.push(t);
        }
    }
}

/// Latitude/longitude sphere with its poles on the z axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereSource {
    pub center: Vec3,
    pub radius: f64,
    /// Points around each latitude circle.
    pub theta_resolution: u32,
    /// Latitude circles from pole to pole, poles included.
    pub phi_resolution: u32,
}

impl Default for SphereSource {
    fn default() -> Self {
        Self { center: Vec3::ZERO, radius: 0.5, theta_resolution: 8, phi_resolution: 8 }
    }
}

impl SphereSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> PolyData {
        let theta_res = self.theta_resolution.max(3);
        let phi_res = self.phi_resolution.max(3);
        let rings = phi_res - 2;
        let r = self.radius;
        let c = self.center;

        let mut pd = PolyData::new();
        pd.points.push(c + Vec3::new(0.0, 0.0, r));
        pd.points.push(c + Vec3::new(0.0, 0.0, -r));

        let d_phi = PI / f64::from(phi_res - 1);
        let d_theta = 2.0 * PI / f64::from(theta_res);
        for i in 0..theta_res {
            let theta = f64::from(i) * d_theta;
            for j in 1..=rings {
                let phi = f64::from(j) * d_phi;
                pd.points.push(
                    c + Vec3::new(r * phi.sin() * theta.cos(), r * phi.sin() * theta.sin(), r * phi.cos()),
                );
            }
        }

        let idx = |i: u32, j: u32| 2 + (i % theta_res) * rings + j;
        let (north, south) = (0, 1);
        for i in 0..theta_res {
            pd.triangles.push([north, idx(i, 0), idx(i + 1, 0)]);
            for j in 0..rings - 1 {
                let (a, b) = (idx(i, j), idx(i + 1, j));
                let (c, d) = (idx(i + 1, j + 1), idx(i, j + 1));
                pd.triangles.push([d, c, b]);
                pd.triangles.push([d, b, a]);
            }
            pd.triangles.push([idx(i, rings - 1), south, idx(i + 1, rings - 1)]);
        }
        pd
    }
}

/// Superquadric (superellipsoid) surface.
///
/// Roundness 1 gives an ellipsoid; values towards 0 square the shape off,
/// values above 1 pinch it.
#[derive(Debug, Clone, PartialEq)]
pub struct SuperquadricSource {
    pub center: Vec3,
    pub scale: Vec3,
    pub size: f64,
    pub theta_resolution: u32,
    pub phi_resolution: u32,
    pub theta_roundness: f64,
    pub phi_roundness: f64,
}

impl Default for SuperquadricSource {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            scale: Vec3::new(1.0, 1.0, 1.0),
            size: 0.5,
            theta_resolution: 16,
            phi_resolution: 16,
            theta_roundness: 1.0,
            phi_roundness: 1.0,
        }
    }
}

const MIN_ROUNDNESS: f64 = 0.01;

impl SuperquadricSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_theta_roundness(&mut self, e: f64) {
        self.theta_roundness = e.max(MIN_ROUNDNESS);
    }

    pub fn set_phi_roundness(&mut self, e: f64) {
        self.phi_roundness = e.max(MIN_ROUNDNESS);
    }

    pub fn output(&self) -> PolyData {
        let theta_res = self.theta_resolution.max(4);
        let phi_res = self.phi_resolution.max(2);
        let te = self.theta_roundness.max(MIN_ROUNDNESS);
        let pe = self.phi_roundness.max(MIN_ROUNDNESS);
        let dims = self.scale * self.size;

        let mut pd = PolyData::new();
        for i in 0..=phi_res {
            let phi = -PI / 2.0 + PI * f64::from(i) / f64::from(phi_res);
            let (cp, sp) = (signed_pow(phi.cos(), pe), signed_pow(phi.sin(), pe));
            for j in 0..theta_res {
                let theta = -PI + 2.0 * PI * f64::from(j) / f64::from(theta_res);
                let (ct, st) = (signed_pow(theta.cos(), te), signed_pow(theta.sin(), te));
                pd.points.push(self.center + Vec3::new(dims.x * cp * ct, dims.y * cp * st, dims.z * sp));
            }
        }

        let idx = |i: u32, j: u32| i * theta_res + (j % theta_res);
        for i in 0..phi_res {
            for j in 0..theta_res {
                let (a, b) = (idx(i, j), idx(i, j + 1));
                let (c, d) = (idx(i + 1, j + 1), idx(i + 1, j));
                pd.push_triangle_if_valid([a, b, c]);
                pd.push_triangle_if_valid([a, c, d]);
            }
        }
        pd
    }
}

/// `sign(v) * |v|^e`, with tiny magnitudes snapped to zero.
fn signed_pow(v: f64, e: f64) -> f64 {
    if v.abs() < 1e-12 { 0.0 } else { v.signum() * v.abs().powf(e) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_counts_match_resolution() {
        let pd = SphereSource::new().output();
        // 2 poles + 8 columns of 6 rings.
        assert_eq!(pd.points.len(), 2 + 8 * 6);
        // 2 caps of 8 + 5 bands of 16.
        assert_eq!(pd.triangles.len(), 16 + 5 * 16);
    }

    #[test]
    fn sphere_points_lie_on_the_surface() {
        let src = SphereSource { center: Vec3::new(1.0, 2.0, 3.0), radius: 2.0, ..Default::default() };
        for p in src.output().points {
            assert!(((p - src.center).length() - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn sphere_normals_point_outwards() {
        let pd = SphereSource::new().output();
        let normals = pd.point_normals();
        for (p, n) in pd.points.iter().zip(&normals) {
            assert!(p.dot(*n) > 0.0);
        }
    }

    #[test]
    fn sphere_bounds_enclose_radius() {
        let b = SphereSource::new().output().bounds();
        assert!((b.0[4] + 0.5).abs() < 1e-9);
        assert!((b.0[5] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn edges_are_unique() {
        let pd = PolyData {
            points: vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 0.0)],
            triangles: vec![[0, 1, 2], [1, 3, 2]],
            lines: vec![],
        };
        assert_eq!(pd.edges().len(), 5);
    }

    #[test]
    fn superquadric_with_unit_roundness_is_a_sphere() {
        let pd = SuperquadricSource::new().output();
        for p in &pd.points {
            assert!((p.length() - 0.5).abs() < 1e-9);
        }
        assert!(!pd.triangles.is_empty());
    }

    #[test]
    fn square_superquadric_reaches_the_corners() {
        let mut src = SuperquadricSource::new();
        src.set_theta_roundness(0.2);
        let b = src.output().bounds();
        assert!((b.0[1] - 0.5).abs() < 1e-6);
        assert!((b.0[3] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn roundness_is_clamped() {
        let mut src = SuperquadricSource::new();
        src.set_phi_roundness(-3.0);
        assert_eq!(src.phi_roundness, MIN_ROUNDNESS);
    }

    #[test]
    fn signed_pow_keeps_sign() {
        assert!((signed_pow(-0.25, 0.5) + 0.5).abs() < 1e-12);
        assert_eq!(signed_pow(0.0, 0.2), 0.0);
    }
}
