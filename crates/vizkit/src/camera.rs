//! Virtual camera.
//!
//! World → display mapping: the camera basis (right, up, forward) turns a
//! world point into view coordinates, which are scaled by the vertical view
//! angle (perspective) or the parallel scale, then mapped into the renderer's
//! viewport rectangle in logical pixels with the origin at the top-left.

use vizkit_engine::coords::{Rect, Vec2};

use crate::math::{Bounds, Vec3};

/// A world point mapped into a viewport.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projected {
    /// Logical pixels, top-left origin.
    pub pos: Vec2,
    /// Distance along the direction of projection from the camera position.
    pub depth: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    focal_point: Vec3,
    view_up: Vec3,
    /// Vertical view angle in degrees.
    view_angle: f64,
    parallel_projection: bool,
    parallel_scale: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            focal_point: Vec3::ZERO,
            view_up: Vec3::new(0.0, 1.0, 0.0),
            view_angle: 30.0,
            parallel_projection: false,
            parallel_scale: 1.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, p: impl Into<Vec3>) {
        self.position = p.into();
    }

    pub fn focal_point(&self) -> Vec3 {
        self.focal_point
    }

    pub fn set_focal_point(&mut self, p: impl Into<Vec3>) {
        self.focal_point = p.into();
    }

    pub fn view_up(&self) -> Vec3 {
        self.view_up
    }

    /// Sets the view-up vector. Zero vectors are ignored.
    pub fn set_view_up(&mut self, up: impl Into<Vec3>) {
        let up = up.into().normalized_or_zero();
        if up != Vec3::ZERO {
            self.view_up = up;
        }
    }

    pub fn view_angle(&self) -> f64 {
        self.view_angle
    }

    pub fn set_view_angle(&mut self, degrees: f64) {
        self.view_angle = degrees.clamp(0.00000001, 179.0);
    }

    pub fn parallel_projection(&self) -> bool {
        self.parallel_projection
    }

    pub fn set_parallel_projection(&mut self, on: bool) {
        self.parallel_projection = on;
    }

    pub fn parallel_scale(&self) -> f64 {
        self.parallel_scale
    }

    pub fn set_parallel_scale(&mut self, scale: f64) {
        self.parallel_scale = scale;
    }

    pub fn distance(&self) -> f64 {
        (self.focal_point - self.position).length()
    }

    /// Unit vector from the position towards the focal point.
    pub fn direction_of_projection(&self) -> Vec3 {
        (self.focal_point - self.position).normalized_or_zero()
    }

    /// Right, up and forward unit vectors.
    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = self.direction_of_projection();
        let mut right = forward.cross(self.view_up).normalized_or_zero();
        if right == Vec3::ZERO {
            right = forward.cross(any_perpendicular(forward)).normalized_or_zero();
        }
        let up = right.cross(forward);
        (right, up, forward)
    }

    /// Rotates the position about the view-up vector centred at the focal point.
    pub fn azimuth(&mut self, degrees: f64) {
        let axis = self.view_up.normalized_or_zero();
        let offset = self.position - self.focal_point;
        self.position = self.focal_point + offset.rotated_about(axis, degrees.to_radians());
    }

    /// Rotates the position about the horizontal axis through the focal point.
    ///
    /// Positive angles move the camera up. View-up is left untouched; call
    /// [`Camera::orthogonalize_view_up`] afterwards.
    pub fn elevation(&mut self, degrees: f64) {
        let axis = (-self.direction_of_projection()).cross(self.view_up).normalized_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        let offset = self.position - self.focal_point;
        self.position = self.focal_point + offset.rotated_about(axis, degrees.to_radians());
    }

    /// Makes view-up perpendicular to the direction of projection.
    pub fn orthogonalize_view_up(&mut self) {
        let (_, up, _) = self.basis();
        if up != Vec3::ZERO {
            self.view_up = up;
        }
    }

    /// Moves the camera towards the focal point by `factor` (> 1 moves closer).
    ///
    /// With parallel projection the parallel scale shrinks instead.
    pub fn dolly(&mut self, factor: f64) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        if self.parallel_projection {
            self.parallel_scale /= factor;
            return;
        }
        let d = self.distance() / factor;
        self.position = self.focal_point - self.direction_of_projection() * d;
    }

    /// Narrows the view angle (or the parallel scale) by `factor`.
    pub fn zoom(&mut self, factor: f64) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        if self.parallel_projection {
            self.parallel_scale /= factor;
        } else {
            self.set_view_angle(self.view_angle / factor);
        }
    }

    /// Translates position and focal point together.
    pub fn pan(&mut self, world_delta: Vec3) {
        self.position += world_delta;
        self.focal_point += world_delta;
    }

    /// Points the camera at `bounds` so the whole box is visible.
    pub fn reset(&mut self, bounds: &Bounds) {
        let center = bounds.center();
        let mut radius = bounds.diagonal_length() * 0.5;
        if radius <= 0.0 || !radius.is_finite() {
            radius = 0.5;
        }

        let mut normal = -self.direction_of_projection();
        if normal == Vec3::ZERO {
            normal = Vec3::new(0.0, 0.0, 1.0);
        }
        if normal.cross(self.view_up).length() < 1e-9 {
            self.view_up = any_perpendicular(normal);
        }

        let distance = radius / (self.view_angle.to_radians() * 0.5).sin();
        self.focal_point = center;
        self.position = center + normal * distance;
        self.parallel_scale = radius;
        log::debug!("camera reset: center {center:?}, distance {distance:.3}");
    }

    /// Half the visible height at depth `zc`, in world units.
    fn half_height(&self, zc: f64) -> f64 {
        if self.parallel_projection {
            self.parallel_scale
        } else {
            zc * (self.view_angle.to_radians() * 0.5).tan()
        }
    }

    /// Projects `p` into `viewport`. Points behind a perspective camera give `None`.
    pub fn world_to_display(&self, p: Vec3, viewport: Rect) -> Option<Projected> {
        let (right, up, forward) = self.basis();
        let v = p - self.position;
        let (xc, yc, zc) = (v.dot(right), v.dot(up), v.dot(forward));
        if !self.parallel_projection && zc <= self.distance().max(1e-6) * 1e-4 {
            return None;
        }

        let aspect = aspect(viewport);
        let hh = self.half_height(zc);
        if hh <= 0.0 {
            return None;
        }
        let ndc_x = xc / (hh * aspect);
        let ndc_y = yc / hh;

        let x = f64::from(viewport.origin.x) + (ndc_x + 1.0) * 0.5 * f64::from(viewport.size.x);
        let y = f64::from(viewport.origin.y) + (1.0 - ndc_y) * 0.5 * f64::from(viewport.size.y);
        Some(Projected { pos: Vec2::new(x as f32, y as f32), depth: zc })
    }

    /// Inverse of [`Camera::world_to_display`] at the given `depth`.
    pub fn display_to_world(&self, pos: Vec2, depth: f64, viewport: Rect) -> Vec3 {
        let (right, up, forward) = self.basis();
        let w = f64::from(viewport.size.x).max(1.0);
        let h = f64::from(viewport.size.y).max(1.0);
        let ndc_x = (f64::from(pos.x) - f64::from(viewport.origin.x)) / w * 2.0 - 1.0;
        let ndc_y = 1.0 - (f64::from(pos.y) - f64::from(viewport.origin.y)) / h * 2.0;

        let hh = self.half_height(depth);
        let xc = ndc_x * hh * aspect(viewport);
        let yc = ndc_y * hh;
        self.position + forward * depth + right * xc + up * yc
    }

    /// Depth of `p` along the direction of projection.
    pub fn depth_of(&self, p: Vec3) -> f64 {
        (p - self.position).dot(self.direction_of_projection())
    }
}

fn aspect(viewport: Rect) -> f64 {
    if viewport.size.y > 0.0 {
        f64::from(viewport.size.x) / f64::from(viewport.size.y)
    } else {
        1.0
    }
}

fn any_perpendicular(v: Vec3) -> Vec3 {
    let candidate = if v.x.abs() < 0.9 { Vec3::new(1.0, 0.0, 0.0) } else { Vec3::new(0.0, 1.0, 0.0) };
    v.cross(candidate).normalized_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Rect = Rect::new(0.0, 0.0, 300.0, 300.0);

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn focal_point_projects_to_viewport_center() {
        let cam = Camera::new();
        let p = cam.world_to_display(Vec3::ZERO, VP).unwrap();
        assert!((p.pos.x - 150.0).abs() < 1e-3);
        assert!((p.pos.y - 150.0).abs() < 1e-3);
        assert!(close(p.depth, 1.0));
    }

    #[test]
    fn world_up_is_display_up() {
        let cam = Camera::new();
        let p = cam.world_to_display(Vec3::new(0.0, 0.1, 0.0), VP).unwrap();
        assert!(p.pos.y < 150.0);
    }

    #[test]
    fn points_behind_camera_are_culled() {
        let cam = Camera::new();
        assert!(cam.world_to_display(Vec3::new(0.0, 0.0, 2.0), VP).is_none());
    }

    #[test]
    fn display_to_world_inverts_projection() {
        let mut cam = Camera::new();
        cam.azimuth(30.0);
        cam.elevation(20.0);
        cam.orthogonalize_view_up();
        let vp = Rect::new(10.0, 20.0, 400.0, 200.0);
        let p = Vec3::new(0.1, -0.2, 0.05);
        let proj = cam.world_to_display(p, vp).unwrap();
        let back = cam.display_to_world(proj.pos, proj.depth, vp);
        assert!((back - p).length() < 1e-5);
    }

    #[test]
    fn parallel_projection_uses_parallel_scale() {
        let mut cam = Camera::new();
        cam.set_parallel_projection(true);
        cam.set_parallel_scale(2.0);
        let p = cam.world_to_display(Vec3::new(0.0, 2.0, 0.0), VP).unwrap();
        assert!(p.pos.y.abs() < 1e-3);
    }

    #[test]
    fn reset_frames_bounds() {
        let mut cam = Camera::new();
        let b = Bounds::new(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
        cam.reset(&b);
        let radius = 3f64.sqrt();
        assert_eq!(cam.focal_point(), Vec3::ZERO);
        assert!(close(cam.distance(), radius / 15f64.to_radians().sin()));
        assert!(close(cam.parallel_scale(), radius));
        assert!(close(cam.position().z, cam.distance()));
    }

    #[test]
    fn degenerate_bounds_use_half_unit_radius() {
        let mut cam = Camera::new();
        let mut b = Bounds::empty();
        b.add_point(Vec3::new(1.0, 1.0, 1.0));
        cam.reset(&b);
        assert!(close(cam.parallel_scale(), 0.5));
        assert_eq!(cam.focal_point(), Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn azimuth_keeps_distance_and_moves_sideways() {
        let mut cam = Camera::new();
        cam.azimuth(90.0);
        assert!(close(cam.distance(), 1.0));
        assert!(close(cam.position().x, 1.0));
    }

    #[test]
    fn positive_elevation_moves_camera_up() {
        let mut cam = Camera::new();
        cam.elevation(45.0);
        cam.orthogonalize_view_up();
        assert!(cam.position().y > 0.0);
        assert!(close(cam.view_up().dot(cam.direction_of_projection()), 0.0));
    }

    #[test]
    fn dolly_moves_towards_focal_point() {
        let mut cam = Camera::new();
        cam.dolly(2.0);
        assert!(close(cam.distance(), 0.5));

        cam.set_parallel_projection(true);
        cam.dolly(2.0);
        assert!(close(cam.parallel_scale(), 0.5));
    }

    #[test]
    fn pan_moves_both_points() {
        let mut cam = Camera::new();
        cam.pan(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(cam.position(), Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(cam.focal_point(), Vec3::new(1.0, 0.0, 0.0));
    }
}
