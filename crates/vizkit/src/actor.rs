//! Geometry actors and their surface properties.

use vizkit_engine::coords::{Rect, Vec2};
use vizkit_engine::paint::Color;
use vizkit_engine::scene::MeshVertex;

use crate::camera::{Camera, Projected};
use crate::colors::Rgb;
use crate::math::{Bounds, Vec3};
use crate::painter::DepthSortedMesh;
use crate::polydata::PolyData;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Representation {
    Points,
    Wireframe,
    Surface,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Interpolation {
    /// One shade per triangle.
    Flat,
    /// Shade per vertex, blended across the triangle.
    Gouraud,
}

/// Surface appearance of an [`Actor`].
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub color: Rgb,
    pub opacity: f64,
    pub representation: Representation,
    pub interpolation: Interpolation,
    pub ambient: f64,
    pub diffuse: f64,
    /// Logical pixels.
    pub line_width: f32,
    /// Logical pixels.
    pub point_size: f32,
}

impl Default for Property {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            representation: Representation::Surface,
            interpolation: Interpolation::Gouraud,
            ambient: 0.0,
            diffuse: 1.0,
            line_width: 1.0,
            point_size: 1.0,
        }
    }
}

impl Property {
    /// Two-sided Lambert term for a headlight along `light`.
    pub fn intensity(&self, normal: Vec3, light: Vec3) -> f64 {
        (self.ambient + self.diffuse * normal.dot(light).abs()).clamp(0.0, 1.0)
    }

    /// Lit color as linear premultiplied RGBA.
    fn shade(&self, intensity: f64) -> [f32; 4] {
        let [r, g, b] = self.color.map(|c| (c * intensity) as f32);
        Color::from_srgb(r, g, b, self.opacity.clamp(0.0, 1.0) as f32).to_array()
    }

    /// Color used for lines and points, which carry no normal.
    fn unlit(&self) -> [f32; 4] {
        self.shade((self.ambient + self.diffuse).clamp(0.0, 1.0))
    }
}

/// Poly data placed in a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub poly_data: PolyData,
    pub property: Property,
    /// World-space translation applied to every point.
    pub position: Vec3,
    pub visibility: bool,
}

impl Actor {
    pub fn new(poly_data: PolyData) -> Self {
        Self { poly_data, property: Property::default(), position: Vec3::ZERO, visibility: true }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.property = property;
        self
    }

    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds::empty();
        for p in &self.poly_data.points {
            b.add_point(*p + self.position);
        }
        b
    }

    /// Projects this actor's primitives into `out`.
    pub(crate) fn project(&self, camera: &Camera, viewport: Rect, out: &mut DepthSortedMesh) {
        if !self.visibility || self.poly_data.is_empty() {
            return;
        }
        let pd = &self.poly_data;
        let prop = &self.property;
        let projected: Vec<Option<Projected>> = pd
            .points
            .iter()
            .map(|p| camera.world_to_display(*p + self.position, viewport))
            .collect();
        let at = |i: u32| projected.get(i as usize).copied().flatten();

        match prop.representation {
            Representation::Surface => {
                let light = -camera.direction_of_projection();
                let normals = match prop.interpolation {
                    Interpolation::Gouraud => Some(pd.point_normals()),
                    Interpolation::Flat => None,
                };
                for &t in &pd.triangles {
                    let (Some(a), Some(b), Some(c)) = (at(t[0]), at(t[1]), at(t[2])) else {
                        continue;
                    };
                    let colors = match &normals {
                        Some(n) => t.map(|i| prop.shade(prop.intensity(n[i as usize], light))),
                        None => {
                            let n = pd.face_normal(t).normalized_or_zero();
                            [prop.shade(prop.intensity(n, light)); 3]
                        }
                    };
                    let depth = (a.depth + b.depth + c.depth) / 3.0;
                    out.push_triangle(
                        [vertex(a.pos, colors[0]), vertex(b.pos, colors[1]), vertex(c.pos, colors[2])],
                        depth,
                    );
                }
                // Line cells have no surface to fill.
                let color = prop.unlit();
                for &[i, j] in &pd.lines {
                    if let (Some(a), Some(b)) = (at(i), at(j)) {
                        out.push_segment(a.pos, b.pos, prop.line_width, color, (a.depth + b.depth) * 0.5);
                    }
                }
            }
            Representation::Wireframe => {
                let color = prop.unlit();
                for [i, j] in pd.edges() {
                    if let (Some(a), Some(b)) = (at(i), at(j)) {
                        out.push_segment(a.pos, b.pos, prop.line_width, color, (a.depth + b.depth) * 0.5);
                    }
                }
            }
            Representation::Points => {
                let color = prop.unlit();
                for p in projected.iter().flatten() {
                    out.push_point(p.pos, prop.point_size, color, p.depth);
                }
            }
        }
    }
}

fn vertex(pos: Vec2, color: [f32; 4]) -> MeshVertex {
    MeshVertex { pos: [pos.x, pos.y], color }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polydata::SphereSource;

    const VP: Rect = Rect::new(0.0, 0.0, 300.0, 300.0);

    fn camera_for(actor: &Actor) -> Camera {
        let mut cam = Camera::new();
        cam.reset(&actor.bounds());
        cam
    }

    #[test]
    fn lambert_is_two_sided_and_clamped() {
        let p = Property { ambient: 0.5, ..Default::default() };
        let n = Vec3::new(0.0, 0.0, 1.0);
        assert_eq!(p.intensity(n, n), 1.0);
        assert_eq!(p.intensity(-n, n), 1.0);
        assert_eq!(p.intensity(Vec3::new(1.0, 0.0, 0.0), n), 0.5);
    }

    #[test]
    fn surface_emits_every_visible_triangle() {
        let actor = Actor::new(SphereSource::new().output());
        let mut out = DepthSortedMesh::new();
        actor.project(&camera_for(&actor), VP, &mut out);
        assert_eq!(out.len(), actor.poly_data.triangles.len());
    }

    #[test]
    fn wireframe_emits_one_quad_per_edge() {
        let mut actor = Actor::new(SphereSource::new().output());
        actor.property.representation = Representation::Wireframe;
        let mut out = DepthSortedMesh::new();
        actor.project(&camera_for(&actor), VP, &mut out);
        assert_eq!(out.len(), actor.poly_data.edges().len() * 2);
    }

    #[test]
    fn surface_still_draws_line_cells() {
        let mut pd = PolyData::new();
        pd.points = vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0)];
        pd.lines = vec![[0, 1], [1, 2]];
        let actor = Actor::new(pd);
        let mut out = DepthSortedMesh::new();
        actor.project(&camera_for(&actor), VP, &mut out);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn hidden_actor_emits_nothing() {
        let mut actor = Actor::new(SphereSource::new().output());
        actor.visibility = false;
        let mut out = DepthSortedMesh::new();
        actor.project(&camera_for(&actor), VP, &mut out);
        assert_eq!(out.len(), 0);
    }

    #[test]
    fn bounds_follow_position() {
        let mut actor = Actor::new(SphereSource::new().output());
        actor.position = Vec3::new(10.0, 0.0, 0.0);
        let c = actor.bounds().center();
        assert!((c.x - 10.0).abs() < 1e-9);
    }
}
