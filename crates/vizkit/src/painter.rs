use vizkit_engine::coords::{Rect, Vec2};
use vizkit_engine::paint::Color;
use vizkit_engine::scene::{Border, DrawList, ImageHandle, MeshCmd, MeshVertex, ZIndex};
use vizkit_engine::text::{FontId, TextExtent};

use crate::text::{FontBook, FontKey};

/// Drawing surface a render window paints its renderers into.
///
/// Wraps the engine's `DrawList` with the handful of primitives the toolkit
/// needs and hands out increasing z values so items of one kind paint in
/// call order.
pub(crate) struct Painter<'a> {
    draw_list: &'a mut DrawList,
    fonts: &'a mut FontBook,
    z: i32,
}

impl<'a> Painter<'a> {
    pub(crate) fn new(draw_list: &'a mut DrawList, fonts: &'a mut FontBook) -> Self {
        Self { draw_list, fonts, z: 0 }
    }

    // ── text ──────────────────────────────────────────────────────────────

    pub(crate) fn font(&mut self, key: FontKey) -> Option<FontId> {
        self.fonts.resolve(key)
    }

    pub(crate) fn measure_text(&self, text: &str, font: FontId, size: f32) -> TextExtent {
        self.fonts.system().measure_text(text, font, size, None)
    }

    /// Text with its top-left corner at `origin`.
    pub(crate) fn text(&mut self, text: &str, font: FontId, size: f32, color: Color, origin: Vec2) {
        let z = self.next_z();
        self.draw_list.push_text(z, text, font, size, color, origin, None);
    }

    // ── shapes ────────────────────────────────────────────────────────────

    pub(crate) fn fill_rect(&mut self, rect: Rect, color: Color) {
        let z = self.next_z();
        self.draw_list.push_rect(z, rect, color);
    }

    pub(crate) fn line(&mut self, p0: Vec2, p1: Vec2, width: f32, color: Color) {
        let z = self.next_z();
        self.draw_list.push_line(z, p0, p1, width, color);
    }

    pub(crate) fn circle(&mut self, center: Vec2, radius: f32, fill: Color, border: Option<Border>) {
        let z = self.next_z();
        self.draw_list.push_circle(z, center, radius, fill, border);
    }

    pub(crate) fn mesh(&mut self, mesh: MeshCmd) {
        let z = self.next_z();
        self.draw_list.push_mesh(z, mesh);
    }

    pub(crate) fn image(&mut self, image: ImageHandle, corners: [Vec2; 4], interpolate: bool, opacity: f32) {
        let z = self.next_z();
        self.draw_list.push_image(z, image, corners, interpolate, opacity);
    }

    // ── clipping ──────────────────────────────────────────────────────────

    pub(crate) fn push_clip(&mut self, rect: Rect) {
        self.draw_list.push_clip(rect);
    }

    pub(crate) fn pop_clip(&mut self) {
        self.draw_list.pop_clip();
    }

    #[inline]
    fn next_z(&mut self) -> ZIndex {
        let z = ZIndex::new(self.z);
        self.z += 1;
        z
    }
}

/// Triangles collected from every 3D prop of one renderer, emitted back to
/// front as a single mesh.
#[derive(Debug, Default)]
pub(crate) struct DepthSortedMesh {
    triangles: Vec<([MeshVertex; 3], f64)>,
}

impl DepthSortedMesh {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of triangles collected so far.
    pub(crate) fn len(&self) -> usize {
        self.triangles.len()
    }

    pub(crate) fn push_triangle(&mut self, vertices: [MeshVertex; 3], depth: f64) {
        self.triangles.push((vertices, depth));
    }

    /// A screen-space segment as a quad of `width` logical pixels.
    pub(crate) fn push_segment(&mut self, p0: Vec2, p1: Vec2, width: f32, color: [f32; 4], depth: f64) {
        let dir = (p1 - p0).normalized_or_zero();
        if dir == Vec2::zero() || width <= 0.0 {
            return;
        }
        let n = dir.perp() * (width * 0.5);
        self.push_quad([p0 + n, p1 + n, p1 - n, p0 - n], color, depth);
    }

    /// A square point sprite of `size` logical pixels.
    pub(crate) fn push_point(&mut self, p: Vec2, size: f32, color: [f32; 4], depth: f64) {
        let h = size.max(1.0) * 0.5;
        self.push_quad(
            [
                Vec2::new(p.x - h, p.y - h),
                Vec2::new(p.x + h, p.y - h),
                Vec2::new(p.x + h, p.y + h),
                Vec2::new(p.x - h, p.y + h),
            ],
            color,
            depth,
        );
    }

    fn push_quad(&mut self, q: [Vec2; 4], color: [f32; 4], depth: f64) {
        let v = q.map(|p| MeshVertex { pos: [p.x, p.y], color });
        self.push_triangle([v[0], v[1], v[2]], depth);
        self.push_triangle([v[0], v[2], v[3]], depth);
    }

    /// Farthest triangles first; equal depths keep insertion order.
    pub(crate) fn finish(mut self) -> MeshCmd {
        self.triangles.sort_by(|a, b| b.1.total_cmp(&a.1));
        let mut mesh = MeshCmd::default();
        for ([a, b, c], _) in self.triangles {
            mesh.push_triangle(a, b, c);
        }
        mesh
    }
}
