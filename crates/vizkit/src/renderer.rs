//! A viewport into a scene: background, camera and the props drawn in it.

use vizkit_engine::coords::{Rect, Viewport};

use crate::actor::Actor;
use crate::camera::Camera;
use crate::chart::ChartXY;
use crate::colors::Rgb;
use crate::imaging::ImageActor;
use crate::math::Bounds;
use crate::painter::{DepthSortedMesh, Painter};
use crate::text::{TextActor, rgb_color};
use crate::widgets::Overlay;

/// Index of a renderer inside its [`crate::RenderWindow`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct RendererId(pub(crate) usize);

#[derive(Debug, Clone)]
pub struct Renderer {
    background: Rgb,
    /// `(xmin, ymin, xmax, ymax)` in window fractions, y up.
    viewport: [f64; 4],
    layer: u32,
    interactive: bool,
    actors: Vec<Actor>,
    actors2d: Vec<TextActor>,
    image_actors: Vec<ImageActor>,
    charts: Vec<ChartXY>,
    camera: Camera,
    camera_initialized: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            background: [0.0, 0.0, 0.0],
            viewport: [0.0, 0.0, 1.0, 1.0],
            layer: 0,
            interactive: true,
            actors: Vec::new(),
            actors2d: Vec::new(),
            image_actors: Vec::new(),
            charts: Vec::new(),
            camera: Camera::new(),
            camera_initialized: false,
        }
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn set_background(&mut self, color: Rgb) {
        self.background = color;
    }

    pub fn viewport(&self) -> [f64; 4] {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: [f64; 4]) {
        self.viewport = viewport.map(|v| v.clamp(0.0, 1.0));
    }

    pub fn layer(&self) -> u32 {
        self.layer
    }

    pub fn set_layer(&mut self, layer: u32) {
        self.layer = layer;
    }

    pub fn interactive(&self) -> bool {
        self.interactive
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    // ── props ─────────────────────────────────────────────────────────────

    /// Adds a 3D actor and returns its index.
    pub fn add_actor(&mut self, actor: Actor) -> usize {
        self.actors.push(actor);
        self.actors.len() - 1
    }

    pub fn actor_mut(&mut self, index: usize) -> Option<&mut Actor> {
        self.actors.get_mut(index)
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn add_actor2d(&mut self, actor: TextActor) -> usize {
        self.actors2d.push(actor);
        self.actors2d.len() - 1
    }

    pub fn actor2d_mut(&mut self, index: usize) -> Option<&mut TextActor> {
        self.actors2d.get_mut(index)
    }

    pub fn add_image_actor(&mut self, actor: ImageActor) -> usize {
        self.image_actors.push(actor);
        self.image_actors.len() - 1
    }

    pub fn image_actor_mut(&mut self, index: usize) -> Option<&mut ImageActor> {
        self.image_actors.get_mut(index)
    }

    pub fn add_chart(&mut self, chart: ChartXY) -> usize {
        self.charts.push(chart);
        self.charts.len() - 1
    }

    pub fn chart_mut(&mut self, index: usize) -> Option<&mut ChartXY> {
        self.charts.get_mut(index)
    }

    // ── camera ────────────────────────────────────────────────────────────

    pub fn active_camera(&self) -> &Camera {
        &self.camera
    }

    /// The camera, reset to the current props first if nothing has placed it yet.
    pub fn active_camera_mut(&mut self) -> &mut Camera {
        self.ensure_camera();
        &mut self.camera
    }

    /// Replaces the camera; it will not be reset automatically.
    pub fn set_active_camera(&mut self, camera: Camera) {
        self.camera = camera;
        self.camera_initialized = true;
    }

    /// Bounds of the visible 3D actors and image actors; ±1 when there are none.
    pub fn visible_prop_bounds(&self) -> Bounds {
        let actors = self.actors.iter().filter(|a| a.visibility).map(Actor::bounds);
        let images = self.image_actors.iter().filter(|a| a.visibility).map(|a| a.bounds());
        let b = actors.chain(images).fold(Bounds::empty(), |acc, b| acc.union(&b));
        if b.is_empty() { Bounds::new(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0) } else { b }
    }

    pub fn reset_camera(&mut self) {
        let bounds = self.visible_prop_bounds();
        self.camera.reset(&bounds);
        self.camera_initialized = true;
    }

    pub(crate) fn ensure_camera(&mut self) {
        if !self.camera_initialized {
            self.reset_camera();
        }
    }

    /// This renderer's rectangle in a window of `window` logical pixels.
    pub fn viewport_rect(&self, window: Viewport) -> Rect {
        let [x0, y0, x1, y1] = self.viewport;
        window.normalized_rect([x0 as f32, y0 as f32, x1 as f32, y1 as f32])
    }

    // ── painting ──────────────────────────────────────────────────────────

    /// Paints into `rect`. `extra` actors are sorted with the scene;
    /// `overlays` go on top of everything else.
    pub(crate) fn paint(&self, painter: &mut Painter<'_>, rect: Rect, extra: &[Actor], overlays: &[&Overlay]) {
        if rect.is_empty() {
            return;
        }
        painter.push_clip(rect);
        if self.layer == 0 {
            painter.fill_rect(rect, rgb_color(self.background, 1.0));
        }

        for image in &self.image_actors {
            image.paint(painter, &self.camera, rect);
        }

        let mut mesh = DepthSortedMesh::new();
        for actor in self.actors.iter().chain(extra) {
            actor.project(&self.camera, rect, &mut mesh);
        }
        painter.mesh(mesh.finish());

        for chart in &self.charts {
            chart.paint(painter, rect);
        }
        for text in &self.actors2d {
            text.paint(painter, rect);
        }
        for overlay in overlays {
            match overlay {
                Overlay::Segment { p0, p1, width, color } => painter.line(*p0, *p1, *width, rgb_color(*color, 1.0)),
                Overlay::Text(text) => text.paint(painter, rect),
            }
        }
        painter.pop_clip();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::polydata::SphereSource;

    #[test]
    fn empty_renderer_resets_to_unit_box() {
        let mut r = Renderer::new();
        r.reset_camera();
        let radius = 3f64.sqrt();
        assert!((r.active_camera().parallel_scale() - radius).abs() < 1e-9);
    }

    #[test]
    fn camera_is_reset_lazily_once() {
        let mut r = Renderer::new();
        r.add_actor(Actor::new(SphereSource { center: Vec3::new(5.0, 0.0, 0.0), ..Default::default() }.output()));
        let fp = r.active_camera_mut().focal_point();
        assert!((fp.x - 5.0).abs() < 1e-9);

        r.actor_mut(0).unwrap().position = Vec3::new(10.0, 0.0, 0.0);
        r.ensure_camera();
        assert!((r.active_camera().focal_point().x - 5.0).abs() < 1e-9);
    }

    #[test]
    fn explicit_camera_is_kept() {
        let mut r = Renderer::new();
        let mut cam = Camera::new();
        cam.set_position([0.0, 0.0, 42.0]);
        r.set_active_camera(cam);
        r.ensure_camera();
        assert_eq!(r.active_camera().position(), Vec3::new(0.0, 0.0, 42.0));
    }

    #[test]
    fn hidden_actors_do_not_count_towards_bounds() {
        let mut r = Renderer::new();
        let mut a = Actor::new(SphereSource { radius: 10.0, ..Default::default() }.output());
        a.visibility = false;
        r.add_actor(a);
        assert_eq!(r.visible_prop_bounds().0, [-1.0, 1.0, -1.0, 1.0, -1.0, 1.0]);
    }

    #[test]
    fn viewport_maps_to_window_rect() {
        let mut r = Renderer::new();
        r.set_viewport([0.5, 0.0, 1.0, 1.0]);
        let rect = r.viewport_rect(Viewport::new(640.0, 240.0));
        assert_eq!(rect, Rect::new(320.0, 0.0, 320.0, 240.0));
    }
}
