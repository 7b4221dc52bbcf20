//! The window a set of renderers is stacked in.

use vizkit_engine::coords::{Rect, Vec2, Viewport};
use vizkit_engine::scene::DrawList;
use vizkit_engine::text::FontSystem;

use crate::actor::Actor;
use crate::error::Result;
use crate::painter::Painter;
use crate::renderer::{Renderer, RendererId};
use crate::text::{FontBook, FontFamily, FontKey};
use crate::widgets::{Overlay, WidgetDrawing};

/// Owns the renderers of one window, its title and requested size.
///
/// Renderers paint in layer order (lowest first), and in insertion order
/// within a layer. Only layer 0 renderers clear their viewport.
pub struct RenderWindow {
    name: String,
    size: [u32; 2],
    current_size: Viewport,
    number_of_layers: u32,
    renderers: Vec<Renderer>,
    fonts: FontBook,
}

impl Default for RenderWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderWindow {
    pub fn new() -> Self {
        Self {
            name: "vizkit".to_owned(),
            size: [300, 300],
            current_size: Viewport::new(300.0, 300.0),
            number_of_layers: 1,
            renderers: Vec::new(),
            fonts: FontBook::new(),
        }
    }

    pub fn set_window_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn window_name(&self) -> &str {
        &self.name
    }

    /// Requested size in logical pixels. Only read when the window opens.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = [width.max(1), height.max(1)];
        self.current_size = Viewport::new(self.size[0] as f32, self.size[1] as f32);
    }

    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    /// Size of the live window; the requested size until it opens.
    pub fn current_size(&self) -> Viewport {
        self.current_size
    }

    pub(crate) fn set_current_size(&mut self, size: Viewport) {
        if size.is_valid() {
            self.current_size = size;
        }
    }

    pub fn set_number_of_layers(&mut self, layers: u32) {
        self.number_of_layers = layers.max(1);
    }

    pub fn number_of_layers(&self) -> u32 {
        self.number_of_layers
    }

    // ── renderers ─────────────────────────────────────────────────────────

    pub fn add_renderer(&mut self, renderer: Renderer) -> RendererId {
        if renderer.layer() >= self.number_of_layers {
            log::warn!(
                "renderer on layer {} but the window has {} layer(s)",
                renderer.layer(),
                self.number_of_layers
            );
        }
        self.renderers.push(renderer);
        RendererId(self.renderers.len() - 1)
    }

    pub fn renderer(&self, id: RendererId) -> Option<&Renderer> {
        self.renderers.get(id.0)
    }

    pub fn renderer_mut(&mut self, id: RendererId) -> Option<&mut Renderer> {
        self.renderers.get_mut(id.0)
    }

    pub fn renderers(&self) -> impl Iterator<Item = (RendererId, &Renderer)> {
        self.renderers.iter().enumerate().map(|(i, r)| (RendererId(i), r))
    }

    pub fn first_renderer(&self) -> Option<RendererId> {
        (!self.renderers.is_empty()).then_some(RendererId(0))
    }

    /// Rectangle of renderer `id` in the current window, top-left origin.
    pub fn viewport_rect(&self, id: RendererId) -> Option<Rect> {
        Some(self.renderer(id)?.viewport_rect(self.current_size))
    }

    /// The interactive renderer under `pos`; the topmost layer wins, then the
    /// last added.
    pub fn renderer_at(&self, pos: Vec2) -> Option<RendererId> {
        self.renderers()
            .filter(|(_, r)| r.interactive() && r.viewport_rect(self.current_size).contains(pos))
            .max_by_key(|(id, r)| (r.layer(), *id))
            .map(|(id, _)| id)
    }

    // ── fonts ─────────────────────────────────────────────────────────────

    /// Uses `bytes` (a TTF or OTF file) for the given family and style,
    /// ahead of anything found on the system.
    pub fn register_font(&mut self, family: FontFamily, bold: bool, italic: bool, bytes: &[u8]) -> Result<()> {
        self.fonts.register(FontKey { family, bold, italic }, bytes)?;
        Ok(())
    }

    pub(crate) fn fonts(&self) -> &FontSystem {
        self.fonts.system()
    }

    // ── painting ──────────────────────────────────────────────────────────

    /// Places the camera of every renderer nothing has positioned yet.
    pub fn render(&mut self) {
        for renderer in &mut self.renderers {
            renderer.ensure_camera();
        }
    }

    /// Records every renderer into `draw_list`, with each widget's drawing
    /// added to the renderer it lives in.
    pub(crate) fn paint(&mut self, draw_list: &mut DrawList, widgets: &[WidgetDrawing]) {
        self.render();
        let Self { renderers, fonts, current_size, .. } = self;

        let mut order: Vec<usize> = (0..renderers.len()).collect();
        order.sort_by_key(|&i| renderers[i].layer());

        let mut painter = Painter::new(draw_list, fonts);
        for i in order {
            let renderer = &renderers[i];
            let mut actors: Vec<Actor> = Vec::new();
            let mut overlays: Vec<&Overlay> = Vec::new();
            for drawing in widgets.iter().filter(|d| d.renderer.0 == i) {
                actors.extend(drawing.actors.iter().cloned());
                overlays.extend(&drawing.overlays);
            }
            renderer.paint(&mut painter, renderer.viewport_rect(*current_size), &actors, &overlays);
        }
    }
}

#[cfg(test)]
mod tests {
    use vizkit_engine::scene::DrawCmd;

    use super::*;
    use crate::math::Vec3;
    use crate::polydata::SphereSource;

    fn background_rects(dl: &DrawList) -> Vec<Rect> {
        dl.items()
            .iter()
            .filter_map(|it| match &it.cmd {
                DrawCmd::Rect(r) => Some(r.rect),
                _ => None,
            })
            .collect()
    }

    fn side_by_side() -> RenderWindow {
        let mut window = RenderWindow::new();
        window.set_size(640, 240);
        for x in [0.0, 0.5] {
            let mut r = Renderer::new();
            r.set_viewport([x, 0.0, x + 0.5, 1.0]);
            window.add_renderer(r);
        }
        window
    }

    #[test]
    fn each_renderer_clears_its_own_viewport() {
        let mut window = side_by_side();
        let mut dl = DrawList::new();
        window.paint(&mut dl, &[]);
        assert_eq!(
            background_rects(&dl),
            vec![Rect::new(0.0, 0.0, 320.0, 240.0), Rect::new(320.0, 0.0, 320.0, 240.0)]
        );
        assert!(dl.items().iter().all(|it| it.clip_rect.is_some()));
    }

    #[test]
    fn upper_layers_do_not_clear() {
        let mut window = RenderWindow::new();
        window.set_number_of_layers(2);
        let mut top = Renderer::new();
        top.set_layer(1);
        window.add_renderer(top);
        window.add_renderer(Renderer::new());

        let mut dl = DrawList::new();
        window.paint(&mut dl, &[]);
        assert_eq!(background_rects(&dl), vec![Rect::new(0.0, 0.0, 300.0, 300.0)]);
    }

    #[test]
    fn renderer_at_prefers_top_layer_and_skips_passive() {
        let mut window = side_by_side();
        assert_eq!(window.renderer_at(Vec2::new(10.0, 10.0)), Some(RendererId(0)));
        assert_eq!(window.renderer_at(Vec2::new(400.0, 10.0)), Some(RendererId(1)));
        assert_eq!(window.renderer_at(Vec2::new(700.0, 10.0)), None);

        window.set_number_of_layers(2);
        let mut overlay = Renderer::new();
        overlay.set_layer(1);
        let top = window.add_renderer(overlay);
        assert_eq!(window.renderer_at(Vec2::new(10.0, 10.0)), Some(top));

        window.renderer_mut(top).unwrap().set_interactive(false);
        assert_eq!(window.renderer_at(Vec2::new(10.0, 10.0)), Some(RendererId(0)));
    }

    #[test]
    fn overlays_draw_in_their_renderer_only() {
        let mut window = side_by_side();
        let sphere = Actor::new(SphereSource { center: Vec3::ZERO, ..Default::default() }.output());
        let mut dl = DrawList::new();
        let drawing = WidgetDrawing { renderer: RendererId(1), actors: vec![sphere], overlays: Vec::new() };
        window.paint(&mut dl, &[drawing]);

        let mesh_clips: Vec<_> = dl
            .items()
            .iter()
            .filter(|it| matches!(it.cmd, DrawCmd::Mesh(_)))
            .map(|it| it.clip_rect)
            .collect();
        assert_eq!(mesh_clips, vec![Some(Rect::new(320.0, 0.0, 320.0, 240.0))]);
    }

    #[test]
    fn flat_overlays_go_on_top_of_their_renderer() {
        let mut window = side_by_side();
        let sphere = Actor::new(SphereSource::default().output());
        let segment =
            Overlay::Segment { p0: Vec2::new(340.0, 200.0), p1: Vec2::new(600.0, 200.0), width: 4.0, color: [1.0; 3] };
        let drawing = WidgetDrawing { renderer: RendererId(1), actors: vec![sphere], overlays: vec![segment] };
        let mut dl = DrawList::new();
        window.paint(&mut dl, &[drawing]);

        let right = Some(Rect::new(320.0, 0.0, 320.0, 240.0));
        let kinds: Vec<&str> = dl
            .items()
            .iter()
            .filter(|it| it.clip_rect == right)
            .filter_map(|it| match it.cmd {
                DrawCmd::Mesh(_) => Some("mesh"),
                DrawCmd::Line(_) => Some("line"),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, vec!["mesh", "line"]);
        assert_eq!(dl.items().iter().filter(|it| matches!(it.cmd, DrawCmd::Line(_))).count(), 1);
    }

    #[test]
    fn render_places_unset_cameras() {
        let mut window = RenderWindow::new();
        let id = window.add_renderer(Renderer::new());
        window.render();
        let cam = window.renderer(id).unwrap().active_camera();
        assert!(cam.distance() > 1.0);
    }

    #[test]
    fn garbage_font_bytes_are_rejected() {
        let mut window = RenderWindow::new();
        assert!(window.register_font(FontFamily::Arial, false, false, b"not a font").is_err());
    }
}
