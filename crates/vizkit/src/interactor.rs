//! Event loop driver: turns window input into widget interaction and camera
//! motion, and repaints the render window every frame.

use winit::dpi::LogicalSize;

use vizkit_engine::coords::{Vec2, Viewport};
use vizkit_engine::core::{App as EngineApp, AppControl, FrameCtx};
use vizkit_engine::device::GpuInit;
use vizkit_engine::input::{
    InputEvent, Key, KeyState, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent,
};
use vizkit_engine::paint::Color;
use vizkit_engine::render::Compositor;
use vizkit_engine::scene::DrawList;
use vizkit_engine::window::{Runtime, RuntimeConfig};

use crate::actor::Representation;
use crate::error::{Result, VizError};
use crate::event::InteractionEvent;
use crate::observer::EventId;
use crate::render_window::RenderWindow;
use crate::renderer::{Renderer, RendererId};
use crate::widgets::{Widget, WidgetDrawing, WidgetId};

/// How unconsumed pointer input moves the camera.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum InteractorStyle {
    /// Left drag rotates about the focal point, middle (or shift-left) pans,
    /// right drag and the wheel dolly.
    #[default]
    TrackballCamera,
    /// For 2D images: no rotation; left drag is ignored, middle (or
    /// shift-left) pans, right drag and the wheel zoom.
    Image,
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Motion {
    None,
    Rotate { renderer: RendererId, last: Vec2 },
    Pan { renderer: RendererId, last: Vec2 },
    Dolly { renderer: RendererId, last: Vec2 },
}

/// Scales how far one drag or wheel notch moves the camera.
const MOTION_FACTOR: f64 = 10.0;

/// Callback run with the window when a widget fires an event.
struct WindowObserver {
    widget: WidgetId,
    event: EventId,
    callback: Box<dyn FnMut(&dyn Widget, &mut RenderWindow)>,
}

/// Owns a [`RenderWindow`] and its widgets and runs them in a window.
pub struct RenderWindowInteractor {
    window: RenderWindow,
    widgets: Vec<Box<dyn Widget>>,
    window_observers: Vec<WindowObserver>,
    style: InteractorStyle,
    motion: Motion,
    pointer: Vec2,
    initialized: bool,
    gpu_init: GpuInit,
    draw_list: DrawList,
    compositor: Compositor,
}

impl Default for RenderWindowInteractor {
    fn default() -> Self {
        Self::new(RenderWindow::new())
    }
}

impl RenderWindowInteractor {
    pub fn new(window: RenderWindow) -> Self {
        Self {
            window,
            widgets: Vec::new(),
            window_observers: Vec::new(),
            style: InteractorStyle::default(),
            motion: Motion::None,
            pointer: Vec2::zero(),
            initialized: false,
            gpu_init: GpuInit::default(),
            draw_list: DrawList::new(),
            compositor: Compositor::new(),
        }
    }

    pub fn render_window(&self) -> &RenderWindow {
        &self.window
    }

    pub fn render_window_mut(&mut self) -> &mut RenderWindow {
        &mut self.window
    }

    pub fn style(&self) -> InteractorStyle {
        self.style
    }

    pub fn set_style(&mut self, style: InteractorStyle) {
        self.style = style;
    }

    /// Surface and adapter preferences used by [`RenderWindowInteractor::start`].
    pub fn set_gpu_init(&mut self, gpu_init: GpuInit) {
        self.gpu_init = gpu_init;
    }

    /// Prepares the render window for the event loop. Called by `start` if
    /// the caller did not.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.window.render();
        self.initialized = true;
        log::debug!("interactor initialized for '{}'", self.window.window_name());
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Adds a widget. It lives in the first renderer unless it already names one.
    pub fn add_widget(&mut self, mut widget: impl Widget) -> WidgetId {
        if widget.renderer().is_none() {
            match self.window.first_renderer() {
                Some(id) => widget.set_renderer(id),
                None => log::warn!("widget added to a window without renderers"),
            }
        }
        self.widgets.push(Box::new(widget));
        WidgetId(self.widgets.len() - 1)
    }

    /// The widget behind `id`, if it is a `W`.
    pub fn widget_mut<W: Widget>(&mut self, id: WidgetId) -> Option<&mut W> {
        self.widgets.get_mut(id.0)?.as_any_mut().downcast_mut::<W>()
    }

    pub fn widget<W: Widget>(&self, id: WidgetId) -> Option<&W> {
        self.widgets.get(id.0)?.as_any().downcast_ref::<W>()
    }

    /// Calls `callback` with the widget and the render window whenever the
    /// widget fires `event`. Returns `false` if `id` is not a `W`.
    ///
    /// Unlike the widget's own observers, these may change the scene.
    pub fn add_widget_observer<W: Widget>(
        &mut self,
        id: WidgetId,
        event: EventId,
        mut callback: impl FnMut(&W, &mut RenderWindow) + 'static,
    ) -> bool {
        if self.widget::<W>(id).is_none() {
            return false;
        }
        let callback: Box<dyn FnMut(&dyn Widget, &mut RenderWindow)> = Box::new(move |widget, window| {
            if let Some(widget) = widget.as_any().downcast_ref::<W>() {
                callback(widget, window);
            }
        });
        self.window_observers.push(WindowObserver { widget: id, event, callback });
        true
    }

    /// Opens the window and blocks until it is closed.
    pub fn start(&mut self) -> Result<()> {
        self.initialize();
        let [w, h] = self.window.size();
        let config = RuntimeConfig {
            title: self.window.window_name().to_owned(),
            initial_size: LogicalSize::new(f64::from(w), f64::from(h)),
            resizable: true,
        };
        log::info!("starting event loop for '{}'", config.title);
        self.run_with(config, |config, gpu_init, app| Runtime::run(config, gpu_init, app))
    }

    fn run_with(
        &mut self,
        config: RuntimeConfig,
        run: impl FnOnce(RuntimeConfig, GpuInit, &mut InteractorApp<'_>) -> anyhow::Result<()>,
    ) -> Result<()> {
        let gpu_init = self.gpu_init.clone();
        let result = run(config, gpu_init, &mut InteractorApp { inner: self });
        self.motion = Motion::None;
        result.map_err(VizError::Runtime)
    }

    // ── event dispatch ────────────────────────────────────────────────────

    /// Routes one event to the widgets and then to the interactor style.
    ///
    /// Returns `false` when the event asks the interactor to stop.
    pub fn handle_event(&mut self, event: &InteractionEvent) -> bool {
        if let Some(pos) = event.pos() {
            self.pointer = pos;
        }

        let Self { widgets, window, window_observers, .. } = self;
        for (i, widget) in widgets.iter_mut().enumerate().filter(|(_, w)| w.enabled()) {
            let result = widget.process_event(event, window);
            for fired in widget.take_fired() {
                for observer in window_observers.iter_mut().filter(|o| o.widget.0 == i && o.event == fired) {
                    (observer.callback)(&**widget, window);
                }
            }
            if result.is_consumed() {
                return true;
            }
        }

        match *event {
            InteractionEvent::KeyPress { key, .. } => self.on_key(key),
            InteractionEvent::ButtonPress { button, pos, modifiers } => {
                self.on_button_press(button, pos, modifiers.shift);
                true
            }
            InteractionEvent::ButtonRelease { .. } => {
                self.motion = Motion::None;
                true
            }
            InteractionEvent::PointerMove { pos } => {
                self.on_pointer_move(pos);
                true
            }
            InteractionEvent::Wheel { notches, pos } => {
                if let Some(id) = self.window.renderer_at(pos) {
                    self.dolly(id, 1.1f64.powf(MOTION_FACTOR * 0.2 * f64::from(notches)));
                }
                true
            }
        }
    }

    fn on_key(&mut self, key: Key) -> bool {
        match key.letter() {
            Some('q') | Some('e') => {
                log::debug!("exit requested from keyboard");
                return false;
            }
            Some('r') => {
                if let Some(renderer) = self.poked_renderer_mut() {
                    renderer.reset_camera();
                }
            }
            Some('w') => self.set_poked_representation(Representation::Wireframe),
            Some('s') => self.set_poked_representation(Representation::Surface),
            _ => {}
        }
        true
    }

    fn poked_renderer_mut(&mut self) -> Option<&mut Renderer> {
        let id = self.window.renderer_at(self.pointer)?;
        self.window.renderer_mut(id)
    }

    fn set_poked_representation(&mut self, representation: Representation) {
        let Some(renderer) = self.poked_renderer_mut() else {
            return;
        };
        let mut i = 0;
        while let Some(actor) = renderer.actor_mut(i) {
            actor.property.representation = representation;
            i += 1;
        }
    }

    fn on_button_press(&mut self, button: MouseButton, pos: Vec2, shift: bool) {
        let Some(renderer) = self.window.renderer_at(pos) else {
            return;
        };
        self.motion = match (self.style, button, shift) {
            (_, MouseButton::Middle, _) | (_, MouseButton::Left, true) => Motion::Pan { renderer, last: pos },
            (InteractorStyle::TrackballCamera, MouseButton::Left, false) => Motion::Rotate { renderer, last: pos },
            (_, MouseButton::Right, _) => Motion::Dolly { renderer, last: pos },
            _ => Motion::None,
        };
    }

    fn on_pointer_move(&mut self, pos: Vec2) {
        match self.motion {
            Motion::None => {}
            Motion::Rotate { renderer, last } => {
                self.rotate(renderer, last, pos);
                self.motion = Motion::Rotate { renderer, last: pos };
            }
            Motion::Pan { renderer, last } => {
                self.pan(renderer, last, pos);
                self.motion = Motion::Pan { renderer, last: pos };
            }
            Motion::Dolly { renderer, last } => {
                if let Some(rect) = self.window.viewport_rect(renderer) {
                    let dy_up = f64::from(last.y - pos.y);
                    let half = (f64::from(rect.size.y) * 0.5).max(1.0);
                    self.dolly(renderer, 1.1f64.powf(MOTION_FACTOR * dy_up / half));
                }
                self.motion = Motion::Dolly { renderer, last: pos };
            }
        }
    }

    // ── camera motion ─────────────────────────────────────────────────────

    fn rotate(&mut self, id: RendererId, from: Vec2, to: Vec2) {
        let Some(rect) = self.window.viewport_rect(id) else {
            return;
        };
        let w = f64::from(rect.size.x).max(1.0);
        let h = f64::from(rect.size.y).max(1.0);
        let dx = f64::from(to.x - from.x);
        let dy_up = f64::from(from.y - to.y);
        let Some(renderer) = self.window.renderer_mut(id) else {
            return;
        };
        let camera = renderer.active_camera_mut();
        camera.azimuth(dx * (-20.0 / w) * MOTION_FACTOR);
        camera.elevation(dy_up * (-20.0 / h) * MOTION_FACTOR);
        camera.orthogonalize_view_up();
    }

    fn pan(&mut self, id: RendererId, from: Vec2, to: Vec2) {
        let Some(rect) = self.window.viewport_rect(id) else {
            return;
        };
        let Some(renderer) = self.window.renderer_mut(id) else {
            return;
        };
        let camera = renderer.active_camera_mut();
        let depth = camera.depth_of(camera.focal_point());
        let delta = camera.display_to_world(from, depth, rect) - camera.display_to_world(to, depth, rect);
        camera.pan(delta);
    }

    fn dolly(&mut self, id: RendererId, factor: f64) {
        let style = self.style;
        let Some(renderer) = self.window.renderer_mut(id) else {
            return;
        };
        let camera = renderer.active_camera_mut();
        match style {
            InteractorStyle::TrackballCamera => camera.dolly(factor),
            InteractorStyle::Image => camera.zoom(factor),
        }
    }

    // ── frame ─────────────────────────────────────────────────────────────

    fn widget_drawings(&self) -> Vec<WidgetDrawing> {
        self.widgets
            .iter()
            .filter_map(|w| {
                let renderer = w.renderer()?;
                let viewport = self.window.viewport_rect(renderer)?;
                Some(WidgetDrawing { renderer, actors: w.build(), overlays: w.build_overlay(viewport) })
            })
            .filter(|d| !d.actors.is_empty() || !d.overlays.is_empty())
            .collect()
    }

    /// Records the whole window into the interactor's draw list.
    fn paint(&mut self) {
        let drawings = self.widget_drawings();
        self.draw_list.clear();
        self.window.paint(&mut self.draw_list, &drawings);
    }
}

/// Maps a runtime input event onto the toolkit's event type.
fn translate(event: &InputEvent) -> Option<InteractionEvent> {
    match *event {
        InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
            Some(InteractionEvent::PointerMove { pos: Vec2::new(x, y) })
        }
        InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, modifiers }) => {
            let pos = Vec2::new(x, y);
            Some(match state {
                MouseButtonState::Pressed => InteractionEvent::ButtonPress { button, pos, modifiers },
                MouseButtonState::Released => InteractionEvent::ButtonRelease { button, pos, modifiers },
            })
        }
        InputEvent::Key { key, state: KeyState::Pressed, modifiers, repeat: false } => {
            Some(InteractionEvent::KeyPress { key, modifiers })
        }
        _ => None,
    }
}

/// Engine-facing view of the interactor while the loop runs.
struct InteractorApp<'a> {
    inner: &'a mut RenderWindowInteractor,
}

impl EngineApp for InteractorApp<'_> {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let (w, h) = ctx.window.logical_size();
        let this = &mut *self.inner;
        this.window.set_current_size(Viewport::new(w, h));

        let mut keep_running = true;
        for raw in &ctx.input_frame.events {
            let event = match raw {
                InputEvent::MouseWheel { delta, .. } => {
                    let (x, y) = ctx.input.pointer_pos.unwrap_or((this.pointer.x, this.pointer.y));
                    Some(InteractionEvent::Wheel { notches: delta.notches_y(), pos: Vec2::new(x, y) })
                }
                other => translate(other),
            };
            if let Some(event) = event {
                keep_running &= this.handle_event(&event);
            }
        }
        if !keep_running {
            return AppControl::Exit;
        }

        this.paint();
        let draw_list = &mut this.draw_list;
        let compositor = &mut this.compositor;
        let fonts = this.window.fonts();
        ctx.render(Color::BLACK, |rctx, target| {
            compositor.render(rctx, target, draw_list, fonts);
        })
    }

    fn on_exit(&mut self) {
        log::debug!("event loop finished for '{}'", self.inner.window.window_name());
    }
}

#[cfg(test)]
mod tests {
    use vizkit_engine::input::Modifiers;
    use vizkit_engine::scene::DrawCmd;

    use super::*;
    use crate::actor::Actor;
    use crate::math::Vec3;
    use crate::polydata::SphereSource;
    use crate::widgets::{Overlay, SliderWidget, SphereRepresentation, SphereWidget};

    fn interactor(style: InteractorStyle) -> RenderWindowInteractor {
        let mut renderer = Renderer::new();
        renderer.add_actor(Actor::new(SphereSource::default().output()));
        let mut window = RenderWindow::new();
        window.add_renderer(renderer);
        let mut iren = RenderWindowInteractor::new(window);
        iren.set_style(style);
        iren.initialize();
        iren
    }

    fn press(button: MouseButton, x: f32, y: f32, shift: bool) -> InteractionEvent {
        InteractionEvent::ButtonPress {
            button,
            pos: Vec2::new(x, y),
            modifiers: Modifiers { shift, ..Modifiers::default() },
        }
    }

    fn release(button: MouseButton, x: f32, y: f32) -> InteractionEvent {
        InteractionEvent::ButtonRelease { button, pos: Vec2::new(x, y), modifiers: Modifiers::default() }
    }

    fn moved(x: f32, y: f32) -> InteractionEvent {
        InteractionEvent::PointerMove { pos: Vec2::new(x, y) }
    }

    fn key(key: Key) -> InteractionEvent {
        InteractionEvent::KeyPress { key, modifiers: Modifiers::default() }
    }

    fn camera(iren: &RenderWindowInteractor) -> crate::camera::Camera {
        iren.render_window().renderers().next().map(|(_, r)| r.active_camera().clone()).unwrap()
    }

    #[test]
    fn left_drag_rotates_about_the_focal_point() {
        let mut iren = interactor(InteractorStyle::TrackballCamera);
        let before = camera(&iren);
        iren.handle_event(&press(MouseButton::Left, 150.0, 150.0, false));
        iren.handle_event(&moved(180.0, 150.0));
        iren.handle_event(&release(MouseButton::Left, 180.0, 150.0));
        let after = camera(&iren);

        assert!((after.distance() - before.distance()).abs() < 1e-9);
        assert_eq!(after.focal_point(), before.focal_point());
        // Dragging right swings the camera to the left of the scene.
        assert!(after.position().x < -1e-3);
    }

    #[test]
    fn image_style_ignores_left_drag() {
        let mut iren = interactor(InteractorStyle::Image);
        let before = camera(&iren);
        iren.handle_event(&press(MouseButton::Left, 150.0, 150.0, false));
        iren.handle_event(&moved(200.0, 100.0));
        assert_eq!(camera(&iren).position(), before.position());
    }

    #[test]
    fn shift_left_drag_pans_with_the_pointer() {
        let mut iren = interactor(InteractorStyle::TrackballCamera);
        let before = camera(&iren);
        iren.handle_event(&press(MouseButton::Left, 150.0, 150.0, true));
        iren.handle_event(&moved(170.0, 150.0));
        let after = camera(&iren);
        assert!(after.focal_point().x < before.focal_point().x);
        assert!((after.distance() - before.distance()).abs() < 1e-9);
    }

    #[test]
    fn right_drag_up_and_wheel_forward_dolly_in() {
        let mut iren = interactor(InteractorStyle::TrackballCamera);
        let d0 = camera(&iren).distance();
        iren.handle_event(&press(MouseButton::Right, 150.0, 150.0, false));
        iren.handle_event(&moved(150.0, 120.0));
        iren.handle_event(&release(MouseButton::Right, 150.0, 120.0));
        let d1 = camera(&iren).distance();
        assert!(d1 < d0);

        iren.handle_event(&InteractionEvent::Wheel { notches: 1.0, pos: Vec2::new(150.0, 150.0) });
        let d2 = camera(&iren).distance();
        assert!((d1 / d2 - 1.1f64.powi(2)).abs() < 1e-9);
    }

    #[test]
    fn image_style_wheel_zooms_the_parallel_scale() {
        let mut iren = interactor(InteractorStyle::Image);
        let id = iren.render_window().first_renderer().unwrap();
        iren.render_window_mut().renderer_mut(id).unwrap().active_camera_mut().set_parallel_projection(true);
        let s0 = camera(&iren).parallel_scale();
        iren.handle_event(&InteractionEvent::Wheel { notches: -1.0, pos: Vec2::new(150.0, 150.0) });
        assert!(camera(&iren).parallel_scale() > s0);
    }

    #[test]
    fn quit_keys_stop_and_reset_key_restores_camera() {
        let mut iren = interactor(InteractorStyle::TrackballCamera);
        let home = camera(&iren);
        iren.handle_event(&moved(150.0, 150.0));
        iren.handle_event(&InteractionEvent::Wheel { notches: 3.0, pos: Vec2::new(150.0, 150.0) });
        assert!(camera(&iren).distance() < home.distance());

        assert!(iren.handle_event(&key(Key::R)));
        assert!((camera(&iren).distance() - home.distance()).abs() < 1e-9);

        assert!(!iren.handle_event(&key(Key::Q)));
        assert!(!iren.handle_event(&key(Key::E)));
        assert!(iren.handle_event(&key(Key::X)));
    }

    #[test]
    fn w_and_s_switch_actor_representation() {
        let mut iren = interactor(InteractorStyle::TrackballCamera);
        iren.handle_event(&moved(150.0, 150.0));
        iren.handle_event(&key(Key::W));
        let id = iren.render_window().first_renderer().unwrap();
        let rep = |iren: &RenderWindowInteractor| {
            iren.render_window().renderer(id).unwrap().actors()[0].property.representation
        };
        assert_eq!(rep(&iren), Representation::Wireframe);
        iren.handle_event(&key(Key::S));
        assert_eq!(rep(&iren), Representation::Surface);
    }

    #[test]
    fn widgets_see_events_before_the_style() {
        let mut iren = interactor(InteractorStyle::TrackballCamera);
        let mut sphere = SphereWidget::new();
        sphere.set_representation(SphereRepresentation::Surface);
        sphere.on();
        let id = iren.add_widget(sphere);
        let hits = std::rc::Rc::new(std::cell::Cell::new(0));
        let h = hits.clone();
        iren.widget_mut::<SphereWidget>(id)
            .unwrap()
            .add_observer(EventId::Interaction, move |_, _| h.set(h.get() + 1));

        let before = camera(&iren);
        iren.handle_event(&press(MouseButton::Left, 150.0, 150.0, false));
        iren.handle_event(&moved(160.0, 150.0));
        iren.handle_event(&release(MouseButton::Left, 160.0, 150.0));

        assert_eq!(hits.get(), 1);
        assert_eq!(camera(&iren).position(), before.position());
        assert!(iren.widget::<SphereWidget>(id).unwrap().center().x > 0.0);
    }

    #[test]
    fn presses_off_the_widget_reach_the_style() {
        let mut iren = interactor(InteractorStyle::TrackballCamera);
        let mut sphere = SphereWidget::new();
        sphere.set_center(Vec3::new(0.0, 0.0, 0.0));
        sphere.on();
        iren.add_widget(sphere);

        let before = camera(&iren);
        iren.handle_event(&press(MouseButton::Left, 10.0, 10.0, false));
        iren.handle_event(&moved(40.0, 10.0));
        assert_ne!(camera(&iren).position(), before.position());
    }

    #[test]
    fn widget_geometry_is_painted_as_an_overlay() {
        let mut iren = interactor(InteractorStyle::TrackballCamera);
        let mut sphere = SphereWidget::new();
        sphere.on();
        iren.add_widget(sphere);
        let drawings = iren.widget_drawings();
        assert_eq!(drawings.len(), 1);
        assert_eq!(drawings[0].renderer, RendererId(0));

        iren.paint();
        assert!(!iren.draw_list.items().is_empty());
    }

    #[test]
    fn window_observers_can_change_the_scene() {
        let mut iren = interactor(InteractorStyle::TrackballCamera);
        let mut slider = SliderWidget::new();
        slider.set_maximum(4.0);
        slider.on();
        let id = iren.add_widget(slider);
        assert!(!iren.add_widget_observer::<SphereWidget>(id, EventId::Interaction, |_, _| {}));
        assert!(iren.add_widget_observer::<SliderWidget>(id, EventId::Interaction, |s, window| {
            let first = window.first_renderer().unwrap();
            window.renderer_mut(first).unwrap().actor_mut(0).unwrap().property.opacity = s.value() / 4.0;
        }));

        // Default slider track: (30, 270) to (270, 270); a press halfway jumps there.
        assert!(iren.handle_event(&press(MouseButton::Left, 150.0, 270.0, false)));
        let id0 = iren.render_window().first_renderer().unwrap();
        let opacity = iren.render_window().renderer(id0).unwrap().actors()[0].property.opacity;
        assert!((opacity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn slider_is_painted_as_flat_overlay() {
        let mut iren = interactor(InteractorStyle::TrackballCamera);
        let mut slider = SliderWidget::new();
        slider.on();
        iren.add_widget(slider);
        let drawings = iren.widget_drawings();
        assert_eq!(drawings.len(), 1);
        assert!(drawings[0].actors.is_empty());
        assert!(drawings[0].overlays.iter().any(|o| matches!(o, Overlay::Segment { .. })));

        iren.paint();
        let lines = iren.draw_list.items().iter().filter(|it| matches!(it.cmd, DrawCmd::Line(_))).count();
        assert_eq!(lines, 4);
    }

    #[test]
    fn failed_run_keeps_the_interactor() {
        let mut iren = interactor(InteractorStyle::TrackballCamera);
        let mut sphere = SphereWidget::new();
        sphere.on();
        let id = iren.add_widget(sphere);
        iren.render_window_mut().set_window_name("kept");
        iren.handle_event(&press(MouseButton::Right, 10.0, 10.0, false));

        let config = RuntimeConfig {
            title: "kept".to_owned(),
            initial_size: LogicalSize::new(300.0, 300.0),
            resizable: true,
        };
        let err = iren.run_with(config, |_, _, _| Err(anyhow::anyhow!("no display"))).unwrap_err();

        assert!(matches!(err, VizError::Runtime(_)));
        assert_eq!(iren.render_window().window_name(), "kept");
        assert!(iren.widget::<SphereWidget>(id).is_some());
        assert_eq!(iren.motion, Motion::None);
        assert!(iren.is_initialized());
    }

    #[test]
    fn downcast_to_the_wrong_type_fails() {
        struct Dummy;
        impl Widget for Dummy {
            fn enabled(&self) -> bool {
                false
            }
            fn renderer(&self) -> Option<RendererId> {
                None
            }
            fn set_renderer(&mut self, _: RendererId) {}
            fn process_event(&mut self, _: &InteractionEvent, _: &RenderWindow) -> crate::event::EventResult {
                crate::event::EventResult::Ignored
            }
            fn build(&self) -> Vec<Actor> {
                Vec::new()
            }
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }
        }
        let mut iren = interactor(InteractorStyle::TrackballCamera);
        let id = iren.add_widget(Dummy);
        assert!(iren.widget_mut::<SphereWidget>(id).is_none());
        assert!(iren.widget_mut::<Dummy>(id).is_some());
    }

    #[test]
    fn key_events_translate_only_on_first_press() {
        let pressed = InputEvent::Key {
            key: Key::Q,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        };
        assert!(matches!(translate(&pressed), Some(InteractionEvent::KeyPress { key: Key::Q, .. })));
        let repeat = InputEvent::Key {
            key: Key::Q,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: true,
        };
        assert_eq!(translate(&repeat), None);
    }
}
