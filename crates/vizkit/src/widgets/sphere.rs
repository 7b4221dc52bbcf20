use std::any::Any;

use vizkit_engine::coords::{Rect, Vec2};
use vizkit_engine::input::MouseButton;

use crate::actor::{Actor, Property, Representation};
use crate::camera::Camera;
use crate::event::{EventResult, InteractionEvent};
use crate::math::{Bounds, Vec3};
use crate::observer::{self, EventId, ObserverTag, Observers};
use crate::polydata::SphereSource;
use crate::render_window::RenderWindow;
use crate::renderer::RendererId;

use super::Widget;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum SphereRepresentation {
    Off,
    #[default]
    Wireframe,
    Surface,
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum State {
    Idle,
    Moving { last: Vec2 },
    Scaling { last: Vec2 },
}

/// A sphere that can be dragged around (left button) and resized (right
/// button) in the view plane.
///
/// Fires `StartInteraction` when grabbed, `Interaction` once per pointer
/// move while held and `EndInteraction` on release.
pub struct SphereWidget {
    center: Vec3,
    radius: f64,
    representation: SphereRepresentation,
    theta_resolution: u32,
    phi_resolution: u32,
    sphere_property: Property,
    selected_sphere_property: Property,
    translation: bool,
    scale: bool,
    enabled: bool,
    renderer: Option<RendererId>,
    state: State,
    observers: Observers<SphereWidget>,
    fired: Vec<EventId>,
}

impl Default for SphereWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl SphereWidget {
    pub fn new() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 0.5,
            representation: SphereRepresentation::Wireframe,
            theta_resolution: 16,
            phi_resolution: 8,
            sphere_property: Property::default(),
            selected_sphere_property: Property { color: [1.0, 0.0, 0.0], ..Property::default() },
            translation: true,
            scale: true,
            enabled: false,
            renderer: None,
            state: State::Idle,
            observers: Observers::new(),
            fired: Vec::new(),
        }
    }

    pub fn on(&mut self) {
        if !self.enabled {
            log::debug!("sphere widget enabled");
        }
        self.enabled = true;
    }

    pub fn off(&mut self) {
        self.enabled = false;
        self.state = State::Idle;
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn set_center(&mut self, center: impl Into<Vec3>) {
        self.center = center.into();
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Non-positive radii are ignored.
    pub fn set_radius(&mut self, radius: f64) {
        if radius > 0.0 && radius.is_finite() {
            self.radius = radius;
        }
    }

    pub fn representation(&self) -> SphereRepresentation {
        self.representation
    }

    pub fn set_representation(&mut self, representation: SphereRepresentation) {
        self.representation = representation;
    }

    pub fn set_theta_resolution(&mut self, n: u32) {
        self.theta_resolution = n.max(3);
    }

    pub fn set_phi_resolution(&mut self, n: u32) {
        self.phi_resolution = n.max(3);
    }

    pub fn sphere_property(&self) -> &Property {
        &self.sphere_property
    }

    pub fn sphere_property_mut(&mut self) -> &mut Property {
        &mut self.sphere_property
    }

    pub fn selected_sphere_property_mut(&mut self) -> &mut Property {
        &mut self.selected_sphere_property
    }

    /// Enables dragging the center.
    pub fn set_translation(&mut self, on: bool) {
        self.translation = on;
    }

    /// Enables resizing with the right button.
    pub fn set_scale(&mut self, on: bool) {
        self.scale = on;
    }

    /// True while the sphere is grabbed.
    pub fn is_active(&self) -> bool {
        self.state != State::Idle
    }

    pub fn add_observer(
        &mut self,
        event: EventId,
        callback: impl FnMut(&SphereWidget, EventId) + 'static,
    ) -> ObserverTag {
        self.observers.add(event, callback)
    }

    pub fn remove_observer(&mut self, tag: ObserverTag) -> bool {
        self.observers.remove(tag)
    }

    /// Centers the sphere in `bounds`, sized to its smallest non-zero half extent.
    pub fn place_widget(&mut self, bounds: &Bounds) {
        if bounds.is_empty() {
            return;
        }
        self.center = bounds.center();
        let b = &bounds.0;
        let half = [(b[1] - b[0]) * 0.5, (b[3] - b[2]) * 0.5, (b[5] - b[4]) * 0.5];
        if let Some(r) = half.into_iter().filter(|h| *h > 0.0).reduce(f64::min) {
            self.radius = r;
        }
    }

    fn fire(&mut self, event: EventId) {
        observer::fire(self, |w| &mut w.observers, event);
        self.fired.push(event);
    }

    /// Camera and viewport of the renderer this widget lives in.
    fn view<'w>(&self, window: &'w RenderWindow) -> Option<(&'w Camera, Rect)> {
        let id = self.renderer?;
        Some((window.renderer(id)?.active_camera(), window.viewport_rect(id)?))
    }

    fn hit(&self, pos: Vec2, camera: &Camera, rect: Rect) -> bool {
        let right = camera.direction_of_projection().cross(camera.view_up()).normalized_or_zero();
        let (Some(c), Some(edge)) = (
            camera.world_to_display(self.center, rect),
            camera.world_to_display(self.center + right * self.radius, rect),
        ) else {
            return false;
        };
        (pos - c.pos).length() <= (edge.pos - c.pos).length()
    }

    /// World motion between two display points at the center's depth.
    fn world_motion(&self, from: Vec2, to: Vec2, camera: &Camera, rect: Rect) -> Vec3 {
        let depth = camera.depth_of(self.center);
        camera.display_to_world(to, depth, rect) - camera.display_to_world(from, depth, rect)
    }
}

impl Widget for SphereWidget {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn renderer(&self) -> Option<RendererId> {
        self.renderer
    }

    fn set_renderer(&mut self, renderer: RendererId) {
        self.renderer = Some(renderer);
    }

    fn process_event(&mut self, event: &InteractionEvent, window: &RenderWindow) -> EventResult {
        if !self.enabled || self.representation == SphereRepresentation::Off {
            return EventResult::Ignored;
        }
        let Some((camera, rect)) = self.view(window) else {
            return EventResult::Ignored;
        };

        match (*event, self.state) {
            (InteractionEvent::ButtonPress { button, pos, .. }, State::Idle) => {
                let next = match button {
                    MouseButton::Left if self.translation => State::Moving { last: pos },
                    MouseButton::Right if self.scale => State::Scaling { last: pos },
                    _ => return EventResult::Ignored,
                };
                if !self.hit(pos, camera, rect) {
                    return EventResult::Ignored;
                }
                self.state = next;
                self.fire(EventId::StartInteraction);
                EventResult::Consumed
            }
            (InteractionEvent::PointerMove { pos }, State::Moving { last }) => {
                let delta = self.world_motion(last, pos, camera, rect);
                self.center += delta;
                self.state = State::Moving { last: pos };
                self.fire(EventId::Interaction);
                EventResult::Consumed
            }
            (InteractionEvent::PointerMove { pos }, State::Scaling { last }) => {
                let motion = self.world_motion(last, pos, camera, rect).length();
                let ratio = motion / self.radius;
                let factor = if pos.y < last.y { 1.0 + ratio } else { 1.0 - ratio };
                if factor > 0.0 {
                    self.radius *= factor;
                }
                self.state = State::Scaling { last: pos };
                self.fire(EventId::Interaction);
                EventResult::Consumed
            }
            (InteractionEvent::ButtonRelease { button, .. }, State::Moving { .. })
                if button == MouseButton::Left =>
            {
                self.state = State::Idle;
                self.fire(EventId::EndInteraction);
                EventResult::Consumed
            }
            (InteractionEvent::ButtonRelease { button, .. }, State::Scaling { .. })
                if button == MouseButton::Right =>
            {
                self.state = State::Idle;
                self.fire(EventId::EndInteraction);
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    fn build(&self) -> Vec<Actor> {
        let representation = match self.representation {
            SphereRepresentation::Off => return Vec::new(),
            SphereRepresentation::Wireframe => Representation::Wireframe,
            SphereRepresentation::Surface => Representation::Surface,
        };
        if !self.enabled {
            return Vec::new();
        }
        let source = SphereSource {
            center: self.center,
            radius: self.radius,
            theta_resolution: self.theta_resolution,
            phi_resolution: self.phi_resolution,
        };
        let mut property =
            if self.is_active() { self.selected_sphere_property.clone() } else { self.sphere_property.clone() };
        property.representation = representation;
        vec![Actor::new(source.output()).with_property(property)]
    }

    fn take_fired(&mut self) -> Vec<EventId> {
        std::mem::take(&mut self.fired)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
