//! Widgets: interactive props that react to pointer input before the
//! interactor style does.

mod slider;
mod sphere;

use std::any::Any;

use vizkit_engine::coords::{Rect, Vec2};

use crate::actor::Actor;
use crate::colors::Rgb;
use crate::event::{EventResult, InteractionEvent};
use crate::observer::EventId;
use crate::render_window::RenderWindow;
use crate::renderer::RendererId;
use crate::text::TextActor;

pub use slider::{AnimationMode, SliderColors, SliderWidget};
pub use sphere::{SphereRepresentation, SphereWidget};

/// Screen-space shape a widget draws on top of its renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// Thick segment with butt ends, in logical pixels (top-left origin).
    Segment { p0: Vec2, p1: Vec2, width: f32, color: Rgb },
    /// Text placed in the renderer's display coordinates.
    Text(TextActor),
}

/// What one widget adds to its renderer in a frame.
#[derive(Debug, Clone)]
pub(crate) struct WidgetDrawing {
    pub renderer: RendererId,
    pub actors: Vec<Actor>,
    pub overlays: Vec<Overlay>,
}

/// Index of a widget inside its [`crate::RenderWindowInteractor`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct WidgetId(pub(crate) usize);

/// An interactive prop owned by the interactor.
pub trait Widget: Any {
    fn enabled(&self) -> bool;

    /// Renderer the widget draws in and picks against.
    fn renderer(&self) -> Option<RendererId>;

    fn set_renderer(&mut self, renderer: RendererId);

    /// Offers `event` to the widget. Only called while enabled.
    fn process_event(&mut self, event: &InteractionEvent, window: &RenderWindow) -> EventResult;

    /// Actors representing the widget's current state.
    fn build(&self) -> Vec<Actor>;

    /// Flat shapes drawn over the renderer occupying `viewport`.
    fn build_overlay(&self, _viewport: Rect) -> Vec<Overlay> {
        Vec::new()
    }

    /// Events fired since the last call, oldest first.
    fn take_fired(&mut self) -> Vec<EventId> {
        Vec::new()
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
