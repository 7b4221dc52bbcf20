use vizkit_engine::coords::Vec2;
use vizkit_engine::input::{Key, Modifiers, MouseButton};

/// Input routed to widgets and interactor styles.
///
/// Positions are logical pixels with the origin at the window's top-left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InteractionEvent {
    ButtonPress { button: MouseButton, pos: Vec2, modifiers: Modifiers },
    ButtonRelease { button: MouseButton, pos: Vec2, modifiers: Modifiers },
    PointerMove { pos: Vec2 },
    /// Positive `notches` roll the wheel forward (away from the user).
    Wheel { notches: f32, pos: Vec2 },
    KeyPress { key: Key, modifiers: Modifiers },
}

impl InteractionEvent {
    /// Pointer position carried by the event, if any.
    pub fn pos(&self) -> Option<Vec2> {
        match self {
            InteractionEvent::ButtonPress { pos, .. }
            | InteractionEvent::ButtonRelease { pos, .. }
            | InteractionEvent::PointerMove { pos }
            | InteractionEvent::Wheel { pos, .. } => Some(*pos),
            InteractionEvent::KeyPress { .. } => None,
        }
    }
}

/// Result of offering an event to a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Handled; the interactor style does not see it.
    Consumed,
    Ignored,
}

impl EventResult {
    #[inline]
    pub fn is_consumed(self) -> bool {
        self == EventResult::Consumed
    }
}
