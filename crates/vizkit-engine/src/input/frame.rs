use super::types::InputEvent;

/// Input events accumulated since the previous frame, in arrival order.
///
/// `InputState` holds what persists between frames (pointer position,
/// modifiers, focus).
#[derive(Debug, Default)]
pub struct InputFrame {
    pub events: Vec<InputEvent>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }
}
