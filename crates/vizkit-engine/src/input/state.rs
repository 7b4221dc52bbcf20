use super::frame::InputFrame;
use super::types::{InputEvent, Modifiers, PointerButtonEvent, PointerMoveEvent};

/// Current input state for a single window: modifiers, focus and pointer
/// position. Every applied event is also queued on an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,
}

impl InputState {
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,
            InputEvent::Focused(f) => self.focused = *f,
            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => self.pointer_pos = Some((*x, *y)),
            InputEvent::PointerLeft => self.pointer_pos = None,
            InputEvent::Key { modifiers, .. } | InputEvent::MouseWheel { modifiers, .. } => {
                self.modifiers = *modifiers;
            }
            InputEvent::PointerButton(PointerButtonEvent { x, y, modifiers, .. }) => {
                self.pointer_pos = Some((*x, *y));
                self.modifiers = *modifiers;
            }
        }
        frame.push_event(ev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{MouseButton, MouseButtonState};

    fn button(state: MouseButtonState, x: f32, y: f32, shift: bool) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x,
            y,
            modifiers: Modifiers { shift, ..Modifiers::default() },
        })
    }

    #[test]
    fn buttons_move_the_pointer_and_queue_every_event() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();

        st.apply_event(&mut fr, button(MouseButtonState::Pressed, 3.0, 4.0, true));
        assert_eq!(st.pointer_pos, Some((3.0, 4.0)));
        assert!(st.modifiers.shift);

        st.apply_event(&mut fr, button(MouseButtonState::Released, 5.0, 4.0, false));
        assert_eq!(st.pointer_pos, Some((5.0, 4.0)));
        assert!(!st.modifiers.shift);
        assert_eq!(fr.events.len(), 2);
    }

    #[test]
    fn focus_is_tracked() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        st.apply_event(&mut fr, InputEvent::Focused(true));
        assert!(st.focused);
        st.apply_event(&mut fr, InputEvent::Focused(false));
        assert!(!st.focused);
    }

    #[test]
    fn pointer_left_forgets_position() {
        let mut st = InputState::default();
        let mut fr = InputFrame::default();
        st.apply_event(&mut fr, InputEvent::PointerMoved(PointerMoveEvent { x: 1.0, y: 2.0 }));
        st.apply_event(&mut fr, InputEvent::PointerLeft);
        assert_eq!(st.pointer_pos, None);
        fr.clear();
        assert!(fr.events.is_empty());
    }
}
