/// Keyboard key identifier.
///
/// Only keys the interactor styles react to get their own variant; the rest
/// map to `Key::Unknown` with the platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    Unknown(u32),
}

impl Key {
    /// Returns the lowercase ASCII letter for letter keys.
    pub fn letter(self) -> Option<char> {
        use Key::*;
        const LETTERS: [Key; 26] = [
            A, B, C, D, E, F, G, H, I, J, K, L, M,
            N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
        ];
        LETTERS
            .iter()
            .position(|k| *k == self)
            .map(|i| (b'a' + i as u8) as char)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Modifier keys state.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Mouse wheel delta.
///
/// `Line` corresponds to "scroll lines" style input; `Pixel` is high precision.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

impl MouseWheelDelta {
    /// Vertical motion in wheel notches (pixel deltas count 40 px per notch).
    pub fn notches_y(self) -> f32 {
        match self {
            MouseWheelDelta::Line { y, .. } => y,
            MouseWheelDelta::Pixel { y, .. } => y / 40.0,
        }
    }
}

/// Pointer move event in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f32,
    pub y: f32,
}

/// Pointer button event, carrying the pointer position at the time of the press.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: MouseButtonState,
    pub x: f32,
    pub y: f32,
    pub modifiers: Modifiers,
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    PointerMoved(PointerMoveEvent),
    PointerButton(PointerButtonEvent),

    MouseWheel {
        delta: MouseWheelDelta,
        modifiers: Modifiers,
    },

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_map_to_ascii() {
        assert_eq!(Key::A.letter(), Some('a'));
        assert_eq!(Key::Q.letter(), Some('q'));
        assert_eq!(Key::Z.letter(), Some('z'));
        assert_eq!(Key::Escape.letter(), None);
    }

    #[test]
    fn wheel_pixels_convert_to_notches() {
        assert_eq!(MouseWheelDelta::Line { x: 0.0, y: -2.0 }.notches_y(), -2.0);
        assert_eq!(MouseWheelDelta::Pixel { x: 0.0, y: 80.0 }.notches_y(), 2.0);
    }
}
