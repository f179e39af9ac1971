//! # Raw Input Contract
//!
//! The device layer and the translators agree on one argument layout per raw
//! message type:
//!
//! | type | arguments |
//! |---|---|
//! | `MSG_RAW_KEY_DOWN` / `MSG_RAW_KEY_UP` | `Integer(key code)`, `Integer(key state flags)` |
//! | `MSG_RAW_MOUSE_*_BUTTON_DOWN` / `_UP` / `_DOUBLE_CLICK` | `Pixel(position)`, `Integer(modifier mask)`, `Timestamp(ms)` |
//! | `MSG_RAW_MOUSE_POSITION` | `Pixel(position)`, `Integer(modifier mask)` |
//! | `MSG_RAW_MOUSE_WHEEL` | `Pixel(position)`, `Integer(modifier mask)`, `Integer(delta)` |
//!
//! [`RawInput`] is the typed form of one device event and appends the matching
//! message onto a stream.

use crate::error::MetaMapError;
use crate::message_type::MessageType;
use crate::stream::MessageStream;
use crate::types::ICoord2D;
use serde::{Deserialize, Serialize};
use bitflags::bitflags;
use std::fmt;

// ============================================================================
// Keys
// ============================================================================

macro_rules! mappable_keys {
    ( $( $variant:ident = $code:literal => $name:literal ),* $(,)? ) => {
        /// A key that can appear in a binding, with its scan code.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum MappableKey {
            $( $variant ),*
        }

        impl MappableKey {
            pub const ALL: &'static [MappableKey] = &[ $( MappableKey::$variant ),* ];

            /// Scan code carried in raw key messages.
            pub fn code(self) -> i32 {
                match self {
                    $( MappableKey::$variant => $code ),*
                }
            }

            /// Binding-table name, e.g. `KEY_UP`.
            pub fn name(self) -> &'static str {
                match self {
                    $( MappableKey::$variant => $name ),*
                }
            }

            pub fn from_code(code: i32) -> Option<Self> {
                match code {
                    $( $code => Some(MappableKey::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

mappable_keys! {
    None = 0x00 => "KEY_NONE",
    Esc = 0x01 => "KEY_ESC",
    Digit1 = 0x02 => "KEY_1",
    Digit2 = 0x03 => "KEY_2",
    Digit3 = 0x04 => "KEY_3",
    Digit4 = 0x05 => "KEY_4",
    Digit5 = 0x06 => "KEY_5",
    Digit6 = 0x07 => "KEY_6",
    Digit7 = 0x08 => "KEY_7",
    Digit8 = 0x09 => "KEY_8",
    Digit9 = 0x0A => "KEY_9",
    Digit0 = 0x0B => "KEY_0",
    Minus = 0x0C => "KEY_MINUS",
    Equal = 0x0D => "KEY_EQUAL",
    Backspace = 0x0E => "KEY_BACKSPACE",
    Tab = 0x0F => "KEY_TAB",
    Q = 0x10 => "KEY_Q",
    W = 0x11 => "KEY_W",
    E = 0x12 => "KEY_E",
    R = 0x13 => "KEY_R",
    T = 0x14 => "KEY_T",
    Y = 0x15 => "KEY_Y",
    U = 0x16 => "KEY_U",
    I = 0x17 => "KEY_I",
    O = 0x18 => "KEY_O",
    P = 0x19 => "KEY_P",
    LeftBracket = 0x1A => "KEY_LBRACKET",
    RightBracket = 0x1B => "KEY_RBRACKET",
    Enter = 0x1C => "KEY_ENTER",
    LeftControl = 0x1D => "KEY_LCTRL",
    A = 0x1E => "KEY_A",
    S = 0x1F => "KEY_S",
    D = 0x20 => "KEY_D",
    F = 0x21 => "KEY_F",
    G = 0x22 => "KEY_G",
    H = 0x23 => "KEY_H",
    J = 0x24 => "KEY_J",
    K = 0x25 => "KEY_K",
    L = 0x26 => "KEY_L",
    Semicolon = 0x27 => "KEY_SEMICOLON",
    Apostrophe = 0x28 => "KEY_APOSTROPHE",
    Tick = 0x29 => "KEY_TICK",
    LeftShift = 0x2A => "KEY_LSHIFT",
    Backslash = 0x2B => "KEY_BACKSLASH",
    Z = 0x2C => "KEY_Z",
    X = 0x2D => "KEY_X",
    C = 0x2E => "KEY_C",
    V = 0x2F => "KEY_V",
    B = 0x30 => "KEY_B",
    N = 0x31 => "KEY_N",
    M = 0x32 => "KEY_M",
    Comma = 0x33 => "KEY_COMMA",
    Period = 0x34 => "KEY_PERIOD",
    Slash = 0x35 => "KEY_SLASH",
    RightShift = 0x36 => "KEY_RSHIFT",
    KeypadStar = 0x37 => "KEY_KPSTAR",
    LeftAlt = 0x38 => "KEY_LALT",
    Space = 0x39 => "KEY_SPACE",
    CapsLock = 0x3A => "KEY_CAPS",
    F1 = 0x3B => "KEY_F1",
    F2 = 0x3C => "KEY_F2",
    F3 = 0x3D => "KEY_F3",
    F4 = 0x3E => "KEY_F4",
    F5 = 0x3F => "KEY_F5",
    F6 = 0x40 => "KEY_F6",
    F7 = 0x41 => "KEY_F7",
    F8 = 0x42 => "KEY_F8",
    F9 = 0x43 => "KEY_F9",
    F10 = 0x44 => "KEY_F10",
    NumLock = 0x45 => "KEY_NUM",
    ScrollLock = 0x46 => "KEY_SCROLL",
    F11 = 0x57 => "KEY_F11",
    F12 = 0x58 => "KEY_F12",
    KeypadEnter = 0x9C => "KEY_KPENTER",
    RightControl = 0x9D => "KEY_RCTRL",
    RightAlt = 0xB8 => "KEY_RALT",
    Home = 0xC7 => "KEY_HOME",
    Up = 0xC8 => "KEY_UP",
    PageUp = 0xC9 => "KEY_PGUP",
    Left = 0xCB => "KEY_LEFT",
    Right = 0xCD => "KEY_RIGHT",
    End = 0xCF => "KEY_END",
    Down = 0xD0 => "KEY_DOWN",
    PageDown = 0xD1 => "KEY_PGDN",
    Insert = 0xD2 => "KEY_INS",
    Delete = 0xD3 => "KEY_DEL",
}

impl Default for MappableKey {
    fn default() -> Self {
        MappableKey::None
    }
}

impl MappableKey {
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }
}

impl fmt::Display for MappableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for MappableKey {
    type Error = MetaMapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_name(&value).ok_or(MetaMapError::UnknownKey(value))
    }
}

impl From<MappableKey> for String {
    fn from(value: MappableKey) -> Self {
        value.name().to_string()
    }
}

// ============================================================================
// Key state flags
// ============================================================================

bitflags! {
    /// Transition and modifier flags carried by raw key messages. Left and
    /// right modifiers are reported separately.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeyState: u32 {
        const UP = 0x0001;
        const DOWN = 0x0002;
        const LCONTROL = 0x0004;
        const RCONTROL = 0x0008;
        const LSHIFT = 0x0010;
        const RSHIFT = 0x0020;
        const LALT = 0x0040;
        const RALT = 0x0080;
        const AUTOREPEAT = 0x0100;
        const CAPSLOCK = 0x0400;

        const CONTROL = Self::LCONTROL.bits() | Self::RCONTROL.bits();
        const SHIFT = Self::LSHIFT.bits() | Self::RSHIFT.bits();
        const ALT = Self::LALT.bits() | Self::RALT.bits();
    }
}

impl Default for KeyState {
    fn default() -> Self {
        Self::NONE
    }
}

impl KeyState {
    pub const NONE: KeyState = KeyState::empty();

    pub fn is_down(self) -> bool {
        self.intersects(Self::DOWN)
    }

    pub fn is_up(self) -> bool {
        self.intersects(Self::UP)
    }

    pub fn is_autorepeat(self) -> bool {
        self.intersects(Self::AUTOREPEAT)
    }

    /// Normalized modifier mask: left and right collapsed, caps lock ignored.
    pub fn modifiers(self) -> ModifierMask {
        let mut mask = ModifierMask::NONE;
        mask.set(ModifierMask::CTRL, self.intersects(Self::CONTROL));
        mask.set(ModifierMask::SHIFT, self.intersects(Self::SHIFT));
        mask.set(ModifierMask::ALT, self.intersects(Self::ALT));
        mask
    }

    /// Left-hand flags for every modifier in `mask`.
    pub fn from_modifiers(mask: ModifierMask) -> Self {
        let mut state = Self::NONE;
        state.set(Self::LCONTROL, mask.contains(ModifierMask::CTRL));
        state.set(Self::LSHIFT, mask.contains(ModifierMask::SHIFT));
        state.set(Self::LALT, mask.contains(ModifierMask::ALT));
        state
    }
}

// ============================================================================
// Modifier mask
// ============================================================================

bitflags! {
    /// Normalized ctrl/alt/shift mask used by bindings and mouse messages.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(try_from = "String", into = "String")]
    pub struct ModifierMask: u8 {
        const CTRL = 0x01;
        const ALT = 0x02;
        const SHIFT = 0x04;
    }
}

impl Default for ModifierMask {
    fn default() -> Self {
        Self::NONE
    }
}

impl ModifierMask {
    pub const NONE: ModifierMask = ModifierMask::empty();

    /// Config names for every combination.
    const NAMES: [(u8, &'static str); 8] = [
        (0x00, "NONE"),
        (0x01, "CTRL"),
        (0x02, "ALT"),
        (0x04, "SHIFT"),
        (0x03, "CTRL_ALT"),
        (0x05, "SHIFT_CTRL"),
        (0x06, "SHIFT_ALT"),
        (0x07, "SHIFT_ALT_CTRL"),
    ];

    pub fn name(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(bits, _)| *bits == self.bits())
            .map(|(_, name)| *name)
            .unwrap_or("NONE")
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(bits, _)| ModifierMask::from_bits_truncate(*bits))
    }
}

impl fmt::Display for ModifierMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for ModifierMask {
    type Error = MetaMapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_name(&value).ok_or(MetaMapError::UnknownModifiers(value))
    }
}

impl From<ModifierMask> for String {
    fn from(value: ModifierMask) -> Self {
        value.name().to_string()
    }
}

// ============================================================================
// Mouse buttons
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Which raw event a button produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonTransition {
    Down,
    /// A down the device already recognized as the second of a double click.
    DoubleClick,
    Up,
}

impl MouseButton {
    pub const ALL: [MouseButton; 3] = [MouseButton::Left, MouseButton::Middle, MouseButton::Right];

    /// Position in per-button state arrays.
    pub fn index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Middle => 1,
            MouseButton::Right => 2,
        }
    }

    /// Decodes a raw mouse button message type.
    pub fn from_raw(kind: MessageType) -> Option<(MouseButton, ButtonTransition)> {
        use ButtonTransition::*;
        use MessageType as T;
        let decoded = match kind {
            T::RawMouseLeftButtonDown => (MouseButton::Left, Down),
            T::RawMouseLeftDoubleClick => (MouseButton::Left, DoubleClick),
            T::RawMouseLeftButtonUp => (MouseButton::Left, Up),
            T::RawMouseMiddleButtonDown => (MouseButton::Middle, Down),
            T::RawMouseMiddleDoubleClick => (MouseButton::Middle, DoubleClick),
            T::RawMouseMiddleButtonUp => (MouseButton::Middle, Up),
            T::RawMouseRightButtonDown => (MouseButton::Right, Down),
            T::RawMouseRightDoubleClick => (MouseButton::Right, DoubleClick),
            T::RawMouseRightButtonUp => (MouseButton::Right, Up),
            _ => return None,
        };
        Some(decoded)
    }

    pub fn raw_type(self, transition: ButtonTransition) -> MessageType {
        use ButtonTransition::*;
        use MessageType as T;
        match (self, transition) {
            (MouseButton::Left, Down) => T::RawMouseLeftButtonDown,
            (MouseButton::Left, DoubleClick) => T::RawMouseLeftDoubleClick,
            (MouseButton::Left, Up) => T::RawMouseLeftButtonUp,
            (MouseButton::Middle, Down) => T::RawMouseMiddleButtonDown,
            (MouseButton::Middle, DoubleClick) => T::RawMouseMiddleDoubleClick,
            (MouseButton::Middle, Up) => T::RawMouseMiddleButtonUp,
            (MouseButton::Right, Down) => T::RawMouseRightButtonDown,
            (MouseButton::Right, DoubleClick) => T::RawMouseRightDoubleClick,
            (MouseButton::Right, Up) => T::RawMouseRightButtonUp,
        }
    }

    /// Refined click type for this button.
    pub fn click_type(self, double: bool) -> MessageType {
        use MessageType as T;
        match (self, double) {
            (MouseButton::Left, false) => T::MouseLeftClick,
            (MouseButton::Left, true) => T::MouseLeftDoubleClick,
            (MouseButton::Middle, false) => T::MouseMiddleClick,
            (MouseButton::Middle, true) => T::MouseMiddleDoubleClick,
            (MouseButton::Right, false) => T::MouseRightClick,
            (MouseButton::Right, true) => T::MouseRightDoubleClick,
        }
    }
}

// ============================================================================
// Device events
// ============================================================================

/// One device event, in typed form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RawInput {
    KeyDown {
        key: MappableKey,
        #[serde(default)]
        modifiers: ModifierMask,
        #[serde(default)]
        autorepeat: bool,
    },
    KeyUp {
        key: MappableKey,
        #[serde(default)]
        modifiers: ModifierMask,
    },
    MouseMove {
        x: i32,
        y: i32,
        #[serde(default)]
        modifiers: ModifierMask,
    },
    MouseDown {
        button: MouseButton,
        x: i32,
        y: i32,
        #[serde(default)]
        modifiers: ModifierMask,
        #[serde(default)]
        time: u32,
    },
    MouseDoubleClick {
        button: MouseButton,
        x: i32,
        y: i32,
        #[serde(default)]
        modifiers: ModifierMask,
        #[serde(default)]
        time: u32,
    },
    MouseUp {
        button: MouseButton,
        x: i32,
        y: i32,
        #[serde(default)]
        modifiers: ModifierMask,
        #[serde(default)]
        time: u32,
    },
    Wheel {
        x: i32,
        y: i32,
        delta: i32,
        #[serde(default)]
        modifiers: ModifierMask,
    },
}

impl RawInput {
    /// Message type this event produces.
    pub fn message_type(&self) -> MessageType {
        match *self {
            RawInput::KeyDown { .. } => MessageType::RawKeyDown,
            RawInput::KeyUp { .. } => MessageType::RawKeyUp,
            RawInput::MouseMove { .. } => MessageType::RawMousePosition,
            RawInput::MouseDown { button, .. } => button.raw_type(ButtonTransition::Down),
            RawInput::MouseDoubleClick { button, .. } => button.raw_type(ButtonTransition::DoubleClick),
            RawInput::MouseUp { button, .. } => button.raw_type(ButtonTransition::Up),
            RawInput::Wheel { .. } => MessageType::RawMouseWheel,
        }
    }

    /// Appends the matching raw message, arguments laid out per the table
    /// in the module docs.
    pub fn append_to(&self, stream: &mut MessageStream) {
        let kind = self.message_type();
        let msg = stream.append_message(kind);
        match *self {
            RawInput::KeyDown { key, modifiers, autorepeat } => {
                let mut state = KeyState::DOWN | KeyState::from_modifiers(modifiers);
                if autorepeat {
                    state = state | KeyState::AUTOREPEAT;
                }
                msg.append_integer(key.code()).append_integer(state.bits() as i32);
            }
            RawInput::KeyUp { key, modifiers } => {
                let state = KeyState::UP | KeyState::from_modifiers(modifiers);
                msg.append_integer(key.code()).append_integer(state.bits() as i32);
            }
            RawInput::MouseMove { x, y, modifiers } => {
                msg.append_pixel(ICoord2D::new(x, y))
                    .append_integer(modifiers.bits() as i32);
            }
            RawInput::MouseDown { x, y, modifiers, time, .. }
            | RawInput::MouseDoubleClick { x, y, modifiers, time, .. }
            | RawInput::MouseUp { x, y, modifiers, time, .. } => {
                msg.append_pixel(ICoord2D::new(x, y))
                    .append_integer(modifiers.bits() as i32)
                    .append_timestamp(time);
            }
            RawInput::Wheel { x, y, delta, modifiers } => {
                msg.append_pixel(ICoord2D::new(x, y))
                    .append_integer(modifiers.bits() as i32)
                    .append_integer(delta);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::ArgumentDataType;
    use crate::types::PlayerIndex;

    #[test]
    fn test_key_codes_round_trip() {
        for key in MappableKey::ALL {
            assert_eq!(MappableKey::from_code(key.code()), Some(*key));
            assert_eq!(MappableKey::from_name(key.name()), Some(*key));
        }
        assert_eq!(MappableKey::Up.code(), 0xC8);
        assert_eq!(MappableKey::from_code(0xFF), None);
    }

    #[test]
    fn test_key_state_normalizes_modifiers() {
        let state = KeyState::DOWN | KeyState::RCONTROL | KeyState::LSHIFT | KeyState::CAPSLOCK;
        assert!(state.is_down());
        assert!(!state.is_up());
        assert_eq!(state.modifiers(), ModifierMask::CTRL | ModifierMask::SHIFT);
        assert_eq!(state.modifiers().name(), "SHIFT_CTRL");
        assert_eq!((KeyState::RALT | KeyState::UP).modifiers(), ModifierMask::ALT);
    }

    #[test]
    fn test_flag_bits_from_the_wire() {
        // Undefined bits on a raw message are dropped, not kept.
        let state = KeyState::from_bits_truncate(0x0002 | 0x0004 | 0x8000);
        assert_eq!(state, KeyState::DOWN | KeyState::LCONTROL);
        assert!(state.contains(KeyState::DOWN));
        assert!(!state.contains(KeyState::CONTROL));
        assert!(state.intersects(KeyState::CONTROL));

        let mask = ModifierMask::SHIFT | ModifierMask::ALT;
        assert_eq!(KeyState::from_modifiers(mask).modifiers(), mask);
        assert_eq!(KeyState::default(), KeyState::NONE);
        assert_eq!(ModifierMask::default().name(), "NONE");
        assert_eq!(ModifierMask::from_bits_truncate(0xFF), ModifierMask::all());
    }

    #[test]
    fn test_modifier_names() {
        assert_eq!(ModifierMask::from_name("SHIFT_ALT_CTRL").map(|m| m.bits()), Some(7));
        assert_eq!(ModifierMask::from_name("HYPER"), None);
        assert!(matches!(
            ModifierMask::try_from("HYPER".to_string()),
            Err(MetaMapError::UnknownModifiers(_))
        ));
    }

    #[test]
    fn test_mouse_types_decode() {
        for button in MouseButton::ALL {
            for transition in [ButtonTransition::Down, ButtonTransition::DoubleClick, ButtonTransition::Up] {
                let kind = button.raw_type(transition);
                assert!(kind.is_raw_mouse());
                assert_eq!(MouseButton::from_raw(kind), Some((button, transition)));
            }
        }
        assert_eq!(MouseButton::from_raw(MessageType::RawMousePosition), None);
    }

    #[test]
    fn test_raw_input_argument_layout() {
        let mut stream = MessageStream::new(PlayerIndex(0));
        RawInput::KeyDown {
            key: MappableKey::Up,
            modifiers: ModifierMask::SHIFT,
            autorepeat: true,
        }
        .append_to(&mut stream);
        RawInput::MouseUp {
            button: MouseButton::Right,
            x: 5,
            y: 6,
            modifiers: ModifierMask::CTRL,
            time: 900,
        }
        .append_to(&mut stream);

        let messages: Vec<_> = stream.iter().map(|(_, m)| m.clone()).collect();
        assert_eq!(messages[0].kind(), MessageType::RawKeyDown);
        assert_eq!(messages[0].integer(0), MappableKey::Up.code());
        let state = KeyState::from_bits_truncate(messages[0].integer(1) as u32);
        assert!(state.is_down() && state.is_autorepeat());
        assert_eq!(state.modifiers(), ModifierMask::SHIFT);

        assert_eq!(messages[1].kind(), MessageType::RawMouseRightButtonUp);
        assert_eq!(messages[1].pixel(0), ICoord2D::new(5, 6));
        assert_eq!(messages[1].integer(1), ModifierMask::CTRL.bits() as i32);
        assert_eq!(messages[1].argument_data_type(2), ArgumentDataType::Timestamp);
        assert_eq!(messages[1].timestamp(2), 900);
    }
}
