//! Key event → gamepad event translation
//!
//! Non-directional keys are forwarded 1:1 to buttons through a fixed table.
//! The four d-pad keys feed a [`DirectionState`] from which the two axis
//! values are recomputed on every change. Holding both directions of an
//! axis cancels to neutral, the same as holding neither.

use crate::config::{AxisId, Button};
use crate::keys::key_name;
use evdev::Key;
use std::collections::HashMap;
use thiserror::Error;

/// Key assignment errors, detected when the translator is built
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("Key {key} is bound to more than one button")]
    DuplicateButtonKey { key: String },
    #[error("Key {key} is assigned to more than one d-pad direction")]
    DuplicateDpadKey { key: String },
    #[error("Key {key} is bound to button {button:?} and also used as a d-pad direction")]
    ButtonDpadOverlap { key: String, button: Button },
}

/// What happened to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Released,
    Pressed,
    Repeated,
}

impl KeyAction {
    /// Classify a raw `EV_KEY` value. Anything other than 0 or 1 is a repeat.
    pub fn from_value(value: i32) -> Self {
        match value {
            0 => KeyAction::Released,
            1 => KeyAction::Pressed,
            _ => KeyAction::Repeated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: Key,
    pub action: KeyAction,
}

impl KeyEvent {
    pub fn new(code: Key, action: KeyAction) -> Self {
        Self { code, action }
    }

    pub fn pressed(code: Key) -> Self {
        Self::new(code, KeyAction::Pressed)
    }

    pub fn released(code: Key) -> Self {
        Self::new(code, KeyAction::Released)
    }
}

/// D-pad axis value, always one of -1, 0, +1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisValue {
    Negative,
    Neutral,
    Positive,
}

impl AxisValue {
    /// Combine the two opposing keys of one axis
    pub fn from_pair(negative: bool, positive: bool) -> Self {
        match (negative, positive) {
            (true, false) => AxisValue::Negative,
            (false, true) => AxisValue::Positive,
            _ => AxisValue::Neutral,
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            AxisValue::Negative => -1,
            AxisValue::Neutral => 0,
            AxisValue::Positive => 1,
        }
    }
}

/// An event to emit on the virtual gamepad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEvent {
    Button { button: Button, pressed: bool },
    Axis { axis: AxisId, value: AxisValue },
}

/// Immutable key → button table
#[derive(Debug, Clone, Default)]
pub struct ButtonMapping {
    buttons: HashMap<Key, Button>,
}

impl ButtonMapping {
    /// Build from (key, button) pairs; a key may appear only once
    pub fn from_bindings(
        bindings: impl IntoIterator<Item = (Key, Button)>,
    ) -> Result<Self, MappingError> {
        let mut buttons = HashMap::new();
        for (key, button) in bindings {
            if buttons.insert(key, button).is_some() {
                return Err(MappingError::DuplicateButtonKey { key: key_name(key) });
            }
        }
        Ok(Self { buttons })
    }

    pub fn get(&self, key: Key) -> Option<Button> {
        self.buttons.get(&key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, Button)> + '_ {
        self.buttons.iter().map(|(k, b)| (*k, *b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// The axis this direction contributes to
    pub fn axis(self) -> AxisId {
        match self {
            Direction::Left | Direction::Right => AxisId::Horizontal,
            Direction::Up | Direction::Down => AxisId::Vertical,
        }
    }
}

/// Keys assigned to the four d-pad directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpadKeys {
    pub left: Key,
    pub right: Key,
    pub up: Key,
    pub down: Key,
}

impl DpadKeys {
    pub fn arrows() -> Self {
        Self {
            left: Key::KEY_LEFT,
            right: Key::KEY_RIGHT,
            up: Key::KEY_UP,
            down: Key::KEY_DOWN,
        }
    }

    fn all(&self) -> [(Key, Direction); 4] {
        [
            (self.left, Direction::Left),
            (self.right, Direction::Right),
            (self.up, Direction::Up),
            (self.down, Direction::Down),
        ]
    }

    pub fn direction_of(&self, key: Key) -> Option<Direction> {
        self.all().into_iter().find(|(k, _)| *k == key).map(|(_, d)| d)
    }
}

/// Which d-pad keys are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl DirectionState {
    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
        }
    }

    pub fn axis_value(&self, axis: AxisId) -> AxisValue {
        match axis {
            AxisId::Horizontal => AxisValue::from_pair(self.left, self.right),
            AxisId::Vertical => AxisValue::from_pair(self.up, self.down),
        }
    }
}

/// When a recomputed axis value is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisEmission {
    /// Every d-pad key event emits its axis, changed or not
    Always,
    /// Only emit when the value differs from the last one emitted
    OnChange,
}

/// Stateful translator from keyboard events to gamepad events
#[derive(Debug, Clone)]
pub struct Translator {
    buttons: ButtonMapping,
    dpad: DpadKeys,
    state: DirectionState,
    emission: AxisEmission,
    /// Last value emitted per axis (horizontal, vertical)
    last_emitted: [AxisValue; 2],
}

impl Translator {
    /// Create a translator, rejecting key assignments that overlap
    pub fn new(buttons: ButtonMapping, dpad: DpadKeys) -> Result<Self, MappingError> {
        let dirs = dpad.all();
        for (i, (key, _)) in dirs.iter().enumerate() {
            if dirs[i + 1..].iter().any(|(other, _)| other == key) {
                return Err(MappingError::DuplicateDpadKey { key: key_name(*key) });
            }
            if let Some(button) = buttons.get(*key) {
                return Err(MappingError::ButtonDpadOverlap {
                    key: key_name(*key),
                    button,
                });
            }
        }

        Ok(Self {
            buttons,
            dpad,
            state: DirectionState::default(),
            emission: AxisEmission::Always,
            last_emitted: [AxisValue::Neutral; 2],
        })
    }

    /// Suppress axis events whose value has not changed
    pub fn emit_on_change_only(mut self) -> Self {
        self.emission = AxisEmission::OnChange;
        self
    }

    pub fn emission(&self) -> AxisEmission {
        self.emission
    }

    pub fn direction_state(&self) -> &DirectionState {
        &self.state
    }

    /// Route one key event. Yields at most one output event.
    pub fn dispatch(&mut self, event: KeyEvent) -> Option<OutputEvent> {
        if event.action == KeyAction::Repeated {
            return None;
        }

        if let Some(out) = self.translate_button(event) {
            return Some(out);
        }

        let direction = self.dpad.direction_of(event.code)?;
        self.handle_directional_key(direction, event.action)
    }

    /// Table lookup for button keys; touches no state. Repeats yield nothing.
    pub fn translate_button(&self, event: KeyEvent) -> Option<OutputEvent> {
        let pressed = match event.action {
            KeyAction::Pressed => true,
            KeyAction::Released => false,
            KeyAction::Repeated => return None,
        };
        let button = self.buttons.get(event.code)?;
        Some(OutputEvent::Button { button, pressed })
    }

    /// Record a d-pad key and recompute its axis
    pub fn handle_directional_key(
        &mut self,
        direction: Direction,
        action: KeyAction,
    ) -> Option<OutputEvent> {
        self.state.set(direction, action != KeyAction::Released);

        let axis = direction.axis();
        let value = self.state.axis_value(axis);
        let slot = match axis {
            AxisId::Horizontal => 0,
            AxisId::Vertical => 1,
        };

        if self.emission == AxisEmission::OnChange && self.last_emitted[slot] == value {
            return None;
        }
        self.last_emitted[slot] = value;

        Some(OutputEvent::Axis { axis, value })
    }
}
