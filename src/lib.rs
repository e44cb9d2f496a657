//! Keyboard-to-Gamepad Translator
//!
//! Reads key events from a physical keyboard and drives a virtual uinput
//! gamepad: mapped keys become buttons, and four direction keys become a
//! digital d-pad on two axes.

pub mod config;
pub mod gamepad;
pub mod keyboard;
pub mod keys;
pub mod pump;
pub mod shutdown;
pub mod translator;

pub use config::{AxisId, Button, ButtonBinding, DpadConfig, GamepadConfig};
pub use gamepad::{EventSink, GamepadError, GamepadHandle, VirtualGamepad, AXIS_MAX, AXIS_MIN};
pub use pump::{EventPump, KeySource, PumpError, PumpExit, RawKeyEvent};
pub use shutdown::Shutdown;
pub use translator::{
    AxisEmission, AxisValue, ButtonMapping, Direction, DirectionState, DpadKeys, KeyAction,
    KeyEvent, MappingError, OutputEvent, Translator,
};
