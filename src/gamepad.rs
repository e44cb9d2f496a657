//! Virtual gamepad device using evdev/uinput
//!
//! Creates a virtual gamepad that appears as a standard controller to games
//! and applications, with a digital d-pad on `ABS_X`/`ABS_Y`.

use crate::config::{AxisId, Button};
use crate::translator::OutputEvent;
use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AbsInfo, AbsoluteAxisType, AttributeSet, EventType, InputEvent, Key, UinputAbsSetup,
};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// D-pad axis range
pub const AXIS_MIN: i32 = -1;
pub const AXIS_MAX: i32 = 1;

/// Errors from virtual gamepad operations
#[derive(Debug, Error)]
pub enum GamepadError {
    #[error("Failed to create virtual device: {0}")]
    CreateDevice(#[source] std::io::Error),
    #[error("Failed to emit event: {0}")]
    EmitEvent(#[source] std::io::Error),
}

/// Where translated events go
pub trait EventSink {
    fn emit(&mut self, event: &OutputEvent) -> Result<(), GamepadError>;
}

/// Virtual gamepad device
pub struct VirtualGamepad {
    device: VirtualDevice,
}

impl VirtualGamepad {
    /// Create a new virtual gamepad
    ///
    /// # Arguments
    /// * `name` - Device name (shown in `evtest` and game controller settings)
    /// * `buttons` - Which buttons to enable on the device
    pub fn new(name: &str, buttons: &[Button]) -> Result<Self, GamepadError> {
        let mut keys = AttributeSet::<Key>::new();
        for &button in buttons {
            keys.insert(button_to_code(button));
        }

        let mut builder = VirtualDeviceBuilder::new()
            .map_err(GamepadError::CreateDevice)?
            .name(name)
            .with_keys(&keys)
            .map_err(GamepadError::CreateDevice)?;

        for &axis in AxisId::ALL {
            let abs_setup = UinputAbsSetup::new(
                axis_id_to_code(axis),
                AbsInfo::new(0, AXIS_MIN, AXIS_MAX, 0, 0, 0),
            );
            builder = builder
                .with_absolute_axis(&abs_setup)
                .map_err(GamepadError::CreateDevice)?;
        }

        let device = builder.build().map_err(GamepadError::CreateDevice)?;
        Ok(Self { device })
    }

    /// Get the device path (e.g., /dev/input/eventX)
    pub fn device_path(&mut self) -> Option<PathBuf> {
        self.device
            .enumerate_dev_nodes_blocking()
            .ok()?
            .next()?
            .ok()
    }
}

impl EventSink for VirtualGamepad {
    /// Write one event; evdev terminates the batch with `SYN_REPORT`
    fn emit(&mut self, event: &OutputEvent) -> Result<(), GamepadError> {
        self.device
            .emit(&[to_input_event(event)])
            .map_err(GamepadError::EmitEvent)
    }
}

/// Shared owner of the virtual gamepad.
///
/// The pump emits through a clone of the handle while the main thread keeps
/// another for [`GamepadHandle::teardown`]. Once torn down, emits are no-ops.
pub struct GamepadHandle<G: EventSink = VirtualGamepad> {
    inner: Arc<Mutex<Option<G>>>,
}

impl<G: EventSink> Clone for GamepadHandle<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: EventSink> GamepadHandle<G> {
    pub fn new(gamepad: G) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(gamepad))),
        }
    }

    /// Destroy the virtual device. Returns false if it was already released.
    pub fn teardown(&self) -> bool {
        match self.inner.lock().take() {
            Some(gamepad) => {
                drop(gamepad);
                info!("Virtual gamepad released");
                true
            }
            None => false,
        }
    }
}

impl<G: EventSink> EventSink for GamepadHandle<G> {
    fn emit(&mut self, event: &OutputEvent) -> Result<(), GamepadError> {
        match self.inner.lock().as_mut() {
            Some(gamepad) => gamepad.emit(event),
            None => Ok(()),
        }
    }
}

/// Convert an output event to the raw evdev event
pub fn to_input_event(event: &OutputEvent) -> InputEvent {
    match *event {
        OutputEvent::Button { button, pressed } => InputEvent::new(
            EventType::KEY,
            button_to_code(button).code(),
            i32::from(pressed),
        ),
        OutputEvent::Axis { axis, value } => {
            InputEvent::new(EventType::ABSOLUTE, axis_id_to_code(axis).0, value.as_i32())
        }
    }
}

/// Convert our Button to the evdev button code
pub fn button_to_code(button: Button) -> Key {
    match button {
        Button::A => Key::BTN_SOUTH,
        Button::B => Key::BTN_EAST,
        Button::X => Key::BTN_NORTH,
        Button::Y => Key::BTN_WEST,
        Button::LeftBumper => Key::BTN_TL,
        Button::RightBumper => Key::BTN_TR,
        Button::LeftTrigger => Key::BTN_TL2,
        Button::RightTrigger => Key::BTN_TR2,
        Button::Select => Key::BTN_SELECT,
        Button::Start => Key::BTN_START,
        Button::Guide => Key::BTN_MODE,
        Button::LeftStick => Key::BTN_THUMBL,
        Button::RightStick => Key::BTN_THUMBR,
    }
}

/// Convert our AxisId to evdev AbsoluteAxisType
pub fn axis_id_to_code(axis: AxisId) -> AbsoluteAxisType {
    match axis {
        AxisId::Horizontal => AbsoluteAxisType::ABS_X,
        AxisId::Vertical => AbsoluteAxisType::ABS_Y,
    }
}
