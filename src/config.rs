//! Configuration structures for the keyboard-to-gamepad translator
//!
//! The config is a TOML file read once at startup. Keys are written as bare
//! key names (e.g. `"Z"`, `"Esc"`, `"Left"`) resolved via [`crate::keys`].

use crate::keys::{key_from_name, key_name};
use crate::translator::{ButtonMapping, DpadKeys, MappingError, Translator};
use evdev::Key;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::{Path, PathBuf};

/// Logical gamepad buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Button {
    A,
    B,
    X,
    Y,
    LeftBumper,
    RightBumper,
    LeftTrigger,
    RightTrigger,
    Select,
    Start,
    Guide,
    LeftStick,
    RightStick,
}

impl Button {
    /// Buttons the virtual gamepad always advertises, mapped or not
    pub const BASE_SET: &'static [Button] = &[
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
        Button::LeftBumper,
        Button::RightBumper,
        Button::Start,
        Button::Select,
    ];
}

/// The two d-pad axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisId {
    Horizontal,
    Vertical,
}

impl AxisId {
    /// Get display name for the axis
    pub fn display_name(&self) -> &'static str {
        match self {
            AxisId::Horizontal => "ABS_X",
            AxisId::Vertical => "ABS_Y",
        }
    }

    pub const ALL: &'static [AxisId] = &[AxisId::Horizontal, AxisId::Vertical];
}

// ---------------------------------------------------------------------------
// Custom serde for evdev keys — serialize as bare name
// ---------------------------------------------------------------------------

fn serialize_key<S: Serializer>(key: &Key, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&key_name(*key))
}

/// Accepts a key name string or a raw integer code. Strings resolve as names first.
fn deserialize_key<'de, D: Deserializer<'de>>(d: D) -> Result<Key, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum KeyRepr {
        Name(String),
        Code(u16),
    }

    match KeyRepr::deserialize(d)? {
        KeyRepr::Name(name) => key_from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown key name: \"{name}\""))),
        KeyRepr::Code(code) => Ok(Key::new(code)),
    }
}

/// One keyboard key driving one gamepad button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonBinding {
    #[serde(serialize_with = "serialize_key", deserialize_with = "deserialize_key")]
    pub key: Key,
    pub button: Button,
}

impl ButtonBinding {
    pub fn new(key: Key, button: Button) -> Self {
        Self { key, button }
    }
}

/// D-pad key assignment and emission policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpadConfig {
    #[serde(serialize_with = "serialize_key", deserialize_with = "deserialize_key")]
    pub left: Key,
    #[serde(serialize_with = "serialize_key", deserialize_with = "deserialize_key")]
    pub right: Key,
    #[serde(serialize_with = "serialize_key", deserialize_with = "deserialize_key")]
    pub up: Key,
    #[serde(serialize_with = "serialize_key", deserialize_with = "deserialize_key")]
    pub down: Key,
    /// Re-emit the axis value on every d-pad key event, even when unchanged
    #[serde(default = "default_true")]
    pub emit_unchanged: bool,
}

impl Default for DpadConfig {
    fn default() -> Self {
        Self {
            left: Key::KEY_LEFT,
            right: Key::KEY_RIGHT,
            up: Key::KEY_UP,
            down: Key::KEY_DOWN,
            emit_unchanged: true,
        }
    }
}

impl DpadConfig {
    pub fn keys(&self) -> DpadKeys {
        DpadKeys {
            left: self.left,
            right: self.right,
            up: self.up,
            down: self.down,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Complete translator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamepadConfig {
    /// Name for the virtual gamepad device
    #[serde(default = "default_device_name")]
    pub device_name: String,
    /// Keyboard event node; auto-detected when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<PathBuf>,
    /// Exclusively grab the keyboard while translating
    #[serde(default)]
    pub grab: bool,
    #[serde(default)]
    pub dpad: DpadConfig,
    #[serde(default = "default_buttons")]
    pub buttons: Vec<ButtonBinding>,
}

fn default_device_name() -> String {
    "Virtual Gamepad".to_string()
}

fn default_buttons() -> Vec<ButtonBinding> {
    vec![
        ButtonBinding::new(Key::KEY_Z, Button::A), // jump
        ButtonBinding::new(Key::KEY_C, Button::B), // throw
        ButtonBinding::new(Key::KEY_X, Button::X), // pick up
        ButtonBinding::new(Key::KEY_V, Button::Y), // special
        ButtonBinding::new(Key::KEY_A, Button::RightBumper), // map
        ButtonBinding::new(Key::KEY_ESC, Button::Select), // pause
    ]
}

impl Default for GamepadConfig {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
            keyboard: None,
            grab: false,
            dpad: DpadConfig::default(),
            buttons: default_buttons(),
        }
    }
}

impl GamepadConfig {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kbd-gamepad")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: GamepadConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Build the immutable key → button table
    pub fn button_mapping(&self) -> Result<ButtonMapping, MappingError> {
        ButtonMapping::from_bindings(self.buttons.iter().map(|b| (b.key, b.button)))
    }

    /// Check the key assignments
    pub fn validate(&self) -> Result<(), MappingError> {
        self.build_translator().map(|_| ())
    }

    /// Build a translator for this config, rejecting overlapping key assignments
    pub fn build_translator(&self) -> Result<Translator, MappingError> {
        let translator = Translator::new(self.button_mapping()?, self.dpad.keys())?;
        Ok(if self.dpad.emit_unchanged {
            translator
        } else {
            translator.emit_on_change_only()
        })
    }

    /// Buttons the virtual device must advertise: the base set plus every mapped button
    pub fn device_buttons(&self) -> Vec<Button> {
        let mut buttons: Vec<Button> = Button::BASE_SET
            .iter()
            .copied()
            .chain(self.buttons.iter().map(|b| b.button))
            .collect();
        buttons.sort();
        buttons.dedup();
        buttons
    }
}
