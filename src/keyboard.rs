//! Physical keyboard discovery and opening

use evdev::{Device, Key};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum KeyboardError {
    #[error("Failed to open keyboard {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to grab keyboard {path}: {source}")]
    Grab {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No keyboard found under /dev/input (are you in the 'input' group?)")]
    NotFound,
}

/// A keyboard event node found during enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardInfo {
    pub path: PathBuf,
    pub name: String,
}

/// Keys a device must report to count as a keyboard
const REQUIRED_KEYS: [Key; 3] = [Key::KEY_A, Key::KEY_Z, Key::KEY_ENTER];

fn is_keyboard(device: &Device) -> bool {
    device
        .supported_keys()
        .is_some_and(|keys| REQUIRED_KEYS.iter().all(|k| keys.contains(*k)))
}

/// Human-readable keyboard name
pub fn keyboard_name(device: &Device) -> String {
    device.name().unwrap_or("Unknown").to_string()
}

/// Numeric suffix of an `eventN` node; `None` for any other name
fn event_index(path: &Path) -> Option<u32> {
    path.file_name()?
        .to_str()?
        .strip_prefix("event")?
        .parse()
        .ok()
}

/// Order `event2` before `event10`; non-event nodes go last, by path
fn sort_by_event_index(keyboards: &mut [KeyboardInfo]) {
    keyboards.sort_by_key(|kb| (event_index(&kb.path).unwrap_or(u32::MAX), kb.path.clone()));
}

/// List every keyboard-like device, sorted by event number
pub fn list_keyboards() -> Vec<KeyboardInfo> {
    let mut found: Vec<KeyboardInfo> = evdev::enumerate()
        .filter(|(_, device)| is_keyboard(device))
        .map(|(path, device)| KeyboardInfo {
            path,
            name: keyboard_name(&device),
        })
        .collect();
    sort_by_event_index(&mut found);
    found
}

/// Open the keyboard at `path`, or the first one found when `path` is `None`
pub fn open_keyboard(path: Option<&Path>, grab: bool) -> Result<(Device, PathBuf), KeyboardError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let first = list_keyboards()
                .into_iter()
                .next()
                .ok_or(KeyboardError::NotFound)?;
            debug!("Auto-detected keyboard {:?} at {}", first.name, first.path.display());
            first.path
        }
    };

    let mut device = Device::open(&path).map_err(|source| KeyboardError::Open {
        path: path.clone(),
        source,
    })?;

    if grab {
        device.grab().map_err(|source| KeyboardError::Grab {
            path: path.clone(),
            source,
        })?;
        info!("Grabbed keyboard exclusively");
    }

    Ok((device, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(path: &str) -> KeyboardInfo {
        KeyboardInfo {
            path: PathBuf::from(path),
            name: "kbd".to_string(),
        }
    }

    #[test]
    fn test_event_index() {
        assert_eq!(event_index(Path::new("/dev/input/event2")), Some(2));
        assert_eq!(event_index(Path::new("/dev/input/event10")), Some(10));
        assert_eq!(event_index(Path::new("/dev/input/mouse0")), None);
        assert_eq!(event_index(Path::new("/dev/input/eventX")), None);
    }

    #[test]
    fn test_sort_is_numeric() {
        let mut found = vec![
            info("/dev/input/event10"),
            info("/dev/input/by-id/kbd"),
            info("/dev/input/event2"),
            info("/dev/input/event1"),
        ];
        sort_by_event_index(&mut found);
        let paths: Vec<_> = found.iter().map(|kb| kb.path.to_str().unwrap()).collect();
        assert_eq!(
            paths,
            [
                "/dev/input/event1",
                "/dev/input/event2",
                "/dev/input/event10",
                "/dev/input/by-id/kbd",
            ]
        );
    }
}
