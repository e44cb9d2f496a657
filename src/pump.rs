//! Event pump: blocking keyboard reads → translator → gamepad
//!
//! Runs on its own worker thread. Each key event is fully translated and
//! emitted before the next is looked at, and the shutdown flag is checked
//! between events. A read that is already blocked is not interrupted.

use crate::gamepad::{EventSink, GamepadError};
use crate::keys::key_name;
use crate::shutdown::Shutdown;
use crate::translator::{KeyAction, KeyEvent, OutputEvent, Translator};
use evdev::{Device, InputEventKind, Key};
use std::io;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum PumpError {
    #[error("Failed to read keyboard events: {0}")]
    Read(#[source] io::Error),
    #[error(transparent)]
    Emit(#[from] GamepadError),
}

/// A key event as read from the device, before classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub code: Key,
    pub value: i32,
}

impl RawKeyEvent {
    pub fn new(code: Key, value: i32) -> Self {
        Self { code, value }
    }

    pub fn to_key_event(self) -> KeyEvent {
        KeyEvent::new(self.code, KeyAction::from_value(self.value))
    }
}

/// Blocking source of keyboard events
pub trait KeySource {
    /// Block until the next batch is available and append its key events to `out`.
    ///
    /// Returns `Ok(false)` once the source is closed.
    fn read_keys(&mut self, out: &mut Vec<RawKeyEvent>) -> io::Result<bool>;
}

/// `ENODEV` on Linux: the event node went away (keyboard unplugged)
const ENODEV: i32 = 19;

fn is_disconnect(err: &io::Error) -> bool {
    err.raw_os_error() == Some(ENODEV)
}

impl KeySource for Device {
    /// A disconnected keyboard reports as closed; other read errors propagate
    fn read_keys(&mut self, out: &mut Vec<RawKeyEvent>) -> io::Result<bool> {
        let events = match self.fetch_events() {
            Ok(events) => events,
            Err(e) if is_disconnect(&e) => return Ok(false),
            Err(e) => return Err(e),
        };
        for ev in events {
            if let InputEventKind::Key(key) = ev.kind() {
                out.push(RawKeyEvent::new(key, ev.value()));
            }
        }
        Ok(true)
    }
}

/// Why the pump loop ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpExit {
    Shutdown,
    SourceClosed,
}

pub struct EventPump<S, K> {
    source: S,
    translator: Translator,
    sink: K,
}

impl<S: KeySource, K: EventSink> EventPump<S, K> {
    pub fn new(source: S, translator: Translator, sink: K) -> Self {
        Self {
            source,
            translator,
            sink,
        }
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Translate and emit a single key event
    pub fn process(&mut self, event: KeyEvent) -> Result<Option<OutputEvent>, GamepadError> {
        let Some(out) = self.translator.dispatch(event) else {
            if event.action != KeyAction::Repeated {
                debug!("Ignoring key {}", key_name(event.code));
            }
            return Ok(None);
        };

        self.sink.emit(&out)?;
        log_output(event, &out);
        Ok(Some(out))
    }

    /// Pump events until shutdown is requested or the source closes
    pub fn run(&mut self, shutdown: &Shutdown) -> Result<PumpExit, PumpError> {
        let mut batch = Vec::new();

        while !shutdown.is_triggered() {
            batch.clear();
            if !self.source.read_keys(&mut batch).map_err(PumpError::Read)? {
                info!("Keyboard event source closed");
                return Ok(PumpExit::SourceClosed);
            }

            for raw in batch.iter().copied() {
                if shutdown.is_triggered() {
                    break;
                }
                self.process(raw.to_key_event())?;
            }
        }

        Ok(PumpExit::Shutdown)
    }
}

fn log_output(event: KeyEvent, out: &OutputEvent) {
    match out {
        OutputEvent::Button { button, pressed } => {
            let state = if *pressed { "pressed" } else { "released" };
            info!("Key {} {} -> Gamepad {:?}", key_name(event.code), state, button);
        }
        OutputEvent::Axis { axis, value } => {
            info!("{} updated -> {}", axis.display_name(), value.as_i32());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GamepadConfig;

    #[derive(Default)]
    struct Recorder(Vec<OutputEvent>);

    impl EventSink for Recorder {
        fn emit(&mut self, event: &OutputEvent) -> Result<(), GamepadError> {
            self.0.push(*event);
            Ok(())
        }
    }

    struct NoSource;

    impl KeySource for NoSource {
        fn read_keys(&mut self, _out: &mut Vec<RawKeyEvent>) -> io::Result<bool> {
            Ok(false)
        }
    }

    fn pump() -> EventPump<NoSource, Recorder> {
        let translator = GamepadConfig::default().build_translator().unwrap();
        EventPump::new(NoSource, translator, Recorder::default())
    }

    #[test]
    fn test_raw_value_classification() {
        let ev = RawKeyEvent::new(Key::KEY_Z, 2).to_key_event();
        assert_eq!(ev.action, KeyAction::Repeated);
        let ev = RawKeyEvent::new(Key::KEY_Z, 0).to_key_event();
        assert_eq!(ev.action, KeyAction::Released);
    }

    #[test]
    fn test_only_enodev_counts_as_disconnect() {
        assert!(is_disconnect(&io::Error::from_raw_os_error(ENODEV)));
        assert!(!is_disconnect(&io::Error::from_raw_os_error(5))); // EIO
        assert!(!is_disconnect(&io::Error::other("x")));
    }

    #[test]
    fn test_process_emits_only_translated_events() {
        let mut p = pump();
        assert!(p.process(KeyEvent::pressed(Key::KEY_Q)).unwrap().is_none());
        assert!(p.process(KeyEvent::pressed(Key::KEY_Z)).unwrap().is_some());
        assert!(p
            .process(KeyEvent::new(Key::KEY_Z, KeyAction::Repeated))
            .unwrap()
            .is_none());
        assert_eq!(p.sink().0.len(), 1);
    }

    #[test]
    fn test_run_stops_when_source_closes() {
        let mut p = pump();
        let shutdown = Shutdown::new();
        assert_eq!(p.run(&shutdown).unwrap(), PumpExit::SourceClosed);
    }

    #[test]
    fn test_run_returns_immediately_when_already_shut_down() {
        let mut p = pump();
        let shutdown = Shutdown::new();
        shutdown.trigger();
        assert_eq!(p.run(&shutdown).unwrap(), PumpExit::Shutdown);
    }
}
