//! Cooperative shutdown signal
//!
//! Set once (from the signal handler, or by the pump when its source dies),
//! polled by the pump between events and waited on by the main thread.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct Shutdown {
    triggered: AtomicBool,
    lock: Mutex<()>,
    cvar: Condvar,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown and wake every waiter. Safe to call more than once.
    pub fn trigger(&self) {
        let _guard = self.lock.lock();
        self.triggered.store(true, Ordering::SeqCst);
        self.cvar.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Block until [`Shutdown::trigger`] has been called
    pub fn wait(&self) {
        let mut guard = self.lock.lock();
        while !self.is_triggered() {
            self.cvar.wait(&mut guard);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_starts_untriggered() {
        let s = Shutdown::new();
        assert!(!s.is_triggered());
    }

    #[test]
    fn test_trigger_is_sticky() {
        let s = Shutdown::new();
        s.trigger();
        s.trigger();
        assert!(s.is_triggered());
        // Returns immediately once triggered
        s.wait();
    }

    #[test]
    fn test_wait_wakes_on_trigger_from_other_thread() {
        let s = Arc::new(Shutdown::new());
        let s2 = Arc::clone(&s);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            s2.trigger();
        });
        s.wait();
        assert!(s.is_triggered());
        handle.join().unwrap();
    }
}
