//! Process-wide automation switch.
//!
//! A single owned state value behind thread-safe accessors — not an ambient
//! global. Not persisted: the service restarts in the stopped state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct AutomationSwitch {
    running: Arc<AtomicBool>,
}

impl AutomationSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_starts_stopped() {
        assert!(!AutomationSwitch::new().is_running());
    }

    #[test]
    fn test_switch_flips_and_is_shared_across_clones() {
        let switch = AutomationSwitch::new();
        let clone = switch.clone();
        switch.start();
        assert!(clone.is_running());
        clone.stop();
        assert!(!switch.is_running());
    }
}
