//! Navigator double that records every target it receives.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::navigation::{NavigationError, NavigationTarget, Navigator};

/// Records targets in arrival order. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    targets: Arc<Mutex<Vec<NavigationTarget>>>,
}

impl RecordingNavigator {
    /// Snapshot of the targets recorded so far.
    #[must_use]
    pub fn targets(&self) -> Vec<NavigationTarget> {
        self.targets
            .lock()
            .expect("navigator mutex poisoned")
            .clone()
    }

    /// Polls until at least `expected` targets arrived or two seconds pass.
    pub fn wait_for(&self, expected: usize) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if self.targets().len() >= expected {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: &NavigationTarget) -> Result<(), NavigationError> {
        self.targets
            .lock()
            .expect("navigator mutex poisoned")
            .push(target.clone());
        Ok(())
    }
}
