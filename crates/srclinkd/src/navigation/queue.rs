//! Channel-backed queue feeding the navigation worker thread.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, warn};

use super::{NAVIGATION_TARGET, NavigationError, NavigationTarget, Navigator};

const WORKER_THREAD_NAME: &str = "srclink-navigation";

/// Sending half of the navigation queue.
///
/// Clones share the same worker. The worker exits once every clone has been
/// dropped and the queued targets have been drained.
#[derive(Debug, Clone)]
pub struct NavigationQueue {
    sender: Sender<NavigationTarget>,
}

impl NavigationQueue {
    /// Starts a worker thread that hands each submitted target to `navigator`.
    pub fn spawn<N>(navigator: N) -> Result<(Self, NavigationWorker), NavigationError>
    where
        N: Navigator + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_owned())
            .spawn(move || drain(&receiver, &navigator))
            .map_err(|source| NavigationError::Spawn { source })?;
        Ok((Self { sender }, NavigationWorker { handle }))
    }

    /// Queues `target` without waiting for the navigator.
    pub fn submit(&self, target: NavigationTarget) -> Result<(), NavigationError> {
        self.sender
            .send(target)
            .map_err(|_| NavigationError::QueueClosed)
    }
}

/// Handle to the navigation worker thread.
#[derive(Debug)]
pub struct NavigationWorker {
    handle: thread::JoinHandle<()>,
}

impl NavigationWorker {
    /// Waits for the worker to drain its queue.
    ///
    /// Only returns once every [`NavigationQueue`] clone has been dropped.
    pub fn join(self) -> Result<(), NavigationError> {
        self.handle
            .join()
            .map_err(|_| NavigationError::WorkerPanic)
    }
}

fn drain(receiver: &Receiver<NavigationTarget>, navigator: &dyn Navigator) {
    for target in receiver {
        debug!(
            target: NAVIGATION_TARGET,
            name = %target.fully_qualified_name,
            line = target.line_number,
            "navigating"
        );
        match panic::catch_unwind(AssertUnwindSafe(|| navigator.navigate(&target))) {
            Ok(Ok(())) => {}
            Ok(Err(error)) => warn!(
                target: NAVIGATION_TARGET,
                error = %error,
                name = %target.fully_qualified_name,
                line = target.line_number,
                "navigation failed"
            ),
            Err(payload) => warn!(
                target: NAVIGATION_TARGET,
                panic = panic_message(payload.as_ref()),
                name = %target.fully_qualified_name,
                line = target.line_number,
                "navigator panicked"
            ),
        }
    }
    debug!(target: NAVIGATION_TARGET, "navigation queue closed");
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
