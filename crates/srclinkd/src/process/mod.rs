//! Daemon process entry point: bootstrap, listen, wait for a signal, stop.

mod shutdown;

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

pub use self::shutdown::{ShutdownError, ShutdownSignal, SystemShutdownSignal};

use crate::bootstrap::{BootstrapError, ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::lifecycle::{LifecycleError, ListenerConfig, ListenerManager};
use crate::navigation::{NavigationError, NavigationQueue, SourceRootNavigator};

const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

/// Errors surfaced while running the daemon process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Bootstrapping the daemon failed.
    #[error("daemon bootstrap failed: {source}")]
    Bootstrap {
        /// Underlying bootstrap error.
        #[source]
        source: BootstrapError,
    },
    /// The navigator could not be built or started.
    #[error("failed to start navigator: {source}")]
    Navigator {
        /// Underlying navigation error.
        #[source]
        source: NavigationError,
    },
    /// The listener could not be started.
    #[error("{source}")]
    Listener {
        /// Underlying lifecycle error.
        #[source]
        source: LifecycleError,
    },
    /// Waiting for shutdown failed.
    #[error("failed to await shutdown signal: {source}")]
    Shutdown {
        /// Underlying shutdown error.
        #[source]
        source: ShutdownError,
    },
}

impl From<BootstrapError> for LaunchError {
    fn from(source: BootstrapError) -> Self {
        Self::Bootstrap { source }
    }
}

impl From<NavigationError> for LaunchError {
    fn from(source: NavigationError) -> Self {
        Self::Navigator { source }
    }
}

impl From<LifecycleError> for LaunchError {
    fn from(source: LifecycleError) -> Self {
        Self::Listener { source }
    }
}

impl From<ShutdownError> for LaunchError {
    fn from(source: ShutdownError) -> Self {
        Self::Shutdown { source }
    }
}

/// Runs the daemon with system configuration, logging and signals.
pub fn run_daemon() -> Result<(), LaunchError> {
    run_with(
        &SystemConfigLoader,
        Arc::new(StructuredHealthReporter::new()),
        &SystemShutdownSignal,
    )
}

/// Runs the daemon with the supplied collaborators.
///
/// Blocks until `signal` returns, then stops the listener and waits for any
/// queued navigation to finish.
pub fn run_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    signal: &dyn ShutdownSignal,
) -> Result<(), LaunchError> {
    let daemon = bootstrap_with(loader, &*reporter)?;
    let navigator = SourceRootNavigator::from_config(daemon.config())?;
    let (queue, worker) = NavigationQueue::spawn(navigator)?;

    let mut manager = ListenerManager::new(queue, reporter);
    manager.start(ListenerConfig::from_config(daemon.config()))?;
    let waited = signal.wait();
    manager.stop();
    drop(manager);

    if let Err(error) = worker.join() {
        warn!(target: PROCESS_TARGET, error = %error, "navigation worker did not exit cleanly");
    }
    info!(target: PROCESS_TARGET, "daemon stopped");
    waited.map_err(LaunchError::from)
}
