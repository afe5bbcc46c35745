//! Structured health reporting for daemon lifecycle events.

use std::net::SocketAddr;
use std::sync::Arc;

use srclink_config::Config;

use crate::bootstrap::BootstrapError;
use crate::lifecycle::LifecycleError;

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked once the listener is accepting connections.
    fn listener_started(&self, addr: SocketAddr);

    /// Invoked when the listener could not be started.
    fn listener_failed(&self, error: &LifecycleError);

    /// Invoked after the listener has released its socket.
    fn listener_stopped(&self, addr: SocketAddr);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn listener_started(&self, addr: SocketAddr) {
        (**self).listener_started(addr);
    }

    fn listener_failed(&self, error: &LifecycleError) {
        (**self).listener_failed(error);
    }

    fn listener_stopped(&self, addr: SocketAddr) {
        (**self).listener_stopped(addr);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: "srclinkd::health",
            event = "bootstrap_starting",
            "starting daemon bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: "srclinkd::health",
            event = "bootstrap_succeeded",
            address = %config.listener_address(),
            source_roots = config.source_roots().len(),
            log_filter = %config.log_filter(),
            log_format = ?config.log_format(),
            "daemon bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: "srclinkd::health",
            event = "bootstrap_failed",
            error = %error,
            "daemon bootstrap failed"
        );
    }

    fn listener_started(&self, addr: SocketAddr) {
        tracing::info!(
            target: "srclinkd::health",
            event = "listener_started",
            addr = %addr,
            "listener started"
        );
    }

    fn listener_failed(&self, error: &LifecycleError) {
        tracing::error!(
            target: "srclinkd::health",
            event = "listener_failed",
            error = %error,
            "listener failed to start"
        );
    }

    fn listener_stopped(&self, addr: SocketAddr) {
        tracing::info!(
            target: "srclinkd::health",
            event = "listener_stopped",
            addr = %addr,
            "listener stopped"
        );
    }
}
