//! Listener lifecycle: the `Idle`/`Listening` state machine.
//!
//! [`ListenerManager`] owns at most one [`ListenerSession`]. Starting binds
//! the configured address and launches the accept loop; stopping signals the
//! loop, waits for it to release the socket and returns to `Idle`. Only bind
//! failures reach the caller; everything that happens per connection is
//! logged and contained inside the session.

mod config;

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

pub use self::config::ListenerConfig;

use crate::health::HealthReporter;
use crate::navigation::NavigationQueue;
use crate::request::OpenRequestHandler;
use crate::transport::{ListenerError, ListenerHandle, SocketListener};

const LIFECYCLE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::lifecycle");

/// Observable listener state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    /// No socket is bound.
    Idle,
    /// A session is accepting connections.
    Listening,
}

impl fmt::Display for ListenerState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => formatter.write_str("idle"),
            Self::Listening => formatter.write_str("listening"),
        }
    }
}

/// Errors surfaced by lifecycle transitions.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// `start` was called while a session is already listening.
    #[error("listener already running on {addr}")]
    AlreadyRunning {
        /// Address of the active session.
        addr: SocketAddr,
    },
    /// The configured address could not be bound.
    #[error("could not start listener on {address}: {source}")]
    Bind {
        /// Address as configured, e.g. `localhost:9123`.
        address: String,
        /// Underlying listener error.
        #[source]
        source: ListenerError,
    },
    /// The bound socket could not be handed to the accept thread.
    #[error("could not start accepting on {address}: {source}")]
    Start {
        /// Address as configured.
        address: String,
        /// Underlying listener error.
        #[source]
        source: ListenerError,
    },
}

/// One bind-to-close lifetime of the listening socket.
pub struct ListenerSession {
    config: ListenerConfig,
    handle: ListenerHandle,
}

impl ListenerSession {
    /// Settings the session was started with.
    #[must_use]
    pub fn config(&self) -> &ListenerConfig {
        &self.config
    }

    /// Bound address, with any ephemeral port resolved.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.handle.local_addr()
    }
}

impl fmt::Debug for ListenerSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ListenerSession")
            .field("config", &self.config)
            .field("local_addr", &self.local_addr())
            .finish()
    }
}

/// Owns the listener session and drives its state transitions.
pub struct ListenerManager {
    queue: NavigationQueue,
    reporter: Arc<dyn HealthReporter>,
    session: Option<ListenerSession>,
}

impl ListenerManager {
    /// Creates an idle manager dispatching navigation targets to `queue`.
    #[must_use]
    pub fn new(queue: NavigationQueue, reporter: Arc<dyn HealthReporter>) -> Self {
        Self {
            queue,
            reporter,
            session: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ListenerState {
        if self.session.is_some() {
            ListenerState::Listening
        } else {
            ListenerState::Idle
        }
    }

    /// Bound address of the active session.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.session.as_ref().map(ListenerSession::local_addr)
    }

    /// The active session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&ListenerSession> {
        self.session.as_ref()
    }

    /// Binds `config`'s address and starts accepting connections.
    ///
    /// Returns the bound address. On failure the manager stays `Idle`, or
    /// keeps its current session when one is already running.
    pub fn start(&mut self, config: ListenerConfig) -> Result<SocketAddr, LifecycleError> {
        let result = self.start_session(config);
        match &result {
            Ok(addr) => self.reporter.listener_started(*addr),
            Err(error) => self.reporter.listener_failed(error),
        }
        result
    }

    fn start_session(&mut self, config: ListenerConfig) -> Result<SocketAddr, LifecycleError> {
        if let Some(session) = &self.session {
            return Err(LifecycleError::AlreadyRunning {
                addr: session.local_addr(),
            });
        }

        let listener =
            SocketListener::bind(config.host(), config.port()).map_err(|source| {
                LifecycleError::Bind {
                    address: config.address(),
                    source,
                }
            })?;
        let handler = Arc::new(OpenRequestHandler::new(&config, self.queue.clone()));
        let handle = listener
            .start(handler)
            .map_err(|source| LifecycleError::Start {
                address: config.address(),
                source,
            })?;
        let addr = handle.local_addr();
        info!(
            target: LIFECYCLE_TARGET,
            addr = %addr,
            secret_configured = !config.secret().is_empty(),
            secret_policy = %config.secret_policy(),
            "started listening"
        );
        self.session = Some(ListenerSession { config, handle });
        Ok(addr)
    }

    /// Stops the active session and returns to `Idle`.
    ///
    /// Does nothing when already idle. Waits for the accept thread to release
    /// the socket so the port can be bound again immediately.
    pub fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let addr = session.local_addr();
        session.handle.shutdown();
        if let Err(error) = session.handle.join() {
            warn!(
                target: LIFECYCLE_TARGET,
                addr = %addr,
                error = %error,
                "listener did not shut down cleanly"
            );
        }
        info!(target: LIFECYCLE_TARGET, addr = %addr, "stopped listening");
        self.reporter.listener_stopped(addr);
    }
}

impl Drop for ListenerManager {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for ListenerManager {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ListenerManager")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
