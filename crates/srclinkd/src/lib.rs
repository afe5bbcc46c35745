//! Loopback listener that turns browser "open source" links into editor
//! navigation.
//!
//! A browser extension rewrites stack-trace style references such as
//! `com.example:Foo.java:42` into `GET /open?src=...&p=...` requests against a
//! port on the local machine. This crate accepts those requests, answers every
//! one of them with a bare `200 OK`, and only then decides whether the request
//! is worth acting on: the shared secret in `p` is checked, the `src` locator
//! is decoded and parsed, and a [`NavigationTarget`] is handed to the
//! configured [`Navigator`].
//!
//! The listening socket is owned by a [`ListenerManager`], which moves between
//! [`ListenerState::Idle`] and [`ListenerState::Listening`] as it is started
//! and stopped. Navigation runs on its own worker thread so a slow editor never
//! holds up the accept loop.
//!
//! The `srclinkd` binary wires these pieces together with layered
//! configuration from [`srclink_config`], structured logging, and signal-driven
//! shutdown. See [`run_daemon`].

mod bootstrap;
mod health;
mod lifecycle;
mod locator;
mod navigation;
mod process;
mod request;
mod telemetry;
mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use lifecycle::{
    LifecycleError, ListenerConfig, ListenerManager, ListenerSession, ListenerState,
};
pub use locator::{DEFAULT_LINE, Locator};
pub use navigation::{
    EditorCommand, NavigationError, NavigationQueue, NavigationTarget, NavigationWorker,
    Navigator, SourceRootNavigator,
};
pub use process::{
    LaunchError, ShutdownError, ShutdownSignal, SystemShutdownSignal, run_daemon, run_with,
};
pub use request::{
    DecodeError, DropReason, Outcome, QueryParameters, RawRequest, ReadError, RequestLimits,
    decode_component, evaluate, query_string, request_target,
};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::ListenerError;

#[cfg(test)]
mod tests;
