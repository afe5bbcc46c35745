//! Shared doubles for the daemon test suites.

mod config_loader;
mod navigator;
mod reporter;
mod shutdown;

pub use config_loader::{FailingConfigLoader, TestConfigLoader};
pub use navigator::RecordingNavigator;
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use shutdown::{ClientThenShutdown, send_request};
