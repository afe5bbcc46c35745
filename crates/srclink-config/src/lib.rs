//! Shared configuration for the srclink listener.
//!
//! Values are layered by [`ortho_config`]: built-in defaults, then an optional
//! configuration file, then `SRCLINK_*` environment variables, then command
//! line flags. The listener itself only ever sees the resolved [`Config`];
//! persisting the values is left to whoever edits the file or environment.

mod defaults;
mod logging;
mod policy;

use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_HOST, DEFAULT_LOG_FILTER, DEFAULT_MAX_REQUEST_BYTES, DEFAULT_MAX_REQUEST_LINES,
    DEFAULT_PORT, DEFAULT_READ_TIMEOUT_MS, default_host, default_log_filter,
    default_log_filter_string, default_log_format, default_secret_policy,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use policy::{SecretPolicy, SecretPolicyParseError};

/// Resolved configuration for the listener daemon.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "SRCLINK")]
pub struct Config {
    /// Host name or address the listener binds to.
    #[ortho_config(default = defaults::default_host())]
    pub host: String,
    /// TCP port the listener binds to.
    #[ortho_config(default = DEFAULT_PORT)]
    pub port: u16,
    /// Shared secret compared against the `p` query parameter.
    #[ortho_config(default = String::new())]
    pub secret: String,
    /// How strictly the shared secret is enforced.
    #[ortho_config(default = defaults::default_secret_policy())]
    pub secret_policy: SecretPolicy,
    /// Read timeout applied to each accepted connection, in milliseconds.
    #[ortho_config(default = DEFAULT_READ_TIMEOUT_MS)]
    pub read_timeout_ms: u64,
    /// Maximum number of bytes read from a single connection.
    #[ortho_config(default = DEFAULT_MAX_REQUEST_BYTES)]
    pub max_request_bytes: usize,
    /// Maximum number of non-empty lines read from a single connection.
    #[ortho_config(default = DEFAULT_MAX_REQUEST_LINES)]
    pub max_request_lines: usize,
    /// Directories searched, in order, for `package/Type.java` resources.
    #[serde(default)]
    #[ortho_config(merge_strategy = "append")]
    pub source_roots: Vec<Utf8PathBuf>,
    /// Editor invocation template; `{file}` and `{line}` are substituted.
    pub editor_command: Option<String>,
    /// Log filter expression understood by `tracing-subscriber`.
    #[ortho_config(default = defaults::default_log_filter_string())]
    pub log_filter: String,
    /// Output format for structured logs.
    #[ortho_config(default = defaults::default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            secret: String::new(),
            secret_policy: default_secret_policy(),
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            max_request_lines: DEFAULT_MAX_REQUEST_LINES,
            source_roots: Vec::new(),
            editor_command: None,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Host the listener binds to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port the listener binds to.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Shared secret; empty when no secret is configured.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Policy applied when comparing the shared secret.
    #[must_use]
    pub fn secret_policy(&self) -> SecretPolicy {
        self.secret_policy
    }

    /// Read timeout applied to each connection.
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Configured source roots.
    #[must_use]
    pub fn source_roots(&self) -> &[Utf8PathBuf] {
        &self.source_roots
    }

    /// Editor invocation template, if any.
    #[must_use]
    pub fn editor_command(&self) -> Option<&str> {
        self.editor_command.as_deref()
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Human-readable `host:port` pair, used in operator-facing messages.
    #[must_use]
    pub fn listener_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
