use crate::logging::LogFormat;
use crate::policy::SecretPolicy;

/// Port the browser extension targets unless told otherwise.
pub const DEFAULT_PORT: u16 = 9123;

/// Host the listener binds to. Requests are only accepted over loopback.
pub const DEFAULT_HOST: &str = "localhost";

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Upper bound on how long a single client may take to send its request.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 2_000;

/// Upper bound on the bytes read from one connection, line endings included.
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 16 * 1024;

/// Upper bound on the number of non-empty lines read from one connection.
pub const DEFAULT_MAX_REQUEST_LINES: usize = 128;

/// Owned host value used where allocation is required (e.g. serde).
pub fn default_host() -> String {
    DEFAULT_HOST.to_owned()
}

/// Default log filter expression used by the binaries.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binaries.
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default policy applied to the shared secret.
pub fn default_secret_policy() -> SecretPolicy {
    SecretPolicy::Lenient
}
