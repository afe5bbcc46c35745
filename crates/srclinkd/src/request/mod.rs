//! Per-connection handling of browser "open source" requests.
//!
//! Each connection goes through four phases: read the request up to the
//! first blank line, acknowledge with `200 OK` and close, evaluate the
//! captured text, and dispatch a navigation target. The client learns
//! nothing about the outcome; malformed input is dropped silently.

mod handler;
mod parse;
mod read;

use std::time::Duration;

use srclink_config::Config;

pub(crate) use self::handler::OpenRequestHandler;
pub use self::parse::{
    DecodeError, DropReason, Outcome, QueryParameters, decode_component, evaluate, query_string,
    request_target,
};
pub use self::read::ReadError;

const REQUEST_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::request");

/// Text captured from one connection: every non-empty line before the first
/// blank line, concatenated without separators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRequest(String);

impl RawRequest {
    /// Wraps captured request text.
    #[must_use]
    pub fn new(text: String) -> Self {
        Self(text)
    }

    /// Captured text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Bounds applied to the read phase of each connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLimits {
    /// Socket read timeout; `None` waits indefinitely.
    pub read_timeout: Option<Duration>,
    /// Maximum bytes read, line endings included.
    pub max_bytes: usize,
    /// Maximum number of non-empty lines.
    pub max_lines: usize,
}

impl RequestLimits {
    /// Builds limits from their parts.
    #[must_use]
    pub const fn new(read_timeout: Option<Duration>, max_bytes: usize, max_lines: usize) -> Self {
        Self {
            read_timeout,
            max_bytes,
            max_lines,
        }
    }

    /// Limits taken from the resolved configuration.
    ///
    /// A zero timeout disables the read timeout.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let timeout = config.read_timeout();
        Self::new(
            (!timeout.is_zero()).then_some(timeout),
            config.max_request_bytes,
            config.max_request_lines,
        )
    }
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
