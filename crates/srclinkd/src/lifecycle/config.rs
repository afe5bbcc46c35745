//! Per-session listener configuration.

use srclink_config::{Config, DEFAULT_HOST, SecretPolicy};

use crate::request::RequestLimits;

/// Immutable settings for one listening session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    host: String,
    port: u16,
    secret: String,
    secret_policy: SecretPolicy,
    limits: RequestLimits,
}

impl ListenerConfig {
    /// Settings for `localhost:port` with no secret and default limits.
    #[must_use]
    pub fn new(port: u16) -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port,
            secret: String::new(),
            secret_policy: SecretPolicy::default(),
            limits: RequestLimits::default(),
        }
    }

    /// Settings bound to `127.0.0.1`, mainly for tests using port `0`.
    #[must_use]
    pub fn loopback(port: u16) -> Self {
        Self::new(port).with_host("127.0.0.1")
    }

    /// Takes listener settings from the resolved configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            host: config.host().to_owned(),
            port: config.port(),
            secret: config.secret().to_owned(),
            secret_policy: config.secret_policy(),
            limits: RequestLimits::from_config(config),
        }
    }

    /// Replaces the bind host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Replaces the shared secret.
    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    /// Replaces the secret policy.
    #[must_use]
    pub fn with_secret_policy(mut self, policy: SecretPolicy) -> Self {
        self.secret_policy = policy;
        self
    }

    /// Replaces the read-phase limits.
    #[must_use]
    pub fn with_limits(mut self, limits: RequestLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Bind host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Bind port; `0` asks the OS for an ephemeral port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Shared secret; empty when unset.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Secret policy.
    #[must_use]
    pub fn secret_policy(&self) -> SecretPolicy {
        self.secret_policy
    }

    /// Read-phase limits.
    #[must_use]
    pub fn limits(&self) -> RequestLimits {
        self.limits
    }

    /// `host:port` as configured, before resolution.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
