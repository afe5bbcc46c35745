//! Test configuration loaders for scenarios covering success and failure paths.

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use srclink_config::Config;

use crate::bootstrap::ConfigLoader;

/// Loader that binds the loopback interface on an ephemeral port.
#[derive(Debug, Clone)]
pub struct TestConfigLoader {
    config: Config,
}

impl TestConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config {
                host: "127.0.0.1".to_owned(),
                port: 0,
                ..Config::default()
            },
        }
    }

    /// Applies `update` to the configuration that will be loaded.
    #[must_use]
    pub fn with(mut self, update: impl FnOnce(&mut Config)) -> Self {
        update(&mut self.config);
        self
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Loader that intentionally fails by passing an invalid port on the command line.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("srclinkd"),
            OsString::from("--port"),
            OsString::from("not-a-port"),
        ];
        Config::load_from_iter(args)
    }
}
