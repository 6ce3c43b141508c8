use std::path::PathBuf;

use common_utils::consts;
use domain_types::types::{Connectors, Proxy};
use serde::Deserialize;

use crate::logger::config::Log;

/// Prefix of the environment variables that override the file configuration,
/// e.g. `PAYMENT_GATEWAY__CONNECTORS__NMI__BASE_URL`.
pub const ENV_PREFIX: &str = "PAYMENT_GATEWAY";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: Log,
    pub proxy: Proxy,
    pub connectors: Connectors,
    pub http_client: HttpClientConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: consts::REQUEST_TIME_OUT,
        }
    }
}

impl Config {
    /// Function to build the configuration by picking it from default locations
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::new_with_config_path(None)
    }

    /// Loads `config_path` (or `config/development.toml`) and layers the
    /// environment on top of it. A missing file is not an error.
    pub fn new_with_config_path(
        explicit_config_path: Option<PathBuf>,
    ) -> Result<Self, config::ConfigError> {
        let config_path = explicit_config_path
            .unwrap_or_else(|| PathBuf::from("config").join("development.toml"));

        let config = config::Config::builder()
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("proxy.bypass_proxy_urls"),
            )
            .build()?;

        #[allow(clippy::print_stderr)]
        let config: Self = serde_path_to_error::deserialize(config).map_err(|error| {
            eprintln!("Unable to deserialize application configuration: {error}");
            error.into_inner()
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.http_client.timeout == 0 {
            return Err(config::ConfigError::Message(
                "http_client.timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
