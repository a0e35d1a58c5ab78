//! Server configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Maximum request body size in bytes
    pub max_request_size: usize,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Path to the Kindred library config file
    pub config_file_path: Option<PathBuf>,

    /// Load the demo family into an empty store at startup
    pub seed_demo: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            max_request_size: 1024 * 1024, // 1MB
            request_timeout_secs: 30,
            config_file_path: None,
            seed_demo: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from CLI arguments and environment variables
    /// CLI arguments take precedence over environment variables
    pub fn from_cli_and_env(cli_args: crate::cli::CliArgs) -> Result<Self> {
        Self::from_sources(cli_args, |key| env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_cli_and_env`] with an explicit variable lookup
    pub fn from_sources<F>(cli_args: crate::cli::CliArgs, var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = cli_args.port {
            config.port = port;
        } else if let Some(port) = var("KINDRED_PORT") {
            config.port = port.parse()?;
        }

        if let Some(max_size) = cli_args.max_request_size {
            config.max_request_size = max_size;
        } else if let Some(max_size) = var("KINDRED_MAX_REQUEST_SIZE") {
            config.max_request_size = max_size.parse()?;
        }

        if let Some(timeout) = cli_args.request_timeout {
            config.request_timeout_secs = timeout;
        } else if let Some(timeout) = var("KINDRED_REQUEST_TIMEOUT") {
            config.request_timeout_secs = timeout.parse()?;
        }

        if let Some(config_path) = cli_args.config_file {
            config.config_file_path = Some(config_path);
        } else if let Some(config_path) = var("KINDRED_CONFIG_FILE") {
            config.config_file_path = Some(PathBuf::from(config_path));
        }

        if cli_args.seed_demo {
            config.seed_demo = true;
        } else if let Some(seed) = var("KINDRED_SEED_DEMO") {
            config.seed_demo = seed.parse().unwrap_or(false);
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliArgs;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_sources(CliArgs::default(), lookup(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.config_file_path.is_none());
        assert!(!config.seed_demo);
    }

    #[test]
    fn test_env_fills_unset_cli_values() {
        let config = ServerConfig::from_sources(
            CliArgs::default(),
            lookup(&[
                ("KINDRED_PORT", "8081"),
                ("KINDRED_MAX_REQUEST_SIZE", "2048"),
                ("KINDRED_SEED_DEMO", "true"),
                ("KINDRED_CONFIG_FILE", "kindred.toml"),
            ]),
        )
        .unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.max_request_size, 2048);
        assert!(config.seed_demo);
        assert_eq!(config.config_file_path, Some(PathBuf::from("kindred.toml")));
    }

    #[test]
    fn test_cli_overrides_env() {
        let cli = CliArgs {
            port: Some(9000),
            request_timeout: Some(5),
            ..CliArgs::default()
        };
        let config = ServerConfig::from_sources(
            cli,
            lookup(&[("KINDRED_PORT", "8081"), ("KINDRED_REQUEST_TIMEOUT", "60")]),
        )
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_bad_env_value_is_an_error() {
        let result =
            ServerConfig::from_sources(CliArgs::default(), lookup(&[("KINDRED_PORT", "http")]));
        assert!(result.is_err());
    }
}
