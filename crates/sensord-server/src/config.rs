// ABOUTME: Configuration loading and validation for the sensord server.
// ABOUTME: Reads SENSORD_* environment variables with sensible defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SENSORD_BIND is not a valid socket address: {0}")]
    InvalidBind(String),
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SensordConfig {
    pub data_dir: PathBuf,
    pub bind: SocketAddr,
}

impl SensordConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - SENSORD_DATA_DIR: directory holding the reading files (default: ./data)
    /// - SENSORD_BIND: socket address to bind (default: 127.0.0.1:5000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = std::env::var("SENSORD_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let bind_str =
            std::env::var("SENSORD_BIND").unwrap_or_else(|_| "127.0.0.1:5000".to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_str))?;

        Ok(Self { data_dir, bind })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test body so the env mutations cannot race a parallel test.
    #[test]
    fn config_defaults_and_bind_validation() {
        // SAFETY: test-only code, no other test touches these variables
        unsafe {
            std::env::remove_var("SENSORD_DATA_DIR");
            std::env::remove_var("SENSORD_BIND");
        }

        let config = SensordConfig::from_env().unwrap();
        assert_eq!(config.bind, "127.0.0.1:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.data_dir, PathBuf::from("data"));

        // SAFETY: test-only code, no other test touches these variables
        unsafe {
            std::env::set_var("SENSORD_BIND", "not-an-address");
        }

        let result = SensordConfig::from_env();

        // SAFETY: test-only code, no other test touches these variables
        unsafe {
            std::env::remove_var("SENSORD_BIND");
        }

        let err = result.unwrap_err();
        assert!(
            err.to_string().contains("not-an-address"),
            "error should name the bad address: {}",
            err
        );
    }
}
