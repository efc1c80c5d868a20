//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                    | Default              |
//! |-----------------------------|----------------------|
//! | `TALLER_BIND_ADDR`          | `127.0.0.1:5000`     |
//! | `TALLER_DB_PATH`            | `./data/taller.db`   |
//! | `TALLER_DB_MAX_CONNECTIONS` | `5`                  |
//! | `TALLER_STOCK_POLICY`       | `allow_negative`     |
//! | `TALLER_SEED_DEMO`          | `true`               |

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use taller_core::StockPolicy;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: SocketAddr,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// What a sale does when it would take stock below zero
    pub stock_policy: StockPolicy,

    /// Insert the demo catalogue into an empty database on startup
    pub seed_demo: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bind_addr = value("TALLER_BIND_ADDR", "127.0.0.1:5000")
            .parse()
            .map_err(|_| ConfigError::InvalidValue("TALLER_BIND_ADDR".to_string()))?;

        let database_path = PathBuf::from(value("TALLER_DB_PATH", "./data/taller.db"));
        if database_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("TALLER_DB_PATH".to_string()));
        }

        let max_connections: u32 = value("TALLER_DB_MAX_CONNECTIONS", "5")
            .parse()
            .map_err(|_| ConfigError::InvalidValue("TALLER_DB_MAX_CONNECTIONS".to_string()))?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue("TALLER_DB_MAX_CONNECTIONS".to_string()));
        }

        let stock_policy = value("TALLER_STOCK_POLICY", "allow_negative")
            .parse()
            .map_err(|_| ConfigError::InvalidValue("TALLER_STOCK_POLICY".to_string()))?;

        let seed_demo = parse_bool(&value("TALLER_SEED_DEMO", "true"))
            .ok_or_else(|| ConfigError::InvalidValue("TALLER_SEED_DEMO".to_string()))?;

        Ok(ServerConfig {
            bind_addr,
            database_path,
            max_connections,
            stock_policy,
            seed_demo,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:5000".parse().unwrap());
        assert_eq!(config.database_path, PathBuf::from("./data/taller.db"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.stock_policy, StockPolicy::AllowNegative);
        assert!(config.seed_demo);
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("TALLER_BIND_ADDR", "0.0.0.0:8080"),
            ("TALLER_STOCK_POLICY", "reject_negative"),
            ("TALLER_SEED_DEMO", "false"),
            ("TALLER_DB_MAX_CONNECTIONS", "2"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.stock_policy, StockPolicy::RejectNegative);
        assert!(!config.seed_demo);
        assert_eq!(config.max_connections, 2);
    }

    #[test]
    fn invalid_values_fail() {
        assert!(matches!(
            load(&[("TALLER_STOCK_POLICY", "sometimes")]),
            Err(ConfigError::InvalidValue(key)) if key == "TALLER_STOCK_POLICY"
        ));
        assert!(load(&[("TALLER_BIND_ADDR", "localhost")]).is_err());
        assert!(load(&[("TALLER_DB_MAX_CONNECTIONS", "0")]).is_err());
        assert!(load(&[("TALLER_SEED_DEMO", "maybe")]).is_err());
        assert!(matches!(
            load(&[("TALLER_DB_PATH", "")]),
            Err(ConfigError::MissingRequired(_))
        ));
    }
}
