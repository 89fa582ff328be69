//! Server configuration loaded from environment variables.

use std::path::PathBuf;

use lumina_core::default_log_level;

/// Errors raised while reading configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got `{value}`")]
    InvalidNumber {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("LUMINA_LOG_DIR must be an absolute path, got `{0}`")]
    RelativeLogDir(String),
}

/// Server configuration.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// SQLite database file (default: `lumina.sqlite3`).
    pub db_path: PathBuf,
    /// Allowed CORS origins, parsed from comma-separated `LUMINA_CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub log_level: String,
    /// Rolling log directory. Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `LUMINA_HOST`                 | `0.0.0.0`               |
    /// | `LUMINA_PORT`                 | `3000`                  |
    /// | `LUMINA_DB_PATH`              | `lumina.sqlite3`        |
    /// | `LUMINA_CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `LUMINA_REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `LUMINA_LOG_LEVEL`            | `debug` / `info`        |
    /// | `LUMINA_LOG_DIR`              | unset                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("LUMINA_HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port = match lookup("LUMINA_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    name: "LUMINA_PORT",
                    expected: "u16",
                    value,
                })?,
            None => 3000,
        };

        let db_path = lookup("LUMINA_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("lumina.sqlite3"));

        let cors_origins = lookup("LUMINA_CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = match lookup("LUMINA_REQUEST_TIMEOUT_SECS") {
            Some(value) => {
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidNumber {
                        name: "LUMINA_REQUEST_TIMEOUT_SECS",
                        expected: "u64",
                        value,
                    })?
            }
            None => 30,
        };

        let log_level =
            lookup("LUMINA_LOG_LEVEL").unwrap_or_else(|| default_log_level().to_string());

        let log_dir = match lookup("LUMINA_LOG_DIR").filter(|s| !s.trim().is_empty()) {
            Some(dir) => {
                let path = PathBuf::from(&dir);
                if !path.is_absolute() {
                    return Err(ConfigError::RelativeLogDir(dir));
                }
                Some(path)
            }
            None => None,
        };

        Ok(Self {
            host,
            port,
            db_path,
            cors_origins,
            request_timeout_secs,
            log_level,
            log_dir,
        })
    }

    /// `host:port` string accepted by the TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ServerConfig};
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.db_path.to_str(), Some("lumina.sqlite3"));
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        let config = config_from(&[(
            "LUMINA_CORS_ORIGINS",
            "http://a.test, http://b.test,,",
        )])
        .unwrap();
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = config_from(&[("LUMINA_PORT", "eighty")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber { name: "LUMINA_PORT", .. }
        ));
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = config_from(&[("LUMINA_LOG_DIR", "logs")]).unwrap_err();
        assert!(matches!(err, ConfigError::RelativeLogDir(dir) if dir == "logs"));
    }
}
