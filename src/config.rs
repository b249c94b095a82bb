//! Service configuration.
//!
//! Layers, lowest precedence first: built-in defaults, an optional TOML
//! file, `TODO_ORDER_*` environment variables, then command line flags
//! (applied by the binary).

use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid port: {0}")]
    InvalidPort(String),
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    #[error("invalid list size: {0}")]
    InvalidListSize(String),
}

/// Main service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub http: HttpConfig,
    pub store: StoreConfig,
    pub list: ListConfig,
    pub log: LogConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 8080)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8080,
        }
    }
}

/// Entry store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite file, or `:memory:`
    pub path: PathBuf,
    /// Upper bound for a single store call
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("todo.db"),
            timeout_secs: 15,
        }
    }
}

/// Paging limits for list requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub default_size: u32,
    pub max_size: u32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            default_size: 20,
            max_size: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub dir: PathBuf,
    /// `tracing` filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Number of daily log files kept
    pub retain_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            level: "info".to_string(),
            retain_files: 7,
        }
    }
}

impl ServiceConfig {
    /// Read a TOML file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults, then `path` if given, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply `TODO_ORDER_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(raw) = read("TODO_ORDER_HTTP_PORT") {
            match raw.parse() {
                Ok(port) => self.http.port = port,
                Err(err) => tracing::warn!("invalid TODO_ORDER_HTTP_PORT, ignoring: {err}"),
            }
        }

        if let Some(raw) = read("TODO_ORDER_STORE_PATH") {
            self.store.path = PathBuf::from(raw);
        }

        if let Some(raw) = read("TODO_ORDER_STORE_TIMEOUT_SECS") {
            match raw.parse() {
                Ok(secs) => self.store.timeout_secs = secs,
                Err(err) => {
                    tracing::warn!("invalid TODO_ORDER_STORE_TIMEOUT_SECS, ignoring: {err}")
                }
            }
        }

        if let Some(raw) = read("TODO_ORDER_LOG_LEVEL") {
            self.log.level = raw;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::InvalidPort("port cannot be 0".into()));
        }

        if self.store.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(
                "store timeout cannot be 0".into(),
            ));
        }

        if self.list.default_size == 0 || self.list.max_size == 0 {
            return Err(ConfigError::InvalidListSize(
                "list sizes must be positive".into(),
            ));
        }

        if self.list.default_size > self.list.max_size {
            return Err(ConfigError::InvalidListSize(format!(
                "default_size {} exceeds max_size {}",
                self.list.default_size, self.list.max_size
            )));
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store.timeout_secs)
    }
}
