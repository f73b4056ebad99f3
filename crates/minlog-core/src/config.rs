//! Configuration for MinLog
//!
//! Settings load from environment variables named `MINLOG__<KEY>`
//! (prefix and key joined with `__`, uppercased):
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `MINLOG__CONFIG_ID` | `config_id` | `minlog-config` |
//! | `MINLOG__CONNECTION_ID` | `connection.id` | `minlog-connection` |
//! | `MINLOG__LOGGER` | `logger` | `minlog` |
//! | `MINLOG__JSON` | `json` | `false` |
//! | `MINLOG__LOG_FILTER` | `log_filter` | `info` |

use crate::error::{ConfigError, Result};
use crate::sink::DEFAULT_LOGGER;

/// Prefix for all MinLog environment variables
pub const ENV_PREFIX: &str = "MINLOG";
/// Separator between prefix and key
pub const ENV_SEPARATOR: &str = "__";

/// Identification of the connection the logger is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub id: String,
}

impl ConnectionInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Default for ConnectionInfo {
    fn default() -> Self {
        Self::new("minlog-connection")
    }
}

/// Logger configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinLogConfig {
    /// Identifier of this configuration instance
    pub config_id: String,

    /// Connection the configuration is used with
    pub connection: ConnectionInfo,

    /// Logical logger name recorded on every line
    pub logger: String,

    /// Emit JSON-formatted tracing output instead of plain text
    pub json: bool,

    /// `EnvFilter` directive for the tracing subscriber
    pub log_filter: String,
}

impl Default for MinLogConfig {
    fn default() -> Self {
        Self {
            config_id: "minlog-config".to_string(),
            connection: ConnectionInfo::default(),
            logger: DEFAULT_LOGGER.to_string(),
            json: false,
            log_filter: "info".to_string(),
        }
    }
}

impl MinLogConfig {
    /// Build the environment variable name for a key
    pub fn env_name(key: &str) -> String {
        format!("{}{}{}", ENV_PREFIX, ENV_SEPARATOR, key).to_uppercase()
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Load from an explicit set of variables, ignoring unrelated names
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for (name, value) in vars {
            let name = name.as_ref();
            let value = value.into();
            if name == Self::env_name("config_id") {
                config.config_id = value;
            } else if name == Self::env_name("connection_id") {
                config.connection.id = value;
            } else if name == Self::env_name("logger") {
                config.logger = value;
            } else if name == Self::env_name("json") {
                config.json = parse_bool(name, &value)?;
            } else if name == Self::env_name("log_filter") {
                config.log_filter = value;
            }
        }
        Ok(config)
    }

    pub fn with_config_id(mut self, id: impl Into<String>) -> Self {
        self.config_id = id.into();
        self
    }

    pub fn with_connection(mut self, connection: ConnectionInfo) -> Self {
        self.connection = connection;
        self
    }

    pub fn with_logger(mut self, logger: impl Into<String>) -> Self {
        self.logger = logger.into();
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::invalid_value(name, value)),
    }
}

/// Split a `KEY=VALUE` pair at the first `=`.
pub fn parse_pair(pair: &str) -> Result<(String, String)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(ConfigError::MalformedPair(pair.to_string())),
    }
}
