use crate::errors::ResolveError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub cache: CacheConfig,
    pub resolver: ResolverConfig,
    pub zones: ZonesConfig,
    pub logging: LoggingConfig,
}

/// Bind address plus the well-known default port of each role.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub root_port: u16,
    pub auth_port: u16,
    pub local_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            root_port: 53000,
            auth_port: 53003,
            local_port: 53004,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub capacity: usize,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            ttl_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// `host:port` of the root server the local resolver starts every
    /// cache-miss walk from.
    pub root: String,
    pub query_timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root: "127.0.0.1:53000".to_string(),
            query_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ZonesConfig {
    /// TLD label -> `host:port` of the TLD server owning it.
    pub tlds: BTreeMap<String, String>,
    /// Flat `domain,ip` records file for the authoritative server.
    pub records_file: String,
}

impl Default for ZonesConfig {
    fn default() -> Self {
        let mut tlds = BTreeMap::new();
        tlds.insert("com".to_string(), "127.0.0.1:53001".to_string());
        tlds.insert("org".to_string(), "127.0.0.1:53001".to_string());
        tlds.insert("edu".to_string(), "127.0.0.1:53002".to_string());
        Self {
            tlds,
            records_file: "data/records.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Command-line flags that take precedence over file values.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ResolveError> {
        toml::from_str(text).map_err(|e| ResolveError::Config(e.to_string()))
    }

    pub fn apply_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(bind) = &overrides.bind_address {
            self.server.bind_address = bind.clone();
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level = level.clone();
        }
    }
}
