use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use common::identity::{Jid, JidError};

pub const DEFAULT_SERVER_JID: &str = "channels.localhost";
pub const DEFAULT_LOCAL_DOMAIN: &str = "localhost";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// address this server answers as; replies and notifications
    ///  are sent from it
    #[serde(default = "default_server_jid")]
    pub server_jid: String,
    /// domains whose nodes are hosted here. requests on any
    ///  other domain's nodes are delegated
    #[serde(default = "default_local_domains")]
    pub local_domains: Vec<String>,
    /// administrators, told about every affiliation change
    #[serde(default)]
    pub admins: Vec<String>,
    /// maximum number of queued outgoing stanzas,
    ///  if not set the outbox is unbounded
    #[serde(default)]
    pub outbox_capacity: Option<usize>,
    // misc
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_server_jid() -> String {
    DEFAULT_SERVER_JID.to_string()
}

fn default_local_domains() -> Vec<String> {
    vec![DEFAULT_LOCAL_DOMAIN.to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_jid: default_server_jid(),
            local_domains: default_local_domains(),
            admins: Vec::new(),
            outbox_capacity: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Read and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server_jid()?;
        self.admin_jids()?;
        self.log_level()?;
        if self.local_domains.iter().all(|d| d.trim().is_empty()) {
            return Err(ConfigError::NoLocalDomains);
        }
        Ok(())
    }

    pub fn server_jid(&self) -> Result<Jid, ConfigError> {
        parse_jid("server_jid", &self.server_jid)
    }

    pub fn admin_jids(&self) -> Result<Vec<Jid>, ConfigError> {
        self.admins
            .iter()
            .map(|admin| parse_jid("admins", admin))
            .collect()
    }

    pub fn log_level(&self) -> Result<tracing::Level, ConfigError> {
        tracing::Level::from_str(&self.log_level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}

fn parse_jid(field: &'static str, value: &str) -> Result<Jid, ConfigError> {
    value.parse().map_err(|source| ConfigError::InvalidJid {
        field,
        value: value.to_string(),
        source,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid jid {value:?} in {field}: {source}")]
    InvalidJid {
        field: &'static str,
        value: String,
        source: JidError,
    },
    #[error("at least one local domain is required")]
    NoLocalDomains,
    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),
}
