use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;
use crate::validation;

use super::paths;

/// How the server's host key is checked against known_hosts.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HostKeyPolicy {
    /// Trust on first use: learn unknown hosts, reject changed keys
    #[default]
    AcceptNew,
    /// Only hosts already present in known_hosts are accepted
    Strict,
    /// Skip verification entirely
    AcceptAny,
}

/// Connection settings for one SFTP-backed adapter instance.
#[derive(Deserialize)]
pub struct SftpConfig {
    pub hostname: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub password: SecretString,
    /// Unix permission bits applied to folders created by the adapter
    #[serde(default = "default_folder_mode")]
    pub folder_mode: u32,
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_secs: u64,
    /// Zero disables keepalive
    #[serde(default = "default_keepalive_interval")]
    pub keepalive_interval_secs: u64,
    #[serde(default)]
    pub known_hosts_path: Option<PathBuf>,
    #[serde(default)]
    pub host_key_policy: HostKeyPolicy,
}

impl std::fmt::Debug for SftpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SftpConfig")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("folder_mode", &format_args!("{:o}", self.folder_mode))
            .field("host_key_policy", &self.host_key_policy)
            .finish_non_exhaustive()
    }
}

fn default_port() -> u16 {
    22
}

fn default_folder_mode() -> u32 {
    0o755
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_keepalive_interval() -> u64 {
    60
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl SftpConfig {
    /// Build a config with defaults for everything but the credentials.
    pub fn new(
        hostname: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: SecretString,
        folder_mode: u32,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            username: username.into(),
            password,
            folder_mode,
            connection_timeout_secs: default_connection_timeout(),
            keepalive_interval_secs: default_keepalive_interval(),
            known_hosts_path: None,
            host_key_policy: HostKeyPolicy::default(),
        }
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML config content
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field that would otherwise only fail at connect time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_hostname(&self.hostname)?;
        validation::validate_port(self.port)?;
        validation::validate_username(&self.username)?;
        validation::validate_folder_mode(self.folder_mode)?;
        Ok(())
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    pub fn keepalive_interval(&self) -> Option<Duration> {
        // Treat 0 as "no keepalive" to avoid immediate timeout
        if self.keepalive_interval_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.keepalive_interval_secs))
        }
    }

    /// Resolved known_hosts location, falling back to ~/.ssh/known_hosts
    pub fn known_hosts_file(&self) -> Option<PathBuf> {
        match &self.known_hosts_path {
            Some(path) => Some(paths::expand_tilde(&path.to_string_lossy())),
            None => paths::ssh_known_hosts_file(),
        }
    }
}
