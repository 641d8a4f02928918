use std::path::PathBuf;

use russh_sftp::protocol::StatusCode;
use thiserror::Error;

use crate::validation::ValidationError;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    Invalid(#[from] ValidationError),
}

/// SFTP-related errors
#[derive(Error, Debug)]
pub enum SftpError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("SFTP connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed for {username}@{host}:{port}: {reason}")]
    AuthenticationFailed {
        host: String,
        port: u16,
        username: String,
        reason: String,
    },

    #[error("Host key verification failed: {0}")]
    HostKey(String),

    #[error("No such file or directory: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("File operation failed: {0}")]
    FileOperation(String),

    #[error("Creating folder \"{identifier}\" failed: {reason}")]
    CreateFolder { identifier: String, reason: String },

    #[error("Copying file \"{identifier}\" to \"{target}\" failed: {reason}")]
    Transfer {
        identifier: String,
        target: PathBuf,
        reason: String,
    },

    #[error("Local I/O error: {0}")]
    LocalIo(String),

    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("russh error: {0}")]
    Russh(String),
}

impl SftpError {
    /// Map a russh-sftp failure for `op` on `path` onto the adapter's taxonomy.
    pub fn from_sftp(op: &str, path: &str, err: russh_sftp::client::error::Error) -> Self {
        match &err {
            russh_sftp::client::error::Error::Status(status) => match status.status_code {
                StatusCode::NoSuchFile => SftpError::NotFound(path.to_string()),
                StatusCode::PermissionDenied => SftpError::PermissionDenied(path.to_string()),
                _ => SftpError::FileOperation(format!("Failed to {} {}: {}", op, path, err)),
            },
            _ => SftpError::FileOperation(format!("Failed to {} {}: {}", op, path, err)),
        }
    }

    /// Whether this error means the node is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SftpError::NotFound(_))
    }

    /// Whether this error means the node exists but is out of reach.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, SftpError::PermissionDenied(_))
    }
}

impl From<russh::Error> for SftpError {
    fn from(err: russh::Error) -> Self {
        SftpError::Russh(err.to_string())
    }
}
