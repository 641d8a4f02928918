//! Checks applied to connection settings when an `SftpConfig` is loaded,
//! so a malformed value is reported before any socket is opened.

use std::fmt;
use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;

/// A rejected setting and what is wrong with it.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

// Dot-separated labels of letters, digits and inner hyphens
static HOST_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)*[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$")
        .unwrap()
});

static LOGIN_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.-]{0,31}$").unwrap());

/// The SFTP server to dial: an IP literal or a DNS name.
pub fn validate_hostname(hostname: &str) -> Result<(), ValidationError> {
    let hostname = hostname.trim();
    if hostname.is_empty() {
        return Err(ValidationError::new("hostname", "Hostname is required"));
    }
    if hostname.parse::<IpAddr>().is_ok() {
        return Ok(());
    }
    if hostname.len() > 253 || !HOST_NAME.is_match(hostname) {
        return Err(ValidationError::new(
            "hostname",
            format!("'{}' is neither an IP address nor a DNS name", hostname),
        ));
    }
    Ok(())
}

pub fn validate_port(port: u16) -> Result<u16, ValidationError> {
    if port == 0 {
        return Err(ValidationError::new("port", "Port must be between 1 and 65535"));
    }
    Ok(port)
}

/// The login name sent with password authentication.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if LOGIN_NAME.is_match(username) {
        return Ok(());
    }
    let message = if username.trim().is_empty() {
        "Username is required".to_string()
    } else {
        format!("'{}' is not a valid login name", username)
    };
    Err(ValidationError::new("username", message))
}

/// Mode applied to created folders; file type bits belong to the server.
pub fn validate_folder_mode(mode: u32) -> Result<u32, ValidationError> {
    if mode > 0o7777 {
        return Err(ValidationError::new(
            "folder_mode",
            format!("Folder mode {:o} has bits outside 0o7777", mode),
        ));
    }
    Ok(mode)
}
