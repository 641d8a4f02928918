//! Security event logging for audit trails.
//!
//! All events are emitted with `target: "security"` so hosts can route them
//! separately, e.g. `RUST_LOG=security=info`.

use tracing::{info, warn};

/// Log an SSH authentication attempt.
pub fn log_auth_attempt(host: &str, port: u16, username: &str) {
    info!(
        target: "security",
        event = "auth_attempt",
        host = %host,
        port = port,
        username = %username,
        method = "password",
        "SSH authentication attempt"
    );
}

/// Log a successful SSH authentication.
pub fn log_auth_success(host: &str, port: u16, username: &str) {
    info!(
        target: "security",
        event = "auth_success",
        host = %host,
        port = port,
        username = %username,
        method = "password",
        "SSH authentication succeeded"
    );
}

/// Log a failed SSH authentication attempt.
pub fn log_auth_failure(host: &str, port: u16, username: &str, reason: &str) {
    warn!(
        target: "security",
        event = "auth_failure",
        host = %host,
        port = port,
        username = %username,
        method = "password",
        reason = %reason,
        "SSH authentication failed"
    );
}

/// Log an SFTP channel becoming usable.
pub fn log_sftp_connect(host: &str, port: u16, username: &str) {
    info!(
        target: "security",
        event = "sftp_connect",
        host = %host,
        port = port,
        username = %username,
        "SFTP connection established"
    );
}

/// Log a host key learned on first use.
pub fn log_host_key_learned(host: &str, port: u16, fingerprint: &str) {
    warn!(
        target: "security",
        event = "host_key_learned",
        host = %host,
        port = port,
        fingerprint = %fingerprint,
        "Learned new SSH host key"
    );
}

/// Log a host key that failed verification.
pub fn log_host_key_rejected(host: &str, port: u16, reason: &str) {
    warn!(
        target: "security",
        event = "host_key_rejected",
        host = %host,
        port = port,
        reason = %reason,
        "Rejected SSH host key"
    );
}

/// Log the SFTP transport being torn down.
pub fn log_sftp_disconnect(host: &str, port: u16) {
    info!(
        target: "security",
        event = "sftp_disconnect",
        host = %host,
        port = port,
        "SFTP connection closed"
    );
}
