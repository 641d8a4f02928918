use std::path::{Path, PathBuf};

use russh::keys::{self, HashAlg, PublicKey};

use crate::error::SftpError;

/// Result of checking a host key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostKeyStatus {
    /// Key matches a stored key
    Known,
    /// No stored key for this host
    Unknown {
        fingerprint: String,
        key_type: String,
    },
    /// Stored key differs from the presented one (potential MITM)
    Changed {
        line: usize,
        new_fingerprint: String,
    },
}

/// Reads and appends entries of one OpenSSH known_hosts file.
#[derive(Debug, Clone)]
pub struct KnownHostsManager {
    path: Option<PathBuf>,
}

impl KnownHostsManager {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the SHA-256 fingerprint of a public key
    pub fn get_fingerprint(key: &PublicKey) -> String {
        key.fingerprint(HashAlg::Sha256).to_string()
    }

    /// Check a presented key; a missing file means every host is unknown.
    pub fn check_host_key(
        &self,
        host: &str,
        port: u16,
        key: &PublicKey,
    ) -> Result<HostKeyStatus, SftpError> {
        let fingerprint = Self::get_fingerprint(key);
        let known = match &self.path {
            Some(path) if path.exists() => keys::known_hosts::known_host_keys_path(host, port, path)
                .map_err(|e| {
                    SftpError::HostKey(format!(
                        "Failed to read known_hosts {}: {}",
                        path.display(),
                        e
                    ))
                })?,
            _ => Vec::new(),
        };

        if known.iter().any(|(_, existing)| existing == key) {
            return Ok(HostKeyStatus::Known);
        }

        match known.first() {
            Some((line, _)) => Ok(HostKeyStatus::Changed {
                line: *line,
                new_fingerprint: fingerprint,
            }),
            None => Ok(HostKeyStatus::Unknown {
                fingerprint,
                key_type: key.algorithm().as_str().to_string(),
            }),
        }
    }

    /// Append a host key, creating the file and its directory as needed.
    pub fn add_host_key(&self, host: &str, port: u16, key: &PublicKey) -> Result<(), SftpError> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| SftpError::HostKey("No known_hosts path configured".to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SftpError::HostKey(format!(
                    "Failed to create known_hosts directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        keys::known_hosts::learn_known_hosts_path(host, port, key, path).map_err(|e| {
            SftpError::HostKey(format!(
                "Failed to write known_hosts {}: {}",
                path.display(),
                e
            ))
        })
    }
}
