use std::future::Future;

use russh::client::Handler;
use russh::keys::PublicKey;

use crate::config::HostKeyPolicy;
use crate::error::SftpError;
use crate::security_log;

use super::known_hosts::{HostKeyStatus, KnownHostsManager};

/// SSH client handler that verifies the server's host key.
pub struct ClientHandler {
    host: String,
    port: u16,
    policy: HostKeyPolicy,
    known_hosts: KnownHostsManager,
}

impl ClientHandler {
    pub fn new(
        host: String,
        port: u16,
        policy: HostKeyPolicy,
        known_hosts: KnownHostsManager,
    ) -> Self {
        Self {
            host,
            port,
            policy,
            known_hosts,
        }
    }

    fn verify(
        host: &str,
        port: u16,
        policy: HostKeyPolicy,
        known_hosts: &KnownHostsManager,
        key: &PublicKey,
    ) -> Result<bool, SftpError> {
        if policy == HostKeyPolicy::AcceptAny {
            tracing::warn!("Host key verification disabled for {}:{}", host, port);
            return Ok(true);
        }

        match known_hosts.check_host_key(host, port, key)? {
            HostKeyStatus::Known => {
                tracing::debug!("Host key verified for {}:{}", host, port);
                Ok(true)
            }
            HostKeyStatus::Unknown {
                fingerprint,
                key_type,
            } => match policy {
                HostKeyPolicy::AcceptNew => {
                    known_hosts.add_host_key(host, port, key)?;
                    security_log::log_host_key_learned(host, port, &fingerprint);
                    tracing::debug!("Learned {} host key for {}:{}", key_type, host, port);
                    Ok(true)
                }
                _ => {
                    let reason = format!("unknown host key {} ({})", fingerprint, key_type);
                    security_log::log_host_key_rejected(host, port, &reason);
                    Err(SftpError::HostKey(format!(
                        "{}:{} is not in known_hosts: {}",
                        host, port, reason
                    )))
                }
            },
            HostKeyStatus::Changed {
                line,
                new_fingerprint,
            } => {
                let reason = format!(
                    "host key changed (known_hosts line {}), new key {}",
                    line, new_fingerprint
                );
                security_log::log_host_key_rejected(host, port, &reason);
                Err(SftpError::HostKey(format!("{}:{}: {}", host, port, reason)))
            }
        }
    }
}

impl Handler for ClientHandler {
    type Error = SftpError;

    fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        let host = self.host.clone();
        let port = self.port;
        let policy = self.policy;
        let known_hosts = self.known_hosts.clone();
        let key = server_public_key.clone();

        async move {
            // known_hosts access is blocking file I/O
            tokio::task::spawn_blocking(move || {
                Self::verify(&host, port, policy, &known_hosts, &key)
            })
            .await
            .map_err(|e| SftpError::HostKey(format!("Host key check failed: {}", e)))?
        }
    }
}
