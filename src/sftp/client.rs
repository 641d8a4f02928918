//! SFTP client for establishing the adapter's channel

use std::sync::Arc;

use russh::Disconnect;
use russh::client::{self, Config};
use russh_sftp::client::SftpSession as RusshSftpSession;
use secrecy::ExposeSecret;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::SftpConfig;
use crate::error::SftpError;
use crate::security_log;
use crate::ssh::{ClientHandler, KnownHostsManager};

use super::remote::RemoteIdentity;
use super::session::SftpChannel;

/// Establishes authenticated SFTP channels from an [`SftpConfig`]
pub struct SftpClient {
    config: Arc<Config>,
}

impl SftpClient {
    pub fn new(sftp_config: &SftpConfig) -> Self {
        let config = Config {
            inactivity_timeout: None,
            keepalive_interval: sftp_config.keepalive_interval(),
            keepalive_max: 3,
            ..Default::default()
        };

        Self {
            config: Arc::new(config),
        }
    }

    /// Connect, authenticate and open the SFTP subsystem.
    ///
    /// Nothing is returned unless every step succeeded; a transport opened
    /// before a later step failed is disconnected first.
    pub async fn connect(&self, sftp_config: &SftpConfig) -> Result<SftpChannel, SftpError> {
        let host = sftp_config.hostname.as_str();
        let port = sftp_config.port;
        let addr = format!("{}:{}", host, port);
        let connection_timeout = sftp_config.connection_timeout();

        let stream = timeout(connection_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| SftpError::ConnectionFailed(format!("Connection timed out to {}", addr)))?
            .map_err(|e| {
                SftpError::ConnectionFailed(format!("Failed to connect to {}: {}", addr, e))
            })?;

        let handler = ClientHandler::new(
            host.to_string(),
            port,
            sftp_config.host_key_policy,
            KnownHostsManager::new(sftp_config.known_hosts_file()),
        );

        let mut handle = timeout(
            connection_timeout,
            client::connect_stream(self.config.clone(), stream, handler),
        )
        .await
        .map_err(|_| {
            SftpError::ConnectionFailed(format!("SSH handshake timed out for {}", addr))
        })?
        .map_err(|e| match e {
            SftpError::HostKey(_) => e,
            other => SftpError::ConnectionFailed(format!(
                "SSH handshake failed for {}: {}",
                addr, other
            )),
        })?;

        match timeout(
            connection_timeout,
            self.establish_sftp_session(&mut handle, sftp_config),
        )
        .await
        {
            Ok(Ok((sftp, home_dir, identity))) => {
                security_log::log_sftp_connect(host, port, &sftp_config.username);
                Ok(SftpChannel::new(
                    sftp,
                    handle,
                    host.to_string(),
                    port,
                    home_dir,
                    identity,
                ))
            }
            Ok(Err(e)) => {
                Self::abort(&handle, &addr).await;
                Err(e)
            }
            Err(_) => {
                Self::abort(&handle, &addr).await;
                Err(SftpError::ConnectionFailed(format!(
                    "SFTP session setup timed out for {}",
                    addr
                )))
            }
        }
    }

    async fn abort(handle: &client::Handle<ClientHandler>, addr: &str) {
        if let Err(e) = handle
            .disconnect(Disconnect::ByApplication, "setup failed", "en")
            .await
        {
            tracing::debug!("Disconnect after failed setup of {} failed: {}", addr, e);
        }
    }

    /// Authenticate, then open the channel and SFTP subsystem
    async fn establish_sftp_session(
        &self,
        handle: &mut client::Handle<ClientHandler>,
        sftp_config: &SftpConfig,
    ) -> Result<(RusshSftpSession, String, RemoteIdentity), SftpError> {
        self.authenticate(handle, sftp_config).await?;

        let channel = handle
            .channel_open_session()
            .await
            .map_err(|e| SftpError::ConnectionFailed(format!("Failed to open channel: {}", e)))?;

        channel
            .request_subsystem(true, "sftp")
            .await
            .map_err(|e| {
                SftpError::ConnectionFailed(format!("Failed to request SFTP subsystem: {}", e))
            })?;

        let sftp = RusshSftpSession::new(channel.into_stream())
            .await
            .map_err(|e| {
                SftpError::ConnectionFailed(format!("Failed to initialize SFTP session: {}", e))
            })?;

        let (home_dir, identity) = Self::resolve_identity(&sftp).await;
        tracing::debug!(
            "SFTP session ready in {} (uid {:?}, gid {:?})",
            home_dir,
            identity.uid,
            identity.gid
        );

        Ok((sftp, home_dir, identity))
    }

    /// Login directory, and its owner as the session identity when that is
    /// not root.
    async fn resolve_identity(sftp: &RusshSftpSession) -> (String, RemoteIdentity) {
        let home_dir = match sftp.canonicalize(".").await {
            Ok(path) => path,
            // Fall back to root if canonicalize fails
            Err(_) => "/".to_string(),
        };

        let identity = match sftp.metadata(home_dir.clone()).await {
            // Chrooted logins land in a root-owned directory
            Ok(attrs) if attrs.uid == Some(0) => RemoteIdentity::default(),
            Ok(attrs) => RemoteIdentity {
                uid: attrs.uid,
                gid: attrs.gid,
            },
            Err(e) => {
                tracing::debug!("Could not stat login directory {}: {}", home_dir, e);
                RemoteIdentity::default()
            }
        };

        (home_dir, identity)
    }

    async fn authenticate(
        &self,
        handle: &mut client::Handle<ClientHandler>,
        sftp_config: &SftpConfig,
    ) -> Result<(), SftpError> {
        let host = sftp_config.hostname.as_str();
        let port = sftp_config.port;
        let username = sftp_config.username.as_str();

        security_log::log_auth_attempt(host, port, username);

        let failure = |reason: String| {
            security_log::log_auth_failure(host, port, username, &reason);
            SftpError::AuthenticationFailed {
                host: host.to_string(),
                port,
                username: username.to_string(),
                reason,
            }
        };

        // Use expose_secret() only at the point of authentication
        let auth_result = handle
            .authenticate_password(username, sftp_config.password.expose_secret())
            .await
            .map_err(|e| failure(format!("Password auth failed: {}", e)))?;

        if !auth_result.success() {
            return Err(failure("Authentication rejected by server".to_string()));
        }

        security_log::log_auth_success(host, port, username);
        Ok(())
    }
}
