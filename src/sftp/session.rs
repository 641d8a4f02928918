//! The single SFTP channel an adapter instance talks through

use russh::Disconnect;
use russh::client::Handle;
use russh_sftp::client::SftpSession as RusshSftpSession;
use russh_sftp::client::fs::File;
use russh_sftp::protocol::{FileAttributes, OpenFlags};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::SftpError;
use crate::security_log;
use crate::ssh::ClientHandler;

use super::remote::{RemoteDirEntry, RemoteFs, RemoteIdentity, RemoteMetadata};

/// One authenticated SSH transport and the SFTP channel multiplexed over it.
///
/// Requests are serialised through an internal lock; the transport is
/// disconnected by [`SftpChannel::close`] or, failing that, on drop.
pub struct SftpChannel {
    sftp: Mutex<RusshSftpSession>,
    handle: Option<Handle<ClientHandler>>,
    host: String,
    port: u16,
    home_dir: String,
    identity: RemoteIdentity,
}

impl std::fmt::Debug for SftpChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SftpChannel")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("home_dir", &self.home_dir)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl SftpChannel {
    pub(crate) fn new(
        sftp: RusshSftpSession,
        handle: Handle<ClientHandler>,
        host: String,
        port: u16,
        home_dir: String,
        identity: RemoteIdentity,
    ) -> Self {
        Self {
            sftp: Mutex::new(sftp),
            handle: Some(handle),
            host,
            port,
            home_dir,
            identity,
        }
    }

    /// Directory the server placed the session in at login
    pub fn home_dir(&self) -> &str {
        &self.home_dir
    }

    /// Disconnect the transport, ending the SFTP channel with it.
    pub async fn close(mut self) -> Result<(), SftpError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        security_log::log_sftp_disconnect(&self.host, self.port);
        handle
            .disconnect(Disconnect::ByApplication, "adapter closed", "en")
            .await
            .map_err(SftpError::from)
    }
}

impl Drop for SftpChannel {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        security_log::log_sftp_disconnect(&self.host, self.port);
        let host = self.host.clone();
        let port = self.port;
        match tokio::runtime::Handle::try_current() {
            Ok(rt) => {
                rt.spawn(async move {
                    let _ = handle
                        .disconnect(Disconnect::ByApplication, "adapter dropped", "en")
                        .await;
                    tracing::debug!("SFTP channel cleanup: disconnected {}:{}", host, port);
                });
            }
            Err(_) => {
                // Dropping the handle still ends the session task
                tracing::debug!("SFTP channel dropped without a Tokio runtime; disconnect skipped");
            }
        }
    }
}

impl RemoteFs for SftpChannel {
    type Reader = File;

    async fn read_dir(&self, path: &str) -> Result<Vec<RemoteDirEntry>, SftpError> {
        let sftp = self.sftp.lock().await;
        let read_dir = sftp
            .read_dir(path)
            .await
            .map_err(|e| SftpError::from_sftp("read directory", path, e))?;

        Ok(read_dir
            .map(|entry| RemoteDirEntry {
                name: entry.file_name(),
                metadata: RemoteMetadata::from(&entry.metadata()),
            })
            .collect())
    }

    async fn metadata(&self, path: &str) -> Result<RemoteMetadata, SftpError> {
        let sftp = self.sftp.lock().await;
        let attrs = sftp
            .metadata(path)
            .await
            .map_err(|e| SftpError::from_sftp("stat", path, e))?;
        Ok(RemoteMetadata::from(&attrs))
    }

    async fn canonicalize(&self, path: &str) -> Result<String, SftpError> {
        let sftp = self.sftp.lock().await;
        sftp.canonicalize(path)
            .await
            .map_err(|e| SftpError::from_sftp("resolve", path, e))
    }

    async fn create_dir(&self, path: &str) -> Result<(), SftpError> {
        let sftp = self.sftp.lock().await;
        sftp.create_dir(path)
            .await
            .map_err(|e| SftpError::from_sftp("create directory", path, e))
    }

    async fn set_permissions(&self, path: &str, mode: u32) -> Result<(), SftpError> {
        let sftp = self.sftp.lock().await;

        // Only the permission bits are sent
        let attrs = FileAttributes {
            permissions: Some(mode),
            ..Default::default()
        };

        sftp.set_metadata(path, attrs)
            .await
            .map_err(|e| SftpError::from_sftp("set permissions on", path, e))
    }

    async fn open_read(&self, path: &str) -> Result<File, SftpError> {
        let sftp = self.sftp.lock().await;
        sftp.open_with_flags(path, OpenFlags::READ)
            .await
            .map_err(|e| SftpError::from_sftp("open", path, e))
    }

    async fn check_write(&self, path: &str) -> Result<(), SftpError> {
        let mut file = {
            let sftp = self.sftp.lock().await;
            sftp.open_with_flags(path, OpenFlags::WRITE)
                .await
                .map_err(|e| SftpError::from_sftp("open for writing", path, e))?
        };
        if let Err(e) = file.shutdown().await {
            tracing::debug!("Closing write check handle on {} failed: {}", path, e);
        }
        Ok(())
    }

    fn identity(&self) -> RemoteIdentity {
        self.identity
    }
}
