//! Filesystem adapter over an SFTP channel
//!
//! [`SftpDriver`] maps filesystem-shaped calls made by identifier onto the
//! typed operations of a [`RemoteFs`]. In production that is the
//! [`SftpChannel`] opened by [`SftpDriver::connect`].

pub mod blocking;
pub mod download;
pub mod hash;
pub mod permissions;
pub mod scan;

use chrono::{DateTime, TimeZone, Utc};

use crate::config::SftpConfig;
use crate::error::SftpError;
use crate::sftp::path;
use crate::sftp::remote::RemoteFs;
use crate::sftp::types::FileDetails;
use crate::sftp::{SftpChannel, SftpClient};

pub use blocking::BlockingSftpDriver;
pub use hash::HashAlgorithm;
pub use scan::ScanOptions;

const DIRECTORY_MIME_TYPE: &str = "inode/directory";

/// The filesystem adapter
#[derive(Debug)]
pub struct SftpDriver<R: RemoteFs = SftpChannel> {
    fs: R,
    folder_mode: u32,
}

impl SftpDriver<SftpChannel> {
    /// Validate `config`, then connect and authenticate.
    ///
    /// Fails without returning a driver if any step of session setup fails.
    pub async fn connect(config: &SftpConfig) -> Result<Self, SftpError> {
        config.validate()?;
        let channel = SftpClient::new(config).connect(config).await?;
        Ok(Self::from_parts(channel, config.folder_mode))
    }

    /// Release the session.
    pub async fn close(self) -> Result<(), SftpError> {
        self.fs.close().await
    }
}

impl<R: RemoteFs> SftpDriver<R> {
    /// Build a driver over an already established channel
    pub fn from_parts(fs: R, folder_mode: u32) -> Self {
        Self { fs, folder_mode }
    }

    pub fn remote(&self) -> &R {
        &self.fs
    }

    /// Mode applied to folders created by [`SftpDriver::create_folder`]
    pub fn folder_mode(&self) -> u32 {
        self.folder_mode
    }

    /// Whether `identifier` names a directory, following links.
    pub async fn folder_exists(&self, identifier: &str) -> Result<bool, SftpError> {
        match self.fs.metadata(identifier).await {
            Ok(metadata) => Ok(metadata.is_dir()),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Whether `identifier` names a regular file, following links.
    pub async fn file_exists(&self, identifier: &str) -> Result<bool, SftpError> {
        match self.fs.metadata(identifier).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Create a folder and apply the configured folder mode.
    ///
    /// With `recursive`, missing ancestors are created first (each with the
    /// same mode); otherwise a missing parent is an error.
    pub async fn create_folder(
        &self,
        identifier: &str,
        recursive: bool,
    ) -> Result<String, SftpError> {
        let fail = |e: SftpError| SftpError::CreateFolder {
            identifier: identifier.to_string(),
            reason: e.to_string(),
        };

        if !recursive {
            self.make_folder(identifier).await.map_err(fail)?;
            return Ok(identifier.to_string());
        }

        for ancestor in path::ancestors(identifier) {
            if self.folder_exists(&ancestor).await.map_err(fail)? {
                continue;
            }
            self.make_folder(&ancestor).await.map_err(fail)?;
        }

        Ok(identifier.to_string())
    }

    async fn make_folder(&self, identifier: &str) -> Result<(), SftpError> {
        self.fs.create_dir(identifier).await?;

        // The server applies its umask on mkdir; the folder exists either way
        match self.fs.set_permissions(identifier, self.folder_mode).await {
            Ok(()) => {
                tracing::debug!("Created folder {} ({:o})", identifier, self.folder_mode);
            }
            Err(e) => {
                tracing::warn!(
                    "Created folder {} but could not set mode {:o}, keeping the server default: {}",
                    identifier,
                    self.folder_mode,
                    e
                );
            }
        }
        Ok(())
    }

    /// Size, timestamps and MIME type of a node, following links.
    pub async fn get_details(&self, identifier: &str) -> Result<FileDetails, SftpError> {
        let metadata = self.fs.metadata(identifier).await?;

        let mime_type = if metadata.is_dir() {
            DIRECTORY_MIME_TYPE.to_string()
        } else {
            mime_guess::from_path(identifier)
                .first_raw()
                .unwrap_or_default()
                .to_string()
        };

        let modify_time = timestamp(metadata.mtime);
        Ok(FileDetails {
            size: metadata.size,
            access_time: timestamp(metadata.atime),
            modify_time,
            change_time: modify_time,
            mime_type,
        })
    }
}

fn timestamp(secs: Option<u32>) -> Option<DateTime<Utc>> {
    secs.and_then(|s| Utc.timestamp_opt(i64::from(s), 0).single())
}
