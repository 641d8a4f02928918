//! Retrieval of remote file content into local files

use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::{self, AsyncWriteExt};
use uuid::Uuid;

use crate::error::SftpError;
use crate::sftp::remote::RemoteFs;

use super::SftpDriver;

impl<R: RemoteFs> SftpDriver<R> {
    /// Copy the bytes of a remote file to `target`.
    ///
    /// Data is written to a hidden `.part` file next to `target` and renamed
    /// over it once the byte count matches the remote size, so `target` is
    /// either the complete copy or untouched. Returns `target`.
    pub async fn download_file(
        &self,
        identifier: &str,
        target: &Path,
    ) -> Result<PathBuf, SftpError> {
        let fail = |reason: String| SftpError::Transfer {
            identifier: identifier.to_string(),
            target: target.to_path_buf(),
            reason,
        };

        let metadata = self
            .fs
            .metadata(identifier)
            .await
            .map_err(|e| fail(e.to_string()))?;
        if !metadata.is_file() {
            return Err(fail("not a regular file".to_string()));
        }

        let remote = self
            .fs
            .open_read(identifier)
            .await
            .map_err(|e| fail(e.to_string()))?;

        let temp = part_path(target).ok_or_else(|| fail("invalid target path".to_string()))?;

        match copy_to(remote, &temp, metadata.size).await {
            Ok(bytes) => {
                tokio::fs::rename(&temp, target).await.map_err(|e| {
                    discard(&temp);
                    fail(format!("Failed to move download into place: {}", e))
                })?;
                tracing::debug!(
                    "Downloaded {} to {} ({} bytes)",
                    identifier,
                    target.display(),
                    bytes
                );
                Ok(target.to_path_buf())
            }
            Err(reason) => {
                discard(&temp);
                Err(fail(reason))
            }
        }
    }
}

/// Hidden sibling of `target` that receives the bytes in flight
fn part_path(target: &Path) -> Option<PathBuf> {
    let name = target.file_name()?.to_string_lossy();
    let part = format!(".{}.part-{}", name, Uuid::new_v4().simple());
    Some(match target.parent() {
        Some(parent) => parent.join(part),
        None => PathBuf::from(part),
    })
}

fn discard(temp: &Path) {
    if let Err(e) = std::fs::remove_file(temp) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Failed to remove partial download {}: {}", temp.display(), e);
        }
    }
}

async fn copy_to<T>(mut remote: T, temp: &Path, expected: u64) -> Result<u64, String>
where
    T: io::AsyncRead + Unpin,
{
    if let Some(parent) = temp.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            format!(
                "Failed to create local directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }

    let mut local = {
        let mut options = OpenOptions::new();
        options.create_new(true).write(true);
        #[cfg(unix)]
        {
            options.mode(0o600);
        }
        options
            .open(temp)
            .await
            .map_err(|e| format!("Failed to write local file {}: {}", temp.display(), e))?
    };

    let bytes = io::copy(&mut remote, &mut local)
        .await
        .map_err(|e| format!("Transfer interrupted: {}", e))?;

    local
        .flush()
        .await
        .map_err(|e| format!("Failed to flush local file: {}", e))?;
    local
        .sync_all()
        .await
        .map_err(|e| format!("Failed to sync local file: {}", e))?;

    if bytes != expected {
        return Err(format!(
            "Short transfer: received {} of {} bytes",
            bytes, expected
        ));
    }

    Ok(bytes)
}
