//! Readability and writability probing

use crate::error::SftpError;
use crate::sftp::remote::{RemoteFs, RemoteIdentity, RemoteMetadata};
use crate::sftp::types::PermissionSet;

use super::SftpDriver;

const WRITE_BITS: u32 = 0o2;
#[cfg(test)]
const READ_BITS: u32 = 0o4;

impl<R: RemoteFs> SftpDriver<R> {
    /// Whether the session user can read and write `identifier`.
    ///
    /// Files are checked by opening them. Directories are checked for
    /// readability by listing them; SFTP offers no way to open a directory
    /// for writing, so their write bit is evaluated against the session
    /// identity instead. A missing node is neither readable nor writable.
    pub async fn get_permissions(&self, identifier: &str) -> Result<PermissionSet, SftpError> {
        let metadata = match self.fs.metadata(identifier).await {
            Ok(metadata) => metadata,
            Err(e) if e.is_not_found() => return Ok(PermissionSet::default()),
            Err(e) => return Err(e),
        };

        let permissions = if metadata.is_dir() {
            PermissionSet {
                readable: access_granted(self.fs.read_dir(identifier).await.map(drop))?,
                writable: mode_allows(&metadata, self.fs.identity(), WRITE_BITS),
            }
        } else {
            PermissionSet {
                readable: access_granted(self.fs.open_read(identifier).await.map(drop))?,
                writable: access_granted(self.fs.check_write(identifier).await)?,
            }
        };

        tracing::debug!(
            "Permissions of {}: readable={} writable={}",
            identifier,
            permissions.readable,
            permissions.writable
        );
        Ok(permissions)
    }
}

/// Denial and a node vanishing mid-check both mean "no".
fn access_granted(result: Result<(), SftpError>) -> Result<bool, SftpError> {
    match result {
        Ok(()) => Ok(true),
        Err(e) if e.is_permission_denied() || e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Evaluate one access bit (`0o4` read, `0o2` write) of a node's mode.
///
/// Owner bits apply when the session uid owns the node, group bits when the
/// gid matches, and the other bits in every remaining case, including an
/// unknown identity.
fn mode_allows(metadata: &RemoteMetadata, identity: RemoteIdentity, bit: u32) -> bool {
    let Some(mode) = metadata.mode else {
        return false;
    };

    let owns = matches!(
        (identity.uid, metadata.uid),
        (Some(uid), Some(owner)) if uid == owner
    );
    let in_group = matches!(
        (identity.gid, metadata.gid),
        (Some(gid), Some(group)) if gid == group
    );

    let class_bit = if owns {
        bit << 6
    } else if in_group {
        bit << 3
    } else {
        bit
    };
    mode & class_bit != 0
}
