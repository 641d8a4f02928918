//! Typed operations the adapter issues against the remote filesystem.

use std::future::Future;

use russh_sftp::protocol::FileAttributes;
use tokio::io::AsyncRead;

use crate::error::SftpError;

/// Node type as reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Dir,
    Symlink,
    Other,
}

/// Attribute block of one remote node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMetadata {
    pub kind: NodeKind,
    pub size: u64,
    /// Permission bits without the file type
    pub mode: Option<u32>,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub atime: Option<u32>,
    pub mtime: Option<u32>,
}

impl RemoteMetadata {
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }
}

impl From<&FileAttributes> for RemoteMetadata {
    fn from(attrs: &FileAttributes) -> Self {
        let kind = if attrs.is_symlink() {
            NodeKind::Symlink
        } else if attrs.is_dir() {
            NodeKind::Dir
        } else if attrs.is_regular() {
            NodeKind::File
        } else {
            NodeKind::Other
        };

        Self {
            kind,
            size: attrs.size.unwrap_or(0),
            mode: attrs.permissions.map(|p| p & 0o7777),
            uid: attrs.uid,
            gid: attrs.gid,
            atime: attrs.atime,
            mtime: attrs.mtime,
        }
    }
}

/// One child returned by a directory listing, with unfollowed attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDirEntry {
    pub name: String,
    pub metadata: RemoteMetadata,
}

/// The account the session is authenticated as, as seen by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemoteIdentity {
    pub uid: Option<u32>,
    pub gid: Option<u32>,
}

/// Typed operations over a single remote channel.
///
/// Paths are passed through as given; the implementation never rewrites
/// them beyond what its transport requires.
pub trait RemoteFs: Send + Sync {
    type Reader: AsyncRead + Unpin + Send;

    /// List the children of a directory (may include `.` and `..`)
    fn read_dir(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<Vec<RemoteDirEntry>, SftpError>> + Send;

    /// stat: follows symbolic links
    fn metadata(&self, path: &str)
    -> impl Future<Output = Result<RemoteMetadata, SftpError>> + Send;

    /// realpath: resolve links and dot segments on the server
    fn canonicalize(&self, path: &str) -> impl Future<Output = Result<String, SftpError>> + Send;

    fn create_dir(&self, path: &str) -> impl Future<Output = Result<(), SftpError>> + Send;

    fn set_permissions(
        &self,
        path: &str,
        mode: u32,
    ) -> impl Future<Output = Result<(), SftpError>> + Send;

    /// Open a file for streaming reads
    fn open_read(&self, path: &str) -> impl Future<Output = Result<Self::Reader, SftpError>> + Send;

    /// Open a file for writing without creating or truncating it, then close it
    fn check_write(&self, path: &str) -> impl Future<Output = Result<(), SftpError>> + Send;

    fn identity(&self) -> RemoteIdentity;
}
