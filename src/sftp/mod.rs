//! SFTP session management for the adapter
//!
//! Establishes the authenticated channel and exposes typed remote operations
//! over it.

pub mod client;
pub mod path;
pub mod remote;
pub mod session;
pub mod types;

pub use client::SftpClient;
pub use remote::{NodeKind, RemoteDirEntry, RemoteFs, RemoteIdentity, RemoteMetadata};
pub use session::SftpChannel;
pub use types::{DirectoryEntry, EntryKind, FileDetails, PermissionSet};
