//! SFTP-backed filesystem adapter
//!
//! Exposes existence checks, directory scans, metadata, hashing, download and
//! folder creation over a single authenticated SFTP channel.

pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod sftp;
pub mod ssh;
pub mod validation;

pub(crate) mod security_log;

pub use config::{HostKeyPolicy, SftpConfig};
pub use driver::{BlockingSftpDriver, HashAlgorithm, ScanOptions, SftpDriver};
pub use error::{ConfigError, SftpError};
pub use sftp::{DirectoryEntry, EntryKind, FileDetails, PermissionSet};
