//! Return shapes handed to the host storage framework

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Kind of a scanned directory child
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// Short info for one node produced by a directory scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub identifier: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl DirectoryEntry {
    pub fn new(identifier: String, kind: EntryKind) -> Self {
        let name = super::path::basename(&identifier).to_string();
        Self {
            identifier,
            name,
            kind,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Metadata snapshot of a remote node, taken at call time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDetails {
    pub size: u64,
    #[serde(rename = "atime")]
    pub access_time: Option<DateTime<Utc>>,
    #[serde(rename = "mtime")]
    pub modify_time: Option<DateTime<Utc>>,
    /// SFTP v3 carries no change time; this mirrors the modify time
    #[serde(rename = "ctime")]
    pub change_time: Option<DateTime<Utc>>,
    /// Empty when the type cannot be determined
    #[serde(rename = "mimetype")]
    pub mime_type: String,
}

/// Readability and writability of one identifier for the session user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PermissionSet {
    #[serde(rename = "r")]
    pub readable: bool,
    #[serde(rename = "w")]
    pub writable: bool,
}
