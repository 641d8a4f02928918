//! Directory scanning

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::SftpError;
use crate::sftp::path;
use crate::sftp::remote::{NodeKind, RemoteDirEntry, RemoteFs};
use crate::sftp::types::{DirectoryEntry, EntryKind};

use super::SftpDriver;

/// Which children a scan reports, and whether it descends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub include_files: bool,
    pub include_folders: bool,
    pub recursive: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include_files: true,
            include_folders: true,
            recursive: false,
        }
    }
}

impl ScanOptions {
    fn includes(&self, kind: EntryKind) -> bool {
        match kind {
            EntryKind::File => self.include_files,
            EntryKind::Dir => self.include_folders,
        }
    }
}

impl<R: RemoteFs> SftpDriver<R> {
    /// List the children of `identifier`, keyed by identifier.
    ///
    /// Symbolic links are classified by their target; broken links and
    /// special files are left out. A recursive scan descends into every
    /// folder found, whether or not folders are reported, and never enters
    /// the same real directory twice.
    pub async fn scan_directory(
        &self,
        identifier: &str,
        include_files: bool,
        include_folders: bool,
        recursive: bool,
    ) -> Result<HashMap<String, DirectoryEntry>, SftpError> {
        self.scan_with(
            identifier,
            ScanOptions {
                include_files,
                include_folders,
                recursive,
            },
        )
        .await
    }

    pub async fn scan_with(
        &self,
        identifier: &str,
        options: ScanOptions,
    ) -> Result<HashMap<String, DirectoryEntry>, SftpError> {
        let root = path::normalize(identifier);
        let mut result = HashMap::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        let root_real = if options.recursive {
            self.fs.canonicalize(&root).await?
        } else {
            root.clone()
        };
        visited.insert(root_real.clone());
        queue.push_back((root, root_real));
        let mut at_root = true;

        while let Some((dir, dir_real)) = queue.pop_front() {
            let is_root = std::mem::replace(&mut at_root, false);
            let children = match self.fs.read_dir(&dir).await {
                Ok(children) => children,
                // Descendants may disappear while the scan is running
                Err(e) if e.is_not_found() && !is_root => {
                    tracing::debug!("Skipping vanished directory {}: {}", dir, e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            for child in children {
                if child.name == "." || child.name == ".." {
                    continue;
                }

                let child_id = path::join(&dir, &child.name);
                let Some((kind, linked)) = self.classify(&child_id, &child).await? else {
                    continue;
                };

                if options.includes(kind) {
                    result.insert(child_id.clone(), DirectoryEntry::new(child_id.clone(), kind));
                }

                if kind != EntryKind::Dir || !options.recursive {
                    continue;
                }

                let child_real = if linked {
                    match self.fs.canonicalize(&child_id).await {
                        Ok(real) => real,
                        Err(e) if e.is_not_found() => continue,
                        Err(e) => return Err(e),
                    }
                } else {
                    path::join(&dir_real, &child.name)
                };

                if visited.insert(child_real.clone()) {
                    queue.push_back((child_id, child_real));
                } else {
                    tracing::debug!("Not descending into {}: already visited", child_id);
                }
            }
        }

        tracing::debug!("Scanned {}: {} entries", identifier, result.len());
        Ok(result)
    }

    /// Kind of a listed child, following links. `None` for nodes to skip.
    async fn classify(
        &self,
        child_id: &str,
        child: &RemoteDirEntry,
    ) -> Result<Option<(EntryKind, bool)>, SftpError> {
        let (kind, linked) = match child.metadata.kind {
            NodeKind::Symlink => match self.fs.metadata(child_id).await {
                Ok(target) => (target.kind, true),
                Err(e) if e.is_not_found() => {
                    tracing::debug!("Skipping broken link {}", child_id);
                    return Ok(None);
                }
                Err(e) => return Err(e),
            },
            kind => (kind, false),
        };

        Ok(match kind {
            NodeKind::File => Some((EntryKind::File, linked)),
            NodeKind::Dir => Some((EntryKind::Dir, linked)),
            _ => None,
        })
    }
}
