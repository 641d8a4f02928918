//! Synchronous facade for hosts without an async runtime

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::runtime::{Builder, Runtime};

use crate::config::SftpConfig;
use crate::error::SftpError;
use crate::sftp::SftpChannel;
use crate::sftp::remote::RemoteFs;
use crate::sftp::types::{DirectoryEntry, FileDetails, PermissionSet};

use super::{HashAlgorithm, SftpDriver};

/// [`SftpDriver`] driven on its own current-thread runtime.
///
/// Must not be used from within an async context; `block_on` panics there.
pub struct BlockingSftpDriver<R: RemoteFs = SftpChannel> {
    // Declared before the runtime so the session is dropped first
    driver: SftpDriver<R>,
    runtime: Runtime,
}

fn runtime() -> Result<Runtime, SftpError> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| SftpError::LocalIo(format!("Failed to start async runtime: {}", e)))
}

impl BlockingSftpDriver<SftpChannel> {
    pub fn connect(config: &SftpConfig) -> Result<Self, SftpError> {
        let runtime = runtime()?;
        let driver = runtime.block_on(SftpDriver::connect(config))?;
        Ok(Self { driver, runtime })
    }

    /// Disconnect the session and shut the runtime down.
    pub fn close(self) -> Result<(), SftpError> {
        let Self { driver, runtime } = self;
        runtime.block_on(driver.close())
    }
}

impl<R: RemoteFs> BlockingSftpDriver<R> {
    /// Wrap an existing driver; it must not be bound to another runtime.
    pub fn from_driver(driver: SftpDriver<R>) -> Result<Self, SftpError> {
        Ok(Self {
            driver,
            runtime: runtime()?,
        })
    }

    pub fn driver(&self) -> &SftpDriver<R> {
        &self.driver
    }

    pub fn scan_directory(
        &self,
        identifier: &str,
        include_files: bool,
        include_folders: bool,
        recursive: bool,
    ) -> Result<HashMap<String, DirectoryEntry>, SftpError> {
        self.runtime.block_on(self.driver.scan_directory(
            identifier,
            include_files,
            include_folders,
            recursive,
        ))
    }

    pub fn folder_exists(&self, identifier: &str) -> Result<bool, SftpError> {
        self.runtime.block_on(self.driver.folder_exists(identifier))
    }

    pub fn file_exists(&self, identifier: &str) -> Result<bool, SftpError> {
        self.runtime.block_on(self.driver.file_exists(identifier))
    }

    pub fn get_permissions(&self, identifier: &str) -> Result<PermissionSet, SftpError> {
        self.runtime.block_on(self.driver.get_permissions(identifier))
    }

    pub fn create_folder(&self, identifier: &str, recursive: bool) -> Result<String, SftpError> {
        self.runtime
            .block_on(self.driver.create_folder(identifier, recursive))
    }

    pub fn get_details(&self, identifier: &str) -> Result<FileDetails, SftpError> {
        self.runtime.block_on(self.driver.get_details(identifier))
    }

    pub fn hash(&self, identifier: &str, algorithm: &str) -> Result<String, SftpError> {
        self.runtime.block_on(self.driver.hash(identifier, algorithm))
    }

    pub fn hash_with(
        &self,
        identifier: &str,
        algorithm: HashAlgorithm,
    ) -> Result<String, SftpError> {
        self.runtime
            .block_on(self.driver.hash_with(identifier, algorithm))
    }

    pub fn download_file(&self, identifier: &str, target: &Path) -> Result<PathBuf, SftpError> {
        self.runtime
            .block_on(self.driver.download_file(identifier, target))
    }
}
