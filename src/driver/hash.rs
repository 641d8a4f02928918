//! Content digests computed by streaming the remote file

use std::fmt;
use std::str::FromStr;

use data_encoding::HEXLOWER;
use md5::Md5;
use sha1::{Digest, Sha1};
use tokio::io::AsyncReadExt;

use crate::error::SftpError;
use crate::sftp::remote::RemoteFs;

use super::SftpDriver;

const CHUNK_SIZE: usize = 32 * 1024;

/// Digest algorithms the adapter can compute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha1,
    Md5,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Md5 => "md5",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = SftpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha1" => Ok(HashAlgorithm::Sha1),
            "md5" => Ok(HashAlgorithm::Md5),
            _ => Err(SftpError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl<R: RemoteFs> SftpDriver<R> {
    /// Hex digest of a remote file, by algorithm name.
    ///
    /// Returns an empty string for algorithm names other than `sha1` and
    /// `md5`; use [`SftpDriver::hash_with`] to rule that case out.
    pub async fn hash(&self, identifier: &str, algorithm: &str) -> Result<String, SftpError> {
        match algorithm.parse::<HashAlgorithm>() {
            Ok(algorithm) => self.hash_with(identifier, algorithm).await,
            Err(_) => {
                tracing::warn!(
                    "Unsupported hash algorithm {:?} requested for {}",
                    algorithm,
                    identifier
                );
                Ok(String::new())
            }
        }
    }

    /// Lowercase hex digest of a remote file, read in fixed-size chunks.
    pub async fn hash_with(
        &self,
        identifier: &str,
        algorithm: HashAlgorithm,
    ) -> Result<String, SftpError> {
        let reader = self.fs.open_read(identifier).await?;
        let digest = match algorithm {
            HashAlgorithm::Sha1 => digest_stream::<Sha1, _>(reader, identifier).await?,
            HashAlgorithm::Md5 => digest_stream::<Md5, _>(reader, identifier).await?,
        };
        tracing::debug!("{} of {} is {}", algorithm, identifier, digest);
        Ok(digest)
    }
}

async fn digest_stream<D, T>(mut reader: T, identifier: &str) -> Result<String, SftpError>
where
    D: Digest,
    T: tokio::io::AsyncRead + Unpin,
{
    let mut hasher = D::new();
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let n = reader.read(&mut buf).await.map_err(|e| {
            SftpError::FileOperation(format!("Failed to read {}: {}", identifier, e))
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(HEXLOWER.encode(&hasher.finalize()))
}
