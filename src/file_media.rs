//! LocalArchiveFile - IPD archive on the local file system.

use crate::decoder::{ArchiveDecoder, DecodeOptions, DecodedArchive};
use crate::error::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Local file implementation.
#[derive(Debug, Clone)]
pub struct LocalArchiveFile {
    path: PathBuf,
    name: String,
    length: u64,
}

impl LocalArchiveFile {
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            length: metadata.len(),
        })
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sync decode, streaming from disk.
    pub fn decode_sync(&self, options: DecodeOptions) -> Result<DecodedArchive> {
        let file = File::open(&self.path)?;
        tracing::debug!(file = %self.name, length = self.length, "decoding archive");
        ArchiveDecoder::new(BufReader::new(file))
            .with_options(options)
            .decode()
    }

    /// Async decode: the file is read with tokio, then decoded in memory.
    #[cfg(feature = "async")]
    #[cfg_attr(docsrs, doc(cfg(feature = "async")))]
    pub async fn decode_async(&self, options: DecodeOptions) -> Result<DecodedArchive> {
        let data = tokio::fs::read(&self.path).await?;
        tracing::debug!(file = %self.name, length = data.len(), "decoding archive");
        ArchiveDecoder::new(data.as_slice())
            .with_options(options)
            .decode()
    }
}
