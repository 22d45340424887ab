//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! Byte sources that containers are read from and saved to

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Holder of a container's raw bytes.
///
/// Decoders only ever see a byte slice; this seam decides where those bytes
/// live and where they go on save.
pub trait ByteSource {
    /// The current bytes
    fn contents(&self) -> Result<Vec<u8>>;

    /// Replace the bytes; nothing is persisted until [`ByteSource::save`]
    fn set_contents(&mut self, data: Vec<u8>);

    /// Persist the current bytes
    fn save(&mut self) -> Result<()>;

    /// Release the source without saving
    fn close(self)
    where
        Self: Sized,
    {
    }
}

/// In-memory source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySource {
    data: Vec<u8>,
    saves: usize,
}

impl MemorySource {
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, saves: 0 }
    }

    /// How many times [`ByteSource::save`] was called
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl ByteSource for MemorySource {
    fn contents(&self) -> Result<Vec<u8>> {
        Ok(self.data.clone())
    }

    fn set_contents(&mut self, data: Vec<u8>) {
        self.data = data;
    }

    fn save(&mut self) -> Result<()> {
        self.saves += 1;
        Ok(())
    }
}

/// File-backed source: read once on open, written on save
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    data: Vec<u8>,
}

impl FileSource {
    /// Read an existing file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = fs::read(&path)?;
        tracing::debug!("Read {} bytes from {}", data.len(), path.display());
        Ok(Self { path, data })
    }

    /// Start an empty source for a file that is written on save
    pub fn create<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            data: Vec::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn contents(&self) -> Result<Vec<u8>> {
        Ok(self.data.clone())
    }

    fn set_contents(&mut self, data: Vec<u8>) {
        self.data = data;
    }

    fn save(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, &self.data)?;
        tracing::debug!("Wrote {} bytes to {}", self.data.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_memory_source() {
        let mut source = MemorySource::new(vec![1, 2, 3]);
        assert_eq!(source.contents().unwrap(), vec![1, 2, 3]);
        source.set_contents(vec![4]);
        source.save().unwrap();
        assert_eq!(source.save_count(), 1);
        assert_eq!(source.into_inner(), vec![4]);
    }

    #[test]
    fn test_file_source_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.bin");

        let mut source = FileSource::create(&path);
        source.set_contents(b"MsgStdBn".to_vec());
        // Not on disk until saved
        assert!(!path.exists());
        source.save().unwrap();
        source.close();

        let reopened = FileSource::open(&path).unwrap();
        assert_eq!(reopened.contents().unwrap(), b"MsgStdBn");
        assert_eq!(reopened.path(), path.as_path());
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::open(dir.path().join("absent.msbt")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
