//! File-backed byte store
//!
//! Every call opens the file, performs one positioned read or write and
//! drops the handle. Nothing is cached, so each operation sees the current
//! on-disk state. The file is never created, truncated or extended here;
//! provisioning happens out of band.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::backend::ByteStore;
use crate::errors::{GuardError, GuardResult};

#[derive(Debug, Clone)]
pub struct GuardFile {
    path: PathBuf,
}

impl GuardFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_failed(&self, action: &str, source: std::io::Error) -> GuardError {
        GuardError::store_open_failed(format!("Failed to open guard file for {}", action))
            .with_details(format!("path: {}", self.path.display()))
            .with_source(source)
    }
}

impl ByteStore for GuardFile {
    fn read(&self, offset: u64, len: usize) -> GuardResult<Vec<u8>> {
        let mut file = File::open(&self.path).map_err(|e| self.open_failed("read", e))?;

        file.seek(SeekFrom::Start(offset))
            .map_err(|e| GuardError::seek_failed(offset, e))?;

        let mut buf = vec![0u8; len];
        file.read_exact(&mut buf)
            .map_err(|e| GuardError::read_failed(offset, len as u64, e))?;
        Ok(buf)
    }

    fn write(&mut self, offset: u64, data: &[u8]) -> GuardResult<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| self.open_failed("write", e))?;

        file.seek(SeekFrom::Start(offset))
            .map_err(|e| GuardError::seek_failed(offset, e))?;

        file.write_all(data)
            .map_err(|e| GuardError::write_failed(offset, data.len() as u64, e))?;

        // flag byte must be durable before the slot it brackets
        file.sync_data()
            .map_err(|e| GuardError::write_failed(offset, data.len() as u64, e))?;
        Ok(())
    }

    fn size(&self) -> GuardResult<u64> {
        fs::metadata(&self.path)
            .map(|m| m.len())
            .map_err(|e| self.open_failed("size query", e))
    }
}
