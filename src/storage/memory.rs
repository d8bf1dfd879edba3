//! In-memory byte store for simulation and fault injection

use std::io;

use super::backend::ByteStore;
use crate::errors::{GuardError, GuardResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    bytes: Vec<u8>,
    /// Remaining writes before injected failures begin
    writes_left: Option<usize>,
}

impl MemoryStore {
    /// A provisioned (all `0xFF`) store of `size` bytes
    pub fn provisioned(size: usize) -> Self {
        Self::from_bytes(vec![0xFF; size])
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            writes_left: None,
        }
    }

    /// Let `count` more writes succeed, then fail every write
    pub fn fail_writes_after(&mut self, count: usize) {
        self.writes_left = Some(count);
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn range(&self, offset: u64, len: usize) -> Option<std::ops::Range<usize>> {
        let start = usize::try_from(offset).ok()?;
        let end = start.checked_add(len)?;
        (end <= self.bytes.len()).then_some(start..end)
    }
}

impl ByteStore for MemoryStore {
    fn read(&self, offset: u64, len: usize) -> GuardResult<Vec<u8>> {
        let range = self.range(offset, len).ok_or_else(|| {
            GuardError::read_failed(
                offset,
                len as u64,
                io::Error::new(io::ErrorKind::UnexpectedEof, "read past end of store"),
            )
        })?;
        Ok(self.bytes[range].to_vec())
    }

    fn write(&mut self, offset: u64, data: &[u8]) -> GuardResult<()> {
        if let Some(left) = self.writes_left.as_mut() {
            if *left == 0 {
                return Err(GuardError::write_failed(
                    offset,
                    data.len() as u64,
                    io::Error::new(io::ErrorKind::Other, "injected write failure"),
                ));
            }
            *left -= 1;
        }

        let range = self.range(offset, data.len()).ok_or_else(|| {
            GuardError::write_failed(
                offset,
                data.len() as u64,
                io::Error::new(io::ErrorKind::WriteZero, "write past end of store"),
            )
        })?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    fn size(&self) -> GuardResult<u64> {
        Ok(self.bytes.len() as u64)
    }
}
