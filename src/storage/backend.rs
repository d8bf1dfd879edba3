//! Byte-range storage seam

use crate::errors::{GuardError, GuardResult};

/// Chunk size used when erasing
pub const ERASE_CHUNK: usize = 4096;

/// Positioned access to a single fixed-size storage object.
///
/// Implementations never resize the object and never retry; failures are
/// reported as `StoreOpenFailed`, `SeekFailed`, `ReadFailed` or
/// `WriteFailed` with the offending offset and length.
pub trait ByteStore {
    /// Read exactly `len` bytes at `offset`
    fn read(&self, offset: u64, len: usize) -> GuardResult<Vec<u8>>;

    /// Write all of `data` at `offset`
    fn write(&mut self, offset: u64, data: &[u8]) -> GuardResult<()>;

    /// Total size in bytes
    fn size(&self) -> GuardResult<u64>;

    /// Fill `len` bytes at `offset` with `0xFF`
    fn erase(&mut self, offset: u64, len: u64) -> GuardResult<()> {
        if len == 0 {
            return Err(GuardError::invalid_entry("Erase length must be non-zero")
                .with_details(format!("byte_offset: {}", offset)));
        }

        let chunk = [0xFFu8; ERASE_CHUNK];
        let mut done = 0u64;
        while done < len {
            let step = (len - done).min(ERASE_CHUNK as u64) as usize;
            self.write(offset + done, &chunk[..step])?;
            done += step as u64;
        }
        Ok(())
    }
}
