//! Guard file header (headered layout only)
//!
//! ```text
//! offset 0   8 bytes  magic "GUARDREC"
//! offset 8   1 byte   layout version
//! offset 9   1 byte   flags
//! offset 10  6 bytes  reserved
//! ```
//!
//! Flags bit 0 is active-low: provisioning leaves it set (idle) and a
//! mutation clears it while slots are being written.

use crate::record::HEADER_SIZE;

pub const GUARD_MAGIC: &[u8; 8] = b"GUARDREC";
pub const CURRENT_VERSION: u8 = 0x02;

pub const MAGIC_OFFSET: u64 = 0;
pub const VERSION_OFFSET: u64 = 8;
pub const FLAGS_OFFSET: u64 = 9;

/// Flags bit 0; set means no write in progress
pub const FLAG_WRITE_IDLE: u8 = 0x01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardHeader {
    pub magic: [u8; 8],
    pub version: u8,
    pub flags: u8,
}

impl GuardHeader {
    /// Parse the leading header bytes; `None` if fewer than 16 bytes
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < HEADER_SIZE {
            return None;
        }
        let mut magic = [0u8; 8];
        magic.copy_from_slice(&bytes[..8]);
        Some(Self {
            magic,
            version: bytes[VERSION_OFFSET as usize],
            flags: bytes[FLAGS_OFFSET as usize],
        })
    }

    pub fn has_magic(&self) -> bool {
        &self.magic == GUARD_MAGIC
    }

    pub fn write_in_progress(&self) -> bool {
        flags_write_in_progress(self.flags)
    }
}

pub fn flags_write_in_progress(flags: u8) -> bool {
    flags & FLAG_WRITE_IDLE == 0
}

/// `flags` with bit 0 updated; reserved bits are preserved
pub fn with_write_in_progress(flags: u8, in_progress: bool) -> u8 {
    if in_progress {
        flags & !FLAG_WRITE_IDLE
    } else {
        flags | FLAG_WRITE_IDLE
    }
}
