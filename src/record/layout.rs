//! On-disk layout variants
//!
//! Both variants share the 30-byte record prefix:
//!
//! ```text
//! +-----------+-------------+----------+----------+---------------------+
//! | record_id | target_id   | elog_id  | err_type | trailer (opaque)    |
//! | u32 BE    | 21 B packed | u32 BE   | u8       | layout dependent    |
//! +-----------+-------------+----------+----------+---------------------+
//! ```
//!
//! | variant      | header | slot  | trailer                                |
//! |--------------|--------|-------|----------------------------------------|
//! | `Headered`   | 16     | 128   | 80 B unique id + 18 B padding          |
//! | `Headerless` | 0      | 37    | 1 B resource recovery + 6 B padding    |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::ENTITY_PATH_SIZE;

/// Bytes shared by every layout before the trailer
pub const RECORD_PREFIX_SIZE: usize = 4 + ENTITY_PATH_SIZE + 4 + 1;

/// Header size of the headered layout
pub const HEADER_SIZE: usize = 16;

const HEADERED_RECORD_SIZE: usize = 128;
const HEADERLESS_RECORD_SIZE: usize = 37;

/// Serial number + part number bytes zeroed on create (11S identity form)
const IDENTITY_ZEROED: usize = 12 + 7;

/// Record layout variant, fixed for the life of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordLayout {
    /// 16-byte header, 128-byte slots with manufacturing identity
    #[default]
    Headered,
    /// No header, 37-byte slots
    Headerless,
}

impl RecordLayout {
    /// Offset of the first slot
    pub fn header_size(self) -> usize {
        match self {
            RecordLayout::Headered => HEADER_SIZE,
            RecordLayout::Headerless => 0,
        }
    }

    /// Width of one slot
    pub fn record_size(self) -> usize {
        match self {
            RecordLayout::Headered => HEADERED_RECORD_SIZE,
            RecordLayout::Headerless => HEADERLESS_RECORD_SIZE,
        }
    }

    /// Width of the opaque trailer after the shared prefix
    pub fn trailer_size(self) -> usize {
        self.record_size() - RECORD_PREFIX_SIZE
    }

    pub fn has_header(self) -> bool {
        self.header_size() > 0
    }

    /// Byte offset of slot `index`
    pub fn slot_offset(self, index: usize) -> u64 {
        (self.header_size() + index * self.record_size()) as u64
    }

    /// Whole slots that fit in a file of `file_size` bytes
    pub fn capacity(self, file_size: u64) -> usize {
        let data = file_size.saturating_sub(self.header_size() as u64);
        (data / self.record_size() as u64) as usize
    }

    /// Trailer for a newly created record: provisioned `0xFF` with the
    /// serial/part number area zeroed where the layout carries one
    pub fn fresh_trailer(self) -> Vec<u8> {
        let mut trailer = vec![0xFF; self.trailer_size()];
        if self == RecordLayout::Headered {
            trailer[..IDENTITY_ZEROED].fill(0);
        }
        trailer
    }
}

impl fmt::Display for RecordLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordLayout::Headered => write!(f, "headered"),
            RecordLayout::Headerless => write!(f, "headerless"),
        }
    }
}
