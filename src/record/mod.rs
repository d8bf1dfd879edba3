//! Guard record layout and codec
//!
//! Records live in fixed-width slots. The codec converts between the
//! big-endian on-disk form and host-endian `GuardRecord` values; the store
//! applies it on every slot it returns and reverses it on every write.

mod guard_record;
mod layout;

pub use guard_record::{is_blank, ErrorType, GuardRecord, RecordId, RESOLVED_SENTINEL};
pub use layout::{RecordLayout, HEADER_SIZE, RECORD_PREFIX_SIZE};
