//! Byte-range storage for the guard file
//!
//! The store consumes storage only through [`ByteStore`]:
//! positioned read, positioned write, erase (fill with `0xFF`) and size.
//!
//! - [`GuardFile`]: the real file, opened per call
//! - [`MemoryStore`]: in-memory buffer with write-failure injection

mod backend;
mod file;
mod memory;

pub use backend::{ByteStore, ERASE_CHUNK};
pub use file::GuardFile;
pub use memory::MemoryStore;
