//! Guard record store
//!
//! The store owns the guard file's slot area. It scans, creates, resolves
//! and erases records through a [`ByteStore`](crate::storage::ByteStore),
//! re-reading the file on every call.
//!
//! ```ignore
//! use guardrec::store::{GuardStore, StoreConfig};
//!
//! let mut store = GuardStore::new(StoreConfig::new("/var/lib/guard/GUARD"));
//! store.open()?;
//! let record = store.create(&target, 0, ErrorType::UserManual, true)?;
//! ```

mod config;
mod guard_store;
pub mod header;

pub use config::{DeletionPolicy, StoreConfig};
pub use guard_store::{GuardStore, RecordFilter, RecordSelector};
