//! Observable guard events
//!
//! Events are explicit and typed; the logger only ever sees their names.

use std::fmt;

/// Observable events in the guard store and its resolvers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Store lifecycle
    /// Store opened and header validated
    StoreOpen,
    /// Magic/version written in place on a provisioned file
    HeaderMigrated,

    // Record mutations
    /// New record written to a slot
    RecordCreated,
    /// Existing record upgraded to a higher severity
    RecordOverridden,
    /// Create refused (duplicate or precedence)
    RecordRejected,
    /// Record tombstoned (or removed under compact deletion)
    RecordResolved,
    /// Bulk resolve completed
    ResolveAll,
    /// Data region erased
    EraseAll,
    /// No slot left for a new record
    FileOverflow,
    /// Bulk resolve on a store without records
    NothingToResolve,

    // Resolvers
    /// Hardware description tree loaded
    DevTreeLoaded,
    /// Physical path or entity path not known to the resolver
    PathNotFound,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::StoreOpen => "GUARD_STORE_OPEN",
            Event::HeaderMigrated => "GUARD_HEADER_MIGRATED",
            Event::RecordCreated => "GUARD_RECORD_CREATED",
            Event::RecordOverridden => "GUARD_RECORD_OVERRIDDEN",
            Event::RecordRejected => "GUARD_RECORD_REJECTED",
            Event::RecordResolved => "GUARD_RECORD_RESOLVED",
            Event::ResolveAll => "GUARD_RESOLVE_ALL",
            Event::EraseAll => "GUARD_ERASE_ALL",
            Event::FileOverflow => "GUARD_FILE_OVERFLOW",
            Event::NothingToResolve => "GUARD_NOTHING_TO_RESOLVE",
            Event::DevTreeLoaded => "GUARD_DEVTREE_LOADED",
            Event::PathNotFound => "GUARD_PATH_NOT_FOUND",
        }
    }

    /// Returns true if this event reports a failed operation
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::RecordRejected | Event::FileOverflow | Event::PathNotFound
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
