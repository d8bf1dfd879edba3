//! Crash point injection for crash-safety testing
//!
//! When `GUARD_CRASH_POINT` names a point the store passes, the process
//! terminates on the spot via `std::process::abort()`: no cleanup, no
//! unwinding. The guard file is left exactly as a power loss at that point
//! would leave it, which is what the write-in-progress flag is meant to
//! reveal.
//!
//! ```bash
//! GUARD_CRASH_POINT=store_after_slot_write guard create /sys-0/node-0/dimm-0
//! ```

use std::sync::OnceLock;

/// Environment variable naming the active crash point
pub const CRASH_POINT_ENV: &str = "GUARD_CRASH_POINT";

static CRASH_POINT: OnceLock<Option<String>> = OnceLock::new();

#[inline]
fn get_crash_point() -> Option<&'static str> {
    CRASH_POINT
        .get_or_init(|| std::env::var(CRASH_POINT_ENV).ok())
        .as_deref()
}

/// Returns true if `GUARD_CRASH_POINT` equals `name`
#[inline]
pub fn crash_point_enabled(name: &str) -> bool {
    get_crash_point().map(|p| p == name).unwrap_or(false)
}

/// Abort the process if the named crash point is enabled
#[inline]
pub fn maybe_crash(name: &str) {
    if crash_point_enabled(name) {
        eprintln!("[CRASH] Triggering crash at point: {}", name);
        std::process::abort();
    }
}

/// All defined crash point names
pub mod points {
    /// Flag set, slot not yet written
    pub const STORE_BEFORE_SLOT_WRITE: &str = "store_before_slot_write";
    /// Slot written, flag still set
    pub const STORE_AFTER_SLOT_WRITE: &str = "store_after_slot_write";
    /// All slots of a bulk operation written, flag still set
    pub const STORE_BEFORE_FLAG_CLEAR: &str = "store_before_flag_clear";
    /// Flag set, data region not yet erased
    pub const STORE_BEFORE_ERASE: &str = "store_before_erase";

    pub fn all() -> &'static [&'static str] {
        &[
            STORE_BEFORE_SLOT_WRITE,
            STORE_AFTER_SLOT_WRITE,
            STORE_BEFORE_FLAG_CLEAR,
            STORE_BEFORE_ERASE,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crash_point_disabled_by_default() {
        assert!(!crash_point_enabled("test_point"));
    }

    #[test]
    fn test_crash_point_names_are_lowercase_with_underscores() {
        assert_eq!(points::all().len(), 4);
        for point in points::all() {
            assert!(
                point.chars().all(|c| c.is_lowercase() || c == '_'),
                "Crash point '{}' should be lowercase with underscores",
                point
            );
        }
    }
}
