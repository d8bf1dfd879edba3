//! guardrec - persistent guard records for failed hardware units
//!
//! A guard record marks a hardware unit (processor, core, DIMM, ...) as
//! faulty so firmware keeps it out of the next boot. Records live in a
//! fixed-size, pre-provisioned file of fixed-width slots.

pub mod cli;
pub mod crash_point;
pub mod entity;
pub mod errors;
pub mod observability;
pub mod record;
pub mod storage;
pub mod store;
