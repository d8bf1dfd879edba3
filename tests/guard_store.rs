//! Guard store behaviour on a real, pre-provisioned file
//!
//! Every test provisions its own guard file (all `0xFF`) inside a
//! `TempDir` and drives the store through the public API only.

use std::fs;
use std::path::{Path, PathBuf};

use guardrec::entity::{EntityPath, PathResolver, StaticTable};
use guardrec::errors::GuardErrorCode;
use guardrec::record::{ErrorType, RecordId, RecordLayout};
use guardrec::store::header::{GuardHeader, GUARD_MAGIC};
use guardrec::store::{DeletionPolicy, GuardStore, RecordFilter, RecordSelector, StoreConfig};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

/// 16-byte header plus five 128-byte slots
const HEADERED_SIZE: usize = 656;

fn provision(dir: &TempDir, size: usize) -> PathBuf {
    let path = dir.path().join("GUARD");
    fs::write(&path, vec![0xFF; size]).expect("Failed to provision guard file");
    path
}

fn open(path: &Path) -> GuardStore {
    let mut store = GuardStore::new(StoreConfig::new(path));
    store.open().expect("Failed to open guard store");
    store
}

fn entity(physical: &str) -> EntityPath {
    StaticTable::new()
        .path_to_entity(physical)
        .expect("Path missing from static table")
}

const PROC0: &str = "/sys-0/node-0/proc-0";
const PROC1: &str = "/sys-0/node-0/proc-1";
const DIMM0: &str = "/sys-0/node-0/dimm-0";

// =============================================================================
// Opening
// =============================================================================

#[test]
fn test_open_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let mut store = GuardStore::new(StoreConfig::new(dir.path().join("absent")));
    let err = store.open().unwrap_err();
    assert_eq!(err.code(), GuardErrorCode::StoreOpenFailed);
}

#[test]
fn test_open_empty_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, 0);
    let mut store = GuardStore::new(StoreConfig::new(&path));
    assert_eq!(store.open().unwrap_err().code(), GuardErrorCode::StoreOpenFailed);
}

#[test]
fn test_path_requires_open() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, HEADERED_SIZE);
    let mut store = GuardStore::new(StoreConfig::new(&path));
    assert_eq!(store.path().unwrap_err().code(), GuardErrorCode::StoreOpenFailed);

    store.open().unwrap();
    assert_eq!(store.path().unwrap(), path.as_path());
}

#[test]
fn test_open_migrates_provisioned_header_only() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, HEADERED_SIZE);
    let store = open(&path);
    assert_eq!(store.capacity().unwrap(), 5);

    let bytes = fs::read(&path).unwrap();
    let header = GuardHeader::parse(&bytes).unwrap();
    assert!(header.has_magic());
    assert_eq!(header.version, 0x02);
    assert!(!header.write_in_progress());
    assert!(bytes[16..].iter().all(|b| *b == 0xFF));
    assert_eq!(&bytes[..8], GUARD_MAGIC);
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_single_create() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, HEADERED_SIZE);
    let mut store = open(&path);

    store.create(&entity(PROC0), 0, ErrorType::UserManual, true).unwrap();

    let records = store.enumerate(false).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_id, RecordId::Live(1));
    assert_eq!(records[0].elog_id, 0);
    assert_eq!(records[0].err_type, ErrorType::UserManual);
    assert_eq!(records[0].target_id, entity(PROC0));
}

#[test]
fn test_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, HEADERED_SIZE);
    {
        let mut store = open(&path);
        store.create(&entity(PROC0), 0x9000_0001, ErrorType::Predictive, true).unwrap();
        store.create(&entity(DIMM0), 0x9000_0002, ErrorType::Fatal, true).unwrap();
    }

    let store = open(&path);
    let records = store.enumerate(true).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].record_id, RecordId::Live(2));
    assert_eq!(records[1].elog_id, 0x9000_0002);
    assert_eq!(records[1].err_type, ErrorType::Fatal);
}

#[test]
fn test_duplicate_create_fails() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, HEADERED_SIZE);
    let mut store = open(&path);

    store.create(&entity(PROC0), 0, ErrorType::UserManual, false).unwrap();
    let err = store
        .create(&entity(PROC0), 0, ErrorType::UserManual, false)
        .unwrap_err();
    assert_eq!(err.code(), GuardErrorCode::AlreadyGuarded);
    assert_eq!(store.enumerate(true).unwrap().len(), 1);
}

#[test]
fn test_manual_to_fatal_override_keeps_id() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, HEADERED_SIZE);
    let mut store = open(&path);

    store.create(&entity(PROC0), 0, ErrorType::UserManual, true).unwrap();
    let upgraded = store.create(&entity(PROC0), 7, ErrorType::Fatal, true).unwrap();
    assert_eq!(upgraded.record_id, RecordId::Live(1));

    let records = store.enumerate(false).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].err_type, ErrorType::Fatal);
    assert_eq!(records[0].elog_id, 7);
}

#[test]
fn test_same_severity_override_fails() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, HEADERED_SIZE);
    let mut store = open(&path);

    store.create(&entity(PROC0), 0, ErrorType::Fatal, true).unwrap();
    let err = store.create(&entity(PROC0), 0, ErrorType::Fatal, true).unwrap_err();
    assert_eq!(err.code(), GuardErrorCode::AlreadyGuarded);
}

#[test]
fn test_full_file_overflows() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, HEADERED_SIZE);
    let mut store = open(&path);

    for i in 0..5 {
        let physical = format!("/sys-0/node-0/dimm-{}", i);
        store.create(&entity(&physical), 0, ErrorType::UserManual, true).unwrap();
    }
    let err = store
        .create(&entity("/sys-0/node-0/dimm-5"), 0, ErrorType::UserManual, true)
        .unwrap_err();
    assert_eq!(err.code(), GuardErrorCode::GuardFileOverFlowed);
    assert_eq!(store.enumerate(true).unwrap().len(), 5);
}

#[test]
fn test_resolve_then_enumerate_shows_tombstone() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, HEADERED_SIZE);
    let mut store = open(&path);

    store.create(&entity(PROC0), 0, ErrorType::UserManual, true).unwrap();
    store.resolve(&RecordSelector::ByPath(entity(PROC0))).unwrap();

    let records = store.enumerate(false).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_id, RecordId::Resolved);
    assert_eq!(records[0].target_id, entity(PROC0));

    let err = store
        .resolve(&RecordSelector::ByPath(entity(PROC0)))
        .unwrap_err();
    assert_eq!(err.code(), GuardErrorCode::InvalidEntityPath);
}

#[test]
fn test_resolve_by_id() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, HEADERED_SIZE);
    let mut store = open(&path);

    store.create(&entity(PROC0), 0, ErrorType::UserManual, true).unwrap();
    store.create(&entity(PROC1), 0, ErrorType::UserManual, true).unwrap();
    store.resolve(&RecordSelector::ById(2)).unwrap();

    let live = store.records(RecordFilter::Unresolved).unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].target_id, entity(PROC0));

    let err = store.resolve(&RecordSelector::ById(2)).unwrap_err();
    assert_eq!(err.code(), GuardErrorCode::InvalidEntry);
}

#[test]
fn test_erase_all_empties_store() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, HEADERED_SIZE);
    let mut store = open(&path);

    store.create(&entity(PROC0), 0, ErrorType::UserManual, true).unwrap();
    store.create(&entity(PROC1), 0, ErrorType::Reconfig, true).unwrap();
    store.erase_all().unwrap();

    assert!(store.enumerate(true).unwrap().is_empty());
    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), HEADERED_SIZE);
    assert_eq!(&bytes[..8], GUARD_MAGIC);
    assert!(!store.write_in_progress().unwrap());
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_ids_are_monotonic() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, HEADERED_SIZE);
    let mut store = open(&path);

    let ids: Vec<RecordId> = [PROC0, PROC1, DIMM0]
        .iter()
        .map(|p| {
            store
                .create(&entity(p), 0, ErrorType::UserManual, true)
                .unwrap()
                .record_id
        })
        .collect();
    assert_eq!(ids, vec![RecordId::Live(1), RecordId::Live(2), RecordId::Live(3)]);
}

#[test]
fn test_resolved_slot_recycled_with_next_id() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, HEADERED_SIZE);
    let mut store = open(&path);

    store.create(&entity(PROC0), 0, ErrorType::UserManual, true).unwrap();
    store.create(&entity(PROC1), 0, ErrorType::UserManual, true).unwrap();
    store.resolve(&RecordSelector::ByPath(entity(PROC0))).unwrap();

    let reused = store.create(&entity(DIMM0), 0, ErrorType::Fatal, true).unwrap();
    assert_eq!(reused.record_id, RecordId::Live(3));

    let records = store.enumerate(true).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].target_id, entity(DIMM0));
}

#[test]
fn test_ephemeral_records_are_hidden_and_coexist() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, HEADERED_SIZE);
    let mut store = open(&path);

    store.create(&entity(PROC0), 0, ErrorType::Reconfig, true).unwrap();
    store.create(&entity(PROC0), 0, ErrorType::StickyDeconfig, true).unwrap();
    store.create(&entity(PROC0), 0, ErrorType::UserManual, false).unwrap();

    let persistent = store.enumerate(false).unwrap();
    assert_eq!(persistent.len(), 1);
    assert_eq!(persistent[0].record_id, RecordId::Live(3));
    assert_eq!(store.enumerate(true).unwrap().len(), 3);
    assert_eq!(store.records(RecordFilter::Ephemeral).unwrap().len(), 2);
    assert!(GuardStore::<guardrec::storage::GuardFile>::is_ephemeral(ErrorType::Reconfig));
}

#[test]
fn test_resolve_all_tombstones_everything() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, HEADERED_SIZE);
    let mut store = open(&path);

    store.create(&entity(PROC0), 0, ErrorType::UserManual, true).unwrap();
    store.create(&entity(DIMM0), 0, ErrorType::Fatal, true).unwrap();
    store.resolve_all().unwrap();

    let records = store.enumerate(true).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.is_resolved()));
    assert!(!store.write_in_progress().unwrap());
}

#[test]
fn test_resolve_all_on_empty_file_leaves_bytes() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, HEADERED_SIZE);
    let mut store = open(&path);
    let before = fs::read(&path).unwrap();

    store.resolve_all().unwrap();
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_compact_deletion_keeps_ids() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, HEADERED_SIZE);
    let config = StoreConfig::new(&path).with_deletion(DeletionPolicy::Compact);
    let mut store = GuardStore::new(config);
    store.open().unwrap();

    store.create(&entity(PROC0), 0, ErrorType::UserManual, true).unwrap();
    store.create(&entity(PROC1), 0, ErrorType::UserManual, true).unwrap();
    store.create(&entity(DIMM0), 0, ErrorType::UserManual, true).unwrap();
    store.resolve(&RecordSelector::ByPath(entity(PROC1))).unwrap();

    let records = store.enumerate(true).unwrap();
    let ids: Vec<RecordId> = records.iter().map(|r| r.record_id).collect();
    assert_eq!(ids, vec![RecordId::Live(1), RecordId::Live(3)]);
    assert!(store.records(RecordFilter::Resolved).unwrap().is_empty());
}

#[test]
fn test_headerless_layout() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, 4 * 37);
    let config = StoreConfig::new(&path).with_layout(RecordLayout::Headerless);
    let mut store = GuardStore::new(config);
    store.open().unwrap();

    // no header means nothing written on open
    assert!(fs::read(&path).unwrap().iter().all(|b| *b == 0xFF));

    for physical in [PROC0, PROC1, DIMM0, "/sys-0/node-0/dimm-1"] {
        store.create(&entity(physical), 0, ErrorType::Unrecoverable, true).unwrap();
    }
    let err = store
        .create(&entity("/sys-0/node-0/dimm-2"), 0, ErrorType::Unrecoverable, true)
        .unwrap_err();
    assert_eq!(err.code(), GuardErrorCode::GuardFileOverFlowed);

    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], &[0, 0, 0, 1]);
    assert_eq!(&bytes[37..41], &[0, 0, 0, 2]);
    assert_eq!(bytes[29], 0xE2);
}

#[test]
fn test_on_disk_record_is_big_endian() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, HEADERED_SIZE);
    let mut store = open(&path);
    store.create(&entity(PROC1), 0x0102_0304, ErrorType::Predictive, true).unwrap();

    let bytes = fs::read(&path).unwrap();
    let slot = &bytes[16..16 + 128];
    assert_eq!(&slot[..4], &[0, 0, 0, 1]);
    assert_eq!(&slot[4..11], &[0x23, 0x01, 0x00, 0x02, 0x00, 0x05, 0x01]);
    assert_eq!(&slot[25..29], &[1, 2, 3, 4]);
    assert_eq!(slot[29], 0xE6);
}

#[test]
fn test_torn_slot_still_recoverable_by_resolve_all() {
    let dir = TempDir::new().unwrap();
    let path = provision(&dir, HEADERED_SIZE);
    {
        let mut store = open(&path);
        store.create(&entity(PROC0), 0, ErrorType::UserManual, true).unwrap();
    }

    // slot 1 half written: record id landed, entity path still 0xFF
    let mut bytes = fs::read(&path).unwrap();
    let slot1 = 16 + 128;
    bytes[slot1..slot1 + 4].copy_from_slice(&[0, 0, 0, 2]);
    fs::write(&path, &bytes).unwrap();

    let mut store = open(&path);
    let records = store.enumerate(true).unwrap();
    assert_eq!(records.len(), 2);
    assert!(!records[1].target_id.is_well_formed());

    store.resolve_all().unwrap();
    let records = store.enumerate(true).unwrap();
    assert!(records.iter().all(|r| r.is_resolved()));
    // tombstoned, slot 1 is all 0xFF again and reads as blank
    assert_eq!(records.len(), 1);

    // the garbled bytes are kept as stored apart from the id
    let after = fs::read(&path).unwrap();
    assert_eq!(&after[slot1..slot1 + 4], &[0xFF; 4]);
    assert!(after[slot1 + 4..slot1 + 128].iter().all(|b| *b == 0xFF));
}
