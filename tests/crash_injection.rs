//! Crash injection through the guard binary
//!
//! Each test runs `guard` as a subprocess with `GUARD_CRASH_POINT` set, so
//! the process aborts part-way through a mutation. The guard file is then
//! inspected from this process, where no crash point is active.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use guardrec::crash_point::{points, CRASH_POINT_ENV};
use guardrec::record::RecordId;
use guardrec::store::{GuardStore, StoreConfig};
use tempfile::TempDir;

fn provision(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("GUARD");
    fs::write(&path, vec![0xFF; 656]).expect("Failed to provision guard file");
    path
}

fn run_guard(dir: &TempDir, guard: &Path, crash_point: Option<&str>, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_guard"));
    cmd.arg("--config")
        .arg(dir.path().join("absent.json"))
        .arg("--file")
        .arg(guard)
        .args(args)
        .env_remove(CRASH_POINT_ENV);
    if let Some(point) = crash_point {
        cmd.env(CRASH_POINT_ENV, point);
    }
    cmd.output().expect("Failed to run guard binary")
}

fn open(path: &Path) -> GuardStore {
    let mut store = GuardStore::new(StoreConfig::new(path));
    store.open().unwrap();
    store
}

#[test]
fn test_clean_run_leaves_flag_idle() {
    let dir = TempDir::new().unwrap();
    let guard = provision(&dir);

    let output = run_guard(&dir, &guard, None, &["create", "/sys-0/node-0/proc-0"]);
    assert!(output.status.success());

    let store = open(&guard);
    assert!(!store.write_in_progress().unwrap());
    assert_eq!(store.enumerate(true).unwrap().len(), 1);
}

#[test]
fn test_crash_before_slot_write() {
    let dir = TempDir::new().unwrap();
    let guard = provision(&dir);

    let output = run_guard(
        &dir,
        &guard,
        Some(points::STORE_BEFORE_SLOT_WRITE),
        &["create", "/sys-0/node-0/proc-0"],
    );
    assert!(!output.status.success());

    let store = open(&guard);
    assert!(store.write_in_progress().unwrap());
    assert!(store.enumerate(true).unwrap().is_empty());
}

#[test]
fn test_crash_after_slot_write() {
    let dir = TempDir::new().unwrap();
    let guard = provision(&dir);

    let output = run_guard(
        &dir,
        &guard,
        Some(points::STORE_AFTER_SLOT_WRITE),
        &["create", "/sys-0/node-0/proc-0"],
    );
    assert!(!output.status.success());

    let store = open(&guard);
    assert!(store.write_in_progress().unwrap());
    let records = store.enumerate(true).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_id, RecordId::Live(1));
}

#[test]
fn test_crash_before_flag_clear_in_bulk_resolve() {
    let dir = TempDir::new().unwrap();
    let guard = provision(&dir);
    for path in ["/sys-0/node-0/proc-0", "/sys-0/node-0/proc-1"] {
        assert!(run_guard(&dir, &guard, None, &["create", path]).status.success());
    }

    let output = run_guard(
        &dir,
        &guard,
        Some(points::STORE_BEFORE_FLAG_CLEAR),
        &["invalidate-all"],
    );
    assert!(!output.status.success());

    let store = open(&guard);
    assert!(store.write_in_progress().unwrap());
    assert!(store.enumerate(true).unwrap().iter().all(|r| r.is_resolved()));
}

#[test]
fn test_crash_before_erase() {
    let dir = TempDir::new().unwrap();
    let guard = provision(&dir);
    assert!(run_guard(&dir, &guard, None, &["create", "/sys-0/node-0/dimm-0"]).status.success());

    let output = run_guard(&dir, &guard, Some(points::STORE_BEFORE_ERASE), &["clear-all"]);
    assert!(!output.status.success());

    let store = open(&guard);
    assert!(store.write_in_progress().unwrap());
    assert_eq!(store.enumerate(true).unwrap().len(), 1);
}
