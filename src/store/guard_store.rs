//! The guard record store
//!
//! Every operation re-reads the file; nothing is cached between calls.
//! Slots are scanned in order and the scan stops at the first blank slot
//! or at end of file.
//!
//! Mutations are bracketed by the header's write-in-progress flag. The flag
//! is cleared (bit 0 low) before the first slot byte is written and set
//! again once the last one is. A failed write leaves the flag cleared, so a
//! reader can tell the slot area may be torn.

use std::path::Path;

use super::config::{DeletionPolicy, StoreConfig};
use super::header::{self, GuardHeader, CURRENT_VERSION, GUARD_MAGIC};
use crate::crash_point::{maybe_crash, points};
use crate::entity::EntityPath;
use crate::errors::{GuardError, GuardResult};
use crate::observability::{log_event_with_fields, Event};
use crate::record::{is_blank, ErrorType, GuardRecord, RecordId, RESOLVED_SENTINEL};
use crate::storage::{ByteStore, GuardFile};

/// Which record `resolve` acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSelector {
    /// First live record guarding this entity
    ByPath(EntityPath),
    /// The live record with this id
    ById(u32),
}

impl RecordSelector {
    fn matches(&self, record: &GuardRecord) -> bool {
        match self {
            RecordSelector::ByPath(path) => record.target_id == *path,
            RecordSelector::ById(id) => record.record_id == RecordId::Live(*id),
        }
    }

    fn not_found(&self) -> GuardError {
        match self {
            RecordSelector::ByPath(path) => {
                GuardError::invalid_entity_path("No live guard record for entity path")
                    .with_details(format!("path: {}", path))
            }
            RecordSelector::ById(id) => GuardError::invalid_entry("No live guard record with id")
                .with_details(format!("record_id: {:08x}", id)),
        }
    }
}

/// Subset of records returned by [`GuardStore::records`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFilter {
    /// Every occupied slot
    All,
    /// Resolved persistent records
    Resolved,
    /// Live persistent records
    Unresolved,
    /// Firmware-owned records, resolved or not
    Ephemeral,
    /// Every record that is not ephemeral
    Persistent,
}

impl RecordFilter {
    pub fn matches(self, record: &GuardRecord) -> bool {
        match self {
            RecordFilter::All => true,
            RecordFilter::Resolved => record.is_resolved() && !record.is_ephemeral(),
            RecordFilter::Unresolved => !record.is_resolved() && !record.is_ephemeral(),
            RecordFilter::Ephemeral => record.is_ephemeral(),
            RecordFilter::Persistent => !record.is_ephemeral(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreState {
    Uninitialized,
    Initialized,
}

/// Occupied slots in file order, plus the slot capacity at scan time
struct Scan {
    records: Vec<GuardRecord>,
    capacity: usize,
}

/// Guard record store over a fixed-size, pre-provisioned file.
///
/// Access from more than one process at a time is not coordinated; the
/// result of concurrent mutation is undefined.
pub struct GuardStore<B: ByteStore = GuardFile> {
    config: StoreConfig,
    backend: B,
    state: StoreState,
}

impl GuardStore<GuardFile> {
    /// Store backed by the file named in `config`
    pub fn new(config: StoreConfig) -> Self {
        let backend = GuardFile::new(config.path.clone());
        Self::with_backend(config, backend)
    }
}

impl<B: ByteStore> GuardStore<B> {
    pub fn with_backend(config: StoreConfig, backend: B) -> Self {
        Self {
            config,
            backend,
            state: StoreState::Uninitialized,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_open(&self) -> bool {
        self.state == StoreState::Initialized
    }

    /// Validate the file and move to the initialized state.
    ///
    /// A headered file without magic is a freshly provisioned one: magic
    /// and version are written in place and the slot area is left as is.
    pub fn open(&mut self) -> GuardResult<()> {
        let size = self.backend.size().map_err(|e| {
            GuardError::store_open_failed("Failed to open guard file")
                .with_details(format!("path: {}, cause: {}", self.config.path.display(), e))
        })?;
        if size == 0 {
            return Err(GuardError::store_open_failed("Guard file is empty")
                .with_details(format!("path: {}", self.config.path.display())));
        }

        let layout = self.config.layout;
        if layout.has_header() {
            let bytes = self.backend.read(0, layout.header_size()).map_err(|e| {
                GuardError::store_open_failed("Failed to read guard header")
                    .with_details(format!("path: {}, cause: {}", self.config.path.display(), e))
            })?;
            let header = GuardHeader::parse(&bytes)
                .ok_or_else(|| GuardError::store_open_failed("Guard header truncated"))?;

            if !header.has_magic() {
                self.backend.write(header::MAGIC_OFFSET, GUARD_MAGIC)?;
                self.backend
                    .write(header::VERSION_OFFSET, &[CURRENT_VERSION])?;
                log_event_with_fields(
                    Event::HeaderMigrated,
                    &[
                        ("path", &self.config.path.display().to_string()),
                        ("version", &CURRENT_VERSION.to_string()),
                    ],
                );
            }
        }

        self.state = StoreState::Initialized;
        log_event_with_fields(
            Event::StoreOpen,
            &[
                ("path", &self.config.path.display().to_string()),
                ("layout", &layout.to_string()),
                ("capacity", &layout.capacity(size).to_string()),
            ],
        );
        Ok(())
    }

    /// Configured file location; only available once opened
    pub fn path(&self) -> GuardResult<&Path> {
        self.ensure_open()?;
        Ok(self.config.path())
    }

    /// Number of whole slots the file holds
    pub fn capacity(&self) -> GuardResult<usize> {
        self.ensure_open()?;
        Ok(self.config.layout.capacity(self.backend.size()?))
    }

    /// True if the last mutation never finished. Always false for the
    /// headerless layout, which has no flag.
    pub fn write_in_progress(&self) -> GuardResult<bool> {
        self.ensure_open()?;
        if !self.config.layout.has_header() {
            return Ok(false);
        }
        let flags = self.backend.read(header::FLAGS_OFFSET, 1)?;
        Ok(header::flags_write_in_progress(flags[0]))
    }

    pub fn is_ephemeral(err_type: ErrorType) -> bool {
        err_type.is_ephemeral()
    }

    /// Occupied slots in file order, resolved ones included.
    /// Ephemeral records are dropped unless `include_ephemeral`.
    pub fn enumerate(&self, include_ephemeral: bool) -> GuardResult<Vec<GuardRecord>> {
        let filter = if include_ephemeral {
            RecordFilter::All
        } else {
            RecordFilter::Persistent
        };
        self.records(filter)
    }

    pub fn records(&self, filter: RecordFilter) -> GuardResult<Vec<GuardRecord>> {
        self.ensure_open()?;
        let scan = self.scan()?;
        Ok(scan
            .records
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect())
    }

    /// Guard `target`, or upgrade the record already guarding it.
    ///
    /// A live persistent record for the same entity is replaced only when
    /// `overwrite` is set and `err_type` outranks the stored severity.
    /// Otherwise a resolved slot is recycled, then the next blank slot is
    /// used. The new id is one past the highest live id in the file.
    pub fn create(
        &mut self,
        target: &EntityPath,
        elog_id: u32,
        err_type: ErrorType,
        overwrite: bool,
    ) -> GuardResult<GuardRecord> {
        self.ensure_open()?;
        let scan = self.scan()?;

        let mut recyclable = None;
        let mut max_id = 0u32;
        for (index, existing) in scan.records.iter().enumerate() {
            let id = match existing.record_id {
                RecordId::Resolved => {
                    recyclable.get_or_insert(index);
                    continue;
                }
                RecordId::Live(id) => id,
            };
            max_id = max_id.max(id);

            if !existing.is_ephemeral() && existing.target_id == *target {
                return self.override_record(index, existing, elog_id, err_type, overwrite);
            }
        }

        let used = scan.records.len();
        let index = match recyclable {
            Some(index) => index,
            None if used < scan.capacity => used,
            None => {
                log_event_with_fields(
                    Event::FileOverflow,
                    &[
                        ("path", &target.to_string()),
                        ("capacity", &scan.capacity.to_string()),
                    ],
                );
                return Err(GuardError::overflowed("No free slot in guard file").with_details(
                    format!(
                        "records: {}, record_size: {}",
                        used,
                        self.config.layout.record_size()
                    ),
                ));
            }
        };

        let record_id = max_id
            .checked_add(1)
            .filter(|id| *id != RESOLVED_SENTINEL)
            .ok_or_else(|| {
                GuardError::overflowed("Record id space exhausted")
                    .with_details(format!("max_id: {:08x}", max_id))
            })?;

        let record = GuardRecord::new(record_id, *target, elog_id, err_type, self.config.layout);
        self.write_slot(index, &record)?;

        log_event_with_fields(
            Event::RecordCreated,
            &[
                ("record_id", &record_id.to_string()),
                ("slot", &index.to_string()),
                ("path", &target.to_string()),
                ("err_type", &err_type.to_string()),
            ],
        );
        Ok(record)
    }

    fn override_record(
        &mut self,
        index: usize,
        existing: &GuardRecord,
        elog_id: u32,
        err_type: ErrorType,
        overwrite: bool,
    ) -> GuardResult<GuardRecord> {
        let details = format!(
            "record_id: {}, path: {}, stored: {}, incoming: {}",
            existing.record_id, existing.target_id, existing.err_type, err_type
        );

        let refusal = if !overwrite {
            Some("Entity already guarded")
        } else if !existing.err_type.can_be_overridden_by(err_type) {
            Some("Entity already guarded at equal or higher severity")
        } else {
            None
        };
        if let Some(message) = refusal {
            log_event_with_fields(Event::RecordRejected, &[("reason", message), ("details", &details)]);
            return Err(GuardError::already_guarded(message).with_details(details));
        }

        let mut updated = existing.clone();
        updated.elog_id = elog_id;
        updated.err_type = err_type;
        self.write_slot(index, &updated)?;

        log_event_with_fields(Event::RecordOverridden, &[("details", &details)]);
        Ok(updated)
    }

    /// Resolve the first live record matching `selector`
    pub fn resolve(&mut self, selector: &RecordSelector) -> GuardResult<()> {
        self.ensure_open()?;
        if *selector == RecordSelector::ById(RESOLVED_SENTINEL) {
            return Err(GuardError::invalid_entry("Record id is the resolved sentinel")
                .with_details(format!("record_id: {:08x}", RESOLVED_SENTINEL)));
        }

        let scan = self.scan()?;
        let index = scan
            .records
            .iter()
            .position(|r| !r.is_resolved() && selector.matches(r))
            .ok_or_else(|| selector.not_found())?;

        let record = &scan.records[index];
        let fields = [
            ("record_id", record.record_id.to_string()),
            ("path", record.target_id.to_string()),
            ("deletion", self.config.deletion.to_string()),
        ];
        self.remove_slots(&scan.records, &[index])?;

        let fields: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        log_event_with_fields(Event::RecordResolved, &fields);
        Ok(())
    }

    /// Resolve every live record. A file with no records is left untouched.
    pub fn resolve_all(&mut self) -> GuardResult<()> {
        self.resolve_where(|_| true).map(|_| ())
    }

    /// Resolve every live record for which `predicate` holds, in one pass
    /// under one flag bracket. Returns how many were resolved.
    pub fn resolve_where<F>(&mut self, predicate: F) -> GuardResult<usize>
    where
        F: Fn(&GuardRecord) -> bool,
    {
        self.ensure_open()?;
        let scan = self.scan()?;
        if scan.records.is_empty() {
            log_event_with_fields(
                Event::NothingToResolve,
                &[("path", &self.config.path.display().to_string())],
            );
            return Ok(0);
        }

        let targets: Vec<usize> = scan
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_resolved() && predicate(r))
            .map(|(index, _)| index)
            .collect();
        if targets.is_empty() {
            return Ok(0);
        }

        self.remove_slots(&scan.records, &targets)?;
        log_event_with_fields(
            Event::ResolveAll,
            &[
                ("resolved", &targets.len().to_string()),
                ("deletion", &self.config.deletion.to_string()),
            ],
        );
        Ok(targets.len())
    }

    /// Fill the slot area with `0xFF`. The header is kept.
    pub fn erase_all(&mut self) -> GuardResult<()> {
        self.ensure_open()?;
        let size = self.backend.size()?;
        let start = self.config.layout.header_size() as u64;
        if size <= start {
            return Ok(());
        }

        self.begin_write()?;
        maybe_crash(points::STORE_BEFORE_ERASE);
        self.backend.erase(start, size - start)?;
        self.end_write()?;

        log_event_with_fields(
            Event::EraseAll,
            &[
                ("path", &self.config.path.display().to_string()),
                ("bytes", &(size - start).to_string()),
            ],
        );
        Ok(())
    }

    fn ensure_open(&self) -> GuardResult<()> {
        match self.state {
            StoreState::Initialized => Ok(()),
            StoreState::Uninitialized => Err(GuardError::store_open_failed(
                "Guard store used before open",
            )),
        }
    }

    fn scan(&self) -> GuardResult<Scan> {
        let layout = self.config.layout;
        let capacity = layout.capacity(self.backend.size()?);

        let mut records = Vec::new();
        for index in 0..capacity {
            let offset = layout.slot_offset(index);
            let slot = self.backend.read(offset, layout.record_size())?;
            if is_blank(&slot) {
                break;
            }
            let record = GuardRecord::from_wire(&slot, layout).map_err(|e| {
                let context = format!("slot: {}, byte_offset: {}", index, offset);
                let details = match e.details() {
                    Some(prior) => format!("{}, {}", context, prior),
                    None => context,
                };
                e.with_details(details)
            })?;
            records.push(record);
        }
        Ok(Scan { records, capacity })
    }

    /// Overwrite one slot under the flag
    fn write_slot(&mut self, index: usize, record: &GuardRecord) -> GuardResult<()> {
        let layout = self.config.layout;
        self.begin_write()?;
        maybe_crash(points::STORE_BEFORE_SLOT_WRITE);
        self.backend
            .write(layout.slot_offset(index), &record.to_wire(layout))?;
        maybe_crash(points::STORE_AFTER_SLOT_WRITE);
        self.end_write()
    }

    /// Take the slots at `targets` (ascending) out of service according to
    /// the deletion policy, under a single flag bracket
    fn remove_slots(&mut self, records: &[GuardRecord], targets: &[usize]) -> GuardResult<()> {
        let layout = self.config.layout;
        self.begin_write()?;

        match self.config.deletion {
            DeletionPolicy::Tombstone => {
                for &index in targets {
                    let mut tombstone = records[index].clone();
                    tombstone.record_id = RecordId::Resolved;
                    self.backend
                        .write(layout.slot_offset(index), &tombstone.to_wire(layout))?;
                }
            }
            DeletionPolicy::Compact => {
                let first = targets[0];
                let survivors: Vec<&GuardRecord> = records
                    .iter()
                    .enumerate()
                    .skip(first)
                    .filter(|(index, _)| !targets.contains(index))
                    .map(|(_, r)| r)
                    .collect();
                for (offset, record) in survivors.iter().enumerate() {
                    self.backend
                        .write(layout.slot_offset(first + offset), &record.to_wire(layout))?;
                }
                let tail = first + survivors.len();
                let freed = (records.len() - tail) * layout.record_size();
                self.backend.erase(layout.slot_offset(tail), freed as u64)?;
            }
        }

        maybe_crash(points::STORE_BEFORE_FLAG_CLEAR);
        self.end_write()
    }

    fn begin_write(&mut self) -> GuardResult<()> {
        self.set_write_flag(true)
    }

    fn end_write(&mut self) -> GuardResult<()> {
        self.set_write_flag(false)
    }

    fn set_write_flag(&mut self, in_progress: bool) -> GuardResult<()> {
        if !self.config.layout.has_header() {
            return Ok(());
        }
        let current = self.backend.read(header::FLAGS_OFFSET, 1)?[0];
        let updated = header::with_write_in_progress(current, in_progress);
        self.backend.write(header::FLAGS_OFFSET, &[updated])
    }
}
