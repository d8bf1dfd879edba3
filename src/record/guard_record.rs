//! Guard record types and wire codec
//!
//! `record_id` and `elog_id` are big-endian on disk and host-endian in
//! memory. Everything else is copied byte for byte, including the opaque
//! trailer, so decode/encode of a slot is lossless.

use std::fmt;
use std::str::FromStr;

use super::layout::{RecordLayout, RECORD_PREFIX_SIZE};
use crate::entity::{EntityPath, ENTITY_PATH_SIZE};
use crate::errors::{GuardError, GuardResult};

/// On-disk sentinel marking a resolved (cleared) slot
pub const RESOLVED_SENTINEL: u32 = 0xFFFF_FFFF;

const TARGET_OFFSET: usize = 4;
const ELOG_OFFSET: usize = TARGET_OFFSET + ENTITY_PATH_SIZE;
const ERR_TYPE_OFFSET: usize = ELOG_OFFSET + 4;

/// Record identity. The sentinel only exists at the wire boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordId {
    Live(u32),
    Resolved,
}

impl RecordId {
    pub fn from_raw(raw: u32) -> Self {
        if raw == RESOLVED_SENTINEL {
            RecordId::Resolved
        } else {
            RecordId::Live(raw)
        }
    }

    pub fn to_raw(self) -> u32 {
        match self {
            RecordId::Live(id) => id,
            RecordId::Resolved => RESOLVED_SENTINEL,
        }
    }

    pub fn is_resolved(self) -> bool {
        self == RecordId::Resolved
    }

    /// Live id, `None` once resolved
    pub fn live(self) -> Option<u32> {
        match self {
            RecordId::Live(id) => Some(id),
            RecordId::Resolved => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Live(id) => write!(f, "{}", id),
            RecordId::Resolved => write!(f, "resolved"),
        }
    }
}

/// Why a unit was guarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    None,
    Spare,
    UserManual,
    Unrecoverable,
    Fatal,
    Predictive,
    Power,
    Hypervisor,
    /// Boot firmware resource recovery (ephemeral)
    Reconfig,
    /// Forced deconfig on a reconfig loop (ephemeral)
    StickyDeconfig,
    /// Tag not known here, preserved as-is
    Unknown(u8),
}

impl ErrorType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x00 => ErrorType::None,
            0xC0 => ErrorType::Spare,
            0xD2 => ErrorType::UserManual,
            0xE2 => ErrorType::Unrecoverable,
            0xE3 => ErrorType::Fatal,
            0xE6 => ErrorType::Predictive,
            0xE9 => ErrorType::Power,
            0xEA => ErrorType::Hypervisor,
            0xEB => ErrorType::Reconfig,
            0xEC => ErrorType::StickyDeconfig,
            other => ErrorType::Unknown(other),
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            ErrorType::None => 0x00,
            ErrorType::Spare => 0xC0,
            ErrorType::UserManual => 0xD2,
            ErrorType::Unrecoverable => 0xE2,
            ErrorType::Fatal => 0xE3,
            ErrorType::Predictive => 0xE6,
            ErrorType::Power => 0xE9,
            ErrorType::Hypervisor => 0xEA,
            ErrorType::Reconfig => 0xEB,
            ErrorType::StickyDeconfig => 0xEC,
            ErrorType::Unknown(v) => v,
        }
    }

    /// Owned by boot firmware and hidden from operator listings
    pub fn is_ephemeral(self) -> bool {
        matches!(self, ErrorType::Reconfig | ErrorType::StickyDeconfig)
    }

    /// Severity precedence for overwriting an existing guard:
    /// manual <- fatal | predictive, predictive <- fatal.
    pub fn can_be_overridden_by(self, incoming: ErrorType) -> bool {
        matches!(
            (self, incoming),
            (ErrorType::UserManual, ErrorType::Fatal)
                | (ErrorType::UserManual, ErrorType::Predictive)
                | (ErrorType::Predictive, ErrorType::Fatal)
        )
    }

    /// Reason string shown in listings
    pub fn reason(self) -> String {
        match self {
            ErrorType::None => "noReason".to_string(),
            ErrorType::Spare => "spare".to_string(),
            ErrorType::UserManual => "manual".to_string(),
            ErrorType::Unrecoverable => "unrecoverable".to_string(),
            ErrorType::Fatal => "fatal".to_string(),
            ErrorType::Predictive => "predictive".to_string(),
            ErrorType::Power => "power".to_string(),
            ErrorType::Hypervisor => "hypervisor".to_string(),
            ErrorType::Reconfig => "reconfig".to_string(),
            ErrorType::StickyDeconfig => "sticky_deconfig".to_string(),
            ErrorType::Unknown(v) => format!("unknown [{}]", v),
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason())
    }
}

impl FromStr for ErrorType {
    type Err = GuardError;

    /// Accepts the reason names, plus a raw `0x..` tag
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s.trim().to_ascii_lowercase().as_str() {
            "noreason" | "none" => ErrorType::None,
            "spare" => ErrorType::Spare,
            "manual" | "user_manual" => ErrorType::UserManual,
            "unrecoverable" => ErrorType::Unrecoverable,
            "fatal" => ErrorType::Fatal,
            "predictive" => ErrorType::Predictive,
            "power" => ErrorType::Power,
            "hypervisor" | "phyp" => ErrorType::Hypervisor,
            "reconfig" => ErrorType::Reconfig,
            "sticky_deconfig" => ErrorType::StickyDeconfig,
            other => {
                let hex = other.strip_prefix("0x").ok_or_else(|| {
                    GuardError::invalid_entry(format!("Unknown guard type '{}'", s))
                })?;
                let raw = u8::from_str_radix(hex, 16).map_err(|_| {
                    GuardError::invalid_entry(format!("Unknown guard type '{}'", s))
                })?;
                ErrorType::from_u8(raw)
            }
        };
        Ok(ty)
    }
}

/// One slot of the guard file, host-endian
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardRecord {
    pub record_id: RecordId,
    /// Guarded unit
    pub target_id: EntityPath,
    /// Associated error log, 0 when none
    pub elog_id: u32,
    pub err_type: ErrorType,
    /// Manufacturing identity and padding; never interpreted
    pub trailer: Vec<u8>,
}

impl GuardRecord {
    /// A new live record with a freshly provisioned trailer
    pub fn new(
        record_id: u32,
        target_id: EntityPath,
        elog_id: u32,
        err_type: ErrorType,
        layout: RecordLayout,
    ) -> Self {
        Self {
            record_id: RecordId::Live(record_id),
            target_id,
            elog_id,
            err_type,
            trailer: layout.fresh_trailer(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.record_id.is_resolved()
    }

    pub fn is_ephemeral(&self) -> bool {
        self.err_type.is_ephemeral()
    }

    /// Serialize to exactly `layout.record_size()` bytes.
    ///
    /// The trailer is truncated or `0xFF`-padded to the layout's width.
    pub fn to_wire(&self, layout: RecordLayout) -> Vec<u8> {
        let mut buf = Vec::with_capacity(layout.record_size());
        buf.extend_from_slice(&self.record_id.to_raw().to_be_bytes());
        buf.extend_from_slice(&self.target_id.to_bytes());
        buf.extend_from_slice(&self.elog_id.to_be_bytes());
        buf.push(self.err_type.as_u8());

        let width = layout.trailer_size();
        let kept = self.trailer.len().min(width);
        buf.extend_from_slice(&self.trailer[..kept]);
        buf.resize(layout.record_size(), 0xFF);
        buf
    }

    /// Deserialize one slot
    pub fn from_wire(data: &[u8], layout: RecordLayout) -> GuardResult<Self> {
        if data.len() < layout.record_size() {
            return Err(GuardError::invalid_entry("Guard record too short").with_details(
                format!("expected {} bytes, got {}", layout.record_size(), data.len()),
            ));
        }

        let record_id = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
        // kept as stored; a garbled path must not hide the rest of the file
        let mut packed = [0u8; ENTITY_PATH_SIZE];
        packed.copy_from_slice(&data[TARGET_OFFSET..ELOG_OFFSET]);
        let target_id = EntityPath::from_packed(&packed);
        let elog_id = u32::from_be_bytes([
            data[ELOG_OFFSET],
            data[ELOG_OFFSET + 1],
            data[ELOG_OFFSET + 2],
            data[ELOG_OFFSET + 3],
        ]);
        let err_type = ErrorType::from_u8(data[ERR_TYPE_OFFSET]);
        let trailer = data[RECORD_PREFIX_SIZE..layout.record_size()].to_vec();

        Ok(Self {
            record_id: RecordId::from_raw(record_id),
            target_id,
            elog_id,
            err_type,
            trailer,
        })
    }
}

/// A never-written slot is all `0xFF`
pub fn is_blank(slot: &[u8]) -> bool {
    slot.iter().all(|b| *b == 0xFF)
}
