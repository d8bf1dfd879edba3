//! Static physical-path table
//!
//! Fixed bidirectional mapping between the physical paths of a reference
//! two-socket system and their packed entity paths. Used when no hardware
//! description tree is available.

use super::path::EntityPath;
use super::resolver::PathResolver;

/// Target type codes used in the table's path elements
pub mod target_type {
    pub const SYS: u8 = 0x01;
    pub const NODE: u8 = 0x02;
    pub const DIMM: u8 = 0x03;
    pub const PROC: u8 = 0x05;
    pub const CORE: u8 = 0x07;
    pub const EQ: u8 = 0x23;
    pub const FC: u8 = 0x53;
}

/// (physical path, exact-length raw entity path)
const PHYSICAL_ENTITY_TABLE: &[(&str, &[u8])] = &[
    ("/sys-0/node-0/proc-0", &[0x23, 0x01, 0x00, 0x02, 0x00, 0x05, 0x00]),
    ("/sys-0/node-0/proc-0/eq-0", &[0x24, 0x01, 0x00, 0x02, 0x00, 0x05, 0x00, 0x23, 0x00]),
    ("/sys-0/node-0/proc-0/eq-0/fc-0", &[0x25, 0x01, 0x00, 0x02, 0x00, 0x05, 0x00, 0x23, 0x00, 0x53, 0x00]),
    ("/sys-0/node-0/proc-0/eq-0/fc-0/core-0", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x00, 0x23, 0x00, 0x53, 0x00, 0x07, 0x00]),
    ("/sys-0/node-0/proc-0/eq-0/fc-0/core-1", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x00, 0x23, 0x00, 0x53, 0x00, 0x07, 0x01]),
    ("/sys-0/node-0/proc-0/eq-0/fc-1", &[0x25, 0x01, 0x00, 0x02, 0x00, 0x05, 0x00, 0x23, 0x00, 0x53, 0x01]),
    ("/sys-0/node-0/proc-0/eq-0/fc-1/core-0", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x00, 0x23, 0x00, 0x53, 0x01, 0x07, 0x00]),
    ("/sys-0/node-0/proc-0/eq-0/fc-1/core-1", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x00, 0x23, 0x00, 0x53, 0x01, 0x07, 0x01]),
    ("/sys-0/node-0/proc-0/eq-1", &[0x24, 0x01, 0x00, 0x02, 0x00, 0x05, 0x00, 0x23, 0x01]),
    ("/sys-0/node-0/proc-0/eq-1/fc-0", &[0x25, 0x01, 0x00, 0x02, 0x00, 0x05, 0x00, 0x23, 0x01, 0x53, 0x00]),
    ("/sys-0/node-0/proc-0/eq-1/fc-0/core-0", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x00, 0x23, 0x01, 0x53, 0x00, 0x07, 0x00]),
    ("/sys-0/node-0/proc-0/eq-1/fc-0/core-1", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x00, 0x23, 0x01, 0x53, 0x00, 0x07, 0x01]),
    ("/sys-0/node-0/proc-0/eq-1/fc-1", &[0x25, 0x01, 0x00, 0x02, 0x00, 0x05, 0x00, 0x23, 0x01, 0x53, 0x01]),
    ("/sys-0/node-0/proc-0/eq-1/fc-1/core-0", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x00, 0x23, 0x01, 0x53, 0x01, 0x07, 0x00]),
    ("/sys-0/node-0/proc-0/eq-1/fc-1/core-1", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x00, 0x23, 0x01, 0x53, 0x01, 0x07, 0x01]),
    ("/sys-0/node-0/proc-1", &[0x23, 0x01, 0x00, 0x02, 0x00, 0x05, 0x01]),
    ("/sys-0/node-0/proc-1/eq-0", &[0x24, 0x01, 0x00, 0x02, 0x00, 0x05, 0x01, 0x23, 0x00]),
    ("/sys-0/node-0/proc-1/eq-0/fc-0", &[0x25, 0x01, 0x00, 0x02, 0x00, 0x05, 0x01, 0x23, 0x00, 0x53, 0x00]),
    ("/sys-0/node-0/proc-1/eq-0/fc-0/core-0", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x01, 0x23, 0x00, 0x53, 0x00, 0x07, 0x00]),
    ("/sys-0/node-0/proc-1/eq-0/fc-0/core-1", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x01, 0x23, 0x00, 0x53, 0x00, 0x07, 0x01]),
    ("/sys-0/node-0/proc-1/eq-0/fc-1", &[0x25, 0x01, 0x00, 0x02, 0x00, 0x05, 0x01, 0x23, 0x00, 0x53, 0x01]),
    ("/sys-0/node-0/proc-1/eq-0/fc-1/core-0", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x01, 0x23, 0x00, 0x53, 0x01, 0x07, 0x00]),
    ("/sys-0/node-0/proc-1/eq-0/fc-1/core-1", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x01, 0x23, 0x00, 0x53, 0x01, 0x07, 0x01]),
    ("/sys-0/node-0/proc-1/eq-1", &[0x24, 0x01, 0x00, 0x02, 0x00, 0x05, 0x01, 0x23, 0x01]),
    ("/sys-0/node-0/proc-1/eq-1/fc-0", &[0x25, 0x01, 0x00, 0x02, 0x00, 0x05, 0x01, 0x23, 0x01, 0x53, 0x00]),
    ("/sys-0/node-0/proc-1/eq-1/fc-0/core-0", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x01, 0x23, 0x01, 0x53, 0x00, 0x07, 0x00]),
    ("/sys-0/node-0/proc-1/eq-1/fc-0/core-1", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x01, 0x23, 0x01, 0x53, 0x00, 0x07, 0x01]),
    ("/sys-0/node-0/proc-1/eq-1/fc-1", &[0x25, 0x01, 0x00, 0x02, 0x00, 0x05, 0x01, 0x23, 0x01, 0x53, 0x01]),
    ("/sys-0/node-0/proc-1/eq-1/fc-1/core-0", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x01, 0x23, 0x01, 0x53, 0x01, 0x07, 0x00]),
    ("/sys-0/node-0/proc-1/eq-1/fc-1/core-1", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x01, 0x23, 0x01, 0x53, 0x01, 0x07, 0x01]),
    ("/sys-0/node-0/proc-2", &[0x23, 0x01, 0x00, 0x02, 0x00, 0x05, 0x02]),
    ("/sys-0/node-0/proc-2/eq-0", &[0x24, 0x01, 0x00, 0x02, 0x00, 0x05, 0x02, 0x23, 0x00]),
    ("/sys-0/node-0/proc-2/eq-0/fc-0", &[0x25, 0x01, 0x00, 0x02, 0x00, 0x05, 0x02, 0x23, 0x00, 0x53, 0x00]),
    ("/sys-0/node-0/proc-2/eq-0/fc-0/core-0", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x02, 0x23, 0x00, 0x53, 0x00, 0x07, 0x00]),
    ("/sys-0/node-0/proc-2/eq-0/fc-0/core-1", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x02, 0x23, 0x00, 0x53, 0x00, 0x07, 0x01]),
    ("/sys-0/node-0/proc-2/eq-0/fc-1", &[0x25, 0x01, 0x00, 0x02, 0x00, 0x05, 0x02, 0x23, 0x00, 0x53, 0x01]),
    ("/sys-0/node-0/proc-2/eq-0/fc-1/core-0", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x02, 0x23, 0x00, 0x53, 0x01, 0x07, 0x00]),
    ("/sys-0/node-0/proc-2/eq-0/fc-1/core-1", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x02, 0x23, 0x00, 0x53, 0x01, 0x07, 0x01]),
    ("/sys-0/node-0/proc-2/eq-1", &[0x24, 0x01, 0x00, 0x02, 0x00, 0x05, 0x02, 0x23, 0x01]),
    ("/sys-0/node-0/proc-2/eq-1/fc-0", &[0x25, 0x01, 0x00, 0x02, 0x00, 0x05, 0x02, 0x23, 0x01, 0x53, 0x00]),
    ("/sys-0/node-0/proc-2/eq-1/fc-0/core-0", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x02, 0x23, 0x01, 0x53, 0x00, 0x07, 0x00]),
    ("/sys-0/node-0/proc-2/eq-1/fc-0/core-1", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x02, 0x23, 0x01, 0x53, 0x00, 0x07, 0x01]),
    ("/sys-0/node-0/proc-2/eq-1/fc-1", &[0x25, 0x01, 0x00, 0x02, 0x00, 0x05, 0x02, 0x23, 0x01, 0x53, 0x01]),
    ("/sys-0/node-0/proc-2/eq-1/fc-1/core-0", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x02, 0x23, 0x01, 0x53, 0x01, 0x07, 0x00]),
    ("/sys-0/node-0/proc-2/eq-1/fc-1/core-1", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x02, 0x23, 0x01, 0x53, 0x01, 0x07, 0x01]),
    ("/sys-0/node-0/proc-3", &[0x23, 0x01, 0x00, 0x02, 0x00, 0x05, 0x03]),
    ("/sys-0/node-0/proc-3/eq-0", &[0x24, 0x01, 0x00, 0x02, 0x00, 0x05, 0x03, 0x23, 0x00]),
    ("/sys-0/node-0/proc-3/eq-0/fc-0", &[0x25, 0x01, 0x00, 0x02, 0x00, 0x05, 0x03, 0x23, 0x00, 0x53, 0x00]),
    ("/sys-0/node-0/proc-3/eq-0/fc-0/core-0", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x03, 0x23, 0x00, 0x53, 0x00, 0x07, 0x00]),
    ("/sys-0/node-0/proc-3/eq-0/fc-0/core-1", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x03, 0x23, 0x00, 0x53, 0x00, 0x07, 0x01]),
    ("/sys-0/node-0/proc-3/eq-0/fc-1", &[0x25, 0x01, 0x00, 0x02, 0x00, 0x05, 0x03, 0x23, 0x00, 0x53, 0x01]),
    ("/sys-0/node-0/proc-3/eq-0/fc-1/core-0", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x03, 0x23, 0x00, 0x53, 0x01, 0x07, 0x00]),
    ("/sys-0/node-0/proc-3/eq-0/fc-1/core-1", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x03, 0x23, 0x00, 0x53, 0x01, 0x07, 0x01]),
    ("/sys-0/node-0/proc-3/eq-1", &[0x24, 0x01, 0x00, 0x02, 0x00, 0x05, 0x03, 0x23, 0x01]),
    ("/sys-0/node-0/proc-3/eq-1/fc-0", &[0x25, 0x01, 0x00, 0x02, 0x00, 0x05, 0x03, 0x23, 0x01, 0x53, 0x00]),
    ("/sys-0/node-0/proc-3/eq-1/fc-0/core-0", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x03, 0x23, 0x01, 0x53, 0x00, 0x07, 0x00]),
    ("/sys-0/node-0/proc-3/eq-1/fc-0/core-1", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x03, 0x23, 0x01, 0x53, 0x00, 0x07, 0x01]),
    ("/sys-0/node-0/proc-3/eq-1/fc-1", &[0x25, 0x01, 0x00, 0x02, 0x00, 0x05, 0x03, 0x23, 0x01, 0x53, 0x01]),
    ("/sys-0/node-0/proc-3/eq-1/fc-1/core-0", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x03, 0x23, 0x01, 0x53, 0x01, 0x07, 0x00]),
    ("/sys-0/node-0/proc-3/eq-1/fc-1/core-1", &[0x26, 0x01, 0x00, 0x02, 0x00, 0x05, 0x03, 0x23, 0x01, 0x53, 0x01, 0x07, 0x01]),
    ("/sys-0/node-0/dimm-0", &[0x23, 0x01, 0x00, 0x02, 0x00, 0x03, 0x00]),
    ("/sys-0/node-0/dimm-1", &[0x23, 0x01, 0x00, 0x02, 0x00, 0x03, 0x01]),
    ("/sys-0/node-0/dimm-2", &[0x23, 0x01, 0x00, 0x02, 0x00, 0x03, 0x02]),
    ("/sys-0/node-0/dimm-3", &[0x23, 0x01, 0x00, 0x02, 0x00, 0x03, 0x03]),
    ("/sys-0/node-0/dimm-4", &[0x23, 0x01, 0x00, 0x02, 0x00, 0x03, 0x04]),
    ("/sys-0/node-0/dimm-5", &[0x23, 0x01, 0x00, 0x02, 0x00, 0x03, 0x05]),
    ("/sys-0/node-0/dimm-6", &[0x23, 0x01, 0x00, 0x02, 0x00, 0x03, 0x06]),
    ("/sys-0/node-0/dimm-7", &[0x23, 0x01, 0x00, 0x02, 0x00, 0x03, 0x07]),
];

/// Resolver backed by the built-in table
#[derive(Debug, Clone)]
pub struct StaticTable {
    entries: Vec<(&'static str, EntityPath)>,
}

impl StaticTable {
    pub fn new() -> Self {
        let entries = PHYSICAL_ENTITY_TABLE
            .iter()
            .filter_map(|(path, raw)| EntityPath::from_raw(raw).ok().map(|ep| (*path, ep)))
            .collect();
        Self { entries }
    }

    /// Known physical paths in table order
    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(path, _)| *path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StaticTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PathResolver for StaticTable {
    fn path_to_entity(&self, physical_path: &str) -> Option<EntityPath> {
        self.entries
            .iter()
            .find(|(path, _)| *path == physical_path)
            .map(|(_, ep)| *ep)
    }

    fn entity_to_path(&self, entity_path: &EntityPath) -> Option<String> {
        self.entries
            .iter()
            .find(|(_, ep)| ep == entity_path)
            .map(|(path, _)| path.to_string())
    }
}
