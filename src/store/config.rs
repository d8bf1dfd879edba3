//! Store configuration, fixed at construction

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::record::RecordLayout;

/// What `resolve` does to a matched record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletionPolicy {
    /// Mark the slot resolved in place; content stays for audit
    #[default]
    Tombstone,
    /// Remove the slot and shift later records down; ids are kept
    Compact,
}

impl fmt::Display for DeletionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeletionPolicy::Tombstone => write!(f, "tombstone"),
            DeletionPolicy::Compact => write!(f, "compact"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Guard file location
    pub path: PathBuf,
    pub layout: RecordLayout,
    pub deletion: DeletionPolicy,
}

impl StoreConfig {
    /// Headered layout with tombstone deletion
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            layout: RecordLayout::default(),
            deletion: DeletionPolicy::default(),
        }
    }

    pub fn with_layout(mut self, layout: RecordLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_deletion(mut self, deletion: DeletionPolicy) -> Self {
        self.deletion = deletion;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
