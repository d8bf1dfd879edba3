//! Hardware description tree resolver
//!
//! The tree is a JSON document of nested nodes. A node may carry two
//! location attributes:
//!
//! - `phys_dev_path`: string form, e.g. `physical:sys-0/node-0/proc-0`
//! - `phys_bin_path`: packed entity path bytes
//!
//! Lookups walk the tree depth-first from the root and stop at the first
//! node whose attribute matches.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::path::{EntityPath, ENTITY_PATH_SIZE};
use super::resolver::PathResolver;
use crate::observability::{log_event_with_fields, Event};

/// Longest string location attribute the tree may hold
pub const MAX_PHYS_DEV_PATH: usize = 64;

const PHYSICAL_PREFIX: &str = "physical:";

/// Device tree loading errors
#[derive(Debug, Error)]
pub enum DeviceTreeError {
    #[error("device tree resolver selected but no devtree_path configured")]
    NotConfigured,

    #[error("failed to read device tree {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid device tree {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One node of the hardware description tree
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DevTreeNode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phys_dev_path: Option<String>,
    #[serde(default)]
    pub phys_bin_path: Option<Vec<u8>>,
    #[serde(default)]
    pub children: Vec<DevTreeNode>,
}

impl DevTreeNode {
    /// Depth-first pre-order search
    fn find<'a, F>(&'a self, pred: &F) -> Option<&'a DevTreeNode>
    where
        F: Fn(&DevTreeNode) -> bool,
    {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(pred))
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(DevTreeNode::count).sum::<usize>()
    }

    fn entity_path(&self) -> Option<EntityPath> {
        let raw = self.phys_bin_path.as_deref()?;
        EntityPath::decode(raw, raw.len().min(ENTITY_PATH_SIZE)).ok()
    }
}

/// Resolver backed by a hardware description tree
#[derive(Debug, Clone)]
pub struct DeviceTree {
    root: DevTreeNode,
}

impl DeviceTree {
    pub fn from_root(root: DevTreeNode) -> Self {
        Self { root }
    }

    /// Load the tree from a JSON file
    pub fn load(path: &Path) -> Result<Self, DeviceTreeError> {
        let content = fs::read_to_string(path).map_err(|source| DeviceTreeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let root: DevTreeNode =
            serde_json::from_str(&content).map_err(|source| DeviceTreeError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let tree = Self::from_root(root);
        log_event_with_fields(
            Event::DevTreeLoaded,
            &[
                ("nodes", &tree.root.count().to_string()),
                ("path", &path.display().to_string()),
            ],
        );
        Ok(tree)
    }

    /// Bring a caller-supplied physical path into the tree's string form:
    /// lower case, no leading `/`, `physical:` prefix.
    pub fn normalize(physical_path: &str) -> String {
        let lowered = physical_path.to_lowercase();
        let trimmed = lowered.strip_prefix('/').unwrap_or(&lowered);
        if trimmed.starts_with(PHYSICAL_PREFIX) {
            trimmed.to_string()
        } else {
            format!("{}{}", PHYSICAL_PREFIX, trimmed)
        }
    }
}

impl PathResolver for DeviceTree {
    fn path_to_entity(&self, physical_path: &str) -> Option<EntityPath> {
        let wanted = Self::normalize(physical_path);
        if wanted.len() >= MAX_PHYS_DEV_PATH {
            log_event_with_fields(
                Event::PathNotFound,
                &[
                    ("max", &MAX_PHYS_DEV_PATH.to_string()),
                    ("path", &wanted),
                    ("reason", "physical path too long"),
                ],
            );
            return None;
        }

        let node = self
            .root
            .find(&|n: &DevTreeNode| n.phys_dev_path.as_deref() == Some(wanted.as_str()));
        let Some(node) = node else {
            log_event_with_fields(
                Event::PathNotFound,
                &[("path", &wanted), ("reason", "not in device tree")],
            );
            return None;
        };

        let entity = node.entity_path();
        if entity.is_none() {
            log_event_with_fields(
                Event::PathNotFound,
                &[("path", &wanted), ("reason", "binary location attribute missing")],
            );
        }
        entity
    }

    fn entity_to_path(&self, entity_path: &EntityPath) -> Option<String> {
        let node = self
            .root
            .find(&|n: &DevTreeNode| n.entity_path().as_ref() == Some(entity_path));
        let Some(node) = node else {
            log_event_with_fields(
                Event::PathNotFound,
                &[("entity", &entity_path.to_string()), ("reason", "not in device tree")],
            );
            return None;
        };
        node.phys_dev_path.clone()
    }
}
