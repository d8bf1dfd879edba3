//! Physical path <-> entity path resolution
//!
//! The store only consumes entity paths; how they are produced is up to the
//! resolver strategy chosen by the caller.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::devtree::{DeviceTree, DeviceTreeError};
use super::path::EntityPath;
use super::table::StaticTable;

/// Translate between human-readable physical paths and entity paths
pub trait PathResolver {
    /// `None` when the physical path is not known
    fn path_to_entity(&self, physical_path: &str) -> Option<EntityPath>;

    /// `None` when no known location carries this entity path
    fn entity_to_path(&self, entity_path: &EntityPath) -> Option<String>;
}

impl<R: PathResolver + ?Sized> PathResolver for Box<R> {
    fn path_to_entity(&self, physical_path: &str) -> Option<EntityPath> {
        (**self).path_to_entity(physical_path)
    }

    fn entity_to_path(&self, entity_path: &EntityPath) -> Option<String> {
        (**self).entity_to_path(entity_path)
    }
}

/// Resolver strategy selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    /// Built-in table
    #[default]
    Static,
    /// Hardware description tree loaded from a file
    Devtree,
}

impl fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverKind::Static => write!(f, "static"),
            ResolverKind::Devtree => write!(f, "devtree"),
        }
    }
}

/// Build the resolver for `kind`. `devtree_path` is only read for
/// [`ResolverKind::Devtree`].
pub fn build_resolver(
    kind: ResolverKind,
    devtree_path: Option<&Path>,
) -> Result<Box<dyn PathResolver>, DeviceTreeError> {
    match kind {
        ResolverKind::Static => Ok(Box::new(StaticTable::new())),
        ResolverKind::Devtree => {
            let path = devtree_path.ok_or(DeviceTreeError::NotConfigured)?;
            Ok(Box::new(DeviceTree::load(path)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_resolver_builds_without_devtree() {
        let resolver = build_resolver(ResolverKind::Static, None).unwrap();
        assert!(resolver.path_to_entity("/sys-0/node-0/dimm-1").is_some());
    }

    #[test]
    fn test_devtree_requires_path() {
        let err = build_resolver(ResolverKind::Devtree, None).err().unwrap();
        assert!(matches!(err, DeviceTreeError::NotConfigured));
    }

    #[test]
    fn test_kind_serde_names() {
        let kind: ResolverKind = serde_json::from_str("\"devtree\"").unwrap();
        assert_eq!(kind, ResolverKind::Devtree);
        assert_eq!(serde_json::to_string(&ResolverKind::Static).unwrap(), "\"static\"");
    }
}
