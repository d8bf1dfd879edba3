//! Entity paths and their resolution from physical paths
//!
//! - `path`: packed binary entity path codec
//! - `resolver`: the `PathResolver` seam and strategy selection
//! - `table`: built-in static table strategy
//! - `devtree`: hardware description tree strategy

mod devtree;
mod path;
mod resolver;
mod table;

pub use devtree::{DevTreeNode, DeviceTree, DeviceTreeError, MAX_PHYS_DEV_PATH};
pub use path::{
    EntityPath, PathElement, PathType, ENTITY_PATH_SIZE, MAX_PATH_ELEMENTS, PATH_ELEMENT_SIZE,
};
pub use resolver::{build_resolver, PathResolver, ResolverKind};
pub use table::{target_type, StaticTable};
