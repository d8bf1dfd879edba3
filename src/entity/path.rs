//! Entity path: compact binary identifier of one node in the hardware
//! hierarchy.
//!
//! Packed form (21 bytes, no endianness):
//!
//! ```text
//! +-----------+----------------------------------------+
//! | type_size | 10 x (target_type: u8, instance: u8)   |
//! +-----------+----------------------------------------+
//!   high nibble = path type, low nibble = element count
//! ```
//!
//! Only the first `count` elements are meaningful; trailing element bytes
//! are carried through but never compared.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::errors::{GuardError, GuardResult};

/// Maximum number of elements in an entity path
pub const MAX_PATH_ELEMENTS: usize = 10;

/// Size of one packed path element
pub const PATH_ELEMENT_SIZE: usize = 2;

/// Size of the packed entity path
pub const ENTITY_PATH_SIZE: usize = 1 + MAX_PATH_ELEMENTS * PATH_ELEMENT_SIZE;

const COUNT_MASK: u8 = 0x0F;
const TYPE_SHIFT: u8 = 4;

/// Which relationship set an entity path models
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    NotApplicable,
    Affinity,
    Physical,
    Device,
    Power,
    /// Tag not known to this crate, preserved as-is
    Other(u8),
}

impl PathType {
    pub fn from_nibble(value: u8) -> Self {
        match value & COUNT_MASK {
            0x0 => PathType::NotApplicable,
            0x1 => PathType::Affinity,
            0x2 => PathType::Physical,
            0x3 => PathType::Device,
            0x4 => PathType::Power,
            other => PathType::Other(other),
        }
    }

    pub fn as_nibble(self) -> u8 {
        match self {
            PathType::NotApplicable => 0x0,
            PathType::Affinity => 0x1,
            PathType::Physical => 0x2,
            PathType::Device => 0x3,
            PathType::Power => 0x4,
            PathType::Other(v) => v & COUNT_MASK,
        }
    }

    /// Name used in listings, `None` for unknown tags
    pub fn name(self) -> Option<&'static str> {
        match self {
            PathType::NotApplicable => Some("notApplicable"),
            PathType::Affinity => Some("affinity"),
            PathType::Physical => Some("physical"),
            PathType::Device => Some("device"),
            PathType::Power => Some("power"),
            PathType::Other(_) => None,
        }
    }
}

/// One level of the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PathElement {
    /// Type of the target at this level
    pub target_type: u8,
    /// Instance relative to the parent
    pub instance: u8,
}

impl PathElement {
    pub const fn new(target_type: u8, instance: u8) -> Self {
        Self {
            target_type,
            instance,
        }
    }
}

/// Packed hierarchical hardware location
#[derive(Clone, Copy)]
pub struct EntityPath {
    type_size: u8,
    elements: [PathElement; MAX_PATH_ELEMENTS],
}

impl EntityPath {
    /// Build a path from its type and root-to-leaf elements.
    pub fn new(path_type: PathType, elements: &[PathElement]) -> GuardResult<Self> {
        if elements.len() > MAX_PATH_ELEMENTS {
            return Err(GuardError::invalid_entity_path(format!(
                "Entity path has {} elements, max {}",
                elements.len(),
                MAX_PATH_ELEMENTS
            )));
        }

        let mut packed = [PathElement::default(); MAX_PATH_ELEMENTS];
        packed[..elements.len()].copy_from_slice(elements);

        Ok(Self {
            type_size: (path_type.as_nibble() << TYPE_SHIFT) | elements.len() as u8,
            elements: packed,
        })
    }

    /// Decode an exact-length raw buffer: `type_size` followed by exactly
    /// `count` elements.
    pub fn from_raw(raw: &[u8]) -> GuardResult<Self> {
        if raw.is_empty() {
            return Err(GuardError::invalid_entity_path("Given raw data is empty"));
        }
        if raw.len() > ENTITY_PATH_SIZE {
            return Err(GuardError::invalid_entity_path(format!(
                "Size mismatch. Given buf size[{}] entity path size[{}]",
                raw.len(),
                ENTITY_PATH_SIZE
            )));
        }

        let count = (raw[0] & COUNT_MASK) as usize;
        let body = raw.len() - 1;
        if body % PATH_ELEMENT_SIZE != 0 || body / PATH_ELEMENT_SIZE != count {
            return Err(GuardError::invalid_entity_path(format!(
                "Path element size mismatch: count {} but {} element bytes",
                count, body
            )));
        }

        Self::decode(raw, raw.len())
    }

    /// Decode from the front of `bytes`, considering at most `max_len`
    /// bytes. Bytes past the encoded count are ignored.
    pub fn decode(bytes: &[u8], max_len: usize) -> GuardResult<Self> {
        let limit = max_len.min(bytes.len());
        if limit == 0 {
            return Err(GuardError::invalid_entity_path("Given raw data is empty"));
        }

        let type_size = bytes[0];
        let count = (type_size & COUNT_MASK) as usize;
        if count > MAX_PATH_ELEMENTS {
            return Err(GuardError::invalid_entity_path(format!(
                "Size mismatch. Given path elements size[{}] max[{}]",
                count, MAX_PATH_ELEMENTS
            )));
        }

        let needed = 1 + count * PATH_ELEMENT_SIZE;
        if limit < needed {
            return Err(GuardError::invalid_entity_path(format!(
                "Insufficient data for path elements: need {} bytes, have {}",
                needed, limit
            )));
        }

        // Carry the full packed width when available so trailing bytes
        // round-trip through the on-disk slot unchanged.
        let mut elements = [PathElement::default(); MAX_PATH_ELEMENTS];
        let carried = ((limit.min(ENTITY_PATH_SIZE) - 1) / PATH_ELEMENT_SIZE).max(count);
        for (i, element) in elements.iter_mut().enumerate().take(carried) {
            let at = 1 + i * PATH_ELEMENT_SIZE;
            *element = PathElement::new(bytes[at], bytes[at + 1]);
        }

        Ok(Self {
            type_size,
            elements,
        })
    }

    /// Take the packed slot form as stored, without validation. A count
    /// above the maximum is kept as read; such a path only equals a path
    /// with identical packed bytes.
    pub fn from_packed(packed: &[u8; ENTITY_PATH_SIZE]) -> Self {
        let mut elements = [PathElement::default(); MAX_PATH_ELEMENTS];
        for (i, element) in elements.iter_mut().enumerate() {
            let at = 1 + i * PATH_ELEMENT_SIZE;
            *element = PathElement::new(packed[at], packed[at + 1]);
        }
        Self {
            type_size: packed[0],
            elements,
        }
    }

    /// True when the count nibble is within the element limit
    pub fn is_well_formed(&self) -> bool {
        self.count() <= MAX_PATH_ELEMENTS
    }

    /// Number of meaningful elements
    pub fn count(&self) -> usize {
        (self.type_size & COUNT_MASK) as usize
    }

    pub fn path_type(&self) -> PathType {
        PathType::from_nibble(self.type_size >> TYPE_SHIFT)
    }

    /// Raw `type_size` byte
    pub fn type_size(&self) -> u8 {
        self.type_size
    }

    /// Meaningful elements, root to leaf
    pub fn elements(&self) -> &[PathElement] {
        &self.elements[..self.count().min(MAX_PATH_ELEMENTS)]
    }

    /// Packed 21-byte form, including any carried trailing bytes
    pub fn to_bytes(&self) -> [u8; ENTITY_PATH_SIZE] {
        let mut out = [0u8; ENTITY_PATH_SIZE];
        out[0] = self.type_size;
        for (i, element) in self.elements.iter().enumerate() {
            out[1 + i * PATH_ELEMENT_SIZE] = element.target_type;
            out[2 + i * PATH_ELEMENT_SIZE] = element.instance;
        }
        out
    }

    /// Exact-length form: `type_size` plus `count` elements
    pub fn to_raw(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.count() * PATH_ELEMENT_SIZE);
        out.push(self.type_size);
        for element in self.elements() {
            out.push(element.target_type);
            out.push(element.instance);
        }
        out
    }
}

impl PartialEq for EntityPath {
    fn eq(&self, other: &Self) -> bool {
        if !self.is_well_formed() || !other.is_well_formed() {
            return self.to_bytes() == other.to_bytes();
        }
        self.count() == other.count()
            && self.path_type() == other.path_type()
            && self.elements() == other.elements()
    }
}

impl Eq for EntityPath {}

impl Hash for EntityPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_size.hash(state);
        self.elements().hash(state);
    }
}

impl fmt::Debug for EntityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityPath({})", self)
    }
}

impl fmt::Display for EntityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path_type().name() {
            Some(name) => write!(f, "{}:0x{:02x} [", name, self.type_size)?,
            None => write!(f, "0x{:02x} [", self.type_size)?,
        }
        for (i, element) in self.elements().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02x}:{:02x}", element.target_type, element.instance)?;
        }
        write!(f, "]")
    }
}
