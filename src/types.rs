//! Type descriptors and modifier bitmask constants.
//!
//! Ein Typ wird durch seine dichte, nicht-negative ID identifiziert. Die IDs
//! vergibt die externe Nummerierungs-Autorität des umgebenden Build-Systems,
//! nicht dieser Crate; sie sind über die *registrierte* Teilmenge nicht
//! notwendigerweise zusammenhängend.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Shared handle to a [`TypeDesc`]. Cheap to clone, compared by type id.
pub type TypeRef = Arc<TypeDesc>;

/// A type of the analyzed program, as seen by the metadata encoder.
///
/// Identity is the numeric id alone: two descriptors with the same id denote
/// the same type regardless of how the name was spelled.
#[derive(Debug, Clone)]
pub struct TypeDesc {
    /// Dense non-negative id assigned by the external numbering authority.
    pub id: u32,
    /// Fully qualified name, for diagnostics only (never encoded).
    pub name: Arc<str>,
}

impl TypeDesc {
    /// Creates a shared type descriptor.
    pub fn new(id: u32, name: impl Into<Arc<str>>) -> TypeRef {
        Arc::new(TypeDesc {
            id,
            name: name.into(),
        })
    }
}

impl PartialEq for TypeDesc {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDesc {}

impl Hash for TypeDesc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}

/// Member modifier bits, mirroring the JVM access flags (JVMS §4.6).
///
/// Der Encoder interpretiert die Maske nicht — sie wird unverändert als
/// unsigned Varint durchgereicht. Die Konstanten existieren für Aufrufer
/// und Tests.
pub mod modifiers {
    pub const PUBLIC: u32 = 0x0001;
    pub const PRIVATE: u32 = 0x0002;
    pub const PROTECTED: u32 = 0x0004;
    pub const STATIC: u32 = 0x0008;
    pub const FINAL: u32 = 0x0010;
    pub const SYNCHRONIZED: u32 = 0x0020;
    pub const VARARGS: u32 = 0x0080;
    pub const NATIVE: u32 = 0x0100;
    pub const ABSTRACT: u32 = 0x0400;
    pub const SYNTHETIC: u32 = 0x1000;
}
