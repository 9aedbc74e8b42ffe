//! Declared members and their structural identity.
//!
//! Member werden pro deklarierendem Typ mit Set-Semantik gesammelt:
//! strukturell gleiche Registrierungen sind No-Ops. Die Iterationsreihenfolge
//! innerhalb eines Typs ist die First-Seen-Reihenfolge der Registrierung —
//! damit ist die Blob-Ausgabe byte-stabil, obwohl das Modell eine Menge ist.

use std::sync::Arc;

use crate::annotation::Annotation;
use crate::types::TypeRef;

/// The fixed synthetic name every constructor-like member encodes with.
///
/// Niemals der Name des deklarierenden Typs.
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// Whether a member is constructor-like or a named member with a return type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Constructor-like: fixed synthetic name, void return marker.
    Constructor,
    /// Named member with declared name and return type.
    Method {
        name: Arc<str>,
        return_type: TypeRef,
    },
}

/// One declared member of a type, as collected during the build pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Member {
    pub kind: MemberKind,
    /// Modifier bitmask, passed through opaquely (see [`crate::types::modifiers`]).
    pub modifiers: u32,
    /// Ordered parameter type references.
    pub parameter_types: Vec<TypeRef>,
    /// Declared exception types. Filtered at encode time to the subset
    /// present in the intern pool (omitted, not substituted).
    pub exception_types: Vec<TypeRef>,
    /// Opaque generic-signature string.
    pub signature: Arc<str>,
    /// Declarative annotations on the member itself.
    pub annotations: Vec<Annotation>,
    /// Declarative annotations per parameter, outer index = parameter slot.
    pub parameter_annotations: Vec<Vec<Annotation>>,
}

impl Member {
    /// The name this member encodes with: the synthetic constructor marker
    /// for constructor-like members, the declared name otherwise.
    pub fn name(&self) -> &str {
        match &self.kind {
            MemberKind::Constructor => CONSTRUCTOR_NAME,
            MemberKind::Method { name, .. } => name,
        }
    }
}
