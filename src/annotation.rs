//! The recursive annotation value model.
//!
//! Eine Annotation ist ein Typ-Verweis plus eine geordnete Liste von
//! Elementen (Name, deklarierter Element-Typ, Wert). Der deklarierte Typ —
//! nicht der Laufzeit-Wert — wählt das Tag-Byte beim Encoding, genau wie im
//! Class-File-Format (JVMS §4.7.16).

use std::hash::{Hash, Hasher};
use std::mem;
use std::sync::Arc;

use crate::tag::Tag;
use crate::types::TypeRef;

/// Declared shape of one annotation element. Drives tag selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Str,
    /// A type reference (`Class<?>`-shaped element).
    TypeRef,
    /// An enum element; carries the declaring enum type.
    Enum(TypeRef),
    /// A nested annotation element; carries the nested annotation type.
    Annotation(TypeRef),
    /// An array element; carries the component shape.
    Array(Box<ElementType>),
}

impl ElementType {
    /// The tag byte this shape encodes with.
    pub fn tag(&self) -> Tag {
        match self {
            ElementType::Boolean => Tag::Boolean,
            ElementType::Byte => Tag::Byte,
            ElementType::Short => Tag::Short,
            ElementType::Char => Tag::Char,
            ElementType::Int => Tag::Int,
            ElementType::Long => Tag::Long,
            ElementType::Float => Tag::Float,
            ElementType::Double => Tag::Double,
            ElementType::Str => Tag::Str,
            ElementType::TypeRef => Tag::Class,
            ElementType::Enum(_) => Tag::Enum,
            ElementType::Annotation(_) => Tag::Annotation,
            ElementType::Array(_) => Tag::Array,
        }
    }

    /// True for the scalar kinds whose array form is always representable.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            ElementType::Boolean
                | ElementType::Byte
                | ElementType::Short
                | ElementType::Char
                | ElementType::Int
                | ElementType::Long
                | ElementType::Float
                | ElementType::Double
        )
    }

    /// Kind name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ElementType::Boolean => "boolean",
            ElementType::Byte => "byte",
            ElementType::Short => "short",
            ElementType::Char => "char",
            ElementType::Int => "int",
            ElementType::Long => "long",
            ElementType::Float => "float",
            ElementType::Double => "double",
            ElementType::Str => "string",
            ElementType::TypeRef => "type reference",
            ElementType::Enum(_) => "enum constant",
            ElementType::Annotation(_) => "annotation",
            ElementType::Array(_) => "array",
        }
    }
}

/// A captured annotation element value.
///
/// `Char` trägt eine UTF-16 Code-Unit, nicht einen Rust-`char` — das
/// Quellmodell ist die JVM. `Float`/`Double` vergleichen und hashen über
/// ihr rohes Bit-Muster, damit Member strukturell dedupliziert werden
/// können und NaN-Werte stabil sind.
#[derive(Debug, Clone)]
pub enum Value {
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Char(u16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(Arc<str>),
    Type(TypeRef),
    EnumConst {
        /// Declaring enum type of the constant.
        enum_type: TypeRef,
        /// Constant name, as returned by `name()`.
        name: Arc<str>,
    },
    Annotation(Annotation),
    Array(Vec<Value>),
}

impl Value {
    /// Kind name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Char(_) => "char",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::Type(_) => "type reference",
            Value::EnumConst { .. } => "enum constant",
            Value::Annotation(_) => "annotation",
            Value::Array(_) => "array",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Boolean(a), Boolean(b)) => a == b,
            (Byte(a), Byte(b)) => a == b,
            (Short(a), Short(b)) => a == b,
            (Char(a), Char(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Long(a), Long(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Double(a), Double(b)) => a.to_bits() == b.to_bits(),
            (Str(a), Str(b)) => a == b,
            (Type(a), Type(b)) => a == b,
            (
                EnumConst { enum_type: t1, name: n1 },
                EnumConst { enum_type: t2, name: n2 },
            ) => t1 == t2 && n1 == n2,
            (Annotation(a), Annotation(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Value::Boolean(v) => v.hash(state),
            Value::Byte(v) => v.hash(state),
            Value::Short(v) => v.hash(state),
            Value::Char(v) => v.hash(state),
            Value::Int(v) => v.hash(state),
            Value::Long(v) => v.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Double(v) => v.to_bits().hash(state),
            Value::Str(v) => v.hash(state),
            Value::Type(v) => v.hash(state),
            Value::EnumConst { enum_type, name } => {
                enum_type.hash(state);
                name.hash(state);
            }
            Value::Annotation(v) => v.hash(state),
            Value::Array(v) => v.hash(state),
        }
    }
}

/// One element of an annotation instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element {
    /// Element name within the annotation type.
    pub name: Arc<str>,
    /// Declared shape, selects the tag on encode.
    pub ty: ElementType,
    /// Captured value; `None` when the host-side accessor faulted during
    /// collection. The filter degrades such elements to unrepresentable;
    /// the encoder treats them as fatal (certified values must stay
    /// readable between the two passes).
    pub value: Option<Value>,
}

impl Element {
    /// Convenience constructor for a readable element.
    pub fn new(name: impl Into<Arc<str>>, ty: ElementType, value: Value) -> Self {
        Element {
            name: name.into(),
            ty,
            value: Some(value),
        }
    }

    /// Constructor for an element whose value could not be read.
    pub fn unreadable(name: impl Into<Arc<str>>, ty: ElementType) -> Self {
        Element {
            name: name.into(),
            ty,
            value: None,
        }
    }
}

/// A declarative annotation instance attached to a member or parameter.
///
/// Elemente stehen in fester Aufzählungsreihenfolge (die Reihenfolge, in der
/// der Collector sie geliefert hat); der Encoder schreibt sie unverändert.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    /// The annotation's own type.
    pub annotation_type: TypeRef,
    /// Ordered element list.
    pub elements: Vec<Element>,
}

impl Annotation {
    /// Creates an annotation instance.
    pub fn new(annotation_type: TypeRef, elements: Vec<Element>) -> Self {
        Annotation {
            annotation_type,
            elements,
        }
    }
}
