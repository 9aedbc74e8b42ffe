//! Recursive tag-dispatched decoding of annotation values.
//!
//! Das Gegenstück zu [`crate::encoder`]: liest die in Member-Records
//! eingebetteten Annotations-Bytes zurück. Deklarierte Element-Typen sind
//! zur Laufzeit nicht mehr vorhanden — das Tag-Byte allein wählt die
//! Decode-Routine, deshalb hat die decodierte Seite ihr eigenes, rein
//! wertgetriebenes Modell.

use std::hash::{Hash, Hasher};
use std::mem;
use std::sync::Arc;

use crate::buffer::ByteReader;
use crate::interning::FrozenPool;
use crate::tag::Tag;
use crate::types::TypeRef;
use crate::{Error, Result};

/// A decoded annotation instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAnnotation {
    /// The annotation's own type, resolved through the pool snapshot.
    pub annotation_type: TypeRef,
    /// Ordered (element name, value) pairs, in encoded order.
    pub elements: Vec<(Arc<str>, DecodedValue)>,
}

/// A decoded annotation element value.
///
/// Floats vergleichen über ihr Bit-Muster, wie auf der Encode-Seite — ein
/// Round-Trip über NaN bleibt damit strukturell gleich.
#[derive(Debug, Clone)]
pub enum DecodedValue {
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
    EnumConst { enum_type: TypeRef, name: Arc<str> },
    Annotation(DecodedAnnotation),
    Array(Vec<DecodedValue>),
}

impl PartialEq for DecodedValue {
    fn eq(&self, other: &Self) -> bool {
        use DecodedValue::*;
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

impl Eq for DecodedValue {}

impl Hash for DecodedValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            DecodedValue::Boolean(v) => v.hash(state),
            DecodedValue::Byte(v) => v.hash(state),
            DecodedValue::Short(v) => v.hash(state),
            DecodedValue::Char(v) => v.hash(state),
            DecodedValue::Int(v) => v.hash(state),
            DecodedValue::Long(v) => v.hash(state),
            DecodedValue::Float(v) => v.to_bits().hash(state),
            DecodedValue::Double(v) => v.to_bits().hash(state),
            DecodedValue::Str(v) => v.hash(state),
            DecodedValue::Type(v) => v.hash(state),
            DecodedValue::EnumConst { enum_type, name } => {
                enum_type.hash(state);
                name.hash(state);
            }
            DecodedValue::Annotation(v) => {
                v.annotation_type.hash(state);
                v.elements.hash(state);
            }
            DecodedValue::Array(v) => v.hash(state),
        }
    }
}

fn resolve_class(reader: &mut ByteReader<'_>, pool: &FrozenPool) -> Result<TypeRef> {
    let raw = reader.read_s4()?;
    let index = u32::try_from(raw).map_err(|_| Error::IndexUnresolvable {
        table: "classes",
        index: i64::from(raw),
    })?;
    pool.classes.get(index).cloned()
}

fn resolve_string(reader: &mut ByteReader<'_>, pool: &FrozenPool) -> Result<Arc<str>> {
    let raw = reader.read_s4()?;
    let index = u32::try_from(raw).map_err(|_| Error::IndexUnresolvable {
        table: "strings",
        index: i64::from(raw),
    })?;
    pool.strings.get(index).cloned()
}

/// Decodes an annotation list: `u16 count` + entries.
pub(crate) fn decode_annotations(
    reader: &mut ByteReader<'_>,
    pool: &FrozenPool,
) -> Result<Vec<DecodedAnnotation>> {
    let count = reader.read_u2()?;
    let mut annotations = Vec::with_capacity(usize::from(count).min(64));
    for _ in 0..count {
        annotations.push(decode_annotation(reader, pool)?);
    }
    Ok(annotations)
}

/// Decodes per-parameter annotation lists: `u8 paramCount` + per parameter
/// `u16 count` + entries.
pub(crate) fn decode_parameter_annotations(
    reader: &mut ByteReader<'_>,
    pool: &FrozenPool,
) -> Result<Vec<Vec<DecodedAnnotation>>> {
    let parameter_count = reader.read_u1()?;
    let mut parameters = Vec::with_capacity(usize::from(parameter_count));
    for _ in 0..parameter_count {
        parameters.push(decode_annotations(reader, pool)?);
    }
    Ok(parameters)
}

fn decode_annotation(
    reader: &mut ByteReader<'_>,
    pool: &FrozenPool,
) -> Result<DecodedAnnotation> {
    let annotation_type = resolve_class(reader, pool)?;
    let element_count = reader.read_u2()?;
    let mut elements = Vec::with_capacity(usize::from(element_count).min(64));
    for _ in 0..element_count {
        let name = resolve_string(reader, pool)?;
        let value = decode_value(reader, pool)?;
        elements.push((name, value));
    }
    Ok(DecodedAnnotation {
        annotation_type,
        elements,
    })
}

/// Decodes one tagged value. Exhaustive over the closed tag table; an
/// unknown tag byte aborts with [`Error::UnknownTag`].
pub(crate) fn decode_value(
    reader: &mut ByteReader<'_>,
    pool: &FrozenPool,
) -> Result<DecodedValue> {
    let tag = Tag::from_byte(reader.read_u1()?)?;
    match tag {
        Tag::Annotation => Ok(DecodedValue::Annotation(decode_annotation(reader, pool)?)),
        Tag::Enum => {
            let enum_type = resolve_class(reader, pool)?;
            let name = resolve_string(reader, pool)?;
            Ok(DecodedValue::EnumConst { enum_type, name })
        }
        Tag::Array => {
            let count = reader.read_u2()?;
            let mut values = Vec::with_capacity(usize::from(count).min(64));
            for _ in 0..count {
                values.push(decode_value(reader, pool)?);
            }
            Ok(DecodedValue::Array(values))
        }
        Tag::Class => Ok(DecodedValue::Type(resolve_class(reader, pool)?)),
        Tag::Str => Ok(DecodedValue::Str(resolve_string(reader, pool)?)),
        Tag::Boolean => Ok(DecodedValue::Boolean(reader.read_u1()? != 0)),
        Tag::Byte => Ok(DecodedValue::Byte(reader.read_s1()?)),
        Tag::Short => Ok(DecodedValue::Short(reader.read_s2()?)),
        Tag::Char => Ok(DecodedValue::Char(reader.read_u2()?)),
        Tag::Int => Ok(DecodedValue::Int(reader.read_s4()?)),
        Tag::Long => Ok(DecodedValue::Long(reader.read_s8()?)),
        Tag::Float => Ok(DecodedValue::Float(f32::from_bits(reader.read_s4()? as u32))),
        Tag::Double => Ok(DecodedValue::Double(f64::from_bits(reader.read_s8()? as u64))),
    }
}
