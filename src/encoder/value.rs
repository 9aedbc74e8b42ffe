//! Recursive tagged encoding of annotation values.
//!
//! Format wie das Class-File `element_value` (JVMS §4.7.16), mit zwei
//! Abweichungen: Klassen- und String-Werte werden als Intern-Index statt
//! als Constant-Pool-Index geschrieben, und Primitive stehen direkt im
//! Strom (Floats als rohes Bit-Muster). Nur Instanzen, die den
//! Representability-Filter bestehen, werden geschrieben — eine verworfene
//! Instanz fehlt vollständig, sie wird nie partiell geschrieben.

use log::debug;

use crate::annotation::{Annotation, ElementType, Value};
use crate::buffer::ByteWriter;
use crate::filter;
use crate::interning::FrozenPool;
use crate::{Error, Result};

/// Encodes a filtered annotation list: `u16 count` + entries.
pub(crate) fn encode_annotations(
    annotations: &[Annotation],
    pool: &FrozenPool,
) -> Result<Vec<u8>> {
    let mut buf = ByteWriter::new();
    let kept = filter_annotations(annotations, pool);
    write_count(&mut buf, "annotation", kept.len())?;
    for annotation in kept {
        encode_annotation(&mut buf, annotation, pool)?;
    }
    Ok(buf.into_vec())
}

/// Encodes per-parameter annotation lists: `u8 paramCount` + per parameter
/// `u16 count` + entries.
pub(crate) fn encode_parameter_annotations(
    parameters: &[Vec<Annotation>],
    pool: &FrozenPool,
) -> Result<Vec<u8>> {
    let mut buf = ByteWriter::new();
    let count = parameters.len();
    if count > usize::from(u8::MAX) {
        return Err(Error::CountOverflow {
            what: "parameter",
            count,
            max: usize::from(u8::MAX),
        });
    }
    buf.write_u1(count as u8);
    for annotations in parameters {
        let kept = filter_annotations(annotations, pool);
        write_count(&mut buf, "parameter annotation", kept.len())?;
        for annotation in kept {
            encode_annotation(&mut buf, annotation, pool)?;
        }
    }
    Ok(buf.into_vec())
}

fn filter_annotations<'a>(
    annotations: &'a [Annotation],
    pool: &FrozenPool,
) -> Vec<&'a Annotation> {
    annotations
        .iter()
        .filter(|a| {
            let keep = filter::annotation_is_representable(*a, pool, None);
            if !keep {
                debug!("dropping unrepresentable annotation {}", a.annotation_type);
            }
            keep
        })
        .collect()
}

fn write_count(buf: &mut ByteWriter, what: &'static str, count: usize) -> Result<()> {
    if count > usize::from(u16::MAX) {
        return Err(Error::CountOverflow {
            what,
            count,
            max: usize::from(u16::MAX),
        });
    }
    buf.write_u2(count as u16);
    Ok(())
}

/// Encodes one instance: `s32 typeIndex, u16 memberCount`, then per element
/// `s32 nameIndex` + tagged value.
pub(crate) fn encode_annotation(
    buf: &mut ByteWriter,
    annotation: &Annotation,
    pool: &FrozenPool,
) -> Result<()> {
    buf.write_s4(pool.class_index(&annotation.annotation_type)? as i32);
    write_count(buf, "annotation element", annotation.elements.len())?;
    for element in &annotation.elements {
        buf.write_s4(pool.string_index(&element.name)? as i32);
        let value = element.value.as_ref().ok_or_else(|| {
            // Der Filter hat die Lesbarkeit bereits zertifiziert — ein Fault
            // hier heisst, der Wert hat sich zwischen den Läufen geändert.
            Error::value_unreadable(
                annotation.annotation_type.name.to_string(),
                element.name.to_string(),
            )
        })?;
        encode_value(buf, &element.ty, value, pool)?;
    }
    Ok(())
}

/// Encodes one tagged value against its declared shape.
pub(crate) fn encode_value(
    buf: &mut ByteWriter,
    ty: &ElementType,
    value: &Value,
    pool: &FrozenPool,
) -> Result<()> {
    buf.write_u1(ty.tag().byte());
    match (ty, value) {
        (ElementType::Annotation(_), Value::Annotation(nested)) => {
            encode_annotation(buf, nested, pool)
        }
        (ElementType::Enum(declaring), Value::EnumConst { name, .. }) => {
            // Der deklarierte Enum-Typ wird geschrieben, nicht der des Werts.
            buf.write_s4(pool.class_index(declaring)? as i32);
            buf.write_s4(pool.string_index(name)? as i32);
            Ok(())
        }
        (ElementType::Array(component), Value::Array(values)) => {
            write_count(buf, "array element", values.len())?;
            for v in values {
                encode_value(buf, component, v, pool)?;
            }
            Ok(())
        }
        (ElementType::TypeRef, Value::Type(referenced)) => {
            buf.write_s4(pool.class_index(referenced)? as i32);
            Ok(())
        }
        (ElementType::Str, Value::Str(s)) => {
            buf.write_s4(pool.string_index(s)? as i32);
            Ok(())
        }
        (ElementType::Boolean, Value::Boolean(v)) => {
            buf.write_u1(u8::from(*v));
            Ok(())
        }
        (ElementType::Byte, Value::Byte(v)) => {
            buf.write_s1(*v);
            Ok(())
        }
        (ElementType::Short, Value::Short(v)) => {
            buf.write_s2(*v);
            Ok(())
        }
        (ElementType::Char, Value::Char(v)) => {
            buf.write_u2(*v);
            Ok(())
        }
        (ElementType::Int, Value::Int(v)) => {
            buf.write_s4(*v);
            Ok(())
        }
        (ElementType::Long, Value::Long(v)) => {
            buf.write_s8(*v);
            Ok(())
        }
        (ElementType::Float, Value::Float(v)) => {
            buf.write_s4(v.to_bits() as i32);
            Ok(())
        }
        (ElementType::Double, Value::Double(v)) => {
            buf.write_s8(v.to_bits() as i64);
            Ok(())
        }
        (ty, value) => Err(Error::ValueKindMismatch {
            expected: ty.kind_name(),
            found: value.kind_name(),
        }),
    }
}
