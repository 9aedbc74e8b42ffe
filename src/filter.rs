//! Representability filter for annotation values.
//!
//! Entscheidet rekursiv, ob ein annotationsförmiger Wert mit dem aktuellen
//! Inhalt der Intern-Tabellen vollständig darstellbar ist, und sammelt dabei
//! optional alle erreichbaren String-Literale, Enum-Konstanten-Namen und
//! Element-Namen ein (für das Pre-Interning während der Registrierung).
//!
//! Das Prädikat läuft zweimal pro Wert: einmal während der Registrierung
//! (Sammeln, Bool verworfen) und einmal beim finalen Encoding (Aufnahme-
//! Entscheidung). Beide Läufe sind deterministisch für einen festen
//! Tabellenzustand; die Tabelle wächst zwischen den Läufen nur monoton und
//! ist beim zweiten Lauf eingefroren ([`crate::interning::FrozenPool`]).

use std::sync::Arc;

use log::warn;

use crate::annotation::{Annotation, ElementType, Value};
use crate::interning::ClassLookup;

/// Decides whether `annotation` is fully representable.
///
/// `collector`, falls gesetzt, erhält alle Strings, die beim Encoding als
/// Intern-Index geschrieben werden: String-Literale, Enum-Konstanten-Namen
/// und die Element-Namen jeder (verschachtelten) Instanz. Der Aufrufer
/// interniert die gesammelten Strings nur, wenn das Prädikat `true` liefert —
/// ein teilweise gesammelter, dann verworfener Wert hinterlässt höchstens
/// überzählige Einträge in der lokalen Liste, nie in der Tabelle.
pub fn annotation_is_representable<P: ClassLookup>(
    annotation: &Annotation,
    pool: &P,
    mut collector: Option<&mut Vec<Arc<str>>>,
) -> bool {
    if !pool.contains_class(&annotation.annotation_type) {
        return false;
    }
    for element in &annotation.elements {
        let Some(value) = &element.value else {
            // Accessor-Fault beim Einsammeln: degradiert genau diese Instanz
            // zu "nicht darstellbar", Geschwister bleiben im Rennen.
            warn!(
                "annotation {} dropped: element '{}' unreadable",
                annotation.annotation_type, element.name
            );
            return false;
        };
        if !value_is_representable(&element.ty, value, pool, collector.as_deref_mut()) {
            return false;
        }
    }
    if let Some(names) = collector.as_deref_mut() {
        for element in &annotation.elements {
            names.push(Arc::clone(&element.name));
        }
    }
    true
}

/// Recursive representability check for one value against its declared shape.
pub fn value_is_representable<P: ClassLookup>(
    ty: &ElementType,
    value: &Value,
    pool: &P,
    mut collector: Option<&mut Vec<Arc<str>>>,
) -> bool {
    match (ty, value) {
        (ElementType::Annotation(_), Value::Annotation(nested)) => {
            // Rekursives UND über alle Elemente: ein einziger nicht
            // darstellbarer Wert macht die ganze Instanz — und damit den
            // enthaltenden Wert — nicht darstellbar.
            annotation_is_representable(nested, pool, collector)
        }
        (ElementType::Array(component), Value::Array(values)) => {
            if component.is_primitive() {
                return true;
            }
            let mut representable = true;
            for v in values {
                representable &=
                    value_is_representable(component, v, pool, collector.as_deref_mut());
            }
            representable
        }
        (ElementType::TypeRef, Value::Type(referenced)) => pool.contains_class(referenced),
        (ElementType::Str, Value::Str(s)) => {
            if let Some(strings) = collector {
                strings.push(Arc::clone(s));
            }
            true
        }
        (ElementType::Enum(declaring), Value::EnumConst { name, .. }) => {
            if let Some(strings) = collector {
                strings.push(Arc::clone(name));
            }
            pool.contains_class(declaring)
        }
        (ElementType::Boolean, Value::Boolean(_))
        | (ElementType::Byte, Value::Byte(_))
        | (ElementType::Short, Value::Short(_))
        | (ElementType::Char, Value::Char(_))
        | (ElementType::Int, Value::Int(_))
        | (ElementType::Long, Value::Long(_))
        | (ElementType::Float, Value::Float(_))
        | (ElementType::Double, Value::Double(_)) => true,
        _ => {
            // Form-Mismatch zwischen deklariertem Typ und Wert: kann nicht
            // encodiert werden, wird wie "nicht darstellbar" behandelt.
            warn!(
                "element value kind mismatch: declared {}, found {}",
                ty.kind_name(),
                value.kind_name()
            );
            false
        }
    }
}
