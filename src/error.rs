//! Central error types for the metadata encoder.
//!
//! Alle "should not happen"-Fälle (Intern-Miss nach bestandenem Filter,
//! Typ-ID-Ordnungsverletzung) sind eigene Varianten statt Panics: der Build
//! soll mit einer diagnostizierbaren Meldung abbrechen, nie einen korrupten
//! Blob emittieren.

use core::fmt;

/// All error conditions of the encoder, decoder and intern pool.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// An object was looked up in an intern table it was never added to.
    ///
    /// During final encoding this is an internal-consistency failure: the
    /// representability filter guarantees that every value reaching the
    /// encoder only references interned objects.
    LookupMiss {
        /// Name der Intern-Tabelle ("classes" oder "strings").
        table: &'static str,
        /// Debug-Darstellung des gesuchten Objekts.
        what: String,
    },
    /// The grouping structure yielded a type id that is not strictly greater
    /// than the previously processed one.
    TypeIdOrder { previous: u32, current: u32 },
    /// A tag byte does not match any entry of the closed tag table.
    ///
    /// The value model is closed by design; there is no "unknown kind"
    /// escape hatch in the binary format.
    UnknownTag(u8),
    /// A declared element type and its value disagree in kind.
    ///
    /// Der Filter lehnt solche Werte bereits ab; sieht der Encoder dennoch
    /// einen, ist das ein Bug im Aufrufer oder ein Filter/Encoder-Drift.
    ValueKindMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// An annotation element value could not be read on the host side after
    /// the filter had already certified the annotation as representable.
    ValueUnreadable {
        /// Name des Annotationstyps.
        annotation: String,
        /// Name des betroffenen Elements.
        element: String,
    },
    /// A count does not fit its fixed-width field (u16 counts, u8 parameter
    /// count).
    CountOverflow {
        what: &'static str,
        count: usize,
        max: usize,
    },
    /// The data blob grew past the range addressable by an i32 index entry.
    BlobTooLarge(usize),
    /// A type id lies outside the index blob (`0..slots`).
    TypeIdOutOfRange { type_id: u32, slots: u64 },
    /// The index blob length is not a multiple of 4.
    IndexBlobMisaligned(usize),
    /// An index blob entry is negative but not the no-metadata sentinel.
    InvalidIndexEntry { type_id: u32, entry: i32 },
    /// The blob ended before a complete structure was decoded.
    PrematureEndOfBlob,
    /// A variable-length integer exceeds 64 bits or a fixed-width target.
    VarintOverflow,
    /// A decoded intern index does not resolve in the pool snapshot.
    ///
    /// `index` trägt den rohen decodierten Wert, auch wenn er negativ ist —
    /// die Diagnose zeigt, was im Blob stand, nicht eine Umdeutung.
    IndexUnresolvable { table: &'static str, index: i64 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LookupMiss { table, what } => {
                write!(f, "intern table '{table}' has no entry for {what} (filter/encoder disagreement)")
            }
            Self::TypeIdOrder { previous, current } => {
                write!(f, "type id ordering violation: {current} after {previous} (must be strictly increasing)")
            }
            Self::UnknownTag(tag) => {
                write!(f, "unknown tag byte 0x{tag:02X} (closed tag table)")
            }
            Self::ValueKindMismatch { expected, found } => {
                write!(f, "element value kind mismatch: declared {expected}, found {found}")
            }
            Self::ValueUnreadable { annotation, element } => {
                write!(f, "element '{element}' of annotation '{annotation}' became unreadable after filtering")
            }
            Self::CountOverflow { what, count, max } => {
                write!(f, "{what} count {count} exceeds field maximum {max}")
            }
            Self::BlobTooLarge(len) => {
                write!(f, "data blob length {len} exceeds i32 offset range")
            }
            Self::TypeIdOutOfRange { type_id, slots } => {
                write!(f, "type id {type_id} outside index range 0..{slots}")
            }
            Self::IndexBlobMisaligned(len) => {
                write!(f, "index blob length {len} is not a multiple of 4")
            }
            Self::InvalidIndexEntry { type_id, entry } => {
                write!(f, "index entry {entry} for type id {type_id} is neither an offset nor the sentinel")
            }
            Self::PrematureEndOfBlob => write!(f, "premature end of blob"),
            Self::VarintOverflow => write!(f, "variable-length integer overflow"),
            Self::IndexUnresolvable { table, index } => {
                write!(f, "intern index {index} unresolvable in '{table}' pool snapshot")
            }
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Erstellt einen `LookupMiss` Fehler mit Debug-Kontext.
    pub fn lookup_miss(table: &'static str, what: impl fmt::Debug) -> Self {
        Self::LookupMiss {
            table,
            what: format!("{what:?}"),
        }
    }

    /// Erstellt einen `ValueUnreadable` Fehler mit Kontext.
    pub fn value_unreadable(annotation: impl Into<String>, element: impl Into<String>) -> Self {
        Self::ValueUnreadable {
            annotation: annotation.into(),
            element: element.into(),
        }
    }
}

/// A convenience `Result` type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    /// Every variant must produce a non-empty Display string that names the
    /// offending object or value.

    #[test]
    fn lookup_miss_display() {
        let e = Error::lookup_miss("classes", "java.lang.Thread");
        let msg = e.to_string();
        assert!(msg.contains("classes"), "{msg}");
        assert!(msg.contains("Thread"), "{msg}");
    }

    #[test]
    fn type_id_order_display() {
        let e = Error::TypeIdOrder { previous: 7, current: 3 };
        let msg = e.to_string();
        assert!(msg.contains("7"), "{msg}");
        assert!(msg.contains("3"), "{msg}");
        assert!(msg.contains("strictly increasing"), "{msg}");
    }

    #[test]
    fn unknown_tag_display() {
        let e = Error::UnknownTag(0x7A);
        let msg = e.to_string();
        assert!(msg.contains("0x7A"), "{msg}");
    }

    #[test]
    fn value_kind_mismatch_display() {
        let e = Error::ValueKindMismatch { expected: "int", found: "string" };
        let msg = e.to_string();
        assert!(msg.contains("int"), "{msg}");
        assert!(msg.contains("string"), "{msg}");
    }

    #[test]
    fn value_unreadable_display() {
        let e = Error::value_unreadable("Deprecated", "since");
        let msg = e.to_string();
        assert!(msg.contains("Deprecated"), "{msg}");
        assert!(msg.contains("since"), "{msg}");
    }

    #[test]
    fn count_overflow_display() {
        let e = Error::CountOverflow { what: "annotation", count: 70000, max: 65535 };
        let msg = e.to_string();
        assert!(msg.contains("70000"), "{msg}");
        assert!(msg.contains("65535"), "{msg}");
    }

    #[test]
    fn type_id_out_of_range_display() {
        let e = Error::TypeIdOutOfRange { type_id: 12, slots: 10 };
        let msg = e.to_string();
        assert!(msg.contains("12"), "{msg}");
        assert!(msg.contains("0..10"), "{msg}");
    }

    /// Ein leerer Index hat null Slots — die Meldung zeigt den leeren Bereich
    /// statt einer scheinbar gültigen ID 0.
    #[test]
    fn type_id_out_of_range_display_empty_index() {
        let e = Error::TypeIdOutOfRange { type_id: 0, slots: 0 };
        assert!(e.to_string().contains("0..0"), "{e}");
    }

    /// Negative decodierte Indizes erscheinen unverfälscht in der Meldung.
    #[test]
    fn index_unresolvable_display_keeps_sign() {
        let e = Error::IndexUnresolvable { table: "classes", index: -1 };
        let msg = e.to_string();
        assert!(msg.contains("-1"), "{msg}");
        assert!(!msg.contains("4294967295"), "{msg}");
    }

    #[test]
    fn error_implements_std_error() {
        let e: Box<dyn std::error::Error> = Box::new(Error::PrematureEndOfBlob);
        assert!(!e.to_string().is_empty());
    }

    #[test]
    fn error_is_clone_and_eq() {
        let e1 = Error::VarintOverflow;
        let e2 = e1.clone();
        assert_eq!(e1, e2);
    }
}
