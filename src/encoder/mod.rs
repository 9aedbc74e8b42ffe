//! Member-metadata encoder: registration API, member records, type index.
//!
//! Zwei strikt getrennte Phasen. Die Registrierungsphase läuft während des
//! Build-Passes, potenziell aus parallelen Analyse-Workern: pro entdecktem
//! Member ein [`MetadataEncoder::register_member`]-Aufruf, der die Gruppierung
//! (Typ-ID → Member-Menge) füllt und alle aus darstellbaren Annotationen
//! erreichbaren Strings vor-interniert. Der terminale [`MetadataEncoder::encode`]-
//! Lauf ist single-threaded, konsumiert den Builder und produziert die zwei
//! unveränderlichen Blobs in einem Durchgang.
//!
//! # Beispiel
//!
//! ```
//! use aotmeta::{InternPool, Member, MemberKind, MetadataEncoder, TypeDesc};
//!
//! let pool = InternPool::new(
//!     TypeDesc::new(0, "java.lang.Object"),
//!     TypeDesc::new(1, "void"),
//! );
//! let declaring = TypeDesc::new(4, "com.example.Greeter");
//! let member = Member {
//!     kind: MemberKind::Method {
//!         name: "greet".into(),
//!         return_type: TypeDesc::new(1, "void"),
//!     },
//!     modifiers: aotmeta::modifiers::PUBLIC,
//!     parameter_types: vec![],
//!     exception_types: vec![],
//!     signature: "()V".into(),
//!     annotations: vec![],
//!     parameter_annotations: vec![],
//! };
//!
//! let encoder = MetadataEncoder::new();
//! encoder.register_member(&pool, &declaring, member);
//! let frozen = pool.freeze();
//! let metadata = encoder.encode(&frozen, 4).unwrap();
//! assert_eq!(metadata.index.len(), 4 * 5);
//! ```

pub(crate) mod value;


use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::buffer::ByteWriter;
use crate::filter;
use crate::interning::{FrozenPool, InternPool};
use crate::member::Member;
use crate::types::TypeRef;
use crate::varint;
use crate::FastIndexSet;
use crate::{Error, Result};

/// Index blob sentinel: no metadata recorded for this type id.
pub const NO_MEMBER_METADATA: i32 = -1;

/// The two immutable output blobs of one encode pass.
///
/// `index` ist ein `i32[max_type_id + 1]` (little-endian): Eintrag ≥ 0 ist
/// der Byte-Offset des Gruppen-Headers im Data Blob, `-1` der Sentinel.
#[derive(Debug, Clone)]
pub struct EncodedMetadata {
    /// Concatenated per-type member groups, ascending type-id order.
    pub data: Arc<[u8]>,
    /// Fixed-width offset/sentinel array, one entry per type id.
    pub index: Arc<[u8]>,
}

/// Single-use builder: collects registrations, then encodes once.
///
/// `encode` konsumiert den Builder — ein zweiter Encode-Lauf ist durch den
/// Besitz ausgeschlossen, kein Laufzeit-Flag nötig.
pub struct MetadataEncoder {
    /// Typ-ID → Member-Menge. BTreeMap liefert die strikt aufsteigende
    /// Typ-ID-Ordnung des Index-Builders; das IndexSet dedupliziert
    /// strukturell gleiche Member und iteriert in First-Seen-Reihenfolge.
    members: Mutex<BTreeMap<u32, FastIndexSet<Member>>>,
}

impl MetadataEncoder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            members: Mutex::new(BTreeMap::new()),
        }
    }

    /// Registers a relevant type: interns its class descriptor.
    pub fn register_type(&self, pool: &InternPool, ty: &TypeRef) {
        pool.classes.add(ty);
    }

    /// Registers one declared member of `declaring`.
    ///
    /// Interniert den Member-Namen (den synthetischen Konstruktor-Marker für
    /// Constructor-like Member), die Signatur und alle Strings, die aus
    /// darstellbaren Annotationen erreichbar sind — vor dem ersten
    /// geschriebenen Byte. Set-Semantik: die identische Registrierung ein
    /// zweites Mal ist ein No-Op.
    ///
    /// Thread-safe; darf aus parallelen Registrierungs-Workern gerufen werden.
    pub fn register_member(&self, pool: &InternPool, declaring: &TypeRef, member: Member) {
        pool.classes.add(declaring);
        pool.strings.add(&member.name().into());
        pool.strings.add(&member.signature);

        Self::prepare_annotation_strings(pool, &member.annotations);
        for parameter in &member.parameter_annotations {
            Self::prepare_annotation_strings(pool, parameter);
        }

        let mut members = self
            .members
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        members.entry(declaring.id).or_default().insert(member);
    }

    /// Pre-interns every string reachable inside representable annotations.
    ///
    /// Die gesammelte Liste wird nur übernommen, wenn die Instanz den Filter
    /// besteht — verworfene Instanzen hinterlassen keine Tabelleneinträge.
    fn prepare_annotation_strings(pool: &InternPool, annotations: &[crate::Annotation]) {
        for annotation in annotations {
            let mut collected = Vec::new();
            if filter::annotation_is_representable(annotation, pool, Some(&mut collected)) {
                for s in collected {
                    pool.strings.add(&s);
                }
            }
        }
    }

    /// Terminal encode pass: produces the data and index blobs.
    ///
    /// `max_type_id` kommt von der externen Typ-Nummerierungs-Autorität,
    /// nicht aus der Gruppierung — eine ID kann null Member besitzen und
    /// braucht trotzdem ihren Sentinel-Slot. Invariante:
    /// `index.len() == 4 * (max_type_id + 1)`.
    pub fn encode(self, pool: &FrozenPool, max_type_id: u32) -> Result<EncodedMetadata> {
        let members = self
            .members
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        let mut data = ByteWriter::new();
        let mut index = ByteWriter::new();
        // i64-Buchführung, damit die leere Gruppierung (last = -1) und
        // max_type_id = u32::MAX ohne Sonderfälle funktionieren.
        let mut last: i64 = -1;

        for (&type_id, group) in &members {
            if i64::from(type_id) <= last {
                return Err(Error::TypeIdOrder {
                    previous: last as u32,
                    current: type_id,
                });
            }
            if type_id > max_type_id {
                return Err(Error::TypeIdOutOfRange {
                    type_id,
                    slots: u64::from(max_type_id) + 1,
                });
            }
            last += 1;
            while last < i64::from(type_id) {
                index.write_s4(NO_MEMBER_METADATA);
                last += 1;
            }

            let offset = data.bytes_written();
            if offset > i32::MAX as usize {
                return Err(Error::BlobTooLarge(offset));
            }
            index.write_s4(offset as i32);

            varint::encode_unsigned(&mut data, group.len() as u64);
            for member in group {
                Self::encode_member(&mut data, member, pool)?;
            }
        }
        while last < i64::from(max_type_id) {
            index.write_s4(NO_MEMBER_METADATA);
            last += 1;
        }

        Ok(EncodedMetadata {
            data: data.into_vec().into(),
            index: index.into_vec().into(),
        })
    }

    /// Encodes one member record (§ member record layout).
    fn encode_member(data: &mut ByteWriter, member: &Member, pool: &FrozenPool) -> Result<()> {
        let name_index = pool.string_index(member.name())?;
        varint::encode_signed(data, i64::from(name_index));

        varint::encode_unsigned(data, u64::from(member.modifiers));

        varint::encode_unsigned(data, member.parameter_types.len() as u64);
        for parameter in &member.parameter_types {
            // Nicht-internierte Parameter-Typen werden durch den Top-Typ
            // ersetzt statt zu scheitern: der Record bleibt parsebar, auch
            // wenn ein referenzierter Typ aus dem Universum gefallen ist.
            let class_index = pool.class_index_or_top(parameter);
            varint::encode_signed(data, i64::from(class_index));
        }

        let return_index = match &member.kind {
            crate::member::MemberKind::Constructor => pool.void_index(),
            crate::member::MemberKind::Method { return_type, .. } => {
                pool.class_index_or_top(return_type)
            }
        };
        varint::encode_signed(data, i64::from(return_index));

        // Exception-Typen: nur die im Pool vorhandenen (weggelassen, nicht
        // substituiert — nur was im Image existiert, kann geworfen werden).
        let exceptions: Vec<u32> = member
            .exception_types
            .iter()
            .filter(|e| pool.classes.contains(&***e))
            .map(|e| pool.class_index(e))
            .collect::<Result<_>>()?;
        varint::encode_unsigned(data, exceptions.len() as u64);
        for exception_index in exceptions {
            varint::encode_signed(data, i64::from(exception_index));
        }

        let signature_index = pool.string_index(&member.signature)?;
        varint::encode_signed(data, i64::from(signature_index));

        let annotations = value::encode_annotations(&member.annotations, pool)?;
        varint::encode_unsigned(data, annotations.len() as u64);
        data.write_bytes(&annotations);

        let parameter_annotations =
            value::encode_parameter_annotations(&member.parameter_annotations, pool)?;
        varint::encode_unsigned(data, parameter_annotations.len() as u64);
        data.write_bytes(&parameter_annotations);

        Ok(())
    }
}

impl Default for MetadataEncoder {
    fn default() -> Self {
        Self::new()
    }
}
