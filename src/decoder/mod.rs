//! Member-metadata reader: index lookup and member record decoding.
//!
//! Die Laufzeit-Seite des Formats. Der Reader arbeitet auf den zwei Blobs
//! eines Encode-Laufs und demselben Pool-Snapshot; er kopiert nichts aus
//! dem Data Blob, alle Indizes werden über den Snapshot aufgelöst.
//!
//! # Beispiel
//!
//! ```
//! use aotmeta::{InternPool, MetadataEncoder, MetadataReader, TypeDesc};
//!
//! let pool = InternPool::new(
//!     TypeDesc::new(0, "java.lang.Object"),
//!     TypeDesc::new(1, "void"),
//! );
//! let encoder = MetadataEncoder::new();
//! let frozen = pool.freeze();
//! let metadata = encoder.encode(&frozen, 3).unwrap();
//!
//! let reader = MetadataReader::new(&metadata.data, &metadata.index, &frozen).unwrap();
//! assert_eq!(reader.type_count(), 4);
//! assert_eq!(reader.offset_of(2).unwrap(), None);
//! ```

mod value;


pub use value::{DecodedAnnotation, DecodedValue};

use std::sync::Arc;

use crate::buffer::ByteReader;
use crate::encoder::NO_MEMBER_METADATA;
use crate::interning::FrozenPool;
use crate::member::CONSTRUCTOR_NAME;
use crate::types::TypeRef;
use crate::varint;
use crate::{Error, Result};

/// One decoded member record.
#[derive(Debug, Clone)]
pub struct DecodedMember {
    /// Encoded name; the synthetic marker for constructor-like members.
    pub name: Arc<str>,
    /// Opaque modifier bitmask.
    pub modifiers: u32,
    /// Parameter types; pruned types appear as the fallback top type.
    pub parameter_types: Vec<TypeRef>,
    /// Return type; the void marker for constructor-like members.
    pub return_type: TypeRef,
    /// Exception types retained in the pool (pruned ones were omitted).
    pub exception_types: Vec<TypeRef>,
    /// Opaque generic-signature string.
    pub signature: Arc<str>,
    /// Declarative annotations that passed the representability filter.
    pub annotations: Vec<DecodedAnnotation>,
    /// Per-parameter annotation lists, outer index = parameter slot.
    pub parameter_annotations: Vec<Vec<DecodedAnnotation>>,
}

impl DecodedMember {
    /// True when this record is a constructor-like member.
    pub fn is_constructor(&self) -> bool {
        &*self.name == CONSTRUCTOR_NAME
    }
}

/// Reads member groups out of one encode pass's data and index blobs.
pub struct MetadataReader<'a> {
    data: &'a [u8],
    index: &'a [u8],
    pool: &'a FrozenPool,
}

impl<'a> MetadataReader<'a> {
    /// Creates a reader; the index blob must be a whole number of i32 slots.
    pub fn new(data: &'a [u8], index: &'a [u8], pool: &'a FrozenPool) -> Result<Self> {
        if index.len() % 4 != 0 {
            return Err(Error::IndexBlobMisaligned(index.len()));
        }
        Ok(Self { data, index, pool })
    }

    /// Number of index slots, i.e. `max_type_id + 1`.
    pub fn type_count(&self) -> u32 {
        (self.index.len() / 4) as u32
    }

    /// Byte offset of a type's member group, `None` for the sentinel.
    pub fn offset_of(&self, type_id: u32) -> Result<Option<u32>> {
        // Slot-Rechnung in u64: u32::MAX * 4 überläuft usize auf
        // 32-Bit-Targets.
        if u64::from(type_id) * 4 + 4 > self.index.len() as u64 {
            return Err(Error::TypeIdOutOfRange {
                type_id,
                slots: u64::from(self.type_count()),
            });
        }
        let slot = type_id as usize * 4;
        let entry = i32::from_le_bytes([
            self.index[slot],
            self.index[slot + 1],
            self.index[slot + 2],
            self.index[slot + 3],
        ]);
        if entry == NO_MEMBER_METADATA {
            return Ok(None);
        }
        u32::try_from(entry)
            .map(Some)
            .map_err(|_| Error::InvalidIndexEntry { type_id, entry })
    }

    /// Decodes every member record of `type_id`; empty for sentinel entries.
    pub fn members_of(&self, type_id: u32) -> Result<Vec<DecodedMember>> {
        let Some(offset) = self.offset_of(type_id)? else {
            return Ok(Vec::new());
        };
        let mut reader = ByteReader::new(self.data);
        reader.seek(offset as usize)?;
        let count = varint::decode_unsigned_u32(&mut reader)?;
        let mut members = Vec::with_capacity((count as usize).min(64));
        for _ in 0..count {
            members.push(self.decode_member(&mut reader)?);
        }
        Ok(members)
    }

    fn resolve_class_varint(&self, reader: &mut ByteReader<'_>) -> Result<TypeRef> {
        let raw = varint::decode_signed(reader)?;
        let index = u32::try_from(raw).map_err(|_| Error::IndexUnresolvable {
            table: "classes",
            index: raw,
        })?;
        self.pool.classes.get(index).cloned()
    }

    fn resolve_string_varint(&self, reader: &mut ByteReader<'_>) -> Result<Arc<str>> {
        let raw = varint::decode_signed(reader)?;
        let index = u32::try_from(raw).map_err(|_| Error::IndexUnresolvable {
            table: "strings",
            index: raw,
        })?;
        self.pool.strings.get(index).cloned()
    }

    fn decode_member(&self, reader: &mut ByteReader<'_>) -> Result<DecodedMember> {
        let name = self.resolve_string_varint(reader)?;
        let modifiers = varint::decode_unsigned_u32(reader)?;

        let parameter_count = varint::decode_unsigned_u32(reader)?;
        let mut parameter_types = Vec::with_capacity((parameter_count as usize).min(64));
        for _ in 0..parameter_count {
            parameter_types.push(self.resolve_class_varint(reader)?);
        }

        let return_type = self.resolve_class_varint(reader)?;

        let exception_count = varint::decode_unsigned_u32(reader)?;
        let mut exception_types = Vec::with_capacity((exception_count as usize).min(64));
        for _ in 0..exception_count {
            exception_types.push(self.resolve_class_varint(reader)?);
        }

        let signature = self.resolve_string_varint(reader)?;

        let annotation_len = varint::decode_unsigned(reader)?;
        let annotation_bytes = reader.read_bytes(annotation_len as usize)?;
        let mut annotation_reader = ByteReader::new(annotation_bytes);
        let annotations = value::decode_annotations(&mut annotation_reader, self.pool)?;

        let parameter_annotation_len = varint::decode_unsigned(reader)?;
        let parameter_annotation_bytes = reader.read_bytes(parameter_annotation_len as usize)?;
        let mut parameter_annotation_reader = ByteReader::new(parameter_annotation_bytes);
        let parameter_annotations =
            value::decode_parameter_annotations(&mut parameter_annotation_reader, self.pool)?;

        Ok(DecodedMember {
            name,
            modifiers,
            parameter_types,
            return_type,
            exception_types,
            signature,
            annotations,
            parameter_annotations,
        })
    }
}
