//! aotmeta – member-metadata encoding for ahead-of-time compiled images
//!
//! Zwei-Phasen-Modell: während des Builds werden Typen, Strings und Member
//! in einen [`InternPool`] und einen [`MetadataEncoder`] registriert; danach
//! friert `freeze()` den Pool zu einem [`FrozenPool`]-Snapshot ein und ein
//! einzelner `encode()`-Lauf erzeugt zwei Blobs. Der Data Blob trägt die
//! Member-Gruppen in aufsteigender Typ-ID-Reihenfolge, der Index Blob bildet
//! jede Typ-ID auf ihren Gruppen-Offset oder den Sentinel ab.
//!
//! # Beispiel
//!
//! ```
//! use aotmeta::{
//!     InternPool, Member, MemberKind, MetadataEncoder, MetadataReader, TypeDesc,
//! };
//! use aotmeta::modifiers::PUBLIC;
//!
//! let pool = InternPool::new(
//!     TypeDesc::new(0, "java.lang.Object"),
//!     TypeDesc::new(1, "void"),
//! );
//! let widget = TypeDesc::new(2, "com.example.Widget");
//!
//! let encoder = MetadataEncoder::new();
//! encoder.register_member(&pool, &widget, Member {
//!     kind: MemberKind::Constructor,
//!     modifiers: PUBLIC,
//!     parameter_types: vec![],
//!     exception_types: vec![],
//!     signature: "()V".into(),
//!     annotations: vec![],
//!     parameter_annotations: vec![],
//! });
//!
//! let frozen = pool.freeze();
//! let metadata = encoder.encode(&frozen, 4).unwrap();
//! assert_eq!(metadata.index.len(), 4 * 5);
//!
//! let reader = MetadataReader::new(&metadata.data, &metadata.index, &frozen).unwrap();
//! let members = reader.members_of(2).unwrap();
//! assert!(members[0].is_constructor());
//! ```

pub mod annotation;
pub mod buffer;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod filter;
pub mod interning;
pub mod member;
pub mod tag;
pub mod types;
pub mod varint;

pub use error::{Error, Result};

/// HashMap mit ahash (schneller, nicht DoS-resistent — für interne Datenstrukturen).
pub(crate) type FastHashMap<K, V> = hashbrown::HashMap<K, V, ahash::RandomState>;

/// IndexSet mit ahash (First-Seen-Iteration + schnelles Hashing).
pub(crate) type FastIndexSet<T> = indexmap::IndexSet<T, ahash::RandomState>;

// Public API: Datenmodell
pub use annotation::{Annotation, Element, ElementType, Value};
pub use member::{Member, MemberKind, CONSTRUCTOR_NAME};
pub use tag::Tag;
pub use types::{modifiers, TypeDesc, TypeRef};

// Public API: Interning
pub use interning::{ClassLookup, FrozenPool, FrozenSet, InternPool, InternSet};

// Public API: Encoder/Decoder
pub use decoder::{DecodedAnnotation, DecodedMember, DecodedValue, MetadataReader};
pub use encoder::{EncodedMetadata, MetadataEncoder, NO_MEMBER_METADATA};

// Public API: Filter
pub use filter::{annotation_is_representable, value_is_representable};
