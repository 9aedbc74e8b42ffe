//! Member-Metadata Round-Trip-Tests.
//!
//! Fuer jede Wertart des Annotations-Modells ein expliziter Round-Trip:
//! Registrieren → Freeze → Encode → Decode → decodierte Struktur vergleichen.
//! Dazu die Blob-Invarianten (Index-Laenge, Sentinel-Laeufe, Offset-Ordnung)
//! ueber das oeffentliche API.

use aotmeta::modifiers;
use aotmeta::{
    Annotation, DecodedMember, DecodedValue, Element, ElementType, FrozenPool, InternPool, Member,
    MemberKind, MetadataEncoder, MetadataReader, TypeDesc, TypeRef, Value, NO_MEMBER_METADATA,
};

// ============================================================================
// Hilfsfunktionen
// ============================================================================

fn pool() -> InternPool {
    InternPool::new(
        TypeDesc::new(0, "java.lang.Object"),
        TypeDesc::new(1, "void"),
    )
}

fn method_with_annotations(
    name: &str,
    return_type: TypeRef,
    annotations: Vec<Annotation>,
) -> Member {
    Member {
        kind: MemberKind::Method {
            name: name.into(),
            return_type,
        },
        modifiers: modifiers::PUBLIC,
        parameter_types: vec![],
        exception_types: vec![],
        signature: "()V".into(),
        annotations,
        parameter_annotations: vec![],
    }
}

/// Registriert einen Member mit genau einer Annotation auf Typ-ID 2,
/// encodiert und gibt den decodierten Record samt Pool-Snapshot zurueck.
fn round_trip_annotation(annotation: Annotation, extra_classes: &[TypeRef]) -> (DecodedMember, FrozenPool) {
    let pool = pool();
    for class in extra_classes {
        pool.classes.add(class);
    }
    let void = pool.void_type().clone();
    let declaring = TypeDesc::new(2, "com.example.Holder");

    let encoder = MetadataEncoder::new();
    encoder.register_member(
        &pool,
        &declaring,
        method_with_annotations("subject", void, vec![annotation]),
    );

    let frozen = pool.freeze();
    let metadata = encoder.encode(&frozen, 2).unwrap();
    let reader = MetadataReader::new(&metadata.data, &metadata.index, &frozen).unwrap();
    let mut members = reader.members_of(2).unwrap();
    assert_eq!(members.len(), 1);
    (members.remove(0), frozen)
}

fn single_element(member: &DecodedMember) -> &DecodedValue {
    assert_eq!(member.annotations.len(), 1);
    assert_eq!(member.annotations[0].elements.len(), 1);
    &member.annotations[0].elements[0].1
}

// ============================================================================
// Round-Trips pro Wertart
// ============================================================================

#[test]
fn string_value_round_trip() {
    let marker = TypeDesc::new(3, "Named");
    let annotation = Annotation::new(
        marker.clone(),
        vec![Element::new(
            "value",
            ElementType::Str,
            Value::Str("hello".into()),
        )],
    );
    let (member, _) = round_trip_annotation(annotation, &[marker]);
    assert_eq!(*single_element(&member), DecodedValue::Str("hello".into()));
}

#[test]
fn type_reference_value_round_trip() {
    let marker = TypeDesc::new(3, "SeeAlso");
    let target = TypeDesc::new(4, "com.example.Target");
    let annotation = Annotation::new(
        marker.clone(),
        vec![Element::new(
            "value",
            ElementType::TypeRef,
            Value::Type(target.clone()),
        )],
    );
    let (member, _) = round_trip_annotation(annotation, &[marker, target.clone()]);
    let DecodedValue::Type(decoded) = single_element(&member) else {
        panic!("expected type reference");
    };
    assert_eq!(decoded.id, target.id);
    assert_eq!(decoded.name, target.name);
}

#[test]
fn enum_constant_round_trip() {
    let marker = TypeDesc::new(3, "Colored");
    let color = TypeDesc::new(4, "Color");
    let annotation = Annotation::new(
        marker.clone(),
        vec![Element::new(
            "value",
            ElementType::Enum(color.clone()),
            Value::EnumConst {
                enum_type: color.clone(),
                name: "GREEN".into(),
            },
        )],
    );
    let (member, _) = round_trip_annotation(annotation, &[marker, color.clone()]);
    assert_eq!(
        *single_element(&member),
        DecodedValue::EnumConst {
            enum_type: color,
            name: "GREEN".into(),
        }
    );
}

/// Zweistufige Verschachtelung: aeussere Instanz traegt eine innere, die
/// innere einen primitiven Wert. Beide Typen muessen interniert sein.
#[test]
fn nested_annotation_round_trip() {
    let outer = TypeDesc::new(3, "Outer");
    let inner = TypeDesc::new(4, "Inner");
    let annotation = Annotation::new(
        outer.clone(),
        vec![Element::new(
            "child",
            ElementType::Annotation(inner.clone()),
            Value::Annotation(Annotation::new(
                inner.clone(),
                vec![Element::new("level", ElementType::Int, Value::Int(7))],
            )),
        )],
    );
    let (member, _) = round_trip_annotation(annotation, &[outer, inner.clone()]);
    let DecodedValue::Annotation(child) = single_element(&member) else {
        panic!("expected nested annotation");
    };
    assert_eq!(child.annotation_type.id, inner.id);
    assert_eq!(child.elements[0].1, DecodedValue::Int(7));
}

#[test]
fn primitive_array_round_trip() {
    let marker = TypeDesc::new(3, "Sized");
    let annotation = Annotation::new(
        marker.clone(),
        vec![Element::new(
            "dims",
            ElementType::Array(Box::new(ElementType::Long)),
            Value::Array(vec![Value::Long(-1), Value::Long(0), Value::Long(i64::MAX)]),
        )],
    );
    let (member, _) = round_trip_annotation(annotation, &[marker]);
    assert_eq!(
        *single_element(&member),
        DecodedValue::Array(vec![
            DecodedValue::Long(-1),
            DecodedValue::Long(0),
            DecodedValue::Long(i64::MAX),
        ])
    );
}

#[test]
fn reference_array_round_trip() {
    let marker = TypeDesc::new(3, "Tagged");
    let annotation = Annotation::new(
        marker.clone(),
        vec![Element::new(
            "tags",
            ElementType::Array(Box::new(ElementType::Str)),
            Value::Array(vec![Value::Str("a".into()), Value::Str("b".into())]),
        )],
    );
    let (member, _) = round_trip_annotation(annotation, &[marker]);
    assert_eq!(
        *single_element(&member),
        DecodedValue::Array(vec![
            DecodedValue::Str("a".into()),
            DecodedValue::Str("b".into()),
        ])
    );
}

#[test]
fn all_primitive_kinds_round_trip() {
    let marker = TypeDesc::new(3, "Everything");
    let annotation = Annotation::new(
        marker.clone(),
        vec![
            Element::new("z", ElementType::Boolean, Value::Boolean(true)),
            Element::new("b", ElementType::Byte, Value::Byte(-8)),
            Element::new("s", ElementType::Short, Value::Short(-300)),
            Element::new("c", ElementType::Char, Value::Char(0x263A)),
            Element::new("i", ElementType::Int, Value::Int(i32::MIN)),
            Element::new("j", ElementType::Long, Value::Long(i64::MIN)),
            Element::new("f", ElementType::Float, Value::Float(1.5)),
            Element::new("d", ElementType::Double, Value::Double(-2.25)),
        ],
    );
    let (member, _) = round_trip_annotation(annotation, &[marker]);
    let values: Vec<&DecodedValue> = member.annotations[0]
        .elements
        .iter()
        .map(|(_, v)| v)
        .collect();
    assert_eq!(*values[0], DecodedValue::Boolean(true));
    assert_eq!(*values[1], DecodedValue::Byte(-8));
    assert_eq!(*values[2], DecodedValue::Short(-300));
    assert_eq!(*values[3], DecodedValue::Char(0x263A));
    assert_eq!(*values[4], DecodedValue::Int(i32::MIN));
    assert_eq!(*values[5], DecodedValue::Long(i64::MIN));
    assert_eq!(*values[6], DecodedValue::Float(1.5));
    assert_eq!(*values[7], DecodedValue::Double(-2.25));
}

// ============================================================================
// Member-Record-Felder
// ============================================================================

#[test]
fn full_member_record_round_trip() {
    let pool = pool();
    let top = pool.top_type().clone();
    let declaring = TypeDesc::new(2, "com.example.Service");
    let string_ty = TypeDesc::new(3, "java.lang.String");
    let io_exception = TypeDesc::new(4, "java.io.IOException");
    pool.classes.add(&string_ty);
    pool.classes.add(&io_exception);

    let encoder = MetadataEncoder::new();
    encoder.register_member(
        &pool,
        &declaring,
        Member {
            kind: MemberKind::Method {
                name: "lookup".into(),
                return_type: string_ty.clone(),
            },
            modifiers: modifiers::PUBLIC | modifiers::FINAL,
            parameter_types: vec![string_ty.clone(), top.clone()],
            exception_types: vec![io_exception.clone()],
            signature: "(Ljava/lang/String;Ljava/lang/Object;)Ljava/lang/String;".into(),
            annotations: vec![],
            parameter_annotations: vec![vec![], vec![]],
        },
    );

    let frozen = pool.freeze();
    let metadata = encoder.encode(&frozen, 2).unwrap();
    let reader = MetadataReader::new(&metadata.data, &metadata.index, &frozen).unwrap();
    let members = reader.members_of(2).unwrap();

    assert_eq!(members.len(), 1);
    let m = &members[0];
    assert_eq!(&*m.name, "lookup");
    assert!(!m.is_constructor());
    assert_eq!(m.modifiers, modifiers::PUBLIC | modifiers::FINAL);
    assert_eq!(m.parameter_types.len(), 2);
    assert_eq!(m.parameter_types[0].id, string_ty.id);
    assert_eq!(m.parameter_types[1].id, top.id);
    assert_eq!(m.return_type.id, string_ty.id);
    assert_eq!(m.exception_types.len(), 1);
    assert_eq!(m.exception_types[0].id, io_exception.id);
    assert_eq!(
        &*m.signature,
        "(Ljava/lang/String;Ljava/lang/Object;)Ljava/lang/String;"
    );
    assert_eq!(m.parameter_annotations.len(), 2);
}

#[test]
fn constructor_round_trip_uses_void_marker() {
    let pool = pool();
    let void = pool.void_type().clone();
    let declaring = TypeDesc::new(2, "com.example.Widget");

    let encoder = MetadataEncoder::new();
    encoder.register_member(
        &pool,
        &declaring,
        Member {
            kind: MemberKind::Constructor,
            modifiers: modifiers::PROTECTED,
            parameter_types: vec![],
            exception_types: vec![],
            signature: "()V".into(),
            annotations: vec![],
            parameter_annotations: vec![],
        },
    );

    let frozen = pool.freeze();
    let metadata = encoder.encode(&frozen, 2).unwrap();
    let reader = MetadataReader::new(&metadata.data, &metadata.index, &frozen).unwrap();
    let members = reader.members_of(2).unwrap();

    assert!(members[0].is_constructor());
    assert_eq!(members[0].return_type.id, void.id);
}

// ============================================================================
// Blob-Invarianten
// ============================================================================

#[test]
fn index_blob_shape_and_sentinels() {
    let pool = pool();
    let void = pool.void_type().clone();
    let t3 = TypeDesc::new(3, "T3");
    let t6 = TypeDesc::new(6, "T6");

    let encoder = MetadataEncoder::new();
    encoder.register_member(&pool, &t3, method_with_annotations("a", void.clone(), vec![]));
    encoder.register_member(&pool, &t6, method_with_annotations("b", void, vec![]));

    let frozen = pool.freeze();
    let metadata = encoder.encode(&frozen, 8).unwrap();

    assert_eq!(metadata.index.len(), 4 * 9);
    let entries: Vec<i32> = metadata
        .index
        .chunks_exact(4)
        .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    for (id, entry) in entries.iter().enumerate() {
        if id == 3 || id == 6 {
            assert!(*entry >= 0, "type {id} should carry an offset");
        } else {
            assert_eq!(*entry, NO_MEMBER_METADATA, "type {id} should be sentinel");
        }
    }
    assert!(entries[3] < entries[6], "offsets must be ascending");

    let reader = MetadataReader::new(&metadata.data, &metadata.index, &frozen).unwrap();
    assert_eq!(reader.type_count(), 9);
    assert!(reader.members_of(0).unwrap().is_empty());
    assert_eq!(reader.members_of(3).unwrap().len(), 1);
    assert_eq!(reader.members_of(6).unwrap().len(), 1);
}

/// Byte-Stabilitaet: zwei identisch befuellte Encoder erzeugen identische
/// Blobs, unabhaengig von Hash-Seeds.
#[test]
fn identical_input_yields_identical_blobs() {
    let build = || {
        let pool = pool();
        let void = pool.void_type().clone();
        let declaring = TypeDesc::new(2, "com.example.Stable");
        let encoder = MetadataEncoder::new();
        for name in ["gamma", "alpha", "beta"] {
            encoder.register_member(
                &pool,
                &declaring,
                method_with_annotations(name, void.clone(), vec![]),
            );
        }
        encoder.encode(&pool.freeze(), 2).unwrap()
    };

    let first = build();
    let second = build();
    assert_eq!(first.data, second.data);
    assert_eq!(first.index, second.index);
}

/// Eine Annotation, deren Typ nicht interniert wurde, faellt komplett aus
/// dem Blob; die uebrigen bleiben.
#[test]
fn uninterned_annotation_dropped_in_round_trip() {
    let kept = TypeDesc::new(3, "Kept");
    let dropped = TypeDesc::new(4, "Dropped");
    let annotation_kept = Annotation::new(kept.clone(), vec![]);
    let annotation_dropped = Annotation::new(dropped, vec![]);

    let pool = pool();
    pool.classes.add(&kept);
    let void = pool.void_type().clone();
    let declaring = TypeDesc::new(2, "com.example.Holder");
    let encoder = MetadataEncoder::new();
    encoder.register_member(
        &pool,
        &declaring,
        method_with_annotations("m", void, vec![annotation_dropped, annotation_kept]),
    );

    let frozen = pool.freeze();
    let metadata = encoder.encode(&frozen, 2).unwrap();
    let reader = MetadataReader::new(&metadata.data, &metadata.index, &frozen).unwrap();
    let members = reader.members_of(2).unwrap();

    assert_eq!(members[0].annotations.len(), 1);
    assert_eq!(members[0].annotations[0].annotation_type.id, kept.id);
}
