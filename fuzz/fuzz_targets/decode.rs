#![no_main]
use libfuzzer_sys::fuzz_target;

use aotmeta::{InternPool, MetadataReader, TypeDesc};

fuzz_target!(|data: &[u8]| {
    let pool = InternPool::new(
        TypeDesc::new(0, "java.lang.Object"),
        TypeDesc::new(1, "void"),
    );
    pool.classes.add(&TypeDesc::new(2, "com.example.Widget"));
    pool.strings.add(&"run".into());
    pool.strings.add(&"()V".into());
    let frozen = pool.freeze();

    // Raw bytes as the index blob over an empty data blob.
    if let Ok(reader) = MetadataReader::new(&[], data, &frozen) {
        for id in 0..reader.type_count() {
            let _ = reader.offset_of(id);
            let _ = reader.members_of(id);
        }
    }

    // Raw bytes as the data blob, index pointing at offset 0.
    let index = 0i32.to_le_bytes();
    if let Ok(reader) = MetadataReader::new(data, &index, &frozen) {
        let _ = reader.members_of(0);
    }
});
