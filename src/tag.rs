//! Closed tag-byte table for annotation element values.
//!
//! The discriminators follow the JVM class-file `element_value` tags
//! (JVMS §4.7.16.1), which the runtime-side parser already understands:
//! one reserved byte per value kind, injective, never reassigned across a
//! toolchain release. Anything outside this table is a decode error — the
//! value model is closed, there is no unknown-kind escape hatch.

use crate::{Error, Result};

/// One-byte discriminator preceding every encoded annotation element value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    /// Nested annotation instance.
    Annotation = b'@',
    /// Enum constant (declaring type index + constant name index).
    Enum = b'e',
    /// Array of element values.
    Array = b'[',
    /// Type reference (interned class index).
    Class = b'c',
    /// String (interned string index).
    Str = b's',
    /// `boolean`, one byte 0/1.
    Boolean = b'Z',
    /// `byte`, one signed byte.
    Byte = b'B',
    /// `short`, two signed bytes.
    Short = b'S',
    /// `char`, one UTF-16 code unit (two unsigned bytes).
    Char = b'C',
    /// `int`, four signed bytes.
    Int = b'I',
    /// `long`, eight signed bytes.
    Long = b'J',
    /// `float`, raw bit pattern as four bytes.
    Float = b'F',
    /// `double`, raw bit pattern as eight bytes.
    Double = b'D',
}

impl Tag {
    /// Alle Einträge der geschlossenen Tabelle, für Exhaustiveness-Tests.
    pub const ALL: [Tag; 13] = [
        Tag::Annotation,
        Tag::Enum,
        Tag::Array,
        Tag::Class,
        Tag::Str,
        Tag::Boolean,
        Tag::Byte,
        Tag::Short,
        Tag::Char,
        Tag::Int,
        Tag::Long,
        Tag::Float,
        Tag::Double,
    ];

    /// The wire byte of this tag.
    #[inline]
    pub fn byte(self) -> u8 {
        self as u8
    }

    /// Reverse lookup; `Err(UnknownTag)` for any byte outside the table.
    pub fn from_byte(byte: u8) -> Result<Tag> {
        match byte {
            b'@' => Ok(Tag::Annotation),
            b'e' => Ok(Tag::Enum),
            b'[' => Ok(Tag::Array),
            b'c' => Ok(Tag::Class),
            b's' => Ok(Tag::Str),
            b'Z' => Ok(Tag::Boolean),
            b'B' => Ok(Tag::Byte),
            b'S' => Ok(Tag::Short),
            b'C' => Ok(Tag::Char),
            b'I' => Ok(Tag::Int),
            b'J' => Ok(Tag::Long),
            b'F' => Ok(Tag::Float),
            b'D' => Ok(Tag::Double),
            other => Err(Error::UnknownTag(other)),
        }
    }
}
