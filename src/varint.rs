//! Variable-length integer codecs for member records.
//!
//! Unsigned values use 7-bit groups with a continuation bit (MSB), least
//! significant group first. Signed values are zigzag-mapped onto the unsigned
//! codec so that small negative indices stay short. Member records use these
//! exclusively; annotation bytes use the fixed widths of
//! [`crate::buffer::ByteWriter`].

use crate::buffer::{ByteReader, ByteWriter};
use crate::{Error, Result};

/// Encodes a `u64` as a variable-length unsigned integer.
#[inline]
pub fn encode_unsigned(writer: &mut ByteWriter, value: u64) {
    if value < 128 {
        // Fast-Path: Single-Byte (häufigster Fall — kleine Zähler und Indizes)
        writer.write_u1(value as u8);
        return;
    }
    let mut v = value;
    loop {
        let low7 = (v & 0x7F) as u8;
        v >>= 7;
        if v == 0 {
            writer.write_u1(low7);
            break;
        }
        writer.write_u1(0x80 | low7);
    }
}

/// Decodes a variable-length unsigned integer from the stream.
#[inline]
pub fn decode_unsigned(reader: &mut ByteReader<'_>) -> Result<u64> {
    let byte = reader.read_u1()?;
    if byte & 0x80 == 0 {
        return Ok(u64::from(byte));
    }
    let mut result = u64::from(byte & 0x7F);
    let mut shift: u32 = 7;
    loop {
        let byte = reader.read_u1()?;
        let data = u64::from(byte & 0x7F);
        // Overflow-Prüfung: bei shift 63 (10. Byte) ist nur Daten-Bit 0
        // gültig (u64 hat 64 Bits), und kein Continuation-Byte erlaubt.
        if shift == 63 && (data > 1 || byte & 0x80 != 0) {
            return Err(Error::VarintOverflow);
        }
        result |= data << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
}

/// Encodes an `i64` via zigzag mapping onto the unsigned codec.
///
/// Zigzag: 0 → 0, -1 → 1, 1 → 2, -2 → 3 … — type and string indices are
/// small non-negative numbers, the occasional sentinel is a small negative
/// one, both encode in one byte.
#[inline]
pub fn encode_signed(writer: &mut ByteWriter, value: i64) {
    let zigzag = ((value << 1) ^ (value >> 63)) as u64;
    encode_unsigned(writer, zigzag);
}

/// Decodes a zigzag-encoded signed integer.
#[inline]
pub fn decode_signed(reader: &mut ByteReader<'_>) -> Result<i64> {
    let zigzag = decode_unsigned(reader)?;
    Ok(((zigzag >> 1) as i64) ^ -((zigzag & 1) as i64))
}

/// Decodes an unsigned varint that must fit a `u32` (counts, modifiers).
#[inline]
pub fn decode_unsigned_u32(reader: &mut ByteReader<'_>) -> Result<u32> {
    let value = decode_unsigned(reader)?;
    u32::try_from(value).map_err(|_| Error::VarintOverflow)
}
