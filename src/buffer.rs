//! Byte-level writer and reader for the metadata blobs.
//!
//! Alle Fixed-Width-Integer werden little-endian geschrieben. Die Byte-Order
//! ist Producer/Consumer-privat: beide Seiten stammen aus demselben
//! Toolchain-Release, es gibt kein Versionierungs- oder Negotiation-Protokoll.

use crate::{Error, Result};

/// Writes fixed-width integers into a growable byte buffer.
///
/// Variable-length integers are layered on top in [`crate::varint`].
#[derive(Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// Creates a new empty `ByteWriter`.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Number of bytes written so far. Offsets recorded in the index blob
    /// are snapshots of this value.
    #[inline]
    pub fn bytes_written(&self) -> usize {
        self.buf.len()
    }

    /// Writes a single unsigned byte.
    #[inline]
    pub fn write_u1(&mut self, val: u8) {
        self.buf.push(val);
    }

    /// Writes a single signed byte.
    #[inline]
    pub fn write_s1(&mut self, val: i8) {
        self.buf.push(val as u8);
    }

    /// Writes an unsigned 16-bit integer.
    #[inline]
    pub fn write_u2(&mut self, val: u16) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes a signed 16-bit integer.
    #[inline]
    pub fn write_s2(&mut self, val: i16) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes a signed 32-bit integer.
    #[inline]
    pub fn write_s4(&mut self, val: i32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes a signed 64-bit integer.
    #[inline]
    pub fn write_s8(&mut self, val: i64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes a raw byte slice (pre-encoded nested buffers).
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Consumes the writer and returns the accumulated bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

/// Reads fixed-width integers from a byte slice with bounds checking.
///
/// Jeder Lese-Fehler ist `PrematureEndOfBlob` — ein abgeschnittener Blob ist
/// der einzige Weg, hier zu scheitern.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current read position in bytes.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Repositions the reader to an absolute byte offset.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(Error::PrematureEndOfBlob);
        }
        self.pos = pos;
        Ok(())
    }

    /// True when every byte has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.pos == self.data.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or(Error::PrematureEndOfBlob)?;
        if end > self.data.len() {
            return Err(Error::PrematureEndOfBlob);
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Reads a single unsigned byte.
    #[inline]
    pub fn read_u1(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Reads a single signed byte.
    #[inline]
    pub fn read_s1(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    /// Reads an unsigned 16-bit integer.
    #[inline]
    pub fn read_u2(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    /// Reads a signed 16-bit integer.
    #[inline]
    pub fn read_s2(&mut self) -> Result<i16> {
        let b = self.take(2)?;
        Ok(i16::from_le_bytes([b[0], b[1]]))
    }

    /// Reads a signed 32-bit integer.
    #[inline]
    pub fn read_s4(&mut self) -> Result<i32> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads a signed 64-bit integer.
    #[inline]
    pub fn read_s8(&mut self) -> Result<i64> {
        let b = self.take(8)?;
        Ok(i64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Reads `n` raw bytes (nested annotation buffers).
    #[inline]
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_fixed_widths() {
        let mut w = ByteWriter::new();
        w.write_u1(0xAB);
        w.write_s1(-2);
        w.write_u2(0xBEEF);
        w.write_s2(-300);
        w.write_s4(-70000);
        w.write_s8(i64::MIN);
        let data = w.into_vec();
        assert_eq!(data.len(), 1 + 1 + 2 + 2 + 4 + 8);

        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u1().unwrap(), 0xAB);
        assert_eq!(r.read_s1().unwrap(), -2);
        assert_eq!(r.read_u2().unwrap(), 0xBEEF);
        assert_eq!(r.read_s2().unwrap(), -300);
        assert_eq!(r.read_s4().unwrap(), -70000);
        assert_eq!(r.read_s8().unwrap(), i64::MIN);
        assert!(r.is_at_end());
    }

    #[test]
    fn bytes_written_tracks_position() {
        let mut w = ByteWriter::new();
        assert_eq!(w.bytes_written(), 0);
        w.write_s4(1);
        assert_eq!(w.bytes_written(), 4);
        w.write_bytes(&[1, 2, 3]);
        assert_eq!(w.bytes_written(), 7);
    }

    #[test]
    fn read_past_end_fails() {
        let data = [0u8; 3];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_s4(), Err(Error::PrematureEndOfBlob));
        // Fehlgeschlagener Read konsumiert nichts
        assert_eq!(r.position(), 0);
        assert_eq!(r.read_u2().unwrap(), 0);
    }

    #[test]
    fn seek_beyond_end_fails() {
        let data = [0u8; 4];
        let mut r = ByteReader::new(&data);
        assert!(r.seek(4).is_ok());
        assert!(r.is_at_end());
        assert_eq!(r.seek(5), Err(Error::PrematureEndOfBlob));
    }

    #[test]
    fn little_endian_layout() {
        let mut w = ByteWriter::new();
        w.write_s4(0x0403_0201);
        assert_eq!(w.into_vec(), vec![0x01, 0x02, 0x03, 0x04]);
    }
}
