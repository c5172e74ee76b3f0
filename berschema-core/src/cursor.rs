//! Forward-only byte cursors used by the BER codecs
//!
//! [`ByteReader`] consumes a [`Bytes`] buffer from the front and tracks how
//! many bytes have been read. Slices taken with [`ByteReader::read_bytes`]
//! share the underlying allocation and are released when dropped.
//!
//! [`ByteWriter`] appends to a [`BytesMut`] buffer; its position is the number
//! of bytes written so far, which lets callers measure how much a nested
//! writer produced.
//!
//! # Length Encoding
//!
//! ```text
//! Short form:  0 L L L L L L L                      (0..=0x7F)
//! Long form:   1 N N N N N N N  L1 .. LN            (N = 1..=8, big-endian)
//! ```

use crate::error::{BerError, BerResult};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Maximum number of length octets accepted in the long form
const MAX_LENGTH_OCTETS: usize = 8;

/// Maximum width of a signed integer read or written by the cursors
const MAX_INTEGER_OCTETS: usize = 8;

/// Number of bytes needed to encode `length` as a BER definite length
///
/// One byte for lengths up to `0x7F`, otherwise one length-of-length byte
/// followed by the minimal number of big-endian length bytes.
pub fn ber_length_width(length: usize) -> usize {
    if length <= 0x7F {
        1
    } else {
        1 + significant_octets(length as u64)
    }
}

/// Minimal number of bytes holding `value` unsigned (at least 1)
fn significant_octets(value: u64) -> usize {
    (8 - value.leading_zeros() as usize / 8).max(1)
}

/// Cursor over an immutable byte buffer
#[derive(Debug, Clone, Default)]
pub struct ByteReader {
    buffer: Bytes,
    position: usize,
}

impl ByteReader {
    /// Create a reader positioned at the start of `data`
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            buffer: data.into(),
            position: 0,
        }
    }

    /// Number of bytes consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes left to read
    pub fn remaining(&self) -> usize {
        self.buffer.len()
    }

    /// Check if there is more data to read
    pub fn has_remaining(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// The unread bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    fn ensure(&self, needed: usize) -> BerResult<()> {
        if needed > self.buffer.len() {
            return Err(BerError::BufferUnderflow {
                needed,
                remaining: self.buffer.len(),
            });
        }
        Ok(())
    }

    /// Read one byte
    pub fn read_u8(&mut self) -> BerResult<u8> {
        self.ensure(1)?;
        self.position += 1;
        Ok(self.buffer.get_u8())
    }

    /// Look at the byte `offset` positions ahead without consuming anything
    pub fn peek_u8(&self, offset: usize) -> Option<u8> {
        self.buffer.get(offset).copied()
    }

    /// Read a BER definite length field
    ///
    /// # Errors
    ///
    /// Returns `InvalidLength` for the indefinite form (`0x80`), for more than
    /// 8 length octets and for lengths that do not fit in `usize`.
    pub fn read_ber_length(&mut self) -> BerResult<usize> {
        let first = self.read_u8()?;
        if first & 0x80 == 0 {
            return Ok(first as usize);
        }

        let count = (first & 0x7F) as usize;
        if count == 0 {
            return Err(BerError::InvalidLength(
                "Indefinite length encoding not supported".to_string(),
            ));
        }
        if count > MAX_LENGTH_OCTETS {
            return Err(BerError::InvalidLength(format!(
                "Length encoding too large: {} bytes (max {})",
                count, MAX_LENGTH_OCTETS
            )));
        }

        self.ensure(count)?;
        let value = self.buffer.get_uint(count);
        self.position += count;
        usize::try_from(value)
            .map_err(|_| BerError::InvalidLength(format!("Length {} does not fit in usize", value)))
    }

    /// Read exactly `count` bytes into an independent reader
    pub fn read_bytes(&mut self, count: usize) -> BerResult<ByteReader> {
        self.read_raw(count).map(ByteReader::new)
    }

    /// Read exactly `count` bytes
    pub fn read_raw(&mut self, count: usize) -> BerResult<Bytes> {
        self.ensure(count)?;
        self.position += count;
        Ok(self.buffer.split_to(count))
    }

    /// Read a big-endian two's complement integer of `width` bytes
    ///
    /// The value is sign-extended to 64 bits. A width of zero yields 0.
    pub fn read_signed(&mut self, width: usize) -> BerResult<i64> {
        if width > MAX_INTEGER_OCTETS {
            return Err(BerError::InvalidLength(format!(
                "Integer too large: {} bytes (max {})",
                width, MAX_INTEGER_OCTETS
            )));
        }
        if width == 0 {
            return Ok(0);
        }

        self.ensure(width)?;
        let raw = self.buffer.get_uint(width);
        self.position += width;
        let shift = 64 - 8 * width as u32;
        Ok(((raw << shift) as i64) >> shift)
    }
}

/// Growable output buffer
#[derive(Debug, Default)]
pub struct ByteWriter {
    buffer: BytesMut,
}

impl ByteWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
        }
    }

    /// Create a writer with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far
    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.put_u8(value);
    }

    /// Write a big-endian u16
    pub fn write_u16(&mut self, value: u16) {
        self.buffer.put_u16(value);
    }

    /// Write a big-endian u32
    pub fn write_u32(&mut self, value: u32) {
        self.buffer.put_u32(value);
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buffer.put_slice(data);
    }

    /// Write a BER definite length field, `ber_length_width(length)` bytes long
    pub fn write_ber_length(&mut self, length: usize) {
        if length <= 0x7F {
            self.buffer.put_u8(length as u8);
        } else {
            let count = significant_octets(length as u64);
            self.buffer.put_u8(0x80 | count as u8);
            self.buffer.put_uint(length as u64, count);
        }
    }

    /// Write the low `width` bytes of `value` in big-endian order
    ///
    /// # Errors
    ///
    /// Returns `InvalidLength` if `width` is greater than 8.
    pub fn write_signed(&mut self, value: i64, width: usize) -> BerResult<()> {
        if width > MAX_INTEGER_OCTETS {
            return Err(BerError::InvalidLength(format!(
                "Integer too large: {} bytes (max {})",
                width, MAX_INTEGER_OCTETS
            )));
        }
        self.buffer.put_int(value, width);
        Ok(())
    }

    /// Get a reference to the written bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the written bytes
    pub fn into_bytes(self) -> Bytes {
        self.buffer.freeze()
    }
}
