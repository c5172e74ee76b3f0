//! INTEGER tag

use super::meta::TagMeta;
use super::tag::TagContent;
use crate::ber::BerType;
use crate::error::{BerError, BerResult};
use berschema_core::{ByteReader, ByteWriter};

/// Largest INTEGER payload accepted on decode
pub const MAX_INTEGER_WIDTH: usize = 8;

/// Signed range representable in `index + 1` bytes
///
/// Both the length prediction and the writer pick their width from this
/// table, so they agree on every boundary.
const WIDTH_RANGES: [(i64, i64); MAX_INTEGER_WIDTH] = [
    (-0x80, 0x7F),
    (-0x8000, 0x7FFF),
    (-0x80_0000, 0x7F_FFFF),
    (-0x8000_0000, 0x7FFF_FFFF),
    (-0x80_0000_0000, 0x7F_FFFF_FFFF),
    (-0x8000_0000_0000, 0x7FFF_FFFF_FFFF),
    (-0x80_0000_0000_0000, 0x7F_FFFF_FFFF_FFFF),
    (i64::MIN, i64::MAX),
];

/// Minimal two's complement width of `value` in bytes
pub fn encoded_width(value: i64) -> usize {
    WIDTH_RANGES
        .iter()
        .position(|&(min, max)| (min..=max).contains(&value))
        .map_or(MAX_INTEGER_WIDTH, |index| index + 1)
}

/// Signed integer of at most 8 bytes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Asn1Integer {
    value: Option<i64>,
}

impl Asn1Integer {
    pub fn new() -> Self {
        Self { value: None }
    }

    pub fn with_value(value: i64) -> Self {
        Self { value: Some(value) }
    }

    pub fn value(&self) -> Option<i64> {
        self.value
    }

    pub fn set_value(&mut self, value: i64) {
        self.value = Some(value);
    }
}

impl TagContent for Asn1Integer {
    fn is_value_set(&self) -> bool {
        self.value.is_some()
    }

    fn value_length(&self) -> BerResult<usize> {
        Ok(self.value.map_or(0, encoded_width))
    }

    fn write_value(&self, writer: &mut ByteWriter) -> BerResult<()> {
        match self.value {
            Some(value) => writer.write_signed(value, encoded_width(value)),
            None => Ok(()),
        }
    }

    /// A zero-length payload leaves the value unset.
    fn read_value(
        &mut self,
        meta: &TagMeta,
        reader: &mut ByteReader,
        _identifier: BerType,
    ) -> BerResult<()> {
        let length = reader.read_ber_length()?;
        if length > MAX_INTEGER_WIDTH {
            return Err(BerError::IntegerTooWide {
                name: meta.name.clone(),
                length,
            });
        }
        self.value = if length == 0 {
            None
        } else {
            Some(reader.read_signed(length)?)
        };
        Ok(())
    }

    fn clear_value(&mut self) {
        self.value = None;
    }

    fn deep_copy(&self) -> Self {
        *self
    }
}
