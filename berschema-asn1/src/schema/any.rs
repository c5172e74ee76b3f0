//! Raw tag holding an uninterpreted payload

use super::meta::TagMeta;
use super::tag::TagContent;
use crate::ber::BerType;
use crate::error::BerResult;
use berschema_core::{ByteReader, ByteWriter};
use bytes::Bytes;

/// Opaque payload bytes
///
/// On decode any identifier is accepted in implicit mode and the payload is
/// kept as-is. On encode the payload is written under the tag's own
/// universal `tag_type`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Any {
    value: Option<Bytes>,
}

impl Any {
    pub fn new() -> Self {
        Self { value: None }
    }

    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, value: impl Into<Bytes>) {
        self.value = Some(value.into());
    }
}

impl TagContent for Any {
    fn is_value_set(&self) -> bool {
        self.value.is_some()
    }

    fn value_length(&self) -> BerResult<usize> {
        Ok(self.value.as_ref().map_or(0, Bytes::len))
    }

    fn write_value(&self, writer: &mut ByteWriter) -> BerResult<()> {
        if let Some(value) = &self.value {
            writer.write_bytes(value);
        }
        Ok(())
    }

    fn read_value(
        &mut self,
        _meta: &TagMeta,
        reader: &mut ByteReader,
        _identifier: BerType,
    ) -> BerResult<()> {
        let length = reader.read_ber_length()?;
        self.value = Some(reader.read_raw(length)?);
        Ok(())
    }

    fn clear_value(&mut self) {
        self.value = None;
    }

    fn deep_copy(&self) -> Self {
        Self {
            value: self.value.as_deref().map(Bytes::copy_from_slice),
        }
    }

    fn is_typeless(&self) -> bool {
        true
    }
}
