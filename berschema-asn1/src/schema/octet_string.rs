//! OCTET STRING tag

use super::meta::TagMeta;
use super::tag::TagContent;
use crate::ber::BerType;
use crate::error::{BerError, BerResult};
use berschema_core::{ByteReader, ByteWriter};
use bytes::Bytes;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct OctetString {
    value: Option<Bytes>,
}

impl OctetString {
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

impl TagContent for OctetString {
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
        meta: &TagMeta,
        reader: &mut ByteReader,
        _identifier: BerType,
    ) -> BerResult<()> {
        let length = reader.read_ber_length()?;
        if length > reader.remaining() {
            return Err(BerError::OctetStringTooLong {
                name: meta.name.clone(),
                length,
                remaining: reader.remaining(),
            });
        }
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
}
