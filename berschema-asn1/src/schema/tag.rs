//! Schema tag and the encode/decode protocol shared by all variants

use super::any::Any;
use super::integer::Asn1Integer;
use super::meta::TagMeta;
use super::octet_string::OctetString;
use super::sequence::Sequence;
use super::sequence_of::SequenceOf;
use crate::ber::{BerTagClass, BerType, ber_length_width, universal};
use crate::error::{BerError, BerResult};
use berschema_core::{ByteReader, ByteWriter};
use bytes::Bytes;

/// Value slot of a schema tag
///
/// Implemented by [`Any`], [`Asn1Integer`], [`OctetString`], [`Sequence`] and
/// [`SequenceOf`]. Identifier handling, explicit wrapping and length checks
/// are done by [`Tag`]; implementors only deal with the length field and
/// payload of the intrinsic encoding.
pub trait TagContent {
    /// Whether the slot holds a value
    fn is_value_set(&self) -> bool;

    /// Number of payload bytes `write_value` will produce
    fn value_length(&self) -> BerResult<usize>;

    /// Write exactly `value_length()` payload bytes
    fn write_value(&self, writer: &mut ByteWriter) -> BerResult<()>;

    /// Read the length field and payload following an accepted identifier
    fn read_value(
        &mut self,
        meta: &TagMeta,
        reader: &mut ByteReader,
        identifier: BerType,
    ) -> BerResult<()>;

    /// Reset the slot to unset
    fn clear_value(&mut self);

    /// Independent copy of the slot
    fn deep_copy(&self) -> Self
    where
        Self: Sized;

    /// Whether implicit decoding accepts any identifier
    fn is_typeless(&self) -> bool {
        false
    }
}

/// The closed set of tag variants
#[derive(Debug, PartialEq)]
pub enum TagKind {
    Any(Any),
    Integer(Asn1Integer),
    OctetString(OctetString),
    Sequence(Sequence),
    SequenceOf(SequenceOf),
}

impl TagKind {
    fn content(&self) -> &dyn TagContent {
        match self {
            TagKind::Any(any) => any,
            TagKind::Integer(integer) => integer,
            TagKind::OctetString(octets) => octets,
            TagKind::Sequence(sequence) => sequence,
            TagKind::SequenceOf(sequence_of) => sequence_of,
        }
    }

    fn content_mut(&mut self) -> &mut dyn TagContent {
        match self {
            TagKind::Any(any) => any,
            TagKind::Integer(integer) => integer,
            TagKind::OctetString(octets) => octets,
            TagKind::Sequence(sequence) => sequence,
            TagKind::SequenceOf(sequence_of) => sequence_of,
        }
    }

    fn deep_copy(&self) -> Self {
        match self {
            TagKind::Any(any) => TagKind::Any(any.deep_copy()),
            TagKind::Integer(integer) => TagKind::Integer(integer.deep_copy()),
            TagKind::OctetString(octets) => TagKind::OctetString(octets.deep_copy()),
            TagKind::Sequence(sequence) => TagKind::Sequence(sequence.deep_copy()),
            TagKind::SequenceOf(sequence_of) => TagKind::SequenceOf(sequence_of.deep_copy()),
        }
    }
}

/// A node of a BER schema tree
///
/// A tag is created with schema metadata only; its value is populated by
/// [`Tag::read_tag`] or by assignment through the typed accessors, and
/// consumed by [`Tag::write_tag`].
///
/// # Encoding
///
/// Implicit (`explicit == false`):
///
/// ```text
/// [Universal | constructed | tag_type] [length] [payload]
/// ```
///
/// Explicit:
///
/// ```text
/// [tag_class | 1 | tag_number] [length] ( implicit encoding )
/// ```
///
/// # Example
///
/// ```
/// use berschema_asn1::schema::Tag;
///
/// # fn main() -> berschema_asn1::BerResult<()> {
/// let mut version = Tag::integer("version");
/// version.as_integer_mut().unwrap().set_value(300);
/// assert_eq!(&version.encode()?[..], &[0x02, 0x02, 0x01, 0x2C]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq)]
pub struct Tag {
    meta: TagMeta,
    kind: TagKind,
}

impl Tag {
    pub fn new(meta: TagMeta, kind: TagKind) -> Self {
        Self { meta, kind }
    }

    /// Raw tag written with the universal type `tag_type`, accepting any identifier on decode
    pub fn any(name: impl Into<String>, tag_type: u8) -> Self {
        Self::new(TagMeta::new(name, tag_type, false), TagKind::Any(Any::new()))
    }

    /// INTEGER tag
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(
            TagMeta::new(name, universal::INTEGER, false),
            TagKind::Integer(Asn1Integer::new()),
        )
    }

    /// OCTET STRING tag
    pub fn octet_string(name: impl Into<String>) -> Self {
        Self::new(
            TagMeta::new(name, universal::OCTET_STRING, false),
            TagKind::OctetString(OctetString::new()),
        )
    }

    /// SEQUENCE tag with a fixed list of children
    pub fn sequence(name: impl Into<String>, children: Vec<Tag>) -> Self {
        Self::new(
            TagMeta::new(name, universal::SEQUENCE, true),
            TagKind::Sequence(Sequence::new(children)),
        )
    }

    /// SEQUENCE OF tag whose elements are copies of `prototype`
    pub fn sequence_of(name: impl Into<String>, prototype: Tag) -> Self {
        Self::new(
            TagMeta::new(name, universal::SEQUENCE, true),
            TagKind::SequenceOf(SequenceOf::new(prototype)),
        )
    }

    /// Mark the tag as optional
    pub fn optional(mut self) -> Self {
        self.meta.optional = true;
        self
    }

    /// Wrap the tag in an explicit `class`/`number` element
    pub fn explicit(mut self, class: BerTagClass, number: u8) -> Self {
        self.meta.explicit = true;
        self.meta.tag_class = class;
        self.meta.tag_number = number;
        self
    }

    /// Set the constructed flag of the intrinsic encoding
    pub fn constructed(mut self, constructed: bool) -> Self {
        self.meta.constructed = constructed;
        self
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn meta(&self) -> &TagMeta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut TagMeta {
        &mut self.meta
    }

    pub fn kind(&self) -> &TagKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut TagKind {
        &mut self.kind
    }

    pub fn as_any(&self) -> Option<&Any> {
        match &self.kind {
            TagKind::Any(any) => Some(any),
            _ => None,
        }
    }

    pub fn as_any_mut(&mut self) -> Option<&mut Any> {
        match &mut self.kind {
            TagKind::Any(any) => Some(any),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&Asn1Integer> {
        match &self.kind {
            TagKind::Integer(integer) => Some(integer),
            _ => None,
        }
    }

    pub fn as_integer_mut(&mut self) -> Option<&mut Asn1Integer> {
        match &mut self.kind {
            TagKind::Integer(integer) => Some(integer),
            _ => None,
        }
    }

    pub fn as_octet_string(&self) -> Option<&OctetString> {
        match &self.kind {
            TagKind::OctetString(octets) => Some(octets),
            _ => None,
        }
    }

    pub fn as_octet_string_mut(&mut self) -> Option<&mut OctetString> {
        match &mut self.kind {
            TagKind::OctetString(octets) => Some(octets),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match &self.kind {
            TagKind::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Sequence> {
        match &mut self.kind {
            TagKind::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    pub fn as_sequence_of(&self) -> Option<&SequenceOf> {
        match &self.kind {
            TagKind::SequenceOf(sequence_of) => Some(sequence_of),
            _ => None,
        }
    }

    pub fn as_sequence_of_mut(&mut self) -> Option<&mut SequenceOf> {
        match &mut self.kind {
            TagKind::SequenceOf(sequence_of) => Some(sequence_of),
            _ => None,
        }
    }

    pub fn is_value_set(&self) -> bool {
        self.kind.content().is_value_set()
    }

    /// A tag is written unless it is optional and has no value
    pub fn must_write(&self) -> bool {
        !self.meta.optional || self.is_value_set()
    }

    /// Payload length of the intrinsic encoding
    pub fn value_length(&self) -> BerResult<usize> {
        self.kind.content().value_length()
    }

    /// Full number of bytes `write_tag` produces, zero if the tag is skipped
    pub fn encoded_length(&self) -> BerResult<usize> {
        if !self.must_write() {
            return Ok(0);
        }
        let implicit = self.implicit_length()?;
        if self.meta.explicit {
            tlv_length(implicit)
        } else {
            Ok(implicit)
        }
    }

    fn implicit_length(&self) -> BerResult<usize> {
        tlv_length(self.value_length()?)
    }

    /// Check an identifier against this tag
    ///
    /// In explicit mode the identifier must be the constructed outer wrapper
    /// `tag_class`/`tag_number`. In implicit mode it must be a Universal class
    /// identifier with this tag's constructed flag and `tag_type`, unless the
    /// variant is typeless.
    pub fn is_type_valid(&self, identifier: BerType, explicit: bool) -> bool {
        if explicit {
            identifier.class() == self.meta.tag_class
                && identifier.is_constructed()
                && identifier.number() == self.meta.tag_number
        } else if self.kind.content().is_typeless() {
            true
        } else {
            identifier.class() == BerTagClass::Universal
                && identifier.is_constructed() == self.meta.constructed
                && identifier.number() == self.meta.tag_type
        }
    }

    /// Whether the next identifier in `reader` belongs to this tag
    pub(crate) fn is_next(&self, reader: &ByteReader) -> bool {
        reader
            .peek_u8(0)
            .and_then(|byte| BerType::decode(byte).ok())
            .is_some_and(|identifier| self.is_type_valid(identifier, self.meta.explicit))
    }

    /// Encode this tag into `writer`
    ///
    /// Nothing is written for an optional tag without a value.
    ///
    /// # Errors
    ///
    /// Returns `LengthMismatch` if a payload writer produced a different number
    /// of bytes than predicted, and `UnsupportedExtendedTag` for a type or tag
    /// number of 31 or more.
    pub fn write_tag(&self, writer: &mut ByteWriter) -> BerResult<()> {
        if !self.must_write() {
            return Ok(());
        }
        self.write_tag_inner(writer)
            .map_err(|err| err.in_tag(&self.meta.name))
    }

    fn write_tag_inner(&self, writer: &mut ByteWriter) -> BerResult<()> {
        if self.meta.explicit {
            writer.write_u8(self.meta.outer_identifier()?.encode());
            writer.write_ber_length(self.implicit_length()?);
        }
        self.write_implicit(writer)
    }

    fn write_implicit(&self, writer: &mut ByteWriter) -> BerResult<()> {
        writer.write_u8(self.meta.inner_identifier()?.encode());
        let length = self.value_length()?;
        writer.write_ber_length(length);

        let start = writer.position();
        self.kind.content().write_value(writer)?;
        let written = writer.position() - start;
        if written != length {
            log::error!(
                "{}: payload length mismatch, predicted {} bytes, wrote {}",
                self.meta.name,
                length,
                written
            );
            return Err(BerError::LengthMismatch {
                name: self.meta.name.clone(),
                expected: length,
                actual: written,
            });
        }
        Ok(())
    }

    /// Decode this tag from `reader`
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the identifier does not match the schema, and
    /// the variant's own errors for malformed payloads. Errors raised by the
    /// cursor are wrapped with the name of this tag.
    pub fn read_tag(&mut self, reader: &mut ByteReader) -> BerResult<()> {
        let result = self.read_tag_inner(reader);
        result.map_err(|err| err.in_tag(&self.meta.name))
    }

    fn read_tag_inner(&mut self, reader: &mut ByteReader) -> BerResult<()> {
        let explicit = self.meta.explicit;
        let identifier = self.read_identifier(reader, explicit)?;
        if explicit {
            let length = reader.read_ber_length()?;
            let mut inner = reader.read_bytes(length)?;
            let identifier = self.read_identifier(&mut inner, false)?;
            self.read_value(&mut inner, identifier)
        } else {
            self.read_value(reader, identifier)
        }
    }

    fn read_identifier(&self, reader: &mut ByteReader, explicit: bool) -> BerResult<BerType> {
        let byte = reader.read_u8()?;
        let identifier = BerType::decode(byte)?;
        log::trace!("{}: read identifier {}", self.meta.name, identifier);
        if !self.is_type_valid(identifier, explicit) {
            return Err(BerError::TypeMismatch {
                name: self.meta.name.clone(),
                identifier: byte,
            });
        }
        Ok(identifier)
    }

    fn read_value(&mut self, reader: &mut ByteReader, identifier: BerType) -> BerResult<()> {
        let Tag { meta, kind } = self;
        kind.content_mut().read_value(meta, reader, identifier)
    }

    /// Reset the value, recursively for sequences
    pub fn clear_value(&mut self) {
        self.kind.content_mut().clear_value();
    }

    /// Independent copy named `name + suffix`
    pub fn deep_copy(&self, suffix: &str) -> Tag {
        let mut meta = self.meta.clone();
        meta.name.push_str(suffix);
        Tag {
            meta,
            kind: self.kind.deep_copy(),
        }
    }

    /// Copy the encoding attributes of `other`, keeping this tag's name and value
    pub fn copy_from(&mut self, other: &Tag) {
        self.meta.copy_from(&other.meta);
    }

    /// Encode this tag into a new buffer
    pub fn encode(&self) -> BerResult<Bytes> {
        let mut writer = ByteWriter::with_capacity(self.encoded_length()?);
        self.write_tag(&mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Decode this tag from the start of `data`
    pub fn decode(&mut self, data: impl Into<Bytes>) -> BerResult<()> {
        let mut reader = ByteReader::new(data);
        self.read_tag(&mut reader)?;
        if reader.has_remaining() {
            log::debug!(
                "{}: {} trailing bytes after tag",
                self.meta.name,
                reader.remaining()
            );
        }
        Ok(())
    }
}

/// Identifier + length field + payload
fn tlv_length(payload: usize) -> BerResult<usize> {
    payload
        .checked_add(1 + ber_length_width(payload))
        .ok_or(BerError::LengthOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integer(name: &str, value: i64) -> Tag {
        let mut tag = Tag::integer(name);
        tag.as_integer_mut().unwrap().set_value(value);
        tag
    }

    #[test]
    fn test_implicit_encoding() {
        let tag = integer("value", 5);
        assert_eq!(tag.encoded_length().unwrap(), 3);
        assert_eq!(&tag.encode().unwrap()[..], &[0x02, 0x01, 0x05]);
    }

    #[test]
    fn test_explicit_encoding() {
        let tag = integer("value", 5).explicit(BerTagClass::ContextSpecific, 1);
        assert_eq!(tag.encoded_length().unwrap(), 5);
        assert_eq!(
            &tag.encode().unwrap()[..],
            &[0xA1, 0x03, 0x02, 0x01, 0x05]
        );
    }

    #[test]
    fn test_explicit_inner_matches_implicit() {
        for value in [0, -1, 255, 70000, i64::MIN] {
            let implicit = integer("value", value).encode().unwrap();
            let explicit = integer("value", value)
                .explicit(BerTagClass::Application, 4)
                .encode()
                .unwrap();

            let mut reader = ByteReader::new(explicit);
            assert_eq!(reader.read_u8().unwrap(), 0x64);
            let length = reader.read_ber_length().unwrap();
            assert_eq!(length, implicit.len());
            assert_eq!(reader.as_bytes(), &implicit[..]);
        }
    }

    #[test]
    fn test_explicit_round_trip() {
        let source = integer("value", -300).explicit(BerTagClass::Private, 9);
        let encoded = source.encode().unwrap();

        let mut target = Tag::integer("value").explicit(BerTagClass::Private, 9);
        target.decode(encoded).unwrap();
        assert_eq!(target.as_integer().unwrap().value(), Some(-300));
    }

    #[test]
    fn test_explicit_wrong_wrapper() {
        let encoded = integer("value", 1)
            .explicit(BerTagClass::ContextSpecific, 2)
            .encode()
            .unwrap();
        let mut target = Tag::integer("value").explicit(BerTagClass::ContextSpecific, 3);
        assert_eq!(
            target.decode(encoded),
            Err(BerError::TypeMismatch {
                name: "value".to_string(),
                identifier: 0xA2
            })
        );
    }

    #[test]
    fn test_type_mismatch() {
        let mut tag = Tag::octet_string("payload");
        let err = tag.decode(vec![0x02, 0x01, 0x05]).unwrap_err();
        assert_eq!(err.tag_name(), Some("payload"));
        assert!(matches!(err, BerError::TypeMismatch { identifier: 0x02, .. }));
    }

    #[test]
    fn test_constructed_flag_checked() {
        let mut tag = Tag::integer("value");
        assert!(matches!(
            tag.decode(vec![0x22, 0x01, 0x05]),
            Err(BerError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_extended_identifier_rejected_on_decode() {
        let mut tag = Tag::integer("value");
        let err = tag.decode(vec![0x1F, 0x21, 0x01, 0x05]).unwrap_err();
        assert_eq!(err.tag_name(), Some("value"));
        assert_eq!(err.root_cause(), &BerError::UnsupportedExtendedTag(0x1F));
    }

    #[test]
    fn test_extended_number_rejected_on_encode() {
        let tag = integer("value", 1).explicit(BerTagClass::ContextSpecific, 31);
        let err = tag.encode().unwrap_err();
        assert_eq!(err.root_cause(), &BerError::UnsupportedExtendedTag(31));

        let mut tag = integer("value", 1);
        tag.meta_mut().tag_type = 31;
        assert_eq!(
            tag.encode().unwrap_err().root_cause(),
            &BerError::UnsupportedExtendedTag(31)
        );
    }

    #[test]
    fn test_optional_unset_is_skipped() {
        let tag = Tag::integer("value").optional();
        assert!(!tag.must_write());
        assert_eq!(tag.encoded_length().unwrap(), 0);
        assert!(tag.encode().unwrap().is_empty());
    }

    #[test]
    fn test_mandatory_unset_writes_empty_payload() {
        let tag = Tag::octet_string("value");
        assert!(tag.must_write());
        assert_eq!(&tag.encode().unwrap()[..], &[0x04, 0x00]);
    }

    #[test]
    fn test_truncated_input_names_tag() {
        let mut tag = Tag::octet_string("payload").explicit(BerTagClass::ContextSpecific, 0);
        let err = tag.decode(vec![0xA0, 0x05, 0x04]).unwrap_err();
        assert_eq!(err.tag_name(), Some("payload"));
        assert!(matches!(err.root_cause(), BerError::BufferUnderflow { .. }));
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let original = integer("value", 7).optional();
        let mut copy = original.deep_copy("[0]");
        assert_eq!(copy.name(), "value[0]");
        assert!(copy.meta().optional);

        copy.as_integer_mut().unwrap().set_value(8);
        assert_eq!(original.as_integer().unwrap().value(), Some(7));
    }

    #[test]
    fn test_copy_from() {
        let template = Tag::integer("template")
            .optional()
            .explicit(BerTagClass::Application, 2);
        let mut tag = integer("value", 1);
        tag.copy_from(&template);
        assert_eq!(tag.name(), "value");
        assert!(tag.meta().explicit && tag.meta().optional);
        assert_eq!(tag.meta().tag_number, 2);
        assert_eq!(tag.as_integer().unwrap().value(), Some(1));
    }

    #[test]
    fn test_long_form_length() {
        let mut tag = Tag::octet_string("blob");
        tag.as_octet_string_mut().unwrap().set_value(vec![0xAB; 300]);
        let encoded = tag.encode().unwrap();
        assert_eq!(encoded.len(), tag.encoded_length().unwrap());
        assert_eq!(&encoded[..4], &[0x04, 0x82, 0x01, 0x2C]);

        let mut decoded = Tag::octet_string("blob");
        decoded.decode(encoded).unwrap();
        assert_eq!(decoded, tag);
    }
}
