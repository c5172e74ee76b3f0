//! SEQUENCE OF tag with homogeneous elements

use super::meta::TagMeta;
use super::sequence::total_encoded_length;
use super::tag::{Tag, TagContent};
use crate::ber::BerType;
use crate::error::BerResult;
use berschema_core::{ByteReader, ByteWriter};
use std::sync::Arc;

/// Variable-length list of elements cloned from one prototype
///
/// The prototype is schema only: it is shared read-only between copies of
/// this tag and never holds a value. Each element is an independent deep copy
/// named `prototype_name[index]`.
#[derive(Debug, PartialEq)]
pub struct SequenceOf {
    prototype: Arc<Tag>,
    elements: Vec<Tag>,
}

impl SequenceOf {
    pub fn new(prototype: Tag) -> Self {
        Self {
            prototype: Arc::new(prototype),
            elements: Vec::new(),
        }
    }

    pub fn prototype(&self) -> &Tag {
        &self.prototype
    }

    pub fn elements(&self) -> &[Tag] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [Tag] {
        &mut self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append a fresh copy of the prototype and return it for assignment
    pub fn add_element(&mut self) -> &mut Tag {
        let index = self.elements.len();
        let element = self.new_element();
        self.elements.push(element);
        &mut self.elements[index]
    }

    fn new_element(&self) -> Tag {
        self.prototype
            .deep_copy(&format!("[{}]", self.elements.len()))
    }

    /// Decode elements until `reader` is exhausted or an end-of-contents marker
    ///
    /// Any previous elements are discarded. Two zero bytes stop the scan and
    /// are left in `reader`. An element that itself starts with `00 00` cannot
    /// be told apart from the marker.
    pub fn read_elements(&mut self, reader: &mut ByteReader) -> BerResult<()> {
        self.elements.clear();
        while reader.has_remaining() {
            if reader.peek_u8(0) == Some(0x00) && reader.peek_u8(1) == Some(0x00) {
                log::debug!(
                    "{}: end-of-contents after {} elements",
                    self.prototype.name(),
                    self.elements.len()
                );
                break;
            }
            let mut element = self.new_element();
            element.read_tag(reader)?;
            self.elements.push(element);
        }
        Ok(())
    }
}

impl TagContent for SequenceOf {
    fn is_value_set(&self) -> bool {
        !self.elements.is_empty()
    }

    fn value_length(&self) -> BerResult<usize> {
        total_encoded_length(&self.elements)
    }

    fn write_value(&self, writer: &mut ByteWriter) -> BerResult<()> {
        for element in &self.elements {
            element.write_tag(writer)?;
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
        let mut content = reader.read_bytes(length)?;
        self.read_elements(&mut content)
    }

    fn clear_value(&mut self) {
        self.elements.clear();
    }

    fn deep_copy(&self) -> Self {
        Self {
            prototype: Arc::clone(&self.prototype),
            elements: self
                .elements
                .iter()
                .map(|element| element.deep_copy(""))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::BerTagClass;
    use crate::error::BerError;

    fn numbers(values: &[i64]) -> Tag {
        let mut tag = Tag::sequence_of("numbers", Tag::integer("n"));
        let list = tag.as_sequence_of_mut().unwrap();
        for &value in values {
            list.add_element().as_integer_mut().unwrap().set_value(value);
        }
        tag
    }

    fn values(tag: &Tag) -> Vec<Option<i64>> {
        tag.as_sequence_of()
            .unwrap()
            .elements()
            .iter()
            .map(|element| element.as_integer().unwrap().value())
            .collect()
    }

    #[test]
    fn test_sequence_of_encoding() {
        let tag = numbers(&[1, 255]);
        assert_eq!(
            &tag.encode().unwrap()[..],
            &[0x30, 0x07, 0x02, 0x01, 0x01, 0x02, 0x02, 0x00, 0xFF]
        );
    }

    #[test]
    fn test_sequence_of_round_trip() {
        let source = numbers(&[-1, 0, 300, i64::MAX]);
        let encoded = source.encode().unwrap();

        let mut decoded = Tag::sequence_of("numbers", Tag::integer("n"));
        decoded.decode(encoded).unwrap();
        assert_eq!(values(&decoded), vec![Some(-1), Some(0), Some(300), Some(i64::MAX)]);
        assert_eq!(decoded, source);
    }

    #[test]
    fn test_element_names() {
        let tag = numbers(&[5, 6, 7]);
        let names: Vec<&str> = tag
            .as_sequence_of()
            .unwrap()
            .elements()
            .iter()
            .map(Tag::name)
            .collect();
        assert_eq!(names, vec!["n[0]", "n[1]", "n[2]"]);
        assert_eq!(tag.as_sequence_of().unwrap().prototype().name(), "n");
    }

    #[test]
    fn test_stops_before_end_of_contents() {
        let mut reader = ByteReader::new(vec![
            0x02, 0x01, 0x01, 0x02, 0x01, 0x02, 0x02, 0x01, 0x03, 0x00, 0x00, 0x02, 0x01, 0x04,
        ]);
        let mut list = SequenceOf::new(Tag::integer("n"));
        list.read_elements(&mut reader).unwrap();

        assert_eq!(list.len(), 3);
        assert_eq!(reader.position(), 9);
        assert_eq!(reader.as_bytes(), &[0x00, 0x00, 0x02, 0x01, 0x04]);
    }

    #[test]
    fn test_single_zero_byte_is_not_a_marker() {
        let mut reader = ByteReader::new(vec![0x02, 0x01, 0x01, 0x00]);
        let mut list = SequenceOf::new(Tag::integer("n"));
        let err = list.read_elements(&mut reader).unwrap_err();
        assert_eq!(err.tag_name(), Some("n[1]"));
    }

    #[test]
    fn test_read_discards_previous_elements() {
        let mut tag = numbers(&[9, 9, 9]);
        tag.decode(vec![0x30, 0x03, 0x02, 0x01, 0x04]).unwrap();
        assert_eq!(values(&tag), vec![Some(4)]);
    }

    #[test]
    fn test_empty_sequence_of() {
        let mandatory = Tag::sequence_of("list", Tag::integer("n"));
        assert!(!mandatory.is_value_set());
        assert_eq!(&mandatory.encode().unwrap()[..], &[0x30, 0x00]);

        let optional = Tag::sequence_of("list", Tag::integer("n")).optional();
        assert!(optional.encode().unwrap().is_empty());

        let mut decoded = numbers(&[1]);
        decoded.decode(vec![0x30, 0x00]).unwrap();
        assert!(decoded.as_sequence_of().unwrap().is_empty());
    }

    #[test]
    fn test_element_type_mismatch() {
        let mut tag = Tag::sequence_of("numbers", Tag::integer("n"));
        let err = tag
            .decode(vec![0x30, 0x06, 0x02, 0x01, 0x01, 0x04, 0x01, 0x01])
            .unwrap_err();
        assert_eq!(
            err,
            BerError::TypeMismatch {
                name: "n[1]".to_string(),
                identifier: 0x04
            }
        );
    }

    #[test]
    fn test_explicit_elements() {
        let prototype = Tag::octet_string("item").explicit(BerTagClass::ContextSpecific, 2);
        let mut tag = Tag::sequence_of("items", prototype);
        {
            let list = tag.as_sequence_of_mut().unwrap();
            list.add_element().as_octet_string_mut().unwrap().set_value(vec![0x01]);
            list.add_element().as_octet_string_mut().unwrap().set_value(vec![0x02, 0x03]);
        }
        let encoded = tag.encode().unwrap();
        assert_eq!(
            &encoded[..],
            &[
                0x30, 0x0B, 0xA2, 0x03, 0x04, 0x01, 0x01, 0xA2, 0x04, 0x04, 0x02, 0x02, 0x03
            ]
        );

        let mut decoded = Tag::sequence_of(
            "items",
            Tag::octet_string("item").explicit(BerTagClass::ContextSpecific, 2),
        );
        decoded.decode(encoded).unwrap();
        assert_eq!(decoded, tag);
    }

    #[test]
    fn test_deep_copy_shares_prototype() {
        let tag = numbers(&[1, 2]);
        let mut copy = tag.deep_copy("");
        let (original, copied) = (tag.as_sequence_of().unwrap(), copy.as_sequence_of().unwrap());
        assert!(Arc::ptr_eq(&original.prototype, &copied.prototype));
        assert_eq!(copied.len(), 2);

        copy.as_sequence_of_mut().unwrap().elements_mut()[0]
            .as_integer_mut()
            .unwrap()
            .set_value(100);
        assert_eq!(values(&tag), vec![Some(1), Some(2)]);
        assert_eq!(values(&copy), vec![Some(100), Some(2)]);
    }

    #[test]
    fn test_sequence_of_sequences() {
        let prototype = Tag::sequence(
            "entry",
            vec![Tag::integer("key"), Tag::octet_string("value").optional()],
        );
        let mut tag = Tag::sequence_of("entries", prototype);
        {
            let list = tag.as_sequence_of_mut().unwrap();
            for key in 0..3 {
                let entry = list.add_element().as_sequence_mut().unwrap();
                entry.child_mut("key").unwrap().as_integer_mut().unwrap().set_value(key);
                if key == 1 {
                    entry
                        .child_mut("value")
                        .unwrap()
                        .as_octet_string_mut()
                        .unwrap()
                        .set_value(&b"one"[..]);
                }
            }
        }

        let encoded = tag.encode().unwrap();
        assert_eq!(encoded.len(), tag.encoded_length().unwrap());

        let mut decoded = Tag::sequence_of(
            "entries",
            Tag::sequence(
                "entry",
                vec![Tag::integer("key"), Tag::octet_string("value").optional()],
            ),
        );
        decoded.decode(encoded).unwrap();
        assert_eq!(decoded, tag);
    }
}
