//! SEQUENCE tag with a fixed list of heterogeneous children

use super::meta::TagMeta;
use super::tag::{Tag, TagContent};
use crate::ber::BerType;
use crate::error::{BerError, BerResult};
use berschema_core::{ByteReader, ByteWriter};

/// Ordered, fixed-arity list of child tags
///
/// Children are written and read strictly in declaration order. On decode an
/// optional child whose identifier is not next in the content is left unset.
#[derive(Debug, Default, PartialEq)]
pub struct Sequence {
    children: Vec<Tag>,
}

impl Sequence {
    pub fn new(children: Vec<Tag>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[Tag] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Tag] {
        &mut self.children
    }

    /// Find a child by name
    pub fn child(&self, name: &str) -> Option<&Tag> {
        self.children.iter().find(|child| child.name() == name)
    }

    /// Find a child by name for assignment
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Tag> {
        self.children.iter_mut().find(|child| child.name() == name)
    }
}

/// Sum of the full encoded lengths of `tags`
pub(crate) fn total_encoded_length(tags: &[Tag]) -> BerResult<usize> {
    tags.iter().try_fold(0usize, |total, tag| {
        total
            .checked_add(tag.encoded_length()?)
            .ok_or(BerError::LengthOverflow)
    })
}

impl TagContent for Sequence {
    fn is_value_set(&self) -> bool {
        self.children.iter().any(Tag::is_value_set)
    }

    fn value_length(&self) -> BerResult<usize> {
        total_encoded_length(&self.children)
    }

    fn write_value(&self, writer: &mut ByteWriter) -> BerResult<()> {
        for child in &self.children {
            child.write_tag(writer)?;
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
        let mut content = reader.read_bytes(length)?;

        for child in &mut self.children {
            if child.meta().optional && !child.is_next(&content) {
                log::trace!("{}: optional tag absent", child.name());
                child.clear_value();
                continue;
            }
            child.read_tag(&mut content)?;
        }

        if content.has_remaining() {
            log::debug!(
                "{}: {} unread bytes after last child",
                meta.name,
                content.remaining()
            );
        }
        Ok(())
    }

    fn clear_value(&mut self) {
        self.children.iter_mut().for_each(Tag::clear_value);
    }

    fn deep_copy(&self) -> Self {
        Self {
            children: self
                .children
                .iter()
                .map(|child| child.deep_copy(""))
                .collect(),
        }
    }
}
