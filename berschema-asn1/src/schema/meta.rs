//! Schema metadata carried by every tag

use crate::ber::{BerTagClass, BerType};
use crate::error::BerResult;
use serde::{Deserialize, Serialize};

/// Schema metadata of a [`Tag`](super::Tag)
///
/// `tag_type` is used when the tag is written implicitly; `tag_class` and
/// `tag_number` describe the outer wrapper and are only used when `explicit`
/// is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMeta {
    /// Diagnostic label, never encoded
    pub name: String,
    /// An optional tag without a value is neither written nor required on decode
    pub optional: bool,
    /// Constructed flag of the intrinsic (implicit) encoding
    pub constructed: bool,
    /// Wrap the intrinsic encoding in an outer `tag_class`/`tag_number` element
    pub explicit: bool,
    pub tag_class: BerTagClass,
    pub tag_number: u8,
    /// Universal type number of the intrinsic encoding
    pub tag_type: u8,
}

impl TagMeta {
    /// Create metadata for a mandatory, implicitly encoded tag
    pub fn new(name: impl Into<String>, tag_type: u8, constructed: bool) -> Self {
        Self {
            name: name.into(),
            optional: false,
            constructed,
            explicit: false,
            tag_class: BerTagClass::ContextSpecific,
            tag_number: 0,
            tag_type,
        }
    }

    /// Copy the encoding attributes of `other`, keeping this tag's name
    pub fn copy_from(&mut self, other: &TagMeta) {
        self.constructed = other.constructed;
        self.explicit = other.explicit;
        self.optional = other.optional;
        self.tag_class = other.tag_class;
        self.tag_number = other.tag_number;
    }

    /// Identifier of the explicit wrapper (always constructed)
    pub fn outer_identifier(&self) -> BerResult<BerType> {
        BerType::new(self.tag_class, true, self.tag_number)
    }

    /// Identifier of the intrinsic encoding
    pub fn inner_identifier(&self) -> BerResult<BerType> {
        BerType::universal(self.constructed, self.tag_type)
    }
}
