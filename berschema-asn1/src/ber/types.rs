//! BER identifier octet types (tag class, identifier)

use crate::error::{BerError, BerResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag number reserved for the extended (multi-byte) identifier form
pub const EXTENDED_TAG_NUMBER: u8 = 0x1F;

/// Universal class type numbers used by the schema variants
pub mod universal {
    pub const BOOLEAN: u8 = 1;
    pub const INTEGER: u8 = 2;
    pub const OCTET_STRING: u8 = 4;
    pub const NULL: u8 = 5;
    pub const SEQUENCE: u8 = 16;
}

/// BER Tag Class
///
/// ASN.1 defines four tag classes:
/// - **Universal**: Standard ASN.1 types (INTEGER, OCTET STRING, etc.)
/// - **Application**: Application-specific types
/// - **Context-specific**: Context-dependent types (used in SEQUENCE/SET)
/// - **Private**: Private/implementation-specific types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BerTagClass {
    /// Universal class (00)
    Universal = 0,
    /// Application class (01)
    Application = 1,
    /// Context-specific class (10)
    ContextSpecific = 2,
    /// Private class (11)
    Private = 3,
}

impl BerTagClass {
    /// Get tag class from the top two bits of an identifier octet
    pub fn from_bits(byte: u8) -> Self {
        match (byte >> 6) & 0x03 {
            0 => BerTagClass::Universal,
            1 => BerTagClass::Application,
            2 => BerTagClass::ContextSpecific,
            _ => BerTagClass::Private,
        }
    }

    /// Convert tag class to bits (for encoding)
    pub fn to_bits(self) -> u8 {
        (self as u8) << 6
    }
}

/// BER identifier octet
///
/// Only the single-octet form is supported:
///
/// ```text
/// Bits: 8 7 6 5 4 3 2 1
///       C C P T T T T T
/// ```
///
/// `CC` is the class, `P` the constructed flag and `TTTTT` the type or tag
/// number in `0..=30`. The pattern `11111` introduces the extended form and is
/// always rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BerType {
    class: BerTagClass,
    constructed: bool,
    number: u8,
}

impl BerType {
    /// Create a new identifier
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedExtendedTag` if `number` is 31 or larger.
    pub fn new(class: BerTagClass, constructed: bool, number: u8) -> BerResult<Self> {
        if number >= EXTENDED_TAG_NUMBER {
            return Err(BerError::UnsupportedExtendedTag(number));
        }
        Ok(Self {
            class,
            constructed,
            number,
        })
    }

    /// Create a Universal class identifier
    pub fn universal(constructed: bool, number: u8) -> BerResult<Self> {
        Self::new(BerTagClass::Universal, constructed, number)
    }

    /// Create a Context-specific class identifier
    pub fn context_specific(constructed: bool, number: u8) -> BerResult<Self> {
        Self::new(BerTagClass::ContextSpecific, constructed, number)
    }

    pub fn class(&self) -> BerTagClass {
        self.class
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Type (Universal class) or tag number (other classes)
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Encode identifier to its octet
    pub fn encode(&self) -> u8 {
        let constructed_bit = if self.constructed { 0x20 } else { 0x00 };
        self.class.to_bits() | constructed_bit | self.number
    }

    /// Decode identifier from an octet
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedExtendedTag` if the low five bits are all set.
    pub fn decode(byte: u8) -> BerResult<Self> {
        let number = byte & 0x1F;
        if number == EXTENDED_TAG_NUMBER {
            return Err(BerError::UnsupportedExtendedTag(byte));
        }
        Ok(Self {
            class: BerTagClass::from_bits(byte),
            constructed: (byte & 0x20) != 0,
            number,
        })
    }
}

impl fmt::Display for BerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = if self.constructed {
            "constructed"
        } else {
            "primitive"
        };
        write!(f, "[{:?} {}] {}", self.class, self.number, form)
    }
}
