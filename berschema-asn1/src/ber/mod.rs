//! BER (Basic Encoding Rules) identifier and length primitives
//!
//! Each ASN.1 value is encoded as a TLV (Tag-Length-Value) triplet:
//!
//! ```text
//! [Identifier] [Length] [Value]
//! ```
//!
//! ## Identifier
//!
//! A single octet holding the class (2 bits), the constructed flag (1 bit)
//! and the type or tag number (5 bits, `0..=30`). Extended multi-byte tag
//! numbers are not supported.
//!
//! ## Length
//!
//! Definite form only:
//! - **Short form** (1 byte): for lengths 0-127
//! - **Long form**: `0x80 | n` followed by `n` big-endian length bytes
//!
//! The byte-level length codec lives on the cursors in `berschema-core`;
//! [`ber_length_width`] predicts its size before anything is written.

pub mod types;

pub use berschema_core::ber_length_width;
pub use types::{BerTagClass, BerType, EXTENDED_TAG_NUMBER, universal};
