//! Schema-driven BER encoding/decoding
//!
//! This crate provides the BER identifier codec and the schema tag tree used
//! to encode and decode tag-length-value messages.
//!
//! - [`ber`]: tag classes, the single-octet identifier codec and the length
//!   width rule
//! - [`schema`]: [`Tag`] nodes and their value variants
//!
//! Extended (multi-byte) tag numbers, indefinite lengths and DER
//! canonicalisation are not supported.

pub mod ber;
pub mod schema;

pub use berschema_core::error;
pub use berschema_core::{BerError, BerResult, ByteReader, ByteWriter};

pub use ber::{BerTagClass, BerType, ber_length_width, universal};
pub use schema::{
    Any, Asn1Integer, OctetString, Sequence, SequenceOf, Tag, TagContent, TagKind, TagMeta,
};
