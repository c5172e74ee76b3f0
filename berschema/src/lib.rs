//! berschema - schema-driven BER tag-length-value codec
//!
//! Messages are described by hand-assembled trees of schema tags and
//! encoded to / decoded from BER (ITU-T X.690) byte streams.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `berschema-core`: error type and byte cursors
//! - `berschema-asn1`: identifier codec and schema tags
//!
//! # Supported Types
//!
//! - Raw payloads of any type ([`Any`])
//! - INTEGER up to 8 bytes ([`Asn1Integer`])
//! - OCTET STRING ([`OctetString`])
//! - SEQUENCE ([`Sequence`]) and SEQUENCE OF ([`SequenceOf`])
//!
//! Each tag can be optional and can be wrapped in an explicit
//! class/number element.
//!
//! # Usage
//!
//! ```
//! use berschema::{BerTagClass, Tag};
//!
//! # fn main() -> berschema::BerResult<()> {
//! let schema = || {
//!     Tag::sequence(
//!         "request",
//!         vec![
//!             Tag::integer("id"),
//!             Tag::sequence_of("items", Tag::octet_string("item"))
//!                 .explicit(BerTagClass::ContextSpecific, 0),
//!         ],
//!     )
//! };
//!
//! let mut request = schema();
//! if let Some(sequence) = request.as_sequence_mut() {
//!     if let Some(id) = sequence.child_mut("id").and_then(Tag::as_integer_mut) {
//!         id.set_value(7);
//!     }
//!     if let Some(items) = sequence.child_mut("items").and_then(Tag::as_sequence_of_mut) {
//!         if let Some(item) = items.add_element().as_octet_string_mut() {
//!             item.set_value(&b"abc"[..]);
//!         }
//!     }
//! }
//! let bytes = request.encode()?;
//!
//! let mut decoded = schema();
//! decoded.decode(bytes)?;
//! assert_eq!(decoded, request);
//! # Ok(())
//! # }
//! ```

// Re-export core types
pub use berschema_core::{BerError, BerResult, ByteReader, ByteWriter, ber_length_width};
pub use bytes::Bytes;

// Re-export identifier codec
pub use berschema_asn1::ber::{BerTagClass, BerType, universal};

// Re-export schema tags
pub use berschema_asn1::schema::{
    Any, Asn1Integer, OctetString, Sequence, SequenceOf, Tag, TagContent, TagKind, TagMeta,
};

pub mod schema {
    pub use berschema_asn1::schema::*;
}
