//! Schema trees of BER tags
//!
//! A schema is assembled in code from [`Tag`] nodes. Each tag carries its
//! [`TagMeta`] (name, optionality, explicit wrapper, universal type) and one
//! of the value variants in [`TagKind`]:
//!
//! | variant         | universal type | value |
//! |-----------------|----------------|-------|
//! | [`Any`]         | any            | raw payload bytes |
//! | [`Asn1Integer`] | INTEGER (2)    | `i64`, at most 8 bytes |
//! | [`OctetString`] | OCTET STRING (4) | bytes |
//! | [`Sequence`]    | SEQUENCE (16)  | fixed list of child tags |
//! | [`SequenceOf`]  | SEQUENCE (16)  | elements copied from a prototype |
//!
//! Encoding computes lengths bottom-up and writes top-down, checking at every
//! tag that the payload writer produced exactly the predicted number of bytes.
//! Decoding validates each identifier against the schema before reading the
//! payload.
//!
//! # Example
//!
//! ```
//! use berschema_asn1::schema::Tag;
//!
//! # fn main() -> berschema_asn1::BerResult<()> {
//! let mut message = Tag::sequence(
//!     "message",
//!     vec![Tag::integer("a"), Tag::octet_string("b").optional()],
//! );
//! if let Some(a) = message
//!     .as_sequence_mut()
//!     .and_then(|sequence| sequence.child_mut("a"))
//!     .and_then(Tag::as_integer_mut)
//! {
//!     a.set_value(300);
//! }
//! assert_eq!(&message.encode()?[..], &[0x30, 0x04, 0x02, 0x02, 0x01, 0x2C]);
//! # Ok(())
//! # }
//! ```

pub mod any;
pub mod integer;
pub mod meta;
pub mod octet_string;
pub mod sequence;
pub mod sequence_of;
pub mod tag;

pub use any::Any;
pub use integer::{Asn1Integer, MAX_INTEGER_WIDTH, encoded_width};
pub use meta::TagMeta;
pub use octet_string::OctetString;
pub use sequence::Sequence;
pub use sequence_of::SequenceOf;
pub use tag::{Tag, TagContent, TagKind};
