//! Core types and utilities for the berschema BER codec
//!
//! This crate provides the error type and the byte cursors shared by the
//! identifier, length and value codecs of `berschema-asn1`.

pub mod cursor;
pub mod error;

pub use cursor::{ByteReader, ByteWriter, ber_length_width};
pub use error::{BerError, BerResult};
