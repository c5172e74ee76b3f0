use thiserror::Error;

/// Main error type for BER schema encoding and decoding
///
/// Every variant is terminal: the encode or decode call that raised it is
/// aborted and no partial message is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BerError {
    #[error("Extended tag numbers are not supported: {0}")]
    UnsupportedExtendedTag(u8),

    #[error("Tag '{name}': unexpected identifier 0x{identifier:02X}")]
    TypeMismatch { name: String, identifier: u8 },

    #[error("Tag '{name}': integer length {length} exceeds 8 bytes")]
    IntegerTooWide { name: String, length: usize },

    #[error("Tag '{name}': octet string length {length} exceeds remaining {remaining} bytes")]
    OctetStringTooLong {
        name: String,
        length: usize,
        remaining: usize,
    },

    #[error("Tag '{name}': wrote {actual} bytes, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Encoded length overflows usize")]
    LengthOverflow,

    #[error("Buffer exhausted: need {needed} bytes, have {remaining}")]
    BufferUnderflow { needed: usize, remaining: usize },

    #[error("Invalid length encoding: {0}")]
    InvalidLength(String),

    #[error("Tag '{name}': {source}")]
    InTag {
        name: String,
        source: Box<BerError>,
    },
}

impl BerError {
    /// Attach the name of the failing tag to an error raised below the schema level
    ///
    /// Errors that already name a tag are returned unchanged, so the innermost
    /// failing tag is the one reported.
    pub fn in_tag(self, name: &str) -> Self {
        match self {
            BerError::UnsupportedExtendedTag(_)
            | BerError::LengthOverflow
            | BerError::BufferUnderflow { .. }
            | BerError::InvalidLength(_) => BerError::InTag {
                name: name.to_string(),
                source: Box::new(self),
            },
            other => other,
        }
    }

    /// Name of the tag that failed, if the error was raised inside a schema tree
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            BerError::TypeMismatch { name, .. }
            | BerError::IntegerTooWide { name, .. }
            | BerError::OctetStringTooLong { name, .. }
            | BerError::LengthMismatch { name, .. }
            | BerError::InTag { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The error with any tag context removed
    pub fn root_cause(&self) -> &BerError {
        match self {
            BerError::InTag { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type alias for BER operations
pub type BerResult<T> = Result<T, BerError>;
