use thiserror::Error;

use crate::Tag;

/// Errors raised while tokenizing DER input.
///
/// Every variant carries the absolute byte offset of the element header
/// that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The declared length (or the header itself) runs past the end of the input.
    #[error("truncated input at offset {offset}: {needed} bytes required, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("invalid length at offset {offset}: {reason}")]
    InvalidLength { offset: usize, reason: LengthError },

    /// High-tag-number form that is not minimal or does not fit in 32 bits.
    #[error("invalid tag at offset {offset}")]
    InvalidTag { offset: usize },

    #[error("unexpected tag at offset {offset}: expected {expected}, found {found}")]
    UnexpectedTag {
        offset: usize,
        expected: Tag,
        found: Tag,
    },

    #[error("missing element at offset {offset}: expected {expected}")]
    MissingElement { offset: usize, expected: Tag },

    #[error("trailing data at offset {offset}: {remaining} bytes left")]
    TrailingData { offset: usize, remaining: usize },
}

impl Error {
    pub fn offset(&self) -> usize {
        match self {
            Error::Truncated { offset, .. }
            | Error::InvalidLength { offset, .. }
            | Error::InvalidTag { offset }
            | Error::UnexpectedTag { offset, .. }
            | Error::MissingElement { offset, .. }
            | Error::TrailingData { offset, .. } => *offset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LengthError {
    #[error("indefinite length is not allowed in DER")]
    Indefinite,
    #[error("reserved length octet 0xFF")]
    Reserved,
    #[error("long form uses {0} length octets")]
    TooLong(usize),
    #[error("length is not minimally encoded")]
    NonMinimal,
}
