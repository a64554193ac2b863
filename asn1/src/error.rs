//! Error types for ASN.1 primitive decoding.

use kensa_der::Tag;
use thiserror::Error;

use crate::string::StringKind;
use crate::time::{TimeError, TimeKind};

/// Errors that can occur while decoding ASN.1 primitives.
///
/// Variants raised from element content carry the offset of the element's
/// header in the input buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Der(#[from] kensa_der::Error),

    // Boolean errors
    #[error("BOOLEAN at offset {offset}: invalid encoding")]
    InvalidBoolean { offset: usize },

    #[error("NULL at offset {offset}: content must be empty")]
    InvalidNull { offset: usize },

    // Integer errors
    #[error("INTEGER at offset {offset}: no data")]
    IntegerNoData { offset: usize },

    // ObjectIdentifier errors
    #[error("OBJECT IDENTIFIER at offset {offset}: no data")]
    ObjectIdentifierNoData { offset: usize },
    #[error("OBJECT IDENTIFIER at offset {offset}: incomplete encoding")]
    ObjectIdentifierIncompleteEncoding { offset: usize },
    #[error("OBJECT IDENTIFIER at offset {offset}: sub-identifier is not minimally encoded")]
    ObjectIdentifierNonMinimal { offset: usize },
    #[error("OBJECT IDENTIFIER at offset {offset}: component does not fit in 64 bits")]
    ObjectIdentifierOverflow { offset: usize },
    #[error("OBJECT IDENTIFIER: too few components (need at least 2)")]
    ObjectIdentifierTooFewComponents,
    #[error("OBJECT IDENTIFIER: invalid component '{0}'")]
    ObjectIdentifierInvalidComponent(String),

    // BitString errors
    #[error("BIT STRING at offset {offset}: no data")]
    BitStringNoData { offset: usize },
    #[error("BIT STRING at offset {offset}: unused bits {unused} out of range")]
    BitStringUnusedBitsOutOfRange { offset: usize, unused: u8 },

    // String errors
    #[error("{kind} at offset {offset}: invalid encoding")]
    InvalidString { offset: usize, kind: StringKind },
    #[error("expected a string type at offset {offset}, found {found}")]
    NotAString { offset: usize, found: Tag },

    // Time errors
    #[error("{kind} at offset {offset}: {reason}")]
    InvalidTime {
        offset: usize,
        kind: TimeKind,
        reason: TimeError,
    },
    #[error("expected UTCTime or GeneralizedTime at offset {offset}, found {found}")]
    NotATime { offset: usize, found: Tag },
}

impl Error {
    /// Byte offset of the offending element, when known.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Der(e) => Some(e.offset()),
            Error::InvalidBoolean { offset }
            | Error::InvalidNull { offset }
            | Error::IntegerNoData { offset }
            | Error::ObjectIdentifierNoData { offset }
            | Error::ObjectIdentifierIncompleteEncoding { offset }
            | Error::ObjectIdentifierNonMinimal { offset }
            | Error::ObjectIdentifierOverflow { offset }
            | Error::BitStringNoData { offset }
            | Error::BitStringUnusedBitsOutOfRange { offset, .. }
            | Error::InvalidString { offset, .. }
            | Error::NotAString { offset, .. }
            | Error::InvalidTime { offset, .. }
            | Error::NotATime { offset, .. } => Some(*offset),
            Error::ObjectIdentifierTooFewComponents | Error::ObjectIdentifierInvalidComponent(_) => {
                None
            }
        }
    }
}
