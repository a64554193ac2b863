//! Errors raised while decoding a certificate.
//!
//! Everything that goes wrong in the mandatory skeleton aborts the decode
//! with one of these. Problems inside an extension payload never get here;
//! they are recorded on the extension itself, see
//! [`ExtensionDecodeError`](crate::extensions::ExtensionDecodeError).

use kensa_der::LengthError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// PEM armor is present but malformed.
    #[error("invalid PEM armor: {0}")]
    Format(#[from] kensa_pem::error::Error),

    #[error("truncated input at offset {offset}: {needed} bytes required, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("invalid length at offset {offset}: {reason}")]
    InvalidLength { offset: usize, reason: LengthError },

    /// The structure does not follow the certificate schema.
    #[error("{context}: schema violation at offset {offset}: {detail}")]
    SchemaViolation {
        context: &'static str,
        offset: usize,
        detail: String,
    },

    #[error("{context}: malformed time at offset {offset}: {reason}")]
    TimeFormat {
        context: &'static str,
        offset: usize,
        reason: String,
    },

    #[error("input is {size} bytes, the limit is {limit}")]
    InputTooLarge { size: usize, limit: usize },
}

impl Error {
    pub(crate) fn schema(context: &'static str, offset: usize, detail: impl Into<String>) -> Self {
        Error::SchemaViolation {
            context,
            offset,
            detail: detail.into(),
        }
    }

    /// Byte offset into the DER input, when the error has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Truncated { offset, .. }
            | Error::InvalidLength { offset, .. }
            | Error::SchemaViolation { offset, .. }
            | Error::TimeFormat { offset, .. } => Some(*offset),
            Error::Format(_) | Error::InputTooLarge { .. } => None,
        }
    }

    fn classify(context: &'static str, err: kensa_asn1::Error) -> Self {
        use kensa_asn1::Error as Asn1;
        use kensa_der::Error as Der;

        match err {
            Asn1::Der(Der::Truncated {
                offset,
                needed,
                available,
            }) => Error::Truncated {
                offset,
                needed,
                available,
            },
            Asn1::Der(Der::InvalidLength { offset, reason }) => {
                Error::InvalidLength { offset, reason }
            }
            Asn1::InvalidTime {
                offset,
                kind,
                reason,
            } => Error::TimeFormat {
                context,
                offset,
                reason: format!("{}: {}", kind, reason),
            },
            Asn1::NotATime { offset, found } => Error::TimeFormat {
                context,
                offset,
                reason: format!("expected UTCTime or GeneralizedTime, found {}", found),
            },
            other => Error::SchemaViolation {
                context,
                offset: other.offset().unwrap_or_default(),
                detail: other.to_string(),
            },
        }
    }
}

/// Names the part of the certificate a lower-level failure happened in.
pub(crate) trait Context<T> {
    fn context(self, context: &'static str) -> Result<T>;
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: Into<kensa_asn1::Error>,
{
    fn context(self, context: &'static str) -> Result<T> {
        self.map_err(|e| Error::classify(context, e.into()))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
