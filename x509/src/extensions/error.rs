//! Extension-specific error types

use kensa_der::Tag;
use thiserror::Error;

/// Context for where an extension error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    BasicConstraints,
    KeyUsage,
    SubjectKeyIdentifier,
    AuthorityKeyIdentifier,
    SubjectAltName,
    IssuerAltName,
    GeneralName,
    ExtendedKeyUsage,
    AuthorityInfoAccess,
    CRLDistributionPoints,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BasicConstraints => write!(f, "BasicConstraints"),
            Self::KeyUsage => write!(f, "KeyUsage"),
            Self::SubjectKeyIdentifier => write!(f, "SubjectKeyIdentifier"),
            Self::AuthorityKeyIdentifier => write!(f, "AuthorityKeyIdentifier"),
            Self::SubjectAltName => write!(f, "SubjectAltName"),
            Self::IssuerAltName => write!(f, "IssuerAltName"),
            Self::GeneralName => write!(f, "GeneralName"),
            Self::ExtendedKeyUsage => write!(f, "ExtendedKeyUsage"),
            Self::AuthorityInfoAccess => write!(f, "AuthorityInfoAccess"),
            Self::CRLDistributionPoints => write!(f, "CRLDistributionPoints"),
        }
    }
}

/// Extension parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{0}: empty sequence")]
    EmptySequence(Kind),

    // BasicConstraints specific errors
    #[error("BasicConstraints: pathLenConstraint out of range for u32")]
    PathLenConstraintOutOfRange,

    // GeneralName specific errors
    #[error("GeneralName: unknown tag {0}")]
    UnknownGeneralNameTag(Tag),

    #[error("GeneralName: IA5String must be valid ASCII")]
    GeneralNameInvalidAscii,

    #[error("GeneralName: iPAddress must be 4 or 16 bytes, got {0}")]
    InvalidIpAddressLength(usize),

    // KeyUsage specific errors
    #[error("KeyUsage: no bits set")]
    KeyUsageEmpty,

    /// Invalid ASN.1 structure
    #[error("invalid ASN.1: {0}")]
    InvalidAsn1(#[from] kensa_asn1::Error),
}

impl From<kensa_der::Error> for Error {
    fn from(err: kensa_der::Error) -> Self {
        Error::InvalidAsn1(err.into())
    }
}

/// Result type for extension operations
pub type Result<T> = std::result::Result<T, Error>;
