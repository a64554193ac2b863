use base64::DecodeError;
use thiserror::Error;

/// Malformed PEM armor. Every variant surfaces as a format error from the
/// certificate decoder.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// No `-----BEGIN ...-----` line, or an END line before any BEGIN
    #[error("missing a pre encapsulation boundary")]
    MissingPreEncapsulationBoundary,

    /// A BEGIN line whose block never ends
    #[error("missing a post encapsulation boundary")]
    MissingPostEncapsulationBoundary,

    #[error("missing PEM data")]
    MissingData,

    /// Label outside the supported set, or a certificate was expected
    #[error("invalid label")]
    InvalidLabel,

    /// BEGIN and END carry different labels
    #[error("label doesn't match")]
    LabelMissMatch,

    #[error("invalid encapsulation boundary")]
    InvalidEncapsulationBoundary,

    /// Blank line or non-base64 character inside the body
    #[error("invalid base64line")]
    InvalidBase64Line,

    /// Text after the padded final line that is not more padding
    #[error("invalid base64finl")]
    InvalidBase64Finl,

    /// Armored input that is not valid UTF-8 text
    #[error("PEM input is not valid UTF-8")]
    InvalidEncoding,

    #[error("base64 decode: {0}")]
    Base64Decode(DecodeError),
}
