use std::borrow::Cow;
use std::str::FromStr;

use kensa::decoder::Decoder;

use crate::error::Error;
use crate::{Label, Pem};

const BEGIN_MARKER: &[u8] = b"-----BEGIN ";
const BEGIN_CERTIFICATE: &str = "-----BEGIN CERTIFICATE-----";
const END_CERTIFICATE: &str = "-----END CERTIFICATE-----";

// identifier octet of a DER SEQUENCE
const DER_SEQUENCE: u8 = 0x30;

/// Returns DER bytes for a certificate given either PEM or DER input.
///
/// Input that starts with a DER SEQUENCE, or carries no PEM boundary at all,
/// is returned unchanged. Otherwise the first `CERTIFICATE` block is located
/// (text before it is ignored) and its base64 body is decoded.
pub fn unwrap_certificate(input: &[u8]) -> Result<Cow<'_, [u8]>, Error> {
    if input.first() == Some(&DER_SEQUENCE)
        || !input
            .windows(BEGIN_MARKER.len())
            .any(|w| w == BEGIN_MARKER)
    {
        return Ok(Cow::Borrowed(input));
    }

    let text = std::str::from_utf8(input).map_err(|_| Error::InvalidEncoding)?;
    let start = text.find(BEGIN_CERTIFICATE).ok_or(Error::InvalidLabel)?;
    let block = &text[start..];
    let end = block
        .find(END_CERTIFICATE)
        .ok_or(Error::MissingPostEncapsulationBoundary)?;

    let pem = Pem::from_str(&block[..end + END_CERTIFICATE.len()])?;
    if pem.label() != Label::Certificate {
        return Err(Error::LabelMissMatch);
    }
    let der: Vec<u8> = pem.decode()?;
    log::debug!("unwrapped PEM certificate into {} DER bytes", der.len());
    Ok(Cow::Owned(der))
}
