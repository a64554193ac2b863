//! X.509 v1-v3 certificate decoder.
//!
//! Accepts a certificate as DER or as PEM text and produces an immutable
//! [`Certificate`]. Structural problems in the certificate skeleton fail the
//! whole decode with an [`Error`] that names where it happened. A recognized
//! extension whose payload does not decode only marks that one extension,
//! see [`extensions::ExtensionValue::Other`].
//!
//! No signature, chain or revocation checking is done here.
//!
//! ```no_run
//! use kensa_x509::extensions::SubjectAltName;
//!
//! let bytes = std::fs::read("cert.pem").unwrap();
//! let cert = kensa_x509::parse_certificate(&bytes).unwrap();
//! println!("{}", cert.subject());
//! if let Some(san) = cert.extension::<SubjectAltName>() {
//!     for dns in san.dns_names() {
//!         println!("DNS:{}", dns);
//!     }
//! }
//! ```

#![forbid(unsafe_code)]

use log::trace;

mod algorithm;
mod certificate;
mod error;
pub mod extensions;
mod name;
mod oid_name;
mod options;
mod public_key;
mod serial_number;

pub use algorithm::{AlgorithmIdentifier, AlgorithmParameters};
pub use certificate::{Certificate, DATE_FORMAT, Validity, Version};
pub use error::{Error, Result};
pub use name::{AttributeTypeAndValue, AttributeValue, Name, RelativeDistinguishedName};
pub use oid_name::OidName;
pub use options::{DEFAULT_MAX_INPUT_SIZE, DecodeOptions};
pub use public_key::{PublicKey, SubjectPublicKeyInfo};
pub use serial_number::SerialNumber;

const DER_SEQUENCE: u8 = 0x30;

/// Decodes a PEM or DER certificate with the default options.
pub fn parse_certificate(bytes: &[u8]) -> Result<Certificate> {
    parse_certificate_with(bytes, &DecodeOptions::default())
}

/// Decodes a PEM or DER certificate.
///
/// Input starting with a SEQUENCE identifier is taken as DER, anything else
/// as text that may carry a `CERTIFICATE` PEM block. Oversized input is
/// rejected before any parsing.
pub fn parse_certificate_with(bytes: &[u8], options: &DecodeOptions) -> Result<Certificate> {
    let limit = if bytes.first() == Some(&DER_SEQUENCE) {
        options.max_input_size()
    } else {
        options.max_text_size()
    };
    if bytes.len() > limit {
        return Err(Error::InputTooLarge {
            size: bytes.len(),
            limit,
        });
    }

    let der = kensa_pem::unwrap_certificate(bytes)?;
    if der.len() > options.max_input_size() {
        return Err(Error::InputTooLarge {
            size: der.len(),
            limit: options.max_input_size(),
        });
    }
    trace!("unwrapped {} input bytes to {} DER bytes", bytes.len(), der.len());
    Certificate::from_der(&der)
}
