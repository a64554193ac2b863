use std::fmt;

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::ReadExt;
use kensa_der::{Reader, Tag, Tlv};
use serde::Serialize;

use super::error;
use super::{ExtensionValue, StandardExtension};
use crate::OidName;

/*
RFC 5280 Section 4.2.1.9
BasicConstraints ::= SEQUENCE {
    cA                      BOOLEAN DEFAULT FALSE,
    pathLenConstraint       INTEGER (0..MAX) OPTIONAL
}
*/

/// Basic Constraints extension ([RFC 5280 Section 4.2.1.9](https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.1.9)).
///
/// Identifies whether the subject of the certificate is a CA and the maximum
/// depth of valid certification paths that include this certificate.
///
/// # Fields
/// - `ca`: Whether the certified public key may be used to verify certificate signatures.
///   An absent `cA` field decodes as `false`.
/// - `path_len_constraint`: Maximum number of non-self-issued intermediate certificates
///   that may follow this certificate in a valid certification path
///
/// # Example
/// ```no_run
/// use kensa_x509::extensions::BasicConstraints;
///
/// let der = std::fs::read("cert.der").unwrap();
/// let cert = kensa_x509::parse_certificate(&der).unwrap();
/// if let Some(bc) = cert.extension::<BasicConstraints>() {
///     if bc.ca {
///         println!("This is a CA certificate");
///         if let Some(pathlen) = bc.path_len_constraint {
///             println!("Maximum path length: {}", pathlen);
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicConstraints {
    /// Whether this certificate represents a CA
    pub ca: bool,
    /// Optional maximum path length for certificate chains
    pub path_len_constraint: Option<u32>,
}

impl StandardExtension for BasicConstraints {
    /// OID for BasicConstraints extension (2.5.29.19)
    const OID: &'static str = "2.5.29.19";

    fn parse(reader: &mut Reader<'_>) -> error::Result<Self> {
        reader.expect(Tag::SEQUENCE)?.decode()
    }

    fn extract(value: &ExtensionValue) -> Option<&Self> {
        match value {
            ExtensionValue::BasicConstraints(bc) => Some(bc),
            _ => None,
        }
    }
}

impl<'a> DecodableFrom<Tlv<'a>> for BasicConstraints {}

impl<'a> Decoder<Tlv<'a>, BasicConstraints> for Tlv<'a> {
    type Error = error::Error;

    fn decode(&self) -> Result<BasicConstraints, Self::Error> {
        let mut reader = self.reader();
        let ca = match reader.peek_tag()? {
            Some(Tag::BOOLEAN) => reader.read_boolean()?,
            _ => false,
        };
        let path_len_constraint = match reader.peek_tag()? {
            Some(Tag::INTEGER) => Some(
                reader
                    .read_integer()?
                    .to_u32()
                    .ok_or(error::Error::PathLenConstraintOutOfRange)?,
            ),
            _ => None,
        };
        reader.finish()?;

        Ok(BasicConstraints {
            ca,
            path_len_constraint,
        })
    }
}

impl OidName for BasicConstraints {
    fn oid_name(&self) -> Option<&'static str> {
        Some("basicConstraints")
    }
}

impl fmt::Display for BasicConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ca {
            write!(f, "                CA:TRUE")?;
            if let Some(pathlen) = self.path_len_constraint {
                writeln!(f, ", pathlen:{}", pathlen)
            } else {
                writeln!(f)
            }
        } else {
            writeln!(f, "                CA:FALSE")
        }
    }
}
