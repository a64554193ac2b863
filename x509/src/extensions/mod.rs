use std::fmt;

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{ObjectIdentifier, ReadExt};
use kensa_der::{Reader, Tag, Tlv};
use log::{trace, warn};
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::OidName;
use crate::error::Context;

// Submodules
mod authority_info_access;
mod authority_key_identifier;
mod basic_constraints;
mod crl_distribution_points;
pub mod error;
mod extended_key_usage;
mod general_name;
mod issuer_alt_name;
mod key_usage;
mod subject_alt_name;
mod subject_key_identifier;

// Re-export public types
pub use authority_info_access::{AccessDescription, AccessMethod, AuthorityInfoAccess};
pub use authority_key_identifier::AuthorityKeyIdentifier;
pub use basic_constraints::BasicConstraints;
pub use crl_distribution_points::{
    CRLDistributionPoints, DistributionPoint, DistributionPointName, ReasonFlags,
};
pub use extended_key_usage::{ExtendedKeyUsage, KeyPurpose};
pub use general_name::{GeneralName, OtherName};
pub use issuer_alt_name::IssuerAltName;
pub use key_usage::KeyUsage;
pub use subject_alt_name::SubjectAltName;
pub use subject_key_identifier::{KeyIdentifier, SubjectKeyIdentifier};

pub(crate) fn serialize_hex<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&hex::encode(bytes))
}

/// Trait for typed X.509 extensions.
///
/// Implementors represent one recognized extension and know how to read it
/// from the content of the extension's `extnValue` OCTET STRING.
///
/// # Example
/// ```no_run
/// use kensa_x509::extensions::BasicConstraints;
///
/// let pem = std::fs::read("cert.pem").unwrap();
/// let cert = kensa_x509::parse_certificate(&pem).unwrap();
/// if let Some(bc) = cert.extension::<BasicConstraints>() {
///     println!("CA: {}, PathLen: {:?}", bc.ca, bc.path_len_constraint);
/// }
/// ```
pub trait StandardExtension: Sized {
    /// The OID of this extension type as a string (e.g., "2.5.29.19" for BasicConstraints)
    const OID: &'static str;

    /// Reads the extension from a reader over the `extnValue` content.
    /// Anything left in the reader afterwards is rejected by the caller.
    fn parse(reader: &mut Reader<'_>) -> error::Result<Self>;

    /// Borrows `Self` out of a decoded value of the matching kind.
    fn extract(value: &ExtensionValue) -> Option<&Self>;
}

/// The closed set of extensions with a dedicated decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionKind {
    BasicConstraints,
    KeyUsage,
    ExtendedKeyUsage,
    SubjectAltName,
    IssuerAltName,
    AuthorityKeyIdentifier,
    SubjectKeyIdentifier,
    CrlDistributionPoints,
    AuthorityInfoAccess,
}

fn parse<T: StandardExtension>(reader: &mut Reader<'_>) -> error::Result<T> {
    let extension = T::parse(reader)?;
    reader.finish()?;
    Ok(extension)
}

impl ExtensionKind {
    pub const ALL: [ExtensionKind; 9] = [
        ExtensionKind::BasicConstraints,
        ExtensionKind::KeyUsage,
        ExtensionKind::ExtendedKeyUsage,
        ExtensionKind::SubjectAltName,
        ExtensionKind::IssuerAltName,
        ExtensionKind::AuthorityKeyIdentifier,
        ExtensionKind::SubjectKeyIdentifier,
        ExtensionKind::CrlDistributionPoints,
        ExtensionKind::AuthorityInfoAccess,
    ];

    pub fn from_oid(oid: &ObjectIdentifier) -> Option<ExtensionKind> {
        let kind = match oid.to_string().as_str() {
            BasicConstraints::OID => ExtensionKind::BasicConstraints,
            KeyUsage::OID => ExtensionKind::KeyUsage,
            ExtendedKeyUsage::OID => ExtensionKind::ExtendedKeyUsage,
            SubjectAltName::OID => ExtensionKind::SubjectAltName,
            IssuerAltName::OID => ExtensionKind::IssuerAltName,
            AuthorityKeyIdentifier::OID => ExtensionKind::AuthorityKeyIdentifier,
            SubjectKeyIdentifier::OID => ExtensionKind::SubjectKeyIdentifier,
            CRLDistributionPoints::OID => ExtensionKind::CrlDistributionPoints,
            AuthorityInfoAccess::OID => ExtensionKind::AuthorityInfoAccess,
            _ => return None,
        };
        Some(kind)
    }

    pub fn oid(self) -> &'static str {
        match self {
            ExtensionKind::BasicConstraints => BasicConstraints::OID,
            ExtensionKind::KeyUsage => KeyUsage::OID,
            ExtensionKind::ExtendedKeyUsage => ExtendedKeyUsage::OID,
            ExtensionKind::SubjectAltName => SubjectAltName::OID,
            ExtensionKind::IssuerAltName => IssuerAltName::OID,
            ExtensionKind::AuthorityKeyIdentifier => AuthorityKeyIdentifier::OID,
            ExtensionKind::SubjectKeyIdentifier => SubjectKeyIdentifier::OID,
            ExtensionKind::CrlDistributionPoints => CRLDistributionPoints::OID,
            ExtensionKind::AuthorityInfoAccess => AuthorityInfoAccess::OID,
        }
    }

    /// Canonical lower-camel name, also used as the serialized variant name.
    pub fn name(self) -> &'static str {
        match self {
            ExtensionKind::BasicConstraints => "basicConstraints",
            ExtensionKind::KeyUsage => "keyUsage",
            ExtensionKind::ExtendedKeyUsage => "extendedKeyUsage",
            ExtensionKind::SubjectAltName => "subjectAltName",
            ExtensionKind::IssuerAltName => "issuerAltName",
            ExtensionKind::AuthorityKeyIdentifier => "authorityKeyIdentifier",
            ExtensionKind::SubjectKeyIdentifier => "subjectKeyIdentifier",
            ExtensionKind::CrlDistributionPoints => "crlDistributionPoints",
            ExtensionKind::AuthorityInfoAccess => "authorityInfoAccess",
        }
    }

    /// Decodes the `extnValue` content. The whole reader must be consumed.
    pub fn decode(self, reader: &mut Reader<'_>) -> error::Result<ExtensionValue> {
        let value = match self {
            ExtensionKind::BasicConstraints => {
                ExtensionValue::BasicConstraints(parse(reader)?)
            }
            ExtensionKind::KeyUsage => ExtensionValue::KeyUsage(parse(reader)?),
            ExtensionKind::ExtendedKeyUsage => {
                ExtensionValue::ExtendedKeyUsage(parse(reader)?)
            }
            ExtensionKind::SubjectAltName => ExtensionValue::SubjectAltName(parse(reader)?),
            ExtensionKind::IssuerAltName => ExtensionValue::IssuerAltName(parse(reader)?),
            ExtensionKind::AuthorityKeyIdentifier => {
                ExtensionValue::AuthorityKeyIdentifier(parse(reader)?)
            }
            ExtensionKind::SubjectKeyIdentifier => {
                ExtensionValue::SubjectKeyIdentifier(parse(reader)?)
            }
            ExtensionKind::CrlDistributionPoints => {
                ExtensionValue::CrlDistributionPoints(parse(reader)?)
            }
            ExtensionKind::AuthorityInfoAccess => {
                ExtensionValue::AuthorityInfoAccess(parse(reader)?)
            }
        };
        Ok(value)
    }
}

impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A specialized decoder rejected the payload of a recognized extension.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("extension {oid}: {reason}")]
pub struct ExtensionDecodeError {
    pub oid: ObjectIdentifier,
    pub reason: String,
}

/// Decoded payload of an extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtensionValue {
    BasicConstraints(BasicConstraints),
    KeyUsage(KeyUsage),
    ExtendedKeyUsage(ExtendedKeyUsage),
    SubjectAltName(SubjectAltName),
    IssuerAltName(IssuerAltName),
    AuthorityKeyIdentifier(AuthorityKeyIdentifier),
    SubjectKeyIdentifier(SubjectKeyIdentifier),
    CrlDistributionPoints(CRLDistributionPoints),
    AuthorityInfoAccess(AuthorityInfoAccess),
    /// Unknown OID (`error` is `None`) or a recognized OID whose payload
    /// failed to decode.
    Other {
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<ExtensionDecodeError>,
    },
}

impl ExtensionValue {
    pub fn kind(&self) -> Option<ExtensionKind> {
        let kind = match self {
            ExtensionValue::BasicConstraints(_) => ExtensionKind::BasicConstraints,
            ExtensionValue::KeyUsage(_) => ExtensionKind::KeyUsage,
            ExtensionValue::ExtendedKeyUsage(_) => ExtensionKind::ExtendedKeyUsage,
            ExtensionValue::SubjectAltName(_) => ExtensionKind::SubjectAltName,
            ExtensionValue::IssuerAltName(_) => ExtensionKind::IssuerAltName,
            ExtensionValue::AuthorityKeyIdentifier(_) => ExtensionKind::AuthorityKeyIdentifier,
            ExtensionValue::SubjectKeyIdentifier(_) => ExtensionKind::SubjectKeyIdentifier,
            ExtensionValue::CrlDistributionPoints(_) => ExtensionKind::CrlDistributionPoints,
            ExtensionValue::AuthorityInfoAccess(_) => ExtensionKind::AuthorityInfoAccess,
            ExtensionValue::Other { .. } => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ExtensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionValue::BasicConstraints(ext) => write!(f, "{}", ext),
            ExtensionValue::KeyUsage(ext) => write!(f, "{}", ext),
            ExtensionValue::ExtendedKeyUsage(ext) => write!(f, "{}", ext),
            ExtensionValue::SubjectAltName(ext) => write!(f, "{}", ext),
            ExtensionValue::IssuerAltName(ext) => write!(f, "{}", ext),
            ExtensionValue::AuthorityKeyIdentifier(ext) => write!(f, "{}", ext),
            ExtensionValue::SubjectKeyIdentifier(ext) => write!(f, "{}", ext),
            ExtensionValue::CrlDistributionPoints(ext) => write!(f, "{}", ext),
            ExtensionValue::AuthorityInfoAccess(ext) => write!(f, "{}", ext),
            ExtensionValue::Other { error: Some(err) } => {
                writeln!(f, "                <unparsable: {}>", err.reason)
            }
            ExtensionValue::Other { error: None } => Ok(()),
        }
    }
}

/*
RFC 5280 Section 4.1.2.9

Extensions  ::=  SEQUENCE SIZE (1..MAX) OF Extension

Extension  ::=  SEQUENCE  {
    extnID      OBJECT IDENTIFIER,
    critical    BOOLEAN DEFAULT FALSE,
    extnValue   OCTET STRING
                -- contains the DER encoding of an ASN.1 value
                -- corresponding to the extension type identified
                -- by extnID
}
*/

/// One X.509 v3 extension.
///
/// The raw payload is always kept. `parsed` holds the specialized value for
/// recognized OIDs, or [`ExtensionValue::Other`] otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    oid: ObjectIdentifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'static str>,
    critical: bool,
    #[serde(serialize_with = "serialize_hex")]
    value: Vec<u8>,
    parsed: ExtensionValue,
}

impl Extension {
    pub fn oid(&self) -> &ObjectIdentifier {
        &self.oid
    }

    /// Canonical name for recognized extensions.
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// Content of the `extnValue` OCTET STRING.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn parsed(&self) -> &ExtensionValue {
        &self.parsed
    }

    /// The failure recorded when a recognized extension could not be decoded.
    pub fn decode_error(&self) -> Option<&ExtensionDecodeError> {
        match &self.parsed {
            ExtensionValue::Other { error } => error.as_ref(),
            _ => None,
        }
    }
}

impl OidName for Extension {
    fn oid_name(&self) -> Option<&'static str> {
        self.name
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let critical = if self.critical { " critical" } else { "" };
        match self.name {
            Some(name) => writeln!(f, "            X509v3 {}:{}", name, critical)?,
            None => writeln!(f, "            {}:{}", self.oid, critical)?,
        }
        write!(f, "{}", self.parsed)
    }
}

fn specialize(oid: &ObjectIdentifier, payload: &Tlv<'_>) -> ExtensionValue {
    let Some(kind) = ExtensionKind::from_oid(oid) else {
        trace!("extension {}: unrecognized, kept raw", oid);
        return ExtensionValue::Other { error: None };
    };
    trace!("extension {}: decoding as {}", oid, kind);
    match kind.decode(&mut payload.reader()) {
        Ok(value) => value,
        Err(err) => {
            warn!("extension {} ({}): {}", kind, oid, err);
            ExtensionValue::Other {
                error: Some(ExtensionDecodeError {
                    oid: oid.clone(),
                    reason: err.to_string(),
                }),
            }
        }
    }
}

impl<'a> DecodableFrom<Tlv<'a>> for Extension {}

impl<'a> Decoder<Tlv<'a>, Extension> for Tlv<'a> {
    type Error = crate::Error;

    fn decode(&self) -> Result<Extension, Self::Error> {
        let mut reader = self.reader();
        let oid = reader.read_oid().context("extension")?;
        // DEFAULT FALSE
        let critical = match reader.peek_tag().context("extension")? {
            Some(Tag::BOOLEAN) => reader.read_boolean().context("extension")?,
            _ => false,
        };
        let payload = reader.expect(Tag::OCTET_STRING).context("extension")?;
        reader.finish().context("extension")?;

        let parsed = specialize(&oid, &payload);
        Ok(Extension {
            name: ExtensionKind::from_oid(&oid).map(ExtensionKind::name),
            oid,
            critical,
            value: payload.value().to_vec(),
            parsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    fn decode(input: &[u8]) -> crate::Result<Extension> {
        Reader::new(input).expect(Tag::SEQUENCE).context("test")?.decode()
    }

    #[test]
    fn test_kind_oid_round_trip() {
        for kind in ExtensionKind::ALL {
            let oid = ObjectIdentifier::from_str(kind.oid()).unwrap();
            assert_eq!(Some(kind), ExtensionKind::from_oid(&oid));
        }
    }

    #[rstest(
        oid,
        expected,
        case("2.5.29.19", Some(ExtensionKind::BasicConstraints)),
        case("2.5.29.37", Some(ExtensionKind::ExtendedKeyUsage)),
        case("1.3.6.1.5.5.7.1.1", Some(ExtensionKind::AuthorityInfoAccess)),
        // certificatePolicies has no decoder
        case("2.5.29.32", None),
        case("1.3.6.1.4.1.99999.42", None)
    )]
    fn test_kind_from_oid(oid: &str, expected: Option<ExtensionKind>) {
        let oid = ObjectIdentifier::from_str(oid).unwrap();
        assert_eq!(expected, ExtensionKind::from_oid(&oid));
    }

    #[test]
    fn test_decode_basic_constraints() {
        // basicConstraints, critical, CA:TRUE
        let input = [
            0x30, 0x0f, 0x06, 0x03, 0x55, 0x1d, 0x13, 0x01, 0x01, 0xff, 0x04, 0x05, 0x30, 0x03,
            0x01, 0x01, 0xff,
        ];
        let ext = decode(&input).unwrap();
        assert_eq!("2.5.29.19", ext.oid().to_string());
        assert_eq!(Some("basicConstraints"), ext.name());
        assert!(ext.is_critical());
        assert_eq!(&[0x30, 0x03, 0x01, 0x01, 0xff], ext.value());
        assert_eq!(
            ExtensionValue::BasicConstraints(BasicConstraints {
                ca: true,
                path_len_constraint: None,
            }),
            *ext.parsed()
        );
        assert_eq!(
            "            X509v3 basicConstraints: critical\n                CA:TRUE\n",
            ext.to_string()
        );
    }

    #[test]
    fn test_decode_unknown_critical() {
        let input = [
            0x30, 0x13, 0x06, 0x0a, 0x2b, 0x06, 0x01, 0x04, 0x01, 0x86, 0x8d, 0x1f, 0x01, 0x2a,
            0x01, 0x01, 0xff, 0x04, 0x02, 0x05, 0x00,
        ];
        let ext = decode(&input).unwrap();
        assert_eq!("1.3.6.1.4.1.99999.1.42", ext.oid().to_string());
        assert!(ext.is_critical());
        assert_eq!(None, ext.name());
        assert_eq!(ExtensionValue::Other { error: None }, *ext.parsed());
        assert_eq!(&[0x05, 0x00], ext.value());
    }

    #[test]
    fn test_decode_default_not_critical() {
        // subjectKeyIdentifier without the critical field
        let input = [
            0x30, 0x0c, 0x06, 0x03, 0x55, 0x1d, 0x0e, 0x04, 0x05, 0x04, 0x03, 0x01, 0x02, 0x03,
        ];
        let ext = decode(&input).unwrap();
        assert!(!ext.is_critical());
        assert_eq!(Some(ExtensionKind::SubjectKeyIdentifier), ext.parsed().kind());
    }

    #[rstest(
        input,
        case(
            // inner OCTET STRING claims more than the payload holds
            vec![0x30, 0x0c, 0x06, 0x03, 0x55, 0x1d, 0x0e, 0x04, 0x05, 0x04, 0x7f, 0x01, 0x02, 0x03]
        ),
        case(
            // trailing byte after the BasicConstraints SEQUENCE
            vec![0x30, 0x0a, 0x06, 0x03, 0x55, 0x1d, 0x13, 0x04, 0x03, 0x30, 0x00, 0x00]
        ),
        case(
            // keyUsage with no bits set
            vec![0x30, 0x0a, 0x06, 0x03, 0x55, 0x1d, 0x0f, 0x04, 0x03, 0x03, 0x01, 0x00]
        )
    )]
    fn test_decode_failure_is_local(input: Vec<u8>) {
        let ext = decode(&input).unwrap();
        let err = ext.decode_error().unwrap();
        assert_eq!(ext.oid(), &err.oid);
        assert!(ext.parsed().kind().is_none());
    }

    #[rstest(
        input,
        case(
            // extnValue missing
            vec![0x30, 0x05, 0x06, 0x03, 0x55, 0x1d, 0x13]
        ),
        case(
            // critical is not a BOOLEAN
            vec![0x30, 0x0a, 0x06, 0x03, 0x55, 0x1d, 0x13, 0x02, 0x01, 0x01, 0x04, 0x00]
        ),
        case(
            // trailing element after extnValue
            vec![0x30, 0x09, 0x06, 0x03, 0x55, 0x1d, 0x13, 0x04, 0x00, 0x05, 0x00]
        )
    )]
    fn test_decode_schema_violation(input: Vec<u8>) {
        assert!(matches!(
            decode(&input).unwrap_err(),
            crate::Error::SchemaViolation { context: "extension", .. }
        ));
    }

    #[test]
    fn test_serialize_extension() {
        let input = [
            0x30, 0x0c, 0x06, 0x03, 0x55, 0x1d, 0x0e, 0x04, 0x05, 0x04, 0x03, 0x01, 0x02, 0x03,
        ];
        let ext = decode(&input).unwrap();
        let json = serde_json::to_value(&ext).unwrap();
        assert_eq!(
            serde_json::json!({
                "oid": "2.5.29.14",
                "name": "subjectKeyIdentifier",
                "critical": false,
                "value": "0403010203",
                "parsed": { "subjectKeyIdentifier": "010203" }
            }),
            json
        );
    }
}
