use std::fmt;

use kensa_asn1::ReadExt;
use kensa_der::Reader;
use serde::{Serialize, Serializer};

use super::error;
use super::{ExtensionValue, StandardExtension};
use crate::OidName;

/*
RFC 5280 Section 4.2.1.2
SubjectKeyIdentifier ::= KeyIdentifier

KeyIdentifier ::= OCTET STRING
*/

/// Opaque key identifier, usually a SHA-1 hash of the public key.
///
/// Serializes as lowercase hex; `Display` uses the OpenSSL colon form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyIdentifier(Vec<u8>);

impl KeyIdentifier {
    pub fn new(bytes: Vec<u8>) -> Self {
        KeyIdentifier(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let octets = self
            .0
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>();
        write!(f, "{}", octets.join(":"))
    }
}

impl Serialize for KeyIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubjectKeyIdentifier {
    pub key_identifier: KeyIdentifier,
}

impl StandardExtension for SubjectKeyIdentifier {
    const OID: &'static str = "2.5.29.14";

    fn parse(reader: &mut Reader<'_>) -> error::Result<Self> {
        let key_identifier = KeyIdentifier::new(reader.read_octet_string()?.to_vec());
        Ok(SubjectKeyIdentifier { key_identifier })
    }

    fn extract(value: &ExtensionValue) -> Option<&Self> {
        match value {
            ExtensionValue::SubjectKeyIdentifier(ski) => Some(ski),
            _ => None,
        }
    }
}

impl OidName for SubjectKeyIdentifier {
    fn oid_name(&self) -> Option<&'static str> {
        Some("subjectKeyIdentifier")
    }
}

impl fmt::Display for SubjectKeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "                {}", self.key_identifier)
    }
}
