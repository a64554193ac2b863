use std::fmt;

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::ObjectIdentifier;
use kensa_der::{Reader, Tag, Tlv};
use serde::{Serialize, Serializer};

use super::error::{self, Kind};
use super::{ExtensionValue, StandardExtension};
use crate::OidName;

/*
RFC 5280 Section 4.2.1.12
ExtKeyUsageSyntax ::= SEQUENCE SIZE (1..MAX) OF KeyPurposeId

KeyPurposeId ::= OBJECT IDENTIFIER
*/

/// A key purpose from extendedKeyUsage. Purposes without a well-known name
/// keep their OID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPurpose {
    ServerAuth,
    ClientAuth,
    CodeSigning,
    EmailProtection,
    TimeStamping,
    OcspSigning,
    AnyExtendedKeyUsage,
    Other(ObjectIdentifier),
}

impl KeyPurpose {
    pub const OID_SERVER_AUTH: &'static str = "1.3.6.1.5.5.7.3.1";
    pub const OID_CLIENT_AUTH: &'static str = "1.3.6.1.5.5.7.3.2";
    pub const OID_CODE_SIGNING: &'static str = "1.3.6.1.5.5.7.3.3";
    pub const OID_EMAIL_PROTECTION: &'static str = "1.3.6.1.5.5.7.3.4";
    pub const OID_TIME_STAMPING: &'static str = "1.3.6.1.5.5.7.3.8";
    pub const OID_OCSP_SIGNING: &'static str = "1.3.6.1.5.5.7.3.9";
    pub const OID_ANY_EXTENDED_KEY_USAGE: &'static str = "2.5.29.37.0";

    fn from_oid(oid: ObjectIdentifier) -> Self {
        match oid.to_string().as_str() {
            Self::OID_SERVER_AUTH => KeyPurpose::ServerAuth,
            Self::OID_CLIENT_AUTH => KeyPurpose::ClientAuth,
            Self::OID_CODE_SIGNING => KeyPurpose::CodeSigning,
            Self::OID_EMAIL_PROTECTION => KeyPurpose::EmailProtection,
            Self::OID_TIME_STAMPING => KeyPurpose::TimeStamping,
            Self::OID_OCSP_SIGNING => KeyPurpose::OcspSigning,
            Self::OID_ANY_EXTENDED_KEY_USAGE => KeyPurpose::AnyExtendedKeyUsage,
            _ => KeyPurpose::Other(oid),
        }
    }

    /// Short name as used in RFC 5280, or the dotted OID.
    pub fn name(&self) -> String {
        match self.oid_name() {
            Some(name) => name.to_string(),
            None => self.oid(),
        }
    }

    pub fn oid(&self) -> String {
        let oid = match self {
            KeyPurpose::ServerAuth => Self::OID_SERVER_AUTH,
            KeyPurpose::ClientAuth => Self::OID_CLIENT_AUTH,
            KeyPurpose::CodeSigning => Self::OID_CODE_SIGNING,
            KeyPurpose::EmailProtection => Self::OID_EMAIL_PROTECTION,
            KeyPurpose::TimeStamping => Self::OID_TIME_STAMPING,
            KeyPurpose::OcspSigning => Self::OID_OCSP_SIGNING,
            KeyPurpose::AnyExtendedKeyUsage => Self::OID_ANY_EXTENDED_KEY_USAGE,
            KeyPurpose::Other(oid) => return oid.to_string(),
        };
        oid.to_string()
    }
}

impl OidName for KeyPurpose {
    fn oid_name(&self) -> Option<&'static str> {
        let name = match self {
            KeyPurpose::ServerAuth => "serverAuth",
            KeyPurpose::ClientAuth => "clientAuth",
            KeyPurpose::CodeSigning => "codeSigning",
            KeyPurpose::EmailProtection => "emailProtection",
            KeyPurpose::TimeStamping => "timeStamping",
            KeyPurpose::OcspSigning => "OCSPSigning",
            KeyPurpose::AnyExtendedKeyUsage => "anyExtendedKeyUsage",
            KeyPurpose::Other(_) => return None,
        };
        Some(name)
    }
}

impl Serialize for KeyPurpose {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.name())
    }
}

impl fmt::Display for KeyPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPurpose::ServerAuth => write!(f, "TLS Web Server Authentication"),
            KeyPurpose::ClientAuth => write!(f, "TLS Web Client Authentication"),
            KeyPurpose::CodeSigning => write!(f, "Code Signing"),
            KeyPurpose::EmailProtection => write!(f, "E-mail Protection"),
            KeyPurpose::TimeStamping => write!(f, "Time Stamping"),
            KeyPurpose::OcspSigning => write!(f, "OCSP Signing"),
            KeyPurpose::AnyExtendedKeyUsage => write!(f, "Any Extended Key Usage"),
            KeyPurpose::Other(oid) => write!(f, "{}", oid),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtendedKeyUsage {
    pub purposes: Vec<KeyPurpose>,
}

impl ExtendedKeyUsage {
    pub fn contains(&self, purpose: &KeyPurpose) -> bool {
        self.purposes.contains(purpose)
    }
}

impl StandardExtension for ExtendedKeyUsage {
    const OID: &'static str = "2.5.29.37";

    fn parse(reader: &mut Reader<'_>) -> error::Result<Self> {
        reader.expect(Tag::SEQUENCE)?.decode()
    }

    fn extract(value: &ExtensionValue) -> Option<&Self> {
        match value {
            ExtensionValue::ExtendedKeyUsage(eku) => Some(eku),
            _ => None,
        }
    }
}

impl<'a> DecodableFrom<Tlv<'a>> for ExtendedKeyUsage {}

impl<'a> Decoder<Tlv<'a>, ExtendedKeyUsage> for Tlv<'a> {
    type Error = error::Error;

    fn decode(&self) -> Result<ExtendedKeyUsage, Self::Error> {
        let mut reader = self.reader();
        let mut purposes = Vec::new();
        while !reader.is_empty() {
            let oid: ObjectIdentifier = reader.expect(Tag::OBJECT_IDENTIFIER)?.decode()?;
            purposes.push(KeyPurpose::from_oid(oid));
        }
        if purposes.is_empty() {
            return Err(error::Error::EmptySequence(Kind::ExtendedKeyUsage));
        }
        Ok(ExtendedKeyUsage { purposes })
    }
}

impl OidName for ExtendedKeyUsage {
    fn oid_name(&self) -> Option<&'static str> {
        Some("extendedKeyUsage")
    }
}

impl fmt::Display for ExtendedKeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let purposes = self
            .purposes
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>();
        writeln!(f, "                {}", purposes.join(", "))
    }
}
