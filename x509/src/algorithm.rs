use std::fmt;

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{ObjectIdentifier, ReadExt};
use kensa_der::{Tag, Tlv};
use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::OidName;

/*
RFC 5280 Section 4.1.1.2

AlgorithmIdentifier  ::=  SEQUENCE  {
    algorithm               OBJECT IDENTIFIER,
    parameters              ANY DEFINED BY algorithm OPTIONAL
}
*/

/// Parameters field in AlgorithmIdentifier
///
/// Wrapped in Option:
/// - None: field not present (common for ECDSA signatures and Ed25519)
/// - Some(Null): explicit NULL, the usual case for RSA
/// - Some(ObjectIdentifier): a named curve for EC public keys
/// - Some(Other): any other element, kept as its complete DER encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmParameters {
    Null,
    ObjectIdentifier(ObjectIdentifier),
    Other(Vec<u8>),
}

impl Serialize for AlgorithmParameters {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            AlgorithmParameters::Null => serializer.serialize_str("NULL"),
            AlgorithmParameters::ObjectIdentifier(oid) => oid.serialize(serializer),
            AlgorithmParameters::Other(raw) => serializer.serialize_str(&hex::encode(raw)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    algorithm: ObjectIdentifier,
    parameters: Option<AlgorithmParameters>,
}

impl AlgorithmIdentifier {
    pub const OID_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.1";
    pub const OID_MD5_WITH_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.4";
    pub const OID_SHA1_WITH_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.5";
    pub const OID_RSASSA_PSS: &'static str = "1.2.840.113549.1.1.10";
    pub const OID_SHA256_WITH_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.11";
    pub const OID_SHA384_WITH_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.12";
    pub const OID_SHA512_WITH_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.13";
    pub const OID_SHA224_WITH_RSA_ENCRYPTION: &'static str = "1.2.840.113549.1.1.14";
    pub const OID_EC_PUBLIC_KEY: &'static str = "1.2.840.10045.2.1";
    pub const OID_ECDSA_WITH_SHA1: &'static str = "1.2.840.10045.4.1";
    pub const OID_ECDSA_WITH_SHA224: &'static str = "1.2.840.10045.4.3.1";
    pub const OID_ECDSA_WITH_SHA256: &'static str = "1.2.840.10045.4.3.2";
    pub const OID_ECDSA_WITH_SHA384: &'static str = "1.2.840.10045.4.3.3";
    pub const OID_ECDSA_WITH_SHA512: &'static str = "1.2.840.10045.4.3.4";
    pub const OID_DSA: &'static str = "1.2.840.10040.4.1";
    pub const OID_DSA_WITH_SHA1: &'static str = "1.2.840.10040.4.3";
    pub const OID_X25519: &'static str = "1.3.101.110";
    pub const OID_ED25519: &'static str = "1.3.101.112";
    pub const OID_ED448: &'static str = "1.3.101.113";

    pub fn new(algorithm: ObjectIdentifier, parameters: Option<AlgorithmParameters>) -> Self {
        AlgorithmIdentifier {
            algorithm,
            parameters,
        }
    }

    pub fn algorithm(&self) -> &ObjectIdentifier {
        &self.algorithm
    }

    pub fn parameters(&self) -> Option<&AlgorithmParameters> {
        self.parameters.as_ref()
    }

    /// Conventional name of the algorithm, or the dotted OID.
    pub fn name(&self) -> String {
        self.oid_name()
            .map(str::to_string)
            .unwrap_or_else(|| self.algorithm.to_string())
    }
}

impl OidName for AlgorithmIdentifier {
    fn oid_name(&self) -> Option<&'static str> {
        let name = match self.algorithm.to_string().as_str() {
            Self::OID_RSA_ENCRYPTION => "rsaEncryption",
            Self::OID_MD5_WITH_RSA_ENCRYPTION => "md5WithRSAEncryption",
            Self::OID_SHA1_WITH_RSA_ENCRYPTION => "sha1WithRSAEncryption",
            Self::OID_RSASSA_PSS => "rsassaPss",
            Self::OID_SHA256_WITH_RSA_ENCRYPTION => "sha256WithRSAEncryption",
            Self::OID_SHA384_WITH_RSA_ENCRYPTION => "sha384WithRSAEncryption",
            Self::OID_SHA512_WITH_RSA_ENCRYPTION => "sha512WithRSAEncryption",
            Self::OID_SHA224_WITH_RSA_ENCRYPTION => "sha224WithRSAEncryption",
            Self::OID_EC_PUBLIC_KEY => "id-ecPublicKey",
            Self::OID_ECDSA_WITH_SHA1 => "ecdsa-with-SHA1",
            Self::OID_ECDSA_WITH_SHA224 => "ecdsa-with-SHA224",
            Self::OID_ECDSA_WITH_SHA256 => "ecdsa-with-SHA256",
            Self::OID_ECDSA_WITH_SHA384 => "ecdsa-with-SHA384",
            Self::OID_ECDSA_WITH_SHA512 => "ecdsa-with-SHA512",
            Self::OID_DSA => "dsaEncryption",
            Self::OID_DSA_WITH_SHA1 => "dsaWithSHA1",
            Self::OID_X25519 => "X25519",
            Self::OID_ED25519 => "ED25519",
            Self::OID_ED448 => "ED448",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for AlgorithmIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for AlgorithmIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("AlgorithmIdentifier", 3)?;
        state.serialize_field("algorithm", &self.algorithm)?;
        state.serialize_field("name", &self.name())?;
        if let Some(parameters) = &self.parameters {
            state.serialize_field("parameters", parameters)?;
        }
        state.end()
    }
}

impl<'a> DecodableFrom<Tlv<'a>> for AlgorithmIdentifier {}

impl<'a> Decoder<Tlv<'a>, AlgorithmIdentifier> for Tlv<'a> {
    type Error = kensa_asn1::Error;

    fn decode(&self) -> Result<AlgorithmIdentifier, Self::Error> {
        let mut reader = self.reader();
        let algorithm = reader.read_oid()?;
        let parameters = match reader.peek_tag()? {
            None => None,
            Some(Tag::NULL) => {
                reader.read_null()?;
                Some(AlgorithmParameters::Null)
            }
            Some(Tag::OBJECT_IDENTIFIER) => {
                Some(AlgorithmParameters::ObjectIdentifier(reader.read_oid()?))
            }
            Some(_) => Some(AlgorithmParameters::Other(reader.read_tlv()?.raw().to_vec())),
        };
        reader.finish()?;

        Ok(AlgorithmIdentifier {
            algorithm,
            parameters,
        })
    }
}
