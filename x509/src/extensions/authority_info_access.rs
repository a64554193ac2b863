use std::fmt;

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{ObjectIdentifier, ReadExt};
use kensa_der::{Reader, Tag, Tlv};
use serde::{Serialize, Serializer};

use super::error::{self, Kind};
use super::general_name::GeneralName;
use super::{ExtensionValue, StandardExtension};
use crate::OidName;

/*
RFC 5280 Section 4.2.2.1
AuthorityInfoAccessSyntax ::= SEQUENCE SIZE (1..MAX) OF AccessDescription

AccessDescription ::= SEQUENCE {
    accessMethod          OBJECT IDENTIFIER,
    accessLocation        GeneralName
}

id-ad-ocsp      OBJECT IDENTIFIER ::= { id-ad 1 }
id-ad-caIssuers OBJECT IDENTIFIER ::= { id-ad 2 }
*/

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccessMethod {
    Ocsp,
    CaIssuers,
    Other(ObjectIdentifier),
}

impl AccessMethod {
    pub const OID_OCSP: &'static str = "1.3.6.1.5.5.7.48.1";
    pub const OID_CA_ISSUERS: &'static str = "1.3.6.1.5.5.7.48.2";

    fn from_oid(oid: ObjectIdentifier) -> Self {
        match oid.to_string().as_str() {
            Self::OID_OCSP => AccessMethod::Ocsp,
            Self::OID_CA_ISSUERS => AccessMethod::CaIssuers,
            _ => AccessMethod::Other(oid),
        }
    }
}

impl OidName for AccessMethod {
    fn oid_name(&self) -> Option<&'static str> {
        match self {
            AccessMethod::Ocsp => Some("OCSP"),
            AccessMethod::CaIssuers => Some("CA Issuers"),
            AccessMethod::Other(_) => None,
        }
    }
}

impl fmt::Display for AccessMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessMethod::Other(oid) => write!(f, "{}", oid),
            _ => write!(f, "{}", self.oid_name().unwrap_or_default()),
        }
    }
}

impl Serialize for AccessMethod {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            AccessMethod::Ocsp => serializer.serialize_str("ocsp"),
            AccessMethod::CaIssuers => serializer.serialize_str("caIssuers"),
            AccessMethod::Other(oid) => oid.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDescription {
    pub access_method: AccessMethod,
    pub access_location: GeneralName,
}

impl<'a> DecodableFrom<Tlv<'a>> for AccessDescription {}

impl<'a> Decoder<Tlv<'a>, AccessDescription> for Tlv<'a> {
    type Error = error::Error;

    fn decode(&self) -> Result<AccessDescription, Self::Error> {
        let mut reader = self.reader();
        let access_method = AccessMethod::from_oid(reader.read_oid()?);
        let access_location: GeneralName = reader.read_tlv()?.decode()?;
        reader.finish()?;
        Ok(AccessDescription {
            access_method,
            access_location,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AuthorityInfoAccess {
    pub descriptions: Vec<AccessDescription>,
}

impl AuthorityInfoAccess {
    /// Locations published for `method`, in encoding order.
    pub fn locations(&self, method: &AccessMethod) -> impl Iterator<Item = &GeneralName> {
        self.descriptions
            .iter()
            .filter(move |desc| &desc.access_method == method)
            .map(|desc| &desc.access_location)
    }
}

impl StandardExtension for AuthorityInfoAccess {
    const OID: &'static str = "1.3.6.1.5.5.7.1.1";

    fn parse(reader: &mut Reader<'_>) -> error::Result<Self> {
        let descriptions = reader
            .read_sequence()?
            .map(|desc| -> error::Result<AccessDescription> { desc?.decode() })
            .collect::<error::Result<Vec<AccessDescription>>>()?;
        if descriptions.is_empty() {
            return Err(error::Error::EmptySequence(Kind::AuthorityInfoAccess));
        }
        Ok(AuthorityInfoAccess { descriptions })
    }

    fn extract(value: &ExtensionValue) -> Option<&Self> {
        match value {
            ExtensionValue::AuthorityInfoAccess(aia) => Some(aia),
            _ => None,
        }
    }
}

impl OidName for AuthorityInfoAccess {
    fn oid_name(&self) -> Option<&'static str> {
        Some("authorityInfoAccess")
    }
}

impl fmt::Display for AuthorityInfoAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for desc in &self.descriptions {
            writeln!(
                f,
                "                {} - {}",
                desc.access_method, desc.access_location
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn parse(input: &[u8]) -> error::Result<AuthorityInfoAccess> {
        AuthorityInfoAccess::parse(&mut Reader::new(input))
    }

    #[test]
    fn test_authority_info_access_decode() {
        // SEQUENCE {
        //   SEQUENCE { id-ad-ocsp, URI "http://o" }
        //   SEQUENCE { id-ad-caIssuers, URI "http://c" } }
        let input = [
            0x30, 0x2c, 0x30, 0x14, 0x06, 0x08, 0x2b, 0x06, 0x01, 0x05, 0x05, 0x07, 0x30, 0x01,
            0x86, 0x08, 0x68, 0x74, 0x74, 0x70, 0x3a, 0x2f, 0x2f, 0x6f, 0x30, 0x14, 0x06, 0x08,
            0x2b, 0x06, 0x01, 0x05, 0x05, 0x07, 0x30, 0x02, 0x86, 0x08, 0x68, 0x74, 0x74, 0x70,
            0x3a, 0x2f, 0x2f, 0x63,
        ];
        let aia = parse(&input).unwrap();
        assert_eq!(
            vec![
                AccessDescription {
                    access_method: AccessMethod::Ocsp,
                    access_location: GeneralName::Uri("http://o".to_string()),
                },
                AccessDescription {
                    access_method: AccessMethod::CaIssuers,
                    access_location: GeneralName::Uri("http://c".to_string()),
                },
            ],
            aia.descriptions
        );
        assert_eq!(
            vec![&GeneralName::Uri("http://o".to_string())],
            aia.locations(&AccessMethod::Ocsp).collect::<Vec<_>>()
        );
        assert_eq!(
            "                OCSP - URI:http://o\n                CA Issuers - URI:http://c\n",
            aia.to_string()
        );
        assert_eq!(
            serde_json::json!([
                { "accessMethod": "ocsp", "accessLocation": { "uniformResourceIdentifier": "http://o" } },
                { "accessMethod": "caIssuers", "accessLocation": { "uniformResourceIdentifier": "http://c" } }
            ]),
            serde_json::to_value(&aia).unwrap()
        );
    }

    #[rstest(
        input,
        expected,
        case(vec![0x30, 0x00], error::Error::EmptySequence(Kind::AuthorityInfoAccess)),
        case(
            // accessLocation missing
            vec![0x30, 0x07, 0x30, 0x05, 0x06, 0x03, 0x2a, 0x03, 0x04],
            error::Error::InvalidAsn1(kensa_asn1::Error::Der(kensa_der::Error::Truncated {
                offset: 9,
                needed: 1,
                available: 0,
            }))
        )
    )]
    fn test_authority_info_access_decode_failure(input: Vec<u8>, expected: error::Error) {
        assert_eq!(expected, parse(&input).unwrap_err());
    }
}
