use std::fmt;

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_der::{Reader, Tag, Tlv};
use serde::Serialize;

use super::error::{self, Kind};
use super::general_name::{GeneralName, decode_general_names};
use super::{ExtensionValue, KeyIdentifier, StandardExtension};
use crate::{OidName, SerialNumber};

/*
RFC 5280 Section 4.2.1.1
AuthorityKeyIdentifier ::= SEQUENCE {
    keyIdentifier             [0] KeyIdentifier           OPTIONAL,
    authorityCertIssuer       [1] GeneralNames            OPTIONAL,
    authorityCertSerialNumber [2] CertificateSerialNumber OPTIONAL
}

KeyIdentifier ::= OCTET STRING
CertificateSerialNumber ::= INTEGER
*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityKeyIdentifier {
    /// KeyIdentifier: typically a SHA-1 hash of the CA's public key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_identifier: Option<KeyIdentifier>,
    /// GeneralNames: issuer name(s) of the CA certificate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority_cert_issuer: Option<Vec<GeneralName>>,
    /// CertificateSerialNumber: serial number of the CA certificate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority_cert_serial_number: Option<SerialNumber>,
}

impl StandardExtension for AuthorityKeyIdentifier {
    const OID: &'static str = "2.5.29.35";

    fn parse(reader: &mut Reader<'_>) -> error::Result<Self> {
        reader.expect(Tag::SEQUENCE)?.decode()
    }

    fn extract(value: &ExtensionValue) -> Option<&Self> {
        match value {
            ExtensionValue::AuthorityKeyIdentifier(aki) => Some(aki),
            _ => None,
        }
    }
}

impl<'a> DecodableFrom<Tlv<'a>> for AuthorityKeyIdentifier {}

impl<'a> Decoder<Tlv<'a>, AuthorityKeyIdentifier> for Tlv<'a> {
    type Error = error::Error;

    fn decode(&self) -> Result<AuthorityKeyIdentifier, Self::Error> {
        let mut reader = self.reader();

        let key_identifier = reader
            .read_optional(Tag::context_specific(0, false))?
            .map(|tlv| KeyIdentifier::new(tlv.value().to_vec()));
        let authority_cert_issuer = reader
            .read_optional(Tag::context_specific(1, true))?
            .map(|tlv| decode_general_names(&tlv, Kind::AuthorityKeyIdentifier))
            .transpose()?;
        let authority_cert_serial_number = reader
            .read_optional(Tag::context_specific(2, false))?
            .map(|tlv| Decoder::<Tlv, SerialNumber>::decode(&tlv))
            .transpose()?;
        reader.finish()?;

        Ok(AuthorityKeyIdentifier {
            key_identifier,
            authority_cert_issuer,
            authority_cert_serial_number,
        })
    }
}

impl OidName for AuthorityKeyIdentifier {
    fn oid_name(&self) -> Option<&'static str> {
        Some("authorityKeyIdentifier")
    }
}

impl fmt::Display for AuthorityKeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(key_id) = &self.key_identifier {
            writeln!(f, "                keyid:{}", key_id)?;
        }
        if let Some(issuer) = &self.authority_cert_issuer {
            for name in issuer {
                writeln!(f, "                {}", name)?;
            }
        }
        if let Some(serial) = &self.authority_cert_serial_number {
            writeln!(f, "                serial:{}", serial)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn parse(input: &[u8]) -> error::Result<AuthorityKeyIdentifier> {
        AuthorityKeyIdentifier::parse(&mut Reader::new(input))
    }

    #[test]
    fn test_authority_key_identifier_key_id_only() {
        let input = [0x30, 0x06, 0x80, 0x04, 0x01, 0x02, 0x03, 0x04];
        let aki = parse(&input).unwrap();
        assert_eq!(
            Some(KeyIdentifier::new(vec![0x01, 0x02, 0x03, 0x04])),
            aki.key_identifier
        );
        assert_eq!(None, aki.authority_cert_issuer);
        assert_eq!(None, aki.authority_cert_serial_number);
        assert_eq!("                keyid:01:02:03:04\n", aki.to_string());
    }

    #[test]
    fn test_authority_key_identifier_all_fields() {
        // [0] 0xab, [1] { dNSName "ca" }, [2] 0x05
        let input = [
            0x30, 0x0c, 0x80, 0x01, 0xab, 0xa1, 0x04, 0x82, 0x02, 0x63, 0x61, 0x82, 0x01, 0x05,
        ];
        let aki = parse(&input).unwrap();
        assert_eq!(Some(KeyIdentifier::new(vec![0xab])), aki.key_identifier);
        assert_eq!(
            Some(vec![GeneralName::DnsName("ca".to_string())]),
            aki.authority_cert_issuer
        );
        assert_eq!(
            Some(SerialNumber::from_bytes(vec![0x05])),
            aki.authority_cert_serial_number
        );
        assert_eq!(
            "                keyid:AB\n                DNS:ca\n                serial:05\n",
            aki.to_string()
        );
    }

    #[test]
    fn test_authority_key_identifier_empty_sequence() {
        let aki = parse(&[0x30, 0x00]).unwrap();
        assert_eq!(None, aki.key_identifier);
    }

    #[rstest(
        input,
        // fields out of order
        case(vec![0x30, 0x06, 0x82, 0x01, 0x05, 0x80, 0x01, 0xab]),
        // universal OCTET STRING instead of [0]
        case(vec![0x30, 0x03, 0x04, 0x01, 0xab]),
        // empty authorityCertIssuer
        case(vec![0x30, 0x02, 0xa1, 0x00])
    )]
    fn test_authority_key_identifier_decode_failure(input: Vec<u8>) {
        assert!(parse(&input).is_err());
    }

    #[test]
    fn test_authority_key_identifier_serialize() {
        let aki = AuthorityKeyIdentifier {
            key_identifier: Some(KeyIdentifier::new(vec![0x01, 0x02])),
            authority_cert_issuer: None,
            authority_cert_serial_number: None,
        };
        assert_eq!(
            serde_json::json!({ "keyIdentifier": "0102" }),
            serde_json::to_value(&aki).unwrap()
        );
    }
}
