use std::fmt;

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::BitString;
use kensa_der::{Reader, Tag, Tlv};
use serde::Serialize;

use super::error;
use super::{ExtensionValue, StandardExtension};
use crate::OidName;

/*
RFC 5280 Section 4.2.1.3
KeyUsage ::= BIT STRING {
    digitalSignature        (0),
    nonRepudiation          (1), -- renamed to contentCommitment
    keyEncipherment         (2),
    dataEncipherment        (3),
    keyAgreement            (4),
    keyCertSign             (5),
    cRLSign                 (6),
    encipherOnly            (7),
    decipherOnly            (8)
}
*/

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyUsage {
    pub digital_signature: bool,
    pub non_repudiation: bool,
    pub key_encipherment: bool,
    pub data_encipherment: bool,
    pub key_agreement: bool,
    pub key_cert_sign: bool,
    #[serde(rename = "cRLSign")]
    pub crl_sign: bool,
    pub encipher_only: bool,
    pub decipher_only: bool,
}

impl KeyUsage {
    fn flags(&self) -> [(bool, &'static str); 9] {
        [
            (self.digital_signature, "Digital Signature"),
            (self.non_repudiation, "Non Repudiation"),
            (self.key_encipherment, "Key Encipherment"),
            (self.data_encipherment, "Data Encipherment"),
            (self.key_agreement, "Key Agreement"),
            (self.key_cert_sign, "Certificate Sign"),
            (self.crl_sign, "CRL Sign"),
            (self.encipher_only, "Encipher Only"),
            (self.decipher_only, "Decipher Only"),
        ]
    }

    /// Display names of the asserted usages, in bit order.
    pub fn usages(&self) -> Vec<&'static str> {
        self.flags()
            .into_iter()
            .filter_map(|(set, name)| set.then_some(name))
            .collect()
    }
}

impl StandardExtension for KeyUsage {
    const OID: &'static str = "2.5.29.15";

    fn parse(reader: &mut Reader<'_>) -> error::Result<Self> {
        reader.expect(Tag::BIT_STRING)?.decode()
    }

    fn extract(value: &ExtensionValue) -> Option<&Self> {
        match value {
            ExtensionValue::KeyUsage(ku) => Some(ku),
            _ => None,
        }
    }
}

impl<'a> DecodableFrom<Tlv<'a>> for KeyUsage {}

impl<'a> Decoder<Tlv<'a>, KeyUsage> for Tlv<'a> {
    type Error = error::Error;

    fn decode(&self) -> Result<KeyUsage, Self::Error> {
        let bits: BitString = self.decode()?;
        let key_usage = KeyUsage {
            digital_signature: bits.bit(0),
            non_repudiation: bits.bit(1),
            key_encipherment: bits.bit(2),
            data_encipherment: bits.bit(3),
            key_agreement: bits.bit(4),
            key_cert_sign: bits.bit(5),
            crl_sign: bits.bit(6),
            encipher_only: bits.bit(7),
            decipher_only: bits.bit(8),
        };
        // RFC 5280: at least one bit MUST be set
        if key_usage == KeyUsage::default() {
            return Err(error::Error::KeyUsageEmpty);
        }
        Ok(key_usage)
    }
}

impl OidName for KeyUsage {
    fn oid_name(&self) -> Option<&'static str> {
        Some("keyUsage")
    }
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "                {}", self.usages().join(", "))
    }
}
