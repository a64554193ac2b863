use std::fmt;

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{BitString, ReadExt};
use kensa_der::{Reader, Tag, Tlv};
use serde::Serialize;

use crate::algorithm::{AlgorithmIdentifier, AlgorithmParameters};

/*
RFC 5280 Section 4.1

SubjectPublicKeyInfo  ::=  SEQUENCE  {
    algorithm            AlgorithmIdentifier,
    subjectPublicKey     BIT STRING
}

RFC 3279 Section 2.3.1

RSAPublicKey ::= SEQUENCE {
    modulus            INTEGER,    -- n
    publicExponent     INTEGER  }  -- e
*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPublicKeyInfo {
    algorithm: AlgorithmIdentifier,
    subject_public_key: BitString,
}

impl SubjectPublicKeyInfo {
    pub fn algorithm(&self) -> &AlgorithmIdentifier {
        &self.algorithm
    }

    pub fn subject_public_key(&self) -> &BitString {
        &self.subject_public_key
    }

    /// Summarizes the key for display. Keys that cannot be read, or use an
    /// algorithm without a summary, come back as [`PublicKey::Unknown`].
    pub fn public_key(&self) -> PublicKey {
        let unknown = || PublicKey::Unknown {
            algorithm: self.algorithm.name(),
        };
        match self.algorithm.algorithm().to_string().as_str() {
            AlgorithmIdentifier::OID_RSA_ENCRYPTION => {
                rsa_public_key(self.subject_public_key.as_bytes()).unwrap_or_else(unknown)
            }
            AlgorithmIdentifier::OID_EC_PUBLIC_KEY => match self.algorithm.parameters() {
                Some(AlgorithmParameters::ObjectIdentifier(curve)) => {
                    let dotted = curve.to_string();
                    let (name, bits) = match named_curve(&dotted) {
                        Some((name, bits)) => (name.to_string(), Some(bits)),
                        None => (dotted, None),
                    };
                    PublicKey::Ec {
                        curve: name,
                        bits,
                        point: hex::encode_upper(self.subject_public_key.as_bytes()),
                    }
                }
                _ => unknown(),
            },
            _ => unknown(),
        }
    }
}

fn rsa_public_key(der: &[u8]) -> Option<PublicKey> {
    let mut outer = Reader::new(der);
    let mut reader = outer.expect(Tag::SEQUENCE).ok()?.reader();
    outer.finish().ok()?;
    let modulus = reader.read_integer().ok()?;
    let exponent = reader.read_integer().ok()?;
    reader.finish().ok()?;

    let (_, magnitude) = modulus.as_bigint().to_bytes_be();
    Some(PublicKey::Rsa {
        bits: modulus.as_bigint().bits(),
        modulus: hex::encode_upper(magnitude),
        exponent: exponent.to_u64()?,
    })
}

fn named_curve(oid: &str) -> Option<(&'static str, u32)> {
    let curve = match oid {
        "1.2.840.10045.3.1.1" => ("prime192v1", 192),
        "1.3.132.0.33" => ("secp224r1", 224),
        "1.2.840.10045.3.1.7" => ("prime256v1", 256),
        "1.3.132.0.10" => ("secp256k1", 256),
        "1.3.132.0.34" => ("secp384r1", 384),
        "1.3.132.0.35" => ("secp521r1", 521),
        "1.3.36.3.3.2.8.1.1.7" => ("brainpoolP256r1", 256),
        "1.3.36.3.3.2.8.1.1.11" => ("brainpoolP384r1", 384),
        "1.3.36.3.3.2.8.1.1.13" => ("brainpoolP512r1", 512),
        _ => return None,
    };
    Some(curve)
}

/// A readable summary of a subject public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PublicKey {
    /// Modulus is uppercase hex without the sign octet.
    #[serde(rename_all = "camelCase")]
    Rsa {
        modulus: String,
        exponent: u64,
        bits: u64,
    },
    /// Point is the uppercase hex of the encoded curve point.
    #[serde(rename_all = "camelCase")]
    Ec {
        curve: String,
        bits: Option<u32>,
        point: String,
    },
    Unknown { algorithm: String },
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublicKey::Rsa {
                modulus,
                exponent,
                bits,
            } => {
                writeln!(f, "                Public-Key: ({} bit)", bits)?;
                writeln!(f, "                Modulus:")?;
                write_hex_block(f, modulus)?;
                writeln!(f, "                Exponent: {} (0x{:x})", exponent, exponent)
            }
            PublicKey::Ec { curve, bits, point } => {
                if let Some(bits) = bits {
                    writeln!(f, "                Public-Key: ({} bit)", bits)?;
                }
                writeln!(f, "                pub:")?;
                write_hex_block(f, point)?;
                writeln!(f, "                ASN1 OID: {}", curve)
            }
            PublicKey::Unknown { .. } => Ok(()),
        }
    }
}

// 15 octets per line, colon separated
fn write_hex_block(f: &mut fmt::Formatter<'_>, hex: &str) -> fmt::Result {
    let octets = hex
        .as_bytes()
        .chunks(2)
        .map(|pair| String::from_utf8_lossy(pair).to_lowercase())
        .collect::<Vec<_>>();
    let lines = octets.chunks(15).collect::<Vec<_>>();
    for (i, line) in lines.iter().enumerate() {
        let sep = if i + 1 < lines.len() { ":" } else { "" };
        writeln!(f, "                    {}{}", line.join(":"), sep)?;
    }
    Ok(())
}

impl<'a> DecodableFrom<Tlv<'a>> for SubjectPublicKeyInfo {}

impl<'a> Decoder<Tlv<'a>, SubjectPublicKeyInfo> for Tlv<'a> {
    type Error = kensa_asn1::Error;

    fn decode(&self) -> Result<SubjectPublicKeyInfo, Self::Error> {
        let mut reader = self.reader();
        let algorithm: AlgorithmIdentifier = reader.expect(Tag::SEQUENCE)?.decode()?;
        let subject_public_key = reader.read_bit_string()?;
        reader.finish()?;

        Ok(SubjectPublicKeyInfo {
            algorithm,
            subject_public_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn decode(input: &[u8]) -> SubjectPublicKeyInfo {
        Reader::new(input)
            .expect(Tag::SEQUENCE)
            .unwrap()
            .decode()
            .unwrap()
    }

    #[test]
    fn test_rsa_public_key() {
        // rsaEncryption, SEQUENCE { INTEGER 0x00c5, INTEGER 3 }
        let input = vec![
            0x30, 0x1b, 0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01,
            0x01, 0x05, 0x00, 0x03, 0x0a, 0x00, 0x30, 0x07, 0x02, 0x02, 0x00, 0xc5, 0x02, 0x01,
            0x03,
        ];
        let spki = decode(&input);
        assert_eq!("rsaEncryption", spki.algorithm().name());
        assert_eq!(
            PublicKey::Rsa {
                modulus: "C5".to_string(),
                exponent: 3,
                bits: 8,
            },
            spki.public_key()
        );
    }

    #[test]
    fn test_ec_public_key() {
        // id-ecPublicKey, prime256v1, a (short) uncompressed point
        let input = vec![
            0x30, 0x1b, 0x30, 0x13, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06,
            0x08, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07, 0x03, 0x04, 0x00, 0x04, 0xab,
            0xcd,
        ];
        let spki = decode(&input);
        assert_eq!(
            PublicKey::Ec {
                curve: "prime256v1".to_string(),
                bits: Some(256),
                point: "04ABCD".to_string(),
            },
            spki.public_key()
        );
    }

    #[rstest(
        input,
        expected_algorithm,
        // rsaEncryption with a key that is not an RSAPublicKey
        case(
            vec![
                0x30, 0x13, 0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01,
                0x01, 0x01, 0x05, 0x00, 0x03, 0x02, 0x00, 0xff,
            ],
            "rsaEncryption"
        ),
        // Ed25519
        case(
            vec![0x30, 0x0a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x01, 0x00],
            "ED25519"
        )
    )]
    fn test_unknown_public_key(input: Vec<u8>, expected_algorithm: &str) {
        assert_eq!(
            PublicKey::Unknown {
                algorithm: expected_algorithm.to_string()
            },
            decode(&input).public_key()
        );
    }

    #[test]
    fn test_display_rsa_public_key() {
        let key = PublicKey::Rsa {
            modulus: "00112233445566778899AABBCCDDEEFF01".to_string(),
            exponent: 65537,
            bits: 136,
        };
        let expected = "                Public-Key: (136 bit)\n\
                        \x20               Modulus:\n\
                        \x20                   00:11:22:33:44:55:66:77:88:99:aa:bb:cc:dd:ee:\n\
                        \x20                   ff:01\n\
                        \x20               Exponent: 65537 (0x10001)\n";
        assert_eq!(expected, key.to_string());
    }
}
