//! Certificate Serial Number
//!
//! Defined in RFC 5280 Section 4.1.2.2
//!
//! ```asn1
//! CertificateSerialNumber ::= INTEGER
//! ```
//!
//! Serial numbers may be up to 20 octets long, so they are kept as the raw
//! two's-complement content bytes rather than a machine integer.

use std::fmt;

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_der::Tlv;
use num_bigint::BigInt;
use serde::{Serialize, Serializer};

/// Certificate Serial Number
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SerialNumber {
    bytes: Vec<u8>,
}

impl SerialNumber {
    /// Create from the content bytes of the INTEGER.
    ///
    /// # Example
    ///
    /// ```
    /// use kensa_x509::SerialNumber;
    ///
    /// let serial = SerialNumber::from_bytes(vec![0x01, 0x02, 0x03]);
    /// assert_eq!(serial.format_hex(), "01:02:03");
    /// ```
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        SerialNumber { bytes }
    }

    /// The two's-complement content bytes exactly as encoded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_bigint(&self) -> BigInt {
        BigInt::from_signed_bytes_be(&self.bytes)
    }

    /// Format as hex string with colon separators.
    ///
    /// Returns lowercase hex like OpenSSL prints it. A leading zero octet
    /// that only keeps the value positive is dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use kensa_x509::SerialNumber;
    ///
    /// let serial = SerialNumber::from_bytes(vec![0x00, 0xc0, 0xff, 0xee]);
    /// assert_eq!(serial.format_hex(), "c0:ff:ee");
    /// ```
    pub fn format_hex(&self) -> String {
        let bytes = match self.bytes.as_slice() {
            [0x00, rest @ ..] if rest.first().is_some_and(|b| b & 0x80 != 0) => rest,
            bytes => bytes,
        };
        bytes
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hex())
    }
}

impl Serialize for SerialNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_hex())
    }
}

impl<'a> DecodableFrom<Tlv<'a>> for SerialNumber {}

impl<'a> Decoder<Tlv<'a>, SerialNumber> for Tlv<'a> {
    type Error = kensa_asn1::Error;

    fn decode(&self) -> Result<SerialNumber, Self::Error> {
        if self.is_empty() {
            return Err(kensa_asn1::Error::IntegerNoData {
                offset: self.offset(),
            });
        }
        Ok(SerialNumber::from_bytes(self.value().to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use kensa_der::{Reader, Tag};
    use rstest::rstest;

    use super::*;

    #[rstest(
        input,
        expected,
        case(vec![0x00], "00"),
        case(vec![0x12, 0x34], "12:34"),
        case(vec![0x00, 0xc0, 0xff, 0xee], "c0:ff:ee"),
        // the zero is significant here
        case(vec![0x00, 0x7f], "00:7f"),
        case(
            vec![
                0x68, 0x50, 0x34, 0x09, 0x3f, 0x17, 0x90, 0xa6, 0xc4, 0xb4, 0x6e, 0x89, 0x79, 0xf7,
                0x26, 0x3d, 0x9a, 0x7a, 0x4e, 0x1a,
            ],
            "68:50:34:09:3f:17:90:a6:c4:b4:6e:89:79:f7:26:3d:9a:7a:4e:1a"
        )
    )]
    fn test_format_hex(input: Vec<u8>, expected: &str) {
        assert_eq!(expected, SerialNumber::from_bytes(input).format_hex());
    }

    #[rstest(
        input,
        expected,
        case(vec![0x12, 0x34], 4660),
        case(vec![0x00, 0xff], 255),
        case(vec![0xff], -1)
    )]
    fn test_to_bigint(input: Vec<u8>, expected: i64) {
        assert_eq!(
            BigInt::from(expected),
            SerialNumber::from_bytes(input).to_bigint()
        );
    }

    #[test]
    fn test_decode_keeps_raw_bytes() {
        let input = [0x02, 0x03, 0x00, 0x80, 0x01];
        let tlv = Reader::new(&input).expect(Tag::INTEGER).unwrap();
        let serial: SerialNumber = tlv.decode().unwrap();
        assert_eq!(&[0x00, 0x80, 0x01], serial.as_bytes());
        assert_eq!("80:01", serial.format_hex());
    }

    #[test]
    fn test_decode_empty() {
        let input = [0x02, 0x00];
        let tlv = Reader::new(&input).expect(Tag::INTEGER).unwrap();
        let err = Decoder::<Tlv, SerialNumber>::decode(&tlv).unwrap_err();
        assert_eq!(kensa_asn1::Error::IntegerNoData { offset: 0 }, err);
    }
}
