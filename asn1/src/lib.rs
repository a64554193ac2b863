//! ASN.1 primitive types decoded from DER.
//!
//! The types here decode the *content* octets of a [`Tlv`]. Tag checks are
//! left to the caller, usually through [`ReadExt`], so the same decoders work
//! for universal tags and for IMPLICIT context-specific ones.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use kensa::decoder::{DecodableFrom, Decoder};
use kensa_der::{Reader, Tag, Tlv};
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use serde::{Serialize, Serializer};

pub mod error;
mod string;
mod time;

pub use error::Error;
pub use string::{Asn1String, StringKind};
pub use time::{Time, TimeError, TimeKind, parse_generalized_time, parse_utc_time};

pub type Result<T> = std::result::Result<T, Error>;

// ASN1 integer is possible to be a positive and negative value.
// This can be arbitrary sized values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    /// Returns a reference to the inner BigInt
    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    pub fn is_negative(&self) -> bool {
        self.inner.is_negative()
    }

    /// Converts the Integer to u32 if it fits in the range
    pub fn to_u32(&self) -> Option<u32> {
        self.inner.to_u32()
    }

    /// Converts the Integer to i64 if it fits in the range
    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    /// Converts the Integer to u64 if it fits in the range
    pub fn to_u64(&self) -> Option<u64> {
        self.inner.to_u64()
    }
}

impl Serialize for Integer {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.inner.to_string())
    }
}

impl From<&[u8]> for Integer {
    fn from(value: &[u8]) -> Self {
        Integer {
            inner: BigInt::from_signed_bytes_be(value),
        }
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl<'a> DecodableFrom<Tlv<'a>> for Integer {}

impl<'a> Decoder<Tlv<'a>, Integer> for Tlv<'a> {
    type Error = Error;

    fn decode(&self) -> Result<Integer> {
        if self.is_empty() {
            return Err(Error::IntegerNoData {
                offset: self.offset(),
            });
        }
        Ok(Integer::from(self.value()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn components(&self) -> &[u64] {
        &self.inner
    }

    /*
    X.690 8.19: each sub-identifier is base-128 with bit 8 set on all but
    the last octet. The first sub-identifier packs the first two arcs as
    (X * 40) + Y, with X = 2 taking every value from 80 upward.
    */
    fn from_content(value: &[u8], offset: usize) -> Result<Self> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData { offset });
        }

        let mut subids = Vec::new();
        let mut acc = 0u64;
        let mut pending = false;
        for &b in value {
            if !pending && b == 0x80 {
                return Err(Error::ObjectIdentifierNonMinimal { offset });
            }
            if acc > (u64::MAX >> 7) {
                return Err(Error::ObjectIdentifierOverflow { offset });
            }
            acc = (acc << 7) | u64::from(b & 0x7f);
            pending = b & 0x80 != 0;
            if !pending {
                subids.push(acc);
                acc = 0;
            }
        }
        if pending {
            return Err(Error::ObjectIdentifierIncompleteEncoding { offset });
        }

        let (first, rest) = subids
            .split_first()
            .ok_or(Error::ObjectIdentifierIncompleteEncoding { offset })?;
        let mut inner = match *first {
            n @ 0..40 => vec![0, n],
            n @ 40..80 => vec![1, n - 40],
            n => vec![2, n - 80],
        };
        inner.extend_from_slice(rest);
        Ok(ObjectIdentifier { inner })
    }
}

impl Serialize for ObjectIdentifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        Self::from_content(value, 0)
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self.inner.split_first() {
            Some((n, rest)) => rest
                .iter()
                .fold(n.to_string(), |s, n| s + "." + &n.to_string()),
            None => String::new(),
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let inner = s
            .split('.')
            .map(|c| {
                c.parse::<u64>()
                    .map_err(|_| Error::ObjectIdentifierInvalidComponent(c.to_string()))
            })
            .collect::<Result<Vec<u64>>>()?;
        if inner.len() < 2 {
            return Err(Error::ObjectIdentifierTooFewComponents);
        }
        Ok(ObjectIdentifier { inner })
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl PartialEq<ObjectIdentifier> for &str {
    fn eq(&self, other: &ObjectIdentifier) -> bool {
        *self == other.to_string()
    }
}

impl<'a> DecodableFrom<Tlv<'a>> for ObjectIdentifier {}

impl<'a> Decoder<Tlv<'a>, ObjectIdentifier> for Tlv<'a> {
    type Error = Error;

    fn decode(&self) -> Result<ObjectIdentifier> {
        ObjectIdentifier::from_content(self.value(), self.offset())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl Serialize for BitString {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("BitString", 2)?;
        state.serialize_field("bitLength", &self.bit_len())?;
        state.serialize_field("bits", &hex::encode(&self.data))?;
        state.end()
    }
}

impl BitString {
    /// Creates a new BitString with the specified number of unused bits and data
    pub fn new(unused: u8, data: Vec<u8>) -> Self {
        BitString { unused, data }
    }

    /// Returns the number of unused bits in the last byte
    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    /// Returns a reference to the underlying byte data
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the total number of bits (excluding unused bits)
    pub fn bit_len(&self) -> usize {
        (self.data.len() * 8).saturating_sub(usize::from(self.unused))
    }

    /// Named-bit lookup, MSB first. Bits past the end read as unset.
    pub fn bit(&self, index: usize) -> bool {
        if index >= self.bit_len() {
            return false;
        }
        self.data
            .get(index / 8)
            .is_some_and(|byte| byte & (0x80 >> (index % 8)) != 0)
    }

    fn from_content(value: &[u8], offset: usize) -> Result<Self> {
        let (&unused, data) = value
            .split_first()
            .ok_or(Error::BitStringNoData { offset })?;
        if unused > 7 || (data.is_empty() && unused != 0) {
            return Err(Error::BitStringUnusedBitsOutOfRange { offset, unused });
        }
        Ok(BitString {
            unused,
            data: data.to_vec(),
        })
    }
}

impl AsRef<[u8]> for BitString {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        Self::from_content(value, 0)
    }
}

impl Display for BitString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bits = (0..self.bit_len())
            .map(|i| if self.bit(i) { '1' } else { '0' })
            .collect::<String>();
        write!(f, "{}", bits)
    }
}

impl<'a> DecodableFrom<Tlv<'a>> for BitString {}

impl<'a> Decoder<Tlv<'a>, BitString> for Tlv<'a> {
    type Error = Error;

    fn decode(&self) -> Result<BitString> {
        BitString::from_content(self.value(), self.offset())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl Serialize for OctetString {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(&self.inner))
    }
}

impl OctetString {
    /// Returns the inner bytes as a slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    /// Consumes self and returns the inner bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.inner
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(value: Vec<u8>) -> Self {
        OctetString { inner: value }
    }
}

impl From<&[u8]> for OctetString {
    fn from(value: &[u8]) -> Self {
        OctetString {
            inner: value.to_vec(),
        }
    }
}

impl Display for OctetString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.inner))
    }
}

impl<'a> DecodableFrom<Tlv<'a>> for OctetString {}

impl<'a> Decoder<Tlv<'a>, OctetString> for Tlv<'a> {
    type Error = Error;

    fn decode(&self) -> Result<OctetString> {
        Ok(OctetString::from(self.value()))
    }
}

/// Typed reads on top of [`Reader`]. Each method checks the universal tag
/// and then decodes the content.
pub trait ReadExt<'a> {
    fn read_boolean(&mut self) -> Result<bool>;
    fn read_null(&mut self) -> Result<()>;
    fn read_integer(&mut self) -> Result<Integer>;
    fn read_oid(&mut self) -> Result<ObjectIdentifier>;
    fn read_bit_string(&mut self) -> Result<BitString>;
    fn read_octet_string(&mut self) -> Result<&'a [u8]>;
    fn read_utc_time(&mut self) -> Result<DateTime<Utc>>;
    fn read_generalized_time(&mut self) -> Result<DateTime<Utc>>;
    /// `Time ::= CHOICE { utcTime UTCTime, generalTime GeneralizedTime }`
    fn read_time(&mut self) -> Result<Time>;
    /// Any of the character string types.
    fn read_string(&mut self) -> Result<Asn1String>;
}

impl<'a> ReadExt<'a> for Reader<'a> {
    fn read_boolean(&mut self) -> Result<bool> {
        let tlv = self.expect(Tag::BOOLEAN)?;
        // DER: TRUE is 0xFF, FALSE is 0x00
        match tlv.value() {
            [0x00] => Ok(false),
            [0xff] => Ok(true),
            _ => Err(Error::InvalidBoolean {
                offset: tlv.offset(),
            }),
        }
    }

    fn read_null(&mut self) -> Result<()> {
        let tlv = self.expect(Tag::NULL)?;
        if !tlv.is_empty() {
            return Err(Error::InvalidNull {
                offset: tlv.offset(),
            });
        }
        Ok(())
    }

    fn read_integer(&mut self) -> Result<Integer> {
        self.expect(Tag::INTEGER)?.decode()
    }

    fn read_oid(&mut self) -> Result<ObjectIdentifier> {
        self.expect(Tag::OBJECT_IDENTIFIER)?.decode()
    }

    fn read_bit_string(&mut self) -> Result<BitString> {
        self.expect(Tag::BIT_STRING)?.decode()
    }

    fn read_octet_string(&mut self) -> Result<&'a [u8]> {
        Ok(self.expect(Tag::OCTET_STRING)?.value())
    }

    fn read_utc_time(&mut self) -> Result<DateTime<Utc>> {
        time::decode_utc_time(&self.expect(Tag::UTC_TIME)?)
    }

    fn read_generalized_time(&mut self) -> Result<DateTime<Utc>> {
        time::decode_generalized_time(&self.expect(Tag::GENERALIZED_TIME)?)
    }

    fn read_time(&mut self) -> Result<Time> {
        let offset = self.offset();
        match self.peek_tag()? {
            Some(Tag::UTC_TIME | Tag::GENERALIZED_TIME) => self.read_tlv()?.decode(),
            Some(found) => Err(Error::NotATime { offset, found }),
            None => Err(kensa_der::Error::MissingElement {
                offset,
                expected: Tag::UTC_TIME,
            }
            .into()),
        }
    }

    fn read_string(&mut self) -> Result<Asn1String> {
        self.read_tlv()?.decode()
    }
}
