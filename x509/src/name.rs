//! Name and related types
//!
//! Defined in RFC 5280 Section 4.1.2.4
//!
//! ```asn1
//! Name ::= CHOICE { -- only one possibility for now --
//!     rdnSequence  RDNSequence
//! }
//!
//! RDNSequence ::= SEQUENCE OF RelativeDistinguishedName
//!
//! RelativeDistinguishedName ::= SET SIZE (1..MAX) OF AttributeTypeAndValue
//!
//! AttributeTypeAndValue ::= SEQUENCE {
//!     type     AttributeType,
//!     value    AttributeValue
//! }
//!
//! AttributeType ::= OBJECT IDENTIFIER
//! AttributeValue ::= ANY -- DEFINED BY AttributeType
//! ```

use std::fmt;

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{Asn1String, ObjectIdentifier, ReadExt, StringKind};
use kensa_der::{Tag, Tlv};
use serde::{Serialize, Serializer, ser::SerializeStruct};
use sha1::{Digest, Sha1};

use crate::OidName;

/// X.509 Distinguished Name
///
/// RDNs and the attributes inside each RDN keep their encoding order.
/// `Display` prints the RDNs most specific first, the way RFC 4514 does.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Name {
    rdn_sequence: Vec<RelativeDistinguishedName>,
}

impl Name {
    pub fn new(rdn_sequence: Vec<RelativeDistinguishedName>) -> Self {
        Name { rdn_sequence }
    }

    /// RDNs in encoding order.
    pub fn rdn_sequence(&self) -> &[RelativeDistinguishedName] {
        &self.rdn_sequence
    }

    /// Every attribute of every RDN, in encoding order.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeTypeAndValue> {
        self.rdn_sequence.iter().flat_map(|rdn| rdn.attributes())
    }

    /// The most specific commonName, which is the last one encoded.
    pub fn common_name(&self) -> Option<&str> {
        self.attributes()
            .filter(|attr| attr.attribute_type == AttributeTypeAndValue::OID_COMMON_NAME)
            .filter_map(|attr| attr.value.as_str())
            .last()
    }

    pub fn is_empty(&self) -> bool {
        self.rdn_sequence.is_empty()
    }

    /// OpenSSL's `X509_NAME_hash`: the first four bytes, little-endian, of
    /// the SHA-1 of the canonical encoding. `openssl x509 -subject_hash`
    /// prints it as eight hex digits and `c_rehash` names links after it.
    ///
    /// The canonical encoding is the RDN SETs without the outer SEQUENCE.
    /// Directory strings are re-encoded as UTF8String, lowercased, with
    /// surrounding whitespace dropped and inner runs folded to one space.
    pub fn hash(&self) -> u32 {
        let canonical = self
            .rdn_sequence
            .iter()
            .flat_map(|rdn| rdn.canonical_der())
            .collect::<Vec<u8>>();
        let digest = Sha1::digest(&canonical);
        u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .rdn_sequence
            .iter()
            .rev()
            .map(|rdn| rdn.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}", formatted)
    }
}

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Name", 3)?;
        state.serialize_field("distinguishedName", &self.to_string())?;
        state.serialize_field("rdnSequence", &self.rdn_sequence)?;
        state.serialize_field("hash", &format!("{:08x}", self.hash()))?;
        state.end()
    }
}

impl<'a> DecodableFrom<Tlv<'a>> for Name {}

impl<'a> Decoder<Tlv<'a>, Name> for Tlv<'a> {
    type Error = kensa_asn1::Error;

    fn decode(&self) -> Result<Name, Self::Error> {
        let mut reader = self.reader();
        let mut rdn_sequence: Vec<RelativeDistinguishedName> = Vec::new();
        while !reader.is_empty() {
            rdn_sequence.push(reader.expect(Tag::SET)?.decode()?);
        }
        Ok(Name { rdn_sequence })
    }
}

/// Relative Distinguished Name (RDN)
///
/// Usually a single attribute. Multi-valued RDNs print joined with `+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeDistinguishedName {
    attributes: Vec<AttributeTypeAndValue>,
}

impl RelativeDistinguishedName {
    pub fn new(attributes: Vec<AttributeTypeAndValue>) -> Self {
        RelativeDistinguishedName { attributes }
    }

    pub fn attributes(&self) -> &[AttributeTypeAndValue] {
        &self.attributes
    }

    fn canonical_der(&self) -> Vec<u8> {
        let mut entries = self
            .attributes
            .iter()
            .map(AttributeTypeAndValue::canonical_der)
            .collect::<Vec<_>>();
        // SET OF is ordered by encoding
        entries.sort();
        der_tlv(SET, &entries.concat())
    }
}

impl fmt::Display for RelativeDistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .attributes
            .iter()
            .map(|attr| attr.to_string())
            .collect::<Vec<_>>()
            .join("+");
        write!(f, "{}", formatted)
    }
}

impl Serialize for RelativeDistinguishedName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.attributes.serialize(serializer)
    }
}

impl<'a> DecodableFrom<Tlv<'a>> for RelativeDistinguishedName {}

impl<'a> Decoder<Tlv<'a>, RelativeDistinguishedName> for Tlv<'a> {
    type Error = kensa_asn1::Error;

    fn decode(&self) -> Result<RelativeDistinguishedName, Self::Error> {
        let mut reader = self.reader();
        // SET SIZE (1..MAX)
        if reader.is_empty() {
            return Err(kensa_der::Error::MissingElement {
                offset: self.value_offset(),
                expected: Tag::SEQUENCE,
            }
            .into());
        }
        let mut attributes: Vec<AttributeTypeAndValue> = Vec::new();
        while !reader.is_empty() {
            attributes.push(reader.expect(Tag::SEQUENCE)?.decode()?);
        }
        Ok(RelativeDistinguishedName { attributes })
    }
}

/// Value of a name attribute.
///
/// Directory strings are decoded. Anything else keeps its DER encoding and
/// prints as `#` followed by hex, as RFC 4514 section 2.4 prescribes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    String(Asn1String),
    Other { tag: Tag, raw: Vec<u8> },
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s.as_str()),
            AttributeValue::Other { .. } => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "{}", escape(s.as_str())),
            AttributeValue::Other { raw, .. } => write!(f, "#{}", hex::encode(raw)),
        }
    }
}

impl Serialize for AttributeValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            AttributeValue::String(s) => s.serialize(serializer),
            AttributeValue::Other { raw, .. } => {
                serializer.serialize_str(&format!("#{}", hex::encode(raw)))
            }
        }
    }
}

/*
RFC 4514 Section 2.4

- a space or "#" character occurring at the beginning of the string
- a space character occurring at the end of the string
- one of the characters '"', '+', ',', ';', '<', '>', or '\'
- the null (U+0000) character
*/
fn escape(value: &str) -> String {
    let last = value.chars().count().saturating_sub(1);
    let mut escaped = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        match c {
            '"' | '+' | ',' | ';' | '<' | '>' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '#' if i == 0 => escaped.push_str("\\#"),
            ' ' if i == 0 || i == last => escaped.push_str("\\ "),
            '\0' => escaped.push_str("\\00"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Attribute Type and Value pair
///
/// Represents a single attribute in an X.509 Name, such as CN=example.com
/// or O=Example Organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTypeAndValue {
    attribute_type: ObjectIdentifier,
    value: AttributeValue,
}

impl AttributeTypeAndValue {
    pub const OID_COMMON_NAME: &'static str = "2.5.4.3";
    pub const OID_SURNAME: &'static str = "2.5.4.4";
    pub const OID_SERIAL_NUMBER: &'static str = "2.5.4.5";
    pub const OID_COUNTRY_NAME: &'static str = "2.5.4.6";
    pub const OID_LOCALITY_NAME: &'static str = "2.5.4.7";
    pub const OID_STATE_OR_PROVINCE_NAME: &'static str = "2.5.4.8";
    pub const OID_STREET_ADDRESS: &'static str = "2.5.4.9";
    pub const OID_ORGANIZATION_NAME: &'static str = "2.5.4.10";
    pub const OID_ORGANIZATIONAL_UNIT_NAME: &'static str = "2.5.4.11";
    pub const OID_TITLE: &'static str = "2.5.4.12";
    pub const OID_BUSINESS_CATEGORY: &'static str = "2.5.4.15";
    pub const OID_POSTAL_CODE: &'static str = "2.5.4.17";
    pub const OID_GIVEN_NAME: &'static str = "2.5.4.42";
    pub const OID_INITIALS: &'static str = "2.5.4.43";
    pub const OID_GENERATION_QUALIFIER: &'static str = "2.5.4.44";
    pub const OID_DN_QUALIFIER: &'static str = "2.5.4.46";
    pub const OID_PSEUDONYM: &'static str = "2.5.4.65";
    pub const OID_USER_ID: &'static str = "0.9.2342.19200300.100.1.1";
    pub const OID_DOMAIN_COMPONENT: &'static str = "0.9.2342.19200300.100.1.25";
    pub const OID_EMAIL_ADDRESS: &'static str = "1.2.840.113549.1.9.1";
    // EV guidelines, jurisdiction of incorporation
    pub const OID_JURISDICTION_LOCALITY: &'static str = "1.3.6.1.4.1.311.60.2.1.1";
    pub const OID_JURISDICTION_STATE: &'static str = "1.3.6.1.4.1.311.60.2.1.2";
    pub const OID_JURISDICTION_COUNTRY: &'static str = "1.3.6.1.4.1.311.60.2.1.3";

    pub fn new(attribute_type: ObjectIdentifier, value: AttributeValue) -> Self {
        AttributeTypeAndValue {
            attribute_type,
            value,
        }
    }

    pub fn attribute_type(&self) -> &ObjectIdentifier {
        &self.attribute_type
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    fn canonical_der(&self) -> Vec<u8> {
        let value = match &self.value {
            // OpenSSL leaves NumericString out of the canonical string set
            AttributeValue::String(s) if s.kind() == StringKind::Numeric => {
                der_tlv(NUMERIC_STRING, s.as_str().as_bytes())
            }
            AttributeValue::String(s) => der_tlv(UTF8_STRING, canonical_text(s.as_str()).as_bytes()),
            AttributeValue::Other { raw, .. } => raw.clone(),
        };
        let oid = der_tlv(OBJECT_IDENTIFIER, &oid_content(&self.attribute_type));
        der_tlv(SEQUENCE, &[oid, value].concat())
    }

    /// Short name such as `CN`, or the dotted OID for unknown types.
    pub fn key(&self) -> String {
        self.oid_name()
            .map(str::to_string)
            .unwrap_or_else(|| self.attribute_type.to_string())
    }
}

impl OidName for AttributeTypeAndValue {
    fn oid_name(&self) -> Option<&'static str> {
        let name = match self.attribute_type.to_string().as_str() {
            Self::OID_COMMON_NAME => "CN",
            Self::OID_SURNAME => "SN",
            Self::OID_SERIAL_NUMBER => "serialNumber",
            Self::OID_COUNTRY_NAME => "C",
            Self::OID_LOCALITY_NAME => "L",
            Self::OID_STATE_OR_PROVINCE_NAME => "ST",
            Self::OID_STREET_ADDRESS => "STREET",
            Self::OID_ORGANIZATION_NAME => "O",
            Self::OID_ORGANIZATIONAL_UNIT_NAME => "OU",
            Self::OID_TITLE => "title",
            Self::OID_BUSINESS_CATEGORY => "businessCategory",
            Self::OID_POSTAL_CODE => "postalCode",
            Self::OID_GIVEN_NAME => "GN",
            Self::OID_INITIALS => "initials",
            Self::OID_GENERATION_QUALIFIER => "generationQualifier",
            Self::OID_DN_QUALIFIER => "dnQualifier",
            Self::OID_PSEUDONYM => "pseudonym",
            Self::OID_USER_ID => "UID",
            Self::OID_DOMAIN_COMPONENT => "DC",
            Self::OID_EMAIL_ADDRESS => "emailAddress",
            Self::OID_JURISDICTION_LOCALITY => "jurisdictionL",
            Self::OID_JURISDICTION_STATE => "jurisdictionST",
            Self::OID_JURISDICTION_COUNTRY => "jurisdictionC",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for AttributeTypeAndValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key(), self.value)
    }
}

impl Serialize for AttributeTypeAndValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("AttributeTypeAndValue", 3)?;
        state.serialize_field("type", &self.key())?;
        state.serialize_field("oid", &self.attribute_type)?;
        state.serialize_field("value", &self.value)?;
        state.end()
    }
}

impl<'a> DecodableFrom<Tlv<'a>> for AttributeTypeAndValue {}

impl<'a> Decoder<Tlv<'a>, AttributeTypeAndValue> for Tlv<'a> {
    type Error = kensa_asn1::Error;

    fn decode(&self) -> Result<AttributeTypeAndValue, Self::Error> {
        let mut reader = self.reader();
        let attribute_type = reader.read_oid()?;
        let value = match reader.peek_tag()? {
            None => {
                return Err(kensa_der::Error::MissingElement {
                    offset: reader.offset(),
                    expected: Tag::UTF8_STRING,
                }
                .into());
            }
            Some(tag) if StringKind::from_tag(tag).is_some() => {
                AttributeValue::String(reader.read_string()?)
            }
            Some(tag) => AttributeValue::Other {
                tag,
                raw: reader.read_tlv()?.raw().to_vec(),
            },
        };
        reader.finish()?;

        Ok(AttributeTypeAndValue {
            attribute_type,
            value,
        })
    }
}

// identifier octets used by the canonical encoding
const OBJECT_IDENTIFIER: u8 = 0x06;
const UTF8_STRING: u8 = 0x0c;
const NUMERIC_STRING: u8 = 0x12;
const SEQUENCE: u8 = 0x30;
const SET: u8 = 0x31;

fn is_canonical_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

fn canonical_text(value: &str) -> String {
    value
        .split(is_canonical_space)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

fn der_tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    let len = content.len();
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let octets = len.to_be_bytes();
        let skip = octets.iter().take_while(|&&b| b == 0).count();
        out.push(0x80 | (octets.len() - skip) as u8);
        out.extend_from_slice(&octets[skip..]);
    }
    out.extend_from_slice(content);
    out
}

fn push_base128(out: &mut Vec<u8>, mut n: u64) {
    let mut digits = vec![(n & 0x7f) as u8];
    n >>= 7;
    while n > 0 {
        digits.push((n & 0x7f) as u8 | 0x80);
        n >>= 7;
    }
    out.extend(digits.iter().rev());
}

fn oid_content(oid: &ObjectIdentifier) -> Vec<u8> {
    let mut out = Vec::new();
    if let [first, second, rest @ ..] = oid.components() {
        push_base128(&mut out, first.saturating_mul(40).saturating_add(*second));
        for &arc in rest {
            push_base128(&mut out, arc);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use kensa_der::Reader;
    use rstest::rstest;

    use super::*;

    fn attr(oid: &str, value: &str) -> AttributeTypeAndValue {
        AttributeTypeAndValue::new(
            ObjectIdentifier::from_str(oid).unwrap(),
            AttributeValue::String(Asn1String::new(StringKind::Utf8, value)),
        )
    }

    fn rdn(attributes: Vec<AttributeTypeAndValue>) -> RelativeDistinguishedName {
        RelativeDistinguishedName::new(attributes)
    }

    #[rstest(
        input,
        expected,
        case("plain", "plain"),
        case("Kensa Test, Inc.", "Kensa Test\\, Inc."),
        case("a+b", "a\\+b"),
        case("\"quoted\"", "\\\"quoted\\\""),
        case("<tag>;", "\\<tag\\>\\;"),
        case("back\\slash", "back\\\\slash"),
        case("#hash", "\\#hash"),
        case("mid#hash", "mid#hash"),
        case(" padded ", "\\ padded\\ "),
        case("nul\0", "nul\\00"),
        case(" ", "\\ "),
        case("", "")
    )]
    fn test_escape(input: &str, expected: &str) {
        assert_eq!(expected, escape(input));
    }

    #[test]
    fn test_display_most_specific_first() {
        let name = Name::new(vec![
            rdn(vec![attr(AttributeTypeAndValue::OID_COUNTRY_NAME, "JP")]),
            rdn(vec![attr(
                AttributeTypeAndValue::OID_ORGANIZATION_NAME,
                "Kensa Test, Inc.",
            )]),
            rdn(vec![
                attr(AttributeTypeAndValue::OID_COMMON_NAME, "www.example.com"),
                attr("1.2.3.4", "x"),
            ]),
        ]);
        assert_eq!(
            "CN=www.example.com+1.2.3.4=x, O=Kensa Test\\, Inc., C=JP",
            name.to_string()
        );
        assert_eq!(Some("www.example.com"), name.common_name());
        assert_eq!(4, name.attributes().count());
    }

    #[rstest(
        oid,
        expected,
        case(AttributeTypeAndValue::OID_JURISDICTION_COUNTRY, "jurisdictionC"),
        case(AttributeTypeAndValue::OID_JURISDICTION_STATE, "jurisdictionST"),
        case(AttributeTypeAndValue::OID_JURISDICTION_LOCALITY, "jurisdictionL"),
        case(AttributeTypeAndValue::OID_BUSINESS_CATEGORY, "businessCategory"),
        case(AttributeTypeAndValue::OID_DOMAIN_COMPONENT, "DC"),
        case(AttributeTypeAndValue::OID_EMAIL_ADDRESS, "emailAddress"),
        case("2.5.4.99", "2.5.4.99")
    )]
    fn test_attribute_key(oid: &str, expected: &str) {
        assert_eq!(expected, attr(oid, "v").key());
    }

    #[test]
    fn test_decode_name() {
        // SEQUENCE { SET { SEQUENCE { C, PrintableString "JP" } },
        //            SET { SEQUENCE { CN, UTF8String "a" }, SEQUENCE { 2.5.4.45, BIT STRING } } }
        let input = vec![
            0x30, 0x29, 0x31, 0x0b, 0x30, 0x09, 0x06, 0x03, 0x55, 0x04, 0x06, 0x13, 0x02, 0x4a,
            0x50, 0x31, 0x1a, 0x30, 0x0a, 0x06, 0x03, 0x55, 0x04, 0x03, 0x0c, 0x03, 0x61, 0x62,
            0x63, 0x30, 0x0c, 0x06, 0x03, 0x55, 0x04, 0x2d, 0x03, 0x05, 0x00, 0xde, 0xad, 0xbe,
            0xef,
        ];
        let tlv = Reader::new(&input).expect(Tag::SEQUENCE).unwrap();
        let name: Name = tlv.decode().unwrap();

        assert_eq!(2, name.rdn_sequence().len());
        assert_eq!(2, name.rdn_sequence()[1].attributes().len());
        assert_eq!("CN=abc+2.5.4.45=#030500deadbeef, C=JP", name.to_string());
        assert_eq!(Some("abc"), name.common_name());
    }

    #[test]
    fn test_decode_empty_name() {
        let input = vec![0x30, 0x00];
        let tlv = Reader::new(&input).expect(Tag::SEQUENCE).unwrap();
        let name: Name = tlv.decode().unwrap();
        assert!(name.is_empty());
        assert_eq!("", name.to_string());
    }

    #[rstest(
        input,
        // RDN is an empty SET
        case(vec![0x30, 0x02, 0x31, 0x00]),
        // RDN is a SEQUENCE instead of a SET
        case(vec![0x30, 0x04, 0x30, 0x02, 0x05, 0x00]),
        // attribute without a value
        case(vec![0x30, 0x09, 0x31, 0x07, 0x30, 0x05, 0x06, 0x03, 0x55, 0x04, 0x03]),
        // PrintableString with an exclamation mark
        case(vec![
            0x30, 0x0c, 0x31, 0x0a, 0x30, 0x08, 0x06, 0x03, 0x55, 0x04, 0x03, 0x13, 0x01, 0x21
        ])
    )]
    fn test_decode_name_error(input: Vec<u8>) {
        let tlv = Reader::new(&input).expect(Tag::SEQUENCE).unwrap();
        assert!(Decoder::<Tlv, Name>::decode(&tlv).is_err());
    }

    #[test]
    fn test_decode_printable_underscore() {
        // SEQUENCE { SET { SEQUENCE { CN, PrintableString "a_b" } } }
        let input = vec![
            0x30, 0x0e, 0x31, 0x0c, 0x30, 0x0a, 0x06, 0x03, 0x55, 0x04, 0x03, 0x13, 0x03, 0x61,
            0x5f, 0x62,
        ];
        let tlv = Reader::new(&input).expect(Tag::SEQUENCE).unwrap();
        let name: Name = tlv.decode().unwrap();
        assert_eq!("CN=a_b", name.to_string());
    }

    #[rstest(
        input,
        expected,
        case("Kensa Test", "kensa test"),
        case("  Leading and trailing  ", "leading and trailing"),
        case("inner \t\r\n\x0b\x0c runs", "inner runs"),
        case("ÉCOLE", "École"),
        case(" \t ", "")
    )]
    fn test_canonical_text(input: &str, expected: &str) {
        assert_eq!(expected, canonical_text(input));
    }

    #[test]
    fn test_hash_empty_name() {
        // SHA-1 of no bytes is da39a3ee...
        assert_eq!(0xeea339da, Name::default().hash());
    }

    #[test]
    fn test_hash_canonical_forms_agree() {
        let cn = |kind: StringKind, value: &str| {
            AttributeTypeAndValue::new(
                ObjectIdentifier::from_str(AttributeTypeAndValue::OID_COMMON_NAME).unwrap(),
                AttributeValue::String(Asn1String::new(kind, value)),
            )
        };
        let org = attr(AttributeTypeAndValue::OID_ORGANIZATION_NAME, "Kensa");

        let plain = Name::new(vec![rdn(vec![cn(StringKind::Utf8, "example"), org.clone()])]);
        let folded = Name::new(vec![rdn(vec![
            org,
            cn(StringKind::Printable, "  EXAMPLE "),
        ])]);
        assert_eq!(plain.hash(), folded.hash());

        let other = Name::new(vec![rdn(vec![cn(StringKind::Utf8, "example2")])]);
        assert_ne!(plain.hash(), other.hash());
    }

    #[rstest(
        oid,
        expected,
        case("2.5.4.3", vec![0x55, 0x04, 0x03]),
        case("1.2.840.113549.1.9.1", vec![0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x09, 0x01]),
        case("2.999", vec![0x88, 0x37])
    )]
    fn test_oid_content(oid: &str, expected: Vec<u8>) {
        assert_eq!(expected, oid_content(&ObjectIdentifier::from_str(oid).unwrap()));
    }
}
