use std::fmt::{Display, Formatter};

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_der::{Tag, Tlv};
use serde::{Serialize, Serializer};

use crate::error::Error;

/// Character string types that appear in certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKind {
    Utf8,
    Printable,
    Ia5,
    Numeric,
    Visible,
    Teletex,
    Bmp,
    Universal,
}

impl StringKind {
    pub fn from_tag(tag: Tag) -> Option<Self> {
        let kind = match tag {
            Tag::UTF8_STRING => StringKind::Utf8,
            Tag::PRINTABLE_STRING => StringKind::Printable,
            Tag::IA5_STRING => StringKind::Ia5,
            Tag::NUMERIC_STRING => StringKind::Numeric,
            Tag::VISIBLE_STRING => StringKind::Visible,
            Tag::TELETEX_STRING => StringKind::Teletex,
            Tag::BMP_STRING => StringKind::Bmp,
            Tag::UNIVERSAL_STRING => StringKind::Universal,
            _ => return None,
        };
        Some(kind)
    }

    pub fn tag(self) -> Tag {
        match self {
            StringKind::Utf8 => Tag::UTF8_STRING,
            StringKind::Printable => Tag::PRINTABLE_STRING,
            StringKind::Ia5 => Tag::IA5_STRING,
            StringKind::Numeric => Tag::NUMERIC_STRING,
            StringKind::Visible => Tag::VISIBLE_STRING,
            StringKind::Teletex => Tag::TELETEX_STRING,
            StringKind::Bmp => Tag::BMP_STRING,
            StringKind::Universal => Tag::UNIVERSAL_STRING,
        }
    }

    /// Decodes content octets of this string type. `None` if they are not
    /// valid for the type.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            StringKind::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            StringKind::Printable => ascii_if(bytes, is_printable),
            StringKind::Ia5 => ascii_if(bytes, |b| b.is_ascii()),
            StringKind::Numeric => ascii_if(bytes, |b| b.is_ascii_digit() || b == b' '),
            StringKind::Visible => ascii_if(bytes, |b| (0x20..=0x7e).contains(&b)),
            // T.61 is approximated by Latin-1, as most decoders do
            StringKind::Teletex => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            StringKind::Bmp => {
                if bytes.len() % 2 != 0 {
                    return None;
                }
                let units = bytes
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]));
                char::decode_utf16(units).collect::<Result<String, _>>().ok()
            }
            StringKind::Universal => {
                if bytes.len() % 4 != 0 {
                    return None;
                }
                bytes
                    .chunks_exact(4)
                    .map(|c| char::from_u32(u32::from_be_bytes([c[0], c[1], c[2], c[3]])))
                    .collect()
            }
        }
    }
}

impl Display for StringKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/*
X.680 41.4 PrintableString

  A-Z a-z 0-9 space ' ( ) + , - . / : = ?

`*`, `&`, `@` and `_` are accepted as well, as OpenSSL does.
*/
fn is_printable(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b' ' | b'\''
                | b'('
                | b')'
                | b'+'
                | b','
                | b'-'
                | b'.'
                | b'/'
                | b':'
                | b'='
                | b'?'
                | b'*'
                | b'&'
                | b'@'
                | b'_'
        )
}

fn ascii_if(bytes: &[u8], allowed: impl Fn(u8) -> bool) -> Option<String> {
    if bytes.iter().all(|&b| allowed(b)) {
        // every byte passed an ASCII-only predicate
        Some(bytes.iter().map(|&b| char::from(b)).collect())
    } else {
        None
    }
}

/// A decoded character string together with its ASN.1 type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asn1String {
    kind: StringKind,
    value: String,
}

impl Asn1String {
    pub fn new(kind: StringKind, value: impl Into<String>) -> Self {
        Asn1String {
            kind,
            value: value.into(),
        }
    }

    pub fn kind(&self) -> StringKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl Display for Asn1String {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Serialize for Asn1String {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.value)
    }
}

impl<'a> DecodableFrom<Tlv<'a>> for Asn1String {}

impl<'a> Decoder<Tlv<'a>, Asn1String> for Tlv<'a> {
    type Error = Error;

    fn decode(&self) -> Result<Asn1String, Self::Error> {
        let offset = self.offset();
        let kind = StringKind::from_tag(self.tag()).ok_or(Error::NotAString {
            offset,
            found: self.tag(),
        })?;
        kind.decode(self.value())
            .map(|value| Asn1String { kind, value })
            .ok_or(Error::InvalidString { offset, kind })
    }
}
