use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{ObjectIdentifier, ReadExt, StringKind};
use kensa_der::{Class, Tag, Tlv};
use serde::Serialize;

use super::error::{self, Kind};
use super::serialize_hex;
use crate::Name;

/*
RFC 5280 Section 4.2.1.6
GeneralNames ::= SEQUENCE SIZE (1..MAX) OF GeneralName

GeneralName ::= CHOICE {
    otherName                 [0] OtherName,
    rfc822Name                [1] IA5String,
    dNSName                   [2] IA5String,
    x400Address               [3] ORAddress,
    directoryName             [4] Name,
    ediPartyName              [5] EDIPartyName,
    uniformResourceIdentifier [6] IA5String,
    iPAddress                 [7] OCTET STRING,
    registeredID              [8] OBJECT IDENTIFIER
}

OtherName ::= SEQUENCE {
    type-id    OBJECT IDENTIFIER,
    value      [0] EXPLICIT ANY DEFINED BY type-id
}
*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GeneralName {
    #[serde(rename = "otherName")]
    OtherName(OtherName),
    #[serde(rename = "rfc822Name")]
    Rfc822Name(String),
    #[serde(rename = "dNSName")]
    DnsName(String),
    #[serde(rename = "directoryName")]
    DirectoryName(Name),
    #[serde(rename = "uniformResourceIdentifier")]
    Uri(String),
    /// 4 octets for IPv4, 16 for IPv6
    #[serde(rename = "iPAddress")]
    IpAddress(IpAddr),
    #[serde(rename = "registeredID")]
    RegisteredId(ObjectIdentifier),
    /// x400Address [3] and ediPartyName [5], kept as raw content octets
    #[serde(rename = "unsupported")]
    Unsupported {
        tag: u32,
        #[serde(serialize_with = "serialize_hex")]
        value: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherName {
    pub type_id: ObjectIdentifier,
    /// DER encoding of the value inside the `[0] EXPLICIT` wrapper.
    #[serde(serialize_with = "serialize_hex")]
    pub value: Vec<u8>,
}

impl fmt::Display for GeneralName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneralName::DnsName(dns) => write!(f, "DNS:{}", dns),
            GeneralName::IpAddress(ip) => write!(f, "IP Address:{}", ip),
            GeneralName::Rfc822Name(email) => write!(f, "email:{}", email),
            GeneralName::Uri(uri) => write!(f, "URI:{}", uri),
            GeneralName::DirectoryName(name) => write!(f, "DirName:{}", name),
            GeneralName::RegisteredId(oid) => write!(f, "Registered ID:{}", oid),
            GeneralName::OtherName(other) => write!(f, "othername:{}", other.type_id),
            GeneralName::Unsupported { tag: 3, .. } => write!(f, "X400Name:<unsupported>"),
            GeneralName::Unsupported { tag: 5, .. } => write!(f, "EdiPartyName:<unsupported>"),
            GeneralName::Unsupported { tag, .. } => write!(f, "[{}]:<unsupported>", tag),
        }
    }
}

fn ia5(tlv: &Tlv<'_>) -> error::Result<String> {
    StringKind::Ia5
        .decode(tlv.value())
        .ok_or(error::Error::GeneralNameInvalidAscii)
}

fn ip_address(octets: &[u8]) -> error::Result<IpAddr> {
    if let Ok(v4) = <[u8; 4]>::try_from(octets) {
        return Ok(IpAddr::V4(Ipv4Addr::from(v4)));
    }
    if let Ok(v6) = <[u8; 16]>::try_from(octets) {
        return Ok(IpAddr::V6(Ipv6Addr::from(v6)));
    }
    Err(error::Error::InvalidIpAddressLength(octets.len()))
}

impl<'a> DecodableFrom<Tlv<'a>> for GeneralName {}

impl<'a> Decoder<Tlv<'a>, GeneralName> for Tlv<'a> {
    type Error = error::Error;

    fn decode(&self) -> Result<GeneralName, Self::Error> {
        let tag = self.tag();
        if tag.class() != Class::ContextSpecific {
            return Err(error::Error::UnknownGeneralNameTag(tag));
        }
        let name = match (tag.number(), tag.is_constructed()) {
            (0, true) => {
                let mut reader = self.reader();
                let type_id = reader.read_oid()?;
                let value = reader.expect(Tag::context_specific(0, true))?;
                reader.finish()?;
                GeneralName::OtherName(OtherName {
                    type_id,
                    value: value.value().to_vec(),
                })
            }
            (1, false) => GeneralName::Rfc822Name(ia5(self)?),
            (2, false) => GeneralName::DnsName(ia5(self)?),
            (4, true) => {
                // Name is a CHOICE, so the tag is explicit
                let mut reader = self.reader();
                let name: Name = reader.expect(Tag::SEQUENCE)?.decode()?;
                reader.finish()?;
                GeneralName::DirectoryName(name)
            }
            (6, false) => GeneralName::Uri(ia5(self)?),
            (7, false) => GeneralName::IpAddress(ip_address(self.value())?),
            (8, false) => {
                let oid: ObjectIdentifier = self.decode()?;
                GeneralName::RegisteredId(oid)
            }
            (number @ (3 | 5), true) => GeneralName::Unsupported {
                tag: number,
                value: self.value().to_vec(),
            },
            _ => return Err(error::Error::UnknownGeneralNameTag(tag)),
        };
        Ok(name)
    }
}

/// Decodes `GeneralNames` from the content of `tlv`. At least one name is
/// required.
pub(crate) fn decode_general_names(tlv: &Tlv<'_>, kind: Kind) -> error::Result<Vec<GeneralName>> {
    let names = tlv
        .children()
        .map(|child| -> error::Result<GeneralName> { child?.decode() })
        .collect::<error::Result<Vec<GeneralName>>>()?;
    if names.is_empty() {
        return Err(error::Error::EmptySequence(kind));
    }
    Ok(names)
}
