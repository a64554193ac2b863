use std::fmt;

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::BitString;
use kensa_der::{Reader, Tag, Tlv};
use serde::Serialize;

use super::error::{self, Kind};
use super::general_name::{GeneralName, decode_general_names};
use super::{ExtensionValue, StandardExtension};
use crate::{OidName, RelativeDistinguishedName};

/*
RFC 5280 Section 4.2.1.13

CRLDistributionPoints ::= SEQUENCE SIZE (1..MAX) OF DistributionPoint

DistributionPoint ::= SEQUENCE {
    distributionPoint       [0]     DistributionPointName OPTIONAL,
    reasons                 [1]     ReasonFlags OPTIONAL,
    cRLIssuer               [2]     GeneralNames OPTIONAL }

DistributionPointName ::= CHOICE {
    fullName                [0]     GeneralNames,
    nameRelativeToCRLIssuer [1]     RelativeDistinguishedName }

ReasonFlags ::= BIT STRING {
    unused                  (0),
    keyCompromise           (1),
    cACompromise            (2),
    affiliationChanged      (3),
    superseded              (4),
    cessationOfOperation    (5),
    certificateHold         (6),
    privilegeWithdrawn      (7),
    aACompromise            (8) }
*/

/// CRLDistributionPoints represents the CRL Distribution Points extension
/// OID: 2.5.29.31
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CRLDistributionPoints {
    pub distribution_points: Vec<DistributionPoint>,
}

impl CRLDistributionPoints {
    /// Every URI of every distribution point, in encoding order.
    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.distribution_points
            .iter()
            .flat_map(|point| point.uris.iter().map(String::as_str))
    }
}

/// DistributionPoint represents a single distribution point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_point: Option<DistributionPointName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasons: Option<ReasonFlags>,
    #[serde(rename = "cRLIssuer", skip_serializing_if = "Option::is_none")]
    pub crl_issuer: Option<Vec<GeneralName>>,
    /// uniformResourceIdentifier entries of the fullName
    pub uris: Vec<String>,
}

/// DistributionPointName is a CHOICE between fullName and nameRelativeToCRLIssuer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DistributionPointName {
    /// Full name as a sequence of GeneralNames
    FullName(Vec<GeneralName>),
    /// Name relative to the CRL issuer
    #[serde(rename = "nameRelativeToCRLIssuer")]
    NameRelativeToCRLIssuer(RelativeDistinguishedName),
}

/// ReasonFlags represents the reasons for certificate revocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonFlags {
    pub key_compromise: bool,
    #[serde(rename = "cACompromise")]
    pub ca_compromise: bool,
    pub affiliation_changed: bool,
    pub superseded: bool,
    pub cessation_of_operation: bool,
    pub certificate_hold: bool,
    pub privilege_withdrawn: bool,
    #[serde(rename = "aACompromise")]
    pub aa_compromise: bool,
}

impl From<&BitString> for ReasonFlags {
    fn from(bits: &BitString) -> Self {
        ReasonFlags {
            key_compromise: bits.bit(1),
            ca_compromise: bits.bit(2),
            affiliation_changed: bits.bit(3),
            superseded: bits.bit(4),
            cessation_of_operation: bits.bit(5),
            certificate_hold: bits.bit(6),
            privilege_withdrawn: bits.bit(7),
            aa_compromise: bits.bit(8),
        }
    }
}

impl fmt::Display for ReasonFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reasons = [
            (self.key_compromise, "Key Compromise"),
            (self.ca_compromise, "CA Compromise"),
            (self.affiliation_changed, "Affiliation Changed"),
            (self.superseded, "Superseded"),
            (self.cessation_of_operation, "Cessation Of Operation"),
            (self.certificate_hold, "Certificate Hold"),
            (self.privilege_withdrawn, "Privilege Withdrawn"),
            (self.aa_compromise, "AA Compromise"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect::<Vec<_>>();
        write!(f, "{}", reasons.join(", "))
    }
}

impl<'a> DecodableFrom<Tlv<'a>> for DistributionPointName {}

impl<'a> Decoder<Tlv<'a>, DistributionPointName> for Tlv<'a> {
    type Error = error::Error;

    fn decode(&self) -> Result<DistributionPointName, Self::Error> {
        // CHOICE inside [0], so the outer tag is explicit
        let mut reader = self.reader();
        let choice = reader.read_tlv()?;
        reader.finish()?;

        let tag = choice.tag();
        if tag == Tag::context_specific(0, true) {
            let names = decode_general_names(&choice, Kind::CRLDistributionPoints)?;
            Ok(DistributionPointName::FullName(names))
        } else if tag == Tag::context_specific(1, true) {
            let rdn: RelativeDistinguishedName = choice.decode()?;
            Ok(DistributionPointName::NameRelativeToCRLIssuer(rdn))
        } else {
            Err(kensa_der::Error::UnexpectedTag {
                offset: choice.offset(),
                expected: Tag::context_specific(0, true),
                found: tag,
            }
            .into())
        }
    }
}

impl<'a> DecodableFrom<Tlv<'a>> for DistributionPoint {}

impl<'a> Decoder<Tlv<'a>, DistributionPoint> for Tlv<'a> {
    type Error = error::Error;

    fn decode(&self) -> Result<DistributionPoint, Self::Error> {
        let mut reader = self.reader();

        let distribution_point = reader
            .read_optional(Tag::context_specific(0, true))?
            .map(|tlv| Decoder::<Tlv, DistributionPointName>::decode(&tlv))
            .transpose()?;
        let reasons = reader
            .read_optional(Tag::context_specific(1, false))?
            .map(|tlv| Decoder::<Tlv, BitString>::decode(&tlv))
            .transpose()?
            .map(|bits| ReasonFlags::from(&bits));
        let crl_issuer = reader
            .read_optional(Tag::context_specific(2, true))?
            .map(|tlv| decode_general_names(&tlv, Kind::CRLDistributionPoints))
            .transpose()?;
        reader.finish()?;

        let uris = match &distribution_point {
            Some(DistributionPointName::FullName(names)) => names
                .iter()
                .filter_map(|name| match name {
                    GeneralName::Uri(uri) => Some(uri.clone()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        Ok(DistributionPoint {
            distribution_point,
            reasons,
            crl_issuer,
            uris,
        })
    }
}

impl StandardExtension for CRLDistributionPoints {
    const OID: &'static str = "2.5.29.31";

    fn parse(reader: &mut Reader<'_>) -> error::Result<Self> {
        let distribution_points = reader
            .read_sequence()?
            .map(|point| -> error::Result<DistributionPoint> { point?.decode() })
            .collect::<error::Result<Vec<DistributionPoint>>>()?;
        if distribution_points.is_empty() {
            return Err(error::Error::EmptySequence(Kind::CRLDistributionPoints));
        }
        Ok(CRLDistributionPoints {
            distribution_points,
        })
    }

    fn extract(value: &ExtensionValue) -> Option<&Self> {
        match value {
            ExtensionValue::CrlDistributionPoints(crl_dp) => Some(crl_dp),
            _ => None,
        }
    }
}

impl OidName for CRLDistributionPoints {
    fn oid_name(&self) -> Option<&'static str> {
        Some("crlDistributionPoints")
    }
}

impl fmt::Display for CRLDistributionPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for point in &self.distribution_points {
            match &point.distribution_point {
                Some(DistributionPointName::FullName(full_name)) => {
                    writeln!(f, "                Full Name:")?;
                    for name in full_name {
                        writeln!(f, "                  {}", name)?;
                    }
                }
                Some(DistributionPointName::NameRelativeToCRLIssuer(rdn)) => {
                    writeln!(f, "                Relative Name:")?;
                    writeln!(f, "                  {}", rdn)?;
                }
                None => {}
            }
            if let Some(reasons) = &point.reasons {
                writeln!(f, "                Reasons: {}", reasons)?;
            }
            if let Some(issuer) = &point.crl_issuer {
                writeln!(f, "                CRL Issuer:")?;
                for name in issuer {
                    writeln!(f, "                  {}", name)?;
                }
            }
        }
        Ok(())
    }
}
