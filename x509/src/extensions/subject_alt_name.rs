use std::fmt;

use kensa_der::{Reader, Tag};
use serde::Serialize;

use super::error::{self, Kind};
use super::general_name::{GeneralName, decode_general_names};
use super::{ExtensionValue, StandardExtension};
use crate::OidName;

/*
RFC 5280 Section 4.2.1.6
SubjectAltName ::= GeneralNames
GeneralNames ::= SEQUENCE SIZE (1..MAX) OF GeneralName
*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubjectAltName {
    pub names: Vec<GeneralName>,
}

impl SubjectAltName {
    /// The dNSName entries, in encoding order.
    pub fn dns_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().filter_map(|name| match name {
            GeneralName::DnsName(dns) => Some(dns.as_str()),
            _ => None,
        })
    }
}

impl StandardExtension for SubjectAltName {
    /// OID for SubjectAltName extension (2.5.29.17)
    const OID: &'static str = "2.5.29.17";

    fn parse(reader: &mut Reader<'_>) -> error::Result<Self> {
        let names = decode_general_names(&reader.expect(Tag::SEQUENCE)?, Kind::SubjectAltName)?;
        Ok(SubjectAltName { names })
    }

    fn extract(value: &ExtensionValue) -> Option<&Self> {
        match value {
            ExtensionValue::SubjectAltName(san) => Some(san),
            _ => None,
        }
    }
}

impl OidName for SubjectAltName {
    fn oid_name(&self) -> Option<&'static str> {
        Some("subjectAltName")
    }
}

impl fmt::Display for SubjectAltName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in &self.names {
            writeln!(f, "                {}", name)?;
        }
        Ok(())
    }
}
