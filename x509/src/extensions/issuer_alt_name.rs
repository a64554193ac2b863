use std::fmt;

use kensa_der::{Reader, Tag};
use serde::Serialize;

use super::error::{self, Kind};
use super::general_name::{GeneralName, decode_general_names};
use super::{ExtensionValue, StandardExtension};
use crate::OidName;

/*
RFC 5280 Section 4.2.1.7
IssuerAltName ::= GeneralNames
*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IssuerAltName {
    pub names: Vec<GeneralName>,
}

impl StandardExtension for IssuerAltName {
    /// OID for IssuerAltName extension (2.5.29.18)
    const OID: &'static str = "2.5.29.18";

    fn parse(reader: &mut Reader<'_>) -> error::Result<Self> {
        let names = decode_general_names(&reader.expect(Tag::SEQUENCE)?, Kind::IssuerAltName)?;
        Ok(IssuerAltName { names })
    }

    fn extract(value: &ExtensionValue) -> Option<&Self> {
        match value {
            ExtensionValue::IssuerAltName(ian) => Some(ian),
            _ => None,
        }
    }
}

impl OidName for IssuerAltName {
    fn oid_name(&self) -> Option<&'static str> {
        Some("issuerAltName")
    }
}

impl fmt::Display for IssuerAltName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in &self.names {
            writeln!(f, "                {}", name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issuer_alt_name_decode() {
        // SEQUENCE { rfc822Name "ca@x.y" }
        let input = [0x30, 0x08, 0x81, 0x06, 0x63, 0x61, 0x40, 0x78, 0x2e, 0x79];
        let ian = IssuerAltName::parse(&mut Reader::new(&input)).unwrap();
        assert_eq!(vec![GeneralName::Rfc822Name("ca@x.y".to_string())], ian.names);
        assert_eq!("                email:ca@x.y\n", ian.to_string());
    }

    #[test]
    fn test_issuer_alt_name_empty() {
        let input = [0x30, 0x00];
        assert_eq!(
            error::Error::EmptySequence(Kind::IssuerAltName),
            IssuerAltName::parse(&mut Reader::new(&input)).unwrap_err()
        );
    }
}
