use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;

// RFC 7468 section 3, restricted to the labels seen in practice
static BOUNDARY: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^-----(BEGIN|END) ([A-Z0-9]+(?:[ -][A-Z0-9]+)*)-----[ \t]*$").ok()
});

/// Type label carried by the encapsulation boundaries of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// X.509 certificate
    Certificate,
    /// OpenSSL "trusted" certificate with auxiliary trust settings
    TrustedCertificate,
    /// PKCS#10 certification request
    CertificateRequest,
    /// X.509 certificate revocation list
    X509Crl,
    /// SubjectPublicKeyInfo
    PublicKey,
    /// PKCS#8 private key
    PrivateKey,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Certificate => "CERTIFICATE",
            Label::TrustedCertificate => "TRUSTED CERTIFICATE",
            Label::CertificateRequest => "CERTIFICATE REQUEST",
            Label::X509Crl => "X509 CRL",
            Label::PublicKey => "PUBLIC KEY",
            Label::PrivateKey => "PRIVATE KEY",
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CERTIFICATE" | "X509 CERTIFICATE" => Ok(Label::Certificate),
            "TRUSTED CERTIFICATE" => Ok(Label::TrustedCertificate),
            "CERTIFICATE REQUEST" | "NEW CERTIFICATE REQUEST" => Ok(Label::CertificateRequest),
            "X509 CRL" => Ok(Label::X509Crl),
            "PUBLIC KEY" => Ok(Label::PublicKey),
            "PRIVATE KEY" => Ok(Label::PrivateKey),
            _ => Err(Error::InvalidLabel),
        }
    }
}

/// An encapsulation boundary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Boundary {
    Begin(Label),
    End(Label),
}

impl Boundary {
    /// Returns `Ok(None)` when `line` is not a boundary at all.
    pub(crate) fn parse(line: &str) -> Result<Option<Boundary>, Error> {
        let re = BOUNDARY
            .as_ref()
            .ok_or(Error::InvalidEncapsulationBoundary)?;
        let Some(captures) = re.captures(line) else {
            return Ok(None);
        };
        let (Some(side), Some(label)) = (captures.get(1), captures.get(2)) else {
            return Err(Error::InvalidEncapsulationBoundary);
        };
        let label = label.as_str().parse()?;
        match side.as_str() {
            "BEGIN" => Ok(Some(Boundary::Begin(label))),
            _ => Ok(Some(Boundary::End(label))),
        }
    }
}
