//! PEM text encoding (RFC 7468).
//!
//! [`Pem`] holds one armored block and [`parse_many`] walks a bundle of them.
//! [`unwrap_certificate`] is the entry point used by the certificate decoder:
//! it turns PEM-armored input into DER bytes and lets binary DER pass through
//! untouched.

pub mod error;
mod label;
mod unwrap;

pub use label::Label;
pub use unwrap::unwrap_certificate;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use base64::{Engine, engine::general_purpose::STANDARD};
use error::Error;
use kensa::decoder::{DecodableFrom, Decoder};
use label::Boundary;

// base64 text is wrapped at this width when printing
const LINE_WIDTH: usize = 64;

/// One encapsulated block.
///
/// `data` is the base64 text with line breaks and trailing whitespace
/// removed. It is not decoded until the block is turned into bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pem {
    label: Label,
    data: String,
}

impl Pem {
    pub fn new(label: Label, data: String) -> Self {
        Pem { label, data }
    }

    /// Armors `der` under `label`.
    pub fn from_bytes(label: Label, der: &[u8]) -> Self {
        Pem {
            label,
            data: STANDARD.encode(der),
        }
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn data(&self) -> &str {
        &self.data
    }
}

impl Display for Pem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "-----BEGIN {}-----", self.label)?;
        let mut rest = self.data.as_str();
        while !rest.is_empty() {
            let (line, tail) = rest.split_at(rest.len().min(LINE_WIDTH));
            writeln!(f, "{}", line)?;
            rest = tail;
        }
        write!(f, "-----END {}-----", self.label)
    }
}

impl FromStr for Pem {
    type Err = Error;

    /// Parses the first block in `s`. Explanatory text before it is skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        next_block(&mut s.lines())?.ok_or(Error::MissingPreEncapsulationBoundary)
    }
}

/// Types carried inside a PEM block with a fixed label.
pub trait FromPem: Sized {
    type Error;

    /// Label the block must carry.
    fn expected_label() -> Label;

    fn from_pem(pem: &Pem) -> Result<Self, Self::Error>;
}

impl DecodableFrom<Pem> for Vec<u8> {}

impl Decoder<Pem, Vec<u8>> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<Vec<u8>, Self::Error> {
        STANDARD.decode(&self.data).map_err(Error::Base64Decode)
    }
}

/// Parses every block in `s`, in order.
///
/// Text between blocks is skipped. Fails when `s` holds no block at all or
/// when any block is malformed.
///
/// ```
/// use kensa_pem::parse_many;
///
/// let bundle = "root\n-----BEGIN CERTIFICATE-----\nAAA=\n-----END CERTIFICATE-----\n\
///               leaf\n-----BEGIN CERTIFICATE-----\nBBB=\n-----END CERTIFICATE-----\n";
/// let pems = parse_many(bundle).unwrap();
/// assert_eq!(2, pems.len());
/// ```
pub fn parse_many(s: &str) -> Result<Vec<Pem>, Error> {
    let mut lines = s.lines();
    let mut pems = Vec::new();
    while let Some(pem) = next_block(&mut lines)? {
        pems.push(pem);
    }
    if pems.is_empty() {
        return Err(Error::MissingPreEncapsulationBoundary);
    }
    Ok(pems)
}

/// Consumes lines up to and including the next post-encapsulation boundary.
/// Returns `Ok(None)` when no pre-encapsulation boundary is left.
fn next_block<'a, I>(lines: &mut I) -> Result<Option<Pem>, Error>
where
    I: Iterator<Item = &'a str>,
{
    let label = loop {
        let Some(line) = lines.next() else {
            return Ok(None);
        };
        match Boundary::parse(line)? {
            Some(Boundary::Begin(label)) => break label,
            Some(Boundary::End(_)) => return Err(Error::MissingPreEncapsulationBoundary),
            None => {}
        }
    };

    let mut body = Body::default();
    for line in lines {
        match Boundary::parse(line)? {
            Some(Boundary::End(end)) if end == label => {
                if body.data.is_empty() {
                    return Err(Error::MissingData);
                }
                return Ok(Some(Pem {
                    label,
                    data: body.data,
                }));
            }
            Some(_) => return Err(Error::LabelMissMatch),
            None => body.push(line)?,
        }
    }
    Err(Error::MissingPostEncapsulationBoundary)
}

/// Base64 lines collected between the boundaries.
#[derive(Debug, Default)]
struct Body {
    data: String,
    // a line ending in '=' was seen; only padding may follow
    padded: bool,
}

impl Body {
    fn push(&mut self, line: &str) -> Result<(), Error> {
        let line = line.trim_end_matches([' ', '\t']);
        if line.is_empty() {
            return Err(match (self.data.is_empty(), self.padded) {
                (true, _) => Error::MissingData,
                (false, true) => Error::InvalidBase64Finl,
                (false, false) => Error::InvalidBase64Line,
            });
        }
        if self.padded {
            if !line.bytes().all(|b| b == b'=') {
                return Err(Error::InvalidBase64Finl);
            }
            self.data.push_str(line);
            return Ok(());
        }
        let unpadded = line.trim_end_matches('=');
        if !unpadded.bytes().all(is_base64_char) {
            return Err(Error::InvalidBase64Line);
        }
        self.padded = unpadded.len() != line.len();
        self.data.push_str(line);
        Ok(())
    }
}

fn is_base64_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'+' || b == b'/'
}
