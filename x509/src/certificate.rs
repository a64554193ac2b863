use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{BitString, ReadExt};
use kensa_der::{Reader, Tag, Tlv};
use kensa_pem::{FromPem, Label, Pem};
use log::debug;
use serde::{Serialize, Serializer};
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::error::{Context, Error, Result};
use crate::extensions::{Extension, StandardExtension, SubjectAltName};
use crate::{AlgorithmIdentifier, Name, SerialNumber, SubjectPublicKeyInfo};

/*
RFC 5280 Section 4.1

Certificate  ::=  SEQUENCE  {
    tbsCertificate       TBSCertificate,
    signatureAlgorithm   AlgorithmIdentifier,
    signatureValue       BIT STRING
}

TBSCertificate  ::=  SEQUENCE  {
     version         [0]  EXPLICIT Version DEFAULT v1,
     serialNumber         CertificateSerialNumber,
     signature            AlgorithmIdentifier,
     issuer               Name,
     validity             Validity,
     subject              Name,
     subjectPublicKeyInfo SubjectPublicKeyInfo,
     issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
                          -- If present, version MUST be v2 or v3
     subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
                          -- If present, version MUST be v2 or v3
     extensions      [3]  EXPLICIT Extensions OPTIONAL
                          -- If present, version MUST be v3
}

Version  ::=  INTEGER  {  v1(0), v2(1), v3(2)  }

Validity ::= SEQUENCE {
     notBefore      Time,
     notAfter       Time
}
*/

/// `strftime` layout OpenSSL uses for validity dates.
pub const DATE_FORMAT: &str = "%b %d %H:%M:%S %Y GMT";

/// Certificate version. The encoded value is one less than the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Version {
    V1,
    V2,
    V3,
}

impl Version {
    /// 1, 2 or 3
    pub fn number(&self) -> u8 {
        match self {
            Version::V1 => 1,
            Version::V2 => 2,
            Version::V3 => 3,
        }
    }

    fn from_encoded(value: u32) -> Option<Self> {
        match value {
            0 => Some(Version::V1),
            1 => Some(Version::V2),
            2 => Some(Version::V3),
            _ => None,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:x})", self.number(), self.number() - 1)
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.number())
    }
}

/// Validity period. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Validity {
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
}

impl Validity {
    pub fn is_valid_at(&self, instant: DateTime<Utc>) -> bool {
        self.not_before <= instant && instant <= self.not_after
    }
}

impl<'a> DecodableFrom<Tlv<'a>> for Validity {}

impl<'a> Decoder<Tlv<'a>, Validity> for Tlv<'a> {
    type Error = kensa_asn1::Error;

    fn decode(&self) -> std::result::Result<Validity, Self::Error> {
        let mut reader = self.reader();
        let not_before = reader.read_time()?.to_datetime();
        let not_after = reader.read_time()?.to_datetime();
        reader.finish()?;
        Ok(Validity {
            not_before,
            not_after,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TbsCertificate {
    version: Version,
    serial_number: SerialNumber,
    signature: AlgorithmIdentifier,
    issuer: Name,
    validity: Validity,
    subject: Name,
    subject_public_key_info: SubjectPublicKeyInfo,
    extensions: Vec<Extension>,
}

fn read_unique_id(reader: &mut Reader<'_>, number: u32, version: Version, context: &'static str) -> Result<()> {
    if let Some(tlv) = reader
        .read_optional(Tag::context_specific(number, false))
        .context(context)?
    {
        if version == Version::V1 {
            return Err(Error::schema(context, tlv.offset(), "requires version 2 or 3"));
        }
        debug!("skipping {} of {} bytes", context, tlv.len());
    }
    Ok(())
}

fn read_extensions(tlv: Tlv<'_>) -> Result<Vec<Extension>> {
    let mut outer = tlv.reader();
    let sequence = outer.expect(Tag::SEQUENCE).context("extensions")?;
    outer.finish().context("extensions")?;

    let mut reader = sequence.reader();
    if reader.is_empty() {
        return Err(Error::schema(
            "extensions",
            sequence.offset(),
            "at least one extension is required",
        ));
    }
    let mut seen = HashSet::new();
    let mut extensions = Vec::new();
    while !reader.is_empty() {
        let ext_tlv = reader.expect(Tag::SEQUENCE).context("extensions")?;
        let extension: Extension = ext_tlv.decode()?;
        if !seen.insert(extension.oid().clone()) {
            return Err(Error::schema(
                "extensions",
                ext_tlv.offset(),
                format!("duplicate extension {}", extension.oid()),
            ));
        }
        extensions.push(extension);
    }
    Ok(extensions)
}

impl<'a> DecodableFrom<Tlv<'a>> for TbsCertificate {}

impl<'a> Decoder<Tlv<'a>, TbsCertificate> for Tlv<'a> {
    type Error = Error;

    fn decode(&self) -> Result<TbsCertificate> {
        let mut reader = self.reader();

        // DEFAULT v1
        let version = match reader
            .read_optional(Tag::context_specific(0, true))
            .context("version")?
        {
            Some(tlv) => {
                let mut inner = tlv.reader();
                let value = inner.read_integer().context("version")?;
                inner.finish().context("version")?;
                value
                    .to_u32()
                    .and_then(Version::from_encoded)
                    .ok_or_else(|| {
                        Error::schema(
                            "version",
                            tlv.value_offset(),
                            format!("unsupported version {}", value.as_bigint()),
                        )
                    })?
            }
            None => Version::V1,
        };

        let serial_number: SerialNumber = reader
            .expect(Tag::INTEGER)
            .context("serialNumber")?
            .decode()
            .context("serialNumber")?;
        let signature: AlgorithmIdentifier = reader
            .expect(Tag::SEQUENCE)
            .context("signature")?
            .decode()
            .context("signature")?;
        let issuer: Name = reader
            .expect(Tag::SEQUENCE)
            .context("issuer")?
            .decode()
            .context("issuer")?;
        let validity: Validity = reader
            .expect(Tag::SEQUENCE)
            .context("validity")?
            .decode()
            .context("validity")?;
        let subject: Name = reader
            .expect(Tag::SEQUENCE)
            .context("subject")?
            .decode()
            .context("subject")?;
        let subject_public_key_info: SubjectPublicKeyInfo = reader
            .expect(Tag::SEQUENCE)
            .context("subjectPublicKeyInfo")?
            .decode()
            .context("subjectPublicKeyInfo")?;

        read_unique_id(&mut reader, 1, version, "issuerUniqueID")?;
        read_unique_id(&mut reader, 2, version, "subjectUniqueID")?;

        let extensions = match reader
            .read_optional(Tag::context_specific(3, true))
            .context("extensions")?
        {
            Some(tlv) if version != Version::V3 => {
                return Err(Error::schema(
                    "extensions",
                    tlv.offset(),
                    "requires version 3",
                ));
            }
            Some(tlv) => read_extensions(tlv)?,
            None => Vec::new(),
        };
        reader.finish().context("tbsCertificate")?;

        Ok(TbsCertificate {
            version,
            serial_number,
            signature,
            issuer,
            validity,
            subject,
            subject_public_key_info,
            extensions,
        })
    }
}

/// A decoded X.509 certificate.
///
/// Immutable once built. Besides the decoded fields it keeps the complete DER
/// encoding and the DER of `tbsCertificate` for fingerprinting and any later
/// signature check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    #[serde(flatten)]
    tbs_certificate: TbsCertificate,
    signature_algorithm: AlgorithmIdentifier,
    signature_value: BitString,
    #[serde(skip)]
    raw: Vec<u8>,
    #[serde(skip)]
    raw_tbs: Vec<u8>,
}

impl Certificate {
    /// Decodes a DER certificate. There must be nothing after it.
    pub fn from_der(der: &[u8]) -> Result<Certificate> {
        debug!("decoding certificate from {} DER bytes", der.len());
        let mut outer = Reader::new(der);
        let certificate = outer.expect(Tag::SEQUENCE).context("certificate")?;
        outer.finish().context("certificate")?;

        let mut reader = certificate.reader();
        let tbs = reader.expect(Tag::SEQUENCE).context("tbsCertificate")?;
        let tbs_certificate: TbsCertificate = tbs.decode()?;
        let signature_algorithm: AlgorithmIdentifier = reader
            .expect(Tag::SEQUENCE)
            .context("signatureAlgorithm")?
            .decode()
            .context("signatureAlgorithm")?;
        let signature_value = reader.read_bit_string().context("signatureValue")?;
        reader.finish().context("certificate")?;

        debug!(
            "decoded v{} certificate for {:?} with {} extensions",
            tbs_certificate.version.number(),
            tbs_certificate.subject.to_string(),
            tbs_certificate.extensions.len()
        );
        Ok(Certificate {
            tbs_certificate,
            signature_algorithm,
            signature_value,
            raw: der.to_vec(),
            raw_tbs: tbs.raw().to_vec(),
        })
    }

    pub fn version(&self) -> Version {
        self.tbs_certificate.version
    }

    pub fn serial_number(&self) -> &SerialNumber {
        &self.tbs_certificate.serial_number
    }

    /// The signature algorithm named inside `tbsCertificate`.
    pub fn signature(&self) -> &AlgorithmIdentifier {
        &self.tbs_certificate.signature
    }

    pub fn issuer(&self) -> &Name {
        &self.tbs_certificate.issuer
    }

    pub fn validity(&self) -> &Validity {
        &self.tbs_certificate.validity
    }

    pub fn subject(&self) -> &Name {
        &self.tbs_certificate.subject
    }

    pub fn subject_public_key_info(&self) -> &SubjectPublicKeyInfo {
        &self.tbs_certificate.subject_public_key_info
    }

    /// Extensions in encoding order. Empty when the block is absent.
    pub fn extensions(&self) -> &[Extension] {
        &self.tbs_certificate.extensions
    }

    /// Looks up an extension by dotted OID.
    pub fn find_extension(&self, oid: &str) -> Option<&Extension> {
        self.extensions().iter().find(|ext| *ext.oid() == oid)
    }

    /// The decoded value of a recognized extension. `None` when the
    /// extension is absent or its payload failed to decode.
    pub fn extension<T: StandardExtension>(&self) -> Option<&T> {
        self.find_extension(T::OID)
            .and_then(|ext| T::extract(ext.parsed()))
    }

    /// dNSName entries of subjectAltName.
    pub fn alt_names(&self) -> Vec<&str> {
        self.extension::<SubjectAltName>()
            .map(|san| san.dns_names().collect())
            .unwrap_or_default()
    }

    /// OpenSSL-compatible hash of the subject, see [`Name::hash`].
    pub fn subject_hash(&self) -> u32 {
        self.subject().hash()
    }

    pub fn issuer_hash(&self) -> u32 {
        self.issuer().hash()
    }

    /// Issuer and subject are the same name.
    pub fn is_self_issued(&self) -> bool {
        self.issuer() == self.subject()
    }

    pub fn signature_algorithm(&self) -> &AlgorithmIdentifier {
        &self.signature_algorithm
    }

    pub fn signature_value(&self) -> &BitString {
        &self.signature_value
    }

    /// Complete DER encoding.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// DER encoding of `tbsCertificate`, the signed bytes.
    pub fn raw_tbs(&self) -> &[u8] {
        &self.raw_tbs
    }

    pub fn fingerprint_sha1(&self) -> String {
        format_fingerprint(&Sha1::digest(&self.raw))
    }

    pub fn fingerprint_sha256(&self) -> String {
        format_fingerprint(&Sha256::digest(&self.raw))
    }
}

fn format_fingerprint(digest: &[u8]) -> String {
    digest
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let validity = self.validity();
        let spki = self.subject_public_key_info();

        writeln!(f, "Certificate:")?;
        writeln!(f, "    Data:")?;
        writeln!(f, "        Version: {}", self.version())?;
        writeln!(f, "        Serial Number:")?;
        writeln!(f, "            {}", self.serial_number())?;
        writeln!(f, "        Signature Algorithm: {}", self.signature())?;
        writeln!(f, "        Issuer: {}", self.issuer())?;
        writeln!(f, "        Validity")?;
        writeln!(
            f,
            "            Not Before: {}",
            validity.not_before.format(DATE_FORMAT)
        )?;
        writeln!(
            f,
            "            Not After : {}",
            validity.not_after.format(DATE_FORMAT)
        )?;
        writeln!(f, "        Subject: {}", self.subject())?;
        writeln!(f, "        Subject Hash: {:08x}", self.subject_hash())?;
        writeln!(f, "        Subject Public Key Info:")?;
        writeln!(f, "            Public Key Algorithm: {}", spki.algorithm())?;
        write!(f, "{}", spki.public_key())?;
        if !self.extensions().is_empty() {
            writeln!(f, "        X509v3 extensions:")?;
            for ext in self.extensions() {
                write!(f, "{}", ext)?;
            }
        }
        writeln!(f, "    Signature Algorithm: {}", self.signature_algorithm)?;
        writeln!(f, "    Signature Value:")?;
        let octets = self
            .signature_value
            .as_bytes()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>();
        let lines = octets.chunks(18).collect::<Vec<_>>();
        for (i, line) in lines.iter().enumerate() {
            let sep = if i + 1 < lines.len() { ":" } else { "" };
            writeln!(f, "        {}{}", line.join(":"), sep)?;
        }
        Ok(())
    }
}

impl FromPem for Certificate {
    type Error = Error;

    fn expected_label() -> Label {
        Label::Certificate
    }

    fn from_pem(pem: &Pem) -> Result<Self> {
        if pem.label() != Self::expected_label() {
            return Err(kensa_pem::error::Error::LabelMissMatch.into());
        }
        let der: Vec<u8> = pem.decode()?;
        Certificate::from_der(&der)
    }
}

impl DecodableFrom<Pem> for Certificate {}

impl Decoder<Pem, Certificate> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<Certificate> {
        Certificate::from_pem(self)
    }
}

impl DecodableFrom<Vec<u8>> for Certificate {}

/// PEM or DER bytes, with the default size limit.
impl Decoder<Vec<u8>, Certificate> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Certificate> {
        crate::parse_certificate(self)
    }
}
