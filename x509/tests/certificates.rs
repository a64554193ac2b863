use std::net::IpAddr;
use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use kensa_x509::extensions::{
    AccessMethod, AuthorityInfoAccess, AuthorityKeyIdentifier, BasicConstraints,
    CRLDistributionPoints, ExtendedKeyUsage, ExtensionValue, GeneralName, KeyPurpose, KeyUsage,
    SubjectAltName, SubjectKeyIdentifier,
};
use kensa_x509::{
    AlgorithmParameters, Certificate, DecodeOptions, Error, PublicKey, Version,
    parse_certificate, parse_certificate_with,
};
use rstest::rstest;

fn fixture(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("testdata/certs")
        .join(name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e))
}

fn leaf() -> Certificate {
    parse_certificate(&fixture("leaf-ec.pem")).unwrap()
}

#[rstest(
    name,
    case("gnutls-ca.pem"),
    case("localhost-rsa.pem"),
    case("leaf-ec.pem"),
    case("leaf-ec.der"),
    case("legacy-v1.pem")
)]
fn test_decode_is_idempotent(name: &str) {
    let cert = parse_certificate(&fixture(name)).unwrap();
    let again = Certificate::from_der(cert.raw()).unwrap();
    assert_eq!(cert, again);
    assert_eq!(cert.to_string(), again.to_string());
}

#[test]
fn test_pem_and_der_agree() {
    let from_pem = leaf();
    let from_der = parse_certificate(&fixture("leaf-ec.der")).unwrap();
    assert_eq!(fixture("leaf-ec.der"), from_pem.raw());
    assert_eq!(from_pem, from_der);
}

#[test]
fn test_leaf_skeleton() {
    let cert = leaf();
    assert_eq!(Version::V3, cert.version());
    assert_eq!("c0:ff:ee:12:34:56:78:90:ab:cd:ef", cert.serial_number().format_hex());
    assert_eq!("ecdsa-with-SHA256", cert.signature().name());
    assert_eq!(cert.signature(), cert.signature_algorithm());
    assert_eq!(
        "CN=Kensa Test Root, O=Kensa Test CA, C=JP",
        cert.issuer().to_string()
    );
    assert_eq!(
        "CN=www.example.com, OU=Platform, O=Kensa Test\\, Inc., ST=Tokyo, C=JP",
        cert.subject().to_string()
    );
    assert_eq!(Some("www.example.com"), cert.subject().common_name());
    assert!(!cert.is_self_issued());

    // UTCTime before GeneralizedTime
    assert_eq!(
        Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap(),
        cert.validity().not_before
    );
    assert_eq!(
        Utc.with_ymd_and_hms(2051, 6, 1, 0, 0, 0).unwrap(),
        cert.validity().not_after
    );

    match cert.subject_public_key_info().public_key() {
        PublicKey::Ec { curve, bits, .. } => {
            assert_eq!("prime256v1", curve);
            assert_eq!(Some(256), bits);
        }
        other => panic!("unexpected key {:?}", other),
    }
}

#[test]
fn test_leaf_extension_order() {
    let cert = leaf();
    let names = cert
        .extensions()
        .iter()
        .map(|ext| ext.name())
        .collect::<Vec<_>>();
    assert_eq!(
        vec![
            Some("basicConstraints"),
            Some("keyUsage"),
            Some("extendedKeyUsage"),
            Some("subjectAltName"),
            Some("subjectKeyIdentifier"),
            Some("authorityKeyIdentifier"),
            Some("crlDistributionPoints"),
            Some("authorityInfoAccess"),
            None,
        ],
        names
    );
    assert!(cert.extensions().iter().all(|ext| ext.decode_error().is_none()));
}

#[test]
fn test_leaf_extensions() {
    let cert = leaf();

    let bc = cert.extension::<BasicConstraints>().unwrap();
    assert!(!bc.ca);
    assert_eq!(None, bc.path_len_constraint);
    assert!(cert.find_extension("2.5.29.19").unwrap().is_critical());

    let ku = cert.extension::<KeyUsage>().unwrap();
    assert_eq!(vec!["Digital Signature", "Key Encipherment"], ku.usages());

    let eku = cert.extension::<ExtendedKeyUsage>().unwrap();
    assert!(eku.contains(&KeyPurpose::ServerAuth));
    assert!(eku.contains(&KeyPurpose::ClientAuth));
    assert_eq!("1.3.6.1.4.1.99999.1", eku.purposes[2].oid());

    let san = cert.extension::<SubjectAltName>().unwrap();
    assert_eq!(7, san.names.len());
    assert_eq!(vec!["www.example.com", "example.com"], cert.alt_names());
    assert_eq!(
        GeneralName::IpAddress("192.0.2.1".parse::<IpAddr>().unwrap()),
        san.names[2]
    );
    assert_eq!(
        GeneralName::IpAddress("2001:db8::1".parse::<IpAddr>().unwrap()),
        san.names[3]
    );
    assert_eq!(GeneralName::Rfc822Name("admin@example.com".to_string()), san.names[4]);
    assert_eq!(GeneralName::Uri("https://example.com/".to_string()), san.names[5]);
    assert_eq!("Registered ID:1.3.6.1.4.1.99999.7", san.names[6].to_string());

    let ski = cert.extension::<SubjectKeyIdentifier>().unwrap();
    assert_eq!(
        "3036979a19777d8fce1947739f914617fd0d9ccb",
        ski.key_identifier.to_hex()
    );

    let aki = cert.extension::<AuthorityKeyIdentifier>().unwrap();
    assert_eq!(
        "0102030405060708090a0b0c0d0e0f1011121314",
        aki.key_identifier.as_ref().unwrap().to_hex()
    );
    assert!(aki.authority_cert_issuer.is_none());

    let crl = cert.extension::<CRLDistributionPoints>().unwrap();
    assert_eq!(2, crl.distribution_points.len());
    assert_eq!(
        vec![
            "http://crl.example.com/root.crl",
            "http://crl2.example.com/root.crl",
            "ldap://ldap.example.com/cn=Root",
        ],
        crl.uris().collect::<Vec<_>>()
    );

    let aia = cert.extension::<AuthorityInfoAccess>().unwrap();
    assert_eq!(
        vec![&GeneralName::Uri("http://ocsp.example.com".to_string())],
        aia.locations(&AccessMethod::Ocsp).collect::<Vec<_>>()
    );
    assert_eq!(
        vec![&GeneralName::Uri("http://ca.example.com/root.crt".to_string())],
        aia.locations(&AccessMethod::CaIssuers).collect::<Vec<_>>()
    );
}

#[test]
fn test_unknown_critical_extension_is_kept() {
    let cert = leaf();
    let ext = cert.find_extension("1.3.6.1.4.1.99999.42").unwrap();
    assert!(ext.is_critical());
    assert_eq!(None, ext.name());
    assert_eq!(&[0x05, 0x00], ext.value());
    assert_eq!(&ExtensionValue::Other { error: None }, ext.parsed());
}

#[test]
fn test_corrupt_extension_does_not_fail_certificate() {
    let mut der = fixture("leaf-ec.der");
    // subjectKeyIdentifier: OID, extnValue header, inner OCTET STRING header
    let marker = [0x06, 0x03, 0x55, 0x1d, 0x0e, 0x04, 0x16, 0x04, 0x14];
    let at = der
        .windows(marker.len())
        .position(|w| w == marker)
        .unwrap();
    der[at + marker.len() - 1] = 0x7f;

    let cert = Certificate::from_der(&der).unwrap();
    let ext = cert.find_extension("2.5.29.14").unwrap();
    let err = ext.decode_error().unwrap();
    assert_eq!("2.5.29.14", err.oid.to_string());
    assert!(cert.extension::<SubjectKeyIdentifier>().is_none());

    assert_eq!(9, cert.extensions().len());
    assert!(cert.extension::<AuthorityKeyIdentifier>().is_some());
    assert_eq!(vec!["www.example.com", "example.com"], cert.alt_names());
    assert_eq!(
        "CN=www.example.com, OU=Platform, O=Kensa Test\\, Inc., ST=Tokyo, C=JP",
        cert.subject().to_string()
    );
}

#[test]
fn test_every_truncation_is_reported() {
    let der = fixture("leaf-ec.der");
    for len in 1..der.len() {
        match Certificate::from_der(&der[..len]) {
            Err(Error::Truncated { .. }) => {}
            other => panic!("prefix of {} bytes: unexpected result {:?}", len, other),
        }
    }
}

#[cfg(target_pointer_width = "64")]
#[rstest(
    input,
    offset,
    case(vec![0x30, 0x88, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff], 0),
    case(vec![0x30, 0x0a, 0x30, 0x88, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe], 2)
)]
fn test_huge_declared_length_is_truncated(input: Vec<u8>, offset: usize) {
    assert_eq!(
        Err(Error::Truncated {
            offset,
            needed: usize::MAX,
            available: input.len() - offset,
        }),
        parse_certificate(&input)
    );
}

// values printed by `openssl x509 -subject_hash -issuer_hash`
#[rstest(
    name,
    subject_hash,
    issuer_hash,
    case("gnutls-ca.pem", 0x33b64a01, 0x33b64a01),
    case("localhost-rsa.pem", 0x67d8e02e, 0x67d8e02e),
    case("leaf-ec.der", 0xb7693519, 0xd849c4f6),
    case("legacy-v1.pem", 0xa6bfcb21, 0xa6bfcb21)
)]
fn test_name_hashes(name: &str, subject_hash: u32, issuer_hash: u32) {
    let cert = parse_certificate(&fixture(name)).unwrap();
    assert_eq!(subject_hash, cert.subject_hash());
    assert_eq!(issuer_hash, cert.issuer_hash());
}

#[test]
fn test_fingerprints() {
    let cert = leaf();
    assert_eq!(
        "FC:5D:E5:DC:09:53:D0:17:5A:F0:A4:55:63:A1:61:C6:4F:B6:2A:10",
        cert.fingerprint_sha1()
    );
    assert_eq!(
        "D6:B4:5B:81:E8:0E:38:0F:5C:1A:70:31:BD:14:A4:73:09:1B:DE:1A:95:02:48:9B:13:C2:11:5A:3B:06:30:DF",
        cert.fingerprint_sha256()
    );
}

#[test]
fn test_gnutls_ca() {
    let cert = parse_certificate(&fixture("gnutls-ca.pem")).unwrap();
    assert_eq!(560, cert.raw().len());
    assert_eq!("00", cert.serial_number().format_hex());
    assert_eq!(
        "CN=GnuTLS certificate authority, ST=Leuven, OU=GnuTLS certificate authority, O=GnuTLS, C=BE",
        cert.subject().to_string()
    );
    assert!(cert.is_self_issued());
    assert_eq!(
        Utc.with_ymd_and_hms(2011, 5, 23, 20, 38, 21).unwrap(),
        cert.validity().not_before
    );
    assert_eq!(
        Utc.with_ymd_and_hms(2012, 12, 22, 7, 41, 51).unwrap(),
        cert.validity().not_after
    );

    let bc = cert.extension::<BasicConstraints>().unwrap();
    assert!(bc.ca);
    let ku = cert.extension::<KeyUsage>().unwrap();
    assert_eq!(vec!["Certificate Sign", "CRL Sign"], ku.usages());
    assert!(cert.find_extension("2.5.29.15").unwrap().is_critical());
    assert_eq!(
        "F0:B4:81:FE:98:12:BF:B5:28:B9:64:40:03:CB:CC:1F:66:4E:28:03",
        cert.extension::<SubjectKeyIdentifier>()
            .unwrap()
            .key_identifier
            .to_string()
    );
    assert_eq!(
        "AE:C4:60:61:F4:58:FC:B5:6E:20:4A:11:79:DE:BB:CF:23:7F:1C:53",
        cert.fingerprint_sha1()
    );
}

#[test]
fn test_localhost_rsa() {
    let cert = parse_certificate(&fixture("localhost-rsa.pem")).unwrap();
    assert_eq!(953, cert.raw().len());
    assert_eq!(
        "68:50:34:09:3f:17:90:a6:c4:b4:6e:89:79:f7:26:3d:9a:7a:4e:1a",
        cert.serial_number().format_hex()
    );
    assert_eq!(
        "CN=localhost, OU=Test Unit, O=Test Org, L=Chiyoda, ST=Tokyo, C=JP",
        cert.subject().to_string()
    );
    assert!(cert.is_self_issued());
    match cert.subject_public_key_info().public_key() {
        PublicKey::Rsa { bits, exponent, .. } => {
            assert_eq!(2048, bits);
            assert_eq!(65537, exponent);
        }
        other => panic!("unexpected key {:?}", other),
    }
    let ski = cert.extension::<SubjectKeyIdentifier>().unwrap();
    let aki = cert.extension::<AuthorityKeyIdentifier>().unwrap();
    assert_eq!(Some(&ski.key_identifier), aki.key_identifier.as_ref());
    assert_eq!(
        "CB:60:7C:C5:5C:E8:31:D0:AB:49:C7:54:E8:44:80:5E:08:00:DC:BD",
        cert.fingerprint_sha1()
    );
}

#[test]
fn test_legacy_v1() {
    let cert = parse_certificate(&fixture("legacy-v1.pem")).unwrap();
    assert_eq!(Version::V1, cert.version());
    assert!(cert.extensions().is_empty());
    assert!(cert.alt_names().is_empty());
    assert!(cert.extension::<BasicConstraints>().is_none());
    assert_eq!("12:34", cert.serial_number().format_hex());
    assert_eq!("sha256WithRSAEncryption", cert.signature().name());
    assert_eq!(Some(&AlgorithmParameters::Null), cert.signature().parameters());
    assert_eq!("CN=legacy.example.org, O=Legacy Corp, C=US", cert.subject().to_string());
    assert!(cert.is_self_issued());
    match cert.subject_public_key_info().public_key() {
        PublicKey::Rsa { bits, exponent, .. } => {
            assert_eq!(1024, bits);
            assert_eq!(65537, exponent);
        }
        other => panic!("unexpected key {:?}", other),
    }
    assert_eq!(
        "9D:35:26:18:7A:6F:C3:49:4E:30:5D:B7:6A:32:58:A5:9B:63:D5:2A",
        cert.fingerprint_sha1()
    );
    assert!(!cert.to_string().contains("X509v3 extensions:"));
}

#[test]
fn test_text_rendering() {
    let text = leaf().to_string();
    assert!(text.starts_with("Certificate:\n    Data:\n        Version: 3 (0x2)\n"));
    assert!(text.contains("        Serial Number:\n            c0:ff:ee:12:34:56:78:90:ab:cd:ef\n"));
    assert!(text.contains("            Not Before: Jan 01 12:00:00 2023 GMT\n"));
    assert!(text.contains("            Not After : Jun 01 00:00:00 2051 GMT\n"));
    assert!(text.contains("        Subject Hash: b7693519\n"));
    assert!(text.contains("        X509v3 extensions:\n"));
    assert!(text.contains("            X509v3 basicConstraints: critical\n                CA:FALSE\n"));
    assert!(text.contains("DNS:www.example.com"));
    assert!(text.contains("            1.3.6.1.4.1.99999.42: critical\n"));
    assert!(text.contains("    Signature Value:\n"));
}

#[test]
fn test_json_shape() {
    let json = serde_json::to_value(leaf()).unwrap();
    assert_eq!(3, json["version"]);
    assert_eq!("c0:ff:ee:12:34:56:78:90:ab:cd:ef", json["serialNumber"]);
    assert_eq!(
        "CN=Kensa Test Root, O=Kensa Test CA, C=JP",
        json["issuer"]["distinguishedName"]
    );
    assert_eq!("2023-01-01T12:00:00Z", json["validity"]["notBefore"]);
    assert_eq!(9, json["extensions"].as_array().unwrap().len());
    assert_eq!(
        serde_json::json!({ "ca": false, "pathLenConstraint": null }),
        json["extensions"][0]["parsed"]["basicConstraints"]
    );
    assert_eq!("d849c4f6", json["issuer"]["hash"]);
    assert_eq!("b7693519", json["subject"]["hash"]);
    assert!(json.get("raw").is_none());
    assert!(json.get("signatureValue").is_some());
}

#[test]
fn test_input_too_large() {
    let options = DecodeOptions::new().with_max_input_size(700);
    assert_eq!(
        Error::InputTooLarge {
            size: 918,
            limit: 700,
        },
        parse_certificate_with(&fixture("leaf-ec.der"), &options).unwrap_err()
    );
    // the PEM text fits the text limit, the DER inside does not
    let pem = fixture("leaf-ec.pem");
    assert!(pem.len() <= 1400);
    assert_eq!(
        Error::InputTooLarge {
            size: 918,
            limit: 700,
        },
        parse_certificate_with(&pem, &options).unwrap_err()
    );
}

#[test]
fn test_pem_with_leading_text() {
    let mut input = b"subject=CN = www.example.com\nissuer=CN = Kensa Test Root\n".to_vec();
    input.extend(fixture("leaf-ec.pem"));
    assert_eq!(leaf(), parse_certificate(&input).unwrap());
}
