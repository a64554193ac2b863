use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .to_path_buf()
}

fn test_cert_path(name: &str) -> String {
    project_root()
        .join("testdata/certs")
        .join(name)
        .to_string_lossy()
        .to_string()
}

fn kensa() -> Command {
    let mut cmd = Command::cargo_bin("kensa").unwrap();
    cmd.current_dir(project_root());
    cmd
}

#[test]
fn test_cert_inspect_file_brief() {
    kensa()
        .args([
            "cert",
            "inspect",
            &test_cert_path("localhost-rsa.pem"),
            "-o",
            "brief",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("CN=localhost"))
        .stdout(predicate::str::contains("Valid: 2025-05-23 to 2026-05-23"));
}

#[test]
fn test_cert_inspect_file_text() {
    kensa()
        .args(["cert", "inspect", &test_cert_path("leaf-ec.pem")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Certificate:"))
        .stdout(predicate::str::contains(
            "Subject: CN=www.example.com, OU=Platform",
        ))
        .stdout(predicate::str::contains("X509v3 extensions:"));
}

#[test]
fn test_cert_inspect_der_file() {
    kensa()
        .args(["cert", "inspect", &test_cert_path("leaf-ec.der"), "--show-serial"])
        .assert()
        .success()
        .stdout("Serial Number: c0:ff:ee:12:34:56:78:90:ab:cd:ef\n");
}

#[test]
fn test_cert_inspect_stdin() {
    let input = std::fs::read(test_cert_path("gnutls-ca.pem")).unwrap();
    kensa()
        .args(["cert", "inspect", "--show-subject"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Subject: CN=GnuTLS certificate authority",
        ));
}

#[test]
fn test_cert_inspect_show_issuer() {
    kensa()
        .args([
            "cert",
            "inspect",
            &test_cert_path("leaf-ec.pem"),
            "--show-issuer",
        ])
        .assert()
        .success()
        .stdout("Issuer: CN=Kensa Test Root, O=Kensa Test CA, C=JP\n");
}

#[test]
fn test_cert_inspect_show_dates() {
    kensa()
        .args([
            "cert",
            "inspect",
            &test_cert_path("legacy-v1.pem"),
            "--show-dates",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not Before: Oct 16 09:24:17 2026 GMT"))
        .stdout(predicate::str::contains("Not After: Oct 13 09:24:17 2036 GMT"));
}

#[test]
fn test_cert_inspect_show_fingerprint() {
    kensa()
        .args([
            "cert",
            "inspect",
            &test_cert_path("gnutls-ca.pem"),
            "--show-fingerprint",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "SHA1 Fingerprint: AE:C4:60:61:F4:58:FC:B5:6E:20:4A:11:79:DE:BB:CF:23:7F:1C:53",
        ))
        .stdout(predicate::str::contains("SHA256 Fingerprint:"));
}

#[test]
fn test_cert_inspect_show_hash() {
    kensa()
        .args([
            "cert",
            "inspect",
            &test_cert_path("gnutls-ca.pem"),
            "--show-hash",
        ])
        .assert()
        .success()
        .stdout("Subject Hash: 33b64a01\nIssuer Hash: 33b64a01\n");
}

#[test]
fn test_cert_inspect_show_extensions() {
    kensa()
        .args([
            "cert",
            "inspect",
            &test_cert_path("leaf-ec.pem"),
            "--show-extensions",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("  keyUsage [2.5.29.15] (critical)"))
        .stdout(predicate::str::contains(
            "  1.3.6.1.4.1.99999.42 [1.3.6.1.4.1.99999.42] (critical)",
        ));
}

#[test]
fn test_cert_inspect_no_extensions() {
    kensa()
        .args([
            "cert",
            "inspect",
            &test_cert_path("legacy-v1.pem"),
            "--show-extensions",
        ])
        .assert()
        .success()
        .stdout("No extensions\n");
}

#[test]
fn test_cert_inspect_show_san() {
    kensa()
        .args(["cert", "inspect", &test_cert_path("leaf-ec.pem"), "--show-san"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  DNS:www.example.com\n"))
        .stdout(predicate::str::contains("  IP Address:2001:db8::1\n"));
}

#[test]
fn test_cert_inspect_json_output() {
    let output = kensa()
        .args([
            "cert",
            "inspect",
            &test_cert_path("leaf-ec.pem"),
            "-o",
            "json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(3, json["version"]);
    assert_eq!(
        "CN=Kensa Test Root, O=Kensa Test CA, C=JP",
        json["issuer"]["distinguishedName"]
    );
    assert_eq!(9, json["extensions"].as_array().unwrap().len());
}

#[test]
fn test_cert_inspect_yaml_output() {
    kensa()
        .args([
            "cert",
            "inspect",
            &test_cert_path("legacy-v1.pem"),
            "-o",
            "yaml",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("version: 1"))
        .stdout(predicate::str::contains("serialNumber:"));
}

#[test]
fn test_cert_inspect_max_size() {
    kensa()
        .args([
            "cert",
            "inspect",
            &test_cert_path("leaf-ec.der"),
            "--max-size",
            "100",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("InputTooLarge"));
}

#[test]
fn test_cert_inspect_not_a_certificate() {
    kensa()
        .args(["cert", "inspect"])
        .write_stdin("hello")
        .assert()
        .failure();
}

#[test]
fn test_der_dump() {
    kensa()
        .args(["der", "dump", &test_cert_path("legacy-v1.pem")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("    0:d=0  hl=4 l= 496 cons: SEQUENCE\n"))
        .stdout(predicate::str::contains("OBJECT IDENTIFIER :1.2.840.113549.1.1.11"))
        .stdout(predicate::str::contains("UTF8String :legacy.example.org"));
}
