use std::fmt::Write;

use clap::Args;
use kensa_x509::extensions::SubjectAltName;
use kensa_x509::{Certificate, DATE_FORMAT, DecodeOptions};
use log::debug;

use crate::error::Result;
use crate::output::OutputFormat;
use crate::utils::read_input;

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the certificate file (PEM or DER format). If not specified, reads from stdin
    file: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Show only subject
    #[arg(long)]
    show_subject: bool,

    /// Show only issuer
    #[arg(long)]
    show_issuer: bool,

    /// Show only validity dates
    #[arg(long)]
    show_dates: bool,

    /// Show only serial number
    #[arg(long)]
    show_serial: bool,

    /// Show the OpenSSL subject and issuer name hashes
    #[arg(long)]
    show_hash: bool,

    /// Show SHA1 and SHA256 fingerprints
    #[arg(long)]
    show_fingerprint: bool,

    /// List all extensions
    #[arg(long)]
    show_extensions: bool,

    /// Show Subject Alternative Names (SAN)
    #[arg(long)]
    show_san: bool,

    /// Largest accepted DER size in bytes
    #[arg(long, value_name = "N")]
    max_size: Option<usize>,
}

impl Config {
    fn should_show_specific_fields(&self) -> bool {
        self.show_subject
            || self.show_issuer
            || self.show_dates
            || self.show_serial
            || self.show_hash
            || self.show_fingerprint
            || self.show_extensions
            || self.show_san
    }

    fn decode_options(&self) -> DecodeOptions {
        match self.max_size {
            Some(max) => DecodeOptions::new().with_max_input_size(max),
            None => DecodeOptions::default(),
        }
    }
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let input_bytes = read_input(config.file.as_deref())?;
    let cert = kensa_x509::parse_certificate_with(&input_bytes, &config.decode_options())?;
    debug!("decoded certificate {}", cert.subject());

    if config.should_show_specific_fields() {
        print!("{}", format_specific_fields(&cert, &config)?);
        return Ok(());
    }

    match config.output {
        OutputFormat::Text => {
            print!("{}", cert);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&cert)?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            // Convert to JSON value first, then to YAML
            let json_value = serde_json::to_value(&cert)?;
            let yaml = serde_yml::to_string(&json_value)?;
            print!("{}", yaml);
        }
        OutputFormat::Brief => {
            println!("{}", format_brief(&cert));
        }
    }

    Ok(())
}

fn format_brief(cert: &Certificate) -> String {
    let validity = cert.validity();
    format!(
        "{} | Valid: {} to {}",
        cert.subject(),
        validity.not_before.format("%Y-%m-%d"),
        validity.not_after.format("%Y-%m-%d")
    )
}

fn format_specific_fields(cert: &Certificate, config: &Config) -> Result<String> {
    let mut output = String::new();

    if config.show_subject {
        writeln!(output, "Subject: {}", cert.subject())?;
    }
    if config.show_issuer {
        writeln!(output, "Issuer: {}", cert.issuer())?;
    }
    if config.show_dates {
        format_dates(&mut output, cert)?;
    }
    if config.show_serial {
        writeln!(output, "Serial Number: {}", cert.serial_number())?;
    }
    if config.show_hash {
        writeln!(output, "Subject Hash: {:08x}", cert.subject_hash())?;
        writeln!(output, "Issuer Hash: {:08x}", cert.issuer_hash())?;
    }
    if config.show_fingerprint {
        writeln!(output, "SHA1 Fingerprint: {}", cert.fingerprint_sha1())?;
        writeln!(output, "SHA256 Fingerprint: {}", cert.fingerprint_sha256())?;
    }
    if config.show_extensions {
        format_extensions(&mut output, cert)?;
    }
    if config.show_san {
        format_san(&mut output, cert)?;
    }

    Ok(output)
}

fn format_dates(output: &mut String, cert: &Certificate) -> Result<()> {
    let validity = cert.validity();
    writeln!(output, "Not Before: {}", validity.not_before.format(DATE_FORMAT))?;
    writeln!(output, "Not After: {}", validity.not_after.format(DATE_FORMAT))?;
    Ok(())
}

fn format_extensions(output: &mut String, cert: &Certificate) -> Result<()> {
    if cert.extensions().is_empty() {
        writeln!(output, "No extensions")?;
        return Ok(());
    }
    writeln!(output, "Extensions:")?;
    for ext in cert.extensions() {
        let oid = ext.oid().to_string();
        let name = ext.name().unwrap_or(&oid);
        let critical = if ext.is_critical() { " (critical)" } else { "" };
        write!(output, "  {} [{}]{}", name, oid, critical)?;
        match ext.decode_error() {
            Some(err) => writeln!(output, " <unparsable: {}>", err.reason)?,
            None => writeln!(output)?,
        }
    }
    Ok(())
}

fn format_san(output: &mut String, cert: &Certificate) -> Result<()> {
    match cert.extension::<SubjectAltName>() {
        Some(san) => {
            writeln!(output, "Subject Alternative Names:")?;
            for name in &san.names {
                writeln!(output, "  {}", name)?;
            }
        }
        None => writeln!(output, "No Subject Alternative Names")?,
    }
    Ok(())
}
