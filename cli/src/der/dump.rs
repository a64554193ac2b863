use std::fmt::Write;

use clap::Args;
use kensa::decoder::Decoder;
use kensa_asn1::{Asn1String, Integer, ObjectIdentifier, Time};
use kensa_der::{Class, Reader, Tag, Tlv};

use crate::error::{Error, Result};
use crate::utils::{format_hex, read_input};

// primitive values longer than this are cut short
const MAX_VALUE_BYTES: usize = 32;

// X.509 structures nest a dozen levels at most
const MAX_DEPTH: usize = 64;

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the PEM or DER file. If not specified, reads from stdin
    file: Option<String>,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let input_bytes = read_input(config.file.as_deref())?;
    let der = kensa_pem::unwrap_certificate(&input_bytes)?;

    let mut output = String::new();
    dump(&mut output, &mut Reader::new(&der), 0)?;
    print!("{}", output);
    Ok(())
}

/// Writes one line per element, OpenSSL `asn1parse` style, descending into
/// constructed values. Nesting beyond `MAX_DEPTH` levels is refused.
fn dump(output: &mut String, reader: &mut Reader<'_>, depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(Error::NestingTooDeep {
            offset: reader.offset(),
            limit: MAX_DEPTH,
        });
    }
    while !reader.is_empty() {
        let tlv = reader.read_tlv()?;
        let form = if tlv.tag().is_constructed() { "cons" } else { "prim" };
        write!(
            output,
            "{:5}:d={:<2} hl={} l={:4} {}: {:indent$}{}",
            tlv.offset(),
            depth,
            tlv.header_len(),
            tlv.len(),
            form,
            "",
            tlv.tag(),
            indent = depth,
        )?;
        if tlv.tag().is_constructed() {
            writeln!(output)?;
            dump(output, &mut tlv.reader(), depth + 1)?;
        } else {
            match format_value(&tlv) {
                Some(value) => writeln!(output, " :{}", value)?,
                None => writeln!(output)?,
            }
        }
    }
    Ok(())
}

fn format_value(tlv: &Tlv<'_>) -> Option<String> {
    if tlv.is_empty() {
        return None;
    }
    if tlv.tag().class() != Class::Universal {
        return Some(format_bytes(tlv.value()));
    }
    let value = match tlv.tag() {
        Tag::BOOLEAN => match tlv.value() {
            [0x00] => "FALSE".to_string(),
            _ => "TRUE".to_string(),
        },
        Tag::INTEGER => {
            let integer: Integer = tlv.decode().ok()?;
            integer.to_string()
        }
        Tag::OBJECT_IDENTIFIER => {
            let oid: ObjectIdentifier = tlv.decode().ok()?;
            oid.to_string()
        }
        Tag::UTC_TIME | Tag::GENERALIZED_TIME => {
            let time: Time = tlv.decode().ok()?;
            time.to_datetime().to_rfc3339()
        }
        Tag::BIT_STRING | Tag::OCTET_STRING => format_bytes(tlv.value()),
        _ => match Decoder::<Tlv, Asn1String>::decode(tlv) {
            Ok(s) => s.as_str().to_string(),
            Err(_) => format_bytes(tlv.value()),
        },
    };
    Some(value)
}

fn format_bytes(data: &[u8]) -> String {
    if data.len() > MAX_VALUE_BYTES {
        format!("{}...", format_hex(&data[..MAX_VALUE_BYTES]))
    } else {
        format_hex(data)
    }
}
