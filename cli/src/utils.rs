use std::fs;
use std::io::{self, Read};

use log::debug;

use crate::error::Result;

/// Read input from a file or stdin
///
/// If `file` is `Some`, reads from the specified file path.
/// If `file` is `None`, reads from stdin.
pub(crate) fn read_input(file: Option<&str>) -> Result<Vec<u8>> {
    let buffer = match file {
        Some(path) => fs::read(path)?,
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            buffer
        }
    };
    debug!("read {} bytes from {}", buffer.len(), file.unwrap_or("stdin"));
    Ok(buffer)
}

/// Colon separated uppercase hex, the way OpenSSL prints key identifiers.
pub(crate) fn format_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}
