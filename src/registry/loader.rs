//! Registry loading from a line-oriented `name:address` source.
//!
//! Malformed lines are skipped rather than rejected so that one bad entry
//! cannot prevent startup. Only an unreadable source is an error.

use alloy::primitives::Address;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::registry::types::WatchedAddress;

/// The registry source could not be read.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to open address file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read address source: {0}")]
    Read(#[from] std::io::Error),
}

/// Parse one registry line.
///
/// The line is split on the first `:`. Lines without a separator or with an
/// address that is not 20 hex-encoded bytes yield `None`. The name is kept
/// as written, even when empty. A trailing `\r` is dropped for CRLF files.
pub fn parse_line(line: &str) -> Option<WatchedAddress> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let (name, address) = line.split_once(':')?;

    if !is_hex_address(address) {
        return None;
    }

    let parsed: Address = address.parse().ok()?;
    Some(WatchedAddress::new(name, address, parsed))
}

/// `0x`-optional, exactly 40 hex digits. Checksums are not enforced.
fn is_hex_address(s: &str) -> bool {
    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Read every line of `reader`, keeping the ones that parse, in order.
pub fn parse_addresses<R: BufRead>(reader: R) -> Result<Vec<WatchedAddress>, RegistryError> {
    let mut watched = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_line(&line) {
            Some(entry) => watched.push(entry),
            None => {
                tracing::debug!(line = idx + 1, content = %line, "Skipping malformed registry line")
            }
        }
    }

    Ok(watched)
}

/// Load the registry from a file.
pub fn load_addresses(path: &Path) -> Result<Vec<WatchedAddress>, RegistryError> {
    let file = File::open(path).map_err(|source| RegistryError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let watched = parse_addresses(BufReader::new(file))?;

    tracing::info!(
        path = %path.display(),
        addresses = watched.len(),
        "Address registry loaded"
    );

    Ok(watched)
}
