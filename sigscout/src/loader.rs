//! Loading signature lists from files.
//!
//! A signature list is a line-oriented file. Each non-empty line holds
//! one entry:
//!
//! ```text
//! <raw-bytes>.{<identifier>}
//! ```
//!
//! The bytes before the delimiter are taken verbatim. They are not
//! required to be UTF-8 and may themselves contain `.{`; the *rightmost*
//! occurrence starts the identifier, which must be UTF-8 and runs to the
//! closing `}` at end of line. Blank lines are skipped, trailing `\r` is
//! stripped so DOS line endings load cleanly.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::{ScanError, ScanResult};
use crate::scan::Signature;

/// Loads a signature list from a file.
///
/// Returns [`ScanError::Io`] when the file cannot be read and
/// [`ScanError::InvalidSignature`] (with a 1-based line number) for the
/// first malformed line.
pub fn load_signatures(path: &Path) -> ScanResult<Vec<Signature>> {
    let raw = fs::read(path)?;
    let signatures = parse_signatures(&raw)?;
    debug!(
        "loaded {} signatures from {}",
        signatures.len(),
        path.display()
    );
    Ok(signatures)
}

/// Parses signature list bytes.
///
/// Zero-length byte sequences and zero-length identifiers are rejected
/// here, so the engine never sees a signature that can match nothing or
/// report nothing.
pub fn parse_signatures(raw: &[u8]) -> ScanResult<Vec<Signature>> {
    let mut signatures = Vec::new();
    for (index, line) in raw.split(|&byte| byte == b'\n').enumerate() {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            continue;
        }
        let number = index + 1;

        let body = line
            .strip_suffix(b"}")
            .ok_or_else(|| ScanError::invalid_signature(number, "missing trailing '}'"))?;
        let split = body
            .windows(2)
            .rposition(|pair| pair == b".{")
            .ok_or_else(|| ScanError::invalid_signature(number, "missing '.{' delimiter"))?;

        let bytes = &body[..split];
        let id = &body[split + 2..];
        if bytes.is_empty() {
            return Err(ScanError::invalid_signature(number, "byte sequence is empty"));
        }
        if id.is_empty() {
            return Err(ScanError::invalid_signature(number, "identifier is empty"));
        }
        let id = std::str::from_utf8(id).map_err(|_| {
            ScanError::invalid_signature(number, "identifier is not valid UTF-8")
        })?;

        signatures.push(Signature::new(bytes, id));
    }
    Ok(signatures)
}
