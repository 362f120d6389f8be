//! Transport-neutral encoding of scan reports.
//!
//! The frame layout is a status code byte, a match count, then each
//! identifier as a length-prefixed UTF-8 string:
//!
//! ```text
//! [status: u8][count: u32 LE]([len: u32 LE][id bytes])*
//! ```
//!
//! Decoding is strict: unknown status codes, truncated prefixes or
//! identifiers, non-UTF-8 identifiers, and trailing bytes are all
//! rejected, so a frame either round-trips exactly or fails loudly.

use std::collections::BTreeSet;

use crate::errors::{ScanError, ScanResult};
use crate::results::{ScanReport, ScanStatus};

/// Byte width of the count and length prefixes.
const PREFIX_BYTES: usize = 4;

/// Encodes a report into a wire frame.
pub fn encode_report(report: &ScanReport) -> Vec<u8> {
    let payload: usize = report
        .matches
        .iter()
        .map(|id| PREFIX_BYTES + id.len())
        .sum();
    let mut frame = Vec::with_capacity(1 + PREFIX_BYTES + payload);

    frame.push(report.status.code());
    frame.extend_from_slice(&(report.matches.len() as u32).to_le_bytes());
    for id in &report.matches {
        frame.extend_from_slice(&(id.len() as u32).to_le_bytes());
        frame.extend_from_slice(id.as_bytes());
    }
    frame
}

/// Decodes a frame produced by [`encode_report`].
pub fn decode_report(frame: &[u8]) -> ScanResult<ScanReport> {
    let (&code, mut rest) = frame
        .split_first()
        .ok_or_else(|| ScanError::invalid_wire_data("empty frame"))?;
    let status = ScanStatus::from_code(code)
        .ok_or_else(|| ScanError::invalid_wire_data(format!("unknown status code {code}")))?;

    let count = take_u32(&mut rest)?;
    let mut matches = BTreeSet::new();
    for _ in 0..count {
        let length = take_u32(&mut rest)? as usize;
        if rest.len() < length {
            return Err(ScanError::invalid_wire_data("identifier truncated"));
        }
        let (id, remainder) = rest.split_at(length);
        let id = std::str::from_utf8(id)
            .map_err(|_| ScanError::invalid_wire_data("identifier is not valid UTF-8"))?;
        matches.insert(id.to_string());
        rest = remainder;
    }

    if !rest.is_empty() {
        return Err(ScanError::invalid_wire_data(format!(
            "{} trailing bytes after last identifier",
            rest.len()
        )));
    }
    Ok(ScanReport { status, matches })
}

/// Consumes one little-endian u32 prefix from the front of `rest`.
fn take_u32(rest: &mut &[u8]) -> ScanResult<u32> {
    if rest.len() < PREFIX_BYTES {
        return Err(ScanError::invalid_wire_data("length prefix truncated"));
    }
    let (prefix, remainder) = rest.split_at(PREFIX_BYTES);
    let mut bytes = [0u8; PREFIX_BYTES];
    bytes.copy_from_slice(prefix);
    *rest = remainder;
    Ok(u32::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with(status: ScanStatus, ids: &[&str]) -> ScanReport {
        let mut report = ScanReport::with_status(status);
        for id in ids {
            report.matches.insert((*id).to_string());
        }
        report
    }

    #[test]
    fn test_round_trip_with_matches() {
        let report = report_with(ScanStatus::Success, &["guid-a", "guid-b", "guid-c"]);
        let decoded = decode_report(&encode_report(&report)).unwrap();
        assert_eq!(decoded, report);
    }

    #[test]
    fn test_round_trip_each_status_empty_matches() {
        for status in [
            ScanStatus::Success,
            ScanStatus::CannotOpenFile,
            ScanStatus::SeekError,
        ] {
            let report = report_with(status, &[]);
            let decoded = decode_report(&encode_report(&report)).unwrap();
            assert_eq!(decoded.status, status);
            assert!(decoded.clean());
        }
    }

    #[test]
    fn test_round_trip_non_ascii_identifier() {
        let report = report_with(ScanStatus::Success, &["détection-γ"]);
        let decoded = decode_report(&encode_report(&report)).unwrap();
        assert!(decoded.matches.contains("détection-γ"));
    }

    #[test]
    fn test_frame_layout_is_stable() {
        let report = report_with(ScanStatus::SeekError, &["ab"]);
        let frame = encode_report(&report);
        assert_eq!(frame[0], 2);
        assert_eq!(&frame[1..5], &1u32.to_le_bytes());
        assert_eq!(&frame[5..9], &2u32.to_le_bytes());
        assert_eq!(&frame[9..], b"ab");
    }

    #[test]
    fn test_empty_frame_rejected() {
        assert!(decode_report(&[]).is_err());
    }

    #[test]
    fn test_unknown_status_rejected() {
        let mut frame = encode_report(&ScanReport::new());
        frame[0] = 7;
        let err = decode_report(&frame).unwrap_err();
        assert!(err.to_string().contains("unknown status code 7"));
    }

    #[test]
    fn test_truncated_count_rejected() {
        assert!(decode_report(&[0, 1, 0]).is_err());
    }

    #[test]
    fn test_truncated_identifier_rejected() {
        let report = report_with(ScanStatus::Success, &["longish-guid"]);
        let frame = encode_report(&report);
        assert!(decode_report(&frame[..frame.len() - 1]).is_err());
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut frame = encode_report(&report_with(ScanStatus::Success, &["x"]));
        frame.push(0);
        let err = decode_report(&frame).unwrap_err();
        assert!(err.to_string().contains("trailing"));
    }
}
