//! Types describing the outcome of a scan.
//!
//! A scan never half-reports: every entry point returns a [`ScanReport`]
//! carrying both a [`ScanStatus`] and whatever matches were collected
//! before the scan finished or gave up. Callers that only care about the
//! verdict can ignore the status; callers that sweep whole directory
//! trees use it to tell "clean" apart from "unreadable".

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Outcome of a single scan request.
///
/// The discriminants are stable and shared with the wire encoding in
/// [`crate::wire`], so they must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum ScanStatus {
    /// The scan ran to completion.
    #[default]
    Success = 0,
    /// The target file could not be opened.
    CannotOpenFile = 1,
    /// A seek inside the target file failed mid-scan.
    SeekError = 2,
}

impl ScanStatus {
    /// Stable numeric code for this status.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Converts a numeric code back into a status, if it names one.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::CannotOpenFile),
            2 => Some(Self::SeekError),
            _ => None,
        }
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Success => "success",
            Self::CannotOpenFile => "cannot open file",
            Self::SeekError => "seek error",
        };
        write!(f, "{text}")
    }
}

/// Result of scanning one input: a status plus the identifiers of every
/// signature found at least once.
///
/// Matches are kept in a [`BTreeSet`], so each identifier appears once no
/// matter how many offsets (or overlapping file chunks) produced it, and
/// iteration order is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScanReport {
    /// How the scan ended.
    pub status: ScanStatus,
    /// Identifiers of every signature detected.
    pub matches: BTreeSet<String>,
}

impl ScanReport {
    /// Creates an empty report with [`ScanStatus::Success`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty report with the given status.
    pub fn with_status(status: ScanStatus) -> Self {
        Self {
            status,
            matches: BTreeSet::new(),
        }
    }

    /// True when no signature matched.
    pub fn clean(&self) -> bool {
        self.matches.is_empty()
    }

    /// Folds another report's matches into this one.
    ///
    /// Only the match set is merged; the status of `other` is discarded.
    /// Chunked file scans use this to accumulate per-chunk findings while
    /// the overall status is tracked separately.
    pub fn merge_matches(&mut self, other: ScanReport) {
        self.matches.extend(other.matches);
    }
}
