//! Error types for signature scanning operations.
//!
//! This module defines the error taxonomy for the scanning engine using
//! idiomatic Rust error handling patterns.
//!
//! # .NET vs Rust Error Handling
//!
//! In .NET, a scanner like this would typically throw exceptions:
//!
//! ```csharp
//! try {
//!     var engine = new ScanEngine(signatures);
//!     var report = engine.ScanFile(path);
//! } catch (ArgumentException e) {
//!     // Empty signature set, invalid signature...
//! } catch (IOException e) {
//!     // File errors
//! }
//! ```
//!
//! Rust uses the `Result` type with pattern matching instead:
//!
//! ```rust,no_run
//! use sigscout::{ScanConfig, ScanEngine, ScanError};
//!
//! # let signatures = vec![];
//! match ScanEngine::new(signatures, &ScanConfig::default()) {
//!     Ok(engine) => { /* scan away */ }
//!     Err(ScanError::EmptySignatureSet) => eprintln!("nothing to scan for"),
//!     Err(e) => eprintln!("engine construction failed: {e}"),
//! }
//! ```
//!
//! Key differences:
//!
//! - Errors are part of the function signature, not documentation
//! - The compiler enforces handling via `Result` and the `?` operator
//! - No cost when no error occurs (no try/catch overhead)
//! - Failures that must not abort a batch (an unreadable file during a
//!   directory sweep) are modeled as data ([`ScanStatus`] on the report)
//!   rather than as errors at all
//!
//! [`ScanStatus`]: crate::results::ScanStatus

use thiserror::Error;

/// Errors that can occur while building or feeding the scanning engine.
#[derive(Error, Debug)]
pub enum ScanError {
    /// No signatures were supplied; an engine with nothing to look for
    /// cannot produce a meaningful verdict.
    #[error("Signature set is empty")]
    EmptySignatureSet,

    /// A signature with zero bytes was supplied. The empty sequence would
    /// otherwise match at every offset.
    #[error("Signature '{0}' has no bytes")]
    EmptySignature(String),

    /// A line in a signature list file could not be parsed.
    #[error("Invalid signature on line {line}: {reason}")]
    InvalidSignature { line: usize, reason: String },

    /// The dedicated scan thread pool could not be created.
    #[error("Failed to build scan thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// IO errors from reading signature lists.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A serialized report frame was malformed.
    #[error("Invalid wire data: {0}")]
    InvalidWireData(String),
}

impl ScanError {
    /// Creates an empty-signature error for the given identifier.
    pub fn empty_signature(id: impl Into<String>) -> Self {
        Self::EmptySignature(id.into())
    }

    /// Creates an invalid-signature error for a 1-based line number.
    pub fn invalid_signature(line: usize, reason: impl Into<String>) -> Self {
        Self::InvalidSignature {
            line,
            reason: reason.into(),
        }
    }

    /// Creates an invalid-wire-data error.
    pub fn invalid_wire_data(reason: impl Into<String>) -> Self {
        Self::InvalidWireData(reason.into())
    }
}

/// Convenient Result type alias for scanning operations.
pub type ScanResult<T> = std::result::Result<T, ScanError>;
