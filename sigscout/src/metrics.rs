//! Throughput counters for scanning operations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Tracks scan activity across the lifetime of an engine.
///
/// Counters sit behind `Arc`, so clones observe one shared set of totals
/// and recording from any thread is safe. All updates use relaxed
/// ordering; the counters are informational and never synchronize other
/// state.
#[derive(Debug, Clone)]
pub struct ScanMetrics {
    buffers_scanned: Arc<AtomicU64>,
    bytes_scanned: Arc<AtomicU64>,
    files_scanned: Arc<AtomicU64>,
    chunks_read: Arc<AtomicU64>,
    matches_found: Arc<AtomicU64>,
}

/// Point-in-time snapshot of [`ScanMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub buffers_scanned: u64,
    pub bytes_scanned: u64,
    pub files_scanned: u64,
    pub chunks_read: u64,
    pub matches_found: u64,
}

impl ScanMetrics {
    /// Creates a new metrics tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            buffers_scanned: Arc::new(AtomicU64::new(0)),
            bytes_scanned: Arc::new(AtomicU64::new(0)),
            files_scanned: Arc::new(AtomicU64::new(0)),
            chunks_read: Arc::new(AtomicU64::new(0)),
            matches_found: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records one buffer scan of `bytes` bytes yielding `matched`
    /// distinct identifiers.
    ///
    /// Chunked file scans pass each chunk through here, so a sequence
    /// straddling two chunks counts once per chunk. The counter tracks
    /// detection events, not distinct sequences.
    pub fn record_buffer(&self, bytes: u64, matched: u64) {
        self.buffers_scanned.fetch_add(1, Ordering::Relaxed);
        self.bytes_scanned.fetch_add(bytes, Ordering::Relaxed);
        self.matches_found.fetch_add(matched, Ordering::Relaxed);
    }

    /// Records one chunk read during a file scan.
    pub fn record_chunk(&self) {
        self.chunks_read.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one completed file scan.
    pub fn record_file(&self) {
        self.files_scanned.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a snapshot of the current counters.
    pub fn get_stats(&self) -> ScanStats {
        ScanStats {
            buffers_scanned: self.buffers_scanned.load(Ordering::Relaxed),
            bytes_scanned: self.bytes_scanned.load(Ordering::Relaxed),
            files_scanned: self.files_scanned.load(Ordering::Relaxed),
            chunks_read: self.chunks_read.load(Ordering::Relaxed),
            matches_found: self.matches_found.load(Ordering::Relaxed),
        }
    }

    /// Logs the current counters at info level.
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "scan stats: {} buffers, {} bytes, {} files, {} chunks, {} matches",
            stats.buffers_scanned,
            stats.bytes_scanned,
            stats.files_scanned,
            stats.chunks_read,
            stats.matches_found
        );
    }
}

impl Default for ScanMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_are_zero() {
        let stats = ScanMetrics::new().get_stats();
        assert_eq!(stats.buffers_scanned, 0);
        assert_eq!(stats.bytes_scanned, 0);
        assert_eq!(stats.files_scanned, 0);
        assert_eq!(stats.chunks_read, 0);
        assert_eq!(stats.matches_found, 0);
    }

    #[test]
    fn test_record_buffer_accumulates() {
        let metrics = ScanMetrics::new();
        metrics.record_buffer(100, 2);
        metrics.record_buffer(50, 0);

        let stats = metrics.get_stats();
        assert_eq!(stats.buffers_scanned, 2);
        assert_eq!(stats.bytes_scanned, 150);
        assert_eq!(stats.matches_found, 2);
    }

    #[test]
    fn test_file_and_chunk_counters() {
        let metrics = ScanMetrics::new();
        metrics.record_chunk();
        metrics.record_chunk();
        metrics.record_file();

        let stats = metrics.get_stats();
        assert_eq!(stats.chunks_read, 2);
        assert_eq!(stats.files_scanned, 1);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = ScanMetrics::new();
        let clone = metrics.clone();
        clone.record_buffer(10, 1);

        assert_eq!(metrics.get_stats().bytes_scanned, 10);
    }
}
