use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::num::NonZeroU64;
use std::path::Path;
use tracing::{debug, info, warn};

use super::shard::ScanShard;
use super::signature::Signature;
use crate::config::ScanConfig;
use crate::errors::{ScanError, ScanResult};
use crate::metrics::ScanMetrics;
use crate::results::{ScanReport, ScanStatus};

/// Orchestrates concurrent scans over a fixed signature partition.
///
/// Construction does all the expensive work once: the signature set is
/// validated, split into per-worker shards with balanced total byte
/// length, and a dedicated thread pool of exactly one thread per shard is
/// built. After that the engine is immutable apart from
/// [`set_chunk_size`](Self::set_chunk_size), and every call to
/// [`scan_bytes`](Self::scan_bytes) or [`scan_file`](Self::scan_file)
/// reuses the same shards and the same threads.
pub struct ScanEngine {
    shards: Vec<ScanShard>,
    pool: ThreadPool,
    chunk_size: u64,
    read_window: usize,
    max_signature_len: usize,
    metrics: ScanMetrics,
}

impl ScanEngine {
    /// Builds an engine from the full signature set.
    ///
    /// Fails with [`ScanError::EmptySignatureSet`] when no signatures are
    /// given and with [`ScanError::EmptySignature`] when any signature has
    /// zero bytes. The shard count is the configured thread count capped
    /// by the number of signatures, so no pool thread ever sits idle with
    /// an empty shard.
    pub fn new(signatures: Vec<Signature>, config: &ScanConfig) -> ScanResult<Self> {
        if signatures.is_empty() {
            return Err(ScanError::EmptySignatureSet);
        }
        if let Some(signature) = signatures.iter().find(|sig| sig.is_empty()) {
            return Err(ScanError::empty_signature(signature.id()));
        }

        let max_signature_len = signatures
            .iter()
            .map(Signature::len)
            .max()
            .unwrap_or_default();
        let shard_count = config.thread_count.get().min(signatures.len());
        debug!(
            "partitioning {} signatures across {} shards",
            signatures.len(),
            shard_count
        );

        let shards = partition_signatures(signatures, shard_count);
        for (index, shard) in shards.iter().enumerate() {
            debug!(
                "shard {}: {} signatures, {} total bytes",
                index,
                shard.signatures().len(),
                shard.load()
            );
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(shard_count)
            .thread_name(|index| format!("sigscout-{index}"))
            .build()?;

        let mut engine = Self {
            shards,
            pool,
            chunk_size: 0,
            read_window: 0,
            max_signature_len,
            metrics: ScanMetrics::new(),
        };
        engine.set_chunk_size(config.chunk_size);
        Ok(engine)
    }

    /// Changes the logical chunk size used by [`scan_file`](Self::scan_file)
    /// and recomputes the read window.
    ///
    /// The window extends each chunk by `max_signature_len - 1` bytes so a
    /// match starting on the last byte of a chunk is still fully visible
    /// to that chunk's scan.
    pub fn set_chunk_size(&mut self, chunk_size: NonZeroU64) {
        self.chunk_size = chunk_size.get();
        self.read_window = self.chunk_size as usize + self.max_signature_len - 1;
        info!(
            "chunk size set to {} bytes, read window {} bytes",
            self.chunk_size, self.read_window
        );
    }

    /// Number of shards, which equals the pool's thread count.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Total number of signatures across all shards.
    pub fn signature_count(&self) -> usize {
        self.shards.iter().map(|shard| shard.signatures().len()).sum()
    }

    /// Length in bytes of the longest signature.
    pub fn max_signature_len(&self) -> usize {
        self.max_signature_len
    }

    /// Current logical chunk size in bytes.
    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Bytes read per chunk iteration: chunk size plus the overlap.
    pub fn read_window(&self) -> usize {
        self.read_window
    }

    /// Throughput counters accumulated across scans.
    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }

    /// Scans an in-memory buffer against every signature.
    ///
    /// The borrowed buffer is fanned out to all shards on the engine's
    /// pool. Each shard collects matches into its own set; the sets are
    /// unioned only after every shard has finished, so no shard ever
    /// touches shared state mid-scan. Always returns
    /// [`ScanStatus::Success`], with the union of all matches.
    pub fn scan_bytes(&self, data: &[u8]) -> ScanReport {
        debug!("scanning {} byte buffer", data.len());

        let shard_matches: Vec<BTreeSet<String>> = self
            .pool
            .install(|| self.shards.par_iter().map(|shard| shard.scan(data)).collect());

        let mut report = ScanReport::new();
        for matches in shard_matches {
            report.matches.extend(matches);
        }

        self.metrics
            .record_buffer(data.len() as u64, report.matches.len() as u64);
        debug!("buffer scan complete, {} signatures found", report.matches.len());
        report
    }

    /// Scans a file in overlapping chunks without loading it whole.
    ///
    /// Each iteration seeks to `iteration * chunk_size` and reads up to
    /// [`read_window`](Self::read_window) bytes, so a match starting
    /// anywhere inside the logical chunk lies fully inside the bytes
    /// handed to [`scan_bytes`](Self::scan_bytes). A sequence straddling
    /// a chunk boundary is simply found again by the next chunk and
    /// collapsed by set semantics.
    ///
    /// Failures are reported on the returned [`ScanReport`] rather than
    /// as errors: [`ScanStatus::CannotOpenFile`] when the file cannot be
    /// opened, [`ScanStatus::SeekError`] when a mid-scan seek fails. In
    /// the latter case the matches collected so far are kept, so callers
    /// still see partial findings.
    pub fn scan_file(&self, path: &Path) -> ScanReport {
        info!("scanning file {}", path.display());

        let mut report = ScanReport::new();
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                warn!("cannot open {}: {}", path.display(), err);
                report.status = ScanStatus::CannotOpenFile;
                return report;
            }
        };

        let mut buffer = vec![0u8; self.read_window];
        let mut iteration = 0u64;
        loop {
            if let Err(err) = file.seek(SeekFrom::Start(iteration * self.chunk_size)) {
                warn!(
                    "seek to chunk {} of {} failed: {}",
                    iteration,
                    path.display(),
                    err
                );
                report.status = ScanStatus::SeekError;
                return report;
            }

            let read = match read_fill(&mut file, &mut buffer) {
                Ok(read) => read,
                Err(err) => {
                    // The status taxonomy has no read-error entry; stop at
                    // the data already scanned, like a short read at end
                    // of file.
                    warn!(
                        "read in chunk {} of {} failed: {}",
                        iteration,
                        path.display(),
                        err
                    );
                    break;
                }
            };

            report.merge_matches(self.scan_bytes(&buffer[..read]));
            self.metrics.record_chunk();
            iteration += 1;

            if read < buffer.len() {
                break;
            }
        }

        self.metrics.record_file();
        info!(
            "file {} scanned in {} chunks, {} signatures found",
            path.display(),
            iteration,
            report.matches.len()
        );
        report
    }
}

/// Fills `buf` from `file`, stopping early only at end of file.
fn read_fill(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

/// Splits the signature set into `shard_count` groups with roughly equal
/// total byte length.
///
/// Signatures are sorted by descending length (identifiers break ties so
/// the partition is reproducible) and each is assigned to the group with
/// the smallest running total, lowest index winning ties. Greedy rather
/// than optimal: sequence length dominates per-shard scan cost, and this
/// keeps every group within one signature length of the ideal average.
fn partition_signatures(mut signatures: Vec<Signature>, shard_count: usize) -> Vec<ScanShard> {
    signatures.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.id().cmp(b.id())));

    let mut groups: Vec<Vec<Signature>> = (0..shard_count).map(|_| Vec::new()).collect();
    let mut loads = vec![0u64; shard_count];
    for signature in signatures {
        let lightest = loads
            .iter()
            .enumerate()
            .min_by_key(|&(_, load)| *load)
            .map(|(index, _)| index)
            .unwrap_or_default();
        loads[lightest] += signature.len() as u64;
        groups[lightest].push(signature);
    }

    groups.into_iter().map(ScanShard::new).collect()
}
