use std::collections::BTreeSet;

use super::signature::Signature;

/// One worker's share of the signature set.
///
/// A shard owns its signatures for the lifetime of the engine and scans
/// borrowed data against only that subset, sequentially, on whichever
/// pool thread picks it up. Shards never share mutable state; each scan
/// returns its own match set.
#[derive(Debug, Clone)]
pub struct ScanShard {
    signatures: Vec<Signature>,
    min_len: usize,
}

impl ScanShard {
    /// Creates a shard owning the given signatures.
    pub fn new(signatures: Vec<Signature>) -> Self {
        let min_len = signatures
            .iter()
            .map(Signature::len)
            .min()
            .unwrap_or_default();
        Self {
            signatures,
            min_len,
        }
    }

    /// The signatures owned by this shard.
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// Total signature bytes owned by this shard. Partitioning balances
    /// this quantity, since the cost of a scan tracks sequence length.
    pub fn load(&self) -> u64 {
        self.signatures.iter().map(|sig| sig.len() as u64).sum()
    }

    /// Shortest signature length in this shard.
    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// Scans `data` against every signature in this shard and returns the
    /// identifiers that matched at least once.
    ///
    /// Brute force over candidate offsets. Offsets past
    /// `data.len() - min_len` cannot start even the shortest match and are
    /// skipped wholesale; the last offset that can is tested, so a
    /// signature sitting flush against the end of the data is found.
    pub fn scan(&self, data: &[u8]) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        if self.signatures.is_empty() || data.len() < self.min_len {
            return found;
        }

        for offset in 0..=data.len() - self.min_len {
            for signature in &self.signatures {
                if signature.matches_at(data, offset) {
                    found.insert(signature.id().to_string());
                }
            }
        }
        found
    }
}
