/// Number of bytes compared per word-granular step.
const WORD_BYTES: usize = std::mem::size_of::<u64>();

/// An exact byte sequence tied to an identifier.
///
/// The sequence is immutable after construction. To keep the per-offset
/// comparison cheap, the constructor splits the bytes into a prefix that
/// is compared as native-endian 64-bit words and a tail of fewer than
/// eight bytes that is compared as a plain slice. The split is a pure
/// precomputation; [`matches_at`](Self::matches_at) reports exactly the
/// same matches a byte-by-byte comparison would.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    bytes: Vec<u8>,
    id: String,
    prefix_words: Vec<u64>,
}

impl Signature {
    /// Creates a signature from raw bytes and an identifier.
    ///
    /// The bytes are arbitrary; they are matched exactly and never
    /// interpreted as text.
    pub fn new(bytes: impl Into<Vec<u8>>, id: impl Into<String>) -> Self {
        let bytes = bytes.into();
        let prefix_words = bytes.chunks_exact(WORD_BYTES).map(load_word).collect();
        Self {
            bytes,
            id: id.into(),
            prefix_words,
        }
    }

    /// The identifier reported when this signature matches.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The raw byte sequence.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length of the sequence in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-length sequence.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Length in bytes of the word-compared prefix.
    fn prefix_len(&self) -> usize {
        self.prefix_words.len() * WORD_BYTES
    }

    /// The bytes after the word-aligned prefix; shorter than one word.
    fn tail(&self) -> &[u8] {
        &self.bytes[self.prefix_len()..]
    }

    /// Returns true when this sequence occurs in `data` starting at
    /// `offset`.
    ///
    /// Zero-length sequences never match; without that rule the empty
    /// sequence would match at every offset of every input.
    pub fn matches_at(&self, data: &[u8], offset: usize) -> bool {
        if self.bytes.is_empty() {
            return false;
        }
        let window = match data.get(offset..) {
            Some(window) if window.len() >= self.bytes.len() => window,
            _ => return false,
        };

        let words = window[..self.prefix_len()]
            .chunks_exact(WORD_BYTES)
            .map(load_word);
        for (have, want) in words.zip(&self.prefix_words) {
            if have != *want {
                return false;
            }
        }

        &window[self.prefix_len()..self.bytes.len()] == self.tail()
    }
}

/// Reads one native-endian word out of an eight-byte chunk.
fn load_word(chunk: &[u8]) -> u64 {
    let mut word = [0u8; WORD_BYTES];
    word.copy_from_slice(chunk);
    u64::from_ne_bytes(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_tail_split() {
        let sig = Signature::new(&b"0123456789abcdefXYZ"[..], "split");
        assert_eq!(sig.len(), 19);
        assert_eq!(sig.prefix_words.len(), 2);
        assert_eq!(sig.tail(), b"XYZ");
    }

    #[test]
    fn test_matches_at_start() {
        let sig = Signature::new(&b"needle"[..], "n");
        assert!(sig.matches_at(b"needle in a haystack", 0));
    }

    #[test]
    fn test_matches_in_middle_and_at_end() {
        let sig = Signature::new(&b"needle"[..], "n");
        let data = b"hay needle hay needle";
        assert!(sig.matches_at(data, 4));
        // Last valid offset: data.len() - sig.len().
        assert!(sig.matches_at(data, data.len() - 6));
    }

    #[test]
    fn test_mismatch_in_word_prefix() {
        let sig = Signature::new(&b"0123456789abcdef"[..], "words");
        let mut data = sig.bytes().to_vec();
        data[3] = b'!';
        assert!(!sig.matches_at(&data, 0));
    }

    #[test]
    fn test_mismatch_in_tail() {
        let sig = Signature::new(&b"0123456789"[..], "tail");
        let mut data = sig.bytes().to_vec();
        data[9] = b'!';
        assert!(!sig.matches_at(&data, 0));
    }

    #[test]
    fn test_insufficient_remaining_bytes() {
        let sig = Signature::new(&b"abcd"[..], "a");
        assert!(!sig.matches_at(b"xabc", 1));
        assert!(!sig.matches_at(b"abcd", 1));
    }

    #[test]
    fn test_offset_past_end() {
        let sig = Signature::new(&b"a"[..], "a");
        assert!(!sig.matches_at(b"aaa", 3));
        assert!(!sig.matches_at(b"aaa", 100));
    }

    #[test]
    fn test_empty_signature_never_matches() {
        let sig = Signature::new(Vec::new(), "empty");
        assert!(sig.is_empty());
        assert!(!sig.matches_at(b"anything", 0));
        assert!(!sig.matches_at(b"", 0));
    }

    #[test]
    fn test_exact_word_multiple_has_empty_tail() {
        let sig = Signature::new(&b"8bytes!!"[..], "one-word");
        assert_eq!(sig.tail(), b"");
        assert!(sig.matches_at(b"..8bytes!!..", 2));
        assert!(!sig.matches_at(b"..8bytes!?..", 2));
    }

    #[test]
    fn test_shorter_than_word_compares_tail_only() {
        let sig = Signature::new(&b"abc"[..], "short");
        assert!(sig.prefix_words.is_empty());
        assert!(sig.matches_at(b"xxabcxx", 2));
        assert!(!sig.matches_at(b"xxabXxx", 2));
    }

    #[test]
    fn test_non_utf8_bytes_match() {
        let sig = Signature::new(vec![0xde, 0xad, 0xbe, 0xef, 0x00, 0xff], "blob");
        let mut data = vec![0u8; 32];
        data[13..19].copy_from_slice(sig.bytes());
        assert!(sig.matches_at(&data, 13));
        assert!(!sig.matches_at(&data, 12));
    }
}
