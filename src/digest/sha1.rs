//! SHA-1 based content hashing implementation.
//!
//! The parser keeps three of these alive at once (blob, fanout, file), each
//! covering its own sub-range of the stream, so the accumulator must support
//! incremental update and an in-place finalize-and-reset.

use sha1::{Digest, Sha1};

use crate::fanout::ContentHash;

/// An accumulator that computes SHA-1 content hashes incrementally.
#[derive(Debug, Clone, Default)]
pub(crate) struct Sha1Digest {
    state: Sha1,
}

impl Sha1Digest {
    /// Creates a new accumulator.
    pub(crate) fn new() -> Self {
        Self { state: Sha1::new() }
    }

    /// Feeds more bytes into the accumulator.
    pub(crate) fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    /// Returns the hash of everything fed so far and resets the accumulator
    /// to its initial state.
    pub(crate) fn finalize_reset(&mut self) -> ContentHash {
        ContentHash::new(self.state.finalize_reset().into())
    }

    /// Convenience method to hash data in one shot.
    pub(crate) fn hash(data: &[u8]) -> ContentHash {
        ContentHash::new(Sha1::digest(data).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash() {
        let hash = Sha1Digest::hash(b"hello world");
        assert_eq!(hash.as_bytes().len(), 20);

        // Hash should be deterministic
        let hash2 = Sha1Digest::hash(b"hello world");
        assert_eq!(hash, hash2);

        // Different data should give different hash
        let hash3 = Sha1Digest::hash(b"hello world!");
        assert_ne!(hash, hash3);
    }

    #[test]
    fn test_known_vector() {
        // SHA-1("abc"), the FIPS 180 test vector.
        let hash = Sha1Digest::hash(b"abc");
        assert_eq!(hash.to_hex(), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn test_incremental_hashing() {
        let mut digest = Sha1Digest::new();
        digest.update(b"hello ");
        digest.update(b"world");
        let hash = digest.finalize_reset();

        // Should match one-shot hashing
        let expected = Sha1Digest::hash(b"hello world");
        assert_eq!(hash, expected);
    }

    #[test]
    fn test_finalize_reset_starts_fresh() {
        let mut digest = Sha1Digest::new();
        digest.update(b"some data");
        let _ = digest.finalize_reset();

        digest.update(b"hello world");
        let hash = digest.finalize_reset();

        let expected = Sha1Digest::hash(b"hello world");
        assert_eq!(hash, expected);
    }

    #[test]
    fn test_empty_input() {
        let mut digest = Sha1Digest::new();
        let hash = digest.finalize_reset();
        assert_eq!(hash.to_hex(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }
}
