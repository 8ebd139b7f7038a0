//! Tiered blob store composing a preferred and a fallback backend.

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use tracing::trace;

use crate::fanout::ContentHash;

use super::{BlobStore, StoreError};

/// A [`BlobStore`] that composes a preferred store (e.g. local) with a
/// fallback store (e.g. remote).
///
/// Writes go **only** to the preferred store. Reads try the preferred store
/// first and fall back on a miss; a fallback hit is **not** copied into the
/// preferred store. This is a read-through cache with no promotion — the
/// faster tier only fills through its own writes, and the per-tier hit
/// counters stay an honest record of where reads were actually served from.
///
/// Both-miss is a normal `Ok(None)`, never an error.
pub struct MultipleBlobStore<P, F> {
    preferred: P,
    fallback: F,
    preferred_hits: AtomicU64,
    fallback_hits: AtomicU64,
}

impl<P: BlobStore, F: BlobStore> MultipleBlobStore<P, F> {
    /// Creates a tiered store from a preferred and a fallback backend.
    pub fn new(preferred: P, fallback: F) -> Self {
        Self {
            preferred,
            fallback,
            preferred_hits: AtomicU64::new(0),
            fallback_hits: AtomicU64::new(0),
        }
    }

    /// Number of reads served by the preferred store.
    pub fn preferred_hits(&self) -> u64 {
        self.preferred_hits.load(Ordering::Relaxed)
    }

    /// Number of reads served by the fallback store.
    pub fn fallback_hits(&self) -> u64 {
        self.fallback_hits.load(Ordering::Relaxed)
    }

    /// Returns a reference to the preferred store.
    pub fn preferred(&self) -> &P {
        &self.preferred
    }

    /// Returns a reference to the fallback store.
    pub fn fallback(&self) -> &F {
        &self.fallback
    }
}

impl<P: BlobStore, F: BlobStore> BlobStore for MultipleBlobStore<P, F> {
    fn set_blob(&self, hash: ContentHash, content: Bytes) -> Result<(), StoreError> {
        self.preferred.set_blob(hash, content)
    }

    fn get_blob(&self, hash: ContentHash) -> Result<Option<Bytes>, StoreError> {
        if let Some(content) = self.preferred.get_blob(hash)? {
            self.preferred_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Some(content));
        }
        match self.fallback.get_blob(hash)? {
            Some(content) => {
                trace!(%hash, "blob served from fallback store");
                self.fallback_hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(content))
            }
            None => Ok(None),
        }
    }
}
