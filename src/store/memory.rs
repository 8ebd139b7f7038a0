//! In-memory storage backends.
//!
//! Reference implementations of [`BlobStore`] and [`HashStore`] backed by
//! `RwLock<HashMap>`. Useful for tests and for callers that want to chunk a
//! stream without persisting anything.

use std::collections::HashMap;
use std::sync::RwLock;

use bytes::Bytes;
use tracing::debug;

use crate::fanout::{ContentHash, Fanout};

use super::{BlobStore, HashStore, StoreError};

/// In-memory blob store backed by a `RwLock<HashMap>`.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<ContentHash, Bytes>>,
}

impl MemoryBlobStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of distinct blobs stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns true if no blobs are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if a blob with the given hash is present.
    pub fn contains(&self, hash: ContentHash) -> bool {
        self.blobs.read().expect("lock poisoned").contains_key(&hash)
    }
}

impl BlobStore for MemoryBlobStore {
    fn set_blob(&self, hash: ContentHash, content: Bytes) -> Result<(), StoreError> {
        debug!(%hash, size = content.len(), "storing blob in memory");
        self.blobs
            .write()
            .expect("lock poisoned")
            .insert(hash, content);
        Ok(())
    }

    fn get_blob(&self, hash: ContentHash) -> Result<Option<Bytes>, StoreError> {
        Ok(self.blobs.read().expect("lock poisoned").get(&hash).cloned())
    }
}

/// In-memory fanout store backed by `RwLock<HashMap>`s.
///
/// Chunk and file fanouts are kept in separate maps, mirroring the two
/// registration calls. The getters make reconstruction possible: walk the
/// file-fanout's children, then each chunk-fanout's children, then fetch
/// blobs.
#[derive(Debug, Default)]
pub struct MemoryHashStore {
    chunk_fanouts: RwLock<HashMap<ContentHash, Fanout>>,
    file_fanouts: RwLock<HashMap<ContentHash, Fanout>>,
}

impl MemoryHashStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the chunk-fanout registered under `hash`, if any.
    pub fn get_chunk_fanout(&self, hash: ContentHash) -> Option<Fanout> {
        self.chunk_fanouts
            .read()
            .expect("lock poisoned")
            .get(&hash)
            .cloned()
    }

    /// Returns the file-fanout registered under `hash`, if any.
    pub fn get_file_fanout(&self, hash: ContentHash) -> Option<Fanout> {
        self.file_fanouts
            .read()
            .expect("lock poisoned")
            .get(&hash)
            .cloned()
    }

    /// Returns the number of chunk-fanouts registered.
    pub fn chunk_fanout_count(&self) -> usize {
        self.chunk_fanouts.read().expect("lock poisoned").len()
    }

    /// Returns the number of file-fanouts registered.
    pub fn file_fanout_count(&self) -> usize {
        self.file_fanouts.read().expect("lock poisoned").len()
    }
}

impl HashStore for MemoryHashStore {
    fn set_chunk_fanout(
        &self,
        hash: ContentHash,
        children: &[ContentHash],
        length: u64,
    ) -> Result<(), StoreError> {
        debug!(%hash, blobs = children.len(), length, "registering chunk fanout");
        self.chunk_fanouts
            .write()
            .expect("lock poisoned")
            .insert(hash, Fanout::new(children.to_vec(), length));
        Ok(())
    }

    fn set_file_fanout(
        &self,
        hash: ContentHash,
        children: &[ContentHash],
        length: u64,
    ) -> Result<(), StoreError> {
        debug!(%hash, fanouts = children.len(), length, "registering file fanout");
        self.file_fanouts
            .write()
            .expect("lock poisoned")
            .insert(hash, Fanout::new(children.to_vec(), length));
        Ok(())
    }
}
