//! Storage abstraction the chunking engine writes through.
//!
//! Two capabilities: [`BlobStore`] for raw chunk bytes and [`HashStore`]
//! for fanout nodes. Both are content-addressed, so every write is
//! idempotent — re-storing an existing key carries identical bytes by
//! construction. Concrete backends (in-memory, file-backed, remote) live
//! behind these traits; the engine never knows which it is writing to.

mod memory;
mod multi;

use bytes::Bytes;

use crate::fanout::ContentHash;

pub use memory::{MemoryBlobStore, MemoryHashStore};
pub use multi::MultipleBlobStore;

/// Errors from a storage backend.
///
/// Absence of a key is *not* an error — `get_blob` reports it as
/// `Ok(None)`. An `Err` means the store itself failed (connectivity, disk,
/// poisoned state) and aborts the parse that hit it; retry policy, if any,
/// belongs to the store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend is unreachable or otherwise unable to serve requests.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Content-addressed store for raw blob bytes.
///
/// Implementations must be `Send + Sync`; independent parses may write to
/// the same store concurrently.
pub trait BlobStore: Send + Sync {
    /// Stores blob content under its content-derived hash.
    ///
    /// Idempotent: re-setting an existing key is a no-op in effect.
    fn set_blob(&self, hash: ContentHash, content: Bytes) -> Result<(), StoreError>;

    /// Retrieves blob content by hash. `Ok(None)` means the blob is not
    /// present in this store, which is a normal outcome.
    fn get_blob(&self, hash: ContentHash) -> Result<Option<Bytes>, StoreError>;
}

/// Content-addressed store for fanout nodes.
///
/// Chunk-level and file-level registrations are logically distinct calls
/// even though the node shape is identical: backends often index or
/// replicate the two differently. Both are idempotent, append-only writes
/// keyed by content hash.
pub trait HashStore: Send + Sync {
    /// Registers a chunk-fanout: `children` are blob hashes in stream
    /// order, `length` the exact byte count they span.
    fn set_chunk_fanout(
        &self,
        hash: ContentHash,
        children: &[ContentHash],
        length: u64,
    ) -> Result<(), StoreError>;

    /// Registers a file-fanout: `children` are chunk-fanout hashes in
    /// stream order, `length` the total stream length. Exactly one per
    /// parsed stream; its hash is the stream's root.
    fn set_file_fanout(
        &self,
        hash: ContentHash,
        children: &[ContentHash],
        length: u64,
    ) -> Result<(), StoreError>;
}
