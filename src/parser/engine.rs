//! Core chunking engine - single-pass parse over a byte stream.
//!
//! [`Parser`] consumes a [`std::io::Read`] source once and drives everything
//! else: the rolling checksum that places boundaries, the three SHA-1
//! accumulators (blob, fanout, file), the blob store writes, and the two
//! levels of fanout registration. The return value is the file-fanout hash —
//! the single root that names the whole stream.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use hashsplit::{MemoryBlobStore, MemoryHashStore, ParseConfig, Parser};
//!
//! let parser = Parser::new(ParseConfig::default());
//! let blobs = MemoryBlobStore::new();
//! let fanouts = MemoryHashStore::new();
//!
//! let root = parser.parse(Cursor::new(&b"stream bytes"[..]), &blobs, &fanouts)?;
//! # Ok::<(), hashsplit::ParseError>(())
//! ```

use std::io::Read;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use bytes::Bytes;
use tracing::{debug, info, trace, warn};

use crate::config::ParseConfig;
use crate::digest::Sha1Digest;
use crate::error::ParseError;
use crate::fanout::ContentHash;
use crate::rolling::RollingChecksum;
use crate::store::{BlobStore, HashStore};

/// Bytes requested from the reader per `read()` call.
const READ_BUF_SIZE: usize = 8 * 1024;

/// A parser that splits a byte stream into content-addressed blobs and
/// builds the fanout tree over them in a single pass.
///
/// # Algorithm
///
/// Every byte rolls the checksum, feeds all three digest accumulators and
/// lands in the current blob buffer. When the masked checksum bits are all
/// set (or the blob size cap is hit) the blob is finished: its digest is
/// finalized, the bytes go to the [`BlobStore`] under that hash, and the
/// checksum resets. When the *same* checksum value also matches the wider
/// fanout mask, the current run of blob hashes is registered as a
/// chunk-fanout. At end of stream a final blob and chunk-fanout are always
/// flushed — even empty ones — and the file digest, which spans every byte
/// and was never reset, becomes the file-fanout's hash.
///
/// Because each level's hash is a digest of the raw bytes it spans (never of
/// child hashes), a byte-identical range reproduces the same hashes no
/// matter what surrounds it.
///
/// # Concurrency
///
/// The pass itself is strictly sequential, but `Parser` is `Send + Sync`:
/// [`bytes_read`](Parser::bytes_read) and [`cancel`](Parser::cancel) may be
/// called from another thread while a parse runs. Cancellation is
/// cooperative and checked once per read buffer; writes already issued to
/// the stores are not rolled back.
#[derive(Debug)]
pub struct Parser {
    config: ParseConfig,
    cancelled: AtomicBool,
    bytes_read: AtomicU64,
}

impl Parser {
    /// Creates a parser with the given configuration.
    pub fn new(config: ParseConfig) -> Self {
        Self {
            config,
            cancelled: AtomicBool::new(false),
            bytes_read: AtomicU64::new(0),
        }
    }

    /// Returns the configuration used by this parser.
    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Total bytes consumed from input streams so far.
    ///
    /// Accumulates across parses; readable mid-parse from another thread
    /// for progress reporting.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read.load(Ordering::Relaxed)
    }

    /// Requests cancellation of the running parse.
    ///
    /// The engine notices at the next buffer read and aborts with
    /// [`ParseError::Cancelled`] instead of returning a partial root hash.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns true if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Parses the stream, writing blobs to `blob_store` and fanouts to
    /// `hash_store` as they finish.
    ///
    /// Returns the hex SHA-1 root hash identifying the whole stream. Even
    /// an empty stream produces one (empty) blob, one chunk-fanout and one
    /// file-fanout.
    ///
    /// # Errors
    ///
    /// [`ParseError::Io`] if the reader fails, [`ParseError::Cancelled`] if
    /// [`cancel`](Parser::cancel) was called, [`ParseError::Store`] if a
    /// store write fails. All three abort with nothing rolled back.
    pub fn parse<R, B, H>(
        &self,
        mut reader: R,
        blob_store: &B,
        hash_store: &H,
    ) -> Result<ContentHash, ParseError>
    where
        R: Read,
        B: BlobStore + ?Sized,
        H: HashStore + ?Sized,
    {
        let blob_mask = self.config.blob_mask();
        let fanout_mask = self.config.fanout_mask();
        let max_blob_size = self.config.max_blob_size();

        let mut rolling = RollingChecksum::new();
        let mut blob_digest = Sha1Digest::new();
        let mut fanout_digest = Sha1Digest::new();
        let mut file_digest = Sha1Digest::new();

        let mut blob_buffer: Vec<u8> =
            Vec::with_capacity(max_blob_size.unwrap_or(READ_BUF_SIZE));
        let mut blob_hashes: Vec<ContentHash> = Vec::new();
        let mut fanout_hashes: Vec<ContentHash> = Vec::new();

        let mut fanout_length: u64 = 0;
        let mut file_length: u64 = 0;
        let mut num_blobs: u64 = 0;

        let mut buf = [0u8; READ_BUF_SIZE];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            if self.is_cancelled() {
                return Err(ParseError::Cancelled);
            }
            self.bytes_read.fetch_add(n as u64, Ordering::Relaxed);

            for &byte in &buf[..n] {
                rolling.roll(byte);
                blob_buffer.push(byte);
                fanout_length += 1;
                file_length += 1;

                let x = rolling.value();
                let limited = max_blob_size.is_some_and(|max| blob_buffer.len() >= max);
                if (x & blob_mask) != blob_mask && !limited {
                    continue;
                }
                if limited {
                    warn!(size = blob_buffer.len(), "blob size cap hit, forcing boundary");
                }

                // Blob boundary. The buffered bytes also advance the fanout
                // and file digests here; coverage is identical to per-byte
                // updates since both only finalize on blob boundaries.
                blob_digest.update(&blob_buffer);
                fanout_digest.update(&blob_buffer);
                file_digest.update(&blob_buffer);

                let blob_hash = blob_digest.finalize_reset();
                trace!(hash = %blob_hash, length = blob_buffer.len(), checksum = x, "store blob");
                blob_store.set_blob(blob_hash, Bytes::copy_from_slice(&blob_buffer))?;
                blob_buffer.clear();
                blob_hashes.push(blob_hash);
                num_blobs += 1;
                rolling.reset();

                // Fanout boundary: same checksum value, strictly wider
                // mask, so it can only fire on a blob boundary.
                if (x & fanout_mask) == fanout_mask {
                    let fanout_hash = fanout_digest.finalize_reset();
                    debug!(hash = %fanout_hash, length = fanout_length, "set chunk fanout");
                    hash_store.set_chunk_fanout(fanout_hash, &blob_hashes, fanout_length)?;
                    fanout_hashes.push(fanout_hash);
                    fanout_length = 0;
                    blob_hashes.clear();
                }
            }
        }

        // Terminal flush: whatever accumulated since the last boundary
        // becomes a final blob and chunk-fanout, possibly empty ones. This
        // guarantees at least one blob and one chunk-fanout per stream.
        blob_digest.update(&blob_buffer);
        fanout_digest.update(&blob_buffer);
        file_digest.update(&blob_buffer);

        let blob_hash = blob_digest.finalize_reset();
        trace!(hash = %blob_hash, length = blob_buffer.len(), "store terminal blob");
        blob_store.set_blob(blob_hash, Bytes::copy_from_slice(&blob_buffer))?;
        blob_hashes.push(blob_hash);
        num_blobs += 1;

        let fanout_hash = fanout_digest.finalize_reset();
        debug!(hash = %fanout_hash, length = fanout_length, "set terminal chunk fanout");
        hash_store.set_chunk_fanout(fanout_hash, &blob_hashes, fanout_length)?;
        fanout_hashes.push(fanout_hash);

        // The file digest was never reset, so it spans every byte of the
        // stream; its hash names the whole content.
        let file_hash = file_digest.finalize_reset();
        hash_store.set_file_fanout(file_hash, &fanout_hashes, file_length)?;
        info!(
            root = %file_hash,
            length = file_length,
            blobs = num_blobs,
            avg_blob_size = file_length / num_blobs,
            "set file fanout"
        );

        Ok(file_hash)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(ParseConfig::default())
    }
}
