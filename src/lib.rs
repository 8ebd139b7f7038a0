//! hashsplit
//!
//! Content-defined chunking with a fanout hash tree.
//!
//! `hashsplit` splits a byte stream into variable-length blobs whose
//! boundaries are picked by a rolling checksum over the last 128 bytes, so
//! that a local edit to a file perturbs only nearby blobs and every other
//! blob hash survives unchanged. Blobs are content-addressed by SHA-1 and
//! grouped into a shallow, fixed-depth tree:
//!
//! - **blob** — raw chunk bytes, keyed by their own hash
//! - **chunk-fanout** — an ordered run of blob hashes plus the byte length
//!   they span
//! - **file-fanout** — the ordered chunk-fanout hashes for the whole
//!   stream; its hash is the root that names the content
//!
//! Every node's hash is a digest of the raw bytes it spans, never of child
//! hashes, so identical byte ranges anywhere in any file produce identical
//! node hashes. Cross-file chunk reuse falls out of that for free.
//!
//! The crate intentionally:
//! - does NOT talk to the network
//! - does NOT manage files or paths
//! - does NOT reconstruct files from fanouts
//!
//! It only does one thing: **Read bytes → content-addressed blobs + fanouts
//! → one root hash**
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use hashsplit::{MemoryBlobStore, MemoryHashStore, ParseConfig, Parser};
//!
//! fn main() -> Result<(), hashsplit::ParseError> {
//!     let blobs = MemoryBlobStore::new();
//!     let fanouts = MemoryHashStore::new();
//!     let parser = Parser::new(ParseConfig::default());
//!
//!     let root = parser.parse(Cursor::new(&b"some bytes"[..]), &blobs, &fanouts)?;
//!     println!("root hash: {root}");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod fanout;
mod parser;
mod store;

mod digest; // internal sha1 accumulator
mod rolling; // internal rolling checksum

//
// Public surface (intentionally tiny)
//

pub use config::{ParseConfig, DEFAULT_BLOB_MASK, DEFAULT_FANOUT_MASK, DEFAULT_MAX_BLOB_SIZE};
pub use error::ParseError;
pub use fanout::{format_fanout, parse_fanout, ContentHash, Fanout};
pub use parser::Parser;
pub use store::{
    BlobStore, HashStore, MemoryBlobStore, MemoryHashStore, MultipleBlobStore, StoreError,
};
