//! Error types for hashsplit.

use crate::store::StoreError;

/// Errors that abort a chunking parse.
///
/// Any of these means no root hash was produced. Blobs and fanouts already
/// written to the stores are not rolled back; they are content-addressed, so
/// re-parsing the same stream later simply overwrites them with identical
/// data.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// An I/O error occurred while reading the source stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The parse was cancelled via [`Parser::cancel`](crate::Parser::cancel).
    #[error("operation cancelled")]
    Cancelled,

    /// A blob or hash store failed a write.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}
