//! Configuration for the chunking parse.
//!
//! [`ParseConfig`] carries the two boundary masks and the hard blob size
//! cap. The defaults reproduce the reference deployment: blobs averaging on
//! the order of a megabyte, fanout groups of roughly 128 blobs, and a hard
//! 500 kB cap that in practice bounds blob size well below the mask's
//! natural average.

use crate::error::ParseError;

/// Default blob boundary mask (20 low bits).
///
/// A boundary fires when all masked bits of the rolling checksum are set.
pub const DEFAULT_BLOB_MASK: u32 = 0xFFFFF;

/// Default fanout boundary mask (27 low bits, ~128 blobs per fanout).
pub const DEFAULT_FANOUT_MASK: u32 = 0x7FFFFFF;

/// Default hard cap on blob size in bytes.
pub const DEFAULT_MAX_BLOB_SIZE: usize = 500_000;

/// Configuration for content-defined chunking behavior.
///
/// Two masks at different probabilistic granularities drive the parse:
///
/// - `blob_mask` ends the current blob when the masked checksum bits are
///   all set
/// - `fanout_mask` additionally ends the current chunk-fanout; it must
///   contain every bit of `blob_mask` plus at least one more, so a fanout
///   boundary is always also a blob boundary but strictly rarer
///
/// `max_blob_size`, when set, forces a blob boundary once the buffered blob
/// grows past the cap, bounding worst-case blob size on streams where the
/// checksum never matches (e.g. long runs of one byte). Hitting the cap is
/// policy, not an error.
///
/// # Example
///
/// ```
/// use hashsplit::ParseConfig;
///
/// // Reference parameters
/// let config = ParseConfig::default();
///
/// // Small chunks for tests
/// let config = ParseConfig::new(0xFF, 0xFFF, Some(4096))?;
/// # Ok::<(), hashsplit::ParseError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    blob_mask: u32,
    fanout_mask: u32,
    max_blob_size: Option<usize>,
}

impl ParseConfig {
    /// Creates a configuration with the given masks and optional size cap.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidConfig`] if either mask is zero, if
    /// `fanout_mask` does not contain every bit of `blob_mask`, or if the
    /// masks are equal (every blob boundary would also be a fanout
    /// boundary), or if `max_blob_size` is `Some(0)`.
    pub fn new(
        blob_mask: u32,
        fanout_mask: u32,
        max_blob_size: Option<usize>,
    ) -> Result<Self, ParseError> {
        if blob_mask == 0 || fanout_mask == 0 {
            return Err(ParseError::InvalidConfig {
                message: "boundary masks must be non-zero",
            });
        }

        if fanout_mask & blob_mask != blob_mask {
            return Err(ParseError::InvalidConfig {
                message: "fanout_mask must contain every bit of blob_mask",
            });
        }

        if fanout_mask == blob_mask {
            return Err(ParseError::InvalidConfig {
                message: "fanout_mask must be strictly wider than blob_mask",
            });
        }

        if max_blob_size == Some(0) {
            return Err(ParseError::InvalidConfig {
                message: "max_blob_size cannot be zero",
            });
        }

        Ok(Self {
            blob_mask,
            fanout_mask,
            max_blob_size,
        })
    }

    /// Returns the blob boundary mask.
    pub fn blob_mask(&self) -> u32 {
        self.blob_mask
    }

    /// Returns the fanout boundary mask.
    pub fn fanout_mask(&self) -> u32 {
        self.fanout_mask
    }

    /// Returns the hard blob size cap, if any.
    pub fn max_blob_size(&self) -> Option<usize> {
        self.max_blob_size
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            blob_mask: DEFAULT_BLOB_MASK,
            fanout_mask: DEFAULT_FANOUT_MASK,
            max_blob_size: Some(DEFAULT_MAX_BLOB_SIZE),
        }
    }
}
