//! Rolling checksum for boundary detection.
//!
//! This is the weak, O(1)-updatable checksum that decides where blob
//! boundaries fall. It belongs to the rsync/bup rollsum family: two running
//! sums over a fixed 128-byte window, offset by a small constant so runs of
//! zero bytes still move the sums.
//!
//! The checksum is only ever used to *place* boundaries. It never verifies
//! content; that is what the SHA-1 digests are for.

/// Number of trailing bytes the checksum is computed over.
pub(crate) const WINDOW_SIZE: usize = 128;

/// Added to every byte before summing, per the rsync rollsum.
const CHAR_OFFSET: u32 = 31;

/// An incrementally updatable checksum over the last [`WINDOW_SIZE`] bytes.
///
/// The window starts logically full of zeros, so `roll` always evicts one
/// byte and folds in one byte, independent of how many bytes have been seen
/// since the last [`reset`](RollingChecksum::reset).
///
/// A blob boundary fires when the masked bits of [`value`] are all set; the
/// parser resets the checksum at every boundary so decisions are memoryless
/// across blobs.
#[derive(Debug, Clone)]
pub(crate) struct RollingChecksum {
    window: [u8; WINDOW_SIZE],
    pos: usize,
    s1: u32,
    s2: u32,
}

impl RollingChecksum {
    /// Creates a checksum positioned at the start of a blob.
    pub(crate) fn new() -> Self {
        Self {
            window: [0u8; WINDOW_SIZE],
            pos: 0,
            // Sums over a window of zeros: each of the 128 slots contributes
            // CHAR_OFFSET to s1, and s2 is the sum of s1's prefix sums.
            s1: WINDOW_SIZE as u32 * CHAR_OFFSET,
            s2: (WINDOW_SIZE * (WINDOW_SIZE + 1) / 2) as u32 * CHAR_OFFSET,
        }
    }

    /// Advances the window by one byte: drops the oldest byte, folds in the
    /// new one. O(1) regardless of window content.
    pub(crate) fn roll(&mut self, byte: u8) {
        let old = self.window[self.pos] as u32 + CHAR_OFFSET;
        self.s1 = self
            .s1
            .wrapping_add(byte as u32 + CHAR_OFFSET)
            .wrapping_sub(old);
        self.s2 = self
            .s2
            .wrapping_add(self.s1)
            .wrapping_sub((WINDOW_SIZE as u32).wrapping_mul(old));
        self.window[self.pos] = byte;
        self.pos = (self.pos + 1) % WINDOW_SIZE;
    }

    /// Returns the current 32-bit checksum value.
    ///
    /// The two 16-bit sums are packed as `s1 << 16 | s2`, so the low bits
    /// tested by the boundary masks come from the position-weighted sum,
    /// which is the better-distributed of the two.
    pub(crate) fn value(&self) -> u32 {
        ((self.s1 & 0xffff) << 16) | (self.s2 & 0xffff)
    }

    /// Clears the window and sums back to their initial state.
    ///
    /// Called at every declared blob boundary so the next boundary decision
    /// does not depend on bytes of the previous blob.
    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }
}
