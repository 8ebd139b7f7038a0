//! Content hash type.

use std::fmt;

/// A fixed-size hash value naming a byte range by content.
///
/// This is a thin wrapper around a 20-byte array (SHA-1 digest). Its
/// canonical text form is the lowercase 40-character hex encoding, which is
/// what appears in serialized fanouts and store keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHash([u8; 20]);

impl ContentHash {
    /// The size of the hash in bytes.
    pub const SIZE: usize = 20;

    /// Creates a new content hash from a byte array.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates a content hash from a slice.
    ///
    /// Returns `None` if the slice is not exactly 20 bytes.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; 20] = slice.try_into().ok()?;
        Some(Self(bytes))
    }

    /// Returns the hash as a byte slice.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns the hash as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Creates a hash from a hex string.
    ///
    /// Returns `None` if the string is not valid hex or not exactly 40
    /// characters.
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        if hex_str.len() != 40 {
            return None;
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(hex_str, &mut bytes).ok()?;
        Some(Self(bytes))
    }
}

impl AsRef<[u8]> for ContentHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let bytes = [0u8; 20];
        let hash = ContentHash::new(bytes);
        assert_eq!(hash.as_bytes(), &bytes);
    }

    #[test]
    fn test_from_slice() {
        let bytes = vec![7u8; 20];
        let hash = ContentHash::from_slice(&bytes).unwrap();
        assert_eq!(hash.as_bytes().as_ref(), bytes.as_slice());

        // Wrong size
        assert!(ContentHash::from_slice(&[0u8; 19]).is_none());
        assert!(ContentHash::from_slice(&[0u8; 21]).is_none());
    }

    #[test]
    fn test_hex_round_trip() {
        let bytes: [u8; 20] = core::array::from_fn(|i| (i * 11) as u8);
        let hash = ContentHash::new(bytes);
        let hex = hash.to_hex();
        assert_eq!(hex.len(), 40);
        assert_eq!(ContentHash::from_hex(&hex), Some(hash));
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(ContentHash::from_hex("abc").is_none());
        assert!(ContentHash::from_hex(&"g".repeat(40)).is_none());
        assert!(ContentHash::from_hex(&"a".repeat(39)).is_none());
        assert!(ContentHash::from_hex(&"a".repeat(41)).is_none());
    }

    #[test]
    fn test_display() {
        let mut bytes = [0u8; 20];
        bytes[..8].copy_from_slice(&[0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF]);
        let hash = ContentHash::new(bytes);
        assert!(hash.to_string().starts_with("0123456789abcdef"));
        assert_eq!(hash.to_string().len(), 40);
    }
}
