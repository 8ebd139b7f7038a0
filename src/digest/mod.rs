//! Internal SHA-1 digest accumulator.

mod sha1;

pub(crate) use self::sha1::Sha1Digest;
