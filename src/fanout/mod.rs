//! Fanout data model: content hashes, fanout nodes, and their text form.

mod hash;
mod node;

pub use hash::ContentHash;
pub use node::{format_fanout, parse_fanout, Fanout};
