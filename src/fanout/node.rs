//! The Fanout type and its compact text serialization.

use tracing::warn;

use super::ContentHash;

/// Separator between fields in the serialized form.
const SEPARATOR: char = ',';

/// A fanout node: an ordered list of child hashes plus the exact number of
/// original bytes the node spans.
///
/// Child order is stream order and semantically significant — the spanned
/// bytes are the concatenation of the children's bytes in order. Two roles
/// share this shape: a *chunk-fanout* (children are blob hashes) and a
/// *file-fanout* (children are chunk-fanout hashes, one per parsed stream).
///
/// A fanout's own hash is **not** derived from its child hashes; it is a
/// digest over the raw bytes the node spans, so a byte-identical range
/// always gets the same hash no matter how its children were grouped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fanout {
    /// Child hashes in stream order.
    pub children: Vec<ContentHash>,

    /// Total number of original bytes spanned by the children.
    pub length: u64,
}

impl Fanout {
    /// Creates a fanout node.
    pub fn new(children: Vec<ContentHash>, length: u64) -> Self {
        Self { children, length }
    }

    /// Serializes this fanout to its canonical text form.
    pub fn format(&self) -> String {
        format_fanout(&self.children, self.length)
    }
}

/// Formats a fanout record: the child hashes joined by `,`, followed by the
/// decimal byte length. E.g. `h1,h2,h3,1048576`.
///
/// Hashes are fixed-length hex and can never contain the separator, so no
/// escaping is needed.
pub fn format_fanout(children: &[ContentHash], length: u64) -> String {
    let mut out = String::with_capacity(children.len() * (ContentHash::SIZE * 2 + 1) + 20);
    for hash in children {
        out.push_str(&hash.to_hex());
        out.push(SEPARATOR);
    }
    out.push_str(&length.to_string());
    out
}

/// Parses the text form produced by [`format_fanout`].
///
/// All fields but the last are child hashes; the last field must be a
/// non-empty decimal byte length. A malformed record is recoverable, not
/// fatal: a warning is logged and `None` returned.
pub fn parse_fanout(text: &str) -> Option<Fanout> {
    let mut children = Vec::new();
    let parts: Vec<&str> = text.split(SEPARATOR).collect();
    let (last, hashes) = parts.split_last()?;

    for part in hashes {
        match ContentHash::from_hex(part) {
            Some(hash) => children.push(hash),
            None => {
                warn!(fanout = text, field = *part, "bad hash in fanout text");
                return None;
            }
        }
    }

    if last.is_empty() {
        warn!(fanout = text, "couldn't parse fanout text; missing content length");
        return None;
    }
    let length = match last.parse::<u64>() {
        Ok(length) => length,
        Err(_) => {
            warn!(fanout = text, field = *last, "bad content length in fanout text");
            return None;
        }
    };

    Some(Fanout { children, length })
}
