//! The chunking engine.

mod engine;

pub use engine::Parser;
