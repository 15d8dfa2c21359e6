//! Threaded radix index for Threadix.
//!
//! This crate provides:
//! - A mutex-serialized, in-memory radix index mapping short text keys to
//!   opaque element numbers, with duplicate keys supported
//! - Exact lookup, prefix search, and full in-order scans driven by thread
//!   pointers instead of recursion or parent links
//! - A free-list node arena that recycles deleted slots
//! - Structural statistics with a fixed-field JSON rendering

mod trie;

pub use trie::{ElementId, RadixIndex, Statistic, MAX_KEY_BYTES};
