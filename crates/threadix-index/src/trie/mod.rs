//! Threaded radix trie with a free-list node arena.
//!
//! The index stores keys character by character in fixed-size nodes held in
//! a dense arena. Six node kinds share one record layout; the meaning of the
//! two pointer fields depends on the kind:
//!
//! ```text
//! kind                left                     right
//! ------------------  -----------------------  --------------------------
//! Character           (null)                   next node along the key
//! IndexKey            element number           next node along the key
//! IndexTerminal       element number           thread: in-order successor
//! DuplicateKey        duplicates sub-branch    next node along the key
//! DuplicateTerminal   duplicates sub-branch    thread: in-order successor
//! Decision            keys with byte <= char   keys with byte > char
//! ```
//!
//! Terminal nodes have no right child; their `right` field doubles as a
//! thread pointer to the in-order successor, which is what lets scans walk
//! the whole structure iteratively without a stack or parent pointers.
//!
//! Keys that carry two or more element numbers are represented by the
//! `Duplicate*` kinds. Their `left` points at a nested sub-trie keyed by the
//! decimal string form of each element number; the sub-trie's terminal
//! threads point back at the owning duplicate node, closing the loop.

mod arena;
mod constants;
mod index;
mod key;
mod node;
mod stats;
mod traverse;

pub use constants::MAX_KEY_BYTES;
pub use index::RadixIndex;
pub use node::ElementId;
pub use stats::Statistic;
