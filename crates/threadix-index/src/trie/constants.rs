//! Constants for the threaded radix trie.

use super::node::NodePointer;

/// Maximum key length in bytes after trimming; longer keys are truncated.
pub const MAX_KEY_BYTES: usize = 32;

/// Sentinel pointer indicating null/absent.
pub(crate) const NULL_POINTER: NodePointer = -1;

/// Deletion scans a duplicates sub-branch only until it has seen this many
/// element entries. Hitting the cap proves the branch keeps at least two
/// elements after removal and must not be collapsed, so the scan stays O(1)
/// on large branches.
pub(crate) const DUPLICATE_SCAN_CAP: usize = 3;
