//! The threaded radix index: descent, insert, delete, and the public
//! mutex-serialized handle.

use std::borrow::Cow;

use parking_lot::Mutex;
use threadix_common::{IndexConfig, Result, ThreadixError};

use super::arena::NodeArena;
use super::constants::{DUPLICATE_SCAN_CAP, NULL_POINTER};
use super::key;
use super::node::{ElementId, Node, NodeKind, NodePointer};
use super::stats::{scan_statistics, Statistic};
use super::traverse::{collect_range, Direction};

/// Index state guarded by the handle's mutex: the node arena, the root
/// pointer, and the number of stored (key, element) pairs.
struct TrieCore {
    arena: NodeArena,
    root: NodePointer,
    key_count: usize,
}

impl TrieCore {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: NodeArena::with_capacity(capacity),
            root: NULL_POINTER,
            key_count: 0,
        }
    }

    // =========================================================================
    // Read Path
    // =========================================================================

    /// Every element number in the index, in ascending key order.
    fn scan(&self) -> Vec<ElementId> {
        collect_range(&self.arena, self.root, NULL_POINTER)
    }

    /// Exact-match lookup. Returns every element stored under `input`, or
    /// an empty vector when the key is absent.
    fn select(&self, input: &str) -> Vec<ElementId> {
        let key = key::normalize(input);
        if key.is_empty() {
            return Vec::new();
        }

        let mut current = self.root;
        let mut i = 0usize;
        loop {
            if current == NULL_POINTER {
                return Vec::new();
            }
            let node = *self.arena.node(current);
            match node.kind {
                NodeKind::IndexKey | NodeKind::IndexTerminal => {
                    if key[i] != node.character {
                        return Vec::new();
                    }
                    if i + 1 == key.len() {
                        return vec![node.left];
                    }
                    if node.kind == NodeKind::IndexTerminal {
                        // The stored key is a strict prefix of the probe.
                        return Vec::new();
                    }
                    current = node.right;
                    i += 1;
                }
                NodeKind::Decision => {
                    current = if key[i] <= node.character {
                        node.left
                    } else {
                        node.right
                    };
                }
                NodeKind::DuplicateKey | NodeKind::DuplicateTerminal => {
                    if key[i] != node.character {
                        return Vec::new();
                    }
                    if i + 1 == key.len() {
                        // Collect the duplicates sub-branch; its terminals
                        // thread back to the owning node, which bounds the walk.
                        return collect_range(&self.arena, node.left, current);
                    }
                    if node.kind == NodeKind::DuplicateTerminal {
                        return Vec::new();
                    }
                    current = node.right;
                    i += 1;
                }
                NodeKind::Character => {
                    if key[i] != node.character {
                        return Vec::new();
                    }
                    if i + 1 == key.len() {
                        // The probe ends mid-path; no key terminates here.
                        return Vec::new();
                    }
                    current = node.right;
                    i += 1;
                }
            }
        }
    }

    /// Prefix search. Returns the elements of every key starting with
    /// `input`, in ascending key order.
    fn search(&self, input: &str) -> Vec<ElementId> {
        let prefix = key::normalize(input);
        if prefix.is_empty() {
            return Vec::new();
        }

        // The boundary is the most recent decision node left behind by a
        // left turn: once the prefix subtree is exhausted, threads lead back
        // to it, and collection must stop there.
        let mut boundary = NULL_POINTER;
        let mut current = self.root;
        let mut i = 0usize;
        let start = loop {
            if current == NULL_POINTER {
                return Vec::new();
            }
            let node = *self.arena.node(current);
            match node.kind {
                NodeKind::IndexKey | NodeKind::IndexTerminal => {
                    if prefix[i] != node.character {
                        return Vec::new();
                    }
                    if i + 1 == prefix.len() {
                        break current;
                    }
                    if node.kind == NodeKind::IndexTerminal {
                        return Vec::new();
                    }
                    current = node.right;
                    i += 1;
                }
                NodeKind::Decision => {
                    if prefix[i] <= node.character {
                        boundary = current;
                        current = node.left;
                    } else {
                        current = node.right;
                    }
                }
                NodeKind::DuplicateKey | NodeKind::DuplicateTerminal => {
                    if prefix[i] != node.character {
                        return Vec::new();
                    }
                    if i + 1 == prefix.len() {
                        break node.left;
                    }
                    if node.kind == NodeKind::DuplicateTerminal {
                        return Vec::new();
                    }
                    current = node.right;
                    i += 1;
                }
                NodeKind::Character => {
                    if prefix[i] != node.character {
                        return Vec::new();
                    }
                    if i + 1 == prefix.len() {
                        break node.right;
                    }
                    current = node.right;
                    i += 1;
                }
            }
        };
        collect_range(&self.arena, start, boundary)
    }

    fn statistics(&self) -> Statistic {
        scan_statistics(&self.arena, self.root)
    }

    // =========================================================================
    // Insert
    // =========================================================================

    /// Builds a chain of nodes for `suffix` in reverse order, ending in a
    /// terminal that holds `element` and threads to `next_branch`. Returns
    /// the chain's first node.
    fn extend(&mut self, suffix: &[u8], element: ElementId, next_branch: NodePointer) -> NodePointer {
        let mut link = next_branch;
        for (i, &character) in suffix.iter().enumerate().rev() {
            let node = if i == suffix.len() - 1 {
                Node::terminal(character, element, link)
            } else {
                Node::character(character, link)
            };
            link = self.arena.allocate(node);
        }
        link
    }

    /// Stores (key, element). Fails without mutation when the pair is
    /// already present or the key normalizes to nothing.
    fn insert(&mut self, input: &str, element: ElementId) -> Result<()> {
        let normalized = key::normalize(input);
        if normalized.is_empty() {
            return Err(ThreadixError::EmptyKey);
        }

        if self.root == NULL_POINTER {
            self.root = self.extend(normalized, element, NULL_POINTER);
            self.key_count += 1;
            return Ok(());
        }

        // The active key switches to the element's decimal form when the
        // descent crosses into a duplicates sub-branch.
        let mut active_key: Cow<[u8]> = Cow::Borrowed(normalized);
        let mut previous = NULL_POINTER;
        let mut current = self.root;
        let mut in_duplicates = false;
        let mut i = 0usize;

        loop {
            let node = *self.arena.node(current);
            match node.kind {
                NodeKind::IndexKey | NodeKind::IndexTerminal => {
                    if active_key[i] != node.character {
                        break;
                    }
                    if i + 1 == active_key.len() {
                        if node.left == element {
                            return Err(ThreadixError::DuplicateEntry);
                        }
                        // Same key, new element: promote the node to a
                        // duplicate and seed the sub-branch with the element
                        // already stored here, threading back to this node.
                        let existing = node.left;
                        let sub_key = key::decimal_key(existing);
                        let link = self.extend(&sub_key, existing, current);
                        let promoted = self.arena.node_mut(current);
                        promoted.kind = if node.kind == NodeKind::IndexKey {
                            NodeKind::DuplicateKey
                        } else {
                            NodeKind::DuplicateTerminal
                        };
                        promoted.left = link;
                        in_duplicates = true;
                        i = 0;
                        active_key = Cow::Owned(key::decimal_key(element));
                        previous = current;
                        current = link;
                    } else if node.kind == NodeKind::IndexTerminal {
                        // The new key extends past a stored key: graft the
                        // remaining bytes onto the promoted node, handing the
                        // old thread to the new chain's terminal.
                        i += 1;
                        let link = self.extend(&active_key[i..], element, node.right);
                        let promoted = self.arena.node_mut(current);
                        promoted.kind = NodeKind::IndexKey;
                        promoted.right = link;
                        self.key_count += 1;
                        return Ok(());
                    } else {
                        previous = current;
                        current = node.right;
                        i += 1;
                    }
                }
                NodeKind::Decision => {
                    previous = current;
                    current = if active_key[i] <= node.character {
                        node.left
                    } else {
                        node.right
                    };
                }
                NodeKind::DuplicateKey | NodeKind::DuplicateTerminal => {
                    if active_key[i] != node.character {
                        break;
                    }
                    if i + 1 == active_key.len() {
                        // Continue the insertion inside the duplicates
                        // sub-branch under the element's decimal key.
                        in_duplicates = true;
                        active_key = Cow::Owned(key::decimal_key(element));
                        i = 0;
                        previous = current;
                        current = node.left;
                    } else if node.kind == NodeKind::DuplicateTerminal {
                        i += 1;
                        let link = self.extend(&active_key[i..], element, node.right);
                        let promoted = self.arena.node_mut(current);
                        promoted.kind = NodeKind::DuplicateKey;
                        promoted.right = link;
                        self.key_count += 1;
                        return Ok(());
                    } else {
                        previous = current;
                        current = node.right;
                        i += 1;
                    }
                }
                NodeKind::Character => {
                    if active_key[i] != node.character {
                        break;
                    }
                    if i + 1 == active_key.len() {
                        // The new key is a prefix of stored keys: this path
                        // node also terminates a key now.
                        let promoted = self.arena.node_mut(current);
                        promoted.kind = NodeKind::IndexKey;
                        promoted.left = element;
                        self.key_count += 1;
                        return Ok(());
                    }
                    previous = current;
                    current = node.right;
                    i += 1;
                }
            }
        }

        // The keys diverge at byte `i`: a decision node routes the two
        // branches by their current byte.
        let decision = self.arena.allocate(Node::decision());
        let existing_character = self.arena.node(current).character;
        let next_branch = if active_key[i] > existing_character {
            // New branch on the right. The existing branch keeps its place,
            // but its final terminal threaded past this point; re-point that
            // thread at the decision node and hand its old target to the new
            // branch's terminal.
            let mut thread_pointer = current;
            while !self.arena.node(thread_pointer).kind.is_terminal() {
                thread_pointer = self.arena.node(thread_pointer).right;
            }
            let old_thread = self.arena.node(thread_pointer).right;
            self.arena.node_mut(thread_pointer).right = decision;
            old_thread
        } else {
            // New branch on the left; its terminal threads to the decision
            // node, which routes onward to the existing branch.
            decision
        };

        let link = self.extend(&active_key[i..], element, next_branch);
        if active_key[i] < existing_character {
            let routing = self.arena.node_mut(decision);
            routing.left = link;
            routing.character = active_key[i];
            routing.right = current;
        } else {
            let routing = self.arena.node_mut(decision);
            routing.left = current;
            routing.character = existing_character;
            routing.right = link;
        }

        // Stitch the decision node under the node the descent came through.
        if previous == NULL_POINTER {
            self.root = decision;
        } else {
            let prev = *self.arena.node(previous);
            let attach_left = (prev.kind == NodeKind::Decision && active_key[i] <= prev.character)
                || prev.kind == NodeKind::DuplicateTerminal
                || (prev.kind == NodeKind::DuplicateKey && in_duplicates);
            if attach_left {
                self.arena.node_mut(previous).left = decision;
            } else {
                self.arena.node_mut(previous).right = decision;
            }
        }
        self.key_count += 1;
        Ok(())
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Removes (key, element). Fails without mutation when the key is
    /// absent, the element is not stored under it, or the key normalizes to
    /// nothing.
    fn delete(&mut self, input: &str, element: ElementId) -> Result<()> {
        let normalized = key::normalize(input);
        if normalized.is_empty() {
            return Err(ThreadixError::EmptyKey);
        }
        if self.root == NULL_POINTER {
            return Err(ThreadixError::KeyNotFound);
        }

        let mut active_key: Cow<[u8]> = Cow::Borrowed(normalized);
        let mut previous = NULL_POINTER;
        // Highest node whose branch may be removed, and the node above it.
        let mut delete_base = NULL_POINTER;
        let mut link_previous = NULL_POINTER;
        // The owning duplicate node once the descent enters a sub-branch.
        let mut duplicate_node = NULL_POINTER;
        // Side taken at the most recent decision node.
        let mut delete_branch: Option<Direction> = None;
        let mut current = self.root;
        let mut i = 0usize;

        loop {
            let node = *self.arena.node(current);
            if matches!(
                node.kind,
                NodeKind::Decision | NodeKind::DuplicateKey | NodeKind::IndexKey
            ) {
                delete_base = current;
                link_previous = previous;
            }
            match node.kind {
                NodeKind::IndexKey | NodeKind::IndexTerminal => {
                    if active_key[i] != node.character {
                        return Err(miss(duplicate_node, element));
                    }
                    if i + 1 == active_key.len() {
                        if node.left != element {
                            return Err(ThreadixError::ElementMismatch { element });
                        }
                        break;
                    }
                    if node.kind == NodeKind::IndexTerminal {
                        return Err(miss(duplicate_node, element));
                    }
                    previous = current;
                    current = node.right;
                    i += 1;
                }
                NodeKind::Decision => {
                    previous = current;
                    if active_key[i] <= node.character {
                        current = node.left;
                        delete_branch = Some(Direction::Left);
                    } else {
                        current = node.right;
                        delete_branch = Some(Direction::Right);
                    }
                }
                NodeKind::DuplicateKey | NodeKind::DuplicateTerminal => {
                    if active_key[i] != node.character {
                        return Err(miss(duplicate_node, element));
                    }
                    if i + 1 == active_key.len() {
                        duplicate_node = current;
                        i = 0;
                        active_key = Cow::Owned(key::decimal_key(element));
                        previous = current;
                        current = node.left;
                    } else {
                        if node.kind == NodeKind::DuplicateTerminal {
                            return Err(miss(duplicate_node, element));
                        }
                        previous = current;
                        current = node.right;
                        i += 1;
                    }
                }
                NodeKind::Character => {
                    if active_key[i] != node.character {
                        return Err(miss(duplicate_node, element));
                    }
                    if i + 1 == active_key.len() {
                        return Err(miss(duplicate_node, element));
                    }
                    previous = current;
                    current = node.right;
                    i += 1;
                }
            }
        }

        // `current` is the matched node. If it sits in a duplicates
        // sub-branch with only one sibling element, the whole sub-branch
        // collapses back into a plain key node.
        if duplicate_node != NULL_POINTER && self.collapse_duplicates(current, duplicate_node, delete_base, delete_branch) {
            self.key_count -= 1;
            return Ok(());
        }

        // A key node that longer keys pass through just stops terminating.
        if self.arena.node(current).kind == NodeKind::IndexKey {
            let demoted = self.arena.node_mut(current);
            demoted.kind = NodeKind::Character;
            demoted.left = NULL_POINTER;
            self.key_count -= 1;
            return Ok(());
        }

        // Last key in the index: release the entire root path.
        if delete_base == NULL_POINTER {
            let root = self.root;
            self.arena.release_chain(current, root);
            self.root = NULL_POINTER;
            self.key_count -= 1;
            return Ok(());
        }

        // A *Key node directly above the matched terminal, with no decision
        // in between, absorbs the terminal role and the terminal's thread.
        let base_kind = self.arena.node(delete_base).kind;
        if base_kind == NodeKind::IndexKey || base_kind == NodeKind::DuplicateKey {
            let released = self.arena.node(delete_base).right;
            let thread = self.arena.node(current).right;
            let base = self.arena.node_mut(delete_base);
            base.right = thread;
            base.kind = if base_kind == NodeKind::IndexKey {
                NodeKind::IndexTerminal
            } else {
                NodeKind::DuplicateTerminal
            };
            self.arena.release_chain(current, released);
            self.key_count -= 1;
            return Ok(());
        }

        // `delete_base` is a decision node: one side survives, the decision
        // and the matched side are released.
        if delete_branch == Some(Direction::Left) {
            let survivor = self.arena.node(delete_base).right;
            self.relink_parent(link_previous, delete_base, survivor, duplicate_node, false);
            self.arena.release_chain(current, delete_base);
            // Chain the decision into its own doomed left branch so the
            // whole path rides the free list in one splice.
            let base = self.arena.node_mut(delete_base);
            base.right = base.left;
        } else {
            // The surviving left branch's terminal threads to the decision
            // node; re-point it at the decision's in-order successor, which
            // the matched terminal's thread still records.
            let mut thread_pointer = self.arena.node(delete_base).left;
            while self.arena.node(thread_pointer).right != delete_base {
                thread_pointer = self.arena.node(thread_pointer).right;
            }
            let successor = self.arena.node(current).right;
            self.arena.node_mut(thread_pointer).right = successor;

            let survivor = self.arena.node(delete_base).left;
            self.relink_parent(link_previous, delete_base, survivor, duplicate_node, true);
            self.arena.release_chain(current, delete_base);
        }
        self.key_count -= 1;
        Ok(())
    }

    /// Counts the elements in the sub-branch under `duplicate_node` up to
    /// [`DUPLICATE_SCAN_CAP`]. With three or more the branch survives and
    /// the caller falls through to plain single-element deletion; with two,
    /// the branch is dissolved here: the duplicate node is demoted, the
    /// surviving element moves into it, every sub-branch slot is freed, and
    /// the threads around the removed nodes are rejoined. Returns whether
    /// the collapse was performed.
    fn collapse_duplicates(
        &mut self,
        current: NodePointer,
        duplicate_node: NodePointer,
        delete_base: NodePointer,
        delete_branch: Option<Direction>,
    ) -> bool {
        let sub_root = self.arena.node(duplicate_node).left;

        let mut element_count = 0usize;
        let mut direction = Direction::Left;
        let mut scan = sub_root;
        while scan != duplicate_node && scan != NULL_POINTER && element_count < DUPLICATE_SCAN_CAP {
            let node = *self.arena.node(scan);
            match node.kind {
                NodeKind::IndexKey => {
                    scan = node.right;
                    direction = Direction::Left;
                    element_count += 1;
                }
                NodeKind::IndexTerminal => {
                    scan = node.right;
                    direction = Direction::Right;
                    element_count += 1;
                }
                NodeKind::Decision => {
                    scan = if direction == Direction::Left {
                        node.left
                    } else {
                        node.right
                    };
                    direction = Direction::Left;
                }
                NodeKind::Character => {
                    scan = node.right;
                    direction = Direction::Left;
                }
                NodeKind::DuplicateKey | NodeKind::DuplicateTerminal => {
                    unreachable!("duplicate node nested inside a duplicates sub-branch")
                }
            }
        }
        if element_count >= DUPLICATE_SCAN_CAP {
            return false;
        }

        // Demote the owner; its `left` becomes the surviving element below.
        let owner_kind = self.arena.node(duplicate_node).kind;
        self.arena.node_mut(duplicate_node).kind = if owner_kind == NodeKind::DuplicateKey {
            NodeKind::IndexKey
        } else {
            NodeKind::IndexTerminal
        };

        let matched_kind = self.arena.node(current).kind;
        let base_kind = self.arena.node(delete_base).kind;

        // One decimal key is a prefix of the other, deleted entry on the
        // longer one: the key node above the matched terminal survives.
        if matched_kind == NodeKind::IndexTerminal && base_kind == NodeKind::IndexKey {
            let survivor_element = self.arena.node(delete_base).left;
            self.arena.release_chain(current, sub_root);
            self.arena.node_mut(duplicate_node).left = survivor_element;
            return true;
        }

        // Prefix entry deleted: the terminal further along the chain survives.
        if matched_kind == NodeKind::IndexKey {
            let mut scan = self.arena.node(current).right;
            while self.arena.node(scan).kind != NodeKind::IndexTerminal {
                scan = self.arena.node(scan).right;
            }
            self.arena.release_chain(scan, sub_root);
            let survivor_element = self.arena.node(scan).left;
            self.arena.node_mut(duplicate_node).left = survivor_element;
            return true;
        }

        // Two sibling entries under a decision node. Free both chains and
        // the decision in one splice: the walk below links the matched
        // terminal into the surviving side so the whole sub-branch rides the
        // free list, and the survivor's element is harvested last.
        let scan = if delete_branch == Some(Direction::Left) {
            let mut scan = self.arena.node(delete_base).right;
            while self.arena.node(scan).kind != NodeKind::IndexTerminal {
                scan = self.arena.node(scan).right;
            }
            self.arena.release_chain(scan, self.arena.node(delete_base).left);
            self.arena.node_mut(current).right = sub_root;
            scan
        } else {
            let mut scan = self.arena.node(delete_base).left;
            while self.arena.node(scan).kind != NodeKind::IndexTerminal {
                scan = self.arena.node(scan).right;
            }
            self.arena.release_chain(current, self.arena.node(delete_base).left);
            self.arena.node_mut(scan).right = sub_root;
            scan
        };
        let survivor_element = self.arena.node(scan).left;
        self.arena.node_mut(duplicate_node).left = survivor_element;
        true
    }

    /// Reattaches the surviving subtree of a removed decision node to the
    /// node above it. Which side of the parent to write depends on the
    /// parent's kind and how the descent entered it: a decision routes by
    /// character, a duplicate node's `left` is written only when the
    /// descent went through its sub-branch, and path nodes always link
    /// onward through `right`.
    fn relink_parent(
        &mut self,
        link_previous: NodePointer,
        delete_base: NodePointer,
        survivor: NodePointer,
        duplicate_node: NodePointer,
        copy_character: bool,
    ) {
        if link_previous == NULL_POINTER {
            self.root = survivor;
            return;
        }
        let previous = *self.arena.node(link_previous);
        match previous.kind {
            NodeKind::Decision => {
                if self.arena.node(delete_base).character <= previous.character {
                    if copy_character {
                        // The parent routed on the removed decision's
                        // boundary character; tighten it to the surviving
                        // branch's character unless that branch routes
                        // itself.
                        let survivor_node = *self.arena.node(survivor);
                        if survivor_node.kind != NodeKind::Decision {
                            self.arena.node_mut(link_previous).character = survivor_node.character;
                        }
                    }
                    self.arena.node_mut(link_previous).left = survivor;
                } else {
                    self.arena.node_mut(link_previous).right = survivor;
                }
            }
            NodeKind::DuplicateTerminal => {
                self.arena.node_mut(link_previous).left = survivor;
            }
            NodeKind::DuplicateKey => {
                if duplicate_node != NULL_POINTER {
                    self.arena.node_mut(link_previous).left = survivor;
                } else {
                    self.arena.node_mut(link_previous).right = survivor;
                }
            }
            NodeKind::Character | NodeKind::IndexKey => {
                self.arena.node_mut(link_previous).right = survivor;
            }
            // Terminals never sit above a decision node on a descent path.
            NodeKind::IndexTerminal => {}
        }
    }
}

/// Failure inside a duplicates sub-branch means the key exists but the
/// element is not stored under it; outside, the key itself is missing.
fn miss(duplicate_node: NodePointer, element: ElementId) -> ThreadixError {
    if duplicate_node != NULL_POINTER {
        ThreadixError::ElementMismatch { element }
    } else {
        ThreadixError::KeyNotFound
    }
}

// =============================================================================
// Public handle
// =============================================================================

/// Thread-safe threaded radix index mapping short text keys to element
/// numbers. Multiple elements may share one key. Every operation, readers
/// included, holds the index mutex for its full duration, so operations
/// are linearizable in lock-acquisition order.
///
/// Keys are trimmed of leading and trailing ASCII whitespace and truncated
/// to [`MAX_KEY_BYTES`](crate::MAX_KEY_BYTES) bytes; comparison is
/// byte-wise.
pub struct RadixIndex {
    core: Mutex<TrieCore>,
}

impl RadixIndex {
    /// Creates an empty index with the default configuration.
    pub fn new() -> Self {
        Self::with_config(IndexConfig::default())
    }

    /// Creates an empty index, pre-sizing the arena per `config`.
    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            core: Mutex::new(TrieCore::with_capacity(config.initial_capacity)),
        }
    }

    /// Stores (key, element). Fails when the pair is already present or the
    /// key is empty after normalization; the index is unchanged on failure.
    pub fn insert(&self, key: &str, element: ElementId) -> Result<()> {
        self.core.lock().insert(key, element)
    }

    /// Removes (key, element) and repairs the surrounding structure. Fails
    /// without mutation when the key is absent, the element is not stored
    /// under it, or the key is empty after normalization.
    pub fn delete(&self, key: &str, element: ElementId) -> Result<()> {
        self.core.lock().delete(key, element)
    }

    /// Returns every element stored under exactly `key`; empty when the key
    /// is absent. Duplicates are returned in the lexicographic order of
    /// their decimal forms.
    pub fn select(&self, key: &str) -> Vec<ElementId> {
        self.core.lock().select(key)
    }

    /// Returns the elements of every key beginning with `prefix`, in
    /// ascending key order; empty when no key matches.
    pub fn search(&self, prefix: &str) -> Vec<ElementId> {
        self.core.lock().search(prefix)
    }

    /// Returns every element in the index, in ascending key order.
    pub fn scan(&self) -> Vec<ElementId> {
        self.core.lock().scan()
    }

    /// Number of stored (key, element) pairs, duplicates included.
    pub fn count(&self) -> usize {
        self.core.lock().key_count
    }

    /// True when no pairs are stored.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Full traversal producing per-kind node counts, the free-list length,
    /// and the traversal depth high-water mark.
    pub fn statistics(&self) -> Statistic {
        self.core.lock().statistics()
    }
}

impl Default for RadixIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_into_empty_index() {
        let index = RadixIndex::new();
        assert!(index.is_empty());
        index.insert("CAT", 1).unwrap();
        assert_eq!(index.count(), 1);
        assert_eq!(index.select("CAT"), vec![1]);

        // A three-byte key is two character nodes and one terminal.
        let stats = index.statistics();
        assert_eq!(stats.character_nodes, 2);
        assert_eq!(stats.index_terminal_nodes, 1);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.deleted, 0);
    }

    #[test]
    fn test_superset_promotes_terminal() {
        let index = RadixIndex::new();
        index.insert("CAT", 1).unwrap();
        index.insert("CATTLE", 2).unwrap();

        let stats = index.statistics();
        assert_eq!(stats.index_key_nodes, 1);
        assert_eq!(stats.index_terminal_nodes, 1);
        assert_eq!(stats.character_nodes, 4);
        assert_eq!(index.select("CAT"), vec![1]);
        assert_eq!(index.select("CATTLE"), vec![2]);
    }

    #[test]
    fn test_subset_promotes_character() {
        let index = RadixIndex::new();
        index.insert("CATTLE", 2).unwrap();
        index.insert("CAT", 1).unwrap();

        let stats = index.statistics();
        assert_eq!(stats.index_key_nodes, 1);
        assert_eq!(stats.index_terminal_nodes, 1);
        assert_eq!(index.select("CAT"), vec![1]);
        assert_eq!(index.select("CATTLE"), vec![2]);
    }

    #[test]
    fn test_divergence_creates_decision_node() {
        let index = RadixIndex::new();
        index.insert("APPLE", 1).unwrap();
        index.insert("APRIL", 2).unwrap();

        let stats = index.statistics();
        assert_eq!(stats.decision_nodes, 1);
        assert_eq!(index.select("APPLE"), vec![1]);
        assert_eq!(index.select("APRIL"), vec![2]);
        // In-order collection crosses the divergence via the repaired thread.
        assert_eq!(index.search("AP"), vec![1, 2]);
        assert_eq!(index.scan(), vec![1, 2]);
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let index = RadixIndex::new();
        index.insert("DOG", 10).unwrap();
        assert_eq!(
            index.insert("DOG", 10),
            Err(ThreadixError::DuplicateEntry)
        );
        assert_eq!(index.count(), 1);
        assert_eq!(index.select("DOG"), vec![10]);
    }

    #[test]
    fn test_duplicate_elements_share_a_key() {
        let index = RadixIndex::new();
        index.insert("DOG", 10).unwrap();
        index.insert("DOG", 20).unwrap();
        index.insert("DOG", 30).unwrap();

        assert_eq!(index.count(), 3);
        assert_eq!(index.select("DOG"), vec![10, 20, 30]);
        let stats = index.statistics();
        assert_eq!(stats.duplicate_terminal_nodes, 1);
    }

    #[test]
    fn test_duplicate_order_follows_decimal_strings() {
        let index = RadixIndex::new();
        index.insert("K", 100).unwrap();
        index.insert("K", 20).unwrap();
        index.insert("K", 3).unwrap();

        // "100" < "20" < "3" byte-wise.
        assert_eq!(index.select("K"), vec![100, 20, 3]);
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let index = RadixIndex::new();
        assert_eq!(index.insert("   ", 1), Err(ThreadixError::EmptyKey));
        assert_eq!(index.insert("", 1), Err(ThreadixError::EmptyKey));
        assert_eq!(index.delete("  ", 1), Err(ThreadixError::EmptyKey));
        assert_eq!(index.select(""), Vec::<i64>::new());
        assert_eq!(index.search(" \t"), Vec::<i64>::new());
        assert_eq!(index.count(), 0);
    }

    #[test]
    fn test_select_misses() {
        let index = RadixIndex::new();
        index.insert("HOUND", 1).unwrap();
        assert_eq!(index.select("HOUNDS"), Vec::<i64>::new());
        assert_eq!(index.select("HOU"), Vec::<i64>::new());
        assert_eq!(index.select("HOUSE"), Vec::<i64>::new());
        assert_eq!(index.select("X"), Vec::<i64>::new());
    }

    #[test]
    fn test_delete_errors_leave_index_intact() {
        let index = RadixIndex::new();
        index.insert("BIRD", 5).unwrap();

        assert_eq!(index.delete("WORM", 5), Err(ThreadixError::KeyNotFound));
        assert_eq!(
            index.delete("BIRD", 6),
            Err(ThreadixError::ElementMismatch { element: 6 })
        );
        assert_eq!(index.count(), 1);
        assert_eq!(index.select("BIRD"), vec![5]);
    }

    #[test]
    fn test_delete_missing_duplicate_element() {
        let index = RadixIndex::new();
        index.insert("DOG", 10).unwrap();
        index.insert("DOG", 20).unwrap();

        assert_eq!(
            index.delete("DOG", 30),
            Err(ThreadixError::ElementMismatch { element: 30 })
        );
        assert_eq!(index.select("DOG"), vec![10, 20]);
    }

    #[test]
    fn test_last_key_teardown_reaches_empty() {
        let index = RadixIndex::new();
        index.insert("X", 1).unwrap();
        index.delete("X", 1).unwrap();

        assert_eq!(index.count(), 0);
        assert_eq!(index.scan(), Vec::<i64>::new());
        let stats = index.statistics();
        assert_eq!(stats.active, 0);
        assert_eq!(stats.deleted, 1);
    }

    #[test]
    fn test_deleted_slots_are_reused() {
        let index = RadixIndex::new();
        index.insert("ABC", 1).unwrap();
        index.delete("ABC", 1).unwrap();
        assert_eq!(index.statistics().deleted, 3);

        index.insert("XYZ", 2).unwrap();
        let stats = index.statistics();
        assert_eq!(stats.deleted, 0);
        assert_eq!(stats.active, 3);
        assert_eq!(index.select("XYZ"), vec![2]);
    }

    #[test]
    fn test_duplicate_collapse_restores_plain_terminal() {
        let index = RadixIndex::new();
        index.insert("A", 1).unwrap();
        index.insert("A", 2).unwrap();
        assert!(index.statistics().duplicate_terminal_nodes >= 1);

        index.delete("A", 1).unwrap();
        let stats = index.statistics();
        assert_eq!(stats.duplicate_terminal_nodes, 0);
        assert_eq!(index.select("A"), vec![2]);
        assert_eq!(index.count(), 1);
    }

    #[test]
    fn test_subset_deletion_demotes_key_node() {
        let index = RadixIndex::new();
        index.insert("CAT", 1).unwrap();
        index.insert("CATTLE", 2).unwrap();
        index.delete("CAT", 1).unwrap();

        assert_eq!(index.select("CAT"), Vec::<i64>::new());
        assert_eq!(index.select("CATTLE"), vec![2]);
        // Demotion keeps the node in place; nothing is freed.
        let stats = index.statistics();
        assert_eq!(stats.deleted, 0);
        assert_eq!(stats.index_key_nodes, 0);
    }

    #[test]
    fn test_superset_deletion_pulls_terminal_up() {
        let index = RadixIndex::new();
        index.insert("CAT", 1).unwrap();
        index.insert("CATTLE", 2).unwrap();
        index.delete("CATTLE", 2).unwrap();

        assert_eq!(index.select("CAT"), vec![1]);
        assert_eq!(index.select("CATTLE"), Vec::<i64>::new());
        let stats = index.statistics();
        assert_eq!(stats.index_terminal_nodes, 1);
        assert_eq!(stats.index_key_nodes, 0);
        assert_eq!(stats.deleted, 3);
    }

    #[test]
    fn test_decision_branch_deletion_left_and_right() {
        let index = RadixIndex::new();
        index.insert("APPLE", 1).unwrap();
        index.insert("APRIL", 2).unwrap();

        // Remove the left branch; the right one survives under the parent.
        index.delete("APPLE", 1).unwrap();
        assert_eq!(index.scan(), vec![2]);
        assert_eq!(index.select("APRIL"), vec![2]);

        index.insert("APPLE", 1).unwrap();
        // Remove the right branch; the left terminal's thread is repaired.
        index.delete("APRIL", 2).unwrap();
        assert_eq!(index.scan(), vec![1]);
        assert_eq!(index.select("APPLE"), vec![1]);
        assert_eq!(index.statistics().decision_nodes, 0);
    }

    #[test]
    fn test_trimmed_keys_collide_into_duplicates() {
        let index = RadixIndex::new();
        index.insert("  hello  ", 7).unwrap();
        index.insert("hello", 8).unwrap();

        assert_eq!(index.count(), 2);
        assert_eq!(index.select("hello"), vec![7, 8]);
        assert!(index.statistics().duplicate_terminal_nodes >= 1);
    }

    #[test]
    fn test_long_keys_truncate_to_the_same_slot() {
        let index = RadixIndex::new();
        let forty = "a".repeat(40);
        let thirty_two = "a".repeat(32);
        index.insert(&forty, 1).unwrap();

        assert_eq!(index.select(&thirty_two), vec![1]);
        assert_eq!(
            index.insert(&thirty_two, 1),
            Err(ThreadixError::DuplicateEntry)
        );
    }

    #[test]
    fn test_scan_is_key_ordered() {
        let index = RadixIndex::new();
        index.insert("banana", 2).unwrap();
        index.insert("apple", 1).unwrap();
        index.insert("cherry", 3).unwrap();
        index.insert("apricot", 4).unwrap();

        assert_eq!(index.scan(), vec![1, 4, 2, 3]);
    }

    #[test]
    fn test_search_scopes_to_prefix() {
        let index = RadixIndex::new();
        index.insert("car", 1).unwrap();
        index.insert("cart", 2).unwrap();
        index.insert("carbon", 3).unwrap();
        index.insert("dog", 4).unwrap();

        assert_eq!(index.search("car"), vec![1, 3, 2]);
        assert_eq!(index.search("carb"), vec![3]);
        assert_eq!(index.search("c"), vec![1, 3, 2]);
        assert_eq!(index.search("d"), vec![4]);
        assert_eq!(index.search("e"), Vec::<i64>::new());
    }

    #[test]
    fn test_statistics_depth_tracks_descent() {
        let index = RadixIndex::new();
        assert_eq!(index.statistics().depth, 0);

        index.insert("abcd", 1).unwrap();
        assert_eq!(index.statistics().depth, 4);
    }
}
