//! In-order traversal over the threaded structure.

use super::arena::NodeArena;
use super::constants::NULL_POINTER;
use super::node::{ElementId, NodeKind, NodePointer};

/// Which way the walk arrived at the current node: `Left` after descending
/// into a subtree, `Right` after returning along a thread pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Left,
    Right,
}

/// Collects the element numbers of every key reachable from `start`,
/// stopping when the walk reaches `end` (exclusive) or runs off a null
/// thread. Thread pointers on terminal nodes carry the walk back out of
/// exhausted subtrees, so no stack is needed; the direction flag tells
/// two-way nodes whether their subtree has already been visited.
pub(crate) fn collect_range(
    arena: &NodeArena,
    start: NodePointer,
    end: NodePointer,
) -> Vec<ElementId> {
    let mut results = Vec::new();
    let mut direction = Direction::Left;
    let mut current = start;

    while current != end && current != NULL_POINTER {
        let node = arena.node(current);
        match node.kind {
            NodeKind::IndexKey => {
                results.push(node.left);
                current = node.right;
                direction = Direction::Left;
            }
            NodeKind::IndexTerminal => {
                results.push(node.left);
                current = node.right;
                direction = Direction::Right;
            }
            NodeKind::DuplicateKey => {
                current = if direction == Direction::Left {
                    node.left
                } else {
                    node.right
                };
                direction = Direction::Left;
            }
            NodeKind::DuplicateTerminal => {
                // Direction stays unchanged: arriving on a thread means the
                // duplicates were already emitted, and the node's own thread
                // continues the outward walk.
                current = if direction == Direction::Left {
                    node.left
                } else {
                    node.right
                };
            }
            NodeKind::Decision => {
                current = if direction == Direction::Left {
                    node.left
                } else {
                    node.right
                };
                direction = Direction::Left;
            }
            NodeKind::Character => {
                current = node.right;
                direction = Direction::Left;
            }
        }
    }

    results
}
