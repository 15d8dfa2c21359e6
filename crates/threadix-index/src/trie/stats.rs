//! Structural statistics: per-kind node counts and a JSON rendering.

use serde::{Deserialize, Serialize};

use super::arena::NodeArena;
use super::constants::NULL_POINTER;
use super::node::{NodeKind, NodePointer};
use super::traverse::Direction;

/// Counts gathered by a full traversal of an index. The serialized field
/// names are part of the report format and must not change.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistic {
    /// Nodes reachable from the root.
    #[serde(rename = "Active")]
    pub active: usize,
    /// Slots currently on the free list.
    #[serde(rename = "Deleted")]
    pub deleted: usize,
    /// High-water mark of the traversal stack.
    #[serde(rename = "Depth")]
    pub depth: usize,
    #[serde(rename = "DecisionNodes")]
    pub decision_nodes: usize,
    #[serde(rename = "CharacterNodes")]
    pub character_nodes: usize,
    #[serde(rename = "IndexKeyNodes")]
    pub index_key_nodes: usize,
    #[serde(rename = "IndexTerminalNodes")]
    pub index_terminal_nodes: usize,
    #[serde(rename = "DuplicateKeyNodes")]
    pub duplicate_key_nodes: usize,
    #[serde(rename = "DuplicateTerminalNodes")]
    pub duplicate_terminal_nodes: usize,
}

impl Statistic {
    /// Renders the counts as a JSON object with the fixed field names.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Writes `pointer` at stack position `sp`, growing the stack only when the
/// slot does not exist yet. Entries above `sp` are stale but stay in place,
/// so the stack's final length records the deepest descent reached.
fn push_stack(stack: &mut Vec<NodePointer>, pointer: NodePointer, sp: &mut usize) {
    if stack.len() <= *sp {
        stack.push(pointer);
    } else {
        stack[*sp] = pointer;
    }
    *sp += 1;
}

/// Full direction-aware traversal counting every reachable node by kind.
/// Thread pointers jump back to an ancestor already on the stack; the stack
/// pointer is rewound to just past that ancestor so depth stays accurate.
pub(crate) fn scan_statistics(arena: &NodeArena, root: NodePointer) -> Statistic {
    let mut result = Statistic::default();
    let mut stack: Vec<NodePointer> = Vec::new();
    let mut sp = 0usize;
    let mut direction = Direction::Left;
    let mut current = root;

    while current != NULL_POINTER {
        let node = arena.node(current);
        match node.kind {
            NodeKind::Character => {
                result.character_nodes += 1;
                push_stack(&mut stack, current, &mut sp);
                current = node.right;
                direction = Direction::Left;
            }
            NodeKind::IndexKey => {
                result.index_key_nodes += 1;
                push_stack(&mut stack, current, &mut sp);
                current = node.right;
                direction = Direction::Left;
            }
            NodeKind::Decision => {
                if direction == Direction::Left {
                    result.decision_nodes += 1;
                    push_stack(&mut stack, current, &mut sp);
                    current = node.left;
                } else {
                    current = node.right;
                    direction = Direction::Left;
                }
            }
            NodeKind::DuplicateKey => {
                if direction == Direction::Left {
                    result.duplicate_key_nodes += 1;
                    push_stack(&mut stack, current, &mut sp);
                    current = node.left;
                } else {
                    current = node.right;
                    direction = Direction::Left;
                }
            }
            NodeKind::IndexTerminal => {
                result.index_terminal_nodes += 1;
                push_stack(&mut stack, current, &mut sp);
                current = node.right;
                if current != NULL_POINTER {
                    rewind_to(&stack, current, &mut sp);
                }
                direction = Direction::Right;
            }
            NodeKind::DuplicateTerminal => {
                if direction == Direction::Left {
                    result.duplicate_terminal_nodes += 1;
                    push_stack(&mut stack, current, &mut sp);
                    current = node.left;
                } else {
                    current = node.right;
                    if current != NULL_POINTER {
                        rewind_to(&stack, current, &mut sp);
                    }
                }
            }
        }
    }

    result.active = result.character_nodes
        + result.index_key_nodes
        + result.index_terminal_nodes
        + result.duplicate_key_nodes
        + result.duplicate_terminal_nodes
        + result.decision_nodes;
    result.depth = stack.len();
    result.deleted = arena.free_len();
    result
}

/// Rewinds the stack pointer to just past the thread target's slot. Every
/// thread leads to an ancestor of the terminal it leaves, so the target is
/// present on the stack below the current pointer.
fn rewind_to(stack: &[NodePointer], target: NodePointer, sp: &mut usize) {
    if let Some(position) = stack.iter().position(|&entry| entry == target) {
        *sp = position + 1;
    } else {
        debug_assert!(false, "thread target {target} not on traversal stack");
    }
}
