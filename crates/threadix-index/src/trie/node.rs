//! Node record and kind tag for the threaded radix trie.

use super::constants::NULL_POINTER;

/// Signed arena index; `NULL_POINTER` (-1) marks an absent link.
pub(crate) type NodePointer = i64;

/// Opaque element number associated with a key. The index never interprets
/// element numbers beyond rendering them as decimal strings inside
/// duplicates sub-branches.
pub type ElementId = i64;

/// The six node kinds. See the module docs for the per-kind meaning of the
/// `left` and `right` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    /// Non-terminal character along a key path.
    Character,
    /// Character ending one stored key, with continuations past it.
    IndexKey,
    /// Character ending one stored key, with no continuations.
    IndexTerminal,
    /// Character ending a key held by two or more elements, with
    /// continuations past it.
    DuplicateKey,
    /// Character ending a key held by two or more elements, with no
    /// continuations.
    DuplicateTerminal,
    /// Routing node comparing the current key byte against `character`
    /// without consuming it.
    Decision,
}

impl NodeKind {
    /// True for the two kinds whose `right` field is a thread pointer.
    #[inline]
    pub(crate) fn is_terminal(self) -> bool {
        matches!(self, NodeKind::IndexTerminal | NodeKind::DuplicateTerminal)
    }
}

/// Fixed node record. `left` and `right` hold arena indices, element
/// numbers, or the null sentinel depending on `kind`; callers must consult
/// the kind before interpreting either field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) character: u8,
    pub(crate) left: i64,
    pub(crate) right: i64,
}

impl Node {
    /// Non-terminal character node linking to the next node along the key.
    pub(crate) fn character(character: u8, next: NodePointer) -> Self {
        Self {
            kind: NodeKind::Character,
            character,
            left: NULL_POINTER,
            right: next,
        }
    }

    /// Terminal node holding an element number and a thread pointer.
    pub(crate) fn terminal(character: u8, element: ElementId, thread: NodePointer) -> Self {
        Self {
            kind: NodeKind::IndexTerminal,
            character,
            left: element,
            right: thread,
        }
    }

    /// Empty decision node; the caller fills in the routing fields once the
    /// divergent branches are built.
    pub(crate) fn decision() -> Self {
        Self {
            kind: NodeKind::Decision,
            character: 0,
            left: NULL_POINTER,
            right: NULL_POINTER,
        }
    }
}
