use crate::edge::EdgeId;

/// Per-object tracking state.
///
/// `outgoing` is the root of the splay tree of edges sourced at this
/// object, keyed by target id. `incoming` holds one doubly-linked list
/// head per [`DepKind`](crate::DepKind), so that invalidation can walk
/// exactly the dependents it concerns and unlink each in O(1).
#[derive(Debug)]
pub(crate) struct ObjectRecord {
    /// Cleared by invalidation, restored only by `reset`.
    pub valid: bool,
    pub outgoing: Option<EdgeId>,
    pub incoming: [Option<EdgeId>; 2],
}

impl Default for ObjectRecord {
    fn default() -> Self {
        ObjectRecord {
            valid: true,
            outgoing: None,
            incoming: [None, None],
        }
    }
}
