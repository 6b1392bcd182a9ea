//! Self-adjusting maintenance of the outgoing-edge trees.
//!
//! Rotations operate on edge ids in the shared arena; the root pointer
//! lives in the source object's record and is threaded through as
//! `&mut Option<EdgeId>`. Splaying the last-touched edge to the root keeps
//! repeated registrations against the same target cheap.

use crate::edge::{EdgeArena, EdgeId};

/// Rotate `node`'s right child above it.
fn rotate_left(arena: &mut EdgeArena, root: &mut Option<EdgeId>, node: EdgeId) {
    let Some(pivot) = arena[node].right else {
        return;
    };
    let carry = arena[pivot].left;
    arena[node].right = carry;
    if let Some(c) = carry {
        arena[c].parent = Some(node);
    }
    let up = arena[node].parent;
    arena[pivot].parent = up;
    match up {
        None => *root = Some(pivot),
        Some(p) if arena[p].left == Some(node) => arena[p].left = Some(pivot),
        Some(p) => arena[p].right = Some(pivot),
    }
    arena[pivot].left = Some(node);
    arena[node].parent = Some(pivot);
}

/// Rotate `node`'s left child above it.
fn rotate_right(arena: &mut EdgeArena, root: &mut Option<EdgeId>, node: EdgeId) {
    let Some(pivot) = arena[node].left else {
        return;
    };
    let carry = arena[pivot].right;
    arena[node].left = carry;
    if let Some(c) = carry {
        arena[c].parent = Some(node);
    }
    let up = arena[node].parent;
    arena[pivot].parent = up;
    match up {
        None => *root = Some(pivot),
        Some(p) if arena[p].left == Some(node) => arena[p].left = Some(pivot),
        Some(p) => arena[p].right = Some(pivot),
    }
    arena[pivot].right = Some(node);
    arena[node].parent = Some(pivot);
}

/// Move `node` to the root with zig, zig-zig and zig-zag steps.
pub(crate) fn splay(arena: &mut EdgeArena, root: &mut Option<EdgeId>, node: EdgeId) {
    while let Some(parent) = arena[node].parent {
        let node_is_left = arena[parent].left == Some(node);
        match arena[parent].parent {
            None => {
                if node_is_left {
                    rotate_right(arena, root, parent);
                } else {
                    rotate_left(arena, root, parent);
                }
            }
            Some(grand) => {
                let parent_is_left = arena[grand].left == Some(parent);
                match (node_is_left, parent_is_left) {
                    (true, true) => {
                        rotate_right(arena, root, grand);
                        rotate_right(arena, root, parent);
                    }
                    (false, false) => {
                        rotate_left(arena, root, grand);
                        rotate_left(arena, root, parent);
                    }
                    (true, false) => {
                        rotate_right(arena, root, parent);
                        rotate_left(arena, root, grand);
                    }
                    (false, true) => {
                        rotate_left(arena, root, parent);
                        rotate_right(arena, root, grand);
                    }
                }
            }
        }
    }
}
