// src/pipeline/order.rs

//! Reordering of replies to match the official API's child order.

use std::collections::HashMap;

use crate::models::{CommentNode, CommentParent};

/// Parent id to authoritative child id sequence.
pub type OrderMap = HashMap<u64, Vec<u64>>;

/// Stable reorder of `items` to follow `ids`.
///
/// Items listed in `ids` come first in that order; the rest follow in
/// their current relative order.
pub fn sort_to_match(items: &mut [CommentNode], ids: &[u64]) {
    let mut rank = HashMap::with_capacity(ids.len());
    for (index, id) in ids.iter().enumerate() {
        rank.entry(*id).or_insert(index);
    }
    items.sort_by_key(|item| rank.get(&item.id).copied().unwrap_or(usize::MAX));
}

/// Reorder every level of the tree below `node` using `order`.
///
/// Levels without an entry keep their order; their descendants are still visited.
pub fn merge_order<T: CommentParent>(mut node: T, order: &OrderMap) -> T {
    apply(&mut node, order);
    node
}

fn apply<T: CommentParent + ?Sized>(node: &mut T, order: &OrderMap) {
    if let Some(ids) = order.get(&node.id()) {
        sort_to_match(node.children_mut(), ids);
    }
    for child in node.children_mut().iter_mut() {
        apply(child, order);
    }
}
