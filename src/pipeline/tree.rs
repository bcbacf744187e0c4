// src/pipeline/tree.rs

//! Comment tree assembly from flat parent-pointer records.

use std::collections::{HashMap, HashSet};

use crate::error::AppError;
use crate::models::{CommentNode, RootPost, SearchComment};

/// Outcome of assembling a tree, with bookkeeping for what could not be placed.
#[derive(Debug, Default)]
pub struct TreeAssembly {
    /// Direct replies of the root, each recursively populated
    pub children: Vec<CommentNode>,
    /// Records that ended up in the tree
    pub placed: usize,
    /// Records with no ancestor chain to the root
    pub unreachable: usize,
    /// Records dropped because their id was already in the tree
    pub integrity_errors: Vec<AppError>,
}

/// Build the reply tree below `root_id`.
///
/// Siblings keep the relative order they have in `comments`.
pub fn build_tree(root_id: u64, comments: &[SearchComment]) -> Vec<CommentNode> {
    let assembly = assemble(root_id, comments);
    if assembly.unreachable > 0 {
        log::debug!(
            "{} of {} comments under {} have no path to the root",
            assembly.unreachable,
            comments.len(),
            root_id
        );
    }
    for error in &assembly.integrity_errors {
        log::warn!("{}", error);
    }
    assembly.children
}

/// Build the tree and report what was placed, skipped, and dropped.
pub fn assemble(root_id: u64, comments: &[SearchComment]) -> TreeAssembly {
    let mut by_parent: HashMap<u64, Vec<&SearchComment>> = HashMap::new();
    for comment in comments {
        if let Some(parent_id) = comment.parent_id {
            by_parent.entry(parent_id).or_default().push(comment);
        }
    }

    let mut visited = HashSet::from([root_id]);
    let mut integrity_errors = Vec::new();
    let children = children_of(root_id, &by_parent, &mut visited, &mut integrity_errors);

    let placed = visited.len() - 1;
    TreeAssembly {
        children,
        placed,
        unreachable: comments.len() - placed - integrity_errors.len(),
        integrity_errors,
    }
}

fn children_of(
    parent_id: u64,
    by_parent: &HashMap<u64, Vec<&SearchComment>>,
    visited: &mut HashSet<u64>,
    integrity_errors: &mut Vec<AppError>,
) -> Vec<CommentNode> {
    let Some(replies) = by_parent.get(&parent_id) else {
        return Vec::new();
    };

    let mut nodes = Vec::with_capacity(replies.len());
    for reply in replies {
        // A repeated id is either a duplicate record or a cycle back up the tree.
        if !visited.insert(reply.id) {
            integrity_errors.push(AppError::integrity(format!(
                "comment {} reached again under {}; subtree dropped",
                reply.id, parent_id
            )));
            continue;
        }
        let grandchildren = children_of(reply.id, by_parent, visited, integrity_errors);
        nodes.push(CommentNode::from_search(reply, grandchildren));
    }
    nodes
}

/// Turn the nested replies carried by a root item back into flat records.
///
/// Used when the search index has no comments for a thread the item
/// endpoint does have replies for (comment roots, indexing lag).
pub fn flatten_replies(root: &RootPost) -> Vec<SearchComment> {
    let story_id = match root {
        RootPost::Story(s) => Some(s.id),
        RootPost::Comment(c) => c.story_id,
    };

    let mut flat = Vec::new();
    let mut stack: Vec<(u64, &CommentNode)> = root
        .children()
        .iter()
        .rev()
        .map(|c| (root.id(), c))
        .collect();

    while let Some((parent_id, node)) = stack.pop() {
        flat.push(SearchComment {
            id: node.id,
            parent_id: Some(parent_id),
            story_id,
            author: (!node.is_deleted()).then(|| node.author.clone()),
            created_at: node.created_at,
            text: node.text.clone(),
            story_title: None,
            story_url: None,
        });
        stack.extend(node.children.iter().rev().map(|c| (node.id, c)));
    }
    flat
}
