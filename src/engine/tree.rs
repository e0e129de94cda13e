//! engine::tree
//!
//! Rooted forest view of the locks, for display.

use std::collections::HashSet;

use crate::core::graph::LockGraph;
use crate::core::repository::Repository;
use crate::core::types::Slug;

/// Label of the synthetic root node.
pub const TREE_ROOT_LABEL: &str = "tmod";

/// A labeled node with ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub label: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }
}

/// Build the tree: one child per root, each expanded through its lock
/// entry's dependencies.
///
/// A slug that reappears on its own path becomes a `(cycle)` leaf; a
/// dependency without a lock entry becomes a `(missing)` leaf.
pub fn build_tree(repo: &Repository) -> TreeNode {
    let graph = LockGraph::from_locks(repo.locks());
    let mut path = HashSet::new();

    TreeNode {
        label: TREE_ROOT_LABEL.to_string(),
        children: repo
            .manually_added()
            .iter()
            .map(|root| expand(&graph, root, &mut path))
            .collect(),
    }
}

fn expand(graph: &LockGraph, slug: &Slug, path: &mut HashSet<Slug>) -> TreeNode {
    if !graph.contains(slug) {
        return TreeNode::leaf(format!("{} (missing)", slug));
    }
    if !path.insert(slug.clone()) {
        return TreeNode::leaf(format!("{} (cycle)", slug));
    }

    let children = graph
        .dependencies_of(slug)
        .iter()
        .map(|dep| expand(graph, dep, path))
        .collect();

    path.remove(slug);
    TreeNode {
        label: slug.to_string(),
        children,
    }
}
