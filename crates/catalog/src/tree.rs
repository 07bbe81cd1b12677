//! Immutable category tree snapshot and ancestor-path resolution.

use std::sync::Arc;

use aisle_types::{CategoryId, CategoryNode, SelectionPath};
use serde::Deserialize;

/// A complete, immutable snapshot of the category tree.
///
/// Cloning is cheap; the nodes are shared. The selector never mutates the
/// tree and only derives views over it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<CategoryNode>")]
pub struct CategoryTree {
    roots: Arc<[CategoryNode]>,
}

impl From<Vec<CategoryNode>> for CategoryTree {
    fn from(roots: Vec<CategoryNode>) -> Self {
        Self { roots: roots.into() }
    }
}

impl CategoryTree {
    pub fn new(roots: Vec<CategoryNode>) -> Self {
        Self::from(roots)
    }

    /// Root-level nodes in their original order.
    pub fn roots(&self) -> &[CategoryNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes across all levels.
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[CategoryNode]) -> usize {
            nodes.iter().map(|node| 1 + count(&node.children)).sum()
        }
        count(&self.roots)
    }

    /// First node with `id` in depth-first pre-order.
    pub fn find(&self, id: CategoryId) -> Option<&CategoryNode> {
        fn walk(nodes: &[CategoryNode], id: CategoryId) -> Option<&CategoryNode> {
            for node in nodes {
                if node.id == id {
                    return Some(node);
                }
                if let Some(found) = walk(&node.children, id) {
                    return Some(found);
                }
            }
            None
        }
        walk(&self.roots, id)
    }

    /// Chain of nodes from a root down to `id`, found by depth-first search.
    ///
    /// The first match wins if an id ever appears twice.
    pub fn ancestor_path(&self, id: CategoryId) -> Option<Vec<CategoryNode>> {
        let mut trail: Vec<&CategoryNode> = Vec::new();
        if find_trail(&self.roots, id, &mut trail) {
            Some(trail.into_iter().cloned().collect())
        } else {
            None
        }
    }

    /// Resolve the selection path for `node`.
    ///
    /// A node that is not part of this snapshot resolves to a one-element
    /// path containing only itself.
    pub fn resolve_path(&self, node: &CategoryNode) -> SelectionPath {
        match self.ancestor_path(node.id) {
            Some(nodes) => SelectionPath::new(nodes),
            None => {
                tracing::debug!(id = %node.id, "category not in snapshot; using single-node path");
                SelectionPath::new(vec![node.clone()])
            }
        }
    }

    /// Nodes shown at one navigation level: the roots for `None`, otherwise
    /// the children of `parent`. Unknown parents yield an empty level.
    pub fn children_of(&self, parent: Option<CategoryId>) -> &[CategoryNode] {
        match parent {
            None => &self.roots,
            Some(id) => self.find(id).map(|node| node.children.as_slice()).unwrap_or(&[]),
        }
    }

    /// Id of the direct parent of `id`, or `None` for roots and unknown ids.
    pub fn parent_of(&self, id: CategoryId) -> Option<CategoryId> {
        let trail = self.ancestor_path(id)?;
        let parent_index = trail.len().checked_sub(2)?;
        Some(trail[parent_index].id)
    }
}

fn find_trail<'a>(nodes: &'a [CategoryNode], id: CategoryId, trail: &mut Vec<&'a CategoryNode>) -> bool {
    for node in nodes {
        trail.push(node);
        if node.id == id || find_trail(&node.children, id, trail) {
            return true;
        }
        trail.pop();
    }
    false
}
