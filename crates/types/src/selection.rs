use serde::{Deserialize, Serialize};

use crate::category::{CategoryId, CategoryNode, category_url};

/// Ancestor-first chain from a root-level node down to the active node.
///
/// A path is replaced wholesale on every selection change; the helpers here
/// always return new values instead of mutating in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionPath(Vec<CategoryNode>);

impl SelectionPath {
    pub fn new(nodes: Vec<CategoryNode>) -> Self {
        Self(nodes)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn nodes(&self) -> &[CategoryNode] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The currently active node, if any.
    pub fn last(&self) -> Option<&CategoryNode> {
        self.0.last()
    }

    pub fn get(&self, index: usize) -> Option<&CategoryNode> {
        self.0.get(index)
    }

    pub fn ids(&self) -> Vec<CategoryId> {
        self.0.iter().map(|node| node.id).collect()
    }

    /// Copy of this path keeping nodes `0..=index`.
    pub fn truncated(&self, index: usize) -> Self {
        let end = index.saturating_add(1).min(self.0.len());
        Self(self.0[..end].to_vec())
    }

    /// Copy of this path without its last node.
    pub fn parent_path(&self) -> Self {
        let end = self.0.len().saturating_sub(1);
        Self(self.0[..end].to_vec())
    }

    /// Names joined by `delimiter`, root first.
    pub fn breadcrumb(&self, delimiter: &str) -> String {
        self.0.iter().map(|node| node.name.as_str()).collect::<Vec<_>>().join(delimiter)
    }

    /// True when the last node is a leaf, i.e. the selection is final.
    pub fn ends_in_leaf(&self) -> bool {
        self.last().is_some_and(CategoryNode::is_leaf)
    }

    /// Every adjacent (parent, child) pair is linked by id.
    pub fn is_well_formed(&self) -> bool {
        self.0.windows(2).all(|pair| pair[0].has_child(pair[1].id))
    }

    /// Public browsing URL of the chosen leaf; `None` while the selection is not final.
    pub fn public_url(&self) -> Option<String> {
        self.last().filter(|node| node.is_leaf()).map(category_url)
    }

    pub fn into_nodes(self) -> Vec<CategoryNode> {
        self.0
    }
}
