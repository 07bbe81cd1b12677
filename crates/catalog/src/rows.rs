//! Flattening of a (possibly filtered) tree into renderable rows.
//!
//! Rendering layers consume a flat list of `TreeRow`s instead of walking the
//! tree themselves, which keeps the walk framework-agnostic and testable.

use std::collections::HashSet;

use aisle_types::{CategoryId, CategoryNode};

use crate::search::SearchHit;

/// One visible line of the tree view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRow<'a> {
    pub node: &'a CategoryNode,
    pub depth: usize,
    /// Fully qualified ancestor path for leaves surfaced by search.
    pub full_path: Option<&'a str>,
    pub expanded: bool,
}

impl TreeRow<'_> {
    pub fn is_branch(&self) -> bool {
        self.node.is_branch()
    }

    /// Label to display: the full path for detached search hits, otherwise the name.
    pub fn label(&self) -> &str {
        self.full_path.unwrap_or(&self.node.name)
    }
}

/// Pre-order rows for a navigation level; children appear only under expanded branches.
pub fn flatten_level<'a>(nodes: &'a [CategoryNode], expanded: &HashSet<CategoryId>) -> Vec<TreeRow<'a>> {
    let mut rows = Vec::new();
    push_rows(nodes, 0, expanded, &mut rows);
    rows
}

/// Pre-order rows for a filtered result set, each hit starting at depth zero.
pub fn flatten_hits<'a>(hits: &'a [SearchHit], expanded: &HashSet<CategoryId>) -> Vec<TreeRow<'a>> {
    let mut rows = Vec::new();
    for hit in hits {
        let is_expanded = hit.node.is_branch() && expanded.contains(&hit.node.id);
        rows.push(TreeRow {
            node: &hit.node,
            depth: 0,
            full_path: hit.full_path.as_deref(),
            expanded: is_expanded,
        });
        if is_expanded {
            push_rows(&hit.node.children, 1, expanded, &mut rows);
        }
    }
    rows
}

fn push_rows<'a>(nodes: &'a [CategoryNode], depth: usize, expanded: &HashSet<CategoryId>, rows: &mut Vec<TreeRow<'a>>) {
    for node in nodes {
        let is_expanded = node.is_branch() && expanded.contains(&node.id);
        rows.push(TreeRow {
            node,
            depth,
            full_path: None,
            expanded: is_expanded,
        });
        if is_expanded {
            push_rows(&node.children, depth + 1, expanded, rows);
        }
    }
}

/// Rows for the whole tree with every branch open.
pub fn flatten_all(nodes: &[CategoryNode]) -> Vec<TreeRow<'_>> {
    fn walk<'a>(nodes: &'a [CategoryNode], depth: usize, rows: &mut Vec<TreeRow<'a>>) {
        for node in nodes {
            rows.push(TreeRow {
                node,
                depth,
                full_path: None,
                expanded: node.is_branch(),
            });
            walk(&node.children, depth + 1, rows);
        }
    }
    let mut rows = Vec::new();
    walk(nodes, 0, &mut rows);
    rows
}
