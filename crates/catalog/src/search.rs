//! Recursive substring search across the whole category tree.
//!
//! Inclusion rules:
//! - a matching branch is kept together with its complete subtree;
//! - a non-matching branch is dropped and its matching descendants are
//!   promoted into the result;
//! - a matching leaf is kept and carries its fully qualified ancestor path,
//!   because it may be shown detached from its visual context.

use std::collections::HashSet;

use aisle_types::{CategoryId, CategoryNode, FULL_PATH_DELIMITER, normalize_term};

/// One entry of a filtered result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub node: CategoryNode,
    /// `"Electronics > Phones > Android"` for matching leaves, `None` for branches.
    pub full_path: Option<String>,
}

/// Filter `roots` by a case-insensitive substring match on `name`.
///
/// An empty term matches nothing here; callers treat an empty term as
/// "no filtering" before reaching this function.
pub fn filter(roots: &[CategoryNode], term: &str) -> Vec<SearchHit> {
    if term.is_empty() {
        return Vec::new();
    }
    let normalized = normalize_term(term);
    let mut hits = Vec::new();
    let mut ancestors: Vec<&str> = Vec::new();
    collect(roots, &normalized, &mut ancestors, &mut hits);
    hits
}

fn collect<'a>(nodes: &'a [CategoryNode], term: &str, ancestors: &mut Vec<&'a str>, hits: &mut Vec<SearchHit>) {
    for node in nodes {
        let is_match = node.matches(term);
        if node.is_branch() {
            if is_match {
                hits.push(SearchHit {
                    node: node.clone(),
                    full_path: None,
                });
            } else {
                ancestors.push(&node.name);
                collect(&node.children, term, ancestors, hits);
                ancestors.pop();
            }
        } else if is_match {
            let mut segments = ancestors.clone();
            segments.push(&node.name);
            hits.push(SearchHit {
                node: node.clone(),
                full_path: Some(segments.join(FULL_PATH_DELIMITER)),
            });
        }
    }
}

/// Branch ids to expand after a search so every hit is immediately visible.
///
/// Contains every branch of the result set (branch hits and all branches
/// inside their subtrees) plus every ancestor of every hit.
pub fn auto_expanded(roots: &[CategoryNode], hits: &[SearchHit]) -> HashSet<CategoryId> {
    let hit_ids: HashSet<CategoryId> = hits.iter().map(|hit| hit.node.id).collect();
    let mut expanded = HashSet::new();
    for hit in hits {
        mark_branches(&hit.node, &mut expanded);
    }
    let mut trail = Vec::new();
    mark_ancestors(roots, &hit_ids, &mut trail, &mut expanded);
    expanded
}

fn mark_branches(node: &CategoryNode, expanded: &mut HashSet<CategoryId>) {
    if node.is_branch() {
        expanded.insert(node.id);
        for child in &node.children {
            mark_branches(child, expanded);
        }
    }
}

fn mark_ancestors(
    nodes: &[CategoryNode],
    hit_ids: &HashSet<CategoryId>,
    trail: &mut Vec<CategoryId>,
    expanded: &mut HashSet<CategoryId>,
) {
    for node in nodes {
        if hit_ids.contains(&node.id) {
            expanded.extend(trail.iter().copied());
        }
        if node.is_branch() {
            trail.push(node.id);
            mark_ancestors(&node.children, hit_ids, trail, expanded);
            trail.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn electronics() -> Vec<CategoryNode> {
        vec![CategoryNode::branch(
            1,
            "Electronics",
            "electronics",
            vec![
                CategoryNode::branch(
                    2,
                    "Phones",
                    "electronics/phones",
                    vec![
                        CategoryNode::leaf(3, "Android", "electronics/phones/android"),
                        CategoryNode::leaf(4, "iOS", "electronics/phones/ios"),
                    ],
                ),
                CategoryNode::leaf(5, "Laptops", "electronics/laptops"),
            ],
        )]
    }

    #[test]
    fn leaf_hit_carries_full_path() {
        let roots = electronics();
        let hits = filter(&roots, "and");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node.name, "Android");
        assert_eq!(hits[0].full_path.as_deref(), Some("Electronics > Phones > Android"));
    }

    #[test]
    fn matching_branch_keeps_whole_subtree() {
        let roots = electronics();
        let hits = filter(&roots, "PHONE");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node.name, "Phones");
        assert_eq!(hits[0].node.children.len(), 2);
        assert!(hits[0].full_path.is_none());
    }

    #[test]
    fn non_matching_parents_are_dropped() {
        let roots = electronics();
        let hits = filter(&roots, "o");
        let names: Vec<_> = hits.iter().map(|hit| hit.node.name.as_str()).collect();
        // "Electronics" matches on its own, so its subtree comes along unfiltered.
        assert_eq!(names, ["Electronics"]);

        let hits = filter(&roots, "s");
        let names: Vec<_> = hits.iter().map(|hit| hit.node.name.as_str()).collect();
        assert_eq!(names, ["Electronics"]);

        let hits = filter(&roots, "top");
        let names: Vec<_> = hits.iter().map(|hit| hit.node.name.as_str()).collect();
        assert_eq!(names, ["Laptops"]);
    }

    #[test]
    fn empty_term_and_no_match_yield_nothing() {
        let roots = electronics();
        assert!(filter(&roots, "").is_empty());
        assert!(filter(&roots, "garden").is_empty());
    }

    #[test]
    fn auto_expands_branch_hits_and_ancestors() {
        let roots = electronics();
        let hits = filter(&roots, "and");
        let expanded = auto_expanded(&roots, &hits);
        assert_eq!(expanded, HashSet::from([CategoryId(1), CategoryId(2)]));

        let hits = filter(&roots, "phones");
        let expanded = auto_expanded(&roots, &hits);
        assert_eq!(expanded, HashSet::from([CategoryId(1), CategoryId(2)]));
    }

    #[test]
    fn auto_expands_branches_nested_under_a_branch_hit() {
        let roots = electronics();
        let hits = filter(&roots, "electronics");
        assert_eq!(hits.len(), 1);
        let expanded = auto_expanded(&roots, &hits);
        assert_eq!(expanded, HashSet::from([CategoryId(1), CategoryId(2)]));
    }
}
