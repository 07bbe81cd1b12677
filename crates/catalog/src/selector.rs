//! Hierarchical category selector state and its reducer.
//!
//! The selector owns only ephemeral UI state (search text, expanded set,
//! list visibility, the active selection path and the current listing).
//! Every user interaction is expressed as a [`SelectorAction`]; applying an
//! action returns the selection path to hand to the caller, if the action
//! emits one.
//!
//! ```text
//!  ROOT_BROWSE --search(x)--> SEARCHING --select(branch)--> NODE_SELECTED_BRANCH
//!       ^                                                        |
//!       |                                                  select(leaf)
//!     reset                                                      v
//!       +---------------------- back ------------------- LEAF_SELECTED
//! ```

use std::collections::HashSet;

use aisle_types::{CategoryId, CategoryNode, SelectionPath};
use tracing::{debug, warn};

use crate::rows::{TreeRow, flatten_hits, flatten_level};
use crate::search::{SearchHit, auto_expanded, filter};
use crate::tree::CategoryTree;

/// What the list panel currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// Unfiltered nodes of one navigation level (`None` = roots).
    Level { parent: Option<CategoryId> },
    /// Result set of the current search term.
    Search(Vec<SearchHit>),
}

/// Coarse interaction state of a selector instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectorPhase {
    /// No search, no selection.
    #[default]
    RootBrowse,
    /// A non-empty search term drives the list.
    Searching,
    /// A branch is active and the list is visible.
    NodeSelectedBranch,
    /// A leaf is chosen; only the breadcrumb is shown.
    LeafSelected,
}

/// User interactions understood by the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorAction {
    /// Replace the search text and recompute the visible nodes.
    Search(String),
    /// Activate a node: branches toggle open/closed, leaves finalize the choice.
    SelectNode(CategoryNode),
    /// Step one level up the selection path.
    NavigateBack,
    /// Jump to a node already present in the selection path.
    SelectBreadcrumb { node: CategoryNode, index: usize },
    /// Return to the initial mount state.
    Reset,
    /// Swap in a new tree snapshot.
    LoadTree(CategoryTree),
    /// Re-establish a previously persisted selection by id.
    Restore(CategoryId),
}

/// State of one mounted selector.
#[derive(Debug, Clone)]
pub struct SelectorState {
    tree: CategoryTree,
    search_text: String,
    /// Term behind the current `Listing::Search`; `search_text` is later
    /// overwritten by a chosen leaf's name.
    search_term: String,
    expanded: HashSet<CategoryId>,
    list_visible: bool,
    selection: SelectionPath,
    listing: Listing,
    phase: SelectorPhase,
}

impl Default for SelectorState {
    fn default() -> Self {
        Self::new(CategoryTree::default())
    }
}

impl SelectorState {
    /// Mount state: no search, nothing expanded, root level visible.
    pub fn new(tree: CategoryTree) -> Self {
        Self {
            tree,
            search_text: String::new(),
            search_term: String::new(),
            expanded: HashSet::new(),
            list_visible: true,
            selection: SelectionPath::empty(),
            listing: Listing::Level { parent: None },
            phase: SelectorPhase::RootBrowse,
        }
    }

    pub fn tree(&self) -> &CategoryTree {
        &self.tree
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn expanded(&self) -> &HashSet<CategoryId> {
        &self.expanded
    }

    pub fn is_expanded(&self, id: CategoryId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn list_visible(&self) -> bool {
        self.list_visible
    }

    pub fn selection(&self) -> &SelectionPath {
        &self.selection
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn phase(&self) -> SelectorPhase {
        self.phase
    }

    /// Rows of the list panel in render order.
    pub fn rows(&self) -> Vec<TreeRow<'_>> {
        match &self.listing {
            Listing::Level { parent } => flatten_level(self.tree.children_of(*parent), &self.expanded),
            Listing::Search(hits) => flatten_hits(hits, &self.expanded),
        }
    }

    /// Ids of the top-level entries of the current listing.
    pub fn listed_ids(&self) -> Vec<CategoryId> {
        match &self.listing {
            Listing::Level { parent } => self.tree.children_of(*parent).iter().map(|node| node.id).collect(),
            Listing::Search(hits) => hits.iter().map(|hit| hit.node.id).collect(),
        }
    }

    /// Apply `action`, returning the selection path to emit to the caller.
    ///
    /// `None` means the action does not emit (search edits, tree swaps and
    /// the breadcrumb no-op).
    pub fn apply(&mut self, action: SelectorAction) -> Option<SelectionPath> {
        let emitted = match action {
            SelectorAction::Search(term) => {
                self.search(term);
                None
            }
            SelectorAction::SelectNode(node) => Some(self.select_node(node)),
            SelectorAction::NavigateBack => Some(self.navigate_back()),
            SelectorAction::SelectBreadcrumb { node, index } => self.select_breadcrumb(&node, index),
            SelectorAction::Reset => Some(self.reset()),
            SelectorAction::LoadTree(tree) => {
                self.load_tree(tree);
                None
            }
            SelectorAction::Restore(id) => self.restore(id),
        };
        if let Some(path) = emitted.as_ref() {
            debug!(depth = path.len(), phase = ?self.phase, "selection changed");
        }
        emitted
    }

    /// Apply `action` and invoke `on_change` when it emits.
    pub fn dispatch(&mut self, action: SelectorAction, mut on_change: impl FnMut(&SelectionPath)) {
        if let Some(path) = self.apply(action) {
            on_change(&path);
        }
    }

    fn search(&mut self, term: String) {
        self.search_text = term;
        self.list_visible = true;
        if self.search_text.is_empty() {
            self.listing = Listing::Level {
                parent: self.current_level_parent(),
            };
            self.phase = if self.selection.last().is_some_and(CategoryNode::is_branch) {
                SelectorPhase::NodeSelectedBranch
            } else {
                SelectorPhase::RootBrowse
            };
            return;
        }

        self.search_term = self.search_text.clone();
        let hits = filter(self.tree.roots(), &self.search_term);
        self.expanded = auto_expanded(self.tree.roots(), &hits);
        debug!(term = %self.search_term, hits = hits.len(), "category search");
        self.listing = Listing::Search(hits);
        self.phase = SelectorPhase::Searching;
    }

    fn select_node(&mut self, node: CategoryNode) -> SelectionPath {
        self.selection = self.tree.resolve_path(&node);
        if node.is_branch() {
            if !self.expanded.remove(&node.id) {
                self.expanded.insert(node.id);
            }
            self.list_visible = true;
            self.phase = SelectorPhase::NodeSelectedBranch;
        } else {
            self.list_visible = false;
            self.search_text = node.name;
            self.phase = SelectorPhase::LeafSelected;
        }
        self.selection.clone()
    }

    fn navigate_back(&mut self) -> SelectionPath {
        if self.selection.len() <= 1 {
            return self.reset();
        }
        self.selection = self.selection.parent_path();
        let nodes = self.selection.nodes();
        let current = &nodes[nodes.len() - 1];
        let parent = nodes.len().checked_sub(2).map(|index| nodes[index].id);

        self.expanded.insert(current.id);
        self.search_text = current.name.clone();
        self.listing = Listing::Level { parent };
        self.list_visible = true;
        self.phase = SelectorPhase::NodeSelectedBranch;
        self.selection.clone()
    }

    fn select_breadcrumb(&mut self, node: &CategoryNode, index: usize) -> Option<SelectionPath> {
        let target = self.selection.get(index)?;
        if target.id != node.id {
            debug!(index, expected = %target.id, got = %node.id, "breadcrumb node does not match selection");
            return None;
        }
        if index == self.selection.len() - 1 && target.is_leaf() {
            return None;
        }
        let target_id = target.id;
        self.selection = self.selection.truncated(index);
        self.expanded.insert(target_id);
        self.listing = Listing::Level { parent: Some(target_id) };
        self.list_visible = true;
        self.phase = SelectorPhase::NodeSelectedBranch;
        Some(self.selection.clone())
    }

    fn reset(&mut self) -> SelectionPath {
        self.search_text.clear();
        self.search_term.clear();
        self.selection = SelectionPath::empty();
        self.listing = Listing::Level { parent: None };
        self.expanded.clear();
        self.list_visible = true;
        self.phase = SelectorPhase::RootBrowse;
        self.selection.clone()
    }

    fn load_tree(&mut self, tree: CategoryTree) {
        self.tree = tree;
        if let Some(last_id) = self.selection.last().map(|node| node.id) {
            self.selection = match self.tree.ancestor_path(last_id) {
                Some(nodes) => SelectionPath::new(nodes),
                None => {
                    warn!(id = %last_id, "selected category missing from new snapshot; clearing selection");
                    SelectionPath::empty()
                }
            };
        }
        let tree = &self.tree;
        self.expanded.retain(|id| tree.find(*id).is_some());

        let refreshed = match &self.listing {
            Listing::Search(_) => {
                let hits = filter(self.tree.roots(), &self.search_term);
                self.expanded = auto_expanded(self.tree.roots(), &hits);
                Some(Listing::Search(hits))
            }
            Listing::Level { parent: Some(parent) } if self.tree.find(*parent).is_none() => Some(Listing::Level {
                parent: self.current_level_parent(),
            }),
            Listing::Level { .. } => None,
        };
        if let Some(listing) = refreshed {
            self.listing = listing;
        }

        if self.selection.is_empty()
            && matches!(self.phase, SelectorPhase::NodeSelectedBranch | SelectorPhase::LeafSelected)
        {
            self.list_visible = true;
            self.phase = if matches!(self.listing, Listing::Search(_)) {
                SelectorPhase::Searching
            } else {
                SelectorPhase::RootBrowse
            };
        }
        debug!(nodes = self.tree.node_count(), "category tree loaded");
    }

    fn restore(&mut self, id: CategoryId) -> Option<SelectionPath> {
        let Some(nodes) = self.tree.ancestor_path(id) else {
            warn!(id = %id, "cannot restore selection; category not in snapshot");
            return None;
        };
        self.selection = SelectionPath::new(nodes);
        let nodes = self.selection.nodes();
        let current = &nodes[nodes.len() - 1];
        if current.is_leaf() {
            self.search_text = current.name.clone();
            self.listing = Listing::Level {
                parent: nodes.len().checked_sub(2).map(|index| nodes[index].id),
            };
            self.list_visible = false;
            self.phase = SelectorPhase::LeafSelected;
        } else {
            self.expanded.insert(current.id);
            self.listing = Listing::Level { parent: Some(current.id) };
            self.list_visible = true;
            self.phase = SelectorPhase::NodeSelectedBranch;
        }
        Some(self.selection.clone())
    }

    /// Parent id of the level to show when filtering is switched off.
    fn current_level_parent(&self) -> Option<CategoryId> {
        let nodes = self.selection.nodes();
        match nodes.last() {
            None => None,
            Some(last) if last.is_branch() => Some(last.id),
            Some(_) => nodes.len().checked_sub(2).map(|index| nodes[index].id),
        }
    }
}

/// Pure reducer form of [`SelectorState::apply`].
pub fn reduce(mut state: SelectorState, action: SelectorAction) -> (SelectorState, Option<SelectionPath>) {
    let emitted = state.apply(action);
    (state, emitted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn electronics_tree() -> CategoryTree {
        CategoryTree::new(vec![CategoryNode::branch(
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
        )])
    }

    fn node(state: &SelectorState, id: u64) -> CategoryNode {
        state.tree().find(CategoryId(id)).cloned().expect("node in fixture")
    }

    fn names(path: &SelectionPath) -> Vec<&str> {
        path.nodes().iter().map(|node| node.name.as_str()).collect()
    }

    #[test]
    fn search_then_select_then_back() {
        let mut state = SelectorState::new(electronics_tree());

        assert!(state.apply(SelectorAction::Search("and".into())).is_none());
        assert_eq!(state.phase(), SelectorPhase::Searching);
        let rows = state.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label(), "Electronics > Phones > Android");
        assert!(state.is_expanded(CategoryId(1)));
        assert!(state.is_expanded(CategoryId(2)));
        assert!(!state.listed_ids().contains(&CategoryId(5)));

        let phones = node(&state, 2);
        let emitted = state.apply(SelectorAction::SelectNode(phones)).unwrap();
        assert_eq!(names(&emitted), ["Electronics", "Phones"]);
        assert!(state.list_visible());
        assert_eq!(state.phase(), SelectorPhase::NodeSelectedBranch);

        let android = node(&state, 3);
        let emitted = state.apply(SelectorAction::SelectNode(android)).unwrap();
        assert_eq!(names(&emitted), ["Electronics", "Phones", "Android"]);
        assert!(!state.list_visible());
        assert_eq!(state.search_text(), "Android");
        assert_eq!(state.phase(), SelectorPhase::LeafSelected);

        let emitted = state.apply(SelectorAction::NavigateBack).unwrap();
        assert_eq!(names(&emitted), ["Electronics", "Phones"]);
        assert!(state.list_visible());
        assert_eq!(state.search_text(), "Phones");
        assert!(state.is_expanded(CategoryId(2)));
        assert_eq!(state.phase(), SelectorPhase::NodeSelectedBranch);
    }

    #[test]
    fn selecting_a_branch_toggles_expansion() {
        let mut state = SelectorState::new(electronics_tree());
        let phones = node(&state, 2);

        state.apply(SelectorAction::SelectNode(phones.clone()));
        assert!(state.is_expanded(CategoryId(2)));
        state.apply(SelectorAction::SelectNode(phones));
        assert!(!state.is_expanded(CategoryId(2)));
        assert_eq!(state.selection().len(), 2);
    }

    #[test]
    fn selecting_an_unknown_node_uses_single_node_path() {
        let mut state = SelectorState::new(electronics_tree());
        let stray = CategoryNode::leaf(77, "Garden", "garden");
        let emitted = state.apply(SelectorAction::SelectNode(stray.clone())).unwrap();
        assert_eq!(emitted.nodes(), &[stray]);
    }

    #[test]
    fn back_from_single_node_resets() {
        let mut state = SelectorState::new(electronics_tree());
        state.apply(SelectorAction::Search("elec".into()));
        let electronics = node(&state, 1);
        state.apply(SelectorAction::SelectNode(electronics));

        let emitted = state.apply(SelectorAction::NavigateBack).unwrap();
        assert!(emitted.is_empty());
        assert_eq!(state.search_text(), "");
        assert!(state.expanded().is_empty());
        assert_eq!(state.listing(), &Listing::Level { parent: None });
        assert_eq!(state.phase(), SelectorPhase::RootBrowse);
    }

    #[test]
    fn breadcrumb_on_selected_leaf_is_a_no_op() {
        let mut state = SelectorState::new(electronics_tree());
        let android = node(&state, 3);
        state.apply(SelectorAction::SelectNode(android.clone()));
        let before = state.selection().clone();

        assert!(
            state
                .apply(SelectorAction::SelectBreadcrumb { node: android, index: 2 })
                .is_none()
        );
        assert_eq!(state.selection(), &before);
        assert!(!state.list_visible());
    }

    #[test]
    fn breadcrumb_truncates_and_lists_children() {
        let mut state = SelectorState::new(electronics_tree());
        let android = node(&state, 3);
        state.apply(SelectorAction::SelectNode(android));

        let electronics = node(&state, 1);
        let emitted = state
            .apply(SelectorAction::SelectBreadcrumb {
                node: electronics,
                index: 0,
            })
            .unwrap();
        assert_eq!(names(&emitted), ["Electronics"]);
        assert!(state.list_visible());
        assert!(state.is_expanded(CategoryId(1)));
        assert_eq!(state.listed_ids(), vec![CategoryId(2), CategoryId(5)]);
    }

    #[test]
    fn clearing_search_shows_current_level() {
        let mut state = SelectorState::new(electronics_tree());
        let phones = node(&state, 2);
        state.apply(SelectorAction::SelectNode(phones));
        state.apply(SelectorAction::Search("lap".into()));
        assert_eq!(state.listed_ids(), vec![CategoryId(5)]);

        state.apply(SelectorAction::Search(String::new()));
        assert_eq!(state.listed_ids(), vec![CategoryId(3), CategoryId(4)]);
        assert_eq!(state.selection().len(), 2);
        assert_eq!(state.phase(), SelectorPhase::NodeSelectedBranch);
    }

    #[test]
    fn restore_rebuilds_leaf_selection() {
        let mut state = SelectorState::new(electronics_tree());
        let emitted = state.apply(SelectorAction::Restore(CategoryId(4))).unwrap();
        assert_eq!(names(&emitted), ["Electronics", "Phones", "iOS"]);
        assert_eq!(state.phase(), SelectorPhase::LeafSelected);
        assert_eq!(state.search_text(), "iOS");

        assert!(state.apply(SelectorAction::Restore(CategoryId(404))).is_none());
        assert_eq!(state.selection().len(), 3);
    }

    #[test]
    fn loading_a_new_snapshot_drops_vanished_selection() {
        let mut state = SelectorState::new(electronics_tree());
        let laptops = node(&state, 5);
        state.apply(SelectorAction::SelectNode(laptops));

        let replacement = CategoryTree::new(vec![CategoryNode::leaf(9, "Books", "books")]);
        assert!(state.apply(SelectorAction::LoadTree(replacement)).is_none());
        assert!(state.selection().is_empty());
        assert!(state.list_visible());
        assert_eq!(state.phase(), SelectorPhase::RootBrowse);
        assert_eq!(state.listed_ids(), vec![CategoryId(9)]);
    }

    #[test]
    fn breadcrumb_with_mismatched_node_is_ignored() {
        let mut state = SelectorState::new(electronics_tree());
        let android = node(&state, 3);
        state.apply(SelectorAction::SelectNode(android));
        let before = state.selection().clone();

        let laptops = node(&state, 5);
        assert!(
            state
                .apply(SelectorAction::SelectBreadcrumb { node: laptops, index: 0 })
                .is_none()
        );
        assert_eq!(state.selection(), &before);
        assert!(!state.list_visible());
        assert_eq!(state.phase(), SelectorPhase::LeafSelected);
    }

    #[test]
    fn reloading_during_search_reuses_the_search_term() {
        let mut state = SelectorState::new(electronics_tree());
        state.apply(SelectorAction::Search("phone".into()));
        let android = node(&state, 3);
        state.apply(SelectorAction::SelectNode(android));
        assert_eq!(state.search_text(), "Android");

        let refreshed = CategoryTree::new(vec![CategoryNode::branch(
            1,
            "Electronics",
            "electronics",
            vec![CategoryNode::branch(
                2,
                "Phones",
                "electronics/phones",
                vec![
                    CategoryNode::leaf(3, "Android", "electronics/phones/android"),
                    CategoryNode::branch(
                        6,
                        "Phone Cases",
                        "electronics/phones/cases",
                        vec![CategoryNode::leaf(7, "Rugged", "electronics/phones/cases/rugged")],
                    ),
                ],
            )],
        )]);
        assert!(state.apply(SelectorAction::LoadTree(refreshed)).is_none());

        assert_eq!(state.listed_ids(), vec![CategoryId(2)]);
        assert!(state.is_expanded(CategoryId(2)));
        assert!(state.is_expanded(CategoryId(6)));
        assert_eq!(state.selection().len(), 3);
        assert_eq!(state.search_text(), "Android");
    }

    #[test]
    fn dispatch_invokes_callback_only_on_emission() {
        let mut state = SelectorState::new(electronics_tree());
        let mut seen = Vec::new();
        state.dispatch(SelectorAction::Search("ios".into()), |path| seen.push(path.len()));
        state.dispatch(SelectorAction::Reset, |path| seen.push(path.len()));
        assert_eq!(seen, vec![0]);
    }
}
