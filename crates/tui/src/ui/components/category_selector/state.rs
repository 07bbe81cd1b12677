use aisle_catalog::{CategoryTree, SelectorAction, SelectorState, TreeRow};
use aisle_types::{CategoryId, CategoryNode, SelectionPath};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::{layout::Rect, widgets::ListState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorDirection {
    Up,
    Down,
}

/// Terminal-side state of the category selector.
///
/// Wraps the framework-agnostic [`SelectorState`] and adds what only the
/// terminal needs: focus flags, the list cursor and the ratatui list state.
#[derive(Debug, Clone)]
pub struct CategorySelectorState {
    container_focus: FocusFlag,
    pub f_search: FocusFlag,
    pub f_list: FocusFlag,

    selector: SelectorState,
    cursor: usize,
    pub list_state: ListState,
}

impl Default for CategorySelectorState {
    fn default() -> Self {
        Self {
            container_focus: FocusFlag::named("category_selector"),
            f_search: FocusFlag::named("category_selector.search"),
            f_list: FocusFlag::named("category_selector.list"),
            selector: SelectorState::default(),
            cursor: 0,
            list_state: ListState::default(),
        }
    }
}

impl CategorySelectorState {
    pub fn selector(&self) -> &SelectorState {
        &self.selector
    }

    pub fn search_text(&self) -> &str {
        self.selector.search_text()
    }

    pub fn selection(&self) -> &SelectionPath {
        self.selector.selection()
    }

    pub fn rows(&self) -> Vec<TreeRow<'_>> {
        self.selector.rows()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Apply a selector action and re-anchor the cursor.
    ///
    /// Returns the path to report to the host when the action emits.
    pub fn apply(&mut self, action: SelectorAction) -> Option<SelectionPath> {
        let emitted = self.selector.apply(action);
        self.anchor_cursor();
        emitted
    }

    pub fn load_tree(&mut self, tree: CategoryTree) {
        self.apply(SelectorAction::LoadTree(tree));
    }

    pub fn restore(&mut self, id: CategoryId) -> Option<SelectionPath> {
        self.apply(SelectorAction::Restore(id))
    }

    pub fn append_search_character(&mut self, character: char) {
        let mut term = self.selector.search_text().to_string();
        term.push(character);
        self.apply(SelectorAction::Search(term));
    }

    pub fn remove_search_character(&mut self) {
        let mut term = self.selector.search_text().to_string();
        if term.pop().is_some() {
            self.apply(SelectorAction::Search(term));
        }
    }

    pub fn clear_search(&mut self) {
        self.apply(SelectorAction::Search(String::new()));
    }

    pub fn move_cursor(&mut self, direction: CursorDirection) {
        let row_count = self.selector.rows().len();
        if row_count == 0 {
            self.cursor = 0;
        } else {
            self.cursor = match direction {
                CursorDirection::Up => self.cursor.saturating_sub(1),
                CursorDirection::Down => (self.cursor + 1).min(row_count - 1),
            };
        }
        self.sync_list_state(row_count);
    }

    pub fn node_at(&self, index: usize) -> Option<CategoryNode> {
        self.selector.rows().get(index).map(|row| row.node.clone())
    }

    /// Select the node under the cursor.
    pub fn select_cursor(&mut self) -> Option<SelectionPath> {
        self.select_row(self.cursor)
    }

    pub fn select_row(&mut self, index: usize) -> Option<SelectionPath> {
        let node = self.node_at(index)?;
        self.cursor = index;
        self.apply(SelectorAction::SelectNode(node))
    }

    pub fn navigate_back(&mut self) -> Option<SelectionPath> {
        self.apply(SelectorAction::NavigateBack)
    }

    pub fn reset(&mut self) -> Option<SelectionPath> {
        self.apply(SelectorAction::Reset)
    }

    /// Jump to the breadcrumb segment at `index`; out-of-range indexes are ignored.
    pub fn select_breadcrumb(&mut self, index: usize) -> Option<SelectionPath> {
        let node = self.selector.selection().get(index)?.clone();
        self.apply(SelectorAction::SelectBreadcrumb { node, index })
    }

    /// Put the cursor on the active node when it is listed, otherwise clamp it.
    fn anchor_cursor(&mut self) {
        let rows = self.selector.rows();
        let active = self.selector.selection().last().map(|node| node.id);
        let row_count = rows.len();
        if let Some(position) = active.and_then(|id| rows.iter().position(|row| row.node.id == id)) {
            self.cursor = position;
        } else if row_count == 0 {
            self.cursor = 0;
        } else {
            self.cursor = self.cursor.min(row_count - 1);
        }
        self.sync_list_state(row_count);
    }

    fn sync_list_state(&mut self, row_count: usize) {
        if row_count == 0 {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(self.cursor));
        }
    }
}

impl HasFocus for CategorySelectorState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.f_search);
        if self.selector.list_visible() {
            builder.leaf_widget(&self.f_list);
        }
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aisle_catalog::SelectorPhase;

    fn tree() -> CategoryTree {
        CategoryTree::new(vec![
            CategoryNode::branch(
                1,
                "Electronics",
                "/electronics",
                vec![
                    CategoryNode::branch(
                        2,
                        "Phones",
                        "/electronics/phones",
                        vec![CategoryNode::leaf(3, "Android", "/electronics/phones/android")],
                    ),
                    CategoryNode::leaf(4, "Laptops", "/electronics/laptops"),
                ],
            ),
            CategoryNode::leaf(20, "Books", "/books"),
        ])
    }

    fn loaded() -> CategorySelectorState {
        let mut state = CategorySelectorState::default();
        state.load_tree(tree());
        state
    }

    #[test]
    fn cursor_is_clamped_to_rows() {
        let mut state = loaded();
        assert_eq!(state.list_state.selected(), Some(0));
        state.move_cursor(CursorDirection::Up);
        assert_eq!(state.cursor(), 0);
        state.move_cursor(CursorDirection::Down);
        state.move_cursor(CursorDirection::Down);
        assert_eq!(state.cursor(), 1);
        assert_eq!(state.list_state.selected(), Some(1));
    }

    #[test]
    fn selecting_branch_keeps_cursor_on_it() {
        let mut state = loaded();
        let emitted = state.select_cursor().unwrap();
        assert_eq!(emitted.ids(), vec![CategoryId(1)]);
        let labels: Vec<_> = state.rows().iter().map(|row| row.node.name.clone()).collect();
        assert_eq!(labels, vec!["Electronics", "Phones", "Laptops", "Books"]);
        assert_eq!(state.cursor(), 0);

        state.move_cursor(CursorDirection::Down);
        let emitted = state.select_cursor().unwrap();
        assert_eq!(emitted.ids(), vec![CategoryId(1), CategoryId(2)]);
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn typing_searches_and_backspace_restores_level() {
        let mut state = loaded();
        for character in "andr".chars() {
            state.append_search_character(character);
        }
        assert_eq!(state.selector().phase(), SelectorPhase::Searching);
        assert_eq!(state.rows()[0].label(), "Electronics > Phones > Android");

        state.clear_search();
        assert_eq!(state.selector().phase(), SelectorPhase::RootBrowse);
        let labels: Vec<_> = state.rows().iter().map(|row| row.label().to_string()).collect();
        assert_eq!(labels, vec!["Electronics", "Phones", "Android", "Laptops", "Books"]);
    }

    #[test]
    fn breadcrumb_out_of_range_is_ignored() {
        let mut state = loaded();
        assert!(state.select_breadcrumb(0).is_none());
        state.select_cursor();
        assert!(state.select_breadcrumb(3).is_none());
        assert_eq!(state.select_breadcrumb(0).unwrap().ids(), vec![CategoryId(1)]);
    }

    #[test]
    fn leaf_selection_drops_list_focus() {
        let mut state = loaded();
        state.move_cursor(CursorDirection::Down);
        let emitted = state.select_cursor().unwrap();
        assert!(emitted.ends_in_leaf());
        assert!(!state.selector().list_visible());

        let focus = FocusBuilder::build_for(&state);
        focus.first();
        assert!(state.f_search.get());
        focus.next();
        assert!(state.f_search.get());
    }
}
