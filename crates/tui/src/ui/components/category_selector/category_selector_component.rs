//! Category selector component: search field, breadcrumb, tree list and the
//! public URL of a final selection.
//!
//! All selection semantics live in `aisle_catalog::SelectorState`; this
//! component translates keys and clicks into selector actions and reports
//! emitted paths as [`Effect::SelectionChanged`].

use aisle_catalog::{Listing, TreeRow};
use aisle_types::{FULL_PATH_DELIMITER, SelectionPath};
use aisle_util::{truncate_start_to_width, truncate_to_width};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use super::state::CursorDirection;
use crate::app::{App, Effect, LoadStatus};
use crate::ui::components::component::Component;
use crate::ui::theme::{Theme, theme_helpers as th};

const BREADCRUMB_LABEL: &str = "Path ";
const BREADCRUMB_SEPARATOR: &str = " › ";
const BREADCRUMB_ELLIPSIS: &str = "…";
const URL_LABEL: &str = "URL ";

/// One visible breadcrumb segment and where it was drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BreadcrumbSegment {
    /// Index of the node in the selection path.
    index: usize,
    text: String,
    /// Column offset from the start of the breadcrumb content.
    offset: u16,
}

#[derive(Debug, Default, Clone)]
struct SelectorLayout {
    search_area: Rect,
    breadcrumb_area: Rect,
    breadcrumb_segments: Vec<BreadcrumbSegment>,
    list_area: Rect,
}

#[derive(Debug, Default)]
pub struct CategorySelectorComponent {
    layout: SelectorLayout,
}

impl Component for CategorySelectorComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if let Some(effects) = self.handle_hot_keys(app, key) {
            return effects;
        }
        if app.selector.f_list.get() {
            self.handle_list_keys(app, key)
        } else {
            self.handle_search_keys(app, key)
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let pos = Position {
            x: mouse.column,
            y: mouse.row,
        };
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.layout.search_area.contains(pos) {
                    app.focus.focus(&app.selector.f_search);
                    return Vec::new();
                }
                if self.layout.breadcrumb_area.contains(pos) {
                    return match self.hit_test_breadcrumb(pos) {
                        Some(index) => emitted(app.selector.select_breadcrumb(index)),
                        None => Vec::new(),
                    };
                }
                if self.layout.list_area.contains(pos) {
                    app.focus.focus(&app.selector.f_list);
                    if let Some(index) = self.hit_test_list(app, pos) {
                        return emitted(app.selector.select_row(index));
                    }
                }
                Vec::new()
            }
            MouseEventKind::ScrollDown if self.layout.list_area.contains(pos) => {
                app.selector.move_cursor(CursorDirection::Down);
                Vec::new()
            }
            MouseEventKind::ScrollUp if self.layout.list_area.contains(pos) => {
                app.selector.move_cursor(CursorDirection::Up);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let chunks = Layout::vertical([
            Constraint::Length(3), // Search field
            Constraint::Length(1), // Breadcrumb
            Constraint::Min(3),    // Tree list or summary
            Constraint::Length(1), // Public URL
        ])
        .split(rect);

        self.render_search_panel(frame, app, chunks[0]);
        self.render_breadcrumb(frame, app, chunks[1]);
        if app.selector.selector().list_visible() {
            self.render_list_panel(frame, app, chunks[2]);
        } else {
            self.layout.list_area = Rect::default();
            self.render_summary(frame, app, chunks[2]);
        }
        self.render_url(frame, app, chunks[3]);
        self.layout.search_area = chunks[0];
        self.layout.breadcrumb_area = chunks[1];
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let theme = &*app.ctx.theme;
        if app.selector.f_list.get() {
            th::build_hint_spans(
                theme,
                &[
                    ("↑↓", " Move "),
                    ("Enter/→", " Select "),
                    ("←", " Back "),
                    ("1-9", " Breadcrumb "),
                    ("Ctrl+R", " Reset "),
                    ("Tab", " Search "),
                ],
            )
        } else {
            th::build_hint_spans(
                theme,
                &[
                    ("Type", " Filter "),
                    ("Enter", " Select "),
                    ("↓/Tab", " List "),
                    ("Alt+1-9", " Breadcrumb "),
                    ("Ctrl+R", " Reset "),
                    ("Esc", " Clear/Quit "),
                ],
            )
        }
    }
}

impl CategorySelectorComponent {
    /// Keys handled regardless of which panel has focus.
    fn handle_hot_keys(&self, app: &mut App, key: KeyEvent) -> Option<Vec<Effect>> {
        match key.code {
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(emitted(app.selector.reset())),
            KeyCode::Char(digit @ '1'..='9') if key.modifiers.contains(KeyModifiers::ALT) => {
                Some(emitted(app.selector.select_breadcrumb(breadcrumb_index(digit))))
            }
            KeyCode::F(5) => Some(vec![Effect::LoadCategories]),
            KeyCode::Esc => Some(self.handle_escape(app)),
            KeyCode::Tab => {
                app.focus.next();
                Some(Vec::new())
            }
            KeyCode::BackTab => {
                app.focus.prev();
                Some(Vec::new())
            }
            _ => None,
        }
    }

    fn handle_escape(&self, app: &mut App) -> Vec<Effect> {
        if app.selector.search_text().is_empty() {
            return vec![Effect::Quit];
        }
        app.selector.clear_search();
        app.focus.focus(&app.selector.f_search);
        Vec::new()
    }

    fn handle_search_keys(&self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Char(character)
                if (key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT) && !character.is_control() =>
            {
                app.selector.append_search_character(character);
                Vec::new()
            }
            KeyCode::Backspace if app.selector.search_text().is_empty() => navigate_back(app),
            KeyCode::Backspace => {
                app.selector.remove_search_character();
                Vec::new()
            }
            KeyCode::Down if app.selector.selector().list_visible() => {
                app.focus.focus(&app.selector.f_list);
                Vec::new()
            }
            KeyCode::Enter => emitted(app.selector.select_cursor()),
            _ => Vec::new(),
        }
    }

    fn handle_list_keys(&self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Up => {
                app.selector.move_cursor(CursorDirection::Up);
                Vec::new()
            }
            KeyCode::Down => {
                app.selector.move_cursor(CursorDirection::Down);
                Vec::new()
            }
            KeyCode::Enter | KeyCode::Right => emitted(app.selector.select_cursor()),
            KeyCode::Left | KeyCode::Backspace => navigate_back(app),
            KeyCode::Char(digit @ '1'..='9') => emitted(app.selector.select_breadcrumb(breadcrumb_index(digit))),
            KeyCode::Char(character)
                if (key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT) && !character.is_control() =>
            {
                app.focus.focus(&app.selector.f_search);
                app.selector.append_search_character(character);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn hit_test_list(&self, app: &App, pos: Position) -> Option<usize> {
        let offset = app.selector.list_state.offset();
        let index = pos.y.saturating_sub(self.layout.list_area.y) as usize + offset;
        (index < app.selector.rows().len()).then_some(index)
    }

    fn hit_test_breadcrumb(&self, pos: Position) -> Option<usize> {
        let column = pos.x.saturating_sub(self.layout.breadcrumb_area.x);
        self.layout
            .breadcrumb_segments
            .iter()
            .find(|segment| {
                let width = segment.text.width() as u16;
                column >= segment.offset && column < segment.offset + width
            })
            .map(|segment| segment.index)
    }

    fn render_search_panel(&self, frame: &mut Frame, app: &App, area: Rect) {
        let theme = &*app.ctx.theme;
        let is_focused = app.selector.f_search.get();
        let block = th::block(theme, Some("Search categories"), is_focused);
        let inner_area = block.inner(area);
        let query = app.selector.search_text();
        let content = if query.is_empty() && !is_focused {
            Line::from(Span::styled("Type to filter…", theme.text_muted_style()))
        } else {
            Line::from(Span::styled(query.to_string(), theme.text_primary_style()))
        };
        frame.render_widget(Paragraph::new(content).block(block), area);

        if is_focused {
            let columns = (query.width() as u16).min(inner_area.width.saturating_sub(1));
            frame.set_cursor_position((inner_area.x.saturating_add(columns), inner_area.y));
        }
    }

    fn render_breadcrumb(&mut self, frame: &mut Frame, app: &App, area: Rect) {
        let theme = &*app.ctx.theme;
        let selection = app.selector.selection();
        let label_width = BREADCRUMB_LABEL.width() as u16;
        let mut spans = vec![Span::styled(BREADCRUMB_LABEL, theme.text_muted_style())];

        if selection.is_empty() {
            spans.push(Span::styled("All categories", theme.text_secondary_style()));
            self.layout.breadcrumb_segments = Vec::new();
        } else {
            let available = area.width.saturating_sub(label_width) as usize;
            let (elided, mut segments) = layout_breadcrumb(selection, available);
            if elided {
                spans.push(Span::styled(
                    format!("{BREADCRUMB_ELLIPSIS}{BREADCRUMB_SEPARATOR}"),
                    theme.text_muted_style(),
                ));
            }
            let last_index = selection.len() - 1;
            for (position, segment) in segments.iter().enumerate() {
                if position > 0 {
                    spans.push(Span::styled(BREADCRUMB_SEPARATOR, theme.text_muted_style()));
                }
                let style = if segment.index == last_index {
                    theme.accent_emphasis_style()
                } else {
                    theme.text_secondary_style()
                };
                spans.push(Span::styled(segment.text.clone(), style));
            }
            for segment in &mut segments {
                segment.offset += label_width;
            }
            self.layout.breadcrumb_segments = segments;
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_list_panel(&mut self, frame: &mut Frame, app: &mut App, area: Rect) {
        let title = list_title(app);
        let is_focused = app.selector.f_list.get();
        let block = th::block(&*app.ctx.theme, Some(&title), is_focused);
        let inner_area = block.inner(area);
        self.layout.list_area = inner_area;

        let items: Vec<ListItem<'static>> = {
            let theme = &*app.ctx.theme;
            let selection = app.selector.selection();
            app.selector
                .rows()
                .iter()
                .map(|row| tree_row_item(theme, row, selection, inner_area.width as usize))
                .collect()
        };

        if items.is_empty() {
            let placeholder = empty_list_line(app);
            frame.render_widget(Paragraph::new(placeholder).block(block), area);
            return;
        }

        let theme = &*app.ctx.theme;
        let highlight = if is_focused {
            theme.selection_style().add_modifier(Modifier::BOLD)
        } else {
            theme.selection_style()
        };
        let list = List::new(items).block(block).highlight_style(highlight);
        frame.render_stateful_widget(list, area, &mut app.selector.list_state);
    }

    fn render_summary(&self, frame: &mut Frame, app: &App, area: Rect) {
        let theme = &*app.ctx.theme;
        let block = th::block(theme, Some("Selected"), false);
        let selection = app.selector.selection();
        let lines = vec![
            Line::from(Span::styled(
                selection.breadcrumb(FULL_PATH_DELIMITER),
                theme.accent_emphasis_style(),
            )),
            Line::from(Span::styled(
                "← back to the parent level · Ctrl+R start over",
                theme.text_muted_style(),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_url(&self, frame: &mut Frame, app: &App, area: Rect) {
        let Some(url) = app.selector.selection().public_url() else {
            return;
        };
        let theme = &*app.ctx.theme;
        let available = area.width.saturating_sub(URL_LABEL.width() as u16) as usize;
        let line = Line::from(vec![
            Span::styled(URL_LABEL, theme.text_muted_style()),
            Span::styled(truncate_to_width(&url, available), theme.accent_secondary_style()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn emitted(path: Option<SelectionPath>) -> Vec<Effect> {
    path.map(Effect::SelectionChanged).into_iter().collect()
}

fn navigate_back(app: &mut App) -> Vec<Effect> {
    if app.selector.selection().is_empty() {
        return Vec::new();
    }
    emitted(app.selector.navigate_back())
}

fn breadcrumb_index(digit: char) -> usize {
    digit.to_digit(10).map_or(0, |value| value as usize - 1)
}

fn list_title(app: &App) -> String {
    let selector = app.selector.selector();
    match selector.listing() {
        Listing::Search(hits) => format!("Results ({})", hits.len()),
        Listing::Level { parent: Some(parent) } => selector
            .tree()
            .find(*parent)
            .map_or_else(|| "Categories".to_string(), |node| node.name.clone()),
        Listing::Level { parent: None } => "Categories".to_string(),
    }
}

fn empty_list_line(app: &App) -> Line<'static> {
    let theme = &*app.ctx.theme;
    match &app.load_status {
        LoadStatus::Idle | LoadStatus::Loading => Line::from(Span::styled(
            format!("{} Loading categories from {}…", app.throbber(), app.ctx.source_label),
            theme.text_muted_style(),
        )),
        LoadStatus::Failed(error) => Line::from(Span::styled(
            format!("Could not load categories: {error} (F5 to retry)"),
            theme.status_error(),
        )),
        LoadStatus::Ready { .. } if !app.selector.search_text().is_empty() => Line::from(Span::styled(
            format!("No categories match \"{}\"", app.selector.search_text()),
            theme.status_warning(),
        )),
        LoadStatus::Ready { .. } => Line::from(Span::styled("No categories", theme.text_muted_style())),
    }
}

fn tree_row_item(theme: &dyn Theme, row: &TreeRow<'_>, selection: &SelectionPath, width: usize) -> ListItem<'static> {
    let indent = "  ".repeat(row.depth);
    let marker = match (row.is_branch(), row.expanded) {
        (true, true) => "▾ ",
        (true, false) => "▸ ",
        (false, _) => "  ",
    };
    let prefix = format!("{indent}{marker}");
    let available = width.saturating_sub(prefix.width());
    let label = match row.full_path {
        Some(full_path) => truncate_start_to_width(full_path, available),
        None => truncate_to_width(row.label(), available),
    };
    let in_selection = selection.nodes().iter().any(|node| node.id == row.node.id);
    let label_style = if in_selection {
        theme.accent_primary_style()
    } else if row.full_path.is_some() {
        theme.text_secondary_style()
    } else {
        theme.text_primary_style()
    };
    ListItem::new(Line::from(vec![
        Span::styled(prefix, theme.text_muted_style()),
        Span::styled(label, label_style),
    ]))
}

/// Fit the selection path into `max_width` columns.
///
/// Leading segments are dropped first (the caller renders an ellipsis when the
/// returned flag is set); the deepest segment is truncated only when it does
/// not fit on its own. Segments are labelled with their 1-based shortcut digit.
fn layout_breadcrumb(selection: &SelectionPath, max_width: usize) -> (bool, Vec<BreadcrumbSegment>) {
    let labels: Vec<String> = selection
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| {
            if index < 9 {
                format!("{} {}", index + 1, node.name)
            } else {
                node.name.clone()
            }
        })
        .collect();
    let separator_width = BREADCRUMB_SEPARATOR.width();
    let elision_width = BREADCRUMB_ELLIPSIS.width() + separator_width;
    let joined_width = |labels: &[String]| {
        labels.iter().map(|label| label.width()).sum::<usize>() + separator_width * labels.len().saturating_sub(1)
    };

    let mut first = 0;
    while first < labels.len() - 1 {
        let reserved = if first > 0 { elision_width } else { 0 };
        if joined_width(&labels[first..]) + reserved <= max_width {
            break;
        }
        first += 1;
    }
    let elided = first > 0;
    let mut offset = if elided { elision_width } else { 0 };
    let last = labels.len() - 1;
    let mut segments = Vec::with_capacity(labels.len() - first);
    for (index, label) in labels.iter().enumerate().skip(first) {
        let text = if index == last {
            truncate_to_width(label, max_width.saturating_sub(offset))
        } else {
            label.clone()
        };
        let width = text.width();
        segments.push(BreadcrumbSegment {
            index,
            text,
            offset: offset as u16,
        });
        offset += width + separator_width;
    }
    (elided, segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aisle_types::CategoryNode;

    fn path() -> SelectionPath {
        let android = CategoryNode::leaf(3, "Android", "/electronics/phones/android");
        let phones = CategoryNode::branch(2, "Phones", "/electronics/phones", vec![android.clone()]);
        let electronics = CategoryNode::branch(1, "Electronics", "/electronics", vec![phones.clone()]);
        SelectionPath::new(vec![electronics, phones, android])
    }

    #[test]
    fn breadcrumb_fits_without_elision() {
        let (elided, segments) = layout_breadcrumb(&path(), 80);
        assert!(!elided);
        let texts: Vec<_> = segments.iter().map(|segment| segment.text.as_str()).collect();
        assert_eq!(texts, vec!["1 Electronics", "2 Phones", "3 Android"]);
        assert_eq!(segments[1].offset, 16);
        assert_eq!(segments[2].offset, 27);
    }

    #[test]
    fn breadcrumb_drops_leading_segments_first() {
        let (elided, segments) = layout_breadcrumb(&path(), 24);
        assert!(elided);
        let indexes: Vec<_> = segments.iter().map(|segment| segment.index).collect();
        assert_eq!(indexes, vec![1, 2]);
        assert_eq!(segments[0].offset, 4);
    }

    #[test]
    fn breadcrumb_truncates_deepest_segment_last() {
        let (elided, segments) = layout_breadcrumb(&path(), 8);
        assert!(elided);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "3 A…");
    }

    #[test]
    fn digits_map_to_zero_based_indexes() {
        assert_eq!(breadcrumb_index('1'), 0);
        assert_eq!(breadcrumb_index('9'), 8);
    }
}
