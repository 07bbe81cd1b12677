//! Plain-text rendering for the non-interactive subcommands.

use aisle_catalog::TreeRow;
use aisle_types::{FULL_PATH_DELIMITER, SelectionPath};

/// One line per row: depth indentation, a branch marker and the label.
pub fn render_rows(rows: &[TreeRow<'_>], with_ids: bool) -> String {
    let mut out = String::new();
    for row in rows {
        let marker = match (row.is_branch(), row.expanded) {
            (true, true) => "▾ ",
            (true, false) => "▸ ",
            (false, _) => "  ",
        };
        out.push_str(&"  ".repeat(row.depth));
        out.push_str(marker);
        out.push_str(row.label());
        if with_ids {
            out.push_str(&format!("  [{}]", row.node.id));
        }
        out.push('\n');
    }
    out
}

/// Breadcrumb line, followed by the public URL when the selection is a leaf.
pub fn render_selection(path: &SelectionPath) -> String {
    let mut out = path.breadcrumb(FULL_PATH_DELIMITER);
    out.push('\n');
    if let Some(url) = path.public_url() {
        out.push_str(&url);
        out.push('\n');
    }
    out
}
