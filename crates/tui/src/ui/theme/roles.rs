use std::fmt::Debug;

use ratatui::style::{Color, Modifier, Style};

/// Colors the category browser paints with, named after where they show up.
#[derive(Debug, Clone)]
pub struct ThemeRoles {
    /// Behind everything.
    pub canvas: Color,
    /// Search box, list and summary panels.
    pub panel: Color,
    pub frame: Color,
    pub frame_focused: Color,

    /// Category names and typed search text.
    pub ink: Color,
    /// Panel titles and the current breadcrumb segment.
    pub ink_heading: Color,
    /// Hints, tree markers, truncated full paths.
    pub ink_dim: Color,

    /// Breadcrumb numbers, key hints, the chosen category.
    pub highlight: Color,
    /// Public category URL.
    pub link: Color,

    pub loaded: Color,
    pub loading: Color,
    pub load_failed: Color,

    pub cursor_bg: Color,
    pub cursor_fg: Color,
}

/// A palette plus the styles the selector widgets are built from.
pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    fn text_primary_style(&self) -> Style {
        Style::default().fg(self.roles().ink)
    }
    fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().ink_heading)
    }
    fn text_muted_style(&self) -> Style {
        Style::default().fg(self.roles().ink_dim)
    }

    fn border_style(&self, focused: bool) -> Style {
        let roles = self.roles();
        Style::default().fg(if focused { roles.frame_focused } else { roles.frame })
    }

    /// Row under the list cursor.
    fn selection_style(&self) -> Style {
        Style::default().fg(self.roles().cursor_fg).bg(self.roles().cursor_bg)
    }

    fn status_success(&self) -> Style {
        Style::default().fg(self.roles().loaded)
    }
    fn status_warning(&self) -> Style {
        Style::default().fg(self.roles().loading)
    }
    fn status_error(&self) -> Style {
        Style::default().fg(self.roles().load_failed)
    }

    fn accent_primary_style(&self) -> Style {
        Style::default().fg(self.roles().highlight)
    }
    fn accent_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().link).add_modifier(Modifier::UNDERLINED)
    }
    fn accent_emphasis_style(&self) -> Style {
        self.accent_primary_style().add_modifier(Modifier::BOLD)
    }
}
