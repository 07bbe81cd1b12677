//! Root view: paints the background, hosts the category selector and draws
//! the status and hint bars underneath it.

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{App, Effect, LoadStatus, Msg};
use crate::ui::components::{CategorySelectorComponent, component::Component};

#[derive(Debug, Default)]
pub struct MainView {
    selector_view: CategorySelectorComponent,
}

impl MainView {
    /// Give focus back to the first focusable widget after a structure change
    /// removed the previously focused one.
    pub fn restore_focus(&mut self, app: &mut App) {
        app.focus.first();
    }

    fn get_preferred_layout(&self, area: Rect) -> Vec<Rect> {
        Layout::vertical([
            Constraint::Min(5),    // Selector
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Hints bar
        ])
        .split(area)
        .to_vec()
    }

    fn status_line(&self, app: &App) -> Line<'_> {
        let theme = &*app.ctx.theme;
        let mut spans = vec![Span::styled(app.ctx.source_label.clone(), theme.text_muted_style())];
        let (text, style) = match &app.load_status {
            LoadStatus::Idle => (String::new(), theme.text_muted_style()),
            LoadStatus::Loading => (format!("{} loading", app.throbber()), theme.status_warning()),
            LoadStatus::Ready { nodes } => (format!("{nodes} categories"), theme.status_success()),
            LoadStatus::Failed(_) => ("load failed".to_string(), theme.status_error()),
        };
        if !text.is_empty() {
            spans.push(Span::styled(" · ", theme.text_muted_style()));
            spans.push(Span::styled(text, style));
        }
        if let Some(message) = app.status_message.as_deref() {
            spans.push(Span::styled(" · ", theme.text_muted_style()));
            spans.push(Span::styled(message.to_string(), theme.status_warning()));
        }
        Line::from(spans)
    }
}

impl Component for MainView {
    fn handle_message(&mut self, app: &mut App, msg: &Msg) -> Vec<Effect> {
        let mut effects = app.update(msg);
        effects.extend(self.selector_view.handle_message(app, msg));
        effects
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        self.selector_view.handle_key_events(app, key)
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        self.selector_view.handle_mouse_events(app, mouse)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        // Fill the entire background with the theme's background color for consistency
        let bg_fill = Paragraph::new("").style(Style::default().bg(app.ctx.theme.roles().canvas));
        frame.render_widget(bg_fill, area);

        let layout = self.get_preferred_layout(area);
        self.selector_view.render(frame, layout[0], app);

        frame.render_widget(Paragraph::new(self.status_line(app)), layout[1]);

        let hint_spans: Vec<Span> = self.get_hint_spans(app);
        let hints_widget = Paragraph::new(Line::from(hint_spans)).style(app.ctx.theme.text_muted_style());
        frame.render_widget(hints_widget, layout[2]);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut hint_spans: Vec<Span> = vec![Span::styled("Hints: ", app.ctx.theme.text_muted_style())];
        hint_spans.extend(self.selector_view.get_hint_spans(app));
        if matches!(app.load_status, LoadStatus::Failed(_)) {
            hint_spans.push(Span::styled("F5", app.ctx.theme.accent_emphasis_style()));
            hint_spans.push(Span::styled(" Retry ", app.ctx.theme.text_muted_style()));
        }
        hint_spans
    }
}
