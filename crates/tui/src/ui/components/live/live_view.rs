//! Live view component.
//!
//! A full-page text view bound to one model. It renders whatever the model
//! currently holds, so a model that re-renders its content is picked up on
//! the next frame. The view owns a key registry of its own; bindings added
//! to it are invisible to the page underneath.
//!
//! Built-in keys: `c` copy, `w` soft wrap, `/` filter, scrolling with
//! `↑/↓`, `j/k`, `PgUp/PgDn`, `g/G`.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use rview_types::Effect;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use super::LiveViewState;
use crate::app::AppHandle;
use crate::ui::components::Component;
use crate::ui::components::common::{paragraph_height, render_vertical_scrollbar};
use crate::ui::keys::{KeyAction, KeyActions, KeyBinding};
use crate::ui::theme::{Theme, theme_helpers as th};

/// Content source of a live view.
pub trait LiveModel: 'static {
    /// What the content is about, shown in the title.
    fn subject(&self) -> String;

    /// The text to display.
    fn content(&self) -> &str;

    /// Short description of how the content was produced.
    fn mode_label(&self) -> &str;
}

pub struct LiveView<M: LiveModel> {
    title: String,
    model: M,
    actions: KeyActions<LiveView<M>>,
    state: LiveViewState,
}

impl<M: LiveModel> std::fmt::Debug for LiveView<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveView")
            .field("title", &self.title)
            .field("actions", &self.actions)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<M: LiveModel> LiveView<M> {
    pub fn new(title: impl Into<String>, model: M) -> Self {
        let mut view = Self {
            title: title.into(),
            model,
            actions: KeyActions::default(),
            state: LiveViewState::default(),
        };
        view.bind_keys();
        view
    }

    fn bind_keys(&mut self) {
        self.actions.add(
            KeyBinding::char('c'),
            KeyAction::new("Copy", |view: &mut Self, app| view.copy(app), true),
        );
        self.actions.add(
            KeyBinding::char('w'),
            KeyAction::new("Toggle Wrap", |view: &mut Self, _| view.toggle_wrap(), true),
        );
        self.actions.add(
            KeyBinding::char('/'),
            KeyAction::new(
                "Filter",
                |view: &mut Self, _| {
                    view.state.filter.start_editing();
                    Vec::new()
                },
                true,
            ),
        );
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn actions_mut(&mut self) -> &mut KeyActions<Self> {
        &mut self.actions
    }

    pub fn state(&self) -> &LiveViewState {
        &self.state
    }

    /// Call after the model re-rendered its content.
    pub fn content_changed(&mut self) {
        debug!(subject = %self.model.subject(), mode = self.model.mode_label(), "Live view content changed");
        self.state.metrics.scroll_to_top();
    }

    fn copy(&self, app: &mut dyn AppHandle) -> Vec<Effect> {
        let content = self.model.content();
        if content.is_empty() {
            app.report_error("Nothing to copy");
            return Vec::new();
        }
        vec![Effect::CopyToClipboardRequested(content.to_string())]
    }

    fn toggle_wrap(&mut self) -> Vec<Effect> {
        self.state.wrap = !self.state.wrap;
        Vec::new()
    }

    fn handle_filter_keys(&mut self, key: KeyEvent) {
        let filter = &mut self.state.filter;
        match key.code {
            KeyCode::Esc => filter.cancel(),
            KeyCode::Enter => {
                filter.apply();
                self.state.metrics.scroll_to_top();
            }
            KeyCode::Backspace => filter.pop(),
            KeyCode::Char(ch) => filter.push(ch),
            _ => {}
        }
    }

    fn handle_scroll_keys(&mut self, key: KeyEvent) {
        let metrics = &mut self.state.metrics;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => metrics.scroll_lines(-1),
            KeyCode::Down | KeyCode::Char('j') => metrics.scroll_lines(1),
            KeyCode::PageUp => metrics.scroll_pages(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => metrics.scroll_pages(1),
            KeyCode::Home | KeyCode::Char('g') => metrics.scroll_to_top(),
            KeyCode::End | KeyCode::Char('G') => metrics.scroll_to_bottom(),
            _ => {}
        }
    }

    fn render_filter_line(&self, frame: &mut Frame, area: Rect, theme: &dyn Theme) {
        let filter = &self.state.filter;
        let (text, style) = if filter.is_editing() {
            (format!("/{}", filter.input()), theme.accent_emphasis_style())
        } else {
            let pattern = filter.applied().map(|regex| regex.as_str()).unwrap_or_default();
            (format!("filter: {pattern}"), theme.text_muted_style())
        };
        frame.render_widget(Paragraph::new(Line::from(Span::styled(text, style))), area);
        if filter.is_editing() {
            let offset = u16::try_from(filter.input().width() + 1).unwrap_or(area.width);
            frame.set_cursor_position((area.x.saturating_add(offset).min(area.right().saturating_sub(1)), area.y));
        }
    }

    fn render_body(&mut self, frame: &mut Frame, area: Rect, theme: &dyn Theme) {
        let title = format!("{}({}) [{}]", self.title, self.model.subject(), self.model.mode_label());
        let block = th::block(theme, Some(&title), true);
        let inner = block.inner(area);

        let lines = self.state.filter.visible_lines(self.model.content());
        let text: Vec<Line> = lines.iter().map(|line| highlight_yaml_line(line, theme)).collect();
        let mut paragraph = Paragraph::new(text).style(th::panel_style(theme));
        if self.state.wrap {
            paragraph = paragraph.wrap(Wrap { trim: false });
        }
        self.state.metrics.resize(paragraph_height(&paragraph, inner.width), inner.height);

        let paragraph = paragraph.block(block).scroll((self.state.metrics.offset(), 0));
        frame.render_widget(paragraph, area);
        render_vertical_scrollbar(frame, area, theme, &self.state.metrics);
    }
}

/// Styles the mapping key of a YAML line, leaving list markers and values
/// in the value style.
pub(crate) fn highlight_yaml_line(line: &str, theme: &dyn Theme) -> Line<'static> {
    let body_start = line.len() - line.trim_start_matches([' ', '-']).len();
    let (indent, body) = line.split_at(body_start);
    let key_end = body
        .find(": ")
        .or_else(|| body.strip_suffix(':').map(str::len))
        .filter(|_| !body.starts_with(['"', '\'', '#']));

    match key_end {
        Some(end) => Line::from(vec![
            Span::styled(indent.to_string(), theme.text_muted_style()),
            Span::styled(body[..end].to_string(), theme.syntax_key_style()),
            Span::styled(body[end..].to_string(), theme.syntax_value_style()),
        ]),
        None => Line::from(vec![
            Span::styled(indent.to_string(), theme.text_muted_style()),
            Span::styled(body.to_string(), theme.syntax_value_style()),
        ]),
    }
}

impl<M: LiveModel> Component for LiveView<M> {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn init(&mut self, app: &dyn AppHandle) -> Result<()> {
        self.state.wrap = app.config().wrap_values;
        Ok(())
    }

    fn handle_key_events(&mut self, app: &mut dyn AppHandle, key: KeyEvent) -> Vec<Effect> {
        if self.state.filter.is_editing() {
            self.handle_filter_keys(key);
            return Vec::new();
        }
        if let Some(handler) = self.actions.handler(&KeyBinding::from(key)) {
            return handler(self, app);
        }
        self.handle_scroll_keys(key);
        Vec::new()
    }

    fn captures_input(&self) -> bool {
        self.state.filter.is_editing()
    }

    fn dismiss(&mut self) -> bool {
        if self.state.filter.clear() {
            self.state.metrics.scroll_to_top();
            return true;
        }
        false
    }

    fn hints(&self) -> Vec<(String, String)> {
        if self.state.filter.is_editing() {
            return vec![("Enter".into(), "Apply".into()), ("Esc".into(), "Cancel".into())];
        }
        let mut hints = self.actions.hints();
        hints.push(("Esc".into(), "Back".into()));
        hints
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, theme: &dyn Theme) {
        let filter = &self.state.filter;
        if filter.is_editing() || filter.applied().is_some() {
            let [filter_area, body_area] = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(rect);
            self.render_filter_line(frame, filter_area, theme);
            self.render_body(frame, body_area, theme);
        } else {
            self.render_body(frame, rect, theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingApp, key};
    use ratatui::{Terminal, backend::TestBackend};

    struct Text(&'static str);

    impl LiveModel for Text {
        fn subject(&self) -> String {
            "sample".into()
        }
        fn content(&self) -> &str {
            self.0
        }
        fn mode_label(&self) -> &str {
            "text"
        }
    }

    const SAMPLE: &str = "image:\n  repository: nginx\n  tag: latest\nports:\n- 80\n- 443\n";

    fn render_text(view: &mut LiveView<Text>) -> String {
        render_sized(view, 40, 10)
    }

    fn render_sized(view: &mut LiveView<Text>, width: u16, height: u16) -> String {
        let theme = crate::ui::theme::load(None);
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                view.render(frame, area, theme.as_ref());
            })
            .unwrap();
        terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn copy_requests_the_full_content() {
        let mut app = RecordingApp::default();
        let mut view = LiveView::new("Values", Text(SAMPLE));
        let effects = view.handle_key_events(&mut app, key('c'));
        assert_eq!(effects, vec![Effect::CopyToClipboardRequested(SAMPLE.to_string())]);
    }

    #[test]
    fn init_takes_wrap_default_from_config() {
        let mut app = RecordingApp::default();
        app.config.wrap_values = true;
        let mut view = LiveView::new("Values", Text(SAMPLE));
        view.init(&app).unwrap();
        assert!(view.state().wrap);
        view.handle_key_events(&mut app, key('w'));
        assert!(!view.state().wrap);
    }

    #[test]
    fn filter_captures_input_until_applied_and_esc_dismisses_it() {
        let mut app = RecordingApp::default();
        let mut view = LiveView::new("Values", Text(SAMPLE));

        view.handle_key_events(&mut app, key('/'));
        assert!(view.captures_input());
        for ch in "tag".chars() {
            view.handle_key_events(&mut app, key(ch));
        }
        view.handle_key_events(&mut app, KeyEvent::from(KeyCode::Enter));
        assert!(!view.captures_input());

        let screen = render_text(&mut view);
        assert!(screen.contains("tag: latest"));
        assert!(!screen.contains("repository"));

        assert!(view.dismiss());
        assert!(!view.dismiss());
        assert!(render_text(&mut view).contains("repository"));
    }

    #[test]
    fn end_reaches_the_last_line_of_word_wrapped_content() {
        const WORDS: &str = "aaaaaa bbbbbb cccccc\naaaaaa bbbbbb cccccc\naaaaaa bbbbbb cccccc\n\
                             aaaaaa bbbbbb cccccc\naaaaaa bbbbbb cccccc\naaaaaa bbbbbb cccccc\nLASTLINE\n";
        let mut app = RecordingApp::default();
        let mut view = LiveView::new("Values", Text(WORDS));
        view.handle_key_events(&mut app, key('w'));
        assert!(view.state().wrap);

        // Ten text columns: each sentence wraps at its spaces onto three rows.
        render_sized(&mut view, 12, 6);
        view.handle_key_events(&mut app, KeyEvent::from(KeyCode::End));
        let screen = render_sized(&mut view, 12, 6);

        assert_eq!(view.state().metrics.offset(), 15);
        assert!(screen.contains("LASTLINE"));
    }

    #[test]
    fn scrollbar_replaces_the_right_border_and_leaves_text_alone() {
        let theme = crate::ui::theme::load(None);
        let mut view = LiveView::new("Values", Text(SAMPLE));
        let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                view.render(frame, area, theme.as_ref());
            })
            .unwrap();
        assert!(view.state().metrics.is_scrollable());

        let buffer = terminal.backend().buffer();
        let edge: Vec<&str> = (1..4).map(|y| buffer[(19, y)].symbol()).collect();
        assert!(edge.iter().all(|symbol| *symbol != "│" && *symbol != " "), "{edge:?}");
        // The rightmost text column keeps the content.
        let text: String = (1..19).map(|x| buffer[(x, 2)].symbol()).collect();
        assert_eq!(text, "  repository: ngin");
    }

    #[test]
    fn title_shows_subject_and_mode() {
        let mut view = LiveView::new("Values", Text(SAMPLE));
        assert!(render_text(&mut view).contains("Values(sample) [text]"));
    }

    #[test]
    fn own_bindings_are_listed_in_hints() {
        let mut view = LiveView::new("Values", Text(SAMPLE));
        view.actions_mut().add(KeyBinding::char('v'), KeyAction::new("Toggle All Values", |_, _| Vec::new(), true));
        let keys: Vec<String> = view.hints().into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["c", "w", "/", "v", "Esc"]);
    }

    #[test]
    fn yaml_keys_are_split_from_values() {
        let theme = crate::ui::theme::load(None);
        let spans: Vec<String> = highlight_yaml_line("  - name: web", theme.as_ref())
            .spans
            .iter()
            .map(|span| span.content.to_string())
            .collect();
        assert_eq!(spans, vec!["  - ", "name", ": web"]);

        let nested: Vec<String> = highlight_yaml_line("image:", theme.as_ref())
            .spans
            .iter()
            .map(|span| span.content.to_string())
            .collect();
        assert_eq!(nested, vec!["", "image", ":"]);
    }
}
