//! Frame layout: breadcrumb header, the top page, the flash bar and the
//! key hints of the top page.

use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph},
};

use super::theme::theme_helpers as th;
use crate::app::App;

/// Draws the whole UI for one frame.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let theme = &*app.ctx.theme;
    frame.render_widget(Block::default().style(th::panel_style(theme)), frame.area());

    let [header, body, flash, hints] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let crumbs = app.pages.titles().join(" > ");
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" rview ", theme.accent_emphasis_style()),
            Span::styled(crumbs, theme.text_secondary_style()),
        ])),
        header,
    );

    let Some(top) = app.pages.top_mut() else {
        return;
    };
    let hint_pairs = top.hints();
    top.render(frame, body, theme);

    if let Some(notification) = app.flash.current() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                notification.message.clone(),
                th::flash_style(theme, notification.level),
            )),
            flash,
        );
    }

    frame.render_widget(Paragraph::new(Line::from(th::build_hint_spans(theme, &hint_pairs))), hints);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppHandle;
    use crate::test_support::{key, releases_gvr, seeded_store};
    use crate::ui::components::browser::ResourceBrowser;
    use crate::ui::components::values::ValueExtender;
    use ratatui::{Terminal, backend::TestBackend};
    use rview_util::ViewerConfig;

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn shows_breadcrumbs_hints_and_flash() {
        let mut app = App::new(seeded_store(), ViewerConfig::default());
        app.inject(Box::new(ValueExtender::new(ResourceBrowser::new(releases_gvr()))), true)
            .unwrap();
        app.handle_key_events(key('v'));
        app.report("Values toggled");

        let rendered = screen(&mut app);
        assert!(rendered.contains("helm.sh/v3/releases > Values"));
        assert!(rendered.contains("Toggle All Values"));
        assert!(rendered.contains("Values toggled"));
    }
}
