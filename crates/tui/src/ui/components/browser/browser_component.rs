//! Resource browser component.
//!
//! Lists every instance of one resource type in a table. The browser features:
//! - keyboard navigation of the rows (`↑/↓`, `j/k`, `g/G`)
//! - a reload action (`Ctrl-R`) that re-reads the store
//! - an `Enter` action hook that decorators install through the table
//! - an open key registry that decorators extend via `add_bind_keys_fn`

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
};
use rview_types::{Effect, Gvr};
use tracing::{debug, warn};

use super::{BindKeysFn, ResourceTable, ResourceViewer, TableLayout};
use crate::app::AppHandle;
use crate::ui::components::Component;
use crate::ui::keys::{KeyAction, KeyActions, KeyBinding};
use crate::ui::theme::{Theme, theme_helpers as th};

pub struct ResourceBrowser {
    gvr: Gvr,
    table: ResourceTable,
    actions: KeyActions<dyn ResourceViewer>,
    bind_keys_fns: Vec<BindKeysFn>,
}

impl std::fmt::Debug for ResourceBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceBrowser")
            .field("gvr", &self.gvr)
            .field("table", &self.table)
            .field("actions", &self.actions)
            .finish_non_exhaustive()
    }
}

impl ResourceBrowser {
    pub fn new(gvr: Gvr) -> Self {
        let mut browser = Self {
            gvr,
            table: ResourceTable::default(),
            actions: KeyActions::default(),
            bind_keys_fns: Vec::new(),
        };
        browser.bind_keys();
        browser
    }

    /// Rebuilds the registry: base bindings first, then every registered
    /// callback in registration order.
    fn bind_keys(&mut self) {
        let mut actions: KeyActions<dyn ResourceViewer> = KeyActions::default();
        actions.add(KeyBinding::ctrl('r'), KeyAction::new("Reload", |viewer, app| reload(viewer, app), true));
        for bind in &self.bind_keys_fns {
            bind(&mut actions);
        }
        self.actions = actions;
    }

    fn handle_navigation(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.table.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.table.select_next(),
            KeyCode::Home | KeyCode::Char('g') => self.table.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.table.select_last(),
            _ => {}
        }
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect, theme: &dyn Theme) {
        let title = format!("{} ({})", self.gvr.resource, self.table.rows().len());
        let block = th::block(theme, Some(&title), true);

        if self.table.rows().is_empty() {
            let placeholder = Paragraph::new(Line::from(Span::styled(
                format!("No {} found", self.gvr),
                theme.text_muted_style(),
            )))
            .block(block);
            frame.render_widget(placeholder, area);
            return;
        }

        let layout = self.table.layout();
        let header = Row::new(layout.headers().iter().map(|column| Cell::from(*column))).style(th::table_header_style(theme));
        let rows: Vec<Row> = self
            .table
            .rows()
            .iter()
            .map(|row| Row::new(row.cells.iter().cloned().map(Cell::from)).style(theme.text_primary_style()))
            .collect();
        let widths = match layout {
            TableLayout::Release => vec![
                Constraint::Percentage(18),
                Constraint::Percentage(27),
                Constraint::Length(9),
                Constraint::Percentage(15),
                Constraint::Fill(1),
            ],
            TableLayout::Generic => vec![Constraint::Percentage(30), Constraint::Fill(1)],
        };
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(1)
            .row_highlight_style(theme.selection_style().add_modifier(Modifier::BOLD))
            .highlight_symbol("> ")
            .style(th::panel_style(theme));
        frame.render_stateful_widget(table, area, self.table.table_state_mut());
    }
}

fn reload(viewer: &mut dyn ResourceViewer, app: &mut dyn AppHandle) -> Vec<Effect> {
    let access = app.access();
    let gvr = viewer.gvr().clone();
    match viewer.table_mut().load(access.as_ref(), &gvr) {
        Ok(count) => {
            debug!(%gvr, count, "Reloaded resources");
            app.report(&format!("Reloaded {count} {}", gvr.resource));
        }
        Err(error) => {
            warn!(%gvr, error = %error, "Reload failed");
            app.report_error(&format!("Reload failed: {error}"));
        }
    }
    Vec::new()
}

impl Component for ResourceBrowser {
    fn title(&self) -> String {
        self.gvr.to_string()
    }

    fn init(&mut self, app: &dyn AppHandle) -> Result<()> {
        let count = self
            .table
            .load(app.access().as_ref(), &self.gvr)
            .with_context(|| format!("failed to list {}", self.gvr))?;
        debug!(gvr = %self.gvr, count, "Loaded resources");
        Ok(())
    }

    fn handle_key_events(&mut self, app: &mut dyn AppHandle, key: KeyEvent) -> Vec<Effect> {
        if let Some(handler) = self.actions.handler(&KeyBinding::from(key)) {
            return handler(self, app);
        }
        if key.code == KeyCode::Enter {
            let Some(enter) = self.table.enter_fn() else {
                return Vec::new();
            };
            let path = self.table.selected_item().unwrap_or_default().to_string();
            return enter(self, app, &path);
        }
        self.handle_navigation(key);
        Vec::new()
    }

    fn hints(&self) -> Vec<(String, String)> {
        let mut hints = self.actions.hints();
        hints.push(("↑/↓".into(), "Navigate".into()));
        hints.push(("q".into(), "Quit".into()));
        hints
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, theme: &dyn Theme) {
        self.render_table(frame, rect, theme);
    }
}

impl ResourceViewer for ResourceBrowser {
    fn gvr(&self) -> &Gvr {
        &self.gvr
    }

    fn table(&self) -> &ResourceTable {
        &self.table
    }

    fn table_mut(&mut self) -> &mut ResourceTable {
        &mut self.table
    }

    fn add_bind_keys_fn(&mut self, bind: BindKeysFn) {
        self.bind_keys_fns.push(bind);
        self.bind_keys();
    }

    fn actions(&self) -> &KeyActions<dyn ResourceViewer> {
        &self.actions
    }
}
