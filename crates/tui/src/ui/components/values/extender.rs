//! Values extension for resource viewers.
//!
//! `ValueExtender` wraps any `ResourceViewer` and adds a `v` ("Values") key
//! plus an `Enter` action. Both open a live view with the values of the
//! selected resource; inside that view `v` ("Toggle All Values") switches
//! between the user-supplied and the computed values. Every request opens a
//! fresh view, even when one for the same resource is already open.

use std::rc::Rc;

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};
use rview_types::{Effect, Gvr, Msg};
use tracing::{debug, error, warn};

use super::{ValuesContext, ValuesModel};
use crate::app::AppHandle;
use crate::ui::components::Component;
use crate::ui::components::browser::{BindKeysFn, ResourceTable, ResourceViewer};
use crate::ui::components::live::LiveView;
use crate::ui::keys::{KeyAction, KeyActions, KeyBinding};
use crate::ui::theme::Theme;

/// Title of the live view opened by the values action.
pub const VALUES_TITLE: &str = "Values";

#[derive(Debug)]
pub struct ValueExtender<V: ResourceViewer> {
    inner: V,
}

impl<V: ResourceViewer> ValueExtender<V> {
    pub fn new(mut inner: V) -> Self {
        inner.add_bind_keys_fn(Box::new(|actions: &mut KeyActions<dyn ResourceViewer>| {
            actions.add(KeyBinding::char('v'), KeyAction::new("Values", |viewer, app| values_cmd(viewer, app), true));
        }));
        inner
            .table_mut()
            .set_enter_fn(Rc::new(|viewer: &mut dyn ResourceViewer, app: &mut dyn AppHandle, path: &str| {
                let gvr = viewer.gvr().clone();
                show_values(app, &gvr, path)
            }));
        Self { inner }
    }
}

fn values_cmd(viewer: &mut dyn ResourceViewer, app: &mut dyn AppHandle) -> Vec<Effect> {
    let path = viewer.table().selected_item().unwrap_or_default().to_string();
    let gvr = viewer.gvr().clone();
    show_values(app, &gvr, &path)
}

/// Opens a values view for `path`. An empty path is a no-op.
pub fn show_values(app: &mut dyn AppHandle, gvr: &Gvr, path: &str) -> Vec<Effect> {
    if path.is_empty() {
        return Vec::new();
    }

    let ctx = ValuesContext::new(app.access());
    let mut model = ValuesModel::new(gvr.clone(), path);
    if let Err(error) = model.init(ctx.access()) {
        warn!(%gvr, path, error = %error, "Values model init failed");
        app.report_error(&format!("Initializing the values model failed: {error}"));
        return Vec::new();
    }

    let mut view = LiveView::new(VALUES_TITLE, model);
    view.actions_mut().add(
        KeyBinding::char('v'),
        KeyAction::new("Toggle All Values", move |view, app| toggle_all_values(view, app, &ctx), true),
    );

    if let Err(error) = app.inject(Box::new(view), false) {
        error!(%gvr, path, error = %error, "Values view injection failed");
        app.report_error(&error.to_string());
    }
    Vec::new()
}

fn toggle_all_values(view: &mut LiveView<ValuesModel>, app: &mut dyn AppHandle, ctx: &ValuesContext) -> Vec<Effect> {
    let model = view.model_mut();
    if let Err(error) = model.toggle_values() {
        warn!(error = %error, "Values toggle failed");
        app.report_error(&format!("Values toggle failed: {error}"));
        return Vec::new();
    }
    if let Err(error) = model.refresh(ctx) {
        error!(
            gvr = %model.gvr(),
            path = model.path(),
            state = ?model.state(),
            error = %error,
            "Values viewer refresh failed"
        );
        app.report_error(&format!("Values refresh failed: {error}"));
        return Vec::new();
    }
    debug!(path = model.path(), state = ?model.state(), "Values toggled");
    view.content_changed();
    app.report("Values toggled");
    Vec::new()
}

impl<V: ResourceViewer> Component for ValueExtender<V> {
    fn title(&self) -> String {
        self.inner.title()
    }

    fn init(&mut self, app: &dyn AppHandle) -> Result<()> {
        self.inner.init(app)
    }

    fn handle_message(&mut self, app: &mut dyn AppHandle, msg: &Msg) -> Vec<Effect> {
        self.inner.handle_message(app, msg)
    }

    fn handle_key_events(&mut self, app: &mut dyn AppHandle, key: KeyEvent) -> Vec<Effect> {
        self.inner.handle_key_events(app, key)
    }

    fn captures_input(&self) -> bool {
        self.inner.captures_input()
    }

    fn dismiss(&mut self) -> bool {
        self.inner.dismiss()
    }

    fn hints(&self) -> Vec<(String, String)> {
        self.inner.hints()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, theme: &dyn Theme) {
        self.inner.render(frame, rect, theme);
    }
}

impl<V: ResourceViewer> ResourceViewer for ValueExtender<V> {
    fn gvr(&self) -> &Gvr {
        self.inner.gvr()
    }

    fn table(&self) -> &ResourceTable {
        self.inner.table()
    }

    fn table_mut(&mut self) -> &mut ResourceTable {
        self.inner.table_mut()
    }

    fn add_bind_keys_fn(&mut self, bind: BindKeysFn) {
        self.inner.add_bind_keys_fn(bind);
    }

    fn actions(&self) -> &KeyActions<dyn ResourceViewer> {
        self.inner.actions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingApp, computed_yaml, key, releases_gvr, user_yaml};
    use crate::ui::components::browser::ResourceBrowser;
    use crate::ui::components::live::LiveModel;
    use crate::ui::components::values::ValuesState;
    use crossterm::event::KeyCode;
    use rview_types::FlashLevel;

    fn extended(app: &RecordingApp) -> ValueExtender<ResourceBrowser> {
        let mut viewer = ValueExtender::new(ResourceBrowser::new(releases_gvr()));
        viewer.init(app).unwrap();
        viewer
    }

    /// Opens the values view for the first row and returns it.
    fn open_values(app: &mut RecordingApp) -> Box<dyn Component> {
        let mut viewer = extended(app);
        viewer.handle_key_events(app, key('v'));
        assert_eq!(app.injected.len(), 1);
        app.injected.remove(0)
    }

    fn as_values_view(page: &mut Box<dyn Component>) -> &mut LiveView<ValuesModel> {
        let page: &mut dyn Component = page.as_mut();
        (page as &mut dyn std::any::Any).downcast_mut::<LiveView<ValuesModel>>().unwrap()
    }

    #[test]
    fn extender_adds_values_binding_and_keeps_base_bindings() {
        let app = RecordingApp::default();
        let viewer = extended(&app);
        let hints = viewer.actions().hints();
        assert!(hints.contains(&("Ctrl-R".to_string(), "Reload".to_string())));
        assert!(hints.contains(&("v".to_string(), "Values".to_string())));
        assert!(viewer.table().enter_fn().is_some());
        assert_eq!(viewer.title(), "helm.sh/v3/releases");
    }

    #[test]
    fn empty_selection_is_a_silent_no_op() {
        let mut app = RecordingApp::default();
        let effects = show_values(&mut app, &releases_gvr(), "");
        assert!(effects.is_empty());
        assert!(app.injected.is_empty());
        assert!(app.notifications.is_empty());
        assert_eq!(app.inject_calls, 0);
    }

    #[test]
    fn empty_table_enter_does_nothing() {
        let mut app = RecordingApp::empty();
        let mut viewer = extended(&app);
        viewer.handle_key_events(&mut app, KeyEvent::from(KeyCode::Enter));
        viewer.handle_key_events(&mut app, key('v'));
        assert!(app.injected.is_empty());
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn values_key_opens_collapsed_view() {
        let mut app = RecordingApp::default();
        let mut page = open_values(&mut app);
        assert_eq!(page.title(), VALUES_TITLE);
        assert_eq!(app.inject_calls, 1);
        assert!(app.notifications.is_empty());

        let view = as_values_view(&mut page);
        assert_eq!(view.model().state(), ValuesState::Collapsed);
        assert_eq!(view.model().path(), "ns/pod-a");
        assert_eq!(view.model().content(), user_yaml());
    }

    #[test]
    fn enter_opens_the_same_view_for_the_selected_row() {
        let mut app = RecordingApp::default();
        let mut viewer = extended(&app);
        viewer.handle_key_events(&mut app, key('j'));
        viewer.handle_key_events(&mut app, KeyEvent::from(KeyCode::Enter));

        assert_eq!(app.injected.len(), 1);
        let view = as_values_view(&mut app.injected[0]);
        assert_eq!(view.model().path(), "ns/pod-b");
    }

    #[test]
    fn toggle_expands_and_reports_once() {
        let mut app = RecordingApp::default();
        let mut page = open_values(&mut app);

        page.handle_key_events(&mut app, key('v'));
        let view = as_values_view(&mut page);
        assert_eq!(view.model().state(), ValuesState::Expanded);
        assert_eq!(view.model().content(), computed_yaml());
        assert_eq!(app.notifications, vec![(FlashLevel::Info, "Values toggled".to_string())]);
    }

    #[test]
    fn failed_refresh_reports_error_and_keeps_stale_content() {
        let mut app = RecordingApp::default();
        let mut page = open_values(&mut app);
        page.handle_key_events(&mut app, key('v'));
        app.notifications.clear();

        app.store.remove(&releases_gvr(), "ns/pod-a");
        page.handle_key_events(&mut app, key('v'));

        let view = as_values_view(&mut page);
        assert_eq!(view.model().state(), ValuesState::Collapsed);
        assert_eq!(view.model().content(), computed_yaml());
        assert_eq!(view.model().mode_label(), "all values");
        assert_eq!(app.errors().len(), 1);
        assert!(app.errors()[0].starts_with("Values refresh failed: "));
        assert!(app.infos().is_empty());
    }

    #[test]
    fn toggle_on_uninitialized_model_reports_one_error() {
        let mut app = RecordingApp::default();
        let ctx = ValuesContext::new(app.access());
        let mut view = LiveView::new(VALUES_TITLE, ValuesModel::new(releases_gvr(), "ns/pod-a"));

        toggle_all_values(&mut view, &mut app, &ctx);
        assert_eq!(view.model().state(), ValuesState::Uninitialized);
        assert_eq!(app.errors().len(), 1);
        assert!(app.errors()[0].starts_with("Values toggle failed: "));
        assert!(app.infos().is_empty());
    }

    #[test]
    fn init_failure_reports_and_opens_nothing() {
        let mut app = RecordingApp::default();
        show_values(&mut app, &releases_gvr(), "ns/missing");
        assert!(app.injected.is_empty());
        assert_eq!(
            app.errors(),
            vec!["Initializing the values model failed: ns/missing: helm.sh/v3/releases 'ns/missing' not found".to_string()]
        );
    }

    #[test]
    fn inject_failure_is_reported_once_and_view_dropped() {
        let mut app = RecordingApp::default();
        app.fail_inject = true;
        show_values(&mut app, &releases_gvr(), "ns/pod-a");
        assert!(app.injected.is_empty());
        assert_eq!(app.errors().len(), 1);
        assert!(app.infos().is_empty());
    }

    #[test]
    fn repeated_requests_open_independent_views() {
        let mut app = RecordingApp::default();
        show_values(&mut app, &releases_gvr(), "ns/pod-a");
        show_values(&mut app, &releases_gvr(), "ns/pod-a");
        assert_eq!(app.injected.len(), 2);

        app.injected[0].handle_key_events(&mut RecordingApp::default(), key('v'));
        let first = as_values_view(&mut app.injected[0]).model().state();
        let second = as_values_view(&mut app.injected[1]).model().state();
        assert_eq!(first, ValuesState::Expanded);
        assert_eq!(second, ValuesState::Collapsed);
    }

    #[test]
    fn toggle_key_is_scoped_to_the_values_view() {
        let mut app = RecordingApp::default();
        let viewer = extended(&app);
        let mut page = open_values(&mut app);
        let view_hints = page.hints();
        assert!(view_hints.contains(&("v".to_string(), "Toggle All Values".to_string())));
        assert!(!viewer.hints().contains(&("v".to_string(), "Toggle All Values".to_string())));
        assert_eq!(as_values_view(&mut page).model().gvr(), &releases_gvr());
    }
}
