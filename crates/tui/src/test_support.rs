//! Fixtures shared by the unit tests of this crate.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{Frame, layout::Rect};
use rview_types::{FlashLevel, Gvr};
use rview_util::{MemoryStore, ResourceAccess, ViewerConfig, coalesce_values};
use serde_json::{Value, json};

use crate::app::{AppHandle, InjectError};
use crate::ui::components::Component;
use crate::ui::theme::Theme;

pub fn releases_gvr() -> Gvr {
    Gvr::new("helm.sh", "v3", "releases")
}

pub fn key(ch: char) -> KeyEvent {
    KeyEvent::from(KeyCode::Char(ch))
}

fn chart_defaults() -> Value {
    json!({
        "replicaCount": 1,
        "image": { "repository": "nginx", "tag": "1.25", "pullPolicy": "IfNotPresent" },
        "service": { "type": "ClusterIP", "port": 80 }
    })
}

fn pod_a_overrides() -> Value {
    json!({
        "replicaCount": 2,
        "image": { "tag": "1.27" }
    })
}

fn release(namespace: &str, name: &str, values: Value) -> Value {
    json!({
        "metadata": { "namespace": namespace, "name": name },
        "version": 1,
        "info": { "status": "deployed" },
        "chart": {
            "metadata": { "name": "nginx", "version": "15.1.0" },
            "values": chart_defaults()
        },
        "values": values
    })
}

/// Store holding three releases: `ns/pod-a`, `ns/pod-b` and `web/api`.
pub fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    let gvr = releases_gvr();
    for document in [
        release("ns", "pod-a", pod_a_overrides()),
        release("ns", "pod-b", json!({ "service": { "port": 8080 } })),
        release("web", "api", json!({})),
    ] {
        store.insert(&gvr, document).unwrap();
    }
    Arc::new(store)
}

/// Collapsed rendering of `ns/pod-a`.
pub fn user_yaml() -> String {
    serde_yaml::to_string(&pod_a_overrides()).unwrap()
}

/// Expanded rendering of `ns/pod-a`.
pub fn computed_yaml() -> String {
    serde_yaml::to_string(&coalesce_values(&chart_defaults(), &pod_a_overrides())).unwrap()
}

/// `AppHandle` that records notifications and injected pages.
pub struct RecordingApp {
    pub store: Arc<MemoryStore>,
    pub config: ViewerConfig,
    pub notifications: Vec<(FlashLevel, String)>,
    pub injected: Vec<Box<dyn Component>>,
    pub inject_calls: usize,
    pub fail_inject: bool,
}

impl Default for RecordingApp {
    fn default() -> Self {
        Self::with_store(seeded_store())
    }
}

impl RecordingApp {
    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self {
            store,
            config: ViewerConfig::default(),
            notifications: Vec::new(),
            injected: Vec::new(),
            inject_calls: 0,
            fail_inject: false,
        }
    }

    pub fn empty() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    fn messages(&self, level: FlashLevel) -> Vec<String> {
        self.notifications
            .iter()
            .filter(|(recorded, _)| *recorded == level)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn infos(&self) -> Vec<String> {
        self.messages(FlashLevel::Info)
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(FlashLevel::Error)
    }
}

impl AppHandle for RecordingApp {
    fn access(&self) -> Arc<dyn ResourceAccess> {
        self.store.clone()
    }

    fn config(&self) -> &ViewerConfig {
        &self.config
    }

    fn report(&mut self, message: &str) {
        self.notifications.push((FlashLevel::Info, message.to_string()));
    }

    fn report_error(&mut self, message: &str) {
        self.notifications.push((FlashLevel::Error, message.to_string()));
    }

    fn inject(&mut self, mut page: Box<dyn Component>, _exclusive: bool) -> Result<(), InjectError> {
        self.inject_calls += 1;
        if self.fail_inject {
            return Err(InjectError::StackFull {
                page: page.title(),
                max: self.injected.len(),
            });
        }
        page.init(&*self).map_err(|error| InjectError::Init {
            page: page.title(),
            reason: error.to_string(),
        })?;
        self.injected.push(page);
        Ok(())
    }
}

/// Minimal page used where only the stack mechanics matter.
pub struct StubPage {
    title: String,
}

impl StubPage {
    pub fn new(title: &str) -> Self {
        Self { title: title.to_string() }
    }
}

impl Component for StubPage {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn render(&mut self, _frame: &mut Frame, _rect: Rect, _theme: &dyn Theme) {}
}
