//! Values model.
//!
//! Renders the values of one release for display in a live view. The model
//! is a small state machine:
//!
//! ```text
//! Uninitialized --init--> Collapsed <--toggle_values--> Expanded
//! ```
//!
//! `Collapsed` shows the user-supplied values, `Expanded` the computed values
//! (chart defaults merged with the user-supplied ones). `refresh` re-renders
//! the current state and only replaces the displayed text when rendering
//! succeeds, so a failed refresh leaves the previous render on screen.

use std::sync::Arc;

use rview_types::{Gvr, ResourceObject};
use rview_util::{AccessError, ResourceAccess, coalesce_values};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::ui::components::live::LiveModel;

/// Document fields holding user-supplied values, in lookup order: Helm
/// release records, Flux `HelmRelease` objects, raw Helm storage records.
const USER_VALUES_FIELDS: [&[&str]; 3] = [&["values"], &["spec", "values"], &["config"]];

/// Field holding the chart defaults.
const CHART_VALUES_FIELD: &[&str] = &["chart", "values"];

/// Disclosure state of a values model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValuesState {
    #[default]
    Uninitialized,
    /// User-supplied values only.
    Collapsed,
    /// Chart defaults merged with the user-supplied values.
    Expanded,
}

impl ValuesState {
    /// The opposite disclosure state; `None` before initialization.
    pub fn toggled(self) -> Option<Self> {
        match self {
            Self::Uninitialized => None,
            Self::Collapsed => Some(Self::Expanded),
            Self::Expanded => Some(Self::Collapsed),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Collapsed => "user values",
            Self::Expanded => "all values",
        }
    }
}

/// Read-only handles needed to render values. Built once per show request.
#[derive(Debug, Clone)]
pub struct ValuesContext {
    access: Arc<dyn ResourceAccess>,
}

impl ValuesContext {
    pub fn new(access: Arc<dyn ResourceAccess>) -> Self {
        Self { access }
    }

    pub fn access(&self) -> &dyn ResourceAccess {
        self.access.as_ref()
    }
}

/// Why values could not be produced.
#[derive(Debug, Error)]
pub enum ValuesSourceError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("'{field}' is not a mapping")]
    NotAMapping { field: String },
    #[error("cannot render values: {0}")]
    Render(#[from] serde_yaml::Error),
    #[error("values model is not initialized")]
    NotInitialized,
}

#[derive(Debug, Error)]
pub enum ValuesError {
    /// The resource could not be resolved or its values decoded.
    #[error("{path}: {source}")]
    Initialization { path: String, source: ValuesSourceError },
    /// A toggle was requested before the model was initialized.
    #[error("{path}: values model is not initialized")]
    Toggle { path: String },
    /// Re-rendering the current state failed; the previous render is kept.
    #[error("{path}: {source}")]
    Refresh { path: String, source: ValuesSourceError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Rendered {
    state: ValuesState,
    text: String,
}

#[derive(Debug)]
pub struct ValuesModel {
    gvr: Gvr,
    path: String,
    state: ValuesState,
    rendered: Option<Rendered>,
}

impl ValuesModel {
    pub fn new(gvr: Gvr, path: impl Into<String>) -> Self {
        Self {
            gvr,
            path: path.into(),
            state: ValuesState::Uninitialized,
            rendered: None,
        }
    }

    pub fn gvr(&self) -> &Gvr {
        &self.gvr
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> ValuesState {
        self.state
    }

    /// State the displayed text was rendered in. Differs from `state()`
    /// after a toggle whose refresh failed.
    pub fn rendered_state(&self) -> Option<ValuesState> {
        self.rendered.as_ref().map(|rendered| rendered.state)
    }

    /// Resolves the resource and renders its user-supplied values.
    pub fn init(&mut self, access: &dyn ResourceAccess) -> Result<(), ValuesError> {
        let text = self
            .render(access, ValuesState::Collapsed)
            .map_err(|source| ValuesError::Initialization {
                path: self.path.clone(),
                source,
            })?;
        self.state = ValuesState::Collapsed;
        self.rendered = Some(Rendered {
            state: ValuesState::Collapsed,
            text,
        });
        debug!(gvr = %self.gvr, path = %self.path, "Values model initialized");
        Ok(())
    }

    /// Flips between collapsed and expanded. Content is not re-rendered
    /// until the next `refresh`.
    pub fn toggle_values(&mut self) -> Result<ValuesState, ValuesError> {
        let next = self.state.toggled().ok_or_else(|| ValuesError::Toggle { path: self.path.clone() })?;
        self.state = next;
        Ok(next)
    }

    /// Re-renders the current state. The state never changes here.
    pub fn refresh(&mut self, ctx: &ValuesContext) -> Result<(), ValuesError> {
        let text = self.render(ctx.access(), self.state).map_err(|source| ValuesError::Refresh {
            path: self.path.clone(),
            source,
        })?;
        self.rendered = Some(Rendered { state: self.state, text });
        Ok(())
    }

    fn render(&self, access: &dyn ResourceAccess, state: ValuesState) -> Result<String, ValuesSourceError> {
        if state == ValuesState::Uninitialized {
            return Err(ValuesSourceError::NotInitialized);
        }
        let object = access.get(&self.gvr, &self.path)?;
        let user = user_values(&object)?;
        let values = match state {
            ValuesState::Expanded => coalesce_values(&chart_values(&object)?, &user),
            _ => user,
        };
        Ok(serde_yaml::to_string(&values)?)
    }
}

impl LiveModel for ValuesModel {
    fn subject(&self) -> String {
        self.path.clone()
    }

    fn content(&self) -> &str {
        self.rendered.as_ref().map_or("", |rendered| rendered.text.as_str())
    }

    fn mode_label(&self) -> &str {
        self.rendered_state().unwrap_or_default().label()
    }
}

fn lookup<'a>(raw: &'a Value, field: &[&str]) -> Option<&'a Value> {
    field.iter().try_fold(raw, |value, key| value.get(key))
}

fn mapping_at(raw: &Value, field: &[&str]) -> Result<Option<Value>, ValuesSourceError> {
    match lookup(raw, field) {
        None | Some(Value::Null) => Ok(None),
        Some(value @ Value::Object(_)) => Ok(Some(value.clone())),
        Some(_) => Err(ValuesSourceError::NotAMapping { field: field.join(".") }),
    }
}

/// User-supplied values; a release installed without overrides has none.
fn user_values(object: &ResourceObject) -> Result<Value, ValuesSourceError> {
    for field in USER_VALUES_FIELDS {
        if let Some(values) = mapping_at(&object.raw, field)? {
            return Ok(values);
        }
    }
    Ok(Value::Object(Map::new()))
}

fn chart_values(object: &ResourceObject) -> Result<Value, ValuesSourceError> {
    Ok(mapping_at(&object.raw, CHART_VALUES_FIELD)?.unwrap_or_else(|| Value::Object(Map::new())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{computed_yaml, releases_gvr, seeded_store, user_yaml};
    use rview_util::MemoryStore;
    use serde_json::json;

    fn initialized(store: &Arc<MemoryStore>, path: &str) -> ValuesModel {
        let mut model = ValuesModel::new(releases_gvr(), path);
        model.init(store.as_ref()).unwrap();
        model
    }

    #[test]
    fn init_renders_user_values_collapsed() {
        let store = seeded_store();
        let model = initialized(&store, "ns/pod-a");
        assert_eq!(model.state(), ValuesState::Collapsed);
        assert_eq!(model.content(), user_yaml());
        assert_eq!(model.mode_label(), "user values");
    }

    #[test]
    fn init_failure_keeps_model_uninitialized() {
        let store = seeded_store();
        let mut model = ValuesModel::new(releases_gvr(), "ns/missing");
        let error = model.init(store.as_ref()).unwrap_err();
        assert!(matches!(
            error,
            ValuesError::Initialization {
                source: ValuesSourceError::Access(AccessError::NotFound { .. }),
                ..
            }
        ));
        assert_eq!(model.state(), ValuesState::Uninitialized);
        assert_eq!(model.content(), "");
    }

    #[test]
    fn init_rejects_values_that_are_not_a_mapping() {
        let store = seeded_store();
        store
            .insert(&releases_gvr(), json!({ "metadata": { "namespace": "ns", "name": "bad" }, "values": [1, 2] }))
            .unwrap();
        let mut model = ValuesModel::new(releases_gvr(), "ns/bad");
        let error = model.init(store.as_ref()).unwrap_err();
        assert_eq!(error.to_string(), "ns/bad: 'values' is not a mapping");
    }

    #[test]
    fn toggle_before_init_fails_and_keeps_state() {
        let mut model = ValuesModel::new(releases_gvr(), "ns/pod-a");
        assert!(matches!(model.toggle_values(), Err(ValuesError::Toggle { .. })));
        assert_eq!(model.state(), ValuesState::Uninitialized);
    }

    #[test]
    fn toggle_pairs_return_to_the_starting_state() {
        let store = seeded_store();
        let mut model = initialized(&store, "ns/pod-a");

        model.toggle_values().unwrap();
        model.toggle_values().unwrap();
        assert_eq!(model.state(), ValuesState::Collapsed);

        model.toggle_values().unwrap();
        assert_eq!(model.state(), ValuesState::Expanded);
        model.toggle_values().unwrap();
        model.toggle_values().unwrap();
        assert_eq!(model.state(), ValuesState::Expanded);
    }

    #[test]
    fn refresh_renders_the_current_state() {
        let store = seeded_store();
        let ctx = ValuesContext::new(store.clone());
        let mut model = initialized(&store, "ns/pod-a");

        model.toggle_values().unwrap();
        assert_eq!(model.content(), user_yaml());
        model.refresh(&ctx).unwrap();
        assert_eq!(model.state(), ValuesState::Expanded);
        assert_eq!(model.content(), computed_yaml());
        assert_eq!(model.mode_label(), "all values");
    }

    #[test]
    fn failed_refresh_keeps_previous_render() {
        let store = seeded_store();
        let ctx = ValuesContext::new(store.clone());
        let mut model = initialized(&store, "ns/pod-a");
        model.toggle_values().unwrap();
        model.refresh(&ctx).unwrap();

        store.remove(&releases_gvr(), "ns/pod-a");
        model.toggle_values().unwrap();
        assert!(matches!(model.refresh(&ctx), Err(ValuesError::Refresh { .. })));
        assert_eq!(model.state(), ValuesState::Collapsed);
        assert_eq!(model.rendered_state(), Some(ValuesState::Expanded));
        assert_eq!(model.content(), computed_yaml());
    }

    #[test]
    fn refresh_before_init_fails() {
        let store = seeded_store();
        let mut model = ValuesModel::new(releases_gvr(), "ns/pod-a");
        let error = model.refresh(&ValuesContext::new(store)).unwrap_err();
        assert!(matches!(
            error,
            ValuesError::Refresh {
                source: ValuesSourceError::NotInitialized,
                ..
            }
        ));
    }

    #[test]
    fn flux_release_values_and_missing_overrides() {
        let store = seeded_store();
        store
            .insert(
                &releases_gvr(),
                json!({ "metadata": { "namespace": "flux", "name": "podinfo" }, "spec": { "values": { "replicaCount": 2 } } }),
            )
            .unwrap();
        store
            .insert(&releases_gvr(), json!({ "metadata": { "namespace": "flux", "name": "bare" } }))
            .unwrap();

        assert_eq!(initialized(&store, "flux/podinfo").content(), "replicaCount: 2\n");
        let empty = serde_yaml::to_string(&json!({})).unwrap();
        assert_eq!(initialized(&store, "flux/bare").content(), empty);
    }
}
