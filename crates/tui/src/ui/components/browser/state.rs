use std::fmt;
use std::rc::Rc;

use ratatui::widgets::TableState;
use rview_types::{Effect, Gvr, ResourceObject};
use rview_util::{AccessError, ResourceAccess};
use serde_json::Value;

use super::ResourceViewer;
use crate::app::AppHandle;

/// Action run when a row is activated with `Enter`; receives the viewer, the
/// application and the selected path.
pub type EnterFn = Rc<dyn Fn(&mut dyn ResourceViewer, &mut dyn AppHandle, &str) -> Vec<Effect>>;

const RELEASE_COLUMNS: [&str; 5] = ["NAMESPACE", "NAME", "REVISION", "STATUS", "CHART"];
const GENERIC_COLUMNS: [&str; 2] = ["NAMESPACE", "NAME"];

/// Resource types listed with release columns.
const RELEASE_RESOURCES: [&str; 2] = ["releases", "helmreleases"];

const MISSING: &str = "-";

/// Column set of the resource table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableLayout {
    /// Namespace and name only.
    #[default]
    Generic,
    /// Helm release records and Flux `HelmRelease` objects.
    Release,
}

impl TableLayout {
    pub fn for_gvr(gvr: &Gvr) -> Self {
        if RELEASE_RESOURCES.iter().any(|resource| gvr.resource.eq_ignore_ascii_case(resource)) {
            Self::Release
        } else {
            Self::Generic
        }
    }

    pub fn headers(self) -> &'static [&'static str] {
        match self {
            Self::Release => &RELEASE_COLUMNS,
            Self::Generic => &GENERIC_COLUMNS,
        }
    }
}

/// One table row, derived from a resource object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRow {
    pub path: String,
    pub cells: Vec<String>,
}

impl ResourceRow {
    pub fn from_object(object: &ResourceObject, layout: TableLayout) -> Self {
        let mut cells = vec![object.namespace().unwrap_or(MISSING).to_string(), object.name().to_string()];
        if layout == TableLayout::Release {
            cells.extend(release_cells(object));
        }
        Self {
            path: object.path.clone(),
            cells,
        }
    }
}

/// REVISION, STATUS and CHART of a release.
fn release_cells(object: &ResourceObject) -> [String; 3] {
    let chart = match (object.field("chart.metadata.name"), object.field("chart.metadata.version")) {
        (Some(name), Some(version)) => format!("{name}-{version}"),
        (Some(name), None) => name.to_string(),
        _ => object.field("spec.chart.spec.chart").unwrap_or(MISSING).to_string(),
    };
    let revision = match object.raw.get("version") {
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::String(text)) => text.clone(),
        _ => MISSING.to_string(),
    };
    let status = object.field("info.status").unwrap_or(MISSING).to_string();
    [revision, status, chart]
}

/// Rows and selection of the resource table.
#[derive(Default)]
pub struct ResourceTable {
    rows: Vec<ResourceRow>,
    layout: TableLayout,
    table_state: TableState,
    enter_fn: Option<EnterFn>,
}

impl fmt::Debug for ResourceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceTable")
            .field("rows", &self.rows.len())
            .field("layout", &self.layout)
            .field("selected", &self.table_state.selected())
            .field("enter_fn", &self.enter_fn.is_some())
            .finish()
    }
}

impl ResourceTable {
    // ========================
    // Selectors
    // ========================
    pub fn rows(&self) -> &[ResourceRow] {
        &self.rows
    }

    pub fn layout(&self) -> TableLayout {
        self.layout
    }

    /// Path of the selected row, if any.
    pub fn selected_item(&self) -> Option<&str> {
        self.table_state
            .selected()
            .and_then(|index| self.rows.get(index))
            .map(|row| row.path.as_str())
    }

    pub fn table_state_mut(&mut self) -> &mut TableState {
        &mut self.table_state
    }

    pub fn enter_fn(&self) -> Option<EnterFn> {
        self.enter_fn.clone()
    }

    // ========================
    // Reducers
    // ========================
    pub fn set_enter_fn(&mut self, enter_fn: EnterFn) {
        self.enter_fn = Some(enter_fn);
    }

    /// Replaces the rows from the store, keeping the selected path when it
    /// still exists.
    pub fn load(&mut self, access: &dyn ResourceAccess, gvr: &Gvr) -> Result<usize, AccessError> {
        let objects = access.list(gvr)?;
        self.layout = TableLayout::for_gvr(gvr);
        let rows: Vec<ResourceRow> = objects.iter().map(|object| ResourceRow::from_object(object, self.layout)).collect();
        self.set_rows(rows);
        Ok(self.rows.len())
    }

    pub fn set_rows(&mut self, rows: Vec<ResourceRow>) {
        let previous = self.selected_item().map(str::to_string);
        self.rows = rows;
        let index = previous
            .and_then(|path| self.rows.iter().position(|row| row.path == path))
            .or(if self.rows.is_empty() { None } else { Some(0) });
        self.table_state.select(index);
    }

    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let next = self.table_state.selected().map_or(0, |index| (index + 1).min(self.rows.len() - 1));
        self.table_state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let previous = self.table_state.selected().map_or(0, |index| index.saturating_sub(1));
        self.table_state.select(Some(previous));
    }

    pub fn select_first(&mut self) {
        if !self.rows.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if let Some(last) = self.rows.len().checked_sub(1) {
            self.table_state.select(Some(last));
        }
    }
}
