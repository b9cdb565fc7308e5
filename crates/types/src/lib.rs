//! Shared type definitions for the rview workspace.
//!
//! These types cross crate boundaries: the resource descriptor and resource
//! objects are produced by the data-access layer in `rview-util` and consumed
//! by the TUI, while `Msg` and `Effect` describe the message/side-effect
//! vocabulary of the TUI runtime.

use std::{error::Error, fmt, str::FromStr};

use serde_json::Value;

/// Identifies a resource type by group, version and resource name,
/// independent of any specific instance.
///
/// The core group is represented by an empty `group` and renders as
/// `version/resource` (for example `v1/pods`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Gvr {
    pub group: String,
    pub version: String,
    pub resource: String,
}

impl Gvr {
    pub fn new(group: impl Into<String>, version: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            resource: resource.into(),
        }
    }

    /// Returns true when the descriptor belongs to the core (group-less) API.
    pub fn is_core(&self) -> bool {
        self.group.is_empty()
    }
}

impl fmt::Display for Gvr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_core() {
            write!(f, "{}/{}", self.version, self.resource)
        } else {
            write!(f, "{}/{}/{}", self.group, self.version, self.resource)
        }
    }
}

impl FromStr for Gvr {
    type Err = ParseGvrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        if parts.iter().any(|part| part.trim().is_empty()) {
            return Err(ParseGvrError(s.to_string()));
        }
        match parts.as_slice() {
            [version, resource] => Ok(Self::new("", *version, *resource)),
            [group, version, resource] => Ok(Self::new(*group, *version, *resource)),
            _ => Err(ParseGvrError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseGvrError(pub String);

impl fmt::Display for ParseGvrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid resource descriptor '{}'; expected 'group/version/resource' or 'version/resource'", self.0)
    }
}

impl Error for ParseGvrError {}

/// Builds the selection path of a resource instance: `namespace/name` for
/// namespaced resources, `name` otherwise.
pub fn resource_path(namespace: Option<&str>, name: &str) -> String {
    match namespace.filter(|ns| !ns.is_empty()) {
        Some(ns) => format!("{ns}/{name}"),
        None => name.to_string(),
    }
}

/// Splits a selection path into its namespace (if any) and name.
pub fn split_path(path: &str) -> (Option<&str>, &str) {
    match path.split_once('/') {
        Some((namespace, name)) => (Some(namespace), name),
        None => (None, path),
    }
}

/// A single resource instance as returned by the data-access layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceObject {
    /// Selection path (`namespace/name` or `name`).
    pub path: String,
    /// The decoded document.
    pub raw: Value,
}

impl ResourceObject {
    /// Builds an object from a decoded document, deriving the path from
    /// `metadata.namespace` and `metadata.name`. Returns `None` when the
    /// document carries no name.
    pub fn from_document(raw: Value) -> Option<Self> {
        let metadata = raw.get("metadata")?;
        let name = metadata.get("name")?.as_str()?.trim();
        if name.is_empty() {
            return None;
        }
        let namespace = metadata.get("namespace").and_then(Value::as_str);
        Some(Self {
            path: resource_path(namespace, name),
            raw,
        })
    }

    pub fn namespace(&self) -> Option<&str> {
        split_path(&self.path).0
    }

    pub fn name(&self) -> &str {
        split_path(&self.path).1
    }

    /// Returns a string field from the document using a dotted path
    /// (e.g. `chart.metadata.version`).
    pub fn field(&self, dotted: &str) -> Option<&str> {
        dotted
            .split('.')
            .try_fold(&self.raw, |value, key| value.get(key))
            .and_then(Value::as_str)
    }
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlashLevel {
    #[default]
    Info,
    Error,
}

/// Messages that can be sent to update the application state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Periodic UI tick (flash expiry)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
}

/// Side effects requested by components and executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Request to copy the given text to the system clipboard
    CopyToClipboardRequested(String),
    /// Leave the application
    Quit,
}
