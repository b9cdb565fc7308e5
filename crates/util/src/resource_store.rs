//! Resource data access for the viewer.
//!
//! `ResourceAccess` is the data-access handle handed to views and models. Two
//! backends are provided: a `ManifestStore` reading YAML/JSON manifests from a
//! directory tree on every call, and a `MemoryStore` holding documents in
//! memory (demo mode and tests).
//!
//! Manifest layout:
//!
//! ```text
//! <root>/<group|core>/<version>/<resource>/<namespace>/<name>.yaml
//! <root>/<group|core>/<version>/<resource>/<name>.yaml      (cluster scoped)
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rview_types::{Gvr, ResourceObject, resource_path, split_path};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Directory used for resources of the core (group-less) API.
pub const CORE_GROUP_DIR: &str = "core";

/// File extensions recognised as manifests, in lookup order.
pub const MANIFEST_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Errors surfaced while locating or decoding resources.
#[derive(Debug, Error)]
pub enum AccessError {
    /// No instance exists at the requested path.
    #[error("{gvr} '{path}' not found")]
    NotFound { gvr: String, path: String },
    /// I/O failure while reading the backing store.
    #[error("resource I/O error: {0}")]
    Io(#[from] io::Error),
    /// The manifest exists but is not a valid YAML/JSON document.
    #[error("failed to decode {path}: {source}")]
    Decode { path: PathBuf, source: serde_yaml::Error },
    /// The manifest decoded to something other than a mapping.
    #[error("{0} does not contain a resource document")]
    NotADocument(String),
}

impl AccessError {
    fn not_found(gvr: &Gvr, path: &str) -> Self {
        Self::NotFound {
            gvr: gvr.to_string(),
            path: path.to_string(),
        }
    }
}

/// Data-access handle used to list and fetch resource instances.
pub trait ResourceAccess: Send + Sync + Debug {
    /// Lists all instances of a resource type, ordered by path.
    fn list(&self, gvr: &Gvr) -> Result<Vec<ResourceObject>, AccessError>;

    /// Fetches a single instance by selection path.
    fn get(&self, gvr: &Gvr, path: &str) -> Result<ResourceObject, AccessError>;
}

/// Directory-backed store. Every call reads from disk so edits and
/// deletions are visible on the next lookup.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    root: PathBuf,
}

impl ManifestStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resource_dir(&self, gvr: &Gvr) -> PathBuf {
        let group = if gvr.is_core() { CORE_GROUP_DIR } else { gvr.group.as_str() };
        self.root.join(group).join(&gvr.version).join(&gvr.resource)
    }

    fn locate(&self, gvr: &Gvr, path: &str) -> Option<PathBuf> {
        let (namespace, name) = split_path(path);
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return None;
        }
        let mut dir = self.resource_dir(gvr);
        if let Some(namespace) = namespace {
            if namespace.is_empty() || namespace.starts_with('.') {
                return None;
            }
            dir = dir.join(namespace);
        }
        MANIFEST_EXTENSIONS
            .iter()
            .map(|extension| dir.join(format!("{name}.{extension}")))
            .find(|candidate| candidate.is_file())
    }

    fn read_dir_manifests(&self, dir: &Path, namespace: Option<&str>, out: &mut Vec<ResourceObject>) -> Result<(), AccessError> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_path = entry.path();
            if file_path.is_dir() {
                if namespace.is_none()
                    && let Some(ns) = file_path.file_name().and_then(|n| n.to_str())
                {
                    self.read_dir_manifests(&file_path, Some(ns), out)?;
                }
                continue;
            }
            let Some(name) = manifest_name(&file_path) else {
                continue;
            };
            match read_manifest(&file_path) {
                Ok(raw) => out.push(ResourceObject {
                    path: resource_path(namespace, name),
                    raw,
                }),
                Err(error) => {
                    warn!(path = %file_path.display(), error = %error, "Skipping unreadable manifest");
                }
            }
        }
        Ok(())
    }
}

impl ResourceAccess for ManifestStore {
    fn list(&self, gvr: &Gvr) -> Result<Vec<ResourceObject>, AccessError> {
        let dir = self.resource_dir(gvr);
        let mut objects = Vec::new();
        match fs::metadata(&dir) {
            Ok(meta) if meta.is_dir() => self.read_dir_manifests(&dir, None, &mut objects)?,
            Ok(_) => {}
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "No manifests for resource type");
            }
            Err(error) => return Err(AccessError::Io(error)),
        }
        objects.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(objects)
    }

    fn get(&self, gvr: &Gvr, path: &str) -> Result<ResourceObject, AccessError> {
        let file_path = self.locate(gvr, path).ok_or_else(|| AccessError::not_found(gvr, path))?;
        let raw = read_manifest(&file_path)?;
        Ok(ResourceObject {
            path: path.to_string(),
            raw,
        })
    }
}

fn manifest_name(path: &Path) -> Option<&str> {
    let extension = path.extension()?.to_str()?;
    if !MANIFEST_EXTENSIONS.contains(&extension) {
        return None;
    }
    path.file_stem()?.to_str().filter(|stem| !stem.starts_with('.'))
}

fn read_manifest(path: &Path) -> Result<Value, AccessError> {
    let content = fs::read_to_string(path)?;
    let raw: Value = serde_yaml::from_str(&content).map_err(|source| AccessError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    if !raw.is_object() {
        return Err(AccessError::NotADocument(path.display().to_string()));
    }
    Ok(raw)
}

/// In-memory store keyed by resource type and selection path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    resources: Mutex<HashMap<Gvr, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) a document, deriving its path from
    /// `metadata.namespace`/`metadata.name`. Returns the stored path.
    pub fn insert(&self, gvr: &Gvr, document: Value) -> Result<String, AccessError> {
        let object =
            ResourceObject::from_document(document).ok_or_else(|| AccessError::NotADocument(format!("{gvr} document without metadata.name")))?;
        let mut resources = self.resources.lock().expect("memory store lock poisoned");
        resources.entry(gvr.clone()).or_default().insert(object.path.clone(), object.raw);
        Ok(object.path)
    }

    /// Removes a document, returning it when it was present.
    pub fn remove(&self, gvr: &Gvr, path: &str) -> Option<Value> {
        let mut resources = self.resources.lock().expect("memory store lock poisoned");
        resources.get_mut(gvr).and_then(|objects| objects.remove(path))
    }
}

impl ResourceAccess for MemoryStore {
    fn list(&self, gvr: &Gvr) -> Result<Vec<ResourceObject>, AccessError> {
        let resources = self.resources.lock().expect("memory store lock poisoned");
        Ok(resources
            .get(gvr)
            .map(|objects| {
                objects
                    .iter()
                    .map(|(path, raw)| ResourceObject {
                        path: path.clone(),
                        raw: raw.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get(&self, gvr: &Gvr, path: &str) -> Result<ResourceObject, AccessError> {
        let resources = self.resources.lock().expect("memory store lock poisoned");
        resources
            .get(gvr)
            .and_then(|objects| objects.get(path))
            .map(|raw| ResourceObject {
                path: path.to_string(),
                raw: raw.clone(),
            })
            .ok_or_else(|| AccessError::not_found(gvr, path))
    }
}
