//! Utilities shared by the rview binary and TUI: resource data access,
//! values coalescing, configuration loading and path helpers.

pub mod config;
pub mod path_processing;
pub mod resource_store;
pub mod values;

pub use config::{ConfigError, ViewerConfig};
pub use path_processing::expand_tilde;
pub use resource_store::{AccessError, ManifestStore, MemoryStore, ResourceAccess};
pub use values::coalesce_values;
