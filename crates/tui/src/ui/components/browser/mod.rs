mod browser_component;
mod state;
mod viewer;

pub use browser_component::ResourceBrowser;
pub use state::{ResourceTable, TableLayout};
pub use viewer::{BindKeysFn, ResourceViewer};
