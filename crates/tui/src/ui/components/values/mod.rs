//! Values overlay: a model rendering release values and the viewer
//! extension that opens it.

mod extender;
mod model;

pub use extender::ValueExtender;
pub use model::{ValuesContext, ValuesModel, ValuesState};
