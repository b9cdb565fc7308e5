//! UI components: resource browser, live view, values overlay.

pub mod browser;
pub mod common;
pub mod component;
pub mod live;
pub mod values;

pub use component::*;
