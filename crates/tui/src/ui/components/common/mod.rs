//! Building blocks shared by page components.

pub mod scroll;

pub use scroll::{ScrollMetrics, paragraph_height, render_vertical_scrollbar};
