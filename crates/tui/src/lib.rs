//! # rview TUI
//!
//! Terminal user interface for browsing resources of one type and inspecting
//! their values. The root page is a resource table decorated with a values
//! action (`v` or `Enter`); it opens a live view showing the user-supplied
//! values of the selected resource, and `v` inside that view toggles between
//! the supplied and the fully computed values.
//!
//! ## Architecture
//!
//! Pages implement the `Component` trait and live on a page stack owned by
//! `App`. Key handlers receive the application through the `AppHandle`
//! capability (data access, notifications, page injection) and report
//! runtime side effects (clipboard, quit) as `Effect`s.

mod app;
mod cmd;
mod ui;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::Result;
use rview_types::Gvr;
use rview_util::{ResourceAccess, ViewerConfig};

/// Runs the TUI until the user quits.
///
/// # Errors
///
/// Terminal setup/teardown failures, or a root page that cannot be opened.
pub async fn run(access: Arc<dyn ResourceAccess>, gvr: Gvr, config: ViewerConfig) -> Result<()> {
    ui::runtime::run_app(access, gvr, config).await
}
