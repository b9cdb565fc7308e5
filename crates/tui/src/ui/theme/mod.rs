//! Theme styling for the TUI.
//!
//! Two palettes (Dracula, Nord) are exposed behind the `Theme` trait together
//! with helper builders for ratatui blocks, hint bars and notifications.
//! Prefer these helpers over hard-coding colors.

use std::env;

use tracing::debug;

pub mod dracula;
pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use dracula::DraculaTheme;
pub use nord::NordTheme;
pub use roles::Theme;

/// Environment variable overriding the configured theme.
pub const THEME_ENV: &str = "RVIEW_THEME";

/// Resolves a theme identifier (case-insensitive). Unknown identifiers yield `None`.
pub fn resolve(id: &str) -> Option<Box<dyn Theme>> {
    match id.trim().to_ascii_lowercase().as_str() {
        "dracula" => Some(Box::new(DraculaTheme::new())),
        "nord" => Some(Box::new(NordTheme::new())),
        _ => None,
    }
}

/// Selects a theme from `RVIEW_THEME`, then the configured preference, then
/// the default.
pub fn load(preferred_theme: Option<&str>) -> Box<dyn Theme> {
    if let Ok(theme_name) = env::var(THEME_ENV)
        && let Some(theme) = resolve(&theme_name)
    {
        return theme;
    }

    if let Some(name) = preferred_theme {
        match resolve(name) {
            Some(theme) => return theme,
            None => debug!(theme = name, "Unknown theme; falling back to default"),
        }
    }

    Box::new(DraculaTheme::new())
}
