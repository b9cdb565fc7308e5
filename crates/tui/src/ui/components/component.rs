//! Component system for the rview TUI.
//!
//! Every page on the page stack is a `Component`: a self-contained UI element
//! that owns its local state, reacts to keys and application messages, and
//! renders itself into the area it is given. Components never mutate global
//! state directly; they go through the `AppHandle` they are handed and report
//! runtime side effects back as `Effect`s.

use std::any::Any;

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use rview_types::{Effect, Msg};

use crate::app::AppHandle;
use crate::ui::theme::Theme;

/// A page that can live on the page stack.
///
/// # Component Lifecycle
///
/// 1. **Initialization**: `init()` runs once, when the page is injected
/// 2. **Event Handling**: keys arrive through `handle_key_events()`
/// 3. **Messages**: `handle_message()` receives application-wide messages
/// 4. **Rendering**: `render()` draws the page into the provided area
pub trait Component: Any {
    /// Title shown in the page header and crumbs.
    fn title(&self) -> String;

    /// Initialize any internal state before the page becomes visible.
    ///
    /// An error aborts the injection and the page is discarded.
    fn init(&mut self, _app: &dyn AppHandle) -> Result<()> {
        Ok(())
    }

    /// Handle an application-level message the component cares about.
    fn handle_message(&mut self, _app: &mut dyn AppHandle, _msg: &Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle a key while this page is on top of the stack.
    fn handle_key_events(&mut self, _app: &mut dyn AppHandle, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Returns true while the page edits text and wants every key,
    /// including the global `Esc` and `q`.
    fn captures_input(&self) -> bool {
        false
    }

    /// Clears transient state (an applied filter, a selection mode) on `Esc`.
    /// Returns false when there was nothing to dismiss and the page may close.
    fn dismiss(&mut self) -> bool {
        false
    }

    /// Key hints shown in the footer, as `(key, description)` pairs.
    fn hints(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Render the component into the given area.
    ///
    /// Implementations should be side-effect free except for frame drawing
    /// and bookkeeping of viewport dimensions.
    fn render(&mut self, frame: &mut Frame, rect: Rect, theme: &dyn Theme);
}
