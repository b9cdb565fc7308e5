//! Application state for the rview TUI.
//!
//! `App` owns the shared context (data access, theme, configuration), the
//! flash notification and the page stack. Pages never see `App` directly:
//! they receive it as an `AppHandle`, the narrow capability that key handlers
//! and models are allowed to use.

use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rview_types::{Effect, Msg};
use rview_util::{ResourceAccess, ViewerConfig};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::ui::components::Component;
use crate::ui::flash::Flash;
use crate::ui::page_stack::PageStack;
use crate::ui::theme::{self, Theme};

/// Error returned when a page cannot be pushed onto the page stack.
#[derive(Debug, Error)]
pub enum InjectError {
    /// The page failed its `init` hook.
    #[error("{page} failed to initialize: {reason}")]
    Init { page: String, reason: String },
    /// The stack already holds the configured maximum number of pages.
    #[error("cannot open {page}: page stack is full ({max} pages)")]
    StackFull { page: String, max: usize },
}

/// Capabilities the application exposes to pages and key handlers.
pub trait AppHandle {
    /// Data-access handle used to resolve resources.
    fn access(&self) -> Arc<dyn ResourceAccess>;

    /// Active viewer configuration.
    fn config(&self) -> &ViewerConfig;

    /// Shows an informational notification.
    fn report(&mut self, message: &str);

    /// Shows an error notification.
    fn report_error(&mut self, message: &str);

    /// Pushes a page onto the page stack after running its `init` hook.
    /// `exclusive` replaces every page currently on the stack.
    fn inject(&mut self, page: Box<dyn Component>, exclusive: bool) -> Result<(), InjectError>;
}

/// Cross-cutting shared context owned by the App.
#[derive(Debug)]
pub struct SharedCtx {
    /// Data-access handle shared by every page
    pub access: Arc<dyn ResourceAccess>,
    /// Active color theme
    pub theme: Box<dyn Theme>,
    /// Viewer configuration (file + CLI overrides)
    pub config: ViewerConfig,
}

impl SharedCtx {
    pub fn new(access: Arc<dyn ResourceAccess>, config: ViewerConfig) -> Self {
        let theme = theme::load(config.theme.as_deref());
        Self { access, theme, config }
    }
}

#[derive(Debug)]
pub struct App {
    /// Shared, cross-cutting context (data access, theme, config)
    pub ctx: SharedCtx,
    /// Transient user-facing notification
    pub flash: Flash,
    /// Pages, root first
    pub pages: PageStack,
}

impl App {
    pub fn new(access: Arc<dyn ResourceAccess>, config: ViewerConfig) -> Self {
        let flash = Flash::new(config.flash_timeout_secs);
        Self {
            ctx: SharedCtx::new(access, config),
            flash,
            pages: PageStack::default(),
        }
    }

    /// Routes a key to the top page.
    ///
    /// `Esc` first lets the page dismiss transient state (e.g. a filter) and
    /// otherwise pops it; `q` quits. Pages capturing text input receive every
    /// key. The top page is detached while it handles the key so that its
    /// handlers may inject new pages through `AppHandle`.
    pub fn handle_key_events(&mut self, key: KeyEvent) -> Vec<Effect> {
        let Some(top) = self.pages.top_mut() else {
            return Vec::new();
        };

        if !top.captures_input() {
            match key.code {
                KeyCode::Esc => {
                    if !top.dismiss() && self.pages.len() > 1 {
                        if let Some(page) = self.pages.pop() {
                            debug!(page = %page.title(), "Closing page");
                        }
                    }
                    return Vec::new();
                }
                KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE => return vec![Effect::Quit],
                _ => {}
            }
        }

        let Some(mut page) = self.pages.detach_top() else {
            return Vec::new();
        };
        let effects = page.handle_key_events(self, key);
        self.pages.restore(page);
        effects
    }

    /// Applies an application message, then forwards it to the top page.
    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                self.flash.expire(Instant::now());
            }
            Msg::Resize(width, height) => {
                debug!(width, height, "Terminal resized");
            }
        }

        let Some(mut page) = self.pages.detach_top() else {
            return Vec::new();
        };
        let effects = page.handle_message(self, msg);
        self.pages.restore(page);
        effects
    }
}

impl AppHandle for App {
    fn access(&self) -> Arc<dyn ResourceAccess> {
        Arc::clone(&self.ctx.access)
    }

    fn config(&self) -> &ViewerConfig {
        &self.ctx.config
    }

    fn report(&mut self, message: &str) {
        info!(message, "Flash");
        self.flash.info(message);
    }

    fn report_error(&mut self, message: &str) {
        error!(message, "Flash");
        self.flash.error(message);
    }

    fn inject(&mut self, mut page: Box<dyn Component>, exclusive: bool) -> Result<(), InjectError> {
        let title = page.title();
        let max = self.ctx.config.max_pages.max(1);
        if !exclusive && self.pages.len() >= max {
            return Err(InjectError::StackFull { page: title, max });
        }

        page.init(&*self).map_err(|error| InjectError::Init {
            page: title.clone(),
            reason: format!("{error:#}"),
        })?;

        if exclusive {
            self.pages.clear();
        }
        self.pages.push(page);
        debug!(page = %title, depth = self.pages.len(), exclusive, "Injected page");
        Ok(())
    }
}
