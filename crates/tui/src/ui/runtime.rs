//! Runtime: event loop and input routing for the TUI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Drive a single event loop that handles input and the flash ticker.
//! - Route keys to the page stack and execute returned `Effect`s.
//! - Render via `main_component::draw` only after something changed.
//!
//! Input comes from a dedicated thread blocking on `crossterm::event::read()`
//! and forwarding events over a channel, so the async loop never blocks on
//! the terminal.
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, prelude::*};
use rview_types::{Gvr, Msg};
use rview_util::{ResourceAccess, ViewerConfig};
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{info, warn};

use crate::app::{App, AppHandle};
use crate::cmd;
use crate::ui::components::browser::ResourceBrowser;
use crate::ui::components::values::ValueExtender;
use crate::ui::main_component;

const TICK_INTERVAL: Duration = Duration::from_millis(250);

type CrosstermTerminal = Terminal<CrosstermBackend<std::io::Stdout>>;

/// Spawn a dedicated input thread that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event) => {
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!("Failed to read event: {}", error);
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<CrosstermTerminal> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut CrosstermTerminal) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut CrosstermTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| main_component::draw(frame, app))?;
    Ok(())
}

/// Handles one terminal event. Returns `true` when the loop should exit.
fn handle_input_event(app: &mut App, input_event: Event) -> bool {
    let effects = match input_event {
        Event::Key(key_event) => app.handle_key_events(key_event),
        Event::Resize(width, height) => app.update(&Msg::Resize(width, height)),
        Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    };
    cmd::run_from_effects(app, effects)
}

/// Builds the root page: the resource table with the values extension.
fn root_page(gvr: Gvr) -> ValueExtender<ResourceBrowser> {
    ValueExtender::new(ResourceBrowser::new(gvr))
}

/// Entry point for the TUI runtime: sets up the terminal, runs the event
/// loop and restores the terminal on exit.
pub async fn run_app(access: Arc<dyn ResourceAccess>, gvr: Gvr, config: ViewerConfig) -> Result<()> {
    let mut app = App::new(access, config);
    let root = root_page(gvr.clone());
    app.inject(Box::new(root), true)
        .with_context(|| format!("failed to open the {gvr} table"))?;
    info!(gvr = %gvr, "Viewer started");

    let mut input_receiver = spawn_input_thread();
    let mut terminal = setup_terminal()?;

    let mut ticker = time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let outcome = event_loop(&mut terminal, &mut app, &mut input_receiver, &mut ticker).await;
    cleanup_terminal(&mut terminal)?;
    info!("Viewer stopped");
    outcome
}

async fn event_loop(
    terminal: &mut CrosstermTerminal,
    app: &mut App,
    input_receiver: &mut mpsc::Receiver<Event>,
    ticker: &mut time::Interval,
) -> Result<()> {
    render(terminal, app)?;
    loop {
        let needs_render;
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input channel closed; shut down cleanly.
                    break;
                };
                if let Event::Key(key_event) = event
                    && key_event.code == KeyCode::Char('c')
                    && key_event.modifiers.contains(KeyModifiers::CONTROL)
                {
                    break;
                }
                if handle_input_event(app, event) {
                    break;
                }
                needs_render = true;
            }

            _ = ticker.tick() => {
                let had_flash = app.flash.current().is_some();
                let effects = app.update(&Msg::Tick);
                if cmd::run_from_effects(app, effects) {
                    break;
                }
                needs_render = had_flash && app.flash.current().is_none();
            }

            _ = signal::ctrl_c() => { break; }
        }

        if needs_render {
            render(terminal, app)?;
        }
    }
    Ok(())
}
