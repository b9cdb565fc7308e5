//! Key bindings and per-page action registries.
//!
//! A `KeyActions<T>` maps key bindings to labelled handlers operating on a
//! page of type `T`. Pages consult their registry when a key arrives, and the
//! footer renders the visible entries as hints. Registries are open: a
//! decorator can add bindings to the page it wraps, and a later binding for
//! the same key replaces the earlier one.

use std::fmt;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use indexmap::IndexMap;
use rview_types::Effect;

use crate::app::AppHandle;

/// A normalized key chord.
///
/// Character keys ignore `SHIFT` since the character already carries the
/// case, so `KeyBinding::char('G')` matches a shifted `g` press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        let modifiers = match code {
            KeyCode::Char(_) => modifiers.difference(KeyModifiers::SHIFT),
            _ => modifiers,
        };
        Self { code, modifiers }
    }

    pub fn char(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), KeyModifiers::NONE)
    }

    pub fn ctrl(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }
}

impl From<KeyEvent> for KeyBinding {
    fn from(event: KeyEvent) -> Self {
        Self::new(event.code, event.modifiers)
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("Ctrl-")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("Alt-")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("Space"),
            KeyCode::Char(ch) if self.modifiers.contains(KeyModifiers::CONTROL) => write!(f, "{}", ch.to_ascii_uppercase()),
            KeyCode::Char(ch) => write!(f, "{ch}"),
            KeyCode::Enter => f.write_str("Enter"),
            KeyCode::Esc => f.write_str("Esc"),
            KeyCode::Tab => f.write_str("Tab"),
            KeyCode::Up => f.write_str("↑"),
            KeyCode::Down => f.write_str("↓"),
            KeyCode::PageUp => f.write_str("PgUp"),
            KeyCode::PageDown => f.write_str("PgDn"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Handler invoked when a bound key is pressed on a page of type `T`.
pub type ActionHandler<T> = Rc<dyn Fn(&mut T, &mut dyn AppHandle) -> Vec<Effect>>;

/// A labelled key handler.
pub struct KeyAction<T: ?Sized> {
    pub label: String,
    pub handler: ActionHandler<T>,
    /// Whether the binding is listed in the footer hints.
    pub visible: bool,
}

impl<T: ?Sized> KeyAction<T> {
    pub fn new(label: impl Into<String>, handler: impl Fn(&mut T, &mut dyn AppHandle) -> Vec<Effect> + 'static, visible: bool) -> Self {
        Self {
            label: label.into(),
            handler: Rc::new(handler),
            visible,
        }
    }
}

impl<T: ?Sized> Clone for KeyAction<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            handler: Rc::clone(&self.handler),
            visible: self.visible,
        }
    }
}

impl<T: ?Sized> fmt::Debug for KeyAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyAction")
            .field("label", &self.label)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

/// Ordered registry of key actions for a page of type `T`.
pub struct KeyActions<T: ?Sized> {
    actions: IndexMap<KeyBinding, KeyAction<T>>,
}

impl<T: ?Sized> Default for KeyActions<T> {
    fn default() -> Self {
        Self { actions: IndexMap::new() }
    }
}

impl<T: ?Sized> fmt::Debug for KeyActions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.actions.iter().map(|(key, action)| (key.to_string(), &action.label))).finish()
    }
}

impl<T: ?Sized> KeyActions<T> {
    /// Binds `key`, returning the action it replaced.
    pub fn add(&mut self, key: KeyBinding, action: KeyAction<T>) -> Option<KeyAction<T>> {
        self.actions.insert(key, action)
    }

    pub fn get(&self, key: &KeyBinding) -> Option<&KeyAction<T>> {
        self.actions.get(key)
    }

    /// Returns a shareable handle to the handler bound to `key`, so the
    /// registry's owner can be borrowed mutably while it runs.
    pub fn handler(&self, key: &KeyBinding) -> Option<ActionHandler<T>> {
        self.get(key).map(|action| Rc::clone(&action.handler))
    }

    /// Visible bindings in registration order, as `(key, label)` pairs.
    pub fn hints(&self) -> Vec<(String, String)> {
        self.actions
            .iter()
            .filter(|(_, action)| action.visible)
            .map(|(key, action)| (key.to_string(), action.label.clone()))
            .collect()
    }
}
