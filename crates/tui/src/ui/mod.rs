//! UI rendering module for the TUI application.
//!
//! This module provides the page components, the page stack, the flash
//! notification, key bindings, the main layout and the runtime loop.

pub mod components;
pub mod flash;
pub mod keys;
pub mod main_component;
pub mod page_stack;
pub mod runtime;
pub mod theme;
