//! TUI components for botlogs
//!
//! This crate provides the terminal user interface for the log console,
//! including key handling, UI state, terminal events and widgets.

pub mod app;
pub mod config;
pub mod tui;
pub mod ui;

pub use app::{Action, AppState, InputField, InputMode, UiState};
pub use config::{KeyBinding, KeyBindings, KeyContext};
pub use tui::{Event, EventHandler, Tui};
pub use ui::{Layout, Theme, draw};
