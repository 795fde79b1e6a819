//! Sigboard Application
//!
//! The window shell around the whiteboard: GPU surface, egui controls,
//! pointer and keyboard translation, and file downloads.

mod app;
mod event_handler;
mod shortcuts;
mod ui;

pub use app::{App, AppConfig};
pub use event_handler::EventHandler;
pub use shortcuts::{Shortcut, ShortcutRegistry, match_shortcut};
pub use ui::{BoardLayout, UiAction, UiState, render_ui};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
