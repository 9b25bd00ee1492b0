//! Cloze Markup Editor WASM Module
//!
//! This is the main WASM module for the in-review cloze editor. It parses
//! cloze deletion markup, maps between markup and rendered-text
//! coordinates, and dispatches keyboard commands into structural edits.

pub mod api;
pub mod commands;
pub mod config;
pub mod models;
pub mod parse;
pub mod structure;
pub mod text;
pub mod undo;

// Re-export commonly used types
pub use models::core::*;
pub use models::editor_state::{Editor, EditorSession};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).expect("failed to initialize logger");

    log::info!("Cloze editor WASM module initialized");
}
