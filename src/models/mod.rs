//! Data model: cloze tokens, selections, edit outcomes, and the
//! process-wide editor state.

pub mod core;
pub mod editor_state;
