//! Structural edits: atomic fragment rewrites over cloze tokens.

pub mod hints;
pub mod operations;
