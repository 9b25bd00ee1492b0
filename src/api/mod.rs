//! Cloze Editor WASM API
//!
//! This module provides the JavaScript-facing API for the cloze markup
//! editor. The glue code feeds key events and field state in; structured
//! outcomes describing document writes, clipboard pushes, and overlay
//! state come back out.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, error handling,
//!   logging, and the editor state mutex
//! - `core`: The exported API functions

pub mod core;
pub mod helpers;

// Re-export all public functions to keep the JS-facing surface flat.
pub use core::*;
