//! Fragment parsing: cloze token recognition.

pub mod cloze;
