//! Coordinate mapping between markup bytes and rendered text.

pub mod offset;
