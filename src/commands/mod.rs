//! Keyboard command layer: chord parsing, the registry, the palette
//! overlay, the renumber machine, and the dispatcher that ties them to the
//! structural operations.

pub mod chord;
pub mod dispatch;
pub mod palette;
pub mod registry;
pub mod renumber;
