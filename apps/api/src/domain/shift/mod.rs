// Shift domain module
// Contains the shift aggregate root and its time window value object

#![allow(clippy::module_inception)]

pub mod shift;
pub mod value_objects;

// Re-export main types for convenience
pub use shift::{NewShift, Shift, ShiftPatch};
pub use value_objects::ShiftWindow;
