//! Per-object effects layered on top of plain interpolation.

pub mod hold;
pub mod transitions;
