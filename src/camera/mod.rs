//! Camera and focal-point parallax projection.

pub mod parallax;
