//! Shared primitives: frame and object ids, errors, small numeric helpers and engine config.

pub mod config;
pub mod core;
pub mod error;
pub mod math;
