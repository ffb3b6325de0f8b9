//! Scene model, JSON boundary and edit commands.

pub mod commands;
pub mod model;
