//! Per-tick frame evaluation.

pub mod evaluator;
