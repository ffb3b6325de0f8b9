//! Keyframe tracks and their interpolation.

/// Easing curves.
pub mod ease;
/// Track edit commands that preserve continuity.
pub mod edit;
pub mod keyframe;
/// Pose types and per-component interpolation.
pub mod pose;
pub mod track;
