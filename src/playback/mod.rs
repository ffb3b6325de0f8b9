//! Playback scheduling decoupled from wall-clock time.

pub mod clock;
