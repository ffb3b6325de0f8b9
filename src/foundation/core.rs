use crate::foundation::error::{KeystageError, KeystageResult};

pub use kurbo::{Affine, Point, Vec2};

/// Integer timeline position.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Frame distance from `earlier` to `self`, zero when `earlier` is later.
    pub fn since(self, earlier: FrameIndex) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    pub fn offset(self, frames: u64) -> FrameIndex {
        FrameIndex(self.0.saturating_add(frames))
    }
}

/// Stable identifier of a scene object.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "shape-{}", self.0)
    }
}

/// Inclusive frame range `[start, end]` during which an object may render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameWindow {
    pub start: FrameIndex,
    pub end: FrameIndex, // inclusive
}

impl FrameWindow {
    pub fn new(start: FrameIndex, end: FrameIndex) -> KeystageResult<Self> {
        if start > end {
            return Err(KeystageError::validation(
                "visible window start must be <= end",
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(self, f: FrameIndex) -> bool {
        self.start <= f && f <= self.end
    }

    pub fn len_frames(self) -> u64 {
        self.end.since(self.start) + 1
    }

    /// Widen `end` so the window spans at least `min_frames` frames past `start`.
    pub fn with_min_span(self, min_frames: u64) -> Self {
        let min_end = self.start.offset(min_frames);
        Self {
            start: self.start,
            end: self.end.max(min_end),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
