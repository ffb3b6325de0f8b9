use crate::animation::ease::Ease;
use crate::animation::keyframe::{Keyframe, KeyframeAnimation};
use crate::animation::pose::Pose;
use crate::animation::track::Track;
use crate::foundation::core::FrameIndex;

/// Timeline range covered by one stay-here segment: from the keyframe before a hold keyframe
/// up to the hold keyframe itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct HoldSpan {
    pub start: FrameIndex,
    pub end: FrameIndex,
}

/// Insert a stay-here keyframe `hold_frames` after `frame`.
///
/// The new keyframe copies the pose sampled at `frame`, is marked `hold`, and uses the `none`
/// easing so the segment leading into it stays flat. Any keyframe already stored at the target
/// frame is replaced.
pub fn add_hold<P: Pose>(track: &Track<P>, frame: FrameIndex, hold_frames: u64) -> Track<P> {
    let sampled = track.sample(frame);
    let hold = Keyframe {
        frame: frame.offset(hold_frames.max(1)),
        pose: sampled.pose,
        animation: Some(KeyframeAnimation::new(Ease::None)),
        hold: true,
    };
    track.with_keyframe(hold)
}

/// Remove the hold keyframe immediately following `frame`, if there is one.
pub fn remove_hold<P: Pose>(track: &Track<P>, frame: FrameIndex) -> Option<Track<P>> {
    let next = track.after(frame)?;
    if !next.hold {
        return None;
    }
    track.without_keyframe(next.frame)
}

/// Remove the hold following `frame` when present, otherwise add one.
pub fn toggle_hold<P: Pose>(track: &Track<P>, frame: FrameIndex, hold_frames: u64) -> Track<P> {
    match remove_hold(track, frame) {
        Some(t) => t,
        None => add_hold(track, frame, hold_frames),
    }
}

/// Stay-here segments of `track`, in frame order.
pub fn hold_spans<P: Pose>(track: &Track<P>) -> Vec<HoldSpan> {
    let mut out = Vec::new();
    let mut prev: Option<FrameIndex> = None;
    for k in track.keyframes() {
        if let Some(start) = prev
            && k.hold
        {
            out.push(HoldSpan {
                start,
                end: k.frame,
            });
        }
        prev = Some(k.frame);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/hold.rs"]
mod tests;
