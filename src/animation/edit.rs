//! Track mutators. Every function returns a new track; the input is never modified.

use crate::animation::keyframe::{Keyframe, KeyframeAnimation, KeyframePatch};
use crate::animation::pose::Pose;
use crate::animation::track::Track;
use crate::foundation::core::FrameIndex;

/// Write an explicit keyframe at `frame`.
///
/// An existing keyframe at `frame` has `patch` merged into it. Otherwise a keyframe is created
/// from the pose sampled at `frame` with `patch` applied on top; it receives
/// `default_animation` unless the patch carries its own. Other keyframes are never touched.
pub fn add_or_update_keyframe<P: Pose>(
    track: &Track<P>,
    frame: FrameIndex,
    patch: &KeyframePatch<P::Patch>,
    default_animation: KeyframeAnimation,
) -> Track<P> {
    if let Some(existing) = track.get(frame) {
        return track.with_keyframe(existing.patched(patch));
    }
    let sampled = track.sample(frame);
    let created = Keyframe {
        frame,
        pose: sampled.pose.patched(&patch.pose),
        animation: Some(patch.animation.unwrap_or(default_animation)),
        hold: patch.hold.unwrap_or(false),
    };
    track.with_keyframe(created)
}

/// Drag-style edit at `frame` without an explicit "add keyframe".
///
/// The keyframe opening the segment that contains `frame` takes the patch, and a pin keyframe
/// at `frame` records the sampled pose with the patch applied, so the curve passes through the
/// edited value at `frame` while the closing keyframe keeps its stored pose. The pin inherits
/// the closing keyframe's easing curve (without its duration) and the opening keyframe's hold
/// flag.
///
/// A duration override on the closing keyframe was counted from the opening keyframe; it is
/// shortened to the part still left at `frame`, or cleared when that part is already spent, so
/// the pin to closing segment still lands on the closing pose by its frame.
///
/// Editing exactly on a keyframe merges into it. Frames outside the track's span fall back to
/// [`add_or_update_keyframe`].
pub fn edit_in_place<P: Pose>(
    track: &Track<P>,
    frame: FrameIndex,
    patch: &KeyframePatch<P::Patch>,
    default_animation: KeyframeAnimation,
) -> Track<P> {
    if let Some(existing) = track.get(frame) {
        return track.with_keyframe(existing.patched(patch));
    }
    let (Some(prev), Some(next)) = (track.before(frame), track.after(frame)) else {
        return add_or_update_keyframe(track, frame, patch, default_animation);
    };

    let sampled = track.sample(frame);
    let opening = prev.patched(patch);
    let pin = Keyframe {
        frame,
        pose: sampled.pose.patched(&patch.pose),
        animation: next.animation.map(|a| KeyframeAnimation {
            duration: None,
            ..a
        }),
        hold: opening.hold,
    };
    let edited = track.with_keyframe(opening).with_keyframe(pin);

    if let Some(anim) = next.animation
        && let Some(d) = anim.effective_duration()
    {
        let left = d
            .saturating_sub(frame.since(prev.frame))
            .min(next.frame.since(frame));
        let closing = Keyframe {
            animation: Some(KeyframeAnimation {
                duration: (left > 0).then_some(left),
                ..anim
            }),
            ..next.clone()
        };
        return edited.with_keyframe(closing);
    }
    edited
}

#[cfg(test)]
#[path = "../../tests/unit/animation/edit.rs"]
mod tests;
