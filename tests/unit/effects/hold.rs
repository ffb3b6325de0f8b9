use super::*;
use crate::animation::pose::ShapePose;

fn kf(frame: u64, x: f64) -> Keyframe<ShapePose> {
    Keyframe::new(FrameIndex(frame), ShapePose::at(x, 2.0))
}

fn base() -> Track<ShapePose> {
    Track::try_from_keyframes(vec![
        kf(10, 0.0),
        kf(100, 90.0).with_animation(KeyframeAnimation::new(Ease::Linear)),
    ])
    .unwrap()
}

#[test]
fn hold_freezes_the_sampled_pose() {
    let t = base();
    let at = t.sample(FrameIndex(10)).pose;
    let held = add_hold(&t, FrameIndex(10), 30);
    let k = held.get(FrameIndex(40)).unwrap();
    assert!(k.hold);
    assert_eq!(k.animation, Some(KeyframeAnimation::new(Ease::None)));
    for f in 11..40 {
        assert_eq!(held.sample(FrameIndex(f)).pose, at, "frame {f}");
    }
}

#[test]
fn hold_from_interpolated_frame_copies_sample() {
    let t = base();
    let held = add_hold(&t, FrameIndex(55), 30);
    let k = held.get(FrameIndex(85)).unwrap();
    assert!((k.pose.x - 45.0).abs() < 1e-9);
}

#[test]
fn hold_replaces_keyframe_at_target() {
    let t = Track::try_from_keyframes(vec![kf(0, 0.0), kf(30, 99.0)]).unwrap();
    let held = add_hold(&t, FrameIndex(0), 30);
    assert_eq!(held.len(), 2);
    let k = held.get(FrameIndex(30)).unwrap();
    assert!(k.hold);
    assert_eq!(k.pose.x, 0.0);
}

#[test]
fn remove_deletes_only_following_hold() {
    let held = add_hold(&base(), FrameIndex(10), 30);
    let back = remove_hold(&held, FrameIndex(10)).unwrap();
    assert_eq!(back, base());
    // Next keyframe is not a hold keyframe: nothing to remove.
    assert!(remove_hold(&base(), FrameIndex(10)).is_none());
    assert!(remove_hold(&base(), FrameIndex(100)).is_none());
}

#[test]
fn toggle_round_trips() {
    let t = base();
    let on = toggle_hold(&t, FrameIndex(10), 30);
    assert_eq!(on.len(), 3);
    let off = toggle_hold(&on, FrameIndex(10), 30);
    assert_eq!(off, t);
}

#[test]
fn spans_cover_stay_here_segments() {
    let held = add_hold(&base(), FrameIndex(10), 30);
    assert_eq!(
        hold_spans(&held),
        vec![HoldSpan {
            start: FrameIndex(10),
            end: FrameIndex(40)
        }]
    );
    assert!(hold_spans(&base()).is_empty());
}
