use super::*;
use std::cell::RefCell;

fn playback(duration: u64, looping: bool) -> Playback {
    Playback::new(
        duration,
        &PlaybackConfig {
            looping,
            ..PlaybackConfig::default()
        },
    )
}

#[test]
fn paused_playback_does_not_advance() {
    let mut p = playback(10, false);
    assert_eq!(p.tick(), None);
    assert_eq!(p.frame(), FrameIndex(0));
}

#[test]
fn plays_to_the_end_and_stops() {
    let mut p = playback(3, false);
    p.play();
    let frames: Vec<_> = std::iter::from_fn(|| p.tick()).collect();
    assert_eq!(frames, vec![FrameIndex(1), FrameIndex(2), FrameIndex(3)]);
    assert!(!p.is_playing());
    assert_eq!(p.frame(), FrameIndex(3));

    // Playing again from the end rewinds.
    p.play();
    assert_eq!(p.frame(), FrameIndex(0));
}

#[test]
fn looping_wraps_to_zero() {
    let mut p = playback(2, true);
    p.seek(FrameIndex(1));
    p.play();
    let frames: Vec<_> = (0..4).filter_map(|_| p.tick()).collect();
    assert_eq!(
        frames,
        vec![FrameIndex(2), FrameIndex(0), FrameIndex(1), FrameIndex(2)]
    );
    assert!(p.is_playing());
}

#[test]
fn seek_clamps_and_duration_change_pulls_back() {
    let mut p = playback(100, false);
    assert_eq!(p.seek(FrameIndex(500)), FrameIndex(100));
    p.set_duration(40);
    assert_eq!(p.frame(), FrameIndex(40));
}

#[test]
fn tick_interval_follows_rate() {
    let p = playback(10, false);
    assert_eq!(p.tick_interval(), Duration::from_secs(1) / 30);
}

#[test]
fn fixed_step_clock_runs_requested_steps() {
    let seen = RefCell::new(Vec::new());
    let mut p = playback(100, false);
    p.play();
    let mut clock = FixedStepClock::new();
    assert!(!clock.is_running());
    clock.start(Box::new(|| {
        if let Some(f) = p.tick() {
            seen.borrow_mut().push(f);
        }
        ControlFlow::Continue(())
    }));
    assert!(clock.is_running());
    assert_eq!(clock.advance(5), 5);
    assert_eq!(seen.borrow().len(), 5);

    clock.stop();
    assert_eq!(clock.advance(5), 0);
    assert_eq!(clock.ticks(), 5);
}

#[test]
fn callback_break_stops_clock() {
    let mut count = 0;
    let mut clock = FixedStepClock::new();
    clock.start(Box::new(|| {
        count += 1;
        if count == 3 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }));
    assert_eq!(clock.advance(10), 3);
    assert!(!clock.is_running());
    drop(clock);
    assert_eq!(count, 3);
}
