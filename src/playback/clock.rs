use crate::foundation::config::PlaybackConfig;
use crate::foundation::core::FrameIndex;
use std::ops::ControlFlow;
use std::time::Duration;

/// Tick callback handed to a [`FrameClock`]. Returning `Break` stops the clock.
pub type TickFn<'a> = Box<dyn FnMut() -> ControlFlow<()> + 'a>;

/// Scheduler that drives playback by invoking a tick callback.
///
/// The engine has no timers of its own; a host wires this to its display loop, tests use
/// [`FixedStepClock`].
pub trait FrameClock<'a> {
    fn start(&mut self, on_tick: TickFn<'a>);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// Deterministic clock: ticks happen only when the caller calls [`FixedStepClock::advance`].
#[derive(Default)]
pub struct FixedStepClock<'a> {
    on_tick: Option<TickFn<'a>>,
    ticks: u64,
}

impl std::fmt::Debug for FixedStepClock<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedStepClock")
            .field("running", &self.is_running())
            .field("ticks", &self.ticks)
            .finish()
    }
}

impl<'a> FixedStepClock<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire up to `steps` ticks. Returns how many actually ran; fewer when the callback breaks.
    pub fn advance(&mut self, steps: u64) -> u64 {
        let mut ran = 0;
        while ran < steps {
            let Some(on_tick) = self.on_tick.as_mut() else {
                break;
            };
            ran += 1;
            self.ticks += 1;
            if on_tick().is_break() {
                self.stop();
            }
        }
        ran
    }

    /// Ticks fired since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl<'a> FrameClock<'a> for FixedStepClock<'a> {
    fn start(&mut self, on_tick: TickFn<'a>) {
        self.on_tick = Some(on_tick);
    }

    fn stop(&mut self) {
        self.on_tick = None;
    }

    fn is_running(&self) -> bool {
        self.on_tick.is_some()
    }
}

/// Play head over `[0, duration_frames]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Playback {
    duration_frames: u64,
    frame: FrameIndex,
    playing: bool,
    looping: bool,
    ticks_per_second: u32,
}

impl Playback {
    pub fn new(duration_frames: u64, config: &PlaybackConfig) -> Self {
        Self {
            duration_frames,
            frame: FrameIndex(0),
            playing: false,
            looping: config.looping,
            ticks_per_second: config.ticks_per_second.max(1),
        }
    }

    pub fn frame(&self) -> FrameIndex {
        self.frame
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Wall-clock time between ticks for a host scheduler.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second
    }

    /// Start playing. A play head parked on the last frame rewinds first.
    pub fn play(&mut self) {
        if self.frame.0 >= self.duration_frames {
            self.frame = FrameIndex(0);
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Move the play head, clamped to the duration. Does not change the playing state.
    pub fn seek(&mut self, frame: FrameIndex) -> FrameIndex {
        self.frame = frame.min(FrameIndex(self.duration_frames));
        self.frame
    }

    /// Adopt a new scene duration, pulling the play head back inside it.
    pub fn set_duration(&mut self, duration_frames: u64) {
        self.duration_frames = duration_frames;
        self.seek(self.frame);
    }

    /// Advance one frame and return the frame to render.
    ///
    /// Returns `None` while paused. Past the last frame playback wraps to 0 when looping and
    /// otherwise pauses on the last frame.
    pub fn tick(&mut self) -> Option<FrameIndex> {
        if !self.playing {
            return None;
        }
        if self.frame.0 >= self.duration_frames {
            if !self.looping {
                self.playing = false;
                return None;
            }
            self.frame = FrameIndex(0);
        } else {
            self.frame = self.frame.offset(1);
        }
        Some(self.frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/clock.rs"]
mod tests;
