use crate::animation::ease::Ease;
use crate::animation::pose::MIN_SCALE;
use crate::foundation::config::TransitionConfig;
use crate::foundation::core::{FrameIndex, FrameWindow, Vec2};

/// Where an enter/exit transition comes from (enter) or goes to (exit).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Grow and fade in place.
    #[default]
    Center,
    Left,
    Right,
    Top,
    Bottom,
}

impl Direction {
    /// Unit vector of the slide offset for this direction; zero for `Center`.
    fn axis(self) -> Vec2 {
        match self {
            Self::Center => Vec2::ZERO,
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
            Self::Top => Vec2::new(0.0, -1.0),
            Self::Bottom => Vec2::new(0.0, 1.0),
        }
    }
}

/// Enter or exit animation of an object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransitionSpec {
    /// Easing of the transition progress; `none` disables the transition.
    #[serde(rename = "type")]
    pub kind: Ease,
    #[serde(default)]
    pub direction: Direction,
    /// Length in frames.
    pub duration: u64,
}

impl TransitionSpec {
    pub fn is_active(&self) -> bool {
        !self.kind.is_none()
    }

    /// Eased progress after `elapsed` frames of the transition.
    fn progress(&self, elapsed: u64) -> f64 {
        if self.duration == 0 {
            return 1.0;
        }
        self.kind.apply(elapsed as f64 / self.duration as f64)
    }

    fn envelope(&self, p: f64, config: &TransitionConfig) -> TransitionEnvelope {
        match self.direction {
            Direction::Center => TransitionEnvelope {
                offset: Vec2::ZERO,
                scale_multiplier: p,
                opacity: p,
            },
            dir => TransitionEnvelope {
                offset: dir.axis() * (config.travel_distance * (1.0 - p)),
                ..TransitionEnvelope::IDENTITY
            },
        }
    }
}

/// Adjustment layered over a sampled pose: offsets add, scale and opacity multiply.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionEnvelope {
    pub offset: Vec2,
    pub scale_multiplier: f64,
    pub opacity: f64,
}

impl TransitionEnvelope {
    pub const IDENTITY: Self = Self {
        offset: Vec2::ZERO,
        scale_multiplier: 1.0,
        opacity: 1.0,
    };

    /// Object is outside its transition window and must not show.
    pub const SUPPRESSED: Self = Self {
        offset: Vec2::ZERO,
        scale_multiplier: MIN_SCALE,
        opacity: 0.0,
    };

    pub fn then(self, other: Self) -> Self {
        Self {
            offset: self.offset + other.offset,
            scale_multiplier: self.scale_multiplier * other.scale_multiplier,
            opacity: self.opacity * other.opacity,
        }
    }
}

impl Default for TransitionEnvelope {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Envelope of an enter transition at `frame`. The window start defaults to frame 0.
pub fn enter_envelope(
    spec: &TransitionSpec,
    frame: FrameIndex,
    window: Option<FrameWindow>,
    config: &TransitionConfig,
) -> TransitionEnvelope {
    if !spec.is_active() {
        return TransitionEnvelope::IDENTITY;
    }
    let start = window.map_or(FrameIndex(0), |w| w.start);
    if frame < start {
        return TransitionEnvelope::SUPPRESSED;
    }
    spec.envelope(spec.progress(frame.since(start)), config)
}

/// Envelope of an exit transition at `frame`, measured backwards from the window end.
/// Without a window there is no end to exit from.
pub fn exit_envelope(
    spec: &TransitionSpec,
    frame: FrameIndex,
    window: Option<FrameWindow>,
    config: &TransitionConfig,
) -> TransitionEnvelope {
    let Some(window) = window else {
        return TransitionEnvelope::IDENTITY;
    };
    if !spec.is_active() {
        return TransitionEnvelope::IDENTITY;
    }
    if frame > window.end {
        return TransitionEnvelope::SUPPRESSED;
    }
    let remaining = window.end.since(frame);
    if remaining >= spec.duration {
        return TransitionEnvelope::IDENTITY;
    }
    spec.envelope(spec.progress(remaining), config)
}

/// Enter and exit envelopes composed at `frame`.
pub fn compose_transition(
    enter: Option<&TransitionSpec>,
    exit: Option<&TransitionSpec>,
    frame: FrameIndex,
    window: Option<FrameWindow>,
    config: &TransitionConfig,
) -> TransitionEnvelope {
    let enter = enter.map_or(TransitionEnvelope::IDENTITY, |s| {
        enter_envelope(s, frame, window, config)
    });
    if enter == TransitionEnvelope::SUPPRESSED {
        return enter;
    }
    let exit = exit.map_or(TransitionEnvelope::IDENTITY, |s| {
        exit_envelope(s, frame, window, config)
    });
    if exit == TransitionEnvelope::SUPPRESSED {
        return exit;
    }
    enter.then(exit)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transitions.rs"]
mod tests;
