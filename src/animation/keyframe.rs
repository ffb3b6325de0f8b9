use crate::{animation::ease::Ease, foundation::core::FrameIndex};

/// Easing metadata attached to a keyframe; it shapes the segment that *ends* at this keyframe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct KeyframeAnimation {
    /// Base easing kind (`none`, `linear`, `bounce`, `elastic-out`, ...).
    #[serde(rename = "type", default)]
    pub kind: Ease,
    /// Frames needed to reach this keyframe's pose, measured from the previous keyframe.
    /// May be shorter than the gap, in which case the pose is reached early.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Optional curve override (`ease-in`, `ease-out`, `ease-in-out`, `bounce`, `elastic`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<Ease>,
}

impl KeyframeAnimation {
    pub fn new(kind: Ease) -> Self {
        Self {
            kind,
            duration: None,
            easing: None,
        }
    }

    pub fn with_duration(mut self, frames: u64) -> Self {
        self.duration = Some(frames);
        self
    }

    /// Curve actually applied: a non-trivial `easing` override wins over `kind`.
    pub fn curve(&self) -> Ease {
        match self.easing {
            Some(e) if !matches!(e, Ease::None | Ease::Linear) => e,
            _ => self.kind,
        }
    }

    /// Duration override; zero counts as unset.
    pub fn effective_duration(&self) -> Option<u64> {
        self.duration.filter(|d| *d > 0)
    }
}

/// One timestamped pose on a track.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<P> {
    pub frame: FrameIndex,
    #[serde(flatten)]
    pub pose: P,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<KeyframeAnimation>,
    /// Stay-here marker: the pose is frozen from this keyframe until the next one.
    #[serde(default, alias = "stayHere", skip_serializing_if = "std::ops::Not::not")]
    pub hold: bool,
}

impl<P> Keyframe<P> {
    pub fn new(frame: FrameIndex, pose: P) -> Self {
        Self {
            frame,
            pose,
            animation: None,
            hold: false,
        }
    }

    pub fn with_animation(mut self, animation: KeyframeAnimation) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn with_hold(mut self, hold: bool) -> Self {
        self.hold = hold;
        self
    }

    /// Easing curve for the segment ending at this keyframe.
    pub fn curve(&self) -> Ease {
        self.animation.map_or(Ease::Linear, |a| a.curve())
    }
}

/// Partial keyframe update: pose fields plus optional animation and hold flags.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyframePatch<Q> {
    #[serde(flatten)]
    pub pose: Q,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<KeyframeAnimation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold: Option<bool>,
}

impl<Q> KeyframePatch<Q> {
    pub fn pose(pose: Q) -> Self {
        Self {
            pose,
            animation: None,
            hold: None,
        }
    }
}

impl<P: crate::animation::pose::Pose> Keyframe<P> {
    /// Copy of this keyframe with `patch` merged in; the frame never changes.
    pub fn patched(&self, patch: &KeyframePatch<P::Patch>) -> Self {
        Self {
            frame: self.frame,
            pose: self.pose.patched(&patch.pose),
            animation: patch.animation.or(self.animation),
            hold: patch.hold.unwrap_or(self.hold),
        }
    }
}
