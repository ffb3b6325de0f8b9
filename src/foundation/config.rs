use crate::animation::ease::Ease;
use crate::animation::keyframe::KeyframeAnimation;
use crate::foundation::core::Point;
use crate::foundation::error::{KeystageError, KeystageResult};
use std::path::Path;

/// Engine-wide tuning. Every field has a default, so an empty JSON object is a valid config.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EngineConfig {
    pub parallax: ParallaxConfig,
    pub transitions: TransitionConfig,
    pub editing: EditingConfig,
    pub playback: PlaybackConfig,
}

impl EngineConfig {
    pub fn from_reader(reader: impl std::io::Read) -> KeystageResult<Self> {
        serde_json::from_reader(reader)
            .map_err(|e| KeystageError::validation(format!("invalid config JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> KeystageResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path).map_err(|e| {
            KeystageError::validation(format!("open config '{}': {e}", path.display()))
        })?;
        Self::from_reader(std::io::BufReader::new(f))
    }
}

/// Camera / focal-point projection settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParallaxConfig {
    /// Enlarge nearer objects (up to 3x at depth 0).
    pub depth_scale: bool,
    /// Pull of the focal point on the nearest layer; scaled by `1 - depth`.
    pub focal_strength: f64,
    /// Used only by the distance falloff of the overview opacity.
    pub camera_distance: f64,
    pub screen_center: Point,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            depth_scale: true,
            focal_strength: 0.5,
            camera_distance: 1000.0,
            screen_center: Point::new(400.0, 300.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransitionConfig {
    /// Travel of directional enter/exit slides, in scene units.
    pub travel_distance: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            travel_distance: 500.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditingConfig {
    /// Length of a stay-here segment created by `toggle_hold`.
    pub hold_frames: u64,
    /// Animation given to keyframes created by explicit writes.
    pub default_animation: KeyframeAnimation,
    pub min_window_frames: u64,
}

impl Default for EditingConfig {
    fn default() -> Self {
        Self {
            hold_frames: 30,
            default_animation: KeyframeAnimation::new(Ease::Linear).with_duration(30),
            min_window_frames: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaybackConfig {
    pub ticks_per_second: u32,
    pub looping: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 30,
            looping: false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
