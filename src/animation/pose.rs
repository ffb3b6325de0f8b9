use crate::foundation::math::{lerp, shortest_angle_delta, wrap_degrees};

/// Smallest scale a pose reports; keeps projected geometry invertible.
pub const MIN_SCALE: f64 = 0.001;

/// Interpolation contract for pose types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

/// A keyframeable pose together with its partial-update type.
pub trait Pose:
    Lerp
    + Clone
    + PartialEq
    + Default
    + std::fmt::Debug
    + serde::Serialize
    + serde::de::DeserializeOwned
{
    /// Partial update with one optional field per pose component.
    type Patch: Clone + Default + std::fmt::Debug;

    /// Copy of `self` with every field present in `patch` replaced.
    fn patched(&self, patch: &Self::Patch) -> Self;

    /// Visit every numeric component in declaration order (used for fingerprints).
    fn for_each_component(&self, f: &mut dyn FnMut(f64));
}

/// Pose of a drawable shape.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShapePose {
    pub x: f64,
    pub y: f64,
    /// Degrees; any real value, normalized on read.
    pub rotation: f64,
    /// Uniform scale; clamped to [`MIN_SCALE`] on read.
    pub scale: f64,
    /// 0 = nearest to the camera, 1 = farthest; clamped on read.
    pub depth: f64,
}

impl Default for ShapePose {
    fn default() -> Self {
        Self {
            x: 400.0,
            y: 300.0,
            rotation: 0.0,
            scale: 1.0,
            depth: 0.5,
        }
    }
}

impl ShapePose {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn clamped_scale(&self) -> f64 {
        if self.scale.is_nan() {
            return MIN_SCALE;
        }
        self.scale.max(MIN_SCALE)
    }

    pub fn clamped_depth(&self) -> f64 {
        if self.depth.is_nan() {
            return 0.0;
        }
        self.depth.clamp(0.0, 1.0)
    }

    pub fn normalized_rotation(&self) -> f64 {
        wrap_degrees(self.rotation)
    }
}

impl Lerp for ShapePose {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            x: lerp(a.x, b.x, t),
            y: lerp(a.y, b.y, t),
            rotation: a.rotation + shortest_angle_delta(a.rotation, b.rotation) * t,
            scale: lerp(a.scale, b.scale, t),
            depth: lerp(a.depth, b.depth, t),
        }
    }
}

/// Partial update for [`ShapePose`].
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShapePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
}

impl Pose for ShapePose {
    type Patch = ShapePatch;

    fn patched(&self, p: &ShapePatch) -> Self {
        Self {
            x: p.x.unwrap_or(self.x),
            y: p.y.unwrap_or(self.y),
            rotation: p.rotation.unwrap_or(self.rotation),
            scale: p.scale.unwrap_or(self.scale),
            depth: p.depth.unwrap_or(self.depth),
        }
    }

    fn for_each_component(&self, f: &mut dyn FnMut(f64)) {
        for v in [self.x, self.y, self.rotation, self.scale, self.depth] {
            f(v);
        }
    }
}

/// Pose of the scene camera.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CameraPose {
    pub x: f64,
    pub y: f64,
    /// Zoom factor; `1` is neutral. Clamped to a positive value on read.
    pub zoom: f64,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

impl CameraPose {
    pub fn clamped_zoom(&self) -> f64 {
        if self.zoom.is_nan() || self.zoom <= 0.0 {
            return MIN_SCALE;
        }
        self.zoom
    }
}

impl Lerp for CameraPose {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            x: lerp(a.x, b.x, t),
            y: lerp(a.y, b.y, t),
            zoom: lerp(a.zoom, b.zoom, t),
        }
    }
}

/// Partial update for [`CameraPose`].
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CameraPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
}

impl Pose for CameraPose {
    type Patch = CameraPatch;

    fn patched(&self, p: &CameraPatch) -> Self {
        Self {
            x: p.x.unwrap_or(self.x),
            y: p.y.unwrap_or(self.y),
            zoom: p.zoom.unwrap_or(self.zoom),
        }
    }

    fn for_each_component(&self, f: &mut dyn FnMut(f64)) {
        for v in [self.x, self.y, self.zoom] {
            f(v);
        }
    }
}

/// Position of the scene focal point. Focal points carry no rotation, scale or depth.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FocalPose {
    pub x: f64,
    pub y: f64,
}

impl Default for FocalPose {
    fn default() -> Self {
        Self { x: 400.0, y: 300.0 }
    }
}

impl Lerp for FocalPose {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            x: lerp(a.x, b.x, t),
            y: lerp(a.y, b.y, t),
        }
    }
}

/// Partial update for [`FocalPose`].
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FocalPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl Pose for FocalPose {
    type Patch = FocalPatch;

    fn patched(&self, p: &FocalPatch) -> Self {
        Self {
            x: p.x.unwrap_or(self.x),
            y: p.y.unwrap_or(self.y),
        }
    }

    fn for_each_component(&self, f: &mut dyn FnMut(f64)) {
        f(self.x);
        f(self.y);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/pose.rs"]
mod tests;
