use crate::animation::keyframe::Keyframe;
use crate::animation::pose::{CameraPose, FocalPose, Pose, ShapePose};
use crate::animation::track::Track;
use crate::effects::transitions::TransitionSpec;
use crate::foundation::core::{FrameIndex, FrameWindow, ObjectId};
use crate::foundation::error::{KeystageError, KeystageResult, Recovered, Warning};
use std::collections::BTreeSet;
use std::path::Path;

/// Drawable primitive of a shape object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Triangle,
    Pentagon,
    Star,
    SpeechBubble,
    Image,
}

/// Static (non-animated) geometry of a shape.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShapeGeometry {
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub width: f64,
    pub height: f64,
    pub color: String,
    /// Image source, only meaningful for [`ShapeKind::Image`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Default for ShapeGeometry {
    fn default() -> Self {
        Self {
            kind: ShapeKind::Rectangle,
            width: 100.0,
            height: 100.0,
            color: "#4a90e2".to_owned(),
            image: None,
        }
    }
}

impl ShapeGeometry {
    /// Whether drawing this shape needs a decoded image.
    pub fn needs_image(&self) -> bool {
        self.kind == ShapeKind::Image && self.image.is_some()
    }
}

/// Visibility of a sampled object at one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectSample<P> {
    pub keyframe: Keyframe<P>,
    /// `0` outside the visible window, `1` inside.
    pub opacity: f64,
}

/// One keyframed object of a scene. `K` carries kind-specific static data.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimatableObject<P, K = ()> {
    pub id: ObjectId,
    pub kind: K,
    track: Track<P>,
    track_version: u64,
    pub visible_window: Option<FrameWindow>,
    pub enter: Option<TransitionSpec>,
    pub exit: Option<TransitionSpec>,
}

pub type ShapeObject = AnimatableObject<ShapePose, ShapeGeometry>;
pub type CameraObject = AnimatableObject<CameraPose>;
pub type FocalPointObject = AnimatableObject<FocalPose>;

impl<P: Pose, K> AnimatableObject<P, K> {
    /// New object whose track holds `pose` at frame 0.
    pub fn new(id: ObjectId, kind: K, pose: P) -> Self {
        Self::with_track(id, kind, Track::new(Keyframe::new(FrameIndex(0), pose)))
    }

    pub fn with_track(id: ObjectId, kind: K, track: Track<P>) -> Self {
        let track_version = track.fingerprint();
        Self {
            id,
            kind,
            track,
            track_version,
            visible_window: None,
            enter: None,
            exit: None,
        }
    }

    pub fn track(&self) -> &Track<P> {
        &self.track
    }

    /// Content fingerprint of the track; changes with every edit.
    pub fn track_version(&self) -> u64 {
        self.track_version
    }

    /// Copy of this object carrying `track`.
    pub fn replace_track(&self, track: Track<P>) -> Self
    where
        K: Clone,
    {
        Self {
            track_version: track.fingerprint(),
            track,
            id: self.id,
            kind: self.kind.clone(),
            visible_window: self.visible_window,
            enter: self.enter,
            exit: self.exit,
        }
    }

    pub fn is_visible_at(&self, frame: FrameIndex) -> bool {
        self.visible_window.is_none_or(|w| w.contains(frame))
    }

    /// Sample the track at `frame`. Outside the visible window the pose is still sampled but
    /// reported with zero opacity.
    pub fn sample(&self, frame: FrameIndex) -> ObjectSample<P> {
        ObjectSample {
            keyframe: self.track.sample(frame),
            opacity: if self.is_visible_at(frame) { 1.0 } else { 0.0 },
        }
    }

    /// Copy of this object with its visible window replaced. The window is widened to at least
    /// `min_frames` frames; keyframes are never touched.
    pub fn set_visible_window(&self, window: Option<FrameWindow>, min_frames: u64) -> Self
    where
        K: Clone,
    {
        Self {
            visible_window: window.map(|w| w.with_min_span(min_frames)),
            ..self.clone()
        }
    }
}

/// Complete animated scene: shapes, the camera and the focal point.
///
/// Every keyframe lies in `[0, duration_frames]`; loading and commands enforce it.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    duration_frames: u64,
    objects: Vec<ShapeObject>,
    camera: CameraObject,
    focal_point: FocalPointObject,
}

/// Owner label used in warnings and errors.
pub(crate) const CAMERA_OWNER: &str = "camera";
pub(crate) const FOCAL_OWNER: &str = "focal-point";

impl Scene {
    /// Empty scene with a default camera and focal point.
    pub fn new(duration_frames: u64) -> Self {
        Self {
            duration_frames,
            objects: Vec::new(),
            camera: CameraObject::new(ObjectId(0), (), CameraPose::default()),
            focal_point: FocalPointObject::new(ObjectId(0), (), FocalPose::default()),
        }
    }

    pub fn duration_frames(&self) -> u64 {
        self.duration_frames
    }

    pub fn last_frame(&self) -> FrameIndex {
        FrameIndex(self.duration_frames)
    }

    /// Clamp `frame` into `[0, duration_frames]`.
    pub fn clamp_frame(&self, frame: FrameIndex) -> FrameIndex {
        frame.min(self.last_frame())
    }

    pub fn objects(&self) -> &[ShapeObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&ShapeObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn camera(&self) -> &CameraObject {
        &self.camera
    }

    pub fn focal_point(&self) -> &FocalPointObject {
        &self.focal_point
    }

    /// Copy of the scene with `object` added.
    pub fn insert_object(&self, object: ShapeObject) -> KeystageResult<Self> {
        if self.object(object.id).is_some() {
            return Err(KeystageError::validation(format!(
                "duplicate object id {}",
                object.id.0
            )));
        }
        check_track_range(&object.id.to_string(), object.track(), self.duration_frames)?;
        let mut out = self.clone();
        out.objects.push(object);
        Ok(out)
    }

    /// Copy of the scene without object `id`.
    pub fn remove_object(&self, id: ObjectId) -> KeystageResult<Self> {
        if self.object(id).is_none() {
            return Err(KeystageError::validation(format!("unknown object id {}", id.0)));
        }
        let mut out = self.clone();
        out.objects.retain(|o| o.id != id);
        Ok(out)
    }

    pub(crate) fn replace_object(&self, object: ShapeObject) -> Self {
        let mut out = self.clone();
        if let Some(slot) = out.objects.iter_mut().find(|o| o.id == object.id) {
            *slot = object;
        }
        out
    }

    pub(crate) fn replace_camera(&self, camera: CameraObject) -> Self {
        Self {
            camera,
            ..self.clone()
        }
    }

    pub(crate) fn replace_focal_point(&self, focal_point: FocalPointObject) -> Self {
        Self {
            focal_point,
            ..self.clone()
        }
    }

    /// Copy of the scene with a new duration. Shrinking drops keyframes past the new end; a
    /// track left empty falls back to a default keyframe at frame 0.
    pub fn with_duration(&self, duration_frames: u64) -> Recovered<Self> {
        let max = FrameIndex(duration_frames);
        let mut warnings = Vec::new();

        let objects = self
            .objects
            .iter()
            .map(|o| {
                let track = clip_track(&o.id.to_string(), o.track(), max, &mut warnings);
                o.replace_track(track)
            })
            .collect();
        let camera = self
            .camera
            .replace_track(clip_track(CAMERA_OWNER, self.camera.track(), max, &mut warnings));
        let focal_point = self.focal_point.replace_track(clip_track(
            FOCAL_OWNER,
            self.focal_point.track(),
            max,
            &mut warnings,
        ));

        Recovered {
            value: Self {
                duration_frames,
                objects,
                camera,
                focal_point,
            },
            warnings,
        }
    }

    #[tracing::instrument(skip(reader))]
    pub fn from_reader(reader: impl std::io::Read) -> KeystageResult<Recovered<Self>> {
        let def: SceneDef = serde_json::from_reader(reader)
            .map_err(|e| KeystageError::validation(format!("invalid scene JSON: {e}")))?;
        Self::from_def(def)
    }

    pub fn from_json_str(s: &str) -> KeystageResult<Recovered<Self>> {
        Self::from_reader(s.as_bytes())
    }

    pub fn from_path(path: impl AsRef<Path>) -> KeystageResult<Recovered<Self>> {
        let path = path.as_ref();
        let f = std::fs::File::open(path).map_err(|e| {
            KeystageError::validation(format!("open scene '{}': {e}", path.display()))
        })?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    pub fn to_json_string(&self) -> KeystageResult<String> {
        serde_json::to_string_pretty(&self.to_def())
            .map_err(|e| KeystageError::serde(format!("encode scene: {e}")))
    }

    /// Validate and normalize a parsed scene document.
    pub fn from_def(def: SceneDef) -> KeystageResult<Recovered<Self>> {
        let duration = def.duration_frames;
        let mut warnings = Vec::new();

        let mut seen = BTreeSet::new();
        let mut objects = Vec::with_capacity(def.objects.len());
        for o in def.objects {
            let id = ObjectId(o.id);
            if !seen.insert(id) {
                return Err(KeystageError::validation(format!(
                    "duplicate object id {}",
                    o.id
                )));
            }
            let owner = id.to_string();
            let track = build_track(&owner, o.body.keyframes, duration, &mut warnings)?;
            let mut obj = ShapeObject::with_track(id, o.geometry, track);
            apply_timing(&mut obj, &owner, o.body.visible_window, o.body.enter, o.body.exit)?;
            objects.push(obj);
        }

        let camera = match def.camera {
            None => CameraObject::new(ObjectId(0), (), CameraPose::default()),
            Some(c) => {
                let track = build_track(CAMERA_OWNER, c.keyframes, duration, &mut warnings)?;
                let mut obj = CameraObject::with_track(ObjectId(0), (), track);
                apply_timing(&mut obj, CAMERA_OWNER, c.visible_window, c.enter, c.exit)?;
                obj
            }
        };
        let focal_point = match def.focal_point {
            None => FocalPointObject::new(ObjectId(0), (), FocalPose::default()),
            Some(f) => {
                let track = build_track(FOCAL_OWNER, f.keyframes, duration, &mut warnings)?;
                let mut obj = FocalPointObject::with_track(ObjectId(0), (), track);
                apply_timing(&mut obj, FOCAL_OWNER, f.visible_window, f.enter, f.exit)?;
                obj
            }
        };

        Ok(Recovered {
            value: Self {
                duration_frames: duration,
                objects,
                camera,
                focal_point,
            },
            warnings,
        })
    }

    pub fn to_def(&self) -> SceneDef {
        SceneDef {
            duration_frames: self.duration_frames,
            objects: self
                .objects
                .iter()
                .map(|o| ShapeObjectDef {
                    id: o.id.0,
                    geometry: o.kind.clone(),
                    body: ObjectBodyDef::from_object(o),
                })
                .collect(),
            camera: Some(ObjectBodyDef::from_object(&self.camera)),
            focal_point: Some(ObjectBodyDef::from_object(&self.focal_point)),
        }
    }
}

fn build_track<P: Pose>(
    owner: &str,
    keyframes: Vec<Keyframe<P>>,
    duration: u64,
    warnings: &mut Vec<Warning>,
) -> KeystageResult<Track<P>> {
    if keyframes.is_empty() {
        tracing::warn!(owner, "empty track replaced by a default keyframe");
        warnings.push(Warning::EmptyTrack {
            owner: owner.to_owned(),
        });
        return Ok(Track::fallback());
    }
    if let Some(k) = keyframes.iter().find(|k| k.frame.0 > duration) {
        return Err(KeystageError::validation(format!(
            "{owner}: keyframe at frame {} is outside [0, {duration}]",
            k.frame.0
        )));
    }
    Track::try_from_keyframes(keyframes)
        .map_err(|e| KeystageError::validation(format!("{owner}: {e}")))
}

fn check_track_range<P: Pose>(owner: &str, track: &Track<P>, duration: u64) -> KeystageResult<()> {
    match track.last() {
        Some(k) if k.frame.0 > duration => Err(KeystageError::validation(format!(
            "{owner}: keyframe at frame {} is outside [0, {duration}]",
            k.frame.0
        ))),
        _ => Ok(()),
    }
}

fn clip_track<P: Pose>(
    owner: &str,
    track: &Track<P>,
    max: FrameIndex,
    warnings: &mut Vec<Warning>,
) -> Track<P> {
    let (kept, dropped) = track.retain_within(max);
    if dropped > 0 {
        tracing::warn!(owner, dropped, "keyframes past the scene end were dropped");
        warnings.push(Warning::KeyframesDropped {
            owner: owner.to_owned(),
            count: dropped,
        });
    }
    kept.unwrap_or_else(|| {
        tracing::warn!(owner, "track emptied by duration change; using a default keyframe");
        warnings.push(Warning::EmptyTrack {
            owner: owner.to_owned(),
        });
        Track::fallback()
    })
}

fn apply_timing<P: Pose, K>(
    obj: &mut AnimatableObject<P, K>,
    owner: &str,
    window: Option<WindowDef>,
    enter: Option<TransitionSpec>,
    exit: Option<TransitionSpec>,
) -> KeystageResult<()> {
    obj.visible_window = match window {
        None => None,
        Some(w) if w.start > w.end => {
            return Err(KeystageError::validation(format!(
                "{owner}: visible window start {} is after end {}",
                w.start, w.end
            )));
        }
        Some(w) => Some(FrameWindow {
            start: FrameIndex(w.start),
            end: FrameIndex(w.end),
        }),
    };
    obj.enter = enter;
    obj.exit = exit;
    Ok(())
}

// ----------------------------
// Boundary (serde) structures
// ----------------------------

/// JSON form of a [`Scene`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDef {
    pub duration_frames: u64,
    #[serde(default)]
    pub objects: Vec<ShapeObjectDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<ObjectBodyDef<CameraPose>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focal_point: Option<ObjectBodyDef<FocalPose>>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ShapeObjectDef {
    pub id: u64,
    #[serde(flatten)]
    pub geometry: ShapeGeometry,
    #[serde(flatten)]
    pub body: ObjectBodyDef<ShapePose>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectBodyDef<P> {
    #[serde(default)]
    pub keyframes: Vec<Keyframe<P>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_window: Option<WindowDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enter: Option<TransitionSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit: Option<TransitionSpec>,
}

impl<P: Pose> ObjectBodyDef<P> {
    fn from_object<K>(o: &AnimatableObject<P, K>) -> Self {
        Self {
            keyframes: o.track().keyframes().cloned().collect(),
            visible_window: o.visible_window.map(|w| WindowDef {
                start: w.start.0,
                end: w.end.0,
            }),
            enter: o.enter,
            exit: o.exit,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WindowDef {
    pub start: u64,
    pub end: u64,
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
