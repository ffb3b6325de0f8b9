use crate::animation::edit::{add_or_update_keyframe, edit_in_place};
use crate::animation::keyframe::{KeyframeAnimation, KeyframePatch};
use crate::animation::pose::{CameraPatch, FocalPatch, Pose, ShapePatch};
use crate::animation::track::Track;
use crate::effects::hold::toggle_hold;
use crate::foundation::config::EngineConfig;
use crate::foundation::core::{FrameIndex, FrameWindow, ObjectId};
use crate::foundation::error::{KeystageError, KeystageResult, Recovered};
use crate::scene::model::{
    AnimatableObject, CAMERA_OWNER, FOCAL_OWNER, Scene, ShapeObject, WindowDef,
};
use std::str::FromStr;

/// Object addressed by an edit command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Shape(ObjectId),
    Camera,
    FocalPoint,
}

impl FromStr for Target {
    type Err = KeystageError;

    /// `camera`, `focal` / `focal-point`, or a numeric shape id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "camera" => Ok(Self::Camera),
            "focal" | "focal-point" | "focal_point" | "focalpoint" => Ok(Self::FocalPoint),
            other => other
                .trim_start_matches("shape-")
                .parse::<u64>()
                .map(|id| Self::Shape(ObjectId(id)))
                .map_err(|_| KeystageError::validation(format!("unknown target \"{s}\""))),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shape(id) => write!(f, "{id}"),
            Self::Camera => f.write_str(CAMERA_OWNER),
            Self::FocalPoint => f.write_str(FOCAL_OWNER),
        }
    }
}

/// Keyframe patch for one of the three pose kinds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PosePatch {
    Shape(KeyframePatch<ShapePatch>),
    Camera(KeyframePatch<CameraPatch>),
    FocalPoint(KeyframePatch<FocalPatch>),
}

impl PosePatch {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Shape(_) => "shape",
            Self::Camera(_) => "camera",
            Self::FocalPoint(_) => "focal_point",
        }
    }
}

/// Scene edit. Commands are applied with [`Scene::apply`] and never modify the input scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    AddOrUpdateKeyframe {
        target: Target,
        frame: FrameIndex,
        patch: PosePatch,
    },
    EditInPlace {
        target: Target,
        frame: FrameIndex,
        patch: PosePatch,
    },
    SetVisibleWindow {
        target: Target,
        #[serde(default)]
        window: Option<WindowDef>,
    },
    ToggleHold {
        target: Target,
        frame: FrameIndex,
    },
    SetDuration {
        frames: u64,
    },
}

#[derive(Clone, Copy)]
enum TrackEdit {
    AddOrUpdate,
    InPlace,
}

impl TrackEdit {
    fn run<P: Pose>(
        self,
        track: &Track<P>,
        frame: FrameIndex,
        patch: &KeyframePatch<P::Patch>,
        default_animation: KeyframeAnimation,
    ) -> Track<P> {
        match self {
            Self::AddOrUpdate => add_or_update_keyframe(track, frame, patch, default_animation),
            Self::InPlace => edit_in_place(track, frame, patch, default_animation),
        }
    }
}

impl Scene {
    /// Apply `cmd`, returning the edited scene and any recovery warnings.
    pub fn apply(&self, cmd: &EditCommand, config: &EngineConfig) -> KeystageResult<Recovered<Scene>> {
        tracing::debug!(?cmd, "apply edit command");
        match cmd {
            EditCommand::AddOrUpdateKeyframe {
                target,
                frame,
                patch,
            } => self
                .edit_track(*target, *frame, patch, TrackEdit::AddOrUpdate, config)
                .map(Recovered::clean),
            EditCommand::EditInPlace {
                target,
                frame,
                patch,
            } => self
                .edit_track(*target, *frame, patch, TrackEdit::InPlace, config)
                .map(Recovered::clean),
            EditCommand::SetVisibleWindow { target, window } => {
                // An inverted window is normalized like a too-short one.
                let window = window.map(|w| FrameWindow {
                    start: FrameIndex(w.start),
                    end: FrameIndex(w.end),
                });
                let op = ObjectOp::Window {
                    window,
                    min_frames: config.editing.min_window_frames,
                };
                self.map_object(*target, &op).map(Recovered::clean)
            }
            EditCommand::ToggleHold { target, frame } => {
                let op = ObjectOp::ToggleHold {
                    frame: self.check_frame(*frame)?,
                    hold_frames: config.editing.hold_frames,
                    last: self.last_frame(),
                };
                self.map_object(*target, &op).map(Recovered::clean)
            }
            EditCommand::SetDuration { frames } => Ok(self.with_duration(*frames)),
        }
    }

    fn check_frame(&self, frame: FrameIndex) -> KeystageResult<FrameIndex> {
        if frame > self.last_frame() {
            return Err(KeystageError::validation(format!(
                "frame {} is outside [0, {}]",
                frame.0,
                self.duration_frames()
            )));
        }
        Ok(frame)
    }

    fn edit_track(
        &self,
        target: Target,
        frame: FrameIndex,
        patch: &PosePatch,
        edit: TrackEdit,
        config: &EngineConfig,
    ) -> KeystageResult<Scene> {
        let frame = self.check_frame(frame)?;
        let anim = config.editing.default_animation;
        match (target, patch) {
            (Target::Shape(id), PosePatch::Shape(p)) => {
                let obj = self.shape(id)?;
                Ok(self.replace_object(obj.replace_track(edit.run(obj.track(), frame, p, anim))))
            }
            (Target::Camera, PosePatch::Camera(p)) => {
                let cam = self.camera();
                Ok(self.replace_camera(cam.replace_track(edit.run(cam.track(), frame, p, anim))))
            }
            (Target::FocalPoint, PosePatch::FocalPoint(p)) => {
                let fp = self.focal_point();
                Ok(self.replace_focal_point(fp.replace_track(edit.run(fp.track(), frame, p, anim))))
            }
            (target, patch) => Err(KeystageError::validation(format!(
                "{} patch cannot be applied to {target}",
                patch.kind_name()
            ))),
        }
    }

    fn shape(&self, id: ObjectId) -> KeystageResult<&ShapeObject> {
        self.object(id)
            .ok_or_else(|| KeystageError::validation(format!("unknown object id {}", id.0)))
    }

    fn map_object(&self, target: Target, op: &ObjectOp) -> KeystageResult<Scene> {
        match target {
            Target::Shape(id) => Ok(self.replace_object(op.apply(self.shape(id)?)?)),
            Target::Camera => Ok(self.replace_camera(op.apply(self.camera())?)),
            Target::FocalPoint => Ok(self.replace_focal_point(op.apply(self.focal_point())?)),
        }
    }
}

/// Edits that apply to an object of any pose kind.
enum ObjectOp {
    Window {
        window: Option<FrameWindow>,
        min_frames: u64,
    },
    ToggleHold {
        frame: FrameIndex,
        hold_frames: u64,
        last: FrameIndex,
    },
}

impl ObjectOp {
    fn apply<P: Pose, K: Clone>(
        &self,
        o: &AnimatableObject<P, K>,
    ) -> KeystageResult<AnimatableObject<P, K>> {
        match *self {
            Self::Window { window, min_frames } => Ok(o.set_visible_window(window, min_frames)),
            Self::ToggleHold {
                frame,
                hold_frames,
                last,
            } => {
                let track = toggle_hold(o.track(), frame, hold_frames);
                if track.last().is_some_and(|k| k.frame > last) {
                    return Err(KeystageError::validation(format!(
                        "hold after frame {} would end past the scene end {}",
                        frame.0, last.0
                    )));
                }
                Ok(o.replace_track(track))
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/commands.rs"]
mod tests;
