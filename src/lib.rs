//! Keystage is a keyframe interpolation and parallax-camera projection engine for 2D timeline
//! animation.
//!
//! A [`Scene`] holds keyframed shapes plus a camera and a focal point. Callers either
//! *query* it every display tick through an [`Evaluator`], or *edit* it with an
//! [`EditCommand`], which returns a new scene and leaves the old one untouched.
//!
//! - Load and validate a scene with [`Scene::from_path`]
//! - Sample single tracks with [`Track::sample`]
//! - Evaluate complete frames with [`Evaluator::eval_frame`]
//! - Drive playback deterministically with [`Playback`] and [`FixedStepClock`]
#![forbid(unsafe_code)]

pub mod animation;
pub mod assets;
pub mod camera;
pub mod effects;
pub mod eval;
pub mod foundation;
pub mod playback;
pub mod scene;

pub use crate::animation::ease::Ease;
pub use crate::animation::keyframe::{Keyframe, KeyframeAnimation, KeyframePatch};
pub use crate::animation::pose::{
    CameraPatch, CameraPose, FocalPatch, FocalPose, Pose, ShapePatch, ShapePose,
};
pub use crate::animation::track::{SampleMemo, Track};
pub use crate::assets::images::{ImageAvailability, ImageCache, ImageRequest, LoadTicket};
pub use crate::camera::parallax::{ProjectedTransform, project};
pub use crate::effects::transitions::{Direction, TransitionEnvelope, TransitionSpec};
pub use crate::eval::evaluator::{DrawNode, EvaluatedFrame, Evaluator, ScreenTransform};
pub use crate::foundation::config::EngineConfig;
pub use crate::foundation::core::{Affine, FrameIndex, FrameWindow, ObjectId, Point, Vec2};
pub use crate::foundation::error::{KeystageError, KeystageResult, Recovered, Warning};
pub use crate::playback::clock::{FixedStepClock, FrameClock, Playback, TickFn};
pub use crate::scene::commands::{EditCommand, PosePatch, Target};
pub use crate::scene::model::{Scene, ShapeGeometry, ShapeKind, ShapeObject};
