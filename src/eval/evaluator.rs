use crate::animation::pose::{CameraPose, FocalPose, ShapePose};
use crate::animation::track::SampleMemo;
use crate::assets::images::ImageAvailability;
use crate::camera::parallax::{draw_order, project};
use crate::effects::transitions::compose_transition;
use crate::foundation::config::EngineConfig;
use crate::foundation::core::{Affine, FrameIndex, ObjectId, Point, Vec2};
use crate::scene::model::{Scene, ShapeGeometry, ShapeObject};
use std::collections::HashSet;

/// Final screen placement of one drawable node.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenTransform {
    pub x: f64,
    pub y: f64,
    /// Degrees in `[0, 360)`.
    pub rotation_deg: f64,
    pub scale: f64,
    pub opacity: f64,
}

impl ScreenTransform {
    /// Translate, then rotate, then scale: the order a 2D context applies them in.
    pub fn to_affine(&self) -> Affine {
        Affine::translate(Vec2::new(self.x, self.y))
            * Affine::rotate(self.rotation_deg.to_radians())
            * Affine::scale(self.scale)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DrawNode {
    pub id: ObjectId,
    /// Clamped depth; nodes are ordered by it, farthest first.
    pub depth: f64,
    pub transform: ScreenTransform,
    pub geometry: ShapeGeometry,
    /// The shape wants an image that is not decoded yet; draw a placeholder instead.
    pub placeholder: bool,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct EvaluatedFrame {
    pub frame: FrameIndex,
    /// Back-to-front draw list.
    pub nodes: Vec<DrawNode>,
}

/// Per-tick scene query: samples every track, applies visibility, transition envelopes and the
/// parallax projection, and produces a back-to-front draw list.
///
/// The evaluator keeps sample memos and the output buffer between calls so repeated frames
/// (scrubbing back and forth, paused playback) skip the interpolation work.
#[derive(Debug)]
pub struct Evaluator {
    shapes: SampleMemo<ShapePose>,
    camera: SampleMemo<CameraPose>,
    focal: SampleMemo<FocalPose>,
    frame: EvaluatedFrame,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            shapes: SampleMemo::default(),
            camera: SampleMemo::default(),
            focal: SampleMemo::default(),
            frame: EvaluatedFrame::default(),
        }
    }

    /// Evaluate `scene` at `frame` (clamped to the scene duration).
    #[tracing::instrument(skip(self, scene, config, images), fields(objects = scene.objects().len()))]
    pub fn eval_frame(
        &mut self,
        scene: &Scene,
        frame: FrameIndex,
        config: &EngineConfig,
        images: &dyn ImageAvailability,
    ) -> &EvaluatedFrame {
        let frame = scene.clamp_frame(frame);
        let cam = scene.camera();
        let camera = self
            .camera
            .sample_keyed(cam.track_version(), cam.track(), frame)
            .pose;
        let fp = scene.focal_point();
        let focal = self
            .focal
            .sample_keyed(fp.track_version(), fp.track(), frame)
            .pose;

        self.frame.frame = frame;
        self.frame.nodes.clear();
        for obj in scene.objects() {
            if let Some(node) = self.eval_shape(obj, frame, &camera, &focal, config, images) {
                self.frame.nodes.push(node);
            }
        }
        draw_order(&mut self.frame.nodes, |n| (n.depth, n.id));

        &self.frame
    }

    fn eval_shape(
        &mut self,
        obj: &ShapeObject,
        frame: FrameIndex,
        camera: &CameraPose,
        focal: &FocalPose,
        config: &EngineConfig,
        images: &dyn ImageAvailability,
    ) -> Option<DrawNode> {
        if !obj.is_visible_at(frame) {
            return None;
        }
        let envelope = compose_transition(
            obj.enter.as_ref(),
            obj.exit.as_ref(),
            frame,
            obj.visible_window,
            &config.transitions,
        );
        if envelope.opacity <= 0.0 {
            return None;
        }

        let pose = self
            .shapes
            .sample_keyed(obj.track_version(), obj.track(), frame)
            .pose;
        let projected = project(&pose, camera, focal, &config.parallax);

        Some(DrawNode {
            id: obj.id,
            depth: pose.clamped_depth(),
            transform: ScreenTransform {
                x: projected.x + envelope.offset.x,
                y: projected.y + envelope.offset.y,
                rotation_deg: pose.normalized_rotation(),
                scale: projected.scale * envelope.scale_multiplier,
                opacity: envelope.opacity,
            },
            geometry: obj.kind.clone(),
            placeholder: obj.kind.needs_image() && !images.has_image(obj.id),
        })
    }

    /// Front-most visible shape whose scaled bounding box contains `point`.
    ///
    /// Boxes are axis-aligned around the projected centre and ignore rotation.
    pub fn hit_test(
        &mut self,
        scene: &Scene,
        frame: FrameIndex,
        point: Point,
        config: &EngineConfig,
    ) -> Option<ObjectId> {
        let evaluated = self.eval_frame(scene, frame, config, &HashSet::<ObjectId>::new());
        evaluated
            .nodes
            .iter()
            .rev()
            .find(|n| {
                let half_w = n.geometry.width * n.transform.scale / 2.0;
                let half_h = n.geometry.height * n.transform.scale / 2.0;
                (point.x - n.transform.x).abs() <= half_w && (point.y - n.transform.y).abs() <= half_h
            })
            .map(|n| n.id)
    }

    /// Total memo hits and misses across all tracks.
    pub fn memo_stats(&self) -> (u64, u64) {
        (
            self.shapes.hits() + self.camera.hits() + self.focal.hits(),
            self.shapes.misses() + self.camera.misses() + self.focal.misses(),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
