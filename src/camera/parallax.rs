use crate::animation::pose::{CameraPose, FocalPose, ShapePose};
use crate::foundation::config::ParallaxConfig;
use crate::foundation::core::{ObjectId, Point};
use std::cmp::Ordering;

/// Screen placement of a shape after camera parallax and focal attraction.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ProjectedTransform {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    /// Distance falloff; only the overview/minimap view uses it.
    pub opacity: f64,
}

/// Project a sampled shape pose through the camera and focal point.
///
/// Nearer layers (small depth) follow the camera more, are pulled harder toward the focal
/// point's offset from screen center, grow with depth scaling and react more to camera zoom.
pub fn project(
    shape: &ShapePose,
    camera: &CameraPose,
    focal: &FocalPose,
    config: &ParallaxConfig,
) -> ProjectedTransform {
    let depth = shape.clamped_depth();
    let near = 1.0 - depth;

    let base_x = shape.x - camera.x * near;
    let base_y = shape.y - camera.y * near;

    let focal_influence = config.focal_strength * near;
    let x = base_x - (focal.x - config.screen_center.x) * focal_influence;
    let y = base_y - (focal.y - config.screen_center.y) * focal_influence;

    let mut scale = shape.clamped_scale();
    if config.depth_scale {
        scale *= depth_scale_factor(depth);
    }
    scale *= 1.0 + (camera.clamped_zoom() - 1.0) * near;

    let opacity = (1.0 - depth * config.camera_distance / 1000.0).max(0.0);

    ProjectedTransform {
        x,
        y,
        scale,
        opacity,
    }
}

/// `1 + 2 * (1 - depth)`: nearest layer is three times larger than the farthest.
pub fn depth_scale_factor(depth: f64) -> f64 {
    1.0 + (1.0 - depth.clamp(0.0, 1.0)) * 2.0
}

/// Shape position relative to the camera, as shown in the camera preview panel.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CameraView {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

pub fn camera_view(shape: &ShapePose, camera: &CameraPose, config: &ParallaxConfig) -> CameraView {
    let depth_scale = if config.depth_scale {
        depth_scale_factor(shape.clamped_depth())
    } else {
        1.0
    };
    CameraView {
        x: shape.x - camera.x,
        y: shape.y - camera.y,
        scale: depth_scale * camera.clamped_zoom(),
    }
}

/// Point moved by a depth-weighted zoom about `focal`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocalScaled {
    pub point: Point,
    pub scale: f64,
}

pub fn scale_about_focal_point(point: Point, focal: Point, zoom: f64, depth: f64) -> FocalScaled {
    let scale = 1.0 + (zoom - 1.0) * (1.0 - depth.clamp(0.0, 1.0));
    FocalScaled {
        point: focal + (point - focal) * scale,
        scale,
    }
}

/// Sort farthest-first so nearer layers are drawn on top. Equal depths order by id.
pub fn draw_order<T>(items: &mut [T], key: impl Fn(&T) -> (f64, ObjectId)) {
    items.sort_by(|a, b| {
        let (da, ia) = key(a);
        let (db, ib) = key(b);
        match db.total_cmp(&da) {
            Ordering::Equal => ia.cmp(&ib),
            o => o,
        }
    });
}

#[cfg(test)]
#[path = "../../tests/unit/camera/parallax.rs"]
mod tests;
