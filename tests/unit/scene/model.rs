use super::*;

const SCENE: &str = r##"{
  "durationFrames": 120,
  "objects": [
    {
      "id": 1,
      "type": "rectangle",
      "width": 80,
      "height": 40,
      "color": "#ff0000",
      "keyframes": [
        {"frame": 0, "x": 100, "y": 100, "depth": 0.2},
        {"frame": 60, "x": 300, "y": 100, "depth": 0.2, "animation": {"type": "linear"}}
      ],
      "visibleWindow": {"start": 10, "end": 90},
      "enter": {"type": "linear", "direction": "center", "duration": 10}
    },
    {
      "id": 2,
      "type": "image",
      "image": "hero.png",
      "keyframes": [{"frame": 0, "x": 400, "y": 300, "stayHere": true}]
    }
  ],
  "camera": {"keyframes": [{"frame": 0, "x": 0, "y": 0, "zoom": 1}]},
  "focalPoint": {"keyframes": [{"frame": 0, "x": 400, "y": 300}]}
}"##;

#[test]
fn loads_objects_camera_and_focal_point() {
    let loaded = Scene::from_json_str(SCENE).unwrap();
    assert!(loaded.warnings.is_empty());
    let scene = loaded.value;
    assert_eq!(scene.duration_frames(), 120);
    assert_eq!(scene.objects().len(), 2);

    let rect = scene.object(ObjectId(1)).unwrap();
    assert_eq!(rect.kind.width, 80.0);
    assert_eq!(rect.kind.kind, ShapeKind::Rectangle);
    assert_eq!(rect.track().len(), 2);
    assert_eq!(
        rect.visible_window,
        Some(FrameWindow {
            start: FrameIndex(10),
            end: FrameIndex(90)
        })
    );
    assert!(rect.enter.is_some());
    assert!(rect.exit.is_none());

    let img = scene.object(ObjectId(2)).unwrap();
    assert!(img.kind.needs_image());
    assert!(img.track().first().unwrap().hold);
    // Defaults fill in missing pose fields.
    assert_eq!(img.track().first().unwrap().pose.scale, 1.0);

    assert_eq!(scene.camera().track().len(), 1);
    assert_eq!(scene.focal_point().track().first().unwrap().pose.x, 400.0);
}

#[test]
fn missing_camera_and_focal_use_defaults() {
    let scene = Scene::from_json_str(r#"{"durationFrames": 10}"#).unwrap().value;
    assert_eq!(
        scene.camera().sample(FrameIndex(3)).keyframe.pose,
        CameraPose::default()
    );
    assert_eq!(
        scene.focal_point().sample(FrameIndex(3)).keyframe.pose,
        FocalPose::default()
    );
}

#[test]
fn sampling_outside_window_reports_zero_opacity() {
    let scene = Scene::from_json_str(SCENE).unwrap().value;
    let rect = scene.object(ObjectId(1)).unwrap();
    let before = rect.sample(FrameIndex(5));
    assert_eq!(before.opacity, 0.0);
    assert!((before.keyframe.pose.x - 100.0 - 200.0 * 5.0 / 60.0).abs() < 1e-9);
    assert_eq!(rect.sample(FrameIndex(10)).opacity, 1.0);
    assert_eq!(rect.sample(FrameIndex(90)).opacity, 1.0);
    assert_eq!(rect.sample(FrameIndex(91)).opacity, 0.0);
}

#[test]
fn rejects_keyframes_past_duration() {
    let err = Scene::from_json_str(
        r#"{"durationFrames": 10, "objects": [{"id": 1, "keyframes": [{"frame": 11}]}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, KeystageError::Validation(_)));
    assert!(err.to_string().contains("shape-1"));
}

#[test]
fn rejects_duplicate_ids_and_frames() {
    let dup_ids = r#"{"durationFrames": 10, "objects": [
        {"id": 1, "keyframes": [{"frame": 0}]},
        {"id": 1, "keyframes": [{"frame": 0}]}
    ]}"#;
    assert!(Scene::from_json_str(dup_ids).is_err());

    let dup_frames = r#"{"durationFrames": 10, "objects": [
        {"id": 1, "keyframes": [{"frame": 2}, {"frame": 2}]}
    ]}"#;
    let err = Scene::from_json_str(dup_frames).unwrap_err();
    assert!(err.to_string().contains("frame 2"));
}

#[test]
fn rejects_inverted_window() {
    let s = r#"{"durationFrames": 10, "objects": [
        {"id": 1, "keyframes": [{"frame": 0}], "visibleWindow": {"start": 8, "end": 2}}
    ]}"#;
    let err = Scene::from_json_str(s).unwrap_err();
    assert!(err.to_string().contains("visible window"));
}

#[test]
fn empty_track_is_recovered_with_warning() {
    let s = r#"{"durationFrames": 10, "objects": [{"id": 4, "keyframes": []}]}"#;
    let loaded = Scene::from_json_str(s).unwrap();
    assert_eq!(
        loaded.warnings,
        vec![Warning::EmptyTrack {
            owner: "shape-4".to_owned()
        }]
    );
    let obj = loaded.value.object(ObjectId(4)).unwrap();
    assert_eq!(obj.track().len(), 1);
    assert_eq!(obj.track().first().unwrap().frame, FrameIndex(0));
}

#[test]
fn shrinking_duration_drops_late_keyframes() {
    let scene = Scene::from_json_str(SCENE).unwrap().value;
    let shrunk = scene.with_duration(30);
    assert_eq!(shrunk.value.duration_frames(), 30);
    assert_eq!(
        shrunk.warnings,
        vec![Warning::KeyframesDropped {
            owner: "shape-1".to_owned(),
            count: 1
        }]
    );
    let rect = shrunk.value.object(ObjectId(1)).unwrap();
    assert_eq!(rect.track().len(), 1);
    assert_ne!(
        rect.track_version(),
        scene.object(ObjectId(1)).unwrap().track_version()
    );
    // Growing never drops anything.
    assert!(scene.with_duration(500).warnings.is_empty());
}

#[test]
fn shrinking_below_every_keyframe_falls_back() {
    let s = r#"{"durationFrames": 50, "objects": [{"id": 1, "keyframes": [{"frame": 40, "x": 9}]}]}"#;
    let scene = Scene::from_json_str(s).unwrap().value;
    let shrunk = scene.with_duration(20);
    assert_eq!(shrunk.warnings.len(), 2);
    assert!(matches!(shrunk.warnings[1], Warning::EmptyTrack { .. }));
    let k = shrunk.value.object(ObjectId(1)).unwrap().track().first().unwrap().clone();
    assert_eq!(k.frame, FrameIndex(0));
    assert_eq!(k.pose, ShapePose::default());
}

#[test]
fn set_visible_window_enforces_min_span() {
    let obj = ShapeObject::new(ObjectId(1), ShapeGeometry::default(), ShapePose::default());
    let w = FrameWindow {
        start: FrameIndex(10),
        end: FrameIndex(10),
    };
    let out = obj.set_visible_window(Some(w), 1);
    assert_eq!(out.visible_window.unwrap().end, FrameIndex(11));
    assert_eq!(out.track(), obj.track());
    assert!(out.set_visible_window(None, 1).visible_window.is_none());
}

#[test]
fn insert_object_checks_id_and_range() {
    let scene = Scene::new(20);
    let obj = ShapeObject::new(ObjectId(3), ShapeGeometry::default(), ShapePose::default());
    let scene = scene.insert_object(obj.clone()).unwrap();
    assert!(scene.insert_object(obj).is_err());

    let late = ShapeObject::with_track(
        ObjectId(4),
        ShapeGeometry::default(),
        Track::new(Keyframe::new(FrameIndex(21), ShapePose::default())),
    );
    assert!(scene.insert_object(late).is_err());
    assert_eq!(scene.remove_object(ObjectId(3)).unwrap().objects().len(), 0);
}

#[test]
fn json_round_trip_preserves_scene() {
    let scene = Scene::from_json_str(SCENE).unwrap().value;
    let text = scene.to_json_string().unwrap();
    let again = Scene::from_json_str(&text).unwrap().value;
    assert_eq!(scene, again);
}

#[test]
fn clamp_frame_limits_to_duration() {
    let scene = Scene::new(30);
    assert_eq!(scene.clamp_frame(FrameIndex(45)), FrameIndex(30));
    assert_eq!(scene.clamp_frame(FrameIndex(3)), FrameIndex(3));
}
