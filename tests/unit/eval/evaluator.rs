use super::*;

fn scene(json: &str) -> Scene {
    Scene::from_json_str(json).unwrap().value
}

fn no_images() -> HashSet<ObjectId> {
    HashSet::new()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

const LAYERED: &str = r#"{
  "durationFrames": 100,
  "objects": [
    {"id": 1, "keyframes": [{"frame": 0, "depth": 0.2}]},
    {"id": 2, "keyframes": [{"frame": 0, "depth": 0.8}]}
  ]
}"#;

#[test]
fn default_pose_projects_to_screen_center() {
    let s = scene(r#"{"durationFrames": 10, "objects": [{"id": 1, "keyframes": [{"frame": 0}]}]}"#);
    let mut ev = Evaluator::new();
    let out = ev.eval_frame(&s, FrameIndex(0), &EngineConfig::default(), &no_images());
    assert_eq!(out.nodes.len(), 1);
    let t = out.nodes[0].transform;
    assert!(close(t.x, 400.0));
    assert!(close(t.y, 300.0));
    // Depth 0.5 doubles the size.
    assert!(close(t.scale, 2.0));
    assert_eq!(t.opacity, 1.0);
    assert!(!out.nodes[0].placeholder);
}

#[test]
fn nodes_are_ordered_back_to_front() {
    let s = scene(LAYERED);
    let mut ev = Evaluator::new();
    let out = ev.eval_frame(&s, FrameIndex(0), &EngineConfig::default(), &no_images());
    let ids: Vec<_> = out.nodes.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![ObjectId(2), ObjectId(1)]);
}

#[test]
fn frame_is_clamped_to_duration() {
    let s = scene(LAYERED);
    let mut ev = Evaluator::new();
    let out = ev.eval_frame(&s, FrameIndex(1_000), &EngineConfig::default(), &no_images());
    assert_eq!(out.frame, FrameIndex(100));
}

#[test]
fn hidden_outside_window() {
    let s = scene(
        r#"{"durationFrames": 50, "objects": [
            {"id": 1, "keyframes": [{"frame": 0}], "visibleWindow": {"start": 10, "end": 20}}
        ]}"#,
    );
    let cfg = EngineConfig::default();
    let mut ev = Evaluator::new();
    assert!(ev.eval_frame(&s, FrameIndex(5), &cfg, &no_images()).nodes.is_empty());
    assert_eq!(ev.eval_frame(&s, FrameIndex(15), &cfg, &no_images()).nodes.len(), 1);
    assert!(ev.eval_frame(&s, FrameIndex(21), &cfg, &no_images()).nodes.is_empty());
}

#[test]
fn enter_transition_scales_and_fades() {
    let s = scene(
        r#"{"durationFrames": 50, "objects": [
            {"id": 1, "keyframes": [{"frame": 0}], "enter": {"type": "linear", "duration": 10}}
        ]}"#,
    );
    let mut ev = Evaluator::new();
    let out = ev.eval_frame(&s, FrameIndex(5), &EngineConfig::default(), &no_images());
    let t = out.nodes[0].transform;
    assert!(close(t.opacity, 0.5));
    assert!(close(t.scale, 1.0));
}

#[test]
fn slide_offset_is_added_after_projection() {
    let s = scene(
        r#"{"durationFrames": 50, "objects": [
            {"id": 1, "keyframes": [{"frame": 0}],
             "enter": {"type": "linear", "direction": "left", "duration": 10}}
        ]}"#,
    );
    let mut ev = Evaluator::new();
    let out = ev.eval_frame(&s, FrameIndex(5), &EngineConfig::default(), &no_images());
    let t = out.nodes[0].transform;
    assert!(close(t.x, 400.0 - 250.0));
    assert!(close(t.y, 300.0));
    assert_eq!(t.opacity, 1.0);
}

#[test]
fn missing_images_render_as_placeholders() {
    let s = scene(
        r#"{"durationFrames": 10, "objects": [
            {"id": 3, "type": "image", "image": "a.png", "keyframes": [{"frame": 0}]}
        ]}"#,
    );
    let cfg = EngineConfig::default();
    let mut ev = Evaluator::new();
    assert!(ev.eval_frame(&s, FrameIndex(0), &cfg, &no_images()).nodes[0].placeholder);
    let loaded: HashSet<ObjectId> = [ObjectId(3)].into_iter().collect();
    assert!(!ev.eval_frame(&s, FrameIndex(0), &cfg, &loaded).nodes[0].placeholder);
}

#[test]
fn hit_test_prefers_nearest_layer() {
    let s = scene(LAYERED);
    let cfg = EngineConfig::default();
    let mut ev = Evaluator::new();
    assert_eq!(
        ev.hit_test(&s, FrameIndex(0), Point::new(400.0, 300.0), &cfg),
        Some(ObjectId(1))
    );
    // Near layer is 260 px wide, the far one 140 px: only the near one reaches x = 520.
    assert_eq!(
        ev.hit_test(&s, FrameIndex(0), Point::new(520.0, 300.0), &cfg),
        Some(ObjectId(1))
    );
    assert_eq!(ev.hit_test(&s, FrameIndex(0), Point::new(700.0, 300.0), &cfg), None);
}

#[test]
fn repeated_frames_hit_the_memo() {
    let s = scene(LAYERED);
    let cfg = EngineConfig::default();
    let mut ev = Evaluator::new();
    let first = ev.eval_frame(&s, FrameIndex(3), &cfg, &no_images()).clone();
    let (hits_before, _) = ev.memo_stats();
    let second = ev.eval_frame(&s, FrameIndex(3), &cfg, &no_images()).clone();
    let (hits_after, _) = ev.memo_stats();
    assert_eq!(first, second);
    assert!(hits_after > hits_before);
}

#[test]
fn screen_transform_affine_order() {
    let t = ScreenTransform {
        x: 10.0,
        y: 20.0,
        rotation_deg: 90.0,
        scale: 2.0,
        opacity: 1.0,
    };
    let p = t.to_affine() * Point::new(1.0, 0.0);
    assert!(close(p.x, 10.0));
    assert!(close(p.y, 22.0));
}
