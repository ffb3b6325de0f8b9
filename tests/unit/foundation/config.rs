use super::*;

#[test]
fn empty_object_is_default() {
    let cfg = EngineConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, EngineConfig::default());
    assert!(cfg.parallax.depth_scale);
    assert_eq!(cfg.parallax.screen_center, Point::new(400.0, 300.0));
    assert_eq!(cfg.transitions.travel_distance, 500.0);
    assert_eq!(cfg.editing.hold_frames, 30);
    assert_eq!(cfg.editing.default_animation.duration, Some(30));
    assert_eq!(cfg.playback.ticks_per_second, 30);
}

#[test]
fn partial_groups_keep_other_defaults() {
    let cfg = EngineConfig::from_reader(
        r#"{"parallax": {"focalStrength": 0.25}, "playback": {"looping": true}}"#.as_bytes(),
    )
    .unwrap();
    assert_eq!(cfg.parallax.focal_strength, 0.25);
    assert_eq!(cfg.parallax.camera_distance, 1000.0);
    assert!(cfg.playback.looping);
    assert_eq!(cfg.editing, EditingConfig::default());
}

#[test]
fn unknown_top_level_keys_are_rejected() {
    let err = EngineConfig::from_reader(r#"{"parallx": {}}"#.as_bytes()).unwrap_err();
    assert!(matches!(err, KeystageError::Validation(_)));
}

#[test]
fn missing_file_is_a_validation_error() {
    let err = EngineConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("open config"));
}
