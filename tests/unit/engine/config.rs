use super::*;
use crate::animation::section::Property;
use crate::scroll::progress::Overscroll;

#[test]
fn minimal_config_takes_defaults() {
    let cfg = ReelConfig::from_json_str(
        r#"{ "frames": { "template": "hero/frame_{index}.webp", "first": 1, "last": 365 } }"#,
    )
    .unwrap();
    assert_eq!(cfg.frames.frame_count(), 365);
    assert_eq!(cfg.frames.pad, 4);
    assert_eq!(cfg.preload, 5);
    assert_eq!(cfg.lookahead, 3);
    assert_eq!(cfg.loader, StoreOpts::default());
    assert_eq!(cfg.progress, ProgressMapper::default());
    assert_eq!(cfg.render, RenderOpts::default());
    assert!(cfg.section_animator().unwrap().is_empty());
}

#[test]
fn full_config_parses() {
    let cfg = ReelConfig::from_json_str(
        r##"{
            "frames": { "template": "seq/f_###.png", "first": 0, "last": 9, "pad": 3 },
            "preload": 2,
            "lookahead": 1,
            "loader": { "threads": 2, "max_resident": 8 },
            "progress": { "distance_multiplier": 3.0, "overscroll": { "allow": { "cap": 2.0 } } },
            "render": { "cover_margin": 1.0, "crossfade": false },
            "preset": "hero",
            "sections": [
                { "target": "cta", "property": "opacity", "points": [
                    { "at": 0.0, "value": 0.0 },
                    { "at": 1.0, "value": 1.0, "ease": "power1.in" }
                ] }
            ]
        }"##,
    )
    .unwrap();
    assert_eq!(cfg.frames.path_for(7), "seq/f_007.png");
    assert_eq!(cfg.loader.max_resident, Some(8));
    assert_eq!(
        cfg.progress.overscroll,
        Overscroll::Allow { cap: Some(2.0) }
    );
    assert!(!cfg.render.crossfade);
    assert_eq!(cfg.render.clear_rgba, [0, 0, 0, 255]);

    let anim = cfg.section_animator().unwrap();
    let hero = SectionAnimator::hero_preset().unwrap();
    assert_eq!(anim.bindings().len(), hero.bindings().len() + 1);
    assert_eq!(anim.value_of("cta", Property::Opacity, 0.5), Some(0.5));
    assert_eq!(anim.value_of("title", Property::Opacity, 0.0), Some(1.0));
}

#[test]
fn rejects_invalid_values() {
    let base = r#"{ "template": "f{index}.png", "first": 0, "last": 3 }"#;
    let bad = [
        format!(r#"{{ "frames": {{ "template": "f.png", "first": 0, "last": 3 }} }}"#),
        format!(r#"{{ "frames": {{ "template": "f{{index}}.png", "first": 5, "last": 3 }} }}"#),
        format!(r#"{{ "frames": {base}, "loader": {{ "threads": 0 }} }}"#),
        format!(r#"{{ "frames": {base}, "loader": {{ "max_resident": 2 }} }}"#),
        format!(r#"{{ "frames": {base}, "progress": {{ "distance_multiplier": 0.0 }} }}"#),
        format!(r#"{{ "frames": {base}, "render": {{ "cover_margin": 0.5 }} }}"#),
        format!(r#"{{ "frames": {base}, "unknown": 1 }}"#),
    ];
    for json in bad {
        assert!(ReelConfig::from_json_str(&json).is_err(), "accepted: {json}");
    }
}

#[test]
fn duplicate_binding_against_preset_is_rejected() {
    let json = r#"{
        "frames": { "template": "f{index}.png", "first": 0, "last": 3 },
        "preset": "hero",
        "sections": [
            { "target": "title", "property": "opacity", "points": [ { "at": 0.0, "value": 1.0 } ] }
        ]
    }"#;
    let err = ReelConfig::from_json_str(json).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
}

#[test]
fn round_trips_through_json() {
    let mut cfg = ReelConfig::for_frames(FrameTemplate::new("a/{index}.webp", 1, 10, 2).unwrap());
    cfg.preset = Some(SectionPreset::Hero);
    let s = serde_json::to_string(&cfg).unwrap();
    assert_eq!(ReelConfig::from_json_str(&s).unwrap(), cfg);
}

#[test]
fn rejects_inverted_window() {
    let json = r#"{
        "frames": { "template": "f{index}.png", "first": 0, "last": 3 },
        "sections": [
            { "target": "cta", "property": "scale", "window": { "start": 0.8, "end": 0.2 },
              "points": [ { "at": 0.0, "value": 1.0 } ] }
        ]
    }"#;
    assert!(ReelConfig::from_json_str(json).is_err());
}
