use super::*;

#[test]
fn substitutes_zero_padded_index() {
    let t = FrameTemplate::new("hero/frame_{index}.webp", 1, 365, 4).unwrap();
    assert_eq!(t.frame_count(), 365);
    assert_eq!(t.path_for(0), "hero/frame_0001.webp");
    assert_eq!(t.path_for(364), "hero/frame_0365.webp");
}

#[test]
fn hash_run_sets_pad_width() {
    let t = FrameTemplate::new("seq.###.png", 8, 12, 0).unwrap();
    assert_eq!(t.paths(), vec!["seq.008.png", "seq.009.png", "seq.010.png", "seq.011.png", "seq.012.png"]);
}

#[test]
fn wide_numbers_are_not_truncated() {
    let t = FrameTemplate::new("f{index}.png", 998, 1001, 2).unwrap();
    assert_eq!(t.path_for(3), "f1001.png");
}

#[test]
fn infers_template_from_sample_name() {
    let t = FrameTemplate::from_sample("casatigre_hero_webp/frame_0001.webp", 365).unwrap();
    assert_eq!(t.template, "casatigre_hero_webp/frame_{index}.webp");
    assert_eq!((t.first, t.last, t.pad), (1, 365, 4));
    assert_eq!(t.path_for(99), "casatigre_hero_webp/frame_0100.webp");
}

#[test]
fn rejects_bad_templates() {
    assert!(FrameTemplate::new("frame.webp", 1, 10, 4).is_err());
    assert!(FrameTemplate::new("f{index}.png", 10, 1, 4).is_err());
    assert!(FrameTemplate::from_sample("poster.webp", 10).is_err());
}

#[test]
fn frame_count_is_bounded() {
    let err = FrameTemplate::new("f{index}.png", 0, u32::MAX, 4).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
    assert!(err.to_string().contains("at most"));

    let last = u32::try_from(MAX_FRAMES).unwrap();
    let widest = FrameTemplate::new("f{index}.png", 1, last, 6).unwrap();
    assert_eq!(widest.frame_count(), MAX_FRAMES);
    assert!(FrameTemplate::new("f{index}.png", 0, last, 6).is_err());
}
