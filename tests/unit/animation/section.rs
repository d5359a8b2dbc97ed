use super::*;

#[derive(Default)]
struct RecordingSink {
    writes: Vec<(String, Property, f64)>,
}

impl PropertySink for RecordingSink {
    fn set_property(&mut self, target: &str, property: Property, value: f64) {
        self.writes.push((target.to_string(), property, value));
    }
}

fn hero() -> SectionAnimator {
    SectionAnimator::hero_preset().unwrap()
}

#[test]
fn title_fades_out_between_forty_and_fifty_percent() {
    let h = hero();
    assert_eq!(h.value_of("title", Property::Opacity, 0.0), Some(1.0));
    assert_eq!(h.value_of("title", Property::Opacity, 0.35), Some(1.0));
    let mid = h.value_of("title", Property::Opacity, 0.45).unwrap();
    assert!((mid - 0.5).abs() < 1e-9);
    assert_eq!(h.value_of("subtitle", Property::Opacity, 0.6), Some(0.0));
}

#[test]
fn scroll_hint_only_visible_at_top() {
    let h = hero();
    assert_eq!(h.value_of("scroll_hint", Property::Opacity, 0.0), Some(1.0));
    assert_eq!(h.value_of("scroll_hint", Property::Opacity, 0.001), Some(0.0));
    assert_eq!(h.value_of("scroll_hint", Property::Opacity, 1.0), Some(0.0));
}

#[test]
fn where_container_slides_then_scales() {
    let h = hero();
    // window [0.5, 1]: local 0.25 is still in the slide phase
    let y = h.value_of("where", Property::TranslateY, 0.625).unwrap();
    assert!((y - 50.0).abs() < 1e-9);
    assert_eq!(h.value_of("where", Property::Scale, 0.625), Some(0.8));

    // local 0.75 is in the scale phase
    assert_eq!(h.value_of("where", Property::TranslateY, 0.875), Some(0.0));
    let s = h.value_of("where", Property::Scale, 0.875).unwrap();
    assert!((s - 1.15).abs() < 1e-9);

    assert_eq!(h.value_of("where", Property::TranslateY, 0.1), Some(100.0));
    assert_eq!(h.value_of("where", Property::Scale, 1.0), Some(1.5));
}

#[test]
fn overscroll_shrinks_background() {
    let h = hero();
    assert_eq!(h.value_of("background", Property::Scale, 1.0), Some(1.0));
    let s = h.value_of("background", Property::Scale, 1.5).unwrap();
    assert!(s < 1.0 && s > 0.3);
    assert_eq!(h.value_of("background", Property::Scale, 3.0), Some(0.3));
    assert_eq!(h.value_of("background", Property::TranslateX, 2.0), Some(20.0));
    assert_eq!(h.value_of("background", Property::Blur, 0.9), Some(30.0));
}

#[test]
fn background_scale_and_drift_are_linear_in_overscroll() {
    let h = hero();
    // scale = max(0.3, 1 - extra * 0.7), drift = extra * 20
    for p in [1.25, 1.5, 1.75, 2.0, 3.0] {
        let extra = p - 1.0;
        let scale = h.value_of("background", Property::Scale, p).unwrap();
        assert!((scale - (1.0 - extra * 0.7).max(0.3)).abs() < 1e-9, "scale at {p}");
        for prop in [Property::TranslateX, Property::TranslateY] {
            let drift = h.value_of("background", prop, p).unwrap();
            assert!((drift - extra * 20.0).abs() < 1e-9, "{prop:?} at {p}");
        }
    }
    let mid = h.value_of("background", Property::Scale, 1.5).unwrap();
    assert!((mid - 0.65).abs() < 1e-9);
}

#[test]
fn apply_writes_only_changed_values() {
    let mut h = hero();
    let mut sink = RecordingSink::default();
    let first = h.apply(0.0, &mut sink);
    assert_eq!(first, h.bindings().len());

    sink.writes.clear();
    assert_eq!(h.apply(0.0, &mut sink), 0);
    assert!(sink.writes.is_empty());

    h.apply(0.2, &mut sink);
    assert!(
        sink.writes
            .iter()
            .any(|(t, p, v)| t == "scroll_hint" && *p == Property::Opacity && *v == 0.0)
    );
    assert!(!sink.writes.iter().any(|(t, _, _)| t == "title"));

    h.invalidate();
    assert_eq!(h.apply(0.2, &mut sink), h.bindings().len());
}

#[test]
fn closures_are_sinks() {
    let mut h = hero();
    let mut n = 0;
    let mut sink = |_: &str, _: Property, _: f64| n += 1;
    h.apply(0.3, &mut sink);
    assert_eq!(n, h.bindings().len());
}

#[test]
fn duplicate_bindings_are_rejected() {
    let c = Curve::constant(1.0);
    let dup = SectionAnimator::new(vec![
        SectionBinding::new("a", Property::Opacity, c.clone()),
        SectionBinding::new("a", Property::Opacity, c.clone()),
    ]);
    assert!(dup.is_err());
    assert!(SectionAnimator::new(vec![SectionBinding::new(" ", Property::Blur, c)]).is_err());
}

#[test]
fn opacity_is_clamped_to_unit_range() {
    let b = SectionBinding::new(
        "x",
        Property::Opacity,
        Curve::linear(&[(0.0, -1.0), (1.0, 2.0)]).unwrap(),
    );
    assert_eq!(b.evaluate(0.0), 0.0);
    assert_eq!(b.evaluate(1.0), 1.0);
}

#[test]
fn binding_deserializes_with_window() {
    let b: SectionBinding = serde_json::from_str(
        r#"{"target":"panel","property":"translate_y",
            "points":[{"at":0.0,"value":100.0},{"at":1.0,"value":0.0}],
            "window":{"start":0.2,"end":0.6}}"#,
    )
    .unwrap();
    assert_eq!(b.property, Property::TranslateY);
    assert!((b.evaluate(0.4) - 50.0).abs() < 1e-9);
}
