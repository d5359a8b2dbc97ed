use super::*;

#[test]
fn zero_offset_is_zero_progress() {
    for h in [1.0, 600.0, 1080.0] {
        for m in [0.5, 1.0, 2.0, 3.5] {
            assert_eq!(progress(0.0, h, m, false), 0.0);
            assert_eq!(progress(0.0, h, m, true), 0.0);
        }
    }
}

#[test]
fn clamped_progress_stays_in_unit_range_and_is_monotonic() {
    let mut prev = 0.0;
    for step in 0..500 {
        let offset = f64::from(step) * 13.0;
        let p = progress(offset, 1080.0, 2.0, false);
        assert!((0.0..=1.0).contains(&p), "offset {offset} gave {p}");
        assert!(p >= prev);
        prev = p;
    }
    assert_eq!(prev, 1.0);
}

#[test]
fn overscroll_passes_values_above_one() {
    assert_eq!(progress(4320.0, 1080.0, 2.0, true), 2.0);
    assert_eq!(progress(4320.0, 1080.0, 2.0, false), 1.0);
}

#[test]
fn negative_offsets_and_degenerate_distances_map_to_zero() {
    assert_eq!(progress(-50.0, 1080.0, 2.0, true), 0.0);
    assert_eq!(progress(500.0, 0.0, 2.0, false), 0.0);
    assert_eq!(progress(500.0, 1080.0, -1.0, false), 0.0);
    assert_eq!(progress(f64::NAN, 1080.0, 1.0, false), 0.0);
}

#[test]
fn mapper_applies_overscroll_cap() {
    let m = ProgressMapper::new(1.0, Overscroll::Allow { cap: Some(1.5) }).unwrap();
    assert_eq!(m.map(540.0, 1080.0), 0.5);
    assert_eq!(m.map(5000.0, 1080.0), 1.5);

    let uncapped = ProgressMapper::new(1.0, Overscroll::Allow { cap: None }).unwrap();
    assert_eq!(uncapped.map(3240.0, 1080.0), 3.0);
}

#[test]
fn mapper_is_referentially_transparent() {
    let m = ProgressMapper::default();
    let a = m.map(777.0, 900.0);
    let _ = m.map(100.0, 900.0);
    assert_eq!(m.map(777.0, 900.0), a);
}

#[test]
fn mapper_rejects_bad_policy() {
    assert!(ProgressMapper::new(0.0, Overscroll::Clamp).is_err());
    assert!(ProgressMapper::new(1.0, Overscroll::Allow { cap: Some(0.5) }).is_err());
}

#[test]
fn overscroll_serde_shape() {
    let m: ProgressMapper =
        serde_json::from_str(r#"{"distance_multiplier":3.0,"overscroll":{"allow":{"cap":2.0}}}"#)
            .unwrap();
    assert_eq!(m.overscroll, Overscroll::Allow { cap: Some(2.0) });
    let c: ProgressMapper = serde_json::from_str(r#"{"overscroll":"clamp"}"#).unwrap();
    assert_eq!(c.distance_multiplier, 2.0);
    assert_eq!(c.overscroll, Overscroll::Clamp);
}
