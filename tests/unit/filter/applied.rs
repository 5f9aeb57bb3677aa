use super::*;

#[test]
fn toggle_order_does_not_matter() {
    let mut a = AppliedFilterSet::new();
    a.toggle_basic(BasicFilter::Sepia);
    a.toggle_basic(BasicFilter::Grayscale);

    let mut b = AppliedFilterSet::new();
    b.toggle_basic(BasicFilter::Grayscale);
    b.toggle_basic(BasicFilter::Sepia);

    assert_eq!(a, b);
    let order: Vec<_> = a.basic().collect();
    assert_eq!(order, vec![BasicFilter::Grayscale, BasicFilter::Sepia]);
}

#[test]
fn toggle_twice_turns_off() {
    let mut s = AppliedFilterSet::new();
    assert!(s.toggle_basic(BasicFilter::Invert));
    assert!(!s.toggle_basic(BasicFilter::Invert));
    assert!(s.is_empty());
}

#[test]
fn advanced_values_clamp_to_declared_max() {
    let mut s = AppliedFilterSet::new();
    let max = AdvancedFilter::Blur.bounds().max;
    assert_eq!(s.set_advanced(AdvancedFilter::Blur, max + 50.0), max);
    assert_eq!(s.advanced_value(AdvancedFilter::Blur), 10.0);
    assert_eq!(s.set_advanced(AdvancedFilter::Blur, 15.0), 10.0);
}

#[test]
fn absent_advanced_values_use_defaults_not_zero() {
    let s = AppliedFilterSet::new();
    assert_eq!(s.advanced_value(AdvancedFilter::Brightness), 100.0);
    assert_eq!(s.advanced_value(AdvancedFilter::Opacity), 100.0);
    assert_eq!(s.advanced_value(AdvancedFilter::Hue), 0.0);
}

#[test]
fn unknown_names_are_ignored() {
    let mut s = AppliedFilterSet::new();
    assert_eq!(s.toggle_basic_named("vignette"), None);
    assert_eq!(s.set_advanced_named("sharpness", 3.0), None);
    assert!(s.is_empty());
}

#[test]
fn json_shape_and_lenient_parse() {
    let mut s = AppliedFilterSet::new();
    s.toggle_basic(BasicFilter::HueRotate);
    s.set_advanced(AdvancedFilter::Contrast, 120.0);
    let v = serde_json::to_value(&s).unwrap();
    assert_eq!(
        v,
        serde_json::json!({ "basic": ["hue-rotate"], "advanced": { "contrast": 120.0 } })
    );

    let parsed: AppliedFilterSet = serde_json::from_value(serde_json::json!({
        "basic": ["sepia", "glitter", "grayscale"],
        "advanced": { "blur": 99.0, "sharpen": 2.0 }
    }))
    .unwrap();
    assert_eq!(
        parsed.basic().collect::<Vec<_>>(),
        vec![BasicFilter::Grayscale, BasicFilter::Sepia]
    );
    assert_eq!(parsed.advanced_value(AdvancedFilter::Blur), 10.0);
    assert_eq!(parsed.advanced().count(), 1);
}

#[test]
fn reset_clears_everything() {
    let mut s = AppliedFilterSet::new();
    s.toggle_basic(BasicFilter::Blur);
    s.set_advanced(AdvancedFilter::Hue, 45.0);
    s.reset();
    assert!(s.is_empty());
}
