use super::*;
use crate::filter::catalog::{AdvancedFilter, BasicFilter};
use crate::foundation::core::StickerId;

fn sticker(x: f64) -> Sticker {
    Sticker {
        id: StickerId::new("s1").unwrap(),
        src: "star.png".to_string(),
        name: String::new(),
        x,
        y: 0.0,
        width: 10.0,
        height: 10.0,
        rotation_deg: 0.0,
        z_index: 1,
    }
}

#[test]
fn identical_edits_share_a_fingerprint() {
    let mut f = AppliedFilterSet::new();
    f.toggle_basic(BasicFilter::Sepia);
    let a = fingerprint_edits(&f, &[sticker(1.0)], None);
    let b = fingerprint_edits(&f.clone(), &[sticker(1.0)], None);
    assert_eq!(a, b);
}

#[test]
fn every_edit_input_changes_the_fingerprint() {
    let base_filters = AppliedFilterSet::new();
    let base = fingerprint_edits(&base_filters, &[sticker(1.0)], None);

    let mut f = base_filters.clone();
    f.set_advanced(AdvancedFilter::Hue, 10.0);
    assert_ne!(fingerprint_edits(&f, &[sticker(1.0)], None), base);
    assert_ne!(fingerprint_edits(&base_filters, &[sticker(2.0)], None), base);
    assert_ne!(fingerprint_edits(&base_filters, &[], None), base);
    assert_ne!(
        fingerprint_edits(&base_filters, &[sticker(1.0)], Some(Rgba8::BLACK)),
        base
    );
}

#[test]
fn basic_toggle_order_does_not_matter() {
    let mut a = AppliedFilterSet::new();
    a.toggle_basic(BasicFilter::Sepia);
    a.toggle_basic(BasicFilter::Grayscale);
    let mut b = AppliedFilterSet::new();
    b.toggle_basic(BasicFilter::Grayscale);
    b.toggle_basic(BasicFilter::Sepia);
    assert_eq!(fingerprint_edits(&a, &[], None), fingerprint_edits(&b, &[], None));
}
