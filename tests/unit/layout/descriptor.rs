use super::*;

#[test]
fn builtins_validate() {
    let all = builtin_layouts();
    assert_eq!(all.len(), 6);
    for l in &all {
        l.validate().unwrap();
    }
}

#[test]
fn find_layout_is_case_insensitive() {
    let l = find_layout(" Strip-3 ").unwrap();
    assert_eq!(l.photo_count, 3);
    assert_eq!(l.arrangement, Arrangement::Vertical);
    assert!(find_layout("nope").is_none());
}

#[test]
fn validate_rejects_inconsistent_counts() {
    let zero = LayoutDescriptor::new("z", "Z", 0, Arrangement::Vertical);
    assert!(zero.validate().is_err());
    let grid = LayoutDescriptor::new("g", "G", 3, Arrangement::Grid);
    assert!(grid.validate().is_err());
    let single = LayoutDescriptor::new("s", "S", 2, Arrangement::Single);
    assert!(single.validate().is_err());
}

#[test]
fn validate_checks_hint_product() {
    let mut l = LayoutDescriptor::new("v", "V", 4, Arrangement::Vertical);
    l.columns = Some(1);
    l.rows = Some(4);
    l.validate().unwrap();
    l.rows = Some(3);
    assert!(matches!(l.validate(), Err(StripError::Validation(_))));
    l.rows = Some(0);
    assert!(l.validate().is_err());
}

#[test]
fn grid_shape_fills_missing_hints() {
    let mut l = LayoutDescriptor::new("h", "H", 3, Arrangement::Horizontal);
    assert_eq!(l.grid_shape(), (3, 1));
    l.rows = Some(1);
    assert_eq!(l.grid_shape(), (3, 1));
    let g = find_layout("grid-4").unwrap();
    assert_eq!(g.grid_shape(), (2, 2));
}

#[test]
fn json_uses_lowercase_arrangement() {
    let l: LayoutDescriptor = serde_json::from_str(
        r#"{"id":"x","name":"X","photo_count":2,"arrangement":"horizontal"}"#,
    )
    .unwrap();
    assert_eq!(l.arrangement, Arrangement::Horizontal);
    assert_eq!(l.columns, None);
    let back = serde_json::to_string(&l).unwrap();
    assert!(back.contains(r#""arrangement":"horizontal""#));
    assert!(!back.contains("columns"));
}
