use super::*;

#[test]
fn rejects_mismatched_buffers() {
    assert!(Bitmap::from_premul_rgba8(2, 2, vec![0; 15]).is_err());
    assert!(Bitmap::from_premul_rgba8(0, 2, vec![]).is_err());
    assert!(Bitmap::from_premul_rgba8(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn solid_fill_and_pixel_lookup() {
    let b = Bitmap::solid(3, 2, Rgba8::rgb(10, 20, 30)).unwrap();
    assert_eq!(b.pixel(2, 1), Some([10, 20, 30, 255]));
    assert_eq!(b.pixel(3, 0), None);
    assert_eq!(b.byte_len(), 24);
    assert!((b.aspect() - 1.5).abs() < 1e-12);
}

#[test]
fn straight_roundtrip_keeps_opaque_pixels() {
    let straight = vec![1u8, 2, 3, 255, 4, 5, 6, 255];
    let b = Bitmap::from_straight_rgba8(2, 1, straight.clone()).unwrap();
    assert_eq!(b.to_straight_rgba8(), straight);
}

#[test]
fn clones_share_pixels() {
    let a = Bitmap::solid(4, 4, Rgba8::BLACK).unwrap();
    let b = a.clone();
    assert!(a.ptr_eq(&b));
}
