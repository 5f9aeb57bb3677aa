use chrono::TimeZone;

use super::*;
use crate::filter::catalog::{AdvancedFilter, BasicFilter};
use crate::foundation::core::StickerId;

fn photo() -> Photo {
    let session = SessionId::new("s").unwrap();
    Photo::captured(
        PhotoId::new("s-0001").unwrap(),
        session,
        Bitmap::solid(4, 3, Rgba8::WHITE).unwrap(),
        chrono::Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
    )
}

fn gray() -> Bitmap {
    Bitmap::solid(4, 3, Rgba8::rgb(128, 128, 128)).unwrap()
}

#[test]
fn captured_photo_has_metadata_and_no_processed() {
    let p = photo();
    assert_eq!(
        p.meta(),
        PhotoMeta {
            width: 4,
            height: 3,
            byte_size: 48,
            encoding: ImageEncoding::Png,
        }
    );
    assert!(p.processed().is_none());
    assert!(p.display_bitmap().ptr_eq(p.original()));
    assert!(!p.is_downloaded() && !p.is_shared());
}

#[test]
fn attach_requires_current_fingerprint() {
    let mut p = photo();
    let fp = p.edit_fingerprint();
    p.attach_processed(gray(), fp).unwrap();
    assert!(p.display_bitmap().ptr_eq(p.processed().unwrap()));

    let mut filters = AppliedFilterSet::new();
    filters.toggle_basic(BasicFilter::Sepia);
    p.set_filters(filters);
    assert!(p.processed().is_none());
    assert!(p.display_bitmap().ptr_eq(p.original()));

    let err = p.attach_processed(gray(), fp).unwrap_err();
    assert!(matches!(err, StripError::Validation(_)));
}

#[test]
fn every_edit_invalidates() {
    let mut p = photo();
    let attach = |p: &mut Photo| {
        let fp = p.edit_fingerprint();
        p.attach_processed(gray(), fp).unwrap();
    };

    attach(&mut p);
    p.set_stickers(vec![Sticker {
        id: StickerId::new("a").unwrap(),
        src: "a.png".into(),
        name: String::new(),
        x: 0.0,
        y: 0.0,
        width: 10.0,
        height: 10.0,
        rotation_deg: 0.0,
        z_index: 0,
    }]);
    assert!(p.processed().is_none());

    attach(&mut p);
    p.set_frame_color(Some(Rgba8::BLACK));
    assert!(p.processed().is_none());

    attach(&mut p);
    let mut filters = p.filters().clone();
    filters.set_advanced(AdvancedFilter::Blur, 3.0);
    p.set_filters(filters);
    assert!(p.processed().is_none());
}

#[test]
fn download_and_share_flags() {
    let mut p = photo();
    p.mark_downloaded();
    p.mark_shared(SharePlatform::Pinterest);
    p.mark_shared(SharePlatform::Facebook);
    p.mark_shared(SharePlatform::Pinterest);
    assert!(p.is_downloaded() && p.is_shared());
    assert_eq!(
        p.shared_platforms().collect::<Vec<_>>(),
        vec![SharePlatform::Facebook, SharePlatform::Pinterest]
    );
}
