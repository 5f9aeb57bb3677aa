use chrono::TimeZone;

use super::*;
use crate::assets::loader::ImageSource;
use crate::export::share::RecordingShareTarget;
use crate::filter::applied::AppliedFilterSet;
use crate::filter::catalog::BasicFilter;
use crate::foundation::color::Rgba8;
use crate::foundation::core::{PhotoId, SessionId};
use crate::foundation::error::StripError;
use crate::layout::descriptor::find_layout;
use crate::store::memory::InMemoryPhotoStore;

fn photo() -> Photo {
    Photo::captured(
        PhotoId::new("s-0001").unwrap(),
        SessionId::new("s").unwrap(),
        Bitmap::solid(50, 40, Rgba8::rgb(200, 10, 10)).unwrap(),
        chrono::Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap(),
    )
}

#[test]
fn render_without_photos_fails_fast() {
    let comp = StripComposition::new(find_layout("strip-3").unwrap(), vec![]);
    let err = StripCompositor::default().render(&comp).unwrap_err();
    assert!(matches!(err, StripError::MissingInput(_)));
}

#[test]
fn broken_photo_leaves_background() {
    let comp = StripComposition::new(
        find_layout("strip-2").unwrap(),
        vec![ImageSource::Bytes(std::sync::Arc::new(b"not an image".to_vec()))],
    )
    .with_background(Rgba8::rgb(0, 0, 255));
    let out = StripCompositor::default().render(&comp).unwrap();
    assert_eq!(out.pixel(170, 120), Some([0, 0, 255, 255]));
}

#[test]
fn oversized_photo_is_skipped_not_fatal() {
    let desc = find_layout("strip-2").unwrap();
    let comp = StripComposition::new(
        desc.clone(),
        vec![
            ImageSource::Bitmap(Bitmap::solid(30, 20, Rgba8::rgb(0, 200, 0)).unwrap()),
            ImageSource::Bitmap(Bitmap::solid(70_000, 1, Rgba8::rgb(200, 0, 0)).unwrap()),
        ],
    )
    .with_background(Rgba8::rgb(0, 0, 255));
    let out = StripCompositor::default().render(&comp).unwrap();

    let layout = crate::layout::engine::compute_layout(&desc, 2).unwrap();
    let c0 = layout.slots[0].rect.center();
    let c1 = layout.slots[1].rect.center();
    let green = out.pixel(c0.x as u32, c0.y as u32).unwrap();
    assert!(green[0] <= 2 && green[1].abs_diff(200) <= 2 && green[2] <= 2);
    assert_eq!(out.pixel(c1.x as u32, c1.y as u32), Some([0, 0, 255, 255]));
}

#[test]
fn process_photo_bakes_current_edits() {
    let mut p = photo();
    let mut filters = AppliedFilterSet::new();
    filters.toggle_basic(BasicFilter::Invert);
    p.set_filters(filters);
    StripCompositor::default().process_photo(&mut p).unwrap();

    let processed = p.processed().unwrap();
    assert_eq!((processed.width(), processed.height()), (50, 40));
    let px = processed.pixel(25, 20).unwrap();
    assert!(px[0].abs_diff(55) <= 2 && px[1].abs_diff(245) <= 2);
}

#[test]
fn download_and_share_set_flags() {
    let compositor = StripCompositor::default();
    let mut p = photo();
    let at = chrono::Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap();
    let file = compositor.download_photo(&mut p, &at).unwrap();
    assert_eq!(file.filename, "photostrip-20240203-040506.png");
    assert!(p.is_downloaded());

    let target = RecordingShareTarget::new().rejecting(SharePlatform::Instagram);
    assert!(compositor
        .share_photo(&mut p, SharePlatform::Instagram, "hi", &target)
        .is_err());
    assert!(!p.is_shared());
    compositor
        .share_photo(&mut p, SharePlatform::Email, "hi", &target)
        .unwrap();
    assert!(p.is_shared());
    assert_eq!(target.sent().len(), 1);
}

#[test]
fn store_failure_is_surfaced() {
    let compositor = StripCompositor::default();
    let mut p = photo();
    let err = compositor
        .save_photo(&mut p, &InMemoryPhotoStore::failing("offline"))
        .unwrap_err();
    assert!(matches!(err, StripError::Store(_)));

    let store = InMemoryPhotoStore::new();
    compositor.save_photo(&mut p, &store).unwrap();
    assert_eq!(store.list(p.session()).unwrap().len(), 1);
}
