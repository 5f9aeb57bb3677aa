use chrono::TimeZone;

use super::*;
use crate::filter::catalog::BasicFilter;
use crate::foundation::bitmap::Bitmap;

fn sample_photo(id: &str, minute: u32) -> Photo {
    let session = SessionId::new("party").unwrap();
    let mut photo = Photo::captured(
        PhotoId::new(id).unwrap(),
        session,
        Bitmap::solid(3, 3, Rgba8::rgb(9, 8, 7)).unwrap(),
        chrono::Utc.with_ymd_and_hms(2024, 5, 1, 10, minute, 0).unwrap(),
    );
    let mut filters = AppliedFilterSet::new();
    filters.toggle_basic(BasicFilter::Sepia);
    photo.set_filters(filters);
    photo.set_frame_color(Some(Rgba8::rgb(255, 0, 0)));
    photo
}

#[test]
fn record_snapshots_photo_and_keeps_bytes_out_of_json() {
    let mut photo = sample_photo("party-0001", 0);
    photo.mark_downloaded();
    let record = PhotoRecord::from_photo(&photo).unwrap();
    assert!(record.downloaded && !record.shared);
    assert_eq!(record.image_extension(), "png");
    assert!(record.image.starts_with(&[0x89, b'P', b'N', b'G']));

    let json = record.to_json().unwrap();
    assert!(json.contains("\"sepia\""));
    assert!(json.contains("#ff0000"));
    assert!(!json.contains("\"image\""));

    let back = PhotoRecord::from_json(&json).unwrap();
    assert!(back.image.is_empty());
    assert_eq!(back.filters, record.filters);
    assert_eq!(back.created_at, record.created_at);
}

#[test]
fn malformed_json_is_a_serde_error() {
    assert!(matches!(
        PhotoRecord::from_json("{"),
        Err(StripError::Serde(_))
    ));
}
