use chrono::TimeZone;

use super::*;
use crate::foundation::bitmap::Bitmap;
use crate::foundation::color::Rgba8;
use crate::foundation::core::PhotoId;
use crate::photo::model::Photo;

fn record(session: &str, id: &str, minute: u32) -> PhotoRecord {
    let photo = Photo::captured(
        PhotoId::new(id).unwrap(),
        SessionId::new(session).unwrap(),
        Bitmap::solid(2, 2, Rgba8::WHITE).unwrap(),
        chrono::Utc.with_ymd_and_hms(2024, 5, 1, 10, minute, 0).unwrap(),
    );
    PhotoRecord::from_photo(&photo).unwrap()
}

#[test]
fn list_is_per_session_and_oldest_first() {
    let store = InMemoryPhotoStore::new();
    store.save(&record("a", "a-2", 5)).unwrap();
    store.save(&record("a", "a-1", 1)).unwrap();
    store.save(&record("b", "b-1", 0)).unwrap();

    let a = store.list(&SessionId::new("a").unwrap()).unwrap();
    assert_eq!(
        a.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
        vec!["a-1", "a-2"]
    );
    assert!(store.list(&SessionId::new("zzz").unwrap()).unwrap().is_empty());
}

#[test]
fn saving_same_id_replaces() {
    let store = InMemoryPhotoStore::new();
    let mut r = record("a", "a-1", 0);
    store.save(&r).unwrap();
    r.shared = true;
    store.save(&r).unwrap();
    let list = store.list(&r.session).unwrap();
    assert_eq!(list.len(), 1);
    assert!(list[0].shared);
}

#[test]
fn injected_failure_is_a_store_error() {
    let store = InMemoryPhotoStore::failing("quota exceeded");
    let err = store.save(&record("a", "a-1", 0)).unwrap_err();
    assert!(matches!(err, StripError::Store(ref m) if m.contains("quota exceeded")));
    assert!(store.list(&SessionId::new("a").unwrap()).unwrap().is_empty());
}
