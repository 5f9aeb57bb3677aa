use chrono::TimeZone;

use super::*;
use crate::foundation::bitmap::Bitmap;
use crate::foundation::color::Rgba8;
use crate::foundation::core::PhotoId;
use crate::photo::model::Photo;

fn temp_root(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("photostrip-store-{tag}-{}", std::process::id()))
}

fn record(id: &str, minute: u32) -> PhotoRecord {
    let photo = Photo::captured(
        PhotoId::new(id).unwrap(),
        SessionId::new("booth").unwrap(),
        Bitmap::solid(2, 2, Rgba8::rgb(1, 2, 3)).unwrap(),
        chrono::Utc.with_ymd_and_hms(2024, 5, 1, 10, minute, 0).unwrap(),
    );
    PhotoRecord::from_photo(&photo).unwrap()
}

#[test]
fn save_writes_json_and_image_then_lists_them() {
    let root = temp_root("roundtrip");
    let store = DirPhotoStore::new(&root);
    let later = record("booth-0002", 9);
    let earlier = record("booth-0001", 3);
    store.save(&later).unwrap();
    store.save(&earlier).unwrap();

    assert!(root.join("booth/booth-0001.json").is_file());
    assert!(root.join("booth/booth-0001.png").is_file());

    let listed = store.list(&SessionId::new("booth").unwrap()).unwrap();
    assert_eq!(listed, vec![earlier, later]);

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn unknown_session_lists_empty_and_bad_names_fail() {
    let store = DirPhotoStore::new(temp_root("empty"));
    assert!(store.list(&SessionId::new("nobody").unwrap()).unwrap().is_empty());
    let err = store.list(&SessionId::new("../up").unwrap()).unwrap_err();
    assert!(matches!(err, StripError::Store(_)));
}

#[test]
fn photo_ids_cannot_leave_the_session_dir() {
    let root = temp_root("escape");
    let store = DirPhotoStore::new(root.join("store"));
    for id in ["../../escaped", "a/b", "a\\b", ".."] {
        let err = store.save(&record(id, 0)).unwrap_err();
        assert!(matches!(err, StripError::Store(_)), "{id}");
    }
    assert!(!root.join("escaped.png").exists());
    assert!(!root.join("store").exists());
}
