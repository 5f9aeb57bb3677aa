use std::collections::HashMap;

use chrono::TimeZone;

use super::*;
use crate::foundation::color::Rgba8;

fn at() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc.with_ymd_and_hms(2024, 7, 4, 9, 5, 3).unwrap()
}

#[test]
fn filename_uses_timestamp_and_extension() {
    assert_eq!(
        export_filename(&at(), ImageEncoding::Png),
        "photostrip-20240704-090503.png"
    );
    assert_eq!(
        export_filename(&at(), ImageEncoding::Jpeg),
        "photostrip-20240704-090503.jpg"
    );
}

#[test]
fn png_round_trips_straight_pixels() {
    let bmp = Bitmap::solid(3, 2, Rgba8::rgba(200, 100, 50, 128)).unwrap();
    let bytes = encode_bitmap(&bmp, ImageEncoding::Png, 90).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (3, 2));
    let px = decoded.get_pixel(0, 0).0;
    assert_eq!(px[3], 128);
    assert!(px[0].abs_diff(200) <= 2);
}

#[test]
fn jpeg_flattens_transparency_over_white() {
    let bmp = Bitmap::solid(8, 8, Rgba8::rgba(0, 0, 0, 0)).unwrap();
    let file = export_download(
        &bmp,
        &ExportOpts {
            format: ImageEncoding::Jpeg,
            ..ExportOpts::default()
        },
        &at(),
    )
    .unwrap();
    assert_eq!(file.mime, "image/jpeg");
    let decoded = image::load_from_memory(&file.bytes).unwrap().to_rgb8();
    assert!(decoded.get_pixel(4, 4).0.iter().all(|&c| c >= 250));
}

#[test]
fn env_overlay_accepts_valid_and_ignores_invalid() {
    let vars = HashMap::from([
        ("PHOTOSTRIP_EXPORT_SCALE", "2"),
        ("PHOTOSTRIP_EXPORT_FORMAT", "JPEG"),
        ("PHOTOSTRIP_JPEG_QUALITY", "101"),
    ]);
    let opts = ExportOpts::default().overlay(|k| vars.get(k).map(|v| v.to_string()));
    assert_eq!(opts.scale, 2.0);
    assert_eq!(opts.format, ImageEncoding::Jpeg);
    assert_eq!(opts.jpeg_quality, DEFAULT_JPEG_QUALITY);

    let bad = HashMap::from([("PHOTOSTRIP_EXPORT_SCALE", "-1"), ("PHOTOSTRIP_EXPORT_FORMAT", "gif")]);
    let opts = ExportOpts::default().overlay(|k| bad.get(k).map(|v| v.to_string()));
    assert_eq!(opts, ExportOpts::default());
}

#[test]
fn write_to_dir_creates_file() {
    let dir = std::env::temp_dir().join(format!("photostrip-export-{}", std::process::id()));
    let file = ExportedFile {
        filename: "a.png".into(),
        mime: "image/png",
        bytes: vec![1, 2, 3],
    };
    let path = file.write_to_dir(&dir).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    std::fs::remove_dir_all(&dir).unwrap();
}
