use chrono::TimeZone;

use super::*;

fn placement() -> CaptionPlacement {
    CaptionPlacement {
        center_x: 100.0,
        baseline_y: 92.0,
        font_size: 8.0,
    }
}

#[test]
fn timestamp_caption_format() {
    let at = chrono::Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 0).unwrap();
    assert_eq!(timestamp_caption(&at), "Mar 7, 2024 14:05");
}

#[test]
fn svg_escapes_markup() {
    let canvas = Canvas::new(200, 100).unwrap();
    let svg = caption_svg(canvas, &placement(), "Tom & <Jerry>", Rgba8::BLACK);
    assert!(svg.contains("Tom &amp; &lt;Jerry&gt;"));
    assert!(svg.contains(r##"fill="#000000""##));
    assert!(svg.contains(r#"text-anchor="middle""#));
}

#[test]
fn blank_caption_is_none() {
    let canvas = Canvas::new(200, 100).unwrap();
    let out = rasterize_caption(canvas, &placement(), "  ", Rgba8::BLACK, 1.0).unwrap();
    assert!(out.is_none());
}

#[test]
fn caption_layer_matches_scaled_canvas() {
    let canvas = Canvas::new(200, 100).unwrap();
    let layer = rasterize_caption(canvas, &placement(), "hello", Rgba8::BLACK, 2.0)
        .unwrap()
        .unwrap();
    assert_eq!((layer.width(), layer.height()), (400, 200));
    // Nothing is drawn above the caption band.
    assert_eq!(layer.pixel(10, 10).unwrap(), [0, 0, 0, 0]);
}
