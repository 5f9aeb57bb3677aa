use std::collections::HashMap;

use super::*;
use crate::assets::loader::PreparedAssets;
use crate::compile::plan::compile_photo_plan;
use crate::filter::applied::AppliedFilterSet;
use crate::filter::catalog::BasicFilter;
use crate::foundation::color::Rgba8;
use crate::foundation::core::StickerId;
use crate::sticker::model::Sticker;

fn red(w: u32, h: u32) -> Bitmap {
    Bitmap::solid(w, h, Rgba8::rgb(200, 10, 10)).unwrap()
}

fn assert_px_near(bmp: &Bitmap, x: u32, y: u32, want: [u8; 4]) {
    let got = bmp.pixel(x, y).unwrap();
    for (g, w) in got.iter().zip(want) {
        assert!(
            g.abs_diff(w) <= 2,
            "pixel ({x},{y}) = {got:?}, want {want:?}"
        );
    }
}

fn render(plan: &StripPlan, scale: f64) -> StripResult<Bitmap> {
    CpuBackend::new(CpuBackendOpts::default().with_scale(scale)).render_plan(plan)
}

#[test]
fn frame_border_surrounds_photo() {
    let plan = compile_photo_plan(
        &red(100, 50),
        &AppliedFilterSet::new(),
        &[],
        Some(Rgba8::BLACK),
        &PreparedAssets::default(),
    )
    .unwrap();
    let out = render(&plan, 1.0).unwrap();
    assert_eq!((out.width(), out.height()), (100, 50));
    assert_px_near(&out, 0, 0, [0, 0, 0, 255]);
    assert_px_near(&out, 50, 25, [200, 10, 10, 255]);
}

#[test]
fn filter_only_touches_photo_layer() {
    let mut filters = AppliedFilterSet::new();
    filters.toggle_basic(BasicFilter::Invert);
    let plan = compile_photo_plan(
        &red(100, 50),
        &filters,
        &[],
        Some(Rgba8::BLACK),
        &PreparedAssets::default(),
    )
    .unwrap();
    let out = render(&plan, 1.0).unwrap();
    assert_px_near(&out, 0, 0, [0, 0, 0, 255]);
    assert_px_near(&out, 50, 25, [55, 245, 245, 255]);
}

#[test]
fn stickers_draw_over_photo() {
    let blue = Bitmap::solid(10, 10, Rgba8::rgb(0, 0, 255)).unwrap();
    let assets = PreparedAssets::from_parts(vec![], HashMap::from([("dot".to_string(), blue)]));
    let sticker = Sticker {
        id: StickerId::new("s1").unwrap(),
        src: "dot".into(),
        name: String::new(),
        x: 10.0,
        y: 10.0,
        width: 20.0,
        height: 20.0,
        rotation_deg: 0.0,
        z_index: 1,
    };
    let plan =
        compile_photo_plan(&red(100, 50), &AppliedFilterSet::new(), &[sticker], None, &assets)
            .unwrap();
    let out = render(&plan, 1.0).unwrap();
    assert_px_near(&out, 20, 20, [0, 0, 255, 255]);
    assert_px_near(&out, 60, 30, [200, 10, 10, 255]);
}

#[test]
fn scale_multiplies_output_size() {
    let plan = compile_photo_plan(
        &red(100, 50),
        &AppliedFilterSet::new(),
        &[],
        None,
        &PreparedAssets::default(),
    )
    .unwrap();
    let out = render(&plan, 2.0).unwrap();
    assert_eq!((out.width(), out.height()), (200, 100));
    assert_px_near(&out, 150, 80, [200, 10, 10, 255]);
}

#[test]
fn invalid_scale_is_rejected() {
    let plan = compile_photo_plan(
        &red(4, 4),
        &AppliedFilterSet::new(),
        &[],
        None,
        &PreparedAssets::default(),
    )
    .unwrap();
    assert!(matches!(render(&plan, 0.0), Err(StripError::Validation(_))));
    assert!(matches!(render(&plan, f64::NAN), Err(StripError::Validation(_))));
}

#[test]
fn rendering_twice_is_identical() {
    let plan = compile_photo_plan(
        &red(40, 30),
        &AppliedFilterSet::new(),
        &[],
        Some(Rgba8::rgb(10, 200, 30)),
        &PreparedAssets::default(),
    )
    .unwrap();
    let mut backend = CpuBackend::default();
    let a = backend.render_plan(&plan).unwrap();
    let b = backend.render_plan(&plan).unwrap();
    assert_eq!(a.data(), b.data());
}
