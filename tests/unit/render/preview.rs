use std::collections::HashMap;

use super::*;
use crate::assets::loader::{ImageSource, PreparedAssets};
use crate::compile::plan::compile_plan;
use crate::composition::model::StripComposition;
use crate::filter::applied::AppliedFilterSet;
use crate::filter::catalog::BasicFilter;
use crate::foundation::bitmap::Bitmap;
use crate::foundation::color::Rgba8;
use crate::foundation::core::StickerId;
use crate::layout::descriptor::find_layout;
use crate::layout::engine::compute_layout;
use crate::sticker::model::Sticker;

fn scene_for(layout_id: &str) -> PreviewScene {
    let desc = find_layout(layout_id).unwrap();
    let photo = Bitmap::solid(64, 48, Rgba8::rgb(10, 20, 30)).unwrap();
    let mut filters = AppliedFilterSet::new();
    filters.toggle_basic(BasicFilter::Grayscale);
    let comp = StripComposition::new(desc.clone(), vec![ImageSource::Bitmap(photo.clone())])
        .with_filters(filters)
        .with_stickers(vec![Sticker {
            id: StickerId::new("heart").unwrap(),
            src: "heart.png".into(),
            name: "Heart".into(),
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 40.0,
            rotation_deg: 15.0,
            z_index: 2,
        }])
        .with_caption("Summer");
    let layout = compute_layout(&desc, 1).unwrap();
    let sticker = Bitmap::solid(8, 8, Rgba8::WHITE).unwrap();
    let assets = PreparedAssets::from_parts(
        vec![Some(photo)],
        HashMap::from([("heart.png".to_string(), sticker)]),
    );
    let plan = compile_plan(&comp, &layout, &assets);
    PreviewBackend.render_plan(&plan).unwrap()
}

#[test]
fn grid_scene_carries_css_strings() {
    let scene = scene_for("grid-4");
    assert_eq!((scene.width, scene.height), (600, 560));
    assert_eq!(scene.background, "#ffffff");
    assert_eq!(scene.filter, "grayscale(100%)");
    assert_eq!(scene.items.len(), 6);

    let PreviewItem::Photo {
        slot,
        photo_index,
        transform,
        filter,
        natural,
        object_fit,
        ..
    } = &scene.items[1]
    else {
        panic!("expected photo item");
    };
    assert_eq!((*slot, *photo_index), (1, 0));
    assert_eq!(transform, "rotate(3deg)");
    assert_eq!(filter, "grayscale(100%)");
    assert_eq!(*natural, (64, 48));
    assert_eq!(*object_fit, "cover");
}

#[test]
fn stickers_and_caption_follow_photos() {
    let scene = scene_for("single");
    let PreviewItem::Sticker {
        id,
        bounds,
        transform,
        z_index,
        ..
    } = &scene.items[1]
    else {
        panic!("expected sticker item");
    };
    assert_eq!(id, "heart");
    assert_eq!(
        *bounds,
        PreviewBox {
            left: 10.0,
            top: 20.0,
            width: 30.0,
            height: 40.0
        }
    );
    assert_eq!(transform, "rotate(15deg)");
    assert_eq!(*z_index, 2);

    let PreviewItem::Caption { text, color, .. } = &scene.items[2] else {
        panic!("expected caption item");
    };
    assert_eq!(text, "Summer");
    assert_eq!(color, "#000000");
}

#[test]
fn horizontal_slots_stretch() {
    let scene = scene_for("row-3");
    let PreviewItem::Photo {
        object_fit,
        transform,
        ..
    } = &scene.items[0]
    else {
        panic!("expected photo item");
    };
    assert_eq!(*object_fit, "fill");
    assert_eq!(transform, "none");
}

#[test]
fn scene_serializes_with_kind_tags() {
    let scene = scene_for("single");
    let json = serde_json::to_value(&scene).unwrap();
    assert_eq!(json["items"][0]["kind"], "photo");
    assert_eq!(json["items"][0]["box"]["left"], 70.0);
    assert_eq!(json["items"][1]["kind"], "sticker");
    assert_eq!(json["items"][2]["kind"], "caption");
}
