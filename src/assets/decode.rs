use crate::foundation::bitmap::Bitmap;
use crate::foundation::error::{StripError, StripResult};

/// Longest side, in pixels, of a rasterized SVG sticker.
pub const SVG_RASTER_PX: u32 = 512;

const MAX_DIM: u32 = 16_384;

/// Decode a raster image (any format the `image` crate knows) into a premultiplied bitmap.
pub fn decode_image(bytes: &[u8]) -> StripResult<Bitmap> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| StripError::asset_load(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Bitmap::from_straight_rgba8(width, height, rgba.into_raw())
}

/// Cheap content sniff for SVG documents.
pub fn is_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

/// Parse an SVG document.
pub fn parse_svg(bytes: &[u8]) -> StripResult<usvg::Tree> {
    let opts = usvg::Options::default();
    usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| StripError::asset_load(format!("parse svg tree: {e}")))
}

/// Rasterize an SVG so its longest side is `max_side` pixels, keeping its aspect ratio.
pub fn rasterize_svg(tree: &usvg::Tree, max_side: u32) -> StripResult<Bitmap> {
    let size = tree.size();
    let (sw, sh) = (size.width(), size.height());
    if !(sw.is_finite() && sh.is_finite()) || sw <= 0.0 || sh <= 0.0 {
        return Err(StripError::asset_load("svg has invalid width/height"));
    }
    let max_side = max_side.clamp(1, MAX_DIM) as f32;
    let k = max_side / sw.max(sh);
    let width = ((sw * k).round() as u32).max(1);
    let height = ((sh * k).round() as u32).max(1);

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| StripError::asset_load("failed to allocate svg pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(
        width as f32 / sw,
        height as f32 / sh,
    );
    resvg::render(tree, xform, &mut pixmap.as_mut());
    Bitmap::from_premul_rgba8(width, height, pixmap.take())
}

/// Decode raster or SVG bytes.
pub fn decode_any(bytes: &[u8]) -> StripResult<Bitmap> {
    if is_svg(bytes) {
        let tree = parse_svg(bytes)?;
        return rasterize_svg(&tree, SVG_RASTER_PX);
    }
    decode_image(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
