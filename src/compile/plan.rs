use crate::assets::loader::PreparedAssets;
use crate::composition::model::StripComposition;
use crate::filter::applied::AppliedFilterSet;
use crate::filter::transform::{FilterTransform, compute_filter_transform};
use crate::foundation::bitmap::Bitmap;
use crate::foundation::color::Rgba8;
use crate::foundation::core::{Affine, Canvas, Rect, StickerId, Vec2};
use crate::foundation::error::StripResult;
use crate::layout::engine::{CaptionPlacement, Slot, SlotFit, StripLayout};
use crate::sticker::model::{Sticker, draw_order};

/// Share of the shorter photo side used for the border when a single photo gets a frame color.
pub const PHOTO_FRAME_FRACTION: f64 = 0.04;

/// Backend-agnostic description of one strip render.
///
/// `ops` are already in draw order: photo slots, then stickers by ascending z-index, then the
/// caption. Every backend walks the list front to back, so draw order never depends on how or
/// when assets were decoded.
#[derive(Clone, Debug)]
pub struct StripPlan {
    /// Output size at render scale 1.
    pub canvas: Canvas,
    /// Fill under everything else.
    pub background: Rgba8,
    /// Filter applied to every photo op.
    pub filter: FilterTransform,
    /// Draw operations in order.
    pub ops: Vec<DrawOp>,
}

/// Draw operation emitted by the compiler.
#[derive(Clone, Debug)]
pub enum DrawOp {
    /// A filtered photo cropped into a slot.
    Photo(PhotoDraw),
    /// An unfiltered overlay image.
    Sticker(StickerDraw),
    /// Footer text.
    Caption(CaptionDraw),
}

/// One photo slot.
#[derive(Clone, Debug)]
pub struct PhotoDraw {
    /// Slot index in the layout.
    pub slot: usize,
    /// Index into the composition's photo list.
    pub photo_index: usize,
    /// Source pixels.
    pub image: Bitmap,
    /// Source-space window to draw.
    pub crop: Rect,
    /// Destination rectangle before rotation.
    pub dest: Rect,
    /// Clockwise rotation about the destination center.
    pub rotation_deg: f64,
    /// Crop policy the window was derived from.
    pub fit: SlotFit,
    /// Maps source pixels to composition space.
    pub transform: Affine,
}

/// One sticker.
#[derive(Clone, Debug)]
pub struct StickerDraw {
    /// Sticker id.
    pub id: StickerId,
    /// Image reference, as authored.
    pub src: String,
    /// Decoded image.
    pub image: Bitmap,
    /// Unrotated bounds in composition space.
    pub rect: Rect,
    /// Clockwise rotation about the sticker center.
    pub rotation_deg: f64,
    /// Draw order key, kept for display lists.
    pub z_index: i32,
    /// Maps image pixels to composition space.
    pub transform: Affine,
}

/// Footer caption.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionDraw {
    /// Text to draw.
    pub text: String,
    /// Anchor and size.
    pub placement: CaptionPlacement,
    /// Text color.
    pub color: Rgba8,
}

/// Image-to-composition transform for a sticker: center, rotate, draw centered.
pub fn sticker_transform(sticker: &Sticker, image_width: u32, image_height: u32) -> Affine {
    let (w, h) = (sticker.width, sticker.height);
    let sx = w / f64::from(image_width.max(1));
    let sy = h / f64::from(image_height.max(1));
    Affine::translate(sticker.center().to_vec2())
        * Affine::rotate(sticker.rotation_deg.to_radians())
        * Affine::translate(Vec2::new(-w * 0.5, -h * 0.5))
        * Affine::scale_non_uniform(sx, sy)
}

fn photo_op(slot: &Slot, image: &Bitmap) -> DrawOp {
    let crop = slot.crop_window(f64::from(image.width()), f64::from(image.height()));
    DrawOp::Photo(PhotoDraw {
        slot: slot.index,
        photo_index: slot.photo_index,
        image: image.clone(),
        crop,
        dest: slot.rect,
        rotation_deg: slot.rotation_deg,
        fit: slot.fit,
        transform: slot.image_transform(crop),
    })
}

fn sticker_ops(stickers: &[Sticker], assets: &PreparedAssets, ops: &mut Vec<DrawOp>) {
    for s in draw_order(stickers) {
        let Some(image) = assets.sticker(&s.src) else {
            tracing::debug!(id = %s.id, src = s.src.as_str(), "sticker image missing; skipped");
            continue;
        };
        ops.push(DrawOp::Sticker(StickerDraw {
            id: s.id.clone(),
            src: s.src.clone(),
            image: image.clone(),
            rect: s.rect(),
            rotation_deg: s.rotation_deg,
            z_index: s.z_index,
            transform: sticker_transform(s, image.width(), image.height()),
        }));
    }
}

/// Compile a strip composition against its computed layout and decoded assets.
///
/// Pure: identical inputs always yield an identical plan. Slots whose photo failed to decode are
/// omitted and show the background.
pub fn compile_plan(
    comp: &StripComposition,
    layout: &StripLayout,
    assets: &PreparedAssets,
) -> StripPlan {
    let mut ops = Vec::with_capacity(layout.slots.len() + comp.stickers.len() + 1);
    for slot in &layout.slots {
        match assets.photo(slot.photo_index) {
            Some(image) => ops.push(photo_op(slot, image)),
            None => tracing::debug!(
                slot = slot.index,
                photo = slot.photo_index,
                "photo missing; slot left as background"
            ),
        }
    }
    sticker_ops(&comp.stickers, assets, &mut ops);
    if !comp.caption.trim().is_empty() {
        ops.push(DrawOp::Caption(CaptionDraw {
            text: comp.caption.clone(),
            placement: layout.caption,
            color: comp.caption_color,
        }));
    }
    StripPlan {
        canvas: layout.canvas,
        background: comp.fill_color(),
        filter: compute_filter_transform(&comp.filters),
        ops,
    }
}

/// Compile a single photo with its own edits at native resolution.
///
/// Sticker coordinates are in the photo's pixel space. A frame color insets the photo by a
/// border of [`PHOTO_FRAME_FRACTION`] of the shorter side and fills the border with that color.
pub fn compile_photo_plan(
    original: &Bitmap,
    filters: &AppliedFilterSet,
    stickers: &[Sticker],
    frame_color: Option<Rgba8>,
    assets: &PreparedAssets,
) -> StripResult<StripPlan> {
    let canvas = Canvas::new(original.width(), original.height())?;
    let full = canvas.rect();
    let (rect, background) = match frame_color {
        Some(color) => {
            let border = (full.width().min(full.height()) * PHOTO_FRAME_FRACTION).round();
            (full.inset(-border), color)
        }
        None => (full, Rgba8::rgba(0, 0, 0, 0)),
    };
    let slot = Slot {
        index: 0,
        rect,
        rotation_deg: 0.0,
        fit: SlotFit::Cover,
        photo_index: 0,
    };
    let mut ops = vec![photo_op(&slot, original)];
    sticker_ops(stickers, assets, &mut ops);
    Ok(StripPlan {
        canvas,
        background,
        filter: compute_filter_transform(filters),
        ops,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
