//! Display-list backend for interactive previews.
//!
//! The preview path does not rasterize. It turns the same [`StripPlan`] the export backend
//! consumes into absolutely positioned items with CSS `filter` and `transform` strings, so a UI
//! compositor can draw and filter them on the GPU while the geometry stays shared.

use crate::compile::plan::{DrawOp, StripPlan};
use crate::foundation::core::Rect;
use crate::foundation::error::StripResult;
use crate::layout::engine::SlotFit;
use crate::render::backend::StripBackend;

/// Serializable preview of one strip.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PreviewScene {
    /// Canvas width in composition pixels.
    pub width: u32,
    /// Canvas height in composition pixels.
    pub height: u32,
    /// Canvas fill as a hex color.
    pub background: String,
    /// CSS `filter` applied to every photo item.
    pub filter: String,
    /// Items in draw order.
    pub items: Vec<PreviewItem>,
}

/// Axis-aligned box in composition pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PreviewBox {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl From<Rect> for PreviewBox {
    fn from(r: Rect) -> Self {
        Self {
            left: r.x0,
            top: r.y0,
            width: r.width(),
            height: r.height(),
        }
    }
}

/// One positioned element of a [`PreviewScene`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreviewItem {
    /// A filtered photo slot.
    Photo {
        /// Slot index.
        slot: usize,
        /// Index into the composition's photo list.
        photo_index: usize,
        /// Destination box before rotation.
        #[serde(rename = "box")]
        bounds: PreviewBox,
        /// CSS transform, rotating about the box center.
        transform: String,
        /// CSS filter for this element.
        filter: String,
        /// Source-space crop window.
        crop: PreviewBox,
        /// Natural source size.
        natural: (u32, u32),
        /// CSS `object-fit` value.
        object_fit: &'static str,
    },
    /// An unfiltered sticker.
    Sticker {
        /// Sticker id.
        id: String,
        /// Image reference.
        src: String,
        /// Bounds before rotation.
        #[serde(rename = "box")]
        bounds: PreviewBox,
        /// CSS transform, rotating about the box center.
        transform: String,
        /// Stacking order.
        z_index: i32,
    },
    /// Footer text.
    Caption {
        /// Text.
        text: String,
        /// Horizontal center.
        x: f64,
        /// Baseline.
        y: f64,
        /// Font size in composition pixels.
        font_size: f64,
        /// Color as a hex string.
        color: String,
        /// CSS font family.
        font_family: &'static str,
    },
}

/// CSS `transform` for a clockwise rotation about the element center.
pub fn rotate_css(rotation_deg: f64) -> String {
    if rotation_deg == 0.0 {
        "none".to_owned()
    } else {
        format!("rotate({rotation_deg}deg)")
    }
}

fn object_fit(fit: SlotFit) -> &'static str {
    match fit {
        SlotFit::Cover => "cover",
        SlotFit::Stretch => "fill",
    }
}

/// Backend producing a [`PreviewScene`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PreviewBackend;

impl StripBackend for PreviewBackend {
    type Output = PreviewScene;

    fn render_plan(&mut self, plan: &StripPlan) -> StripResult<PreviewScene> {
        let filter = plan.filter.css();
        let items = plan
            .ops
            .iter()
            .map(|op| match op {
                DrawOp::Photo(p) => PreviewItem::Photo {
                    slot: p.slot,
                    photo_index: p.photo_index,
                    bounds: p.dest.into(),
                    transform: rotate_css(p.rotation_deg),
                    filter: filter.clone(),
                    crop: p.crop.into(),
                    natural: (p.image.width(), p.image.height()),
                    object_fit: object_fit(p.fit),
                },
                DrawOp::Sticker(s) => PreviewItem::Sticker {
                    id: s.id.to_string(),
                    src: s.src.clone(),
                    bounds: s.rect.into(),
                    transform: rotate_css(s.rotation_deg),
                    z_index: s.z_index,
                },
                DrawOp::Caption(c) => PreviewItem::Caption {
                    text: c.text.clone(),
                    x: c.placement.center_x,
                    y: c.placement.baseline_y,
                    font_size: c.placement.font_size,
                    color: c.color.to_hex(),
                    font_family: crate::assets::caption::CAPTION_FONT_FAMILY,
                },
            })
            .collect();
        Ok(PreviewScene {
            width: plan.canvas.width,
            height: plan.canvas.height,
            background: plan.background.to_hex(),
            filter,
            items,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
