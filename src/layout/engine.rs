//! Pure strip geometry.
//!
//! [`compute_layout`] is the only place slot rectangles, crop policy and caption placement are
//! derived. The preview and export render paths both consume its output through the compiled
//! plan, so the two can never disagree on where a photo lands.

use crate::foundation::core::{Affine, Canvas, Point, Rect};
use crate::foundation::error::{StripError, StripResult};
use crate::layout::descriptor::{Arrangement, LayoutDescriptor};

const SINGLE_CANVAS: (u32, u32) = (200, 100);
const SINGLE_SLOT: (f64, f64, f64, f64) = (70.0, 6.0, 130.0, 78.0);
const SINGLE_CAPTION: (f64, f64) = (92.0, 8.0);

const VERTICAL_SLOT: (f64, f64) = (300.0, 200.0);
const VERTICAL_MARGIN: f64 = 20.0;
const VERTICAL_TOP: f64 = 20.0;
const VERTICAL_SPACING: f64 = 10.0;
const VERTICAL_FOOTER: f64 = 60.0;
const VERTICAL_CAPTION_INSET: f64 = 24.0;

const HORIZONTAL_WIDTH: f64 = 960.0;
const HORIZONTAL_HEIGHT: u32 = 320;
const HORIZONTAL_MARGIN: f64 = 20.0;
const HORIZONTAL_SPACING: f64 = 10.0;
const HORIZONTAL_SLOT_HEIGHT: f64 = 240.0;
const HORIZONTAL_CAPTION: f64 = 296.0;

const GRID_CANVAS: (u32, u32) = (600, 560);
const GRID_SLOT: (f64, f64) = (240.0, 180.0);
const GRID_ORIGIN: (f64, f64) = (40.0, 40.0);
const GRID_PITCH: (f64, f64) = (280.0, 230.0);
const GRID_CAPTION: f64 = 530.0;
/// Decorative `(rotation_deg, dx, dy)` per grid slot index.
pub const GRID_JITTER: [(f64, f64, f64); 4] = [
    (-4.0, -6.0, 8.0),
    (3.0, 8.0, -4.0),
    (2.0, -4.0, 10.0),
    (-3.0, 6.0, 4.0),
];

const CAPTION_SIZE: f64 = 16.0;

/// How a source image is mapped into its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotFit {
    /// Crop a centered window with the slot's aspect ratio, then scale to fill.
    Cover,
    /// Scale the whole source to the slot, ignoring aspect ratio.
    Stretch,
}

/// One photo destination in composition coordinates.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Slot {
    /// Position in the layout.
    pub index: usize,
    /// Destination rectangle before rotation.
    pub rect: Rect,
    /// Clockwise rotation about the rectangle center.
    pub rotation_deg: f64,
    /// Crop policy.
    pub fit: SlotFit,
    /// Index of the photo drawn here; unfilled slots reuse photo 0.
    pub photo_index: usize,
}

impl Slot {
    /// Rotation pivot.
    pub fn center(&self) -> Point {
        self.rect.center()
    }

    /// Rotation about [`Slot::center`]; identity when unrotated.
    pub fn rotation(&self) -> Affine {
        if self.rotation_deg == 0.0 {
            return Affine::IDENTITY;
        }
        Affine::rotate_about(self.rotation_deg.to_radians(), self.center())
    }

    /// Source-space window to sample for an image of the given size.
    pub fn crop_window(&self, src_width: f64, src_height: f64) -> Rect {
        match self.fit {
            SlotFit::Stretch => Rect::new(0.0, 0.0, src_width, src_height),
            SlotFit::Cover => {
                centered_crop(src_width, src_height, self.rect.width() / self.rect.height())
            }
        }
    }

    /// Maps source pixels inside `crop` onto the (rotated) slot rectangle.
    pub fn image_transform(&self, crop: Rect) -> Affine {
        let sx = self.rect.width() / crop.width().max(f64::EPSILON);
        let sy = self.rect.height() / crop.height().max(f64::EPSILON);
        self.rotation()
            * Affine::translate((self.rect.x0, self.rect.y0))
            * Affine::scale_non_uniform(sx, sy)
            * Affine::translate((-crop.x0, -crop.y0))
    }
}

/// Largest window of aspect `target_aspect` (width / height) centered in a `src_width` x
/// `src_height` image. Wider sources lose equal margins left and right, taller ones top and
/// bottom.
pub fn centered_crop(src_width: f64, src_height: f64, target_aspect: f64) -> Rect {
    if src_width <= 0.0 || src_height <= 0.0 || !target_aspect.is_finite() || target_aspect <= 0.0
    {
        return Rect::new(0.0, 0.0, src_width.max(0.0), src_height.max(0.0));
    }
    let src_aspect = src_width / src_height;
    if src_aspect > target_aspect {
        let w = src_height * target_aspect;
        let x0 = (src_width - w) * 0.5;
        Rect::new(x0, 0.0, x0 + w, src_height)
    } else {
        let h = src_width / target_aspect;
        let y0 = (src_height - h) * 0.5;
        Rect::new(0.0, y0, src_width, y0 + h)
    }
}

/// Footer caption placement. Text is centered horizontally on `center_x`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CaptionPlacement {
    /// Horizontal anchor.
    pub center_x: f64,
    /// Text baseline.
    pub baseline_y: f64,
    /// Font size in composition pixels.
    pub font_size: f64,
}

/// Canvas size, slots and caption placement for one strip.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StripLayout {
    /// Output size at render scale 1.
    pub canvas: Canvas,
    /// Slots in layout order.
    pub slots: Vec<Slot>,
    /// Footer caption.
    pub caption: CaptionPlacement,
}

/// Compute strip geometry for `photo_count` supplied photos.
///
/// The slot count comes from the descriptor. Slots past `photo_count` are filled with photo 0.
pub fn compute_layout(desc: &LayoutDescriptor, photo_count: usize) -> StripResult<StripLayout> {
    desc.validate()?;
    if photo_count == 0 {
        return Err(StripError::missing_input(format!(
            "layout '{}' needs at least one photo",
            desc.id
        )));
    }
    let n = desc.photo_count as usize;
    let source = |i: usize| if i < photo_count { i } else { 0 };

    let layout = match desc.arrangement {
        Arrangement::Single => {
            let (x0, y0, x1, y1) = SINGLE_SLOT;
            let canvas = Canvas::new(SINGLE_CANVAS.0, SINGLE_CANVAS.1)?;
            StripLayout {
                canvas,
                slots: vec![Slot {
                    index: 0,
                    rect: Rect::new(x0, y0, x1, y1),
                    rotation_deg: 0.0,
                    fit: SlotFit::Cover,
                    photo_index: 0,
                }],
                caption: caption_at(canvas, SINGLE_CAPTION.0, SINGLE_CAPTION.1),
            }
        }
        Arrangement::Vertical => {
            let (sw, sh) = VERTICAL_SLOT;
            let width = sw + 2.0 * VERTICAL_MARGIN;
            let height = VERTICAL_TOP
                + n as f64 * sh
                + n.saturating_sub(1) as f64 * VERTICAL_SPACING
                + VERTICAL_FOOTER;
            let canvas = canvas_from_f64(width, height)?;
            let slots = (0..n)
                .map(|i| {
                    let y = VERTICAL_TOP + i as f64 * (sh + VERTICAL_SPACING);
                    Slot {
                        index: i,
                        rect: Rect::new(VERTICAL_MARGIN, y, VERTICAL_MARGIN + sw, y + sh),
                        rotation_deg: 0.0,
                        fit: SlotFit::Cover,
                        photo_index: source(i),
                    }
                })
                .collect();
            StripLayout {
                canvas,
                slots,
                caption: caption_at(canvas, height - VERTICAL_CAPTION_INSET, CAPTION_SIZE),
            }
        }
        Arrangement::Horizontal => {
            let gaps = n.saturating_sub(1) as f64 * HORIZONTAL_SPACING;
            let sw = (HORIZONTAL_WIDTH - 2.0 * HORIZONTAL_MARGIN - gaps) / n as f64;
            if sw <= 0.0 {
                return Err(StripError::validation(format!(
                    "layout '{}': {n} photos do not fit side by side",
                    desc.id
                )));
            }
            let canvas = canvas_from_f64(HORIZONTAL_WIDTH, f64::from(HORIZONTAL_HEIGHT))?;
            let slots = (0..n)
                .map(|i| {
                    let x = HORIZONTAL_MARGIN + i as f64 * (sw + HORIZONTAL_SPACING);
                    Slot {
                        index: i,
                        rect: Rect::new(
                            x,
                            HORIZONTAL_MARGIN,
                            x + sw,
                            HORIZONTAL_MARGIN + HORIZONTAL_SLOT_HEIGHT,
                        ),
                        rotation_deg: 0.0,
                        fit: SlotFit::Stretch,
                        photo_index: source(i),
                    }
                })
                .collect();
            StripLayout {
                canvas,
                slots,
                caption: caption_at(canvas, HORIZONTAL_CAPTION, CAPTION_SIZE),
            }
        }
        Arrangement::Grid => {
            let canvas = Canvas::new(GRID_CANVAS.0, GRID_CANVAS.1)?;
            let (sw, sh) = GRID_SLOT;
            let slots = GRID_JITTER
                .iter()
                .enumerate()
                .map(|(i, &(rot, dx, dy))| {
                    let (col, row) = ((i % 2) as f64, (i / 2) as f64);
                    let x = GRID_ORIGIN.0 + col * GRID_PITCH.0 + dx;
                    let y = GRID_ORIGIN.1 + row * GRID_PITCH.1 + dy;
                    Slot {
                        index: i,
                        rect: Rect::new(x, y, x + sw, y + sh),
                        rotation_deg: rot,
                        fit: SlotFit::Cover,
                        photo_index: source(i),
                    }
                })
                .collect();
            StripLayout {
                canvas,
                slots,
                caption: caption_at(canvas, GRID_CAPTION, CAPTION_SIZE),
            }
        }
    };

    tracing::debug!(
        layout = desc.id.as_str(),
        width = layout.canvas.width,
        height = layout.canvas.height,
        slots = layout.slots.len(),
        "layout computed"
    );
    Ok(layout)
}

fn caption_at(canvas: Canvas, baseline_y: f64, font_size: f64) -> CaptionPlacement {
    CaptionPlacement {
        center_x: f64::from(canvas.width) * 0.5,
        baseline_y,
        font_size,
    }
}

fn canvas_from_f64(width: f64, height: f64) -> StripResult<Canvas> {
    let range = 1.0..=f64::from(u32::MAX);
    let (w, h) = (width.round(), height.round());
    if !range.contains(&w) || !range.contains(&h) {
        return Err(StripError::validation("layout canvas size out of range"));
    }
    Canvas::new(w as u32, h as u32)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
