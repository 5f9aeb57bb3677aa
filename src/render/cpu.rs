use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::caption::rasterize_caption;
use crate::compile::plan::{DrawOp, StripPlan};
use crate::foundation::bitmap::Bitmap;
use crate::foundation::core::{Affine, Rect};
use crate::foundation::error::{StripError, StripResult};
use crate::render::backend::StripBackend;
use crate::render::composite::{fill_in_place, over_in_place};

/// Options for the CPU export backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CpuBackendOpts {
    /// Output pixels per composition pixel.
    pub scale: f64,
}

impl Default for CpuBackendOpts {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl CpuBackendOpts {
    /// Return options with a different render scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

/// Export backend rasterizing a [`StripPlan`] with `vello_cpu`.
///
/// Each photo slot is drawn into its own transparent layer, filtered there, then composited
/// over the strip, so a filter never touches the background or neighbouring slots. Consecutive
/// stickers share one layer since they are unfiltered.
pub struct CpuBackend {
    opts: CpuBackendOpts,
    ctx: Option<vello_cpu::RenderContext>,
}

impl std::fmt::Debug for CpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuBackend")
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new(CpuBackendOpts::default())
    }
}

impl CpuBackend {
    /// Create a backend.
    pub fn new(opts: CpuBackendOpts) -> Self {
        Self { opts, ctx: None }
    }

    /// Active options.
    pub fn opts(&self) -> CpuBackendOpts {
        self.opts
    }

    fn draw_layer(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> StripResult<()>,
    ) -> StripResult<Vec<u8>> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        f(&mut ctx)?;
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);
        Ok(pixmap.data_as_u8_slice().to_vec())
    }
}

impl StripBackend for CpuBackend {
    type Output = Bitmap;

    #[tracing::instrument(level = "debug", skip_all, fields(ops = plan.ops.len(), scale = self.opts.scale))]
    fn render_plan(&mut self, plan: &StripPlan) -> StripResult<Bitmap> {
        let scale = self.opts.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(StripError::validation(format!(
                "render scale must be finite and > 0, got {scale}"
            )));
        }
        let (w, h) = plan.canvas.scaled(scale);
        let w16 = u16::try_from(w)
            .map_err(|_| StripError::render(format!("output width {w} exceeds {}", u16::MAX)))?;
        let h16 = u16::try_from(h)
            .map_err(|_| StripError::render(format!("output height {h} exceeds {}", u16::MAX)))?;
        let base = Affine::scale_non_uniform(
            f64::from(w) / f64::from(plan.canvas.width),
            f64::from(h) / f64::from(plan.canvas.height),
        );

        let mut dst = vec![0u8; (w as usize) * (h as usize) * 4];
        fill_in_place(&mut dst, plan.background.to_premul());
        let mut paints = PaintCache::default();

        let mut i = 0usize;
        while i < plan.ops.len() {
            match &plan.ops[i] {
                DrawOp::Photo(p) => {
                    let paint = paints.get(&p.image)?;
                    let mut layer = self.draw_layer(w16, h16, |ctx| {
                        draw_image(ctx, paint, base * p.transform, p.crop)
                    })?;
                    plan.filter.apply_premul(&mut layer, w, h, scale)?;
                    over_in_place(&mut dst, &layer, 1.0)?;
                    i += 1;
                }
                DrawOp::Sticker(_) => {
                    let end = plan.ops[i..]
                        .iter()
                        .position(|op| !matches!(op, DrawOp::Sticker(_)))
                        .map_or(plan.ops.len(), |n| i + n);
                    let run = &plan.ops[i..end];
                    let layer = self.draw_layer(w16, h16, |ctx| {
                        for op in run {
                            let DrawOp::Sticker(s) = op else { continue };
                            let paint = paints.get(&s.image)?;
                            let bounds = Rect::new(
                                0.0,
                                0.0,
                                f64::from(s.image.width()),
                                f64::from(s.image.height()),
                            );
                            draw_image(ctx, paint, base * s.transform, bounds)?;
                        }
                        Ok(())
                    })?;
                    over_in_place(&mut dst, &layer, 1.0)?;
                    i = end;
                }
                DrawOp::Caption(c) => {
                    if let Some(layer) =
                        rasterize_caption(plan.canvas, &c.placement, &c.text, c.color, scale)?
                    {
                        over_in_place(&mut dst, layer.data(), 1.0)?;
                    }
                    i += 1;
                }
            }
        }

        Bitmap::from_premul_rgba8(w, h, dst)
    }
}

/// Draw `src_rect` of an image paint through `transform`, restoring the identity transform
/// afterwards whether or not the draw succeeded.
fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    paint: vello_cpu::Image,
    transform: Affine,
    src_rect: Rect,
) -> StripResult<()> {
    with_transform(ctx, transform, |ctx| {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            src_rect.x0,
            src_rect.y0,
            src_rect.x1,
            src_rect.y1,
        ));
        Ok(())
    })
}

fn with_transform<R>(
    ctx: &mut vello_cpu::RenderContext,
    transform: Affine,
    f: impl FnOnce(&mut vello_cpu::RenderContext) -> StripResult<R>,
) -> StripResult<R> {
    ctx.set_transform(affine_to_cpu(transform));
    let out = f(ctx);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    out
}

/// Image paints keyed by pixel allocation, so a photo reused by several slots converts once.
#[derive(Default)]
struct PaintCache {
    by_ptr: HashMap<usize, vello_cpu::Image>,
}

impl PaintCache {
    fn get(&mut self, bitmap: &Bitmap) -> StripResult<vello_cpu::Image> {
        let key = bitmap.data().as_ptr() as usize;
        if let Some(p) = self.by_ptr.get(&key) {
            return Ok(p.clone());
        }
        let pixmap = pixmap_from_bitmap(bitmap)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.by_ptr.insert(key, paint.clone());
        Ok(paint)
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_bitmap(bitmap: &Bitmap) -> StripResult<vello_cpu::Pixmap> {
    let w: u16 = bitmap
        .width()
        .try_into()
        .map_err(|_| StripError::render("image width exceeds u16"))?;
    let h: u16 = bitmap
        .height()
        .try_into()
        .map_err(|_| StripError::render("image height exceeds u16"))?;
    let pixels = bitmap
        .data()
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    let may_have_opacities = bitmap.data().chunks_exact(4).any(|px| px[3] != 255);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
