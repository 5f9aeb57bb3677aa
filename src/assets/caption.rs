use std::sync::{Arc, OnceLock};

use crate::foundation::bitmap::Bitmap;
use crate::foundation::color::Rgba8;
use crate::foundation::core::Canvas;
use crate::foundation::error::{StripError, StripResult};
use crate::layout::engine::CaptionPlacement;

/// Font family stack used for footer captions.
pub const CAPTION_FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";

/// Default footer text: the local capture date and time.
pub fn timestamp_caption<Tz>(at: &chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.format("%b %-d, %Y %H:%M").to_string()
}

fn caption_fontdb() -> Arc<usvg::fontdb::Database> {
    static DB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "caption font database loaded");
        Arc::new(db)
    })
    .clone()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

/// SVG document drawing `text` at `placement` on a canvas-sized viewport.
pub fn caption_svg(canvas: Canvas, placement: &CaptionPlacement, text: &str, color: Rgba8) -> String {
    let opacity = f64::from(color.a) / 255.0;
    let fill = Rgba8::rgb(color.r, color.g, color.b).to_hex();
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<text x="{x}" y="{y}" font-family="{family}" font-size="{size}" "#,
            r#"text-anchor="middle" fill="{fill}" fill-opacity="{opacity}">{text}</text></svg>"#
        ),
        w = canvas.width,
        h = canvas.height,
        x = placement.center_x,
        y = placement.baseline_y,
        family = CAPTION_FONT_FAMILY,
        size = placement.font_size,
        fill = fill,
        opacity = opacity,
        text = escape_xml(text),
    )
}

/// Rasterize a caption into a transparent layer covering the whole scaled canvas.
///
/// Returns `None` for blank text. Missing system fonts produce an empty layer, not an error.
pub fn rasterize_caption(
    canvas: Canvas,
    placement: &CaptionPlacement,
    text: &str,
    color: Rgba8,
    scale: f64,
) -> StripResult<Option<Bitmap>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let svg = caption_svg(canvas, placement, text, color);
    let opts = usvg::Options {
        fontdb: caption_fontdb(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(&svg, &opts)
        .map_err(|e| StripError::render(format!("caption svg: {e}")))?;

    let (w, h) = canvas.scaled(scale);
    let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| StripError::render("failed to allocate caption pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(
        w as f32 / canvas.width as f32,
        h as f32 / canvas.height as f32,
    );
    resvg::render(&tree, xform, &mut pixmap.as_mut());
    Bitmap::from_premul_rgba8(w, h, pixmap.take()).map(Some)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/caption.rs"]
mod tests;
