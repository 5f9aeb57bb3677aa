use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::ImageEncoder;

use crate::foundation::bitmap::Bitmap;
use crate::foundation::error::{StripError, StripResult};

/// Default JPEG quality when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Raster encoding of an exported image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageEncoding {
    /// Lossless PNG with alpha.
    #[default]
    Png,
    /// JPEG, flattened over white.
    Jpeg,
}

impl ImageEncoding {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// MIME type.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Parse `png`, `jpg` or `jpeg` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

/// Encode a bitmap. `jpeg_quality` is clamped to `1..=100` and ignored for PNG.
pub fn encode_bitmap(
    bitmap: &Bitmap,
    encoding: ImageEncoding,
    jpeg_quality: u8,
) -> StripResult<Vec<u8>> {
    let (w, h) = (bitmap.width(), bitmap.height());
    let straight = bitmap.to_straight_rgba8();
    let mut out = Vec::new();
    match encoding {
        ImageEncoding::Png => image::codecs::png::PngEncoder::new(Cursor::new(&mut out))
            .write_image(&straight, w, h, image::ExtendedColorType::Rgba8)
            .map_err(|e| StripError::export(format!("png encode failed: {e}")))?,
        ImageEncoding::Jpeg => {
            let rgb = flatten_over_white(bitmap.data());
            image::codecs::jpeg::JpegEncoder::new_with_quality(
                Cursor::new(&mut out),
                jpeg_quality.clamp(1, 100),
            )
            .write_image(&rgb, w, h, image::ExtendedColorType::Rgb8)
            .map_err(|e| StripError::export(format!("jpeg encode failed: {e}")))?
        }
    }
    Ok(out)
}

/// Premultiplied RGBA8 to opaque RGB8 over white.
fn flatten_over_white(premul: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(premul.len() / 4 * 3);
    for px in premul.chunks_exact(4) {
        let inv = 255 - u16::from(px[3]);
        for &c in &px[..3] {
            out.push((u16::from(c) + inv).min(255) as u8);
        }
    }
    out
}

/// Export settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportOpts {
    /// Output encoding.
    pub format: ImageEncoding,
    /// JPEG quality, `1..=100`.
    pub jpeg_quality: u8,
    /// Render scale used for the export bitmap.
    pub scale: f64,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            format: ImageEncoding::Png,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            scale: 1.0,
        }
    }
}

impl ExportOpts {
    /// Defaults overlaid with `PHOTOSTRIP_EXPORT_SCALE`, `PHOTOSTRIP_EXPORT_FORMAT` and
    /// `PHOTOSTRIP_JPEG_QUALITY`. Invalid values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    pub(crate) fn overlay(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = var("PHOTOSTRIP_EXPORT_SCALE") {
            match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && v > 0.0 => self.scale = v,
                _ => tracing::warn!(value = raw.as_str(), "ignoring PHOTOSTRIP_EXPORT_SCALE"),
            }
        }
        if let Some(raw) = var("PHOTOSTRIP_EXPORT_FORMAT") {
            match ImageEncoding::parse(&raw) {
                Some(f) => self.format = f,
                None => tracing::warn!(value = raw.as_str(), "ignoring PHOTOSTRIP_EXPORT_FORMAT"),
            }
        }
        if let Some(raw) = var("PHOTOSTRIP_JPEG_QUALITY") {
            match raw.trim().parse::<u8>() {
                Ok(q) if (1..=100).contains(&q) => self.jpeg_quality = q,
                _ => tracing::warn!(value = raw.as_str(), "ignoring PHOTOSTRIP_JPEG_QUALITY"),
            }
        }
        self
    }
}

/// `photostrip-YYYYMMDD-HHMMSS.<ext>` for a local timestamp.
pub fn export_filename<Tz>(at: &chrono::DateTime<Tz>, encoding: ImageEncoding) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "photostrip-{}.{}",
        at.format("%Y%m%d-%H%M%S"),
        encoding.extension()
    )
}

/// An encoded image ready to be saved or shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedFile {
    /// Suggested file name.
    pub filename: String,
    /// MIME type of `bytes`.
    pub mime: &'static str,
    /// Encoded image.
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    /// Write into `dir` under [`ExportedFile::filename`], creating the directory if needed.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> StripResult<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| {
            StripError::export(format!("create export dir '{}': {e}", dir.display()))
        })?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)
            .map_err(|e| StripError::export(format!("write '{}': {e}", path.display())))?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "exported");
        Ok(path)
    }
}

/// Encode a rendered bitmap as a downloadable file named after `at`.
pub fn export_download<Tz>(
    bitmap: &Bitmap,
    opts: &ExportOpts,
    at: &chrono::DateTime<Tz>,
) -> StripResult<ExportedFile>
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let bytes = encode_bitmap(bitmap, opts.format, opts.jpeg_quality)?;
    Ok(ExportedFile {
        filename: export_filename(at, opts.format),
        mime: opts.format.mime(),
        bytes,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/encode.rs"]
mod tests;
