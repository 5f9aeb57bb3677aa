use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::assets::decode::decode_any;
use crate::foundation::bitmap::Bitmap;
use crate::foundation::error::{StripError, StripResult};
use crate::sticker::model::Sticker;

/// Where a photo's pixels come from.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageSource {
    /// Already decoded (e.g. a captured frame).
    Bitmap(Bitmap),
    /// Encoded image bytes (PNG, JPEG, SVG, ...).
    Bytes(Arc<Vec<u8>>),
    /// Path relative to the loader root.
    Path(String),
}

impl From<Bitmap> for ImageSource {
    fn from(value: Bitmap) -> Self {
        Self::Bitmap(value)
    }
}

/// Resolves image references to decoded bitmaps.
///
/// Sticker `src` strings are looked up in the inline table first, then read from disk relative
/// to `root`.
#[derive(Clone, Debug, Default)]
pub struct AssetLoader {
    root: PathBuf,
    inline: HashMap<String, Bitmap>,
}

impl AssetLoader {
    /// Loader resolving relative paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            inline: HashMap::new(),
        }
    }

    /// Directory relative paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Make an in-memory bitmap available under `key`.
    pub fn register(&mut self, key: impl Into<String>, bitmap: Bitmap) {
        self.inline.insert(key.into(), bitmap);
    }

    /// Builder form of [`AssetLoader::register`].
    pub fn with_inline(mut self, key: impl Into<String>, bitmap: Bitmap) -> Self {
        self.register(key, bitmap);
        self
    }

    /// Decode a photo source.
    pub fn load(&self, source: &ImageSource) -> StripResult<Bitmap> {
        match source {
            ImageSource::Bitmap(b) => Ok(b.clone()),
            ImageSource::Bytes(bytes) => decode_any(bytes),
            ImageSource::Path(p) => self.load_ref(p),
        }
    }

    /// Decode a reference string: an inline key, else a relative path.
    pub fn load_ref(&self, reference: &str) -> StripResult<Bitmap> {
        if let Some(b) = self.inline.get(reference) {
            return Ok(b.clone());
        }
        let bytes = self.read_bytes(reference)?;
        decode_any(&bytes)
    }

    fn read_bytes(&self, reference: &str) -> StripResult<Vec<u8>> {
        let norm = normalize_rel_path(reference)?;
        let path = self.root.join(Path::new(&norm));
        std::fs::read(&path).map_err(|e| {
            StripError::asset_load(format!("read image bytes from '{}': {e}", path.display()))
        })
    }
}

/// Normalize and validate loader-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> StripResult<String> {
    let s = source.trim().replace('\\', "/");
    if s.is_empty() {
        return Err(StripError::validation("asset path must be non-empty"));
    }
    if s.starts_with('/') || s.get(1..2) == Some(":") {
        return Err(StripError::validation(format!(
            "asset path '{source}' must be relative"
        )));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        match part {
            "" | "." => continue,
            ".." => {
                return Err(StripError::validation(format!(
                    "asset path '{source}' must not contain '..'"
                )));
            }
            _ => out.push(part),
        }
    }
    if out.is_empty() {
        return Err(StripError::validation("asset path must contain a file name"));
    }
    Ok(out.join("/"))
}

/// Largest width or height the raster backend accepts for a source image.
pub const MAX_IMAGE_SIDE: u32 = u16::MAX as u32;

fn drawable(bitmap: Bitmap) -> StripResult<Bitmap> {
    if bitmap.width() > MAX_IMAGE_SIDE || bitmap.height() > MAX_IMAGE_SIDE {
        return Err(StripError::asset_load(format!(
            "image is {}x{}, sides are limited to {MAX_IMAGE_SIDE}",
            bitmap.width(),
            bitmap.height()
        )));
    }
    Ok(bitmap)
}

/// Decoded photos and sticker images for one render.
///
/// Loads that fail, and images too large to draw, are logged and left empty; the affected slot or sticker is skipped at draw
/// time instead of failing the render.
#[derive(Clone, Debug, Default)]
pub struct PreparedAssets {
    photos: Vec<Option<Bitmap>>,
    stickers: HashMap<String, Bitmap>,
}

impl PreparedAssets {
    /// Decode every photo and distinct sticker image concurrently.
    ///
    /// Results are stored by index and by `src`, never by completion order.
    pub fn prepare(loader: &AssetLoader, photos: &[ImageSource], stickers: &[Sticker]) -> Self {
        let photos: Vec<Option<Bitmap>> = photos
            .par_iter()
            .enumerate()
            .map(|(index, src)| match loader.load(src).and_then(drawable) {
                Ok(b) => Some(b),
                Err(e) => {
                    tracing::warn!(index, error = %e, "photo failed to load; slot skipped");
                    None
                }
            })
            .collect();

        let srcs: BTreeSet<&str> = stickers.iter().map(|s| s.src.as_str()).collect();
        let srcs: Vec<&str> = srcs.into_iter().collect();
        let stickers: HashMap<String, Bitmap> = srcs
            .par_iter()
            .filter_map(|src| match loader.load_ref(src).and_then(drawable) {
                Ok(b) => Some(((*src).to_owned(), b)),
                Err(e) => {
                    tracing::warn!(src = *src, error = %e, "sticker image failed to load; skipped");
                    None
                }
            })
            .collect();

        tracing::debug!(
            photos = photos.len(),
            photo_failures = photos.iter().filter(|p| p.is_none()).count(),
            stickers = stickers.len(),
            "assets prepared"
        );
        Self { photos, stickers }
    }

    /// Build directly from decoded parts.
    pub fn from_parts(photos: Vec<Option<Bitmap>>, stickers: HashMap<String, Bitmap>) -> Self {
        Self { photos, stickers }
    }

    /// Decoded photo at `index`, if it loaded.
    pub fn photo(&self, index: usize) -> Option<&Bitmap> {
        self.photos.get(index).and_then(Option::as_ref)
    }

    /// Number of photo entries, including failed ones.
    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    /// Decoded sticker image for `src`, if it loaded.
    pub fn sticker(&self, src: &str) -> Option<&Bitmap> {
        self.stickers.get(src)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
