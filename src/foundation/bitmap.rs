use std::sync::Arc;

use crate::foundation::color::Rgba8;
use crate::foundation::error::{StripError, StripResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// An immutable raster image as premultiplied RGBA8, row-major and tightly packed.
///
/// Pixel storage is shared behind an `Arc`, so cloning a bitmap (into a [`crate::Photo`], a
/// strip composition or a prepared asset table) never copies pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Arc<Vec<u8>>,
}

impl Bitmap {
    /// Wrap premultiplied RGBA8 bytes. The buffer length must be `width * height * 4`.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> StripResult<Self> {
        if width == 0 || height == 0 {
            return Err(StripError::validation("bitmap width/height must be > 0"));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| StripError::validation("bitmap size overflow"))?;
        if data.len() != expected {
            return Err(StripError::validation(format!(
                "bitmap byte len mismatch: expected {expected}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data: Arc::new(data),
        })
    }

    /// Premultiply straight-alpha RGBA8 bytes and wrap them.
    pub fn from_straight_rgba8(width: u32, height: u32, mut data: Vec<u8>) -> StripResult<Self> {
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul_rgba8(width, height, data)
    }

    /// A bitmap filled with one color.
    pub fn solid(width: u32, height: u32, color: Rgba8) -> StripResult<Self> {
        let px = color.to_premul();
        let n = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| StripError::validation("bitmap size overflow"))?;
        Self::from_premul_rgba8(width, height, px.repeat(n))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `width / height`.
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size of the pixel buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Premultiplied pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Copy out the pixels as straight-alpha RGBA8 (for encoders).
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.as_ref().clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }

    /// Return true when both bitmaps share the same pixel allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/bitmap.rs"]
mod tests;
