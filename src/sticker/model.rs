use crate::foundation::core::{Point, Rect, StickerId};
use crate::foundation::error::{StripError, StripResult};

/// A positioned, rotated overlay image in strip (composition) coordinates.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sticker {
    /// Identifier, unique within a board.
    pub id: StickerId,
    /// Image reference resolved by [`crate::AssetLoader`].
    pub src: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Clockwise rotation about the sticker center.
    #[serde(default)]
    pub rotation_deg: f64,
    /// Draw order; lower draws first. Need not be contiguous.
    #[serde(default)]
    pub z_index: i32,
}

impl Sticker {
    /// Unrotated bounds.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Rotation pivot.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Reject non-finite geometry and empty sources.
    pub fn validate(&self) -> StripResult<()> {
        if self.src.trim().is_empty() {
            return Err(StripError::validation(format!(
                "sticker '{}' has an empty src",
                self.id
            )));
        }
        let nums = [self.x, self.y, self.width, self.height, self.rotation_deg];
        if nums.iter().any(|v| !v.is_finite()) {
            return Err(StripError::validation(format!(
                "sticker '{}' has non-finite geometry",
                self.id
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(StripError::validation(format!(
                "sticker '{}' must have positive width/height",
                self.id
            )));
        }
        Ok(())
    }
}

/// Stickers sorted for drawing: ascending z-index, ties kept in list order.
pub fn draw_order(stickers: &[Sticker]) -> Vec<&Sticker> {
    let mut out: Vec<&Sticker> = stickers.iter().collect();
    out.sort_by_key(|s| s.z_index);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/sticker/model.rs"]
mod tests;
