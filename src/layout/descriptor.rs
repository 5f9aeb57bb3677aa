use crate::foundation::error::{StripError, StripResult};

/// How slots are arranged on the strip canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrangement {
    /// One portrait box.
    Single,
    /// Slots stacked top to bottom, each cropped to 3:2.
    Vertical,
    /// Slots side by side, stretch-fit.
    Horizontal,
    /// Fixed 2x2 grid with decorative per-slot jitter.
    Grid,
}

impl Arrangement {
    /// Lowercase name as used in JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
            Self::Grid => "grid",
        }
    }
}

/// Read-only configuration describing a strip's photo count and arrangement.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LayoutDescriptor {
    /// Stable identifier, e.g. `strip-3`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Number of slots.
    pub photo_count: u32,
    /// Arrangement kind.
    pub arrangement: Arrangement,
    /// Optional column hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    /// Optional row hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
}

impl LayoutDescriptor {
    /// Build a descriptor without hints.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        photo_count: u32,
        arrangement: Arrangement,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            photo_count,
            arrangement,
            columns: None,
            rows: None,
        }
    }

    /// Check that the photo count and hints are consistent with the arrangement.
    pub fn validate(&self) -> StripResult<()> {
        if self.id.trim().is_empty() {
            return Err(StripError::validation("layout id must be non-empty"));
        }
        if self.photo_count == 0 {
            return Err(StripError::validation(format!(
                "layout '{}' photo_count must be > 0",
                self.id
            )));
        }
        match self.arrangement {
            Arrangement::Single if self.photo_count != 1 => {
                return Err(StripError::validation(format!(
                    "layout '{}': single arrangement holds exactly 1 photo, got {}",
                    self.id, self.photo_count
                )));
            }
            Arrangement::Grid if self.photo_count != 4 => {
                return Err(StripError::validation(format!(
                    "layout '{}': grid arrangement holds exactly 4 photos, got {}",
                    self.id, self.photo_count
                )));
            }
            _ => {}
        }
        if self.columns == Some(0) || self.rows == Some(0) {
            return Err(StripError::validation(format!(
                "layout '{}' column/row hints must be > 0",
                self.id
            )));
        }
        let (cols, rows) = self.grid_shape();
        if cols.checked_mul(rows) != Some(self.photo_count) {
            return Err(StripError::validation(format!(
                "layout '{}': {cols}x{rows} hint does not hold {} photos",
                self.id, self.photo_count
            )));
        }
        Ok(())
    }

    /// Effective `(columns, rows)`, filling missing hints from the arrangement.
    pub fn grid_shape(&self) -> (u32, u32) {
        let n = self.photo_count;
        let (dc, dr) = match self.arrangement {
            Arrangement::Single => (1, 1),
            Arrangement::Vertical => (1, n),
            Arrangement::Horizontal => (n, 1),
            Arrangement::Grid => (2, 2),
        };
        match (self.columns, self.rows) {
            (Some(c), Some(r)) => (c, r),
            (Some(c), None) => (c, if c == 0 { 0 } else { n.div_ceil(c) }),
            (None, Some(r)) => (if r == 0 { 0 } else { n.div_ceil(r) }, r),
            (None, None) => (dc, dr),
        }
    }
}

const BUILTIN: [(&str, &str, u32, Arrangement); 6] = [
    ("single", "Single", 1, Arrangement::Single),
    ("strip-2", "Classic Strip (2)", 2, Arrangement::Vertical),
    ("strip-3", "Classic Strip (3)", 3, Arrangement::Vertical),
    ("strip-4", "Classic Strip (4)", 4, Arrangement::Vertical),
    ("row-3", "Side by Side (3)", 3, Arrangement::Horizontal),
    ("grid-4", "Scattered Grid", 4, Arrangement::Grid),
];

/// The layouts offered out of the box.
pub fn builtin_layouts() -> Vec<LayoutDescriptor> {
    BUILTIN
        .iter()
        .map(|&(id, name, n, arrangement)| LayoutDescriptor::new(id, name, n, arrangement))
        .collect()
}

/// Look up a built-in layout by id (case-insensitive).
pub fn find_layout(id: &str) -> Option<LayoutDescriptor> {
    builtin_layouts()
        .into_iter()
        .find(|l| l.id.eq_ignore_ascii_case(id.trim()))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/descriptor.rs"]
mod tests;
