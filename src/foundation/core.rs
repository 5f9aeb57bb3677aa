use std::fmt;

use crate::foundation::error::{StripError, StripResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Output canvas dimensions in composition pixels (render scale 1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> StripResult<Self> {
        if width == 0 || height == 0 {
            return Err(StripError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Canvas bounds as a rectangle anchored at the origin.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Pixel size after applying a render scale, rounded to the nearest pixel (min 1).
    pub fn scaled(self, scale: f64) -> (u32, u32) {
        let w = (f64::from(self.width) * scale).round().max(1.0) as u32;
        let h = (f64::from(self.height) * scale).round().max(1.0) as u32;
        (w, h)
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Build an id from a non-empty string.
            pub fn new(raw: impl Into<String>) -> StripResult<Self> {
                let raw = raw.into();
                if raw.trim().is_empty() {
                    return Err(StripError::validation(concat!(
                        stringify!($name),
                        " must be non-empty"
                    )));
                }
                Ok(Self(raw))
            }

            /// Borrow the raw string form.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identity of one editing session; photos and stored records are keyed by it.
    SessionId
);
string_id!(
    /// Unique photo identifier, minted by [`crate::SessionContext`].
    PhotoId
);
string_id!(
    /// Sticker identifier, unique within one sticker board.
    StickerId
);

impl StickerId {
    pub(crate) fn from_seq(seq: u64) -> Self {
        Self(format!("sticker-{seq}"))
    }
}

impl PhotoId {
    pub(crate) fn from_session_seq(session: &SessionId, seq: u64) -> Self {
        Self(format!("{session}-{seq:04}"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
