/// Convenience result type used across photostrip.
pub type StripResult<T> = Result<T, StripError>;

/// Top-level error taxonomy used by compositor, capture, export and store APIs.
///
/// Asset decode failures and out-of-range filter values are recovered locally and never surface
/// here; see [`crate::StripCompositor`].
#[derive(thiserror::Error, Debug)]
pub enum StripError {
    /// Invalid caller-provided data (layout descriptors, composition JSON, ids).
    #[error("validation error: {0}")]
    Validation(String),

    /// A render or capture call was made without its required inputs.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// An image could not be read or decoded.
    #[error("asset load error: {0}")]
    AssetLoad(String),

    /// Rasterization failed (surface too large, buffer mismatch).
    #[error("render error: {0}")]
    Render(String),

    /// The photo store rejected or failed to return records.
    #[error("store error: {0}")]
    Store(String),

    /// Encoding, download or share transport failed.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StripError {
    /// Build a [`StripError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StripError::MissingInput`] value.
    pub fn missing_input(msg: impl Into<String>) -> Self {
        Self::MissingInput(msg.into())
    }

    /// Build a [`StripError::AssetLoad`] value.
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build a [`StripError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StripError::Store`] value.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Build a [`StripError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`StripError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
