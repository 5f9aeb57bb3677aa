use crate::export::encode::{DEFAULT_JPEG_QUALITY, encode_bitmap};
use crate::filter::applied::AppliedFilterSet;
use crate::foundation::color::Rgba8;
use crate::foundation::core::{PhotoId, SessionId};
use crate::foundation::error::{StripError, StripResult};
use crate::photo::model::{Photo, PhotoMeta};
use crate::sticker::model::Sticker;

/// A finalized photo as handed to a [`PhotoStore`]: JSON-compatible metadata plus encoded image
/// bytes. The bytes are never part of the JSON form.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhotoRecord {
    /// Photo id.
    pub id: PhotoId,
    /// Owning session.
    pub session: SessionId,
    /// Size and encoding of the original.
    pub meta: PhotoMeta,
    /// Filters at save time.
    pub filters: AppliedFilterSet,
    /// Stickers at save time.
    pub stickers: Vec<Sticker>,
    /// Frame color at save time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_color: Option<Rgba8>,
    /// Capture time.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Download flag.
    #[serde(default)]
    pub downloaded: bool,
    /// Share flag.
    #[serde(default)]
    pub shared: bool,
    /// Encoded display bitmap in `meta.encoding`.
    #[serde(skip)]
    pub image: Vec<u8>,
}

impl PhotoRecord {
    /// Snapshot a photo, encoding its display bitmap.
    pub fn from_photo(photo: &Photo) -> StripResult<Self> {
        let meta = photo.meta();
        let image = encode_bitmap(photo.display_bitmap(), meta.encoding, DEFAULT_JPEG_QUALITY)?;
        Ok(Self {
            id: photo.id().clone(),
            session: photo.session().clone(),
            meta,
            filters: photo.filters().clone(),
            stickers: photo.stickers().to_vec(),
            frame_color: photo.frame_color(),
            created_at: photo.created_at(),
            downloaded: photo.is_downloaded(),
            shared: photo.is_shared(),
            image,
        })
    }

    /// Metadata as JSON.
    pub fn to_json(&self) -> StripResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StripError::serde(format!("serialize photo record: {e}")))
    }

    /// Metadata from JSON; `image` is left empty.
    pub fn from_json(json: &str) -> StripResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| StripError::serde(format!("parse photo record: {e}")))
    }

    /// File extension of the encoded image.
    pub fn image_extension(&self) -> &'static str {
        self.meta.encoding.extension()
    }
}

/// Storage boundary for finalized photos, keyed by session.
///
/// Failures surface as [`StripError::Store`] and are never retried here.
pub trait PhotoStore {
    /// Persist a record under its session.
    fn save(&self, record: &PhotoRecord) -> StripResult<()>;

    /// Records of `session`, oldest first.
    fn list(&self, session: &SessionId) -> StripResult<Vec<PhotoRecord>>;
}

pub(crate) fn sort_records(records: &mut [PhotoRecord]) {
    records.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
#[path = "../../tests/unit/store/record.rs"]
mod tests;
