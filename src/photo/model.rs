use std::collections::BTreeSet;

use crate::compile::fingerprint::{EditFingerprint, fingerprint_edits};
use crate::export::encode::ImageEncoding;
use crate::export::share::SharePlatform;
use crate::filter::applied::AppliedFilterSet;
use crate::foundation::bitmap::Bitmap;
use crate::foundation::color::Rgba8;
use crate::foundation::core::{PhotoId, SessionId};
use crate::foundation::error::{StripError, StripResult};
use crate::sticker::model::Sticker;

/// Size and encoding metadata of a photo's original bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PhotoMeta {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Decoded size in bytes.
    pub byte_size: u64,
    /// Encoding used when the photo is stored or exported.
    pub encoding: ImageEncoding,
}

/// One captured photo and its edit state.
///
/// The original bitmap never changes after capture. Edits replace the filter set, sticker list or
/// frame color and drop any processed bitmap, so [`Photo::processed`] can never return pixels
/// rendered from older edits.
#[derive(Clone, Debug)]
pub struct Photo {
    id: PhotoId,
    session: SessionId,
    original: Bitmap,
    meta: PhotoMeta,
    filters: AppliedFilterSet,
    stickers: Vec<Sticker>,
    frame_color: Option<Rgba8>,
    processed: Option<(Bitmap, EditFingerprint)>,
    created_at: chrono::DateTime<chrono::Utc>,
    downloaded: bool,
    shared: BTreeSet<SharePlatform>,
}

impl Photo {
    /// A freshly captured photo with no edits.
    pub fn captured(
        id: PhotoId,
        session: SessionId,
        original: Bitmap,
        created_at: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        let meta = PhotoMeta {
            width: original.width(),
            height: original.height(),
            byte_size: original.byte_len() as u64,
            encoding: ImageEncoding::Png,
        };
        Self {
            id,
            session,
            original,
            meta,
            filters: AppliedFilterSet::new(),
            stickers: Vec::new(),
            frame_color: None,
            processed: None,
            created_at,
            downloaded: false,
            shared: BTreeSet::new(),
        }
    }

    /// Photo id.
    pub fn id(&self) -> &PhotoId {
        &self.id
    }

    /// Owning session.
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Raw capture.
    pub fn original(&self) -> &Bitmap {
        &self.original
    }

    /// Size and encoding metadata.
    pub fn meta(&self) -> PhotoMeta {
        self.meta
    }

    /// Set the encoding used when storing or exporting this photo.
    pub fn set_encoding(&mut self, encoding: ImageEncoding) {
        self.meta.encoding = encoding;
    }

    /// Capture time.
    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }

    /// Current filters.
    pub fn filters(&self) -> &AppliedFilterSet {
        &self.filters
    }

    /// Current stickers.
    pub fn stickers(&self) -> &[Sticker] {
        &self.stickers
    }

    /// Current frame color.
    pub fn frame_color(&self) -> Option<Rgba8> {
        self.frame_color
    }

    /// Replace the filters and invalidate the processed bitmap.
    pub fn set_filters(&mut self, filters: AppliedFilterSet) {
        self.filters = filters;
        self.invalidate();
    }

    /// Replace the stickers and invalidate the processed bitmap.
    pub fn set_stickers(&mut self, stickers: Vec<Sticker>) {
        self.stickers = stickers;
        self.invalidate();
    }

    /// Set or clear the frame color and invalidate the processed bitmap.
    pub fn set_frame_color(&mut self, color: Option<Rgba8>) {
        self.frame_color = color;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        if self.processed.take().is_some() {
            tracing::debug!(photo = %self.id, "processed bitmap invalidated");
        }
    }

    /// Digest of the current edits.
    pub fn edit_fingerprint(&self) -> EditFingerprint {
        fingerprint_edits(&self.filters, &self.stickers, self.frame_color)
    }

    /// Attach a processed bitmap rendered from the edits digested by `fingerprint`.
    ///
    /// Fails with [`StripError::Validation`] when the edits changed since the render started.
    pub fn attach_processed(
        &mut self,
        bitmap: Bitmap,
        fingerprint: EditFingerprint,
    ) -> StripResult<()> {
        if fingerprint != self.edit_fingerprint() {
            return Err(StripError::validation(format!(
                "processed bitmap for photo '{}' is stale",
                self.id
            )));
        }
        self.processed = Some((bitmap, fingerprint));
        Ok(())
    }

    /// Processed bitmap, only when it reflects the current edits.
    pub fn processed(&self) -> Option<&Bitmap> {
        self.processed
            .as_ref()
            .filter(|(_, fp)| *fp == self.edit_fingerprint())
            .map(|(bmp, _)| bmp)
    }

    /// What to show: the processed bitmap when current, otherwise the original.
    pub fn display_bitmap(&self) -> &Bitmap {
        self.processed().unwrap_or(&self.original)
    }

    /// Record a download.
    pub fn mark_downloaded(&mut self) {
        self.downloaded = true;
    }

    /// True once downloaded.
    pub fn is_downloaded(&self) -> bool {
        self.downloaded
    }

    /// Record a share to `platform`.
    pub fn mark_shared(&mut self, platform: SharePlatform) {
        self.shared.insert(platform);
    }

    /// True once shared anywhere.
    pub fn is_shared(&self) -> bool {
        !self.shared.is_empty()
    }

    /// Platforms shared to, in display order.
    pub fn shared_platforms(&self) -> impl Iterator<Item = SharePlatform> + '_ {
        self.shared.iter().copied()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/photo/model.rs"]
mod tests;
