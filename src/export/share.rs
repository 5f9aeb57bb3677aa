use std::sync::Mutex;

use crate::export::encode::ExportedFile;
use crate::foundation::error::{StripError, StripResult};

/// External platforms a strip can be shared to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SharePlatform {
    /// Facebook.
    Facebook,
    /// Twitter / X.
    Twitter,
    /// WhatsApp.
    Whatsapp,
    /// Instagram.
    Instagram,
    /// Pinterest.
    Pinterest,
    /// Email.
    Email,
}

impl SharePlatform {
    /// Every platform, in display order.
    pub const ALL: [Self; 6] = [
        Self::Facebook,
        Self::Twitter,
        Self::Whatsapp,
        Self::Instagram,
        Self::Pinterest,
        Self::Email,
    ];

    /// Stable lowercase id.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Twitter => "twitter",
            Self::Whatsapp => "whatsapp",
            Self::Instagram => "instagram",
            Self::Pinterest => "pinterest",
            Self::Email => "email",
        }
    }

    /// Parse a platform id (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

/// One share intent: which platform, which image, what caption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareRequest {
    /// Target platform.
    pub platform: SharePlatform,
    /// Encoded image.
    pub image: ExportedFile,
    /// Caption text sent with the image.
    pub caption: String,
}

/// Transport that hands a [`ShareRequest`] to the outside world.
///
/// Failures surface as [`StripError::Export`]; callers decide whether to retry.
pub trait ShareTarget {
    /// Deliver the request.
    fn share(&self, request: ShareRequest) -> StripResult<()>;
}

/// In-memory [`ShareTarget`] that records requests, optionally rejecting some platforms.
#[derive(Debug, Default)]
pub struct RecordingShareTarget {
    sent: Mutex<Vec<ShareRequest>>,
    reject: Vec<SharePlatform>,
}

impl RecordingShareTarget {
    /// Target accepting every platform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Target failing for `platform`.
    pub fn rejecting(mut self, platform: SharePlatform) -> Self {
        self.reject.push(platform);
        self
    }

    /// Requests delivered so far.
    pub fn sent(&self) -> Vec<ShareRequest> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl ShareTarget for RecordingShareTarget {
    fn share(&self, request: ShareRequest) -> StripResult<()> {
        if self.reject.contains(&request.platform) {
            return Err(StripError::export(format!(
                "share to {} rejected",
                request.platform.as_str()
            )));
        }
        tracing::debug!(
            platform = request.platform.as_str(),
            file = request.image.filename.as_str(),
            "share"
        );
        self.sent
            .lock()
            .map_err(|_| StripError::export("share log poisoned"))?
            .push(request);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/share.rs"]
mod tests;
