use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::assets::caption::timestamp_caption;
use crate::assets::loader::{AssetLoader, ImageSource};
use crate::filter::applied::AppliedFilterSet;
use crate::foundation::color::Rgba8;
use crate::foundation::core::{PhotoId, SessionId};
use crate::foundation::error::{StripError, StripResult};
use crate::layout::descriptor::{LayoutDescriptor, find_layout};
use crate::sticker::model::Sticker;

/// Ephemeral render input for one strip.
///
/// Filters apply uniformly to every photo and stickers are strip-global. Nothing here is
/// persisted; each render derives its bitmap fresh from these values.
#[derive(Clone, Debug)]
pub struct StripComposition {
    /// Arrangement and slot count.
    pub layout: LayoutDescriptor,
    /// Source photos in slot order. Shorter lists are padded with photo 0.
    pub photos: Vec<ImageSource>,
    /// Filters applied to every slot.
    pub filters: AppliedFilterSet,
    /// Overlays drawn above all slots.
    pub stickers: Vec<Sticker>,
    /// Strip background.
    pub background: Rgba8,
    /// Selected frame color; replaces the background when set.
    pub frame_color: Option<Rgba8>,
    /// Footer caption; blank means no caption.
    pub caption: String,
    /// Caption color.
    pub caption_color: Rgba8,
}

impl StripComposition {
    /// Composition with white background, no edits and no caption.
    pub fn new(layout: LayoutDescriptor, photos: Vec<ImageSource>) -> Self {
        Self {
            layout,
            photos,
            filters: AppliedFilterSet::new(),
            stickers: Vec::new(),
            background: Rgba8::WHITE,
            frame_color: None,
            caption: String::new(),
            caption_color: Rgba8::BLACK,
        }
    }

    /// Set the filters.
    pub fn with_filters(mut self, filters: AppliedFilterSet) -> Self {
        self.filters = filters;
        self
    }

    /// Set the stickers.
    pub fn with_stickers(mut self, stickers: Vec<Sticker>) -> Self {
        self.stickers = stickers;
        self
    }

    /// Set the caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Set the background.
    pub fn with_background(mut self, color: Rgba8) -> Self {
        self.background = color;
        self
    }

    /// Set or clear the frame color.
    pub fn with_frame_color(mut self, color: Option<Rgba8>) -> Self {
        self.frame_color = color;
        self
    }

    /// Color the canvas is filled with before anything is drawn.
    pub fn fill_color(&self) -> Rgba8 {
        self.frame_color.unwrap_or(self.background)
    }

    /// Structural checks that do not need decoded assets.
    pub fn validate(&self) -> StripResult<()> {
        self.layout.validate()?;
        if self.photos.is_empty() {
            return Err(StripError::missing_input(format!(
                "strip '{}' has no photos",
                self.layout.id
            )));
        }
        for s in &self.stickers {
            s.validate()?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
/// A layout given either by built-in id or inline.
pub enum LayoutRef {
    /// Built-in layout id, e.g. `"strip-3"`.
    Builtin(String),
    /// Full descriptor.
    Inline(LayoutDescriptor),
}

impl LayoutRef {
    /// Resolve to a descriptor.
    pub fn resolve(&self) -> StripResult<LayoutDescriptor> {
        match self {
            Self::Builtin(id) => find_layout(id)
                .ok_or_else(|| StripError::validation(format!("unknown layout '{id}'"))),
            Self::Inline(desc) => Ok(desc.clone()),
        }
    }
}

fn white() -> Rgba8 {
    Rgba8::WHITE
}

fn black() -> Rgba8 {
    Rgba8::BLACK
}

/// JSON form of a [`StripComposition`].
///
/// Photo paths and sticker sources are relative to the JSON file's directory. A missing caption
/// becomes the current date and time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StripCompositionDef {
    /// Layout id or inline descriptor.
    pub layout: LayoutRef,
    /// Photo paths.
    pub photos: Vec<String>,
    /// Filter state.
    #[serde(default)]
    pub filters: AppliedFilterSet,
    /// Stickers.
    #[serde(default)]
    pub stickers: Vec<Sticker>,
    /// Background.
    #[serde(default = "white")]
    pub background: Rgba8,
    /// Frame color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_color: Option<Rgba8>,
    /// Caption text; `None` means timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Caption color.
    #[serde(default = "black")]
    pub caption_color: Rgba8,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl StripCompositionDef {
    /// Parse from any reader.
    pub fn from_reader(reader: impl std::io::Read) -> StripResult<Self> {
        serde_json::from_reader(reader)
            .map_err(|e| StripError::serde(format!("parse composition JSON: {e}")))
    }

    /// Parse a JSON file; relative references resolve against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> StripResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path).map_err(|e| {
            StripError::validation(format!("open composition '{}': {e}", path.display()))
        })?;
        let mut def = Self::from_reader(std::io::BufReader::new(f))?;
        def.base_dir = Some(
            path.parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        );
        Ok(def)
    }

    /// Directory relative references resolve against.
    pub fn base_dir(&self) -> &Path {
        self.base_dir.as_deref().unwrap_or_else(|| Path::new("."))
    }

    /// Loader rooted at [`StripCompositionDef::base_dir`].
    pub fn asset_loader(&self) -> AssetLoader {
        AssetLoader::new(self.base_dir())
    }

    /// Build the composition, captioning with the current local time when unset.
    pub fn into_composition(self) -> StripResult<StripComposition> {
        self.into_composition_at(&chrono::Local::now())
    }

    /// Build the composition, captioning with `at` when unset.
    pub fn into_composition_at<Tz>(self, at: &chrono::DateTime<Tz>) -> StripResult<StripComposition>
    where
        Tz: chrono::TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let layout = self.layout.resolve()?;
        let comp = StripComposition {
            layout,
            photos: self.photos.into_iter().map(ImageSource::Path).collect(),
            filters: self.filters,
            stickers: self.stickers,
            background: self.background,
            frame_color: self.frame_color,
            caption: self.caption.unwrap_or_else(|| timestamp_caption(at)),
            caption_color: self.caption_color,
        };
        comp.validate()?;
        Ok(comp)
    }
}

/// Explicit per-session identity, passed to the compositor and capture instead of ambient state.
#[derive(Debug)]
pub struct SessionContext {
    session: SessionId,
    next_seq: AtomicU64,
}

impl SessionContext {
    /// Context for an existing session.
    pub fn new(session: SessionId) -> Self {
        Self {
            session,
            next_seq: AtomicU64::new(1),
        }
    }

    /// Session identity.
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Mint the next photo id (`<session>-0001`, `<session>-0002`, ...).
    pub fn next_photo_id(&self) -> PhotoId {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        PhotoId::from_session_seq(&self.session, seq)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
