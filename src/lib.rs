//! photostrip is a deterministic photo-strip compositing engine.
//!
//! Captured photos, a layout descriptor, a filter set and positioned stickers go in; a flattened
//! strip comes out. Both render paths share one compiled plan:
//!
//! - Describe a strip with a [`StripComposition`] (or load a [`StripCompositionDef`] from JSON)
//! - Render it with a [`StripCompositor`] into an export [`Bitmap`] or a [`PreviewScene`]
//! - Edit single photos through [`Photo`] and bake them with [`StripCompositor::process_photo`]
//! - Capture, export, share and store through the boundary traits [`CaptureSource`],
//!   [`ShareTarget`] and [`PhotoStore`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod capture;
mod compile;
mod composition;
mod compositor;
mod export;
mod filter;
mod foundation;
mod layout;
mod photo;
mod render;
mod sticker;
mod store;

pub use crate::foundation::bitmap::Bitmap;
pub use crate::foundation::color::Rgba8;
pub use crate::foundation::core::{
    Affine, Canvas, PhotoId, Point, Rect, SessionId, StickerId, Vec2,
};
pub use crate::foundation::error::{StripError, StripResult};

pub use crate::filter::applied::AppliedFilterSet;
pub use crate::filter::catalog::{
    ADVANCED_FILTERS, AdvancedFilter, AdvancedFilterSpec, BASIC_FILTERS, BasicFilter,
    BasicFilterSpec, FilterBounds, FilterFn, FilterUnit,
};
pub use crate::filter::transform::{FilterOp, FilterTransform, compute_filter_transform};

pub use crate::sticker::board::{
    DEFAULT_STICKER_POS, DEFAULT_STICKER_SIZE, NUDGE_STEP, NewSticker, StickerBoard,
    StickerCommand, StickerKey, StickerMailbox, StickerPatch,
};
pub use crate::sticker::model::{Sticker, draw_order};

pub use crate::layout::descriptor::{
    Arrangement, LayoutDescriptor, builtin_layouts, find_layout,
};
pub use crate::layout::engine::{
    CaptionPlacement, GRID_JITTER, Slot, SlotFit, StripLayout, centered_crop, compute_layout,
};

pub use crate::assets::caption::{CAPTION_FONT_FAMILY, timestamp_caption};
pub use crate::assets::decode::{SVG_RASTER_PX, decode_image};
pub use crate::assets::loader::{AssetLoader, ImageSource, MAX_IMAGE_SIDE, PreparedAssets};

pub use crate::compile::fingerprint::{EditFingerprint, fingerprint_edits};
pub use crate::compile::plan::{
    CaptionDraw, DrawOp, PHOTO_FRAME_FRACTION, PhotoDraw, StickerDraw, StripPlan,
    compile_photo_plan, compile_plan,
};

pub use crate::render::backend::StripBackend;
pub use crate::render::cpu::{CpuBackend, CpuBackendOpts};
pub use crate::render::preview::{PreviewBackend, PreviewBox, PreviewItem, PreviewScene};

pub use crate::composition::model::{
    LayoutRef, SessionContext, StripComposition, StripCompositionDef,
};
pub use crate::compositor::StripCompositor;
pub use crate::photo::model::{Photo, PhotoMeta};

pub use crate::capture::sequence::{
    COUNTDOWN_TICK, CaptureEvent, CaptureOutcome, CaptureSequence, capture_sequence,
};
pub use crate::capture::source::{
    CancelToken, CaptureSource, Pacer, StillImageSource, ThreadPacer,
};

pub use crate::export::encode::{
    DEFAULT_JPEG_QUALITY, ExportOpts, ExportedFile, ImageEncoding, encode_bitmap,
    export_download, export_filename,
};
pub use crate::export::share::{RecordingShareTarget, SharePlatform, ShareRequest, ShareTarget};

pub use crate::store::dir::DirPhotoStore;
pub use crate::store::memory::InMemoryPhotoStore;
pub use crate::store::record::{PhotoRecord, PhotoStore};
