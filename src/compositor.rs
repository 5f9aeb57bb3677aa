//! Strip and photo rendering entry points.
//!
//! Every render goes `validate -> compute_layout -> prepare assets -> compile_plan -> backend`.
//! The export bitmap and the preview scene come from the same compiled plan.

use crate::assets::loader::{AssetLoader, PreparedAssets};
use crate::compile::plan::{StripPlan, compile_photo_plan, compile_plan};
use crate::composition::model::StripComposition;
use crate::export::encode::{ExportOpts, ExportedFile, export_download};
use crate::export::share::{SharePlatform, ShareRequest, ShareTarget};
use crate::foundation::bitmap::Bitmap;
use crate::foundation::error::StripResult;
use crate::layout::engine::compute_layout;
use crate::photo::model::Photo;
use crate::render::backend::StripBackend;
use crate::render::cpu::{CpuBackend, CpuBackendOpts};
use crate::render::preview::{PreviewBackend, PreviewScene};
use crate::store::record::{PhotoRecord, PhotoStore};

/// Renders strip compositions and single photos.
#[derive(Clone, Debug, Default)]
pub struct StripCompositor {
    loader: AssetLoader,
    export: ExportOpts,
}

impl StripCompositor {
    /// Compositor resolving image references through `loader`.
    pub fn new(loader: AssetLoader) -> Self {
        Self {
            loader,
            export: ExportOpts::default(),
        }
    }

    /// Replace the export options.
    pub fn with_export_opts(mut self, opts: ExportOpts) -> Self {
        self.export = opts;
        self
    }

    /// Asset loader in use.
    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    /// Export options in use.
    pub fn export_opts(&self) -> &ExportOpts {
        &self.export
    }

    /// Validate, lay out, decode and compile a composition.
    ///
    /// Fails with [`crate::StripError::MissingInput`] when no photos are supplied. Photos or
    /// stickers that fail to decode are logged and skipped.
    #[tracing::instrument(
        skip(self, comp),
        fields(layout = comp.layout.id.as_str(), photos = comp.photos.len())
    )]
    pub fn plan(&self, comp: &StripComposition) -> StripResult<StripPlan> {
        comp.validate()?;
        let layout = compute_layout(&comp.layout, comp.photos.len())?;
        let assets = PreparedAssets::prepare(&self.loader, &comp.photos, &comp.stickers);
        let plan = compile_plan(comp, &layout, &assets);
        tracing::debug!(
            width = plan.canvas.width,
            height = plan.canvas.height,
            ops = plan.ops.len(),
            "strip compiled"
        );
        Ok(plan)
    }

    /// Render the export bitmap at the configured export scale.
    pub fn render(&self, comp: &StripComposition) -> StripResult<Bitmap> {
        self.render_at_scale(comp, self.export.scale)
    }

    /// Render the export bitmap at `scale` output pixels per composition pixel.
    #[tracing::instrument(skip(self, comp), fields(layout = comp.layout.id.as_str()))]
    pub fn render_at_scale(&self, comp: &StripComposition, scale: f64) -> StripResult<Bitmap> {
        let plan = self.plan(comp)?;
        CpuBackend::new(CpuBackendOpts::default().with_scale(scale)).render_plan(&plan)
    }

    /// Build the interactive preview display list.
    #[tracing::instrument(skip(self, comp), fields(layout = comp.layout.id.as_str()))]
    pub fn render_preview(&self, comp: &StripComposition) -> StripResult<PreviewScene> {
        let plan = self.plan(comp)?;
        PreviewBackend.render_plan(&plan)
    }

    /// Render and encode a downloadable file named after `at`.
    pub fn render_export<Tz>(
        &self,
        comp: &StripComposition,
        at: &chrono::DateTime<Tz>,
    ) -> StripResult<ExportedFile>
    where
        Tz: chrono::TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let bitmap = self.render(comp)?;
        export_download(&bitmap, &self.export, at)
    }

    /// Bake a photo's own filters, stickers and frame into its processed bitmap.
    ///
    /// Renders at the photo's native resolution. Sticker coordinates are photo pixels.
    #[tracing::instrument(skip(self, photo), fields(photo = %photo.id()))]
    pub fn process_photo(&self, photo: &mut Photo) -> StripResult<()> {
        let fingerprint = photo.edit_fingerprint();
        let assets = PreparedAssets::prepare(&self.loader, &[], photo.stickers());
        let plan = compile_photo_plan(
            photo.original(),
            photo.filters(),
            photo.stickers(),
            photo.frame_color(),
            &assets,
        )?;
        let bitmap = CpuBackend::default().render_plan(&plan)?;
        photo.attach_processed(bitmap, fingerprint)
    }

    fn ensure_processed(&self, photo: &mut Photo) -> StripResult<()> {
        if photo.processed().is_none() {
            self.process_photo(photo)?;
        }
        Ok(())
    }

    /// Encode the photo's current display bitmap for download and flag it as downloaded.
    pub fn download_photo<Tz>(
        &self,
        photo: &mut Photo,
        at: &chrono::DateTime<Tz>,
    ) -> StripResult<ExportedFile>
    where
        Tz: chrono::TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        self.ensure_processed(photo)?;
        let file = export_download(photo.display_bitmap(), &self.export, at)?;
        photo.mark_downloaded();
        Ok(file)
    }

    /// Share the photo to `platform`; the share flag is set only when the target accepts.
    #[tracing::instrument(
        skip(self, photo, platform, caption, target),
        fields(photo = %photo.id(), platform = platform.as_str())
    )]
    pub fn share_photo(
        &self,
        photo: &mut Photo,
        platform: SharePlatform,
        caption: &str,
        target: &dyn ShareTarget,
    ) -> StripResult<()> {
        self.ensure_processed(photo)?;
        let image = export_download(photo.display_bitmap(), &self.export, &photo.created_at())?;
        target.share(ShareRequest {
            platform,
            image,
            caption: caption.to_owned(),
        })?;
        photo.mark_shared(platform);
        Ok(())
    }

    /// Finalize the photo and hand it to `store`. Store failures are returned, not retried.
    #[tracing::instrument(skip(self, photo, store), fields(photo = %photo.id()))]
    pub fn save_photo(&self, photo: &mut Photo, store: &dyn PhotoStore) -> StripResult<()> {
        self.ensure_processed(photo)?;
        let record = PhotoRecord::from_photo(photo)?;
        store.save(&record).inspect_err(|e| {
            tracing::warn!(error = %e, "photo store rejected record");
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/compositor.rs"]
mod tests;
