use crate::compile::plan::StripPlan;
use crate::foundation::error::StripResult;

/// A renderer that turns a compiled [`StripPlan`] into some output.
///
/// The export path ([`crate::CpuBackend`]) produces pixels; the preview path
/// ([`crate::PreviewBackend`]) produces a display list for a UI compositor. Both consume the same
/// plan, which is what keeps them visually equivalent.
pub trait StripBackend {
    /// What the backend produces.
    type Output;

    /// Execute a plan.
    fn render_plan(&mut self, plan: &StripPlan) -> StripResult<Self::Output>;
}
