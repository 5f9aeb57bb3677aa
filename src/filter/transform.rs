use crate::filter::applied::AppliedFilterSet;
use crate::filter::catalog::{FilterFn, FilterUnit};
use crate::filter::pixel::{
    ColorMatrix, IDENTITY_MATRIX, blur_rgba8_premul_in_place, color_matrix_rgba8_premul_in_place,
};
use crate::foundation::error::StripResult;

/// One CSS filter function call with its argument in [`FilterFn::unit`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FilterOp {
    /// Filter function.
    pub func: FilterFn,
    /// Argument, e.g. `150.0` for `contrast(150%)`.
    pub value: f64,
}

impl FilterOp {
    /// CSS text for this call, e.g. `hue-rotate(90deg)`.
    pub fn css(&self) -> String {
        format!(
            "{}({}{})",
            self.func.css_name(),
            self.value,
            self.func.unit().suffix()
        )
    }

    fn fraction(&self) -> f32 {
        debug_assert_eq!(self.func.unit(), FilterUnit::Percent);
        (self.value / 100.0) as f32
    }

    /// Color matrix for non-spatial filters (everything except blur).
    ///
    /// Coefficients follow the W3C Filter Effects definitions of the CSS shorthand functions.
    pub(crate) fn color_matrix(&self) -> Option<ColorMatrix> {
        let m = match self.func {
            FilterFn::Blur => return None,
            FilterFn::Grayscale => {
                let a = 1.0 - self.fraction().clamp(0.0, 1.0);
                rgb_matrix([
                    0.2126 + 0.7874 * a,
                    0.7152 - 0.7152 * a,
                    0.0722 - 0.0722 * a,
                    0.2126 - 0.2126 * a,
                    0.7152 + 0.2848 * a,
                    0.0722 - 0.0722 * a,
                    0.2126 - 0.2126 * a,
                    0.7152 - 0.7152 * a,
                    0.0722 + 0.9278 * a,
                ])
            }
            FilterFn::Sepia => {
                let a = 1.0 - self.fraction().clamp(0.0, 1.0);
                rgb_matrix([
                    0.393 + 0.607 * a,
                    0.769 - 0.769 * a,
                    0.189 - 0.189 * a,
                    0.349 - 0.349 * a,
                    0.686 + 0.314 * a,
                    0.168 - 0.168 * a,
                    0.272 - 0.272 * a,
                    0.534 - 0.534 * a,
                    0.131 + 0.869 * a,
                ])
            }
            FilterFn::Saturate => {
                let s = self.fraction().max(0.0);
                rgb_matrix([
                    0.213 + 0.787 * s,
                    0.715 - 0.715 * s,
                    0.072 - 0.072 * s,
                    0.213 - 0.213 * s,
                    0.715 + 0.285 * s,
                    0.072 - 0.072 * s,
                    0.213 - 0.213 * s,
                    0.715 - 0.715 * s,
                    0.072 + 0.928 * s,
                ])
            }
            FilterFn::HueRotate => {
                let (sin, cos) = (self.value as f32).to_radians().sin_cos();
                rgb_matrix([
                    0.213 + cos * 0.787 - sin * 0.213,
                    0.715 - cos * 0.715 - sin * 0.715,
                    0.072 - cos * 0.072 + sin * 0.928,
                    0.213 - cos * 0.213 + sin * 0.143,
                    0.715 + cos * 0.285 + sin * 0.140,
                    0.072 - cos * 0.072 - sin * 0.283,
                    0.213 - cos * 0.213 - sin * 0.787,
                    0.715 - cos * 0.715 + sin * 0.715,
                    0.072 + cos * 0.928 + sin * 0.072,
                ])
            }
            FilterFn::Invert => {
                let a = self.fraction().clamp(0.0, 1.0);
                transfer_matrix(1.0 - 2.0 * a, a)
            }
            FilterFn::Brightness => transfer_matrix(self.fraction().max(0.0), 0.0),
            FilterFn::Contrast => {
                let k = self.fraction().max(0.0);
                transfer_matrix(k, 0.5 - 0.5 * k)
            }
            FilterFn::Opacity => {
                let mut m = IDENTITY_MATRIX;
                m[18] = self.fraction().clamp(0.0, 1.0);
                m
            }
        };
        Some(m)
    }
}

fn rgb_matrix(c: [f32; 9]) -> ColorMatrix {
    [
        c[0], c[1], c[2], 0.0, 0.0, //
        c[3], c[4], c[5], 0.0, 0.0, //
        c[6], c[7], c[8], 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

fn transfer_matrix(slope: f32, intercept: f32) -> ColorMatrix {
    [
        slope, 0.0, 0.0, 0.0, intercept, //
        0.0, slope, 0.0, 0.0, intercept, //
        0.0, 0.0, slope, 0.0, intercept, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

/// The single filter description shared by the preview and export paths.
///
/// The preview renders [`FilterTransform::css`] through the UI compositor; the export path runs
/// [`FilterTransform::apply_premul`] over the same op list. Neither path owns its own copy of
/// the filter math.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct FilterTransform {
    ops: Vec<FilterOp>,
}

impl FilterTransform {
    /// Ops in application order.
    pub fn ops(&self) -> &[FilterOp] {
        &self.ops
    }

    /// True when no op is applied.
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// CSS `filter` property value, `"none"` when empty.
    pub fn css(&self) -> String {
        if self.ops.is_empty() {
            return "none".to_owned();
        }
        self.ops
            .iter()
            .map(FilterOp::css)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Apply every op in order to a premultiplied RGBA8 buffer.
    ///
    /// `scale` is the render scale (output pixels per composition pixel); it only affects
    /// spatial ops, so blur radii stay proportional to the strip at any export resolution.
    pub fn apply_premul(
        &self,
        px: &mut [u8],
        width: u32,
        height: u32,
        scale: f64,
    ) -> StripResult<()> {
        for op in &self.ops {
            match op.color_matrix() {
                Some(m) => color_matrix_rgba8_premul_in_place(px, &m),
                None => {
                    let sigma = (op.value * scale) as f32;
                    blur_rgba8_premul_in_place(px, width, height, sigma)?;
                }
            }
        }
        Ok(())
    }
}

/// Derive the op list: basic filters in canonical order, then every explicitly set advanced
/// value in table order.
pub fn compute_filter_transform(filters: &AppliedFilterSet) -> FilterTransform {
    let mut ops = Vec::new();
    for f in filters.basic() {
        let spec = f.spec();
        ops.push(FilterOp {
            func: spec.func,
            value: spec.value,
        });
    }
    for (f, value) in filters.advanced() {
        ops.push(FilterOp {
            func: f.spec().func,
            value,
        });
    }
    FilterTransform { ops }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/transform.rs"]
mod tests;
