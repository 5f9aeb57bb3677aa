//! Static filter tables.
//!
//! Every filter the editor offers is one row in [`BASIC_FILTERS`] or [`ADVANCED_FILTERS`]. Name
//! lookup, bounds, CSS rendering and pixel math are all driven from these rows, so adding a
//! filter is a table change.

/// A CSS filter function. Values passed alongside it are in [`FilterFn::unit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterFn {
    /// `grayscale(<percent>)`
    Grayscale,
    /// `sepia(<percent>)`
    Sepia,
    /// `invert(<percent>)`
    Invert,
    /// `blur(<px>)`, value is the Gaussian standard deviation.
    Blur,
    /// `brightness(<percent>)`
    Brightness,
    /// `contrast(<percent>)`
    Contrast,
    /// `saturate(<percent>)`
    Saturate,
    /// `hue-rotate(<deg>)`
    HueRotate,
    /// `opacity(<percent>)`
    Opacity,
}

impl FilterFn {
    /// CSS function name.
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Sepia => "sepia",
            Self::Invert => "invert",
            Self::Blur => "blur",
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Saturate => "saturate",
            Self::HueRotate => "hue-rotate",
            Self::Opacity => "opacity",
        }
    }

    /// Unit of the function argument.
    pub fn unit(self) -> FilterUnit {
        match self {
            Self::Blur => FilterUnit::Px,
            Self::HueRotate => FilterUnit::Deg,
            _ => FilterUnit::Percent,
        }
    }
}

/// Unit attached to a filter value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterUnit {
    /// Percentage, `100` is identity for multiplicative filters.
    Percent,
    /// Pixels in composition space.
    Px,
    /// Degrees.
    Deg,
}

impl FilterUnit {
    /// CSS suffix.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Percent => "%",
            Self::Px => "px",
            Self::Deg => "deg",
        }
    }
}

/// All-or-nothing filters. `Ord` is the canonical application order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum BasicFilter {
    /// Full desaturation.
    Grayscale,
    /// Full sepia tone.
    Sepia,
    /// Full color inversion.
    Invert,
    /// Soft focus.
    Blur,
    /// Brighter exposure.
    Brightness,
    /// Punchier contrast.
    Contrast,
    /// Vivid colors.
    Saturate,
    /// Quarter-turn hue shift.
    HueRotate,
}

/// Table row for a basic filter.
#[derive(Clone, Copy, Debug)]
pub struct BasicFilterSpec {
    /// Filter identity.
    pub filter: BasicFilter,
    /// Stable name used in JSON and UIs.
    pub name: &'static str,
    /// CSS function applied when toggled on.
    pub func: FilterFn,
    /// Function argument in [`FilterFn::unit`].
    pub value: f64,
}

/// Basic filters in canonical application order.
pub const BASIC_FILTERS: [BasicFilterSpec; 8] = [
    BasicFilterSpec {
        filter: BasicFilter::Grayscale,
        name: "grayscale",
        func: FilterFn::Grayscale,
        value: 100.0,
    },
    BasicFilterSpec {
        filter: BasicFilter::Sepia,
        name: "sepia",
        func: FilterFn::Sepia,
        value: 100.0,
    },
    BasicFilterSpec {
        filter: BasicFilter::Invert,
        name: "invert",
        func: FilterFn::Invert,
        value: 100.0,
    },
    BasicFilterSpec {
        filter: BasicFilter::Blur,
        name: "blur",
        func: FilterFn::Blur,
        value: 2.0,
    },
    BasicFilterSpec {
        filter: BasicFilter::Brightness,
        name: "brightness",
        func: FilterFn::Brightness,
        value: 130.0,
    },
    BasicFilterSpec {
        filter: BasicFilter::Contrast,
        name: "contrast",
        func: FilterFn::Contrast,
        value: 150.0,
    },
    BasicFilterSpec {
        filter: BasicFilter::Saturate,
        name: "saturate",
        func: FilterFn::Saturate,
        value: 200.0,
    },
    BasicFilterSpec {
        filter: BasicFilter::HueRotate,
        name: "hue-rotate",
        func: FilterFn::HueRotate,
        value: 90.0,
    },
];

impl BasicFilter {
    /// Table row for this filter.
    pub fn spec(self) -> &'static BasicFilterSpec {
        &BASIC_FILTERS[self as usize]
    }

    /// Stable name.
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Look up a filter by name (case-insensitive). Unknown names return `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        BASIC_FILTERS
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .map(|s| s.filter)
    }

    /// All basic filters in canonical order.
    pub fn all() -> impl Iterator<Item = Self> {
        BASIC_FILTERS.iter().map(|s| s.filter)
    }
}

/// Declared range of an advanced filter value.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FilterBounds {
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
    /// UI slider step. Values are not snapped to it.
    pub step: f64,
    /// Value used when the filter is absent from a set.
    pub default: f64,
    /// Unit of the value.
    pub unit: FilterUnit,
}

impl FilterBounds {
    /// Clamp into `[min, max]`; non-finite input falls back to `default`.
    pub fn clamp(self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }
}

/// Numeric-intensity filters. `Ord` is the application order (after all basic filters).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AdvancedFilter {
    /// Exposure multiplier.
    Brightness,
    /// Contrast around mid-gray.
    Contrast,
    /// Color saturation.
    Saturation,
    /// Gaussian blur.
    Blur,
    /// Hue rotation.
    Hue,
    /// Layer opacity.
    Opacity,
}

/// Table row for an advanced filter.
#[derive(Clone, Copy, Debug)]
pub struct AdvancedFilterSpec {
    /// Filter identity.
    pub filter: AdvancedFilter,
    /// Stable name used in JSON and UIs.
    pub name: &'static str,
    /// CSS function the value feeds.
    pub func: FilterFn,
    /// Value range and default.
    pub bounds: FilterBounds,
}

/// Advanced filters in application order.
pub const ADVANCED_FILTERS: [AdvancedFilterSpec; 6] = [
    AdvancedFilterSpec {
        filter: AdvancedFilter::Brightness,
        name: "brightness",
        func: FilterFn::Brightness,
        bounds: FilterBounds {
            min: 0.0,
            max: 200.0,
            step: 1.0,
            default: 100.0,
            unit: FilterUnit::Percent,
        },
    },
    AdvancedFilterSpec {
        filter: AdvancedFilter::Contrast,
        name: "contrast",
        func: FilterFn::Contrast,
        bounds: FilterBounds {
            min: 0.0,
            max: 200.0,
            step: 1.0,
            default: 100.0,
            unit: FilterUnit::Percent,
        },
    },
    AdvancedFilterSpec {
        filter: AdvancedFilter::Saturation,
        name: "saturation",
        func: FilterFn::Saturate,
        bounds: FilterBounds {
            min: 0.0,
            max: 200.0,
            step: 1.0,
            default: 100.0,
            unit: FilterUnit::Percent,
        },
    },
    AdvancedFilterSpec {
        filter: AdvancedFilter::Blur,
        name: "blur",
        func: FilterFn::Blur,
        bounds: FilterBounds {
            min: 0.0,
            max: 10.0,
            step: 0.5,
            default: 0.0,
            unit: FilterUnit::Px,
        },
    },
    AdvancedFilterSpec {
        filter: AdvancedFilter::Hue,
        name: "hue",
        func: FilterFn::HueRotate,
        bounds: FilterBounds {
            min: 0.0,
            max: 360.0,
            step: 1.0,
            default: 0.0,
            unit: FilterUnit::Deg,
        },
    },
    AdvancedFilterSpec {
        filter: AdvancedFilter::Opacity,
        name: "opacity",
        func: FilterFn::Opacity,
        bounds: FilterBounds {
            min: 0.0,
            max: 100.0,
            step: 1.0,
            default: 100.0,
            unit: FilterUnit::Percent,
        },
    },
];

impl AdvancedFilter {
    /// Table row for this filter.
    pub fn spec(self) -> &'static AdvancedFilterSpec {
        &ADVANCED_FILTERS[self as usize]
    }

    /// Stable name.
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Declared bounds.
    pub fn bounds(self) -> FilterBounds {
        self.spec().bounds
    }

    /// Look up a filter by name (case-insensitive). Unknown names return `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        ADVANCED_FILTERS
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .map(|s| s.filter)
    }

    /// All advanced filters in application order.
    pub fn all() -> impl Iterator<Item = Self> {
        ADVANCED_FILTERS.iter().map(|s| s.filter)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/catalog.rs"]
mod tests;
