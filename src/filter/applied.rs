use std::collections::{BTreeMap, BTreeSet};

use crate::filter::catalog::{AdvancedFilter, BasicFilter};

/// Declarative filter state of a photo or strip.
///
/// Basic toggles are kept in canonical order regardless of the order they were switched on.
/// Advanced values are clamped to their declared bounds on every write, including
/// deserialization, so a stored set can never hold an out-of-range value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppliedFilterSet {
    basic: BTreeSet<BasicFilter>,
    advanced: BTreeMap<AdvancedFilter, f64>,
}

impl AppliedFilterSet {
    /// Empty set (no filters, every advanced value at its default).
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a basic filter. Returns the new state.
    pub fn toggle_basic(&mut self, filter: BasicFilter) -> bool {
        if self.basic.remove(&filter) {
            false
        } else {
            self.basic.insert(filter);
            true
        }
    }

    /// Switch a basic filter on or off.
    pub fn set_basic(&mut self, filter: BasicFilter, on: bool) {
        if on {
            self.basic.insert(filter);
        } else {
            self.basic.remove(&filter);
        }
    }

    /// Toggle by name. Unknown names are ignored and return `None`.
    pub fn toggle_basic_named(&mut self, name: &str) -> Option<bool> {
        match BasicFilter::from_name(name) {
            Some(f) => Some(self.toggle_basic(f)),
            None => {
                tracing::debug!(name, "ignoring unknown basic filter");
                None
            }
        }
    }

    /// Whether a basic filter is on.
    pub fn is_basic_on(&self, filter: BasicFilter) -> bool {
        self.basic.contains(&filter)
    }

    /// Active basic filters in canonical order.
    pub fn basic(&self) -> impl Iterator<Item = BasicFilter> + '_ {
        self.basic.iter().copied()
    }

    /// Set an advanced value, clamped to its bounds. Returns the stored value.
    pub fn set_advanced(&mut self, filter: AdvancedFilter, value: f64) -> f64 {
        let clamped = filter.bounds().clamp(value);
        if clamped != value {
            tracing::debug!(
                filter = filter.name(),
                value,
                clamped,
                "advanced filter value clamped"
            );
        }
        self.advanced.insert(filter, clamped);
        clamped
    }

    /// Set by name. Unknown names are ignored and return `None`.
    pub fn set_advanced_named(&mut self, name: &str, value: f64) -> Option<f64> {
        match AdvancedFilter::from_name(name) {
            Some(f) => Some(self.set_advanced(f, value)),
            None => {
                tracing::debug!(name, "ignoring unknown advanced filter");
                None
            }
        }
    }

    /// Drop an explicit advanced value so the default applies again.
    pub fn clear_advanced(&mut self, filter: AdvancedFilter) {
        self.advanced.remove(&filter);
    }

    /// Effective advanced value: the stored one, else the declared default.
    pub fn advanced_value(&self, filter: AdvancedFilter) -> f64 {
        self.advanced
            .get(&filter)
            .copied()
            .unwrap_or(filter.bounds().default)
    }

    /// Explicitly set advanced values in application order.
    pub fn advanced(&self) -> impl Iterator<Item = (AdvancedFilter, f64)> + '_ {
        self.advanced.iter().map(|(f, v)| (*f, *v))
    }

    /// Remove every filter.
    pub fn reset(&mut self) {
        self.basic.clear();
        self.advanced.clear();
    }

    /// True when nothing is set.
    pub fn is_empty(&self) -> bool {
        self.basic.is_empty() && self.advanced.is_empty()
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
struct AppliedFilterSetRepr {
    #[serde(default)]
    basic: Vec<String>,
    #[serde(default)]
    advanced: BTreeMap<String, f64>,
}

impl serde::Serialize for AppliedFilterSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let repr = AppliedFilterSetRepr {
            basic: self.basic().map(|f| f.name().to_owned()).collect(),
            advanced: self
                .advanced()
                .map(|(f, v)| (f.name().to_owned(), v))
                .collect(),
        };
        repr.serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for AppliedFilterSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = AppliedFilterSetRepr::deserialize(deserializer)?;
        let mut out = Self::new();
        for name in &repr.basic {
            if let Some(f) = BasicFilter::from_name(name) {
                out.set_basic(f, true);
            } else {
                tracing::debug!(name = name.as_str(), "ignoring unknown basic filter");
            }
        }
        for (name, value) in repr.advanced {
            out.set_advanced_named(&name, value);
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/applied.rs"]
mod tests;
