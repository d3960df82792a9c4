//! Immutable per-request chart settings.

use crate::options::GroupByParams;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The chart roles a dimension can be assigned to. Trellis slots are kept
/// separately since a chart may carry any number of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChartRole {
    XAxis,
    YAxis,
    ColorBy,
    SeriesBy,
    Name,
}

/// One (group-by option, params) assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionBinding {
    pub option: String,
    #[serde(default)]
    pub params: GroupByParams,
}

impl DimensionBinding {
    pub fn new(option: impl Into<String>) -> Self {
        Self {
            option: option.into(),
            params: GroupByParams::default(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: GroupByParams) -> Self {
        self.params = params;
        self
    }
}

/// An immutable mapping from chart role to dimension binding, built once per
/// request. Derived variants are produced through `to_builder()`; a
/// published instance is never mutated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSettings {
    assignments: BTreeMap<ChartRole, DimensionBinding>,
    trellis: Vec<DimensionBinding>,
}

impl ChartSettings {
    pub fn builder() -> ChartSettingsBuilder {
        ChartSettingsBuilder::default()
    }

    /// Derive a builder seeded with this instance's assignments, e.g. to
    /// swap the X axis while keeping color and trellis choices.
    pub fn to_builder(&self) -> ChartSettingsBuilder {
        ChartSettingsBuilder {
            assignments: self.assignments.clone(),
            trellis: self.trellis.clone(),
        }
    }

    pub fn get(&self, role: ChartRole) -> Option<&DimensionBinding> {
        self.assignments.get(&role)
    }

    pub fn trellis(&self) -> &[DimensionBinding] {
        &self.trellis
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChartSettingsBuilder {
    assignments: BTreeMap<ChartRole, DimensionBinding>,
    trellis: Vec<DimensionBinding>,
}

impl ChartSettingsBuilder {
    #[must_use]
    pub fn with(mut self, role: ChartRole, binding: DimensionBinding) -> Self {
        self.assignments.insert(role, binding);
        self
    }

    #[must_use]
    pub fn with_option(self, role: ChartRole, option: impl Into<String>) -> Self {
        self.with(role, DimensionBinding::new(option))
    }

    #[must_use]
    pub fn without(mut self, role: ChartRole) -> Self {
        self.assignments.remove(&role);
        self
    }

    #[must_use]
    pub fn add_trellis(mut self, binding: DimensionBinding) -> Self {
        self.trellis.push(binding);
        self
    }

    #[must_use]
    pub fn clear_trellis(mut self) -> Self {
        self.trellis.clear();
        self
    }

    pub fn build(self) -> ChartSettings {
        ChartSettings {
            assignments: self.assignments,
            trellis: self.trellis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{GroupByParams, TimestampType};

    #[test]
    fn builder_assigns_roles() {
        let settings = ChartSettings::builder()
            .with(
                ChartRole::XAxis,
                DimensionBinding::new("START_DATE").with_params(
                    GroupByParams::new()
                        .with_bin_size(5.0)
                        .with_timestamp_type(TimestampType::DaysSinceFirstDose),
                ),
            )
            .with_option(ChartRole::ColorBy, "SEVERITY")
            .add_trellis(DimensionBinding::new("MEASUREMENT"))
            .build();

        assert_eq!(settings.get(ChartRole::XAxis).unwrap().option, "START_DATE");
        assert_eq!(settings.trellis().len(), 1);
        assert!(settings.get(ChartRole::SeriesBy).is_none());
    }

    #[test]
    fn to_builder_derives_without_mutating() {
        let original = ChartSettings::builder()
            .with_option(ChartRole::XAxis, "VISIT_NUMBER")
            .with_option(ChartRole::ColorBy, "ARM")
            .build();

        let swapped = original
            .to_builder()
            .with_option(ChartRole::XAxis, "MEASUREMENT")
            .build();

        assert_eq!(original.get(ChartRole::XAxis).unwrap().option, "VISIT_NUMBER");
        assert_eq!(swapped.get(ChartRole::XAxis).unwrap().option, "MEASUREMENT");
        assert_eq!(swapped.get(ChartRole::ColorBy).unwrap().option, "ARM");
    }
}
