//! Group-by dimensions and their parameter bags.

use crate::event::Event;
use crate::value::RawValue;
use serde::{Deserialize, Serialize};

/// The three extraction shapes a dimension can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupByKind {
    /// A string/enum attribute, passed through as its display value.
    Categorical,
    /// A continuous value, supports range bucketing.
    Numeric,
    /// A date attribute, supports the timestamp transforms.
    Temporal,
}

/// The transform applied to a date attribute before binning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimestampType {
    /// Absolute calendar date, truncated to whole-day buckets.
    Date,
    /// Whole days since the subject's first treatment date.
    DaysSinceFirstDose,
    /// Whole days since the subject's randomisation date.
    DaysSinceRandomisation,
    /// Whole days since the first dose of the drug named in the params.
    DaysSinceFirstDoseOfDrug,
    /// Elapsed time as discrete week labels, with day 0 as "Baseline".
    AssessmentWeekWithBaseline,
}

/// Optional parameters that change extraction/binning behavior without
/// changing option identity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupByParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_type: Option<TimestampType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drug_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_number: Option<i64>,
}

impl GroupByParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bin_size(mut self, bin_size: f64) -> Self {
        self.bin_size = Some(bin_size);
        self
    }

    #[must_use]
    pub fn with_timestamp_type(mut self, timestamp_type: TimestampType) -> Self {
        self.timestamp_type = Some(timestamp_type);
        self
    }

    #[must_use]
    pub fn with_drug_name(mut self, drug: impl Into<String>) -> Self {
        self.drug_name = Some(drug.into());
        self
    }

    #[must_use]
    pub fn with_assessment_type(mut self, assessment: impl Into<String>) -> Self {
        self.assessment_type = Some(assessment.into());
        self
    }

    #[must_use]
    pub fn with_week_number(mut self, week: i64) -> Self {
        self.week_number = Some(week);
        self
    }

    /// True when the params ask for binning beyond categorical pass-through.
    pub fn requests_binning(&self) -> bool {
        self.bin_size.is_some() || self.timestamp_type.is_some()
    }
}

/// A named dimension over `Event<T>`.
///
/// Options are plain data: a name, a kind, and a pure extraction function.
/// Registries of these are built per clinical domain; the engine never
/// dispatches through a type hierarchy.
pub struct GroupByOption<T> {
    pub name: &'static str,
    pub kind: GroupByKind,
    pub extract: fn(&Event<T>) -> RawValue,
}

impl<T> GroupByOption<T> {
    pub const fn new(
        name: &'static str,
        kind: GroupByKind,
        extract: fn(&Event<T>) -> RawValue,
    ) -> Self {
        Self {
            name,
            kind,
            extract,
        }
    }

    pub fn extract(&self, event: &Event<T>) -> RawValue {
        (self.extract)(event)
    }
}

impl<T> Clone for GroupByOption<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for GroupByOption<T> {}

impl<T> std::fmt::Debug for GroupByOption<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupByOption")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}
