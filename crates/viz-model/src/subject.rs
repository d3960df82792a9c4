use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A trial participant.
///
/// Subjects are loaded once per request and shared (via `Arc`) between the
/// population collection and every event that belongs to them. They are
/// immutable after construction; all `with_*` methods are build-time only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub subject_id: String,
    pub subject_code: String,
    pub study_code: String,
    pub study_part: Option<String>,
    pub first_treatment_date: Option<NaiveDate>,
    pub randomisation_date: Option<NaiveDate>,
    pub baseline_date: Option<NaiveDate>,
    pub study_leave_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    /// First dose date per drug name, for per-drug elapsed-time axes.
    #[serde(default)]
    pub drug_first_doses: BTreeMap<String, NaiveDate>,
}

impl Subject {
    pub fn new(
        subject_id: impl Into<String>,
        subject_code: impl Into<String>,
        study_code: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            subject_code: subject_code.into(),
            study_code: study_code.into(),
            study_part: None,
            first_treatment_date: None,
            randomisation_date: None,
            baseline_date: None,
            study_leave_date: None,
            death_date: None,
            drug_first_doses: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_study_part(mut self, part: impl Into<String>) -> Self {
        self.study_part = Some(part.into());
        self
    }

    #[must_use]
    pub fn with_first_treatment_date(mut self, date: NaiveDate) -> Self {
        self.first_treatment_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_randomisation_date(mut self, date: NaiveDate) -> Self {
        self.randomisation_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_baseline_date(mut self, date: NaiveDate) -> Self {
        self.baseline_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_study_leave_date(mut self, date: NaiveDate) -> Self {
        self.study_leave_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_death_date(mut self, date: NaiveDate) -> Self {
        self.death_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_drug_first_dose(mut self, drug: impl Into<String>, date: NaiveDate) -> Self {
        self.drug_first_doses.insert(drug.into(), date);
        self
    }

    /// First dose date of a named drug, if that drug was ever dosed.
    pub fn first_dose_of(&self, drug: &str) -> Option<NaiveDate> {
        self.drug_first_doses.get(drug).copied()
    }
}
