//! CSV-backed study source.
//!
//! One study folder holds one CSV per record type plus `subjects.csv` (and
//! optionally `drug_doses.csv`). Absent files mean "no records of that
//! type" and load as empty, per the provider contract.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;
use viz_model::Subject;

/// Column-name access over one CSV row.
pub(crate) struct RowView<'a> {
    headers: &'a csv::StringRecord,
    record: &'a csv::StringRecord,
}

impl<'a> RowView<'a> {
    pub(crate) fn new(headers: &'a csv::StringRecord, record: &'a csv::StringRecord) -> Self {
        Self { headers, record }
    }

    /// The trimmed cell under a header, with blank cells as `None`.
    pub(crate) fn get(&self, name: &str) -> Option<&'a str> {
        let index = self
            .headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(name))?;
        let cell = self.record.get(index)?.trim();
        if cell.is_empty() { None } else { Some(cell) }
    }

    pub(crate) fn date(&self, name: &str) -> Option<NaiveDate> {
        self.get(name)
            .and_then(|cell| NaiveDate::parse_from_str(cell, "%Y-%m-%d").ok())
    }

    pub(crate) fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|cell| cell.parse().ok())
    }

    pub(crate) fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|cell| cell.parse().ok())
    }
}

/// Read every row of a CSV file through a builder callback.
///
/// A missing file yields zero rows; an unreadable or malformed file is an
/// error.
pub(crate) fn for_each_row<F>(path: &Path, mut build: F) -> Result<()>
where
    F: FnMut(usize, RowView<'_>) -> Result<()>,
{
    if !path.exists() {
        return Ok(());
    }
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("read headers of {}", path.display()))?
        .clone();
    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("read row {} of {}", index, path.display()))?;
        build(index, RowView::new(&headers, &record))?;
    }
    Ok(())
}

/// Load the study population, keyed by subject id.
///
/// Expected columns: `subject_id`, `subject_code`, `study_code`,
/// `study_part`, and the anchor dates (`first_treatment_date`,
/// `randomisation_date`, `baseline_date`, `study_leave_date`,
/// `death_date`). Per-drug first doses come from `drug_doses.csv`
/// (`subject_id`, `drug`, `first_dose_date`) when present.
pub fn load_subjects(root: &Path, study_code: &str) -> Result<HashMap<String, Arc<Subject>>> {
    let mut builders: HashMap<String, Subject> = HashMap::new();

    for_each_row(&root.join("subjects.csv"), |index, row| {
        let Some(subject_id) = row.get("subject_id") else {
            warn!(row = index, "subject row without subject_id, skipped");
            return Ok(());
        };
        let mut subject = Subject::new(
            subject_id,
            row.get("subject_code").unwrap_or(subject_id),
            row.get("study_code").unwrap_or(study_code),
        );
        if let Some(part) = row.get("study_part") {
            subject = subject.with_study_part(part);
        }
        if let Some(date) = row.date("first_treatment_date") {
            subject = subject.with_first_treatment_date(date);
        }
        if let Some(date) = row.date("randomisation_date") {
            subject = subject.with_randomisation_date(date);
        }
        if let Some(date) = row.date("baseline_date") {
            subject = subject.with_baseline_date(date);
        }
        if let Some(date) = row.date("study_leave_date") {
            subject = subject.with_study_leave_date(date);
        }
        if let Some(date) = row.date("death_date") {
            subject = subject.with_death_date(date);
        }
        builders.insert(subject_id.to_string(), subject);
        Ok(())
    })?;

    for_each_row(&root.join("drug_doses.csv"), |index, row| {
        let (Some(subject_id), Some(drug), Some(date)) = (
            row.get("subject_id"),
            row.get("drug"),
            row.date("first_dose_date"),
        ) else {
            warn!(row = index, "incomplete drug dose row, skipped");
            return Ok(());
        };
        if let Some(subject) = builders.remove(subject_id) {
            builders.insert(
                subject_id.to_string(),
                subject.with_drug_first_dose(drug, date),
            );
        } else {
            warn!(subject_id, "drug dose for unknown subject, skipped");
        }
        Ok(())
    })?;

    Ok(builders
        .into_iter()
        .map(|(id, subject)| (id, Arc::new(subject)))
        .collect())
}

/// Look up the subject for an event row, warning once per orphan row.
pub(crate) fn subject_for_row<'a>(
    subjects: &'a HashMap<String, Arc<Subject>>,
    row: &RowView<'_>,
    file: &str,
    index: usize,
) -> Option<&'a Arc<Subject>> {
    let subject_id = match row.get("subject_id") {
        Some(id) => id,
        None => {
            warn!(file, row = index, "event row without subject_id, skipped");
            return None;
        }
    };
    let subject = subjects.get(subject_id);
    if subject.is_none() {
        warn!(
            file,
            row = index,
            subject_id,
            "event row references unknown subject, skipped"
        );
    }
    subject
}
