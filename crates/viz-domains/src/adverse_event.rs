//! Adverse events domain.

use crate::csv::{for_each_row, load_subjects, subject_for_row};
use crate::provider::{DataProvider, DatasetHandle};
use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;
use viz_engine::GroupByRegistry;
use viz_model::{
    Column, ColumnSpec, DataFilter, Event, Filters, GroupByKind, GroupByOption, RawValue,
    ValueSetFilter,
};

#[derive(Debug, Clone, PartialEq)]
pub struct AdverseEventRecord {
    pub term: Option<String>,
    pub severity: Option<String>,
    pub serious: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub severity_grade: Option<i64>,
}

fn term(event: &Event<AdverseEventRecord>) -> RawValue {
    RawValue::from_opt_str(event.record().term.as_deref())
}
fn severity(event: &Event<AdverseEventRecord>) -> RawValue {
    RawValue::from_opt_str(event.record().severity.as_deref())
}
fn serious(event: &Event<AdverseEventRecord>) -> RawValue {
    RawValue::from_opt_str(event.record().serious.as_deref())
}
fn start_date(event: &Event<AdverseEventRecord>) -> RawValue {
    RawValue::from_opt_date(event.record().start_date)
}
fn end_date(event: &Event<AdverseEventRecord>) -> RawValue {
    RawValue::from_opt_date(event.record().end_date)
}
fn severity_grade(event: &Event<AdverseEventRecord>) -> RawValue {
    RawValue::from_opt_int(event.record().severity_grade)
}
fn subject(event: &Event<AdverseEventRecord>) -> RawValue {
    RawValue::Str(event.subject().subject_code.clone())
}
fn study_part(event: &Event<AdverseEventRecord>) -> RawValue {
    RawValue::from_opt_str(event.subject().study_part.as_deref())
}

/// The dimensions selectable on adverse-event charts.
pub fn group_by_options() -> GroupByRegistry<AdverseEventRecord> {
    GroupByRegistry::new("adverse events")
        .register(GroupByOption::new("TERM", GroupByKind::Categorical, term))
        .register(GroupByOption::new(
            "SEVERITY",
            GroupByKind::Categorical,
            severity,
        ))
        .register(GroupByOption::new(
            "SERIOUS",
            GroupByKind::Categorical,
            serious,
        ))
        .register(GroupByOption::new(
            "START_DATE",
            GroupByKind::Temporal,
            start_date,
        ))
        .register(GroupByOption::new(
            "END_DATE",
            GroupByKind::Temporal,
            end_date,
        ))
        .register(GroupByOption::new(
            "SEVERITY_GRADE",
            GroupByKind::Numeric,
            severity_grade,
        ))
        .register(GroupByOption::new(
            "SUBJECT",
            GroupByKind::Categorical,
            subject,
        ))
        .register(GroupByOption::new(
            "STUDY_PART",
            GroupByKind::Categorical,
            study_part,
        ))
}

/// The event filter set that accepts every adverse event.
pub fn filters() -> Filters<Event<AdverseEventRecord>> {
    Filters::empty()
}

pub fn severity_filter<I, S>(values: I) -> Box<dyn DataFilter<Event<AdverseEventRecord>>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Box::new(
        ValueSetFilter::empty(
            "severity",
            Arc::new(|event: &Event<AdverseEventRecord>| event.record().severity.clone()),
        )
        .with_values(values),
    )
}

pub fn term_filter<I, S>(values: I) -> Box<dyn DataFilter<Event<AdverseEventRecord>>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Box::new(
        ValueSetFilter::empty(
            "term",
            Arc::new(|event: &Event<AdverseEventRecord>| event.record().term.clone()),
        )
        .with_values(values),
    )
}

/// Details-on-demand columns, in display order.
pub fn columns() -> ColumnSpec<AdverseEventRecord> {
    ColumnSpec::new(vec![
        Column::new("subject", "Subject", subject),
        Column::new("term", "Adverse event term", term),
        Column::new("severity", "Severity", severity),
        Column::new("serious", "Serious", serious),
        Column::new("severityGrade", "Severity grade", severity_grade),
        Column::new("startDate", "Start date", start_date),
        Column::new("endDate", "End date", end_date),
    ])
}

/// CSV-backed provider; reads `adverse_events.csv` from the study folder.
pub struct CsvAdverseEventProvider;

impl DataProvider<AdverseEventRecord> for CsvAdverseEventProvider {
    fn load_data(&self, dataset: &DatasetHandle) -> Result<Vec<Event<AdverseEventRecord>>> {
        let subjects = load_subjects(&dataset.root, &dataset.study_code)?;
        let mut events = Vec::new();
        for_each_row(&dataset.root.join("adverse_events.csv"), |index, row| {
            let Some(subject) = subject_for_row(&subjects, &row, "adverse_events.csv", index)
            else {
                return Ok(());
            };
            let id = row
                .get("event_id")
                .map_or_else(|| format!("ae-{index}"), str::to_string);
            events.push(Event::new(
                id,
                Arc::clone(subject),
                AdverseEventRecord {
                    term: row.get("term").map(str::to_string),
                    severity: row.get("severity").map(str::to_string),
                    serious: row.get("serious").map(str::to_string),
                    start_date: row.date("start_date"),
                    end_date: row.date("end_date"),
                    severity_grade: row.int("severity_grade"),
                },
            ));
            Ok(())
        })?;
        debug!(count = events.len(), "loaded adverse events");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viz_model::Subject;

    fn event(severity: Option<&str>) -> Event<AdverseEventRecord> {
        let subject = Arc::new(Subject::new("S1", "E01-001", "ST"));
        Event::new(
            "ae-1",
            subject,
            AdverseEventRecord {
                term: Some("Headache".to_string()),
                severity: severity.map(str::to_string),
                serious: None,
                start_date: None,
                end_date: None,
                severity_grade: Some(2),
            },
        )
    }

    #[test]
    fn registry_declares_core_dimensions() {
        let registry = group_by_options();
        for name in ["TERM", "SEVERITY", "START_DATE", "SEVERITY_GRADE", "SUBJECT"] {
            assert!(registry.get(name).is_ok(), "missing option {name}");
        }
        assert!(registry.get("VAF").is_err());
    }

    #[test]
    fn severity_filter_excludes_missing_values() {
        let filter = severity_filter(["MILD"]);
        assert!(filter.matches(&event(Some("MILD"))));
        assert!(!filter.matches(&event(Some("SEVERE"))));
        assert!(!filter.matches(&event(None)));
    }
}
