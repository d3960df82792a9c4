//! Laboratory results domain.

use crate::csv::{for_each_row, load_subjects, subject_for_row};
use crate::provider::{DataProvider, DatasetHandle};
use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;
use viz_engine::GroupByRegistry;
use viz_model::{
    Column, ColumnSpec, DataFilter, Event, Filters, GroupByKind, GroupByOption,
    NumericRangeFilter, RawValue, ValueSetFilter,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LabRecord {
    pub measurement: Option<String>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub visit_number: Option<f64>,
    pub sample_date: Option<NaiveDate>,
    pub baseline_value: Option<f64>,
}

fn measurement(event: &Event<LabRecord>) -> RawValue {
    RawValue::from_opt_str(event.record().measurement.as_deref())
}
fn value(event: &Event<LabRecord>) -> RawValue {
    RawValue::from_opt_float(event.record().value)
}
fn unit(event: &Event<LabRecord>) -> RawValue {
    RawValue::from_opt_str(event.record().unit.as_deref())
}
fn visit_number(event: &Event<LabRecord>) -> RawValue {
    RawValue::from_opt_float(event.record().visit_number)
}
fn sample_date(event: &Event<LabRecord>) -> RawValue {
    RawValue::from_opt_date(event.record().sample_date)
}
fn change_from_baseline(event: &Event<LabRecord>) -> RawValue {
    let record = event.record();
    match (record.value, record.baseline_value) {
        (Some(value), Some(baseline)) => RawValue::Float(value - baseline),
        _ => RawValue::Empty,
    }
}
fn percent_change_from_baseline(event: &Event<LabRecord>) -> RawValue {
    let record = event.record();
    match (record.value, record.baseline_value) {
        (Some(value), Some(baseline)) if baseline != 0.0 => {
            RawValue::Float((value - baseline) / baseline * 100.0)
        }
        _ => RawValue::Empty,
    }
}
fn subject(event: &Event<LabRecord>) -> RawValue {
    RawValue::Str(event.subject().subject_code.clone())
}

/// The dimensions selectable on lab charts.
pub fn group_by_options() -> GroupByRegistry<LabRecord> {
    GroupByRegistry::new("labs")
        .register(GroupByOption::new(
            "MEASUREMENT",
            GroupByKind::Categorical,
            measurement,
        ))
        .register(GroupByOption::new("VALUE", GroupByKind::Numeric, value))
        .register(GroupByOption::new("UNIT", GroupByKind::Categorical, unit))
        .register(GroupByOption::new(
            "VISIT_NUMBER",
            GroupByKind::Numeric,
            visit_number,
        ))
        .register(GroupByOption::new(
            "SAMPLE_DATE",
            GroupByKind::Temporal,
            sample_date,
        ))
        .register(GroupByOption::new(
            "CHANGE_FROM_BASELINE",
            GroupByKind::Numeric,
            change_from_baseline,
        ))
        .register(GroupByOption::new(
            "PERCENT_CHANGE_FROM_BASELINE",
            GroupByKind::Numeric,
            percent_change_from_baseline,
        ))
        .register(GroupByOption::new(
            "SUBJECT",
            GroupByKind::Categorical,
            subject,
        ))
}

/// The event filter set that accepts every lab result.
pub fn filters() -> Filters<Event<LabRecord>> {
    Filters::empty()
}

pub fn measurement_filter<I, S>(values: I) -> Box<dyn DataFilter<Event<LabRecord>>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Box::new(
        ValueSetFilter::empty(
            "measurement",
            Arc::new(|event: &Event<LabRecord>| event.record().measurement.clone()),
        )
        .with_values(values),
    )
}

pub fn value_filter(from: Option<f64>, to: Option<f64>) -> Box<dyn DataFilter<Event<LabRecord>>> {
    Box::new(
        NumericRangeFilter::empty(
            "value",
            Arc::new(|event: &Event<LabRecord>| event.record().value),
        )
        .with_range(from, to),
    )
}

pub fn visit_number_filter(
    from: Option<f64>,
    to: Option<f64>,
) -> Box<dyn DataFilter<Event<LabRecord>>> {
    Box::new(
        NumericRangeFilter::empty(
            "visit_number",
            Arc::new(|event: &Event<LabRecord>| event.record().visit_number),
        )
        .with_range(from, to),
    )
}

/// Details-on-demand columns, in display order.
pub fn columns() -> ColumnSpec<LabRecord> {
    ColumnSpec::new(vec![
        Column::new("subject", "Subject", subject),
        Column::new("measurement", "Measurement", measurement),
        Column::new("value", "Result value", value),
        Column::new("unit", "Result unit", unit),
        Column::new("visitNumber", "Visit number", visit_number),
        Column::new("sampleDate", "Sample date", sample_date),
        Column::new(
            "changeFromBaseline",
            "Change from baseline",
            change_from_baseline,
        ),
    ])
}

/// CSV-backed provider; reads `labs.csv` from the study folder.
pub struct CsvLabProvider;

impl DataProvider<LabRecord> for CsvLabProvider {
    fn load_data(&self, dataset: &DatasetHandle) -> Result<Vec<Event<LabRecord>>> {
        let subjects = load_subjects(&dataset.root, &dataset.study_code)?;
        let mut events = Vec::new();
        for_each_row(&dataset.root.join("labs.csv"), |index, row| {
            let Some(subject) = subject_for_row(&subjects, &row, "labs.csv", index) else {
                return Ok(());
            };
            let id = row
                .get("event_id")
                .map_or_else(|| format!("lab-{index}"), str::to_string);
            events.push(Event::new(
                id,
                Arc::clone(subject),
                LabRecord {
                    measurement: row.get("measurement").map(str::to_string),
                    value: row.float("value"),
                    unit: row.get("unit").map(str::to_string),
                    visit_number: row.float("visit_number"),
                    sample_date: row.date("sample_date"),
                    baseline_value: row.float("baseline_value"),
                },
            ));
            Ok(())
        })?;
        debug!(count = events.len(), "loaded lab results");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viz_model::Subject;

    fn lab(value: Option<f64>, baseline: Option<f64>) -> Event<LabRecord> {
        let subject = Arc::new(Subject::new("S1", "E01-001", "ST"));
        Event::new(
            "lab-1",
            subject,
            LabRecord {
                measurement: Some("ALT".to_string()),
                value,
                unit: Some("U/L".to_string()),
                visit_number: Some(2.0),
                sample_date: None,
                baseline_value: baseline,
            },
        )
    }

    #[test]
    fn change_from_baseline_needs_both_values() {
        let registry = group_by_options();
        assert_eq!(
            registry
                .extract("CHANGE_FROM_BASELINE", &lab(Some(42.0), Some(40.0)))
                .unwrap(),
            RawValue::Float(2.0)
        );
        assert_eq!(
            registry
                .extract("CHANGE_FROM_BASELINE", &lab(Some(42.0), None))
                .unwrap(),
            RawValue::Empty
        );
    }

    #[test]
    fn percent_change_guards_zero_baseline() {
        let registry = group_by_options();
        assert_eq!(
            registry
                .extract("PERCENT_CHANGE_FROM_BASELINE", &lab(Some(50.0), Some(40.0)))
                .unwrap(),
            RawValue::Float(25.0)
        );
        assert_eq!(
            registry
                .extract("PERCENT_CHANGE_FROM_BASELINE", &lab(Some(50.0), Some(0.0)))
                .unwrap(),
            RawValue::Empty
        );
    }
}
