//! Vital signs domain.

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
pub struct VitalRecord {
    pub measurement: Option<String>,
    pub planned_time_point: Option<String>,
    pub visit_number: Option<f64>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub measurement_date: Option<NaiveDate>,
}

fn measurement(event: &Event<VitalRecord>) -> RawValue {
    RawValue::from_opt_str(event.record().measurement.as_deref())
}
fn planned_time_point(event: &Event<VitalRecord>) -> RawValue {
    RawValue::from_opt_str(event.record().planned_time_point.as_deref())
}
fn visit_number(event: &Event<VitalRecord>) -> RawValue {
    RawValue::from_opt_float(event.record().visit_number)
}
fn value(event: &Event<VitalRecord>) -> RawValue {
    RawValue::from_opt_float(event.record().value)
}
fn unit(event: &Event<VitalRecord>) -> RawValue {
    RawValue::from_opt_str(event.record().unit.as_deref())
}
fn measurement_date(event: &Event<VitalRecord>) -> RawValue {
    RawValue::from_opt_date(event.record().measurement_date)
}
fn subject(event: &Event<VitalRecord>) -> RawValue {
    RawValue::Str(event.subject().subject_code.clone())
}

/// The dimensions selectable on vitals charts.
pub fn group_by_options() -> GroupByRegistry<VitalRecord> {
    GroupByRegistry::new("vitals")
        .register(GroupByOption::new(
            "MEASUREMENT",
            GroupByKind::Categorical,
            measurement,
        ))
        .register(GroupByOption::new(
            "PLANNED_TIME_POINT",
            GroupByKind::Categorical,
            planned_time_point,
        ))
        .register(GroupByOption::new(
            "VISIT_NUMBER",
            GroupByKind::Numeric,
            visit_number,
        ))
        .register(GroupByOption::new("VALUE", GroupByKind::Numeric, value))
        .register(GroupByOption::new("UNIT", GroupByKind::Categorical, unit))
        .register(GroupByOption::new(
            "MEASUREMENT_DATE",
            GroupByKind::Temporal,
            measurement_date,
        ))
        .register(GroupByOption::new(
            "SUBJECT",
            GroupByKind::Categorical,
            subject,
        ))
}

/// The event filter set that accepts every vitals record.
pub fn filters() -> Filters<Event<VitalRecord>> {
    Filters::empty()
}

pub fn measurement_filter<I, S>(values: I) -> Box<dyn DataFilter<Event<VitalRecord>>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Box::new(
        ValueSetFilter::empty(
            "measurement",
            Arc::new(|event: &Event<VitalRecord>| event.record().measurement.clone()),
        )
        .with_values(values),
    )
}

pub fn value_filter(from: Option<f64>, to: Option<f64>) -> Box<dyn DataFilter<Event<VitalRecord>>> {
    Box::new(
        NumericRangeFilter::empty(
            "value",
            Arc::new(|event: &Event<VitalRecord>| event.record().value),
        )
        .with_range(from, to),
    )
}

/// Details-on-demand columns, in display order.
pub fn columns() -> ColumnSpec<VitalRecord> {
    ColumnSpec::new(vec![
        Column::new("subject", "Subject", subject),
        Column::new("measurement", "Measurement", measurement),
        Column::new("plannedTimePoint", "Planned time point", planned_time_point),
        Column::new("visitNumber", "Visit number", visit_number),
        Column::new("value", "Result value", value),
        Column::new("unit", "Result unit", unit),
        Column::new("measurementDate", "Measurement date", measurement_date),
    ])
}

/// CSV-backed provider; reads `vitals.csv` from the study folder.
pub struct CsvVitalProvider;

impl DataProvider<VitalRecord> for CsvVitalProvider {
    fn load_data(&self, dataset: &DatasetHandle) -> Result<Vec<Event<VitalRecord>>> {
        let subjects = load_subjects(&dataset.root, &dataset.study_code)?;
        let mut events = Vec::new();
        for_each_row(&dataset.root.join("vitals.csv"), |index, row| {
            let Some(subject) = subject_for_row(&subjects, &row, "vitals.csv", index) else {
                return Ok(());
            };
            let id = row
                .get("event_id")
                .map_or_else(|| format!("vital-{index}"), str::to_string);
            events.push(Event::new(
                id,
                Arc::clone(subject),
                VitalRecord {
                    measurement: row.get("measurement").map(str::to_string),
                    planned_time_point: row.get("planned_time_point").map(str::to_string),
                    visit_number: row.float("visit_number"),
                    value: row.float("value"),
                    unit: row.get("unit").map(str::to_string),
                    measurement_date: row.date("measurement_date"),
                },
            ));
            Ok(())
        })?;
        debug!(count = events.len(), "loaded vitals");
        Ok(events)
    }
}
