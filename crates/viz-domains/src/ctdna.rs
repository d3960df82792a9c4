//! Circulating tumour DNA domain.
//!
//! The overtime chart plots VAF per subject+gene+mutation series; the
//! composite series dimension lives here, not in the engine.

use crate::csv::{for_each_row, load_subjects, subject_for_row};
use crate::provider::{DataProvider, DatasetHandle, VisitDataProvider};
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
pub struct CtDnaRecord {
    pub gene: Option<String>,
    pub mutation: Option<String>,
    /// Variant allele frequency, in percent.
    pub vaf: Option<f64>,
    pub sample_date: Option<NaiveDate>,
    pub visit_number: Option<f64>,
}

fn gene(event: &Event<CtDnaRecord>) -> RawValue {
    RawValue::from_opt_str(event.record().gene.as_deref())
}
fn mutation(event: &Event<CtDnaRecord>) -> RawValue {
    RawValue::from_opt_str(event.record().mutation.as_deref())
}
fn vaf(event: &Event<CtDnaRecord>) -> RawValue {
    RawValue::from_opt_float(event.record().vaf)
}
fn sample_date(event: &Event<CtDnaRecord>) -> RawValue {
    RawValue::from_opt_date(event.record().sample_date)
}
fn visit_number(event: &Event<CtDnaRecord>) -> RawValue {
    RawValue::from_opt_float(event.record().visit_number)
}
fn subject(event: &Event<CtDnaRecord>) -> RawValue {
    RawValue::Str(event.subject().subject_code.clone())
}
/// Composite series key: one line per subject, gene and mutation.
fn subject_gene_mutation(event: &Event<CtDnaRecord>) -> RawValue {
    let record = event.record();
    match (record.gene.as_deref(), record.mutation.as_deref()) {
        (Some(gene), Some(mutation)) => RawValue::Str(format!(
            "{} {} {}",
            event.subject().subject_code,
            gene,
            mutation
        )),
        _ => RawValue::Empty,
    }
}

/// The dimensions selectable on ctDNA charts.
pub fn group_by_options() -> GroupByRegistry<CtDnaRecord> {
    GroupByRegistry::new("ctDNA")
        .register(GroupByOption::new("GENE", GroupByKind::Categorical, gene))
        .register(GroupByOption::new(
            "MUTATION",
            GroupByKind::Categorical,
            mutation,
        ))
        .register(GroupByOption::new("VAF", GroupByKind::Numeric, vaf))
        .register(GroupByOption::new(
            "SAMPLE_DATE",
            GroupByKind::Temporal,
            sample_date,
        ))
        .register(GroupByOption::new(
            "VISIT_NUMBER",
            GroupByKind::Numeric,
            visit_number,
        ))
        .register(GroupByOption::new(
            "SUBJECT",
            GroupByKind::Categorical,
            subject,
        ))
        .register(GroupByOption::new(
            "SUBJECT_GENE_MUTATION",
            GroupByKind::Categorical,
            subject_gene_mutation,
        ))
}

/// The event filter set that accepts every ctDNA record.
pub fn filters() -> Filters<Event<CtDnaRecord>> {
    Filters::empty()
}

pub fn gene_filter<I, S>(values: I) -> Box<dyn DataFilter<Event<CtDnaRecord>>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Box::new(
        ValueSetFilter::empty(
            "gene",
            Arc::new(|event: &Event<CtDnaRecord>| event.record().gene.clone()),
        )
        .with_values(values),
    )
}

/// Details-on-demand columns, in display order.
pub fn columns() -> ColumnSpec<CtDnaRecord> {
    ColumnSpec::new(vec![
        Column::new("subject", "Subject", subject),
        Column::new("gene", "Gene", gene),
        Column::new("mutation", "Mutation", mutation),
        Column::new("vaf", "Variant allele frequency", vaf),
        Column::new("sampleDate", "Sample date", sample_date),
        Column::new("visitNumber", "Visit number", visit_number),
    ])
}

/// CSV-backed provider; reads `ctdna.csv` from the study folder.
pub struct CsvCtDnaProvider;

impl DataProvider<CtDnaRecord> for CsvCtDnaProvider {
    fn load_data(&self, dataset: &DatasetHandle) -> Result<Vec<Event<CtDnaRecord>>> {
        let subjects = load_subjects(&dataset.root, &dataset.study_code)?;
        let mut events = Vec::new();
        for_each_row(&dataset.root.join("ctdna.csv"), |index, row| {
            let Some(subject) = subject_for_row(&subjects, &row, "ctdna.csv", index) else {
                return Ok(());
            };
            let id = row
                .get("event_id")
                .map_or_else(|| format!("ctdna-{index}"), str::to_string);
            events.push(Event::new(
                id,
                Arc::clone(subject),
                CtDnaRecord {
                    gene: row.get("gene").map(str::to_string),
                    mutation: row.get("mutation").map(str::to_string),
                    vaf: row.float("vaf"),
                    sample_date: row.date("sample_date"),
                    visit_number: row.float("visit_number"),
                },
            ));
            Ok(())
        })?;
        debug!(count = events.len(), "loaded ctDNA records");
        Ok(events)
    }
}

impl VisitDataProvider<CtDnaRecord> for CsvCtDnaProvider {
    fn load_data_by_visit(
        &self,
        dataset: &DatasetHandle,
        visit: f64,
    ) -> Result<Vec<Event<CtDnaRecord>>> {
        let events = self.load_data(dataset)?;
        Ok(events
            .into_iter()
            .filter(|event| event.record().visit_number == Some(visit))
            .collect())
    }
}
