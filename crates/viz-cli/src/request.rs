//! Chart request parsing: the JSON shape a caller submits for one chart.

use crate::cli::DomainArg;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use viz_engine::{CentralTendency, GroupByRegistry};
use viz_model::{
    ChartRole, ChartSettings, DataFilter, DimensionBinding, Event, Filters, GroupByParams,
    NumericRangeFilter, TimestampType, ValueSetFilter,
};

/// The chart shapes the engine can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Counts,
    BoxPlot,
    Range,
    Line,
}

/// One dimension assignment in a request.
#[derive(Debug, Clone, Deserialize)]
pub struct DimensionSpec {
    pub option: String,
    #[serde(default)]
    pub bin_size: Option<f64>,
    #[serde(default)]
    pub timestamp_type: Option<TimestampType>,
    #[serde(default)]
    pub drug_name: Option<String>,
}

impl DimensionSpec {
    fn binding(&self) -> DimensionBinding {
        let mut params = GroupByParams::new();
        if let Some(bin_size) = self.bin_size {
            params = params.with_bin_size(bin_size);
        }
        if let Some(timestamp_type) = self.timestamp_type {
            params = params.with_timestamp_type(timestamp_type);
        }
        if let Some(drug) = &self.drug_name {
            params = params.with_drug_name(drug.clone());
        }
        DimensionBinding::new(self.option.clone()).with_params(params)
    }
}

/// One declarative filter over a group-by option: either an accepted-value
/// set or a numeric range.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterSpec {
    pub option: String,
    #[serde(default)]
    pub values: Option<Vec<String>>,
    #[serde(default)]
    pub from: Option<f64>,
    #[serde(default)]
    pub to: Option<f64>,
}

/// One chart request.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartRequest {
    pub domain: DomainArg,
    pub chart: ChartKind,
    #[serde(default)]
    pub x: Option<DimensionSpec>,
    #[serde(default)]
    pub y: Option<DimensionSpec>,
    #[serde(default)]
    pub color_by: Option<DimensionSpec>,
    #[serde(default)]
    pub series_by: Option<DimensionSpec>,
    #[serde(default)]
    pub name: Option<DimensionSpec>,
    #[serde(default)]
    pub trellis: Vec<DimensionSpec>,
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
    /// Central tendency for range charts.
    #[serde(default = "default_tendency")]
    pub tendency: CentralTendency,
    #[serde(default)]
    pub include_error: bool,
    /// Decimal precision for box/range statistics.
    #[serde(default = "default_precision")]
    pub precision: u32,
}

fn default_tendency() -> CentralTendency {
    CentralTendency::Mean
}

fn default_precision() -> u32 {
    viz_engine::DEFAULT_PRECISION
}

impl ChartRequest {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read chart request {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parse chart request {}", path.display()))
    }

    /// Build the immutable chart settings for this request.
    pub fn settings(&self) -> ChartSettings {
        let mut builder = ChartSettings::builder();
        if let Some(spec) = &self.x {
            builder = builder.with(ChartRole::XAxis, spec.binding());
        }
        if let Some(spec) = &self.y {
            builder = builder.with(ChartRole::YAxis, spec.binding());
        }
        if let Some(spec) = &self.color_by {
            builder = builder.with(ChartRole::ColorBy, spec.binding());
        }
        if let Some(spec) = &self.series_by {
            builder = builder.with(ChartRole::SeriesBy, spec.binding());
        }
        if let Some(spec) = &self.name {
            builder = builder.with(ChartRole::Name, spec.binding());
        }
        for spec in &self.trellis {
            builder = builder.add_trellis(spec.binding());
        }
        builder.build()
    }

    /// Build the event filter set, resolving each filter spec against the
    /// domain's registry.
    pub fn event_filters<T: 'static>(
        &self,
        registry: &GroupByRegistry<T>,
    ) -> Result<Filters<Event<T>>> {
        let mut filters = Filters::empty();
        for spec in &self.filters {
            filters.push(filter_from_spec(registry, spec)?);
        }
        Ok(filters)
    }
}

fn filter_from_spec<T: 'static>(
    registry: &GroupByRegistry<T>,
    spec: &FilterSpec,
) -> Result<Box<dyn DataFilter<Event<T>>>> {
    let option = *registry.get(&spec.option)?;
    if let Some(values) = &spec.values {
        let extract = Arc::new(move |event: &Event<T>| {
            let value = option.extract(event);
            if value.is_empty() {
                None
            } else {
                Some(value.display())
            }
        });
        return Ok(Box::new(
            ValueSetFilter::empty(option.name, extract).with_values(values.clone()),
        ));
    }
    if spec.from.is_some() || spec.to.is_some() {
        let extract = Arc::new(move |event: &Event<T>| option.extract(event).as_f64());
        return Ok(Box::new(
            NumericRangeFilter::empty(option.name, extract).with_range(spec.from, spec.to),
        ));
    }
    bail!(
        "filter on `{}` needs either `values` or a `from`/`to` range",
        spec.option
    );
}
