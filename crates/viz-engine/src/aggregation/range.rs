//! Range (central tendency + min/max) plot aggregation.

use crate::grouping::build_group_key;
use crate::registry::GroupByRegistry;
use crate::stats::summarize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use viz_model::{
    BinKey, ChartRole, ChartSettings, EngineError, Event, KeySlot, Result,
};

/// Selectable central tendency for the range plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CentralTendency {
    Mean,
    Median,
}

/// One (trellis…, X) cell: central value, observed extremes, and optional
/// standard error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeEntry {
    pub trellis: Vec<String>,
    pub x: String,
    pub y: f64,
    pub min: f64,
    pub max: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_err: Option<f64>,
    pub event_count: usize,
}

/// Same binning and empty-cell suppression as the box plot, reporting one
/// central value per cell instead of the full five-number summary.
pub fn range_plot<T>(
    events: &[&Event<T>],
    settings: &ChartSettings,
    registry: &GroupByRegistry<T>,
    tendency: CentralTendency,
    include_error: bool,
    precision: u32,
) -> Result<Vec<RangeEntry>> {
    settings
        .get(ChartRole::XAxis)
        .ok_or_else(|| EngineError::MissingRole {
            role: "X_AXIS".to_string(),
        })?;
    let y_binding = settings
        .get(ChartRole::YAxis)
        .ok_or_else(|| EngineError::MissingRole {
            role: "Y_AXIS".to_string(),
        })?;
    let y_option = registry.get(&y_binding.option)?;

    let mut cells: BTreeMap<(Vec<BinKey>, BinKey), Vec<f64>> = BTreeMap::new();
    for event in events {
        let Some(y) = y_option.extract(event).as_f64() else {
            continue;
        };
        let key = build_group_key(event, settings, registry)?;
        let x = key
            .get(KeySlot::XAxis)
            .expect("x axis configured")
            .clone();
        if x.is_missing() {
            continue;
        }
        let trellis: Vec<BinKey> = key.trellis_bins().into_iter().cloned().collect();
        cells.entry((trellis, x)).or_default().push(y);
    }

    let entries: Vec<RangeEntry> = cells
        .into_iter()
        .filter_map(|((trellis, x), values)| {
            summarize(&values, precision).map(|stats| RangeEntry {
                trellis: trellis.iter().map(|bin| bin.label().to_string()).collect(),
                x: x.label().to_string(),
                y: match tendency {
                    CentralTendency::Mean => stats.mean,
                    CentralTendency::Median => stats.median,
                },
                min: stats.min,
                max: stats.max,
                std_err: if include_error { stats.std_err } else { None },
                event_count: stats.count,
            })
        })
        .collect();

    debug!(cells = entries.len(), "built range plot");
    Ok(entries)
}
