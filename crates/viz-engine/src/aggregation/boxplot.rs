//! Box plot aggregation.

use crate::grouping::build_group_key;
use crate::registry::GroupByRegistry;
use crate::stats::{SummaryStats, summarize};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;
use viz_model::{
    BinKey, ChartRole, ChartSettings, EngineError, Event, KeySlot, Result,
};

/// One (trellis…, X) cell with its order statistics.
///
/// `subject_count` counts distinct contributing subjects and can be lower
/// than `event_count` for repeated-measures data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlotCell {
    pub trellis: Vec<String>,
    pub x: String,
    pub subject_count: usize,
    pub event_count: usize,
    #[serde(flatten)]
    pub stats: SummaryStats,
}

/// Group events by (X, trellis…) and compute per-cell statistics over the
/// Y-axis value at the given decimal precision.
///
/// Cells with no usable Y value are suppressed; events with a missing X bin
/// are excluded from cells (they still count in selection totals, which are
/// computed elsewhere).
pub fn box_plot<T>(
    events: &[&Event<T>],
    settings: &ChartSettings,
    registry: &GroupByRegistry<T>,
    precision: u32,
) -> Result<Vec<BoxPlotCell>> {
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

    let mut cells: BTreeMap<(Vec<BinKey>, BinKey), (Vec<f64>, BTreeSet<&str>, usize)> =
        BTreeMap::new();

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
        let cell = cells.entry((trellis, x)).or_default();
        cell.0.push(y);
        cell.1.insert(event.subject_id());
        cell.2 += 1;
    }

    let cells: Vec<BoxPlotCell> = cells
        .into_iter()
        .filter_map(|((trellis, x), (values, subjects, event_count))| {
            summarize(&values, precision).map(|stats| BoxPlotCell {
                trellis: trellis.iter().map(|bin| bin.label().to_string()).collect(),
                x: x.label().to_string(),
                subject_count: subjects.len(),
                event_count,
                stats,
            })
        })
        .collect();

    debug!(cells = cells.len(), "built box plot");
    Ok(cells)
}
