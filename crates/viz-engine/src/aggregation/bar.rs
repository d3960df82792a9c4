//! Bar/count chart aggregation.

use crate::grouping::{build_group_key, x_axis_kind};
use crate::registry::GroupByRegistry;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;
use viz_model::{
    BinKey, ChartRole, ChartSettings, EngineError, Event, GroupByKind, KeySlot, Result,
};

/// One X category within a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarEntry {
    pub category: String,
    pub count: usize,
}

/// One colored series; `"All"` when no COLOR_BY dimension is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub entries: Vec<BarEntry>,
}

/// Group events by (X, COLOR) and count each cell.
///
/// Every series carries one entry per discovered X category (zero counts
/// included) so series stay aligned for stacked/grouped rendering. Entries
/// are ordered by X rank, series by color rank. Events whose temporal X bin
/// is missing (no anchor date) are dropped from the series; a missing
/// categorical/numeric X value is charted as the "(Empty)" category, last.
pub fn count_chart<T>(
    events: &[&Event<T>],
    settings: &ChartSettings,
    registry: &GroupByRegistry<T>,
) -> Result<Vec<BarSeries>> {
    settings
        .get(ChartRole::XAxis)
        .ok_or_else(|| EngineError::MissingRole {
            role: "X_AXIS".to_string(),
        })?;
    let x_kind = x_axis_kind(settings, registry)?;

    let mut cells: BTreeMap<Option<BinKey>, BTreeMap<BinKey, usize>> = BTreeMap::new();
    let mut categories: BTreeSet<BinKey> = BTreeSet::new();

    for event in events {
        let key = build_group_key(event, settings, registry)?;
        let x = key
            .get(KeySlot::XAxis)
            .expect("x axis configured")
            .clone();
        if x.is_missing() && x_kind == Some(GroupByKind::Temporal) {
            continue;
        }
        let color = key.get(KeySlot::ColorBy).cloned();
        categories.insert(x.clone());
        *cells.entry(color).or_default().entry(x).or_default() += 1;
    }

    let series: Vec<BarSeries> = cells
        .into_iter()
        .map(|(color, counts)| BarSeries {
            name: color.map_or_else(|| "All".to_string(), |bin| bin.label().to_string()),
            entries: categories
                .iter()
                .map(|x| BarEntry {
                    category: x.label().to_string(),
                    count: counts.get(x).copied().unwrap_or(0),
                })
                .collect(),
        })
        .collect();

    debug!(
        series = series.len(),
        categories = categories.len(),
        "built count chart"
    );
    Ok(series)
}
