//! Line/overtime chart aggregation.

use crate::grouping::build_group_key;
use crate::registry::GroupByRegistry;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;
use viz_model::{
    BinKey, ChartRole, ChartSettings, EngineError, Event, KeySlot, Result,
};

/// One point of one series, carrying the tooltip name payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub x: String,
    pub y: f64,
    pub name: String,
}

/// One series per SERIES_BY value.
///
/// `color` is the COLOR_BY value for an external coloring collaborator;
/// color assignment itself is never computed here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub series: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub points: Vec<LinePoint>,
}

/// Build one ordered series per SERIES_BY value; a chart without SERIES_BY
/// collapses into a single "All" series. Points are ordered by X rank.
/// Events with a missing X bin or no Y value are dropped from series.
pub fn line_chart<T>(
    events: &[&Event<T>],
    settings: &ChartSettings,
    registry: &GroupByRegistry<T>,
) -> Result<Vec<LineSeries>> {
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

    // series bin -> (color bin, ordered x -> points)
    let mut series: BTreeMap<Option<BinKey>, (Option<BinKey>, Vec<(BinKey, LinePoint)>)> =
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
        let series_bin = key.get(KeySlot::SeriesBy).cloned();
        let color_bin = key.get(KeySlot::ColorBy).cloned();
        let name = key
            .get(KeySlot::Name)
            .map(|bin| bin.label().to_string())
            .unwrap_or_else(|| {
                series_bin
                    .as_ref()
                    .map_or_else(|| "All".to_string(), |bin| bin.label().to_string())
            });

        let entry = series.entry(series_bin).or_insert_with(|| (color_bin, Vec::new()));
        let point = LinePoint {
            x: x.label().to_string(),
            y,
            name,
        };
        entry.1.push((x, point));
    }

    let payload: Vec<LineSeries> = series
        .into_iter()
        .map(|(series_bin, (color_bin, mut points))| {
            points.sort_by(|(a, pa), (b, pb)| {
                a.cmp(b).then_with(|| pa.y.total_cmp(&pb.y))
            });
            LineSeries {
                series: series_bin.map_or_else(|| "All".to_string(), |bin| bin.label().to_string()),
                color: color_bin.map(|bin| bin.label().to_string()),
                points: points.into_iter().map(|(_, point)| point).collect(),
            }
        })
        .collect();

    debug!(series = payload.len(), "built line chart");
    Ok(payload)
}
