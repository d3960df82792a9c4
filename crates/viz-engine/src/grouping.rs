//! Composite group-key construction.
//!
//! One group key is built per event from the chart settings: trellis
//! dimensions, the X axis, and the color/series/name dimensions, each
//! extracted through the domain registry and binned. Sort order is part of
//! the output: every bin carries a rank, dynamically discovered categories
//! fall back to alphabetical order, and the missing bucket sorts last.

use crate::binning::{bin_assessment_week, bin_calendar_date, bin_categorical, bin_days, bin_numeric};
use crate::registry::GroupByRegistry;
use crate::timestamp::elapsed_days;
use viz_model::{
    BinKey, ChartRole, ChartSettings, DimensionBinding, Event, GroupByKind, GroupByParams,
    GroupKey, KeySlot, RawValue, Result, Subject, TimestampType,
};

/// Bin one extracted value for one dimension binding.
///
/// Axis slots always bin according to the option kind; other slots pass
/// through categorically unless their params explicitly request binning.
fn bin_dimension(
    raw: &RawValue,
    subject: &Subject,
    kind: GroupByKind,
    params: &GroupByParams,
    is_axis: bool,
) -> BinKey {
    if !is_axis && !params.requests_binning() {
        return bin_categorical(raw);
    }
    match kind {
        GroupByKind::Categorical => bin_categorical(raw),
        GroupByKind::Numeric => bin_numeric(raw.as_f64(), params.bin_size.unwrap_or(1.0)),
        GroupByKind::Temporal => bin_temporal(raw, subject, params),
    }
}

fn bin_temporal(raw: &RawValue, subject: &Subject, params: &GroupByParams) -> BinKey {
    let timestamp_type = params.timestamp_type.unwrap_or(TimestampType::Date);
    match timestamp_type {
        TimestampType::Date => bin_calendar_date(raw.as_date(), params.bin_size.unwrap_or(1.0)),
        TimestampType::AssessmentWeekWithBaseline => {
            bin_assessment_week(elapsed_days(raw.as_date(), subject, timestamp_type, params))
        }
        _ => bin_days(
            elapsed_days(raw.as_date(), subject, timestamp_type, params),
            params.bin_size.unwrap_or(1.0),
        ),
    }
}

fn bin_binding<T>(
    event: &Event<T>,
    binding: &DimensionBinding,
    registry: &GroupByRegistry<T>,
    is_axis: bool,
) -> Result<BinKey> {
    let option = registry.get(&binding.option)?;
    let raw = option.extract(event);
    Ok(bin_dimension(
        &raw,
        event.subject(),
        option.kind,
        &binding.params,
        is_axis,
    ))
}

/// Build the composite group key for one event under the given settings.
///
/// The entry order is fixed (X axis, color, series, name, trellis slots in
/// declaration order) so equal configurations always produce structurally
/// equal keys. Roles the settings do not assign are simply absent.
pub fn build_group_key<T>(
    event: &Event<T>,
    settings: &ChartSettings,
    registry: &GroupByRegistry<T>,
) -> Result<GroupKey> {
    let mut entries: Vec<(KeySlot, BinKey)> = Vec::new();

    if let Some(binding) = settings.get(ChartRole::XAxis) {
        entries.push((KeySlot::XAxis, bin_binding(event, binding, registry, true)?));
    }
    if let Some(binding) = settings.get(ChartRole::ColorBy) {
        entries.push((
            KeySlot::ColorBy,
            bin_binding(event, binding, registry, false)?,
        ));
    }
    if let Some(binding) = settings.get(ChartRole::SeriesBy) {
        entries.push((
            KeySlot::SeriesBy,
            bin_binding(event, binding, registry, false)?,
        ));
    }
    if let Some(binding) = settings.get(ChartRole::Name) {
        entries.push((KeySlot::Name, bin_binding(event, binding, registry, false)?));
    }
    for (index, binding) in settings.trellis().iter().enumerate() {
        entries.push((
            KeySlot::Trellis(index),
            bin_binding(event, binding, registry, false)?,
        ));
    }

    Ok(GroupKey::new(entries))
}

/// Kind of the configured X-axis option, when one is configured.
///
/// Aggregators use this to decide how missing X bins are treated: a missing
/// temporal bin (no anchor date) drops the event from the series, while a
/// missing categorical/numeric value is charted as the "(Empty)" category.
pub fn x_axis_kind<T>(
    settings: &ChartSettings,
    registry: &GroupByRegistry<T>,
) -> Result<Option<GroupByKind>> {
    settings
        .get(ChartRole::XAxis)
        .map(|binding| registry.get(&binding.option).map(|option| option.kind))
        .transpose()
}
