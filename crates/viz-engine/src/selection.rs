//! Reverse selection resolution: chart coordinate back to record ids.
//!
//! This is the correctness-critical twin of the aggregators: it replays the
//! exact key-building logic used to draw the chart, then tests membership.
//! Any divergence between how a bin is built for display and how it is
//! matched here is a defect.

use crate::grouping::build_group_key;
use crate::registry::GroupByRegistry;
use std::collections::BTreeSet;
use tracing::debug;
use viz_model::{
    BinKey, ChartSettings, Event, Result, SelectionDetail, SelectionItem, SelectionValue,
};

fn bin_matches(bin: &BinKey, value: &SelectionValue) -> bool {
    match value {
        // Label comparison, exactly as the chart rendered it. The missing
        // bucket and a literal "(Empty)" code share a label, so clicking
        // that bar selects both; the distinction is internal to binning.
        SelectionValue::Exact(label) => bin.label() == label,
        // Closed interval over the numeric rank; an inverted range matches
        // nothing, mirroring the filter engine's stance on UI input.
        SelectionValue::Range { from, to } => bin
            .numeric_rank()
            .is_some_and(|rank| rank >= *from && rank <= *to),
    }
}

fn item_matches(key_bins: &[(viz_model::KeySlot, BinKey)], item: &SelectionItem) -> bool {
    item.values.iter().all(|(slot, value)| {
        key_bins
            .iter()
            .find(|(key_slot, _)| key_slot == slot)
            .is_some_and(|(_, bin)| bin_matches(bin, value))
    })
}

/// Resolve selected chart coordinates to the exact underlying records.
///
/// `events` is the filtered-but-unselected set; totals are computed over
/// all of it, so percentage-of-total displays are stable regardless of
/// which cell was clicked. A coordinate matching zero events (stale client
/// state) resolves to an empty detail with correct totals.
pub fn resolve_selection<T>(
    events: &[&Event<T>],
    settings: &ChartSettings,
    registry: &GroupByRegistry<T>,
    items: &[SelectionItem],
) -> Result<SelectionDetail> {
    let mut detail = SelectionDetail::default();
    let mut all_subjects: BTreeSet<&str> = BTreeSet::new();

    for event in events {
        all_subjects.insert(event.subject_id());
        let key = build_group_key(event, settings, registry)?;
        if items.iter().any(|item| item_matches(key.entries(), item)) {
            detail.event_ids.insert(event.id().to_string());
            detail.subject_ids.insert(event.subject_id().to_string());
        }
    }

    detail.total_events = events.len();
    detail.total_subjects = all_subjects.len();
    debug!(
        matched_events = detail.event_ids.len(),
        matched_subjects = detail.subject_ids.len(),
        total_events = detail.total_events,
        "resolved selection"
    );
    Ok(detail)
}
