//! Selection coordinates and reverse-resolution output.

use crate::key::KeySlot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One selected value for a key slot: either an exact bin label (categorical
/// roles) or a closed numeric rank interval `[from, to]` (range selections).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionValue {
    Exact(String),
    Range { from: f64, to: f64 },
}

/// One selected chart coordinate: the slot values identifying a clicked
/// region. An event matches the item when every listed slot matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionItem {
    pub values: Vec<(KeySlot, SelectionValue)>,
}

impl SelectionItem {
    pub fn new(values: Vec<(KeySlot, SelectionValue)>) -> Self {
        Self { values }
    }

    /// Convenience for a single exact X-axis category.
    pub fn x_category(label: impl Into<String>) -> Self {
        Self::new(vec![(KeySlot::XAxis, SelectionValue::Exact(label.into()))])
    }

    /// Convenience for an X-axis rank range.
    pub fn x_range(from: f64, to: f64) -> Self {
        Self::new(vec![(KeySlot::XAxis, SelectionValue::Range { from, to })])
    }
}

/// The exact records behind a chart selection, plus pre-selection totals for
/// percentage displays.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionDetail {
    pub event_ids: BTreeSet<String>,
    pub subject_ids: BTreeSet<String>,
    /// Events in the filtered (but unselected) set.
    pub total_events: usize,
    /// Distinct subjects in the filtered (but unselected) set.
    pub total_subjects: usize,
}

impl SelectionDetail {
    pub fn event_count(&self) -> usize {
        self.event_ids.len()
    }

    pub fn subject_count(&self) -> usize {
        self.subject_ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_round_trip() {
        let item = SelectionItem::new(vec![
            (KeySlot::XAxis, SelectionValue::Range { from: 30.0, to: 34.0 }),
            (KeySlot::ColorBy, SelectionValue::Exact("MILD".to_string())),
        ]);
        let json = serde_json::to_string(&item).expect("serialize selection item");
        let round: SelectionItem = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(round, item);
    }
}
