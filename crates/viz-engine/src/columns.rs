//! "Details on demand" table rendering.

use serde::Serialize;
use viz_model::{ColumnSpec, Event};

/// The rendered details table: column metadata in declaration order plus
/// one row per event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailsTable {
    /// (field, label) pairs, in the spec's declaration order.
    pub columns: Vec<(String, String)>,
    pub rows: Vec<Vec<String>>,
}

/// Render events against a column spec.
///
/// Declaration order is preserved. A column is omitted only when its value
/// is absent for *every* event in the current set; a column that is blank
/// for some rows but present in others is kept, with empty cells.
pub fn details_on_demand<T>(events: &[&Event<T>], spec: &ColumnSpec<T>) -> DetailsTable {
    let kept: Vec<usize> = spec
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, column)| {
            events
                .iter()
                .any(|event| !(column.value)(event).is_empty())
        })
        .map(|(index, _)| index)
        .collect();

    let columns = kept
        .iter()
        .map(|&index| {
            let column = &spec.columns()[index];
            (column.field.to_string(), column.label.to_string())
        })
        .collect();

    let rows = events
        .iter()
        .map(|event| {
            kept.iter()
                .map(|&index| (spec.columns()[index].value)(event).display())
                .collect()
        })
        .collect();

    DetailsTable { columns, rows }
}
