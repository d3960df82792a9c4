//! "Details on demand" column metadata.
//!
//! Each record type hand-maintains an ordered list of (field, label, value)
//! columns. Declaration order is the display order; no runtime reflection is
//! involved.

use crate::event::Event;
use crate::value::RawValue;

/// One details-table column for events of type `T`.
pub struct Column<T> {
    pub field: &'static str,
    pub label: &'static str,
    pub value: fn(&Event<T>) -> RawValue,
}

impl<T> Column<T> {
    pub const fn new(
        field: &'static str,
        label: &'static str,
        value: fn(&Event<T>) -> RawValue,
    ) -> Self {
        Self {
            field,
            label,
            value,
        }
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Column<T> {}

/// The ordered column list for one record type.
pub struct ColumnSpec<T> {
    columns: Vec<Column<T>>,
}

impl<T> ColumnSpec<T> {
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
