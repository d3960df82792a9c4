pub mod columns;
pub mod error;
pub mod event;
pub mod filter;
pub mod key;
pub mod options;
pub mod selection;
pub mod settings;
pub mod subject;
pub mod value;

pub use columns::{Column, ColumnSpec};
pub use error::{EngineError, Result};
pub use event::Event;
pub use filter::{
    DataFilter, DateRangeFilter, FilterResult, Filters, NumericRangeFilter, ValueSetFilter,
};
pub use key::{BinKey, BinRank, EMPTY_BUCKET_LABEL, GroupKey, KeySlot};
pub use options::{GroupByKind, GroupByOption, GroupByParams, TimestampType};
pub use selection::{SelectionDetail, SelectionItem, SelectionValue};
pub use settings::{ChartRole, ChartSettings, ChartSettingsBuilder, DimensionBinding};
pub use subject::Subject;
pub use value::RawValue;
