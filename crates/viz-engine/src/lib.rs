//! Shared chart engine for clinical event collections.
//!
//! One request flows load → filter → group → aggregate; a chart click flows
//! the other way through the selection resolver, which replays the same
//! grouping. The engine is synchronous and stateless per invocation: every
//! stage produces new derived collections and nothing is retained between
//! calls.

pub mod aggregation;
pub mod binning;
pub mod columns;
pub mod filtering;
pub mod grouping;
pub mod registry;
pub mod selection;
pub mod stats;
pub mod timestamp;

pub use aggregation::{
    BarEntry, BarSeries, BoxPlotCell, CentralTendency, LinePoint, LineSeries, RangeEntry,
    box_plot, count_chart, line_chart, range_plot,
};
pub use binning::{
    bin_assessment_week, bin_calendar_date, bin_categorical, bin_days, bin_numeric,
};
pub use columns::{DetailsTable, details_on_demand};
pub use filtering::{apply_events, apply_subjects, available_filters};
pub use grouping::{build_group_key, x_axis_kind};
pub use registry::GroupByRegistry;
pub use selection::resolve_selection;
pub use stats::{DEFAULT_PRECISION, SummaryStats, percentile, round_to, summarize};
pub use timestamp::elapsed_days;
