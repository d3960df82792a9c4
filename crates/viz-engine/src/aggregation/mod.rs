//! Chart-ready aggregation over grouped events.
//!
//! Each aggregator is a pure function from filtered events + settings to a
//! serializable payload. Zero surviving events produce an empty payload,
//! never an error.

mod bar;
mod boxplot;
mod line;
mod range;

pub use bar::{BarEntry, BarSeries, count_chart};
pub use boxplot::{BoxPlotCell, box_plot};
pub use line::{LinePoint, LineSeries, line_chart};
pub use range::{CentralTendency, RangeEntry, range_plot};
