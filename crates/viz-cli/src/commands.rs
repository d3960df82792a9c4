//! Command implementations.

use crate::cli::{ChartArgs, DomainArg, OptionsArgs, OutputArg};
use crate::request::{ChartKind, ChartRequest};
use anyhow::{Context, Result};
use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use serde::Serialize;
use tracing::info;
use viz_domains::adverse_event::CsvAdverseEventProvider;
use viz_domains::ctdna::CsvCtDnaProvider;
use viz_domains::lab::CsvLabProvider;
use viz_domains::vital::CsvVitalProvider;
use viz_domains::{DataProvider, DatasetHandle, adverse_event, ctdna, lab, population, vital};
use viz_engine::{
    BarSeries, BoxPlotCell, GroupByRegistry, LineSeries, RangeEntry, apply_events, box_plot,
    count_chart, line_chart, range_plot,
};
use viz_model::Event;

/// One chart payload, tagged by shape for JSON consumers.
#[derive(Debug, Serialize)]
#[serde(tag = "chart", rename_all = "snake_case")]
pub enum ChartPayload {
    Counts { series: Vec<BarSeries> },
    BoxPlot { cells: Vec<BoxPlotCell> },
    Range { entries: Vec<RangeEntry> },
    Line { series: Vec<LineSeries> },
}

pub fn run_chart(args: &ChartArgs) -> Result<()> {
    let payload = chart_payload(args)?;
    match args.output {
        OutputArg::Json => {
            let json =
                serde_json::to_string_pretty(&payload).context("serialize chart payload")?;
            println!("{json}");
        }
        OutputArg::Table => println!("{}", payload_table(&payload)),
    }
    Ok(())
}

/// Load the study, run the requested chart, and return the payload.
pub fn chart_payload(args: &ChartArgs) -> Result<ChartPayload> {
    let request = ChartRequest::load(&args.request)?;
    let study_code = args.study_code.clone().unwrap_or_else(|| {
        args.study_folder
            .file_name()
            .map_or_else(|| "STUDY".to_string(), |name| name.to_string_lossy().to_string())
    });
    let dataset = DatasetHandle::new(study_code, &args.study_folder);

    let payload = match request.domain {
        DomainArg::AdverseEvents => run_domain(
            CsvAdverseEventProvider.load_data(&dataset)?,
            &adverse_event::group_by_options(),
            &request,
        )?,
        DomainArg::Labs => run_domain(
            CsvLabProvider.load_data(&dataset)?,
            &lab::group_by_options(),
            &request,
        )?,
        DomainArg::Vitals => run_domain(
            CsvVitalProvider.load_data(&dataset)?,
            &vital::group_by_options(),
            &request,
        )?,
        DomainArg::Ctdna => run_domain(
            CsvCtDnaProvider.load_data(&dataset)?,
            &ctdna::group_by_options(),
            &request,
        )?,
    };
    Ok(payload)
}

fn run_domain<T: 'static>(
    events: Vec<Event<T>>,
    registry: &GroupByRegistry<T>,
    request: &ChartRequest,
) -> Result<ChartPayload> {
    let event_filters = request.event_filters(registry)?;
    let filtered = apply_events(&events, &event_filters, &population::filters());
    info!(
        domain = registry.domain(),
        loaded = filtered.source_count(),
        filtered = filtered.filtered_count(),
        "running chart"
    );

    let settings = request.settings();
    let payload = match request.chart {
        ChartKind::Counts => ChartPayload::Counts {
            series: count_chart(filtered.items(), &settings, registry)?,
        },
        ChartKind::BoxPlot => ChartPayload::BoxPlot {
            cells: box_plot(filtered.items(), &settings, registry, request.precision)?,
        },
        ChartKind::Range => ChartPayload::Range {
            entries: range_plot(
                filtered.items(),
                &settings,
                registry,
                request.tendency,
                request.include_error,
                request.precision,
            )?,
        },
        ChartKind::Line => ChartPayload::Line {
            series: line_chart(filtered.items(), &settings, registry)?,
        },
    };
    Ok(payload)
}

fn payload_table(payload: &ChartPayload) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    match payload {
        ChartPayload::Counts { series } => {
            table.set_header(["Series", "Category", "Count"]);
            for s in series {
                for entry in &s.entries {
                    table.add_row([
                        s.name.clone(),
                        entry.category.clone(),
                        entry.count.to_string(),
                    ]);
                }
            }
        }
        ChartPayload::BoxPlot { cells } => {
            table.set_header([
                "Trellis", "X", "Subjects", "Events", "Median", "Q1", "Q3",
            ]);
            for cell in cells {
                table.add_row([
                    cell.trellis.join(" / "),
                    cell.x.clone(),
                    cell.subject_count.to_string(),
                    cell.event_count.to_string(),
                    cell.stats.median.to_string(),
                    cell.stats.lower_quartile.to_string(),
                    cell.stats.upper_quartile.to_string(),
                ]);
            }
        }
        ChartPayload::Range { entries } => {
            table.set_header(["Trellis", "X", "Y", "Min", "Max", "Events"]);
            for entry in entries {
                table.add_row([
                    entry.trellis.join(" / "),
                    entry.x.clone(),
                    entry.y.to_string(),
                    entry.min.to_string(),
                    entry.max.to_string(),
                    entry.event_count.to_string(),
                ]);
            }
        }
        ChartPayload::Line { series } => {
            table.set_header(["Series", "X", "Y", "Name"]);
            for s in series {
                for point in &s.points {
                    table.add_row([
                        s.series.clone(),
                        point.x.clone(),
                        point.y.to_string(),
                        point.name.clone(),
                    ]);
                }
            }
        }
    }
    table
}

pub fn run_options(args: &OptionsArgs) -> Result<()> {
    let rows = match args.domain {
        DomainArg::AdverseEvents => option_rows(&adverse_event::group_by_options()),
        DomainArg::Labs => option_rows(&lab::group_by_options()),
        DomainArg::Vitals => option_rows(&vital::group_by_options()),
        DomainArg::Ctdna => option_rows(&ctdna::group_by_options()),
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(["Option", "Kind"]);
    for (name, kind) in rows {
        table.add_row([name, kind]);
    }
    println!("{table}");
    Ok(())
}

fn option_rows<T>(registry: &GroupByRegistry<T>) -> Vec<(String, String)> {
    registry
        .iter()
        .map(|option| (option.name.to_string(), format!("{:?}", option.kind)))
        .collect()
}
