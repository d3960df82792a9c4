//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "trial-viz",
    version,
    about = "Clinical trial chart engine - aggregate study events into chart payloads",
    long_about = "Load clinical study events from a CSV study folder, apply filters,\n\
                  group them along the requested dimensions, and print chart-ready\n\
                  payloads (counts, box plots, range plots, overtime lines)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a chart request against a study folder and print the payload.
    Chart(ChartArgs),

    /// List the group-by dimensions a clinical domain declares.
    Options(OptionsArgs),
}

#[derive(Parser)]
pub struct ChartArgs {
    /// Path to the study data folder containing CSV files.
    #[arg(value_name = "STUDY_FOLDER")]
    pub study_folder: PathBuf,

    /// Path to the chart request JSON file.
    #[arg(value_name = "REQUEST")]
    pub request: PathBuf,

    /// Study code recorded on loaded subjects (default: folder name).
    #[arg(long = "study-code")]
    pub study_code: Option<String>,

    /// Output rendering.
    #[arg(long = "output", value_enum, default_value = "json")]
    pub output: OutputArg,
}

#[derive(Parser)]
pub struct OptionsArgs {
    /// Clinical domain to describe.
    #[arg(value_enum, value_name = "DOMAIN")]
    pub domain: DomainArg,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    Json,
    Table,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum, serde::Deserialize, Debug)]
#[serde(rename_all = "snake_case")]
pub enum DomainArg {
    AdverseEvents,
    Labs,
    Vitals,
    Ctdna,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
