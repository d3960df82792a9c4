//! Clinical trial chart engine CLI.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use viz_cli::cli::{Cli, Command, LogFormatArg};
use viz_cli::commands::{run_chart, run_options};
use viz_cli::logging::{LogConfig, LogFormat, init_logging};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    init_logging(&log_config_from_cli(&cli));

    let exit_code = match &cli.command {
        Command::Chart(args) => match run_chart(args) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Options(args) => match run_options(args) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stderr().is_terminal(),
    };
    LogConfig::default()
        .with_level_filter(cli.verbosity.tracing_level_filter())
        .with_format(format)
        .with_ansi(with_ansi)
}
