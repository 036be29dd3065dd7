//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs logging
//! - loads the GDP dataset and renders the chart
//! - writes SVG/HTML/CSV outputs or launches the TUI

use clap::Parser;

use crate::cli::{ChartArgs, Command, LayoutArgs, RecordsArgs, SourceArgs, SvgArgs};
use crate::domain::{ChartConfig, ChartDimensions, ChartLayout, Margins, SampleConfig, SourceConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `gdp` binary.
pub fn run() -> Result<(), AppError> {
    // `gdp` and `gdp --demo` behave like `gdp tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // The TUI owns the terminal; keep stderr quiet unless asked.
    let default_level = match cli.command {
        Command::Tui(_) => "warn",
        _ => "info",
    };
    crate::logging::init(default_level);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Svg(args) => handle_svg(args),
        Command::Records(args) => handle_records(args),
    }
}

fn handle_tui(args: ChartArgs) -> Result<(), AppError> {
    crate::tui::run(chart_config_from_args(&args))
}

fn handle_svg(args: SvgArgs) -> Result<(), AppError> {
    let config = chart_config_from_args(&args.chart);
    let run = pipeline::run_chart(&config)?;

    if args.html {
        crate::io::export::write_html(&args.out, &run.scene, &run.layout.title)?;
    } else {
        crate::io::export::write_svg(&args.out, &run.scene, &run.chart)?;
    }

    println!(
        "Wrote {} marks ({}) to {}",
        run.chart.marks.len(),
        run.layout.variant.display_name(),
        args.out.display()
    );
    Ok(())
}

fn handle_records(args: RecordsArgs) -> Result<(), AppError> {
    let config = ChartConfig {
        source: source_config_from_args(&args.source),
        layout: ChartLayout {
            variant: args.variant,
            ..ChartLayout::default()
        },
    };
    let loaded = pipeline::load_records(&config)?;

    println!("{}", crate::report::format_summary(&loaded.dataset, &loaded.records));
    println!("{}", crate::report::format_records(&loaded.records, args.limit));

    if let Some(path) = &args.export {
        crate::io::export::write_records_csv(path, &loaded.records)?;
    }
    Ok(())
}

pub fn chart_config_from_args(args: &ChartArgs) -> ChartConfig {
    ChartConfig {
        source: source_config_from_args(&args.source),
        layout: layout_from_args(&args.layout),
    }
}

pub fn source_config_from_args(args: &SourceArgs) -> SourceConfig {
    if args.demo {
        return SourceConfig::Demo(SampleConfig {
            seed: args.seed,
            quarters: args.quarters,
            start_year: args.start_year,
        });
    }
    if let Some(path) = &args.input {
        return SourceConfig::File { path: path.clone() };
    }
    SourceConfig::Remote {
        data_source_url: crate::data::resolve_data_url(args.url.as_deref()),
    }
}

pub fn layout_from_args(args: &LayoutArgs) -> ChartLayout {
    ChartLayout {
        dimensions: ChartDimensions {
            width: args.width,
            height: args.height,
        },
        margins: Margins {
            top: args.margin_top,
            right: args.margin_right,
            bottom: args.margin_bottom,
            left: args.margin_left,
        },
        title: args.title.clone(),
        variant: args.variant,
        ..ChartLayout::default()
    }
}

/// Rewrite argv so `gdp` defaults to `gdp tui`.
///
/// Rules:
/// - `gdp`                      -> `gdp tui`
/// - `gdp --demo ...`           -> `gdp tui --demo ...`
/// - `gdp --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "svg" | "records");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
