//! Command-line parsing for the GDP chart tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the transform/render code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::ChartVariant;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gdp", version, about = "US GDP chart: fetch, shape, and render quarterly GDP")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive terminal chart.
    ///
    /// Arrow keys move the pointer across bars; the tooltip follows.
    Tui(ChartArgs),
    /// Render the chart to an SVG (or HTML) file.
    Svg(SvgArgs),
    /// Print the transformed records (useful for scripting).
    Records(RecordsArgs),
}

/// Where to load the dataset from.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Dataset URL (defaults to $GDP_DATA_URL, then the public GDP dataset).
    #[arg(long, conflicts_with_all = ["input", "demo"])]
    pub url: Option<String>,

    /// Read the dataset JSON from a local file instead of the network.
    #[arg(short = 'i', long, value_name = "JSON", conflicts_with = "demo")]
    pub input: Option<PathBuf>,

    /// Use a synthetic quarterly series (no network).
    #[arg(long)]
    pub demo: bool,

    /// Random seed for the synthetic series.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of quarters in the synthetic series.
    #[arg(long, default_value_t = 275)]
    pub quarters: usize,

    /// First year of the synthetic series.
    #[arg(long, default_value_t = 1947)]
    pub start_year: i32,
}

/// Chart size, margins and labelling.
#[derive(Debug, Args, Clone)]
pub struct LayoutArgs {
    /// Chart width (pixels).
    #[arg(long, default_value_t = 900.0)]
    pub width: f64,

    /// Chart height (pixels).
    #[arg(long, default_value_t = 500.0)]
    pub height: f64,

    #[arg(long, default_value_t = 60.0)]
    pub margin_top: f64,

    #[arg(long, default_value_t = 40.0)]
    pub margin_right: f64,

    #[arg(long, default_value_t = 60.0)]
    pub margin_bottom: f64,

    #[arg(long, default_value_t = 80.0)]
    pub margin_left: f64,

    /// Chart title.
    #[arg(long, default_value = crate::domain::DEFAULT_TITLE)]
    pub title: String,

    /// Mark style.
    #[arg(long, value_enum, default_value_t = ChartVariant::Bar)]
    pub variant: ChartVariant,
}

#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

#[derive(Debug, Args, Clone)]
pub struct SvgArgs {
    #[command(flatten)]
    pub chart: ChartArgs,

    /// Output path.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub out: PathBuf,

    /// Write a full HTML page (chart + tooltip element) instead of bare SVG.
    #[arg(long)]
    pub html: bool,
}

#[derive(Debug, Args, Clone)]
pub struct RecordsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only print the first N records.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Export all records to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Transform for this chart variant (scatter drops the raw date column).
    #[arg(long, value_enum, default_value_t = ChartVariant::Bar)]
    pub variant: ChartVariant,
}
