use std::path::PathBuf;
use std::process::ExitCode;
use anyhow::Result;
use clap::Parser;
use log::{error, info};
use crate::canvas::svg::SvgCanvas;
use crate::config::load_config;
use crate::initialization::{init, init_logging};
use crate::layout::LayoutMode;
use crate::report::{generate, ReportSettings};

mod aggregation;
mod banding;
mod bucketing;
mod canvas;
mod config;
mod errors;
mod geometry;
mod initialization;
mod layout;
mod locale;
mod manager_icons;
mod manager_owm;
mod models;
mod renderer;
mod report;

/// Renders a five day weather forecast report for a city
#[derive(Parser, Debug)]
#[command(name = "meteoreport", version, about)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// City overriding the configured one
    #[arg(long)]
    city: Option<String>,

    /// Layout mode: overview, detailed or compact
    #[arg(short, long)]
    mode: Option<LayoutMode>,

    /// Output file overriding the configured one
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Leave out the hourly detail tables
    #[arg(long)]
    no_hourly: bool,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("report failed: {:#}", e);
            eprintln!("meteoreport: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(&cli.config)?;
    if let Some(city) = cli.city {
        config.report.city = city;
    }
    if let Some(mode) = cli.mode {
        config.report.mode = mode;
    }
    if cli.no_hourly {
        config.report.hourly_detail = false;
    }
    let output = cli.output.unwrap_or_else(|| PathBuf::from(&config.report.output));

    init_logging(&config.general)?;
    let mgr = init(&config)?;

    let settings = ReportSettings::from_config(&config)?;
    let mut canvas = SvgCanvas::new(config.report.page_width, config.report.page_height);
    let outcome = generate(&settings, &mgr.source, &mgr.icons, &mut canvas, &output)?;

    info!("done: {} days, {} pages, uv available: {}, icon placeholders: {}",
        outcome.days, outcome.pages, outcome.uv_available, outcome.icon_placeholders);
    println!("{}", outcome.output.display());

    Ok(())
}
