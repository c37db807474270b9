use std::fs;
use std::path::{Path, PathBuf};

use analytics::{format_percent, ReturnCalculator};
use anyhow::Context;
use chart::{attach, Chart, ChartContainer, FanChartView, PointerEvent, PriceChart, SvgSurface};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{init_logging, load_config, load_config_from, LogFormat, Settings};
use core_types::{Period, PriceField};
use events::ChartEvent;
use fan_chart::FanChartOptions;
use interpolation::PipelineOptions;
use price_store::PriceSeries;

/// The main entry point for the Fundscope command-line tool.
fn main() -> anyhow::Result<()> {
    // Load FUNDSCOPE__* overrides from a .env file, if there is one.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }
    let _log_guard = init_logging(&settings.logging)?;

    match cli.command {
        Commands::Returns(args) => handle_returns(args, &settings),
        Commands::Chart(args) => handle_chart(args, &settings),
        Commands::Hover(args) => handle_hover(args, &settings),
        Commands::Fan(args) => handle_fan(args, &settings),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Period returns, price charts and simulation fan charts for an ETF.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of ./fundscope.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides `logging.format` from the configuration.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the period returns table for a daily price payload.
    Returns(ReturnsArgs),
    /// Render the NAV / market / index chart to an SVG file.
    Chart(ChartArgs),
    /// Print the legend values the chart shows for a pointer position.
    Hover(HoverArgs),
    /// Render a Monte Carlo fan chart to an SVG file.
    Fan(FanArgs),
}

#[derive(Parser)]
struct ReturnsArgs {
    /// JSON file with the daily price payload.
    #[arg(long)]
    payload: PathBuf,

    /// The date returns are measured from (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    as_of: Option<NaiveDate>,
}

#[derive(Parser)]
struct WindowArgs {
    /// JSON file with the daily price payload.
    #[arg(long)]
    payload: PathBuf,

    /// Lookback window shown on the chart (e.g. "1년", "3m", "5y").
    #[arg(long, default_value = "1y")]
    period: Period,

    /// The date the window ends on (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    as_of: Option<NaiveDate>,
}

#[derive(Parser)]
struct ChartArgs {
    #[command(flatten)]
    window: WindowArgs,

    /// Where to write the SVG document.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser)]
struct HoverArgs {
    #[command(flatten)]
    window: WindowArgs,

    /// Horizontal pointer position, in surface pixels.
    #[arg(long)]
    x: f64,

    /// Vertical pointer position. Defaults to the middle of the surface.
    #[arg(long)]
    y: Option<f64>,
}

#[derive(Parser)]
struct FanArgs {
    /// JSON file with the simulation result.
    #[arg(long)]
    payload: PathBuf,

    /// Simulation horizon in years. Derived from the payload when omitted.
    #[arg(long)]
    years: Option<u32>,

    /// Where to write the SVG document.
    #[arg(long)]
    out: PathBuf,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read payload {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Payload {} is not valid JSON", path.display()))
}

fn load_series(path: &Path) -> anyhow::Result<PriceSeries> {
    let series = price_store::ingest(&read_json(path)?);
    tracing::info!(points = series.len(), payload = %path.display(), "Loaded price series.");
    Ok(series)
}

fn today_or(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| Local::now().date_naive())
}

fn handle_returns(args: ReturnsArgs, settings: &Settings) -> anyhow::Result<()> {
    let series = load_series(&args.payload)?;
    let report = ReturnCalculator::as_of(today_or(args.as_of)).report(&series);

    let mut table = Table::new();
    let mut header = vec!["Period".to_string()];
    header.extend(PriceField::ALL.iter().map(|f| f.display_name().to_string()));
    table.set_header(header);
    for row in &report.rows {
        let mut cells = vec![row.period.label().to_string()];
        cells.extend(
            PriceField::ALL
                .iter()
                .map(|f| format_percent(row.figure(*f).percent_change, &settings.returns.empty_marker)),
        );
        table.add_row(cells);
    }

    match report.latest_date {
        Some(date) => println!("Returns as of {} (latest close {date})", report.as_of),
        None => println!("Returns as of {} (no observations)", report.as_of),
    }
    println!("{table}");
    Ok(())
}

fn price_chart(window: &WindowArgs, settings: &Settings) -> anyhow::Result<PriceChart> {
    let series = load_series(&window.payload)?;
    let today = today_or(window.as_of);
    let start = window
        .period
        .target_date(today)
        .with_context(|| format!("Window {} before {today} is out of range", window.period))?;
    let options = PipelineOptions {
        smoothing: settings.pipeline.smoothing,
    };
    Ok(PriceChart::new(series.window_since(start), options))
}

fn handle_chart(args: ChartArgs, settings: &Settings) -> anyhow::Result<()> {
    let model = price_chart(&args.window, settings)?;
    let container = ChartContainer::shared();
    let handle = attach(&container, Chart::new(model, &settings.chart, SvgSurface::new()))?;

    let svg = handle.chart().surface().to_svg();
    fs::write(&args.out, svg).with_context(|| format!("Failed to write {}", args.out.display()))?;
    println!("Wrote {}", args.out.display());
    Ok(())
}

fn handle_hover(args: HoverArgs, settings: &Settings) -> anyhow::Result<()> {
    let model = price_chart(&args.window, settings)?;
    let container = ChartContainer::shared();
    let handle = attach(&container, Chart::new(model, &settings.chart, SvgSurface::new()))?;

    let y = args.y.unwrap_or(settings.chart.height / 2.0);
    container.borrow_mut().dispatch(&PointerEvent::Move { x: args.x, y });

    let state = handle.hover_state();
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

fn handle_fan(args: FanArgs, settings: &Settings) -> anyhow::Result<()> {
    let raw = read_json(&args.payload)?;
    let options = FanChartOptions {
        target_years: args.years.or(settings.fan_chart.target_years),
        max_sample_paths: settings.fan_chart.max_sample_paths,
    };
    let view = match fan_chart::normalize(&raw, &options) {
        Ok(chart) => FanChartView::new(chart),
        Err(e) => {
            eprintln!("Simulation payload rejected: {e}");
            FanChartView::empty()
        }
    };
    let summary = view.chart().map(|chart| chart.summary());

    let container = ChartContainer::shared();
    let chart = Chart::new(view, &settings.chart, SvgSurface::new()).on_event(|event| {
        if let ChartEvent::EmptyState { message, .. } = event {
            eprintln!("{message}");
        }
    });
    let handle = attach(&container, chart)?;
    let svg = handle.chart().surface().to_svg();
    fs::write(&args.out, svg).with_context(|| format!("Failed to write {}", args.out.display()))?;
    println!("Wrote {}", args.out.display());

    if let Some(summary) = summary {
        let marker = &settings.returns.empty_marker;
        let value = |v: Option<f64>| v.map_or_else(|| marker.clone(), |v| format!("{v:.2}"));
        println!("Horizon: {} years", summary.years);
        println!("Terminal p05: {:.2}", summary.terminal_p05);
        println!("Terminal p50: {:.2}", summary.terminal_p50);
        println!("Terminal p95: {:.2}", summary.terminal_p95);
        println!("Principal:    {}", value(summary.principal));
    }
    Ok(())
}
