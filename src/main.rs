//! CLI entry point for the delivery dashboard pipeline.
//!
//! Provides subcommands for cleaning the raw order dataset and for rendering
//! each dashboard page (business, delivery person, restaurant) as JSON.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use delivery_dash::output::{write_cleaned_csv, write_json};
use delivery_dash::{Dashboard, DashboardConfig, OrderFilter, Traffic, ViewKind, Weather};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "delivery_dash")]
#[command(about = "Clean and aggregate delivery orders for dashboard views", long_about = None)]
struct Cli {
    /// JSON file with cleaning rules and display limits
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the raw dataset and write it back out as CSV
    Clean {
        /// Path or URL of the orders CSV (defaults to $DELIVERY_DATASET)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// CSV file to write the cleaned orders to
        #[arg(short, long, default_value = "cleaned.csv")]
        output: PathBuf,
    },
    /// Orders by day and week, traffic shares, and the country map
    Business(ViewArgs),
    /// Age and vehicle ranges, ratings, and fastest/slowest deliverers
    Deliverers(ViewArgs),
    /// Distances and delivery times by city, order type, traffic and festival
    Restaurants(ViewArgs),
}

#[derive(Args)]
struct ViewArgs {
    /// Path or URL of the orders CSV (defaults to $DELIVERY_DATASET)
    #[arg(value_name = "FILE_OR_URL")]
    source: Option<String>,

    /// Only orders placed before this date (DD-MM-YYYY or YYYY-MM-DD)
    #[arg(long, value_parser = parse_cutoff)]
    cutoff: Option<NaiveDate>,

    /// Accepted traffic densities, comma separated (default: all)
    #[arg(long, value_delimiter = ',')]
    traffic: Vec<Traffic>,

    /// Accepted weather conditions, comma separated (default: all named)
    #[arg(long, value_delimiter = ',')]
    weather: Vec<Weather>,

    /// JSON file to write the view to instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ViewArgs {
    fn filter(&self) -> OrderFilter {
        let defaults = OrderFilter::default();
        OrderFilter {
            cutoff: self.cutoff.unwrap_or(defaults.cutoff),
            traffic: if self.traffic.is_empty() {
                defaults.traffic
            } else {
                self.traffic.iter().copied().collect()
            },
            weather: if self.weather.is_empty() {
                defaults.weather
            } else {
                self.weather.iter().cloned().collect()
            },
        }
    }
}

fn parse_cutoff(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%d-%m-%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map_err(|e| format!("invalid date {value:?}: {e}"))
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/delivery_dash.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("delivery_dash.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(LevelFilter::INFO.into()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive(LevelFilter::DEBUG.into()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = format!("{e:#}"), "Render aborted");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };

    match cli.command {
        Commands::Clean { source, output } => {
            let source = resolve_source(source)?;
            let dashboard = Dashboard::load(&source, config)?;
            let report = dashboard.report();
            info!(
                total = report.total_rows,
                kept = report.kept,
                dropped = report.dropped(),
                "Dataset cleaned"
            );
            write_cleaned_csv(&output, dashboard.orders(), &dashboard.config().cleaning)?;
        }
        Commands::Business(args) => render(ViewKind::Business, args, config)?,
        Commands::Deliverers(args) => render(ViewKind::DeliveryPerson, args, config)?,
        Commands::Restaurants(args) => render(ViewKind::Restaurant, args, config)?,
    }

    Ok(())
}

/// Loads, cleans and filters the dataset, then writes one page as JSON.
#[tracing::instrument(skip(args, config))]
fn render(kind: ViewKind, args: ViewArgs, config: DashboardConfig) -> Result<()> {
    let source = resolve_source(args.source.clone())?;
    let filter = args.filter();
    info!(
        cutoff = %filter.cutoff,
        traffic = filter.traffic.len(),
        weather = filter.weather.len(),
        "Filter selected"
    );

    let dashboard = Dashboard::load(&source, config)?;
    let view = dashboard.render(kind, &filter);
    write_json(args.output.as_deref(), &view).context("Failed to write view")
}

fn resolve_source(source: Option<String>) -> Result<String> {
    source
        .or_else(|| std::env::var("DELIVERY_DATASET").ok())
        .ok_or_else(|| anyhow!("No dataset given: pass FILE_OR_URL or set DELIVERY_DATASET"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cutoff_formats() {
        let expected = NaiveDate::from_ymd_opt(2022, 4, 13).unwrap();
        assert_eq!(parse_cutoff("13-04-2022").unwrap(), expected);
        assert_eq!(parse_cutoff("2022-04-13").unwrap(), expected);
        assert!(parse_cutoff("April 13").is_err());
    }

    #[test]
    fn test_view_args_filter() {
        let cli = Cli::try_parse_from([
            "delivery_dash",
            "business",
            "train.csv",
            "--cutoff",
            "01-03-2022",
            "--traffic",
            "Low,Jam",
        ])
        .unwrap();

        let Commands::Business(args) = cli.command else {
            panic!("expected business subcommand");
        };
        let filter = args.filter();
        assert_eq!(filter.cutoff, NaiveDate::from_ymd_opt(2022, 3, 1).unwrap());
        assert_eq!(filter.traffic.len(), 2);
        assert!(filter.traffic.contains(&Traffic::Jam));
        assert_eq!(filter.weather.len(), 6);
    }
}
