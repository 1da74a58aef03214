//! CLI entry point for the period-of-record summary tool.
//!
//! Loads a period-of-record CSV from a file or URL, runs it through a
//! background summary worker, and writes the per-site, per-year summary as
//! JSON.

use anyhow::Result;
use clap::{Parser, Subcommand};
use por_summary::{
    output::{print_json, print_pretty, write_json},
    parser::parse_records,
    record::RawObservation,
    source::load_source,
    summary::LabelMapping,
    worker::{SummaryReply, SummaryRequest, run_once, year_bounds},
};
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "por_summary")]
#[command(about = "Summarize period-of-record monitoring data per site and year", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the per-site, per-year summary for a CSV file or URL
    Summarize {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// JSON file mapping characteristic types to display labels
        #[arg(short, long, env = "POR_LABEL_MAPPING")]
        labels: String,

        /// Optional: JSON file to write the summary to (logged when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Parse a CSV file or URL and report how many rows are usable
    Inspect {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/por_summary.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("por_summary.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize {
            source,
            labels,
            output,
        } => {
            let label_mapping = LabelMapping::load(&labels)?;
            info!(entries = label_mapping.len(), "Label mapping loaded");

            let reply = summarize_source(&source, label_mapping).await;

            match output {
                Some(path) => write_json(&path, &reply)?,
                None => print_json(&reply)?,
            }
            print_pretty(&reply);

            if !reply.is_success() {
                warn!("No summary available for this source");
            }
        }
        Commands::Inspect { source } => {
            let bytes = load_source(&source).await?;
            let rows = parse_records(&bytes)?;
            inspect_rows(rows);
        }
    }

    Ok(())
}

/// Loads `source` and summarizes it on a dedicated worker.
///
/// A source that cannot be loaded produces the same failure reply the worker
/// would.
#[tracing::instrument(skip(label_mapping))]
async fn summarize_source(source: &str, label_mapping: LabelMapping) -> SummaryReply {
    let bytes = match load_source(source).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, "Source load failed");
            return SummaryReply::failure(format!("{e:#}"));
        }
    };

    run_once(SummaryRequest::from_csv(bytes, label_mapping)).await
}

/// Logs accepted/skipped row counts, distinct sites and the year range.
fn inspect_rows(rows: Vec<RawObservation>) {
    let total = rows.len();
    let mut skipped = 0;
    let mut sites = BTreeSet::new();
    let mut years = BTreeSet::new();

    for row in rows {
        match row.normalize() {
            Ok(record) => {
                sites.insert(record.site_key());
                years.insert(record.year);
            }
            Err(e) => {
                warn!(reason = %e, "Row would be skipped");
                skipped += 1;
            }
        }
    }

    let (min_year, max_year) = year_bounds(years.iter().map(String::as_str));
    info!(
        total,
        accepted = total - skipped,
        skipped,
        sites = sites.len(),
        years = years.len(),
        min_year,
        max_year,
        "Inspection summary"
    );
}
