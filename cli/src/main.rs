use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use seizure_core::{DashboardConfig, DashboardSnapshot, KpiPanel};
use seizure_sheets::summarize_path;
use seizure_web::{AppState, Settings};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "seizure-cli",
    about = "Single-patient seizure management dashboard."
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the dashboard over HTTP.
    Serve {
        /// Settings file (TOML); defaults to ./seizure-dashboard.toml when present.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Listen address, overriding the settings.
        #[arg(short, long)]
        bind: Option<SocketAddr>,
        /// Workbook path, overriding the settings.
        #[arg(short, long)]
        workbook: Option<PathBuf>,
    },
    /// Print the KPI summary for one patient.
    Summary {
        /// Settings file (TOML); supplies the patient table and default workbook.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Path to the .xlsx workbook, overriding the settings.
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Patient identifier; the default patient when omitted.
        #[arg(short, long)]
        patient: Option<String>,
        /// Print the full snapshot as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Serve {
            config,
            bind,
            workbook,
        } => {
            let mut settings = Settings::load(config.as_deref())
                .context("Could not load dashboard settings")?;
            if let Some(bind) = bind {
                settings.bind = bind.to_string();
            }
            if let Some(workbook) = workbook {
                settings.workbook_path = workbook;
            }
            init_tracing(&settings.log_filter);
            serve(settings)
        }
        Command::Summary {
            config,
            input,
            patient,
            json,
        } => {
            init_tracing("warn");
            let settings = Settings::load(config.as_deref())
                .context("Could not load dashboard settings")?;
            let (input, dashboard) = summary_source(settings, input);
            let snapshot = summarize_path(&input, patient.as_deref(), &dashboard)
                .with_context(|| format!("Could not summarize workbook {:?}", input))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_summary(&snapshot);
            }
            Ok(())
        }
    }
}

/// Workbook and patient table for `summary`; `--input` wins over the settings.
fn summary_source(settings: Settings, input: Option<PathBuf>) -> (PathBuf, DashboardConfig) {
    (
        input.unwrap_or(settings.workbook_path),
        settings.dashboard,
    )
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

#[tokio::main]
async fn serve(settings: Settings) -> anyhow::Result<()> {
    let addr: SocketAddr = settings
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {:?}", settings.bind))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Could not bind {addr}"))?;

    tracing::info!(
        %addr,
        workbook = %settings.workbook_path.display(),
        "seizure dashboard listening"
    );

    seizure_web::serve(listener, AppState::from_settings(&settings))
        .await
        .context("HTTP server failed")
}

fn print_summary(snapshot: &DashboardSnapshot) {
    println!(
        "Patient: {} (ID {}) | Age: {}",
        snapshot.patient.name, snapshot.patient.patient_id, snapshot.patient.age
    );
    println!("Consultations: {}", snapshot.record_count);

    match &snapshot.kpis {
        KpiPanel::Ready { as_of, tiles } => {
            let as_of = as_of
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "--".to_string());
            println!("Latest consultation: {as_of}");
            for tile in tiles {
                println!(
                    "  {:<26} {:>8}  ({}, {:?})",
                    tile.label, tile.display_value, tile.display_delta, tile.tone
                );
            }
        }
        KpiPanel::NoData => println!("No data available for this patient."),
    }

    if let Some(domain) = snapshot.date_domain {
        println!("Date range: {} .. {}", domain.min, domain.max);
    }
    for chart in &snapshot.trends {
        println!("  {:<26} {} points", chart.title, chart.points.len());
    }
    println!(
        "Seizure types: {} | Side effects: {}",
        snapshot.seizure_types.len(),
        snapshot.side_effects.len()
    );
}
