// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Railbook - automated rail ticket reservation agent.
//!
//! This is the binary entry point: loads and validates configuration,
//! builds the trip request from CLI flags, and drives one booking
//! orchestrator to its terminal outcome.

mod render;
mod trip;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use railbook_agent::{
    install_signal_handler, ListingOutcome, Orchestrator, OrchestratorConfig, SelectionPrefs,
};
use railbook_client::{ClientConfig, WorkflowClient};
use railbook_codec::{FormSchema, SchemaVersion};
use railbook_config::RailbookConfig;
use railbook_core::Outcome;
use railbook_ocr::OcrClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Railbook - automated rail ticket reservation agent.
#[derive(Parser, Debug)]
#[command(name = "railbook", version, about, long_about = None)]
struct Cli {
    /// Path to a railbook.toml (otherwise the XDG hierarchy applies).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a booking attempt to completion.
    Book(TripArgs),
    /// List the available trains for a trip without booking.
    Trains(TripArgs),
}

/// Trip parameters shared by both subcommands.
#[derive(Args, Debug)]
pub struct TripArgs {
    /// Origin station (name, Chinese name, or numeric id).
    #[arg(long, default_value = "Taipei")]
    pub from: String,

    /// Destination station (name, Chinese name, or numeric id).
    #[arg(long, default_value = "Zuoying")]
    pub to: String,

    /// Travel date, YYYY-MM-DD (defaults to today).
    #[arg(long)]
    pub date: Option<String>,

    /// Desired departure time, HH:MM.
    #[arg(long, default_value = "10:00")]
    pub time: String,

    /// Book this exact train number, skipping the listing step.
    #[arg(long)]
    pub train_no: Option<String>,

    /// Latest acceptable arrival time for the automatic pick, HH:MM.
    #[arg(long)]
    pub latest_arrival: Option<String>,

    #[arg(long, default_value_t = 1)]
    pub adults: u32,

    #[arg(long, default_value_t = 0)]
    pub children: u32,

    #[arg(long, default_value_t = 0)]
    pub disabled: u32,

    #[arg(long, default_value_t = 0)]
    pub seniors: u32,

    #[arg(long, default_value_t = 0)]
    pub college: u32,

    /// Car class: standard or business.
    #[arg(long, default_value = "standard")]
    pub car: String,

    /// Seat preference: any, window, or aisle.
    #[arg(long, default_value = "any")]
    pub seat: String,

    /// Passenger national identification number.
    #[arg(long)]
    pub id: Option<String>,

    /// Contact phone number.
    #[arg(long)]
    pub phone: Option<String>,

    /// Contact email address.
    #[arg(long)]
    pub email: Option<String>,

    /// Loyalty membership number (selects the loyalty membership mode).
    #[arg(long)]
    pub loyalty_id: Option<String>,

    /// Company tax id (selects the tax-id membership mode).
    #[arg(long)]
    pub tax_id: Option<String>,

    /// National id for each discounted-fare passenger, in listing order.
    #[arg(long = "companion-id")]
    pub companion_id: Vec<String>,

    /// Pick the train automatically instead of by index.
    #[arg(long)]
    pub auto: bool,

    /// Manual 1-based train index (defaults to the first listed).
    #[arg(long)]
    pub train_index: Option<usize>,

    /// Proxy URL for site traffic, overriding the configured one.
    #[arg(long)]
    pub proxy: Option<String>,

    /// Emit machine-readable JSON instead of the ticket panel.
    #[arg(long)]
    pub json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            railbook_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config, cli.debug);

    match cli.command {
        Commands::Book(args) => run_book(&config, &args).await,
        Commands::Trains(args) => run_trains(&config, &args).await,
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<RailbookConfig, Vec<railbook_config::ConfigError>> {
    match path {
        Some(path) => railbook_config::load_and_validate_path(path),
        None => railbook_config::load_and_validate(),
    }
}

fn init_tracing(config: &RailbookConfig, debug: bool) {
    let level = if debug {
        "debug"
    } else {
        config.agent.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("railbook={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run_book(config: &RailbookConfig, args: &TripArgs) -> ExitCode {
    if args.id.is_none() {
        eprintln!("railbook book: --id <national id> is required");
        return ExitCode::FAILURE;
    }

    let trip = match trip::build_trip(args, config) {
        Ok(trip) => trip,
        Err(message) => {
            eprintln!("railbook: {message}");
            return ExitCode::FAILURE;
        }
    };

    let mut orchestrator = match build_orchestrator(config, args) {
        Ok(o) => o,
        Err(message) => {
            eprintln!("railbook: {message}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        origin = trip.origin.0,
        destination = trip.destination.0,
        date = %trip.date,
        "starting booking attempt"
    );

    match orchestrator.run(&trip).await {
        Outcome::Success(result) => {
            if args.json {
                render::print_result_json(&result);
            } else {
                let history_url = format!("{}/IMINT/?history", config.site.base_url);
                render::print_result(&result, &history_url);
            }
            ExitCode::SUCCESS
        }
        Outcome::Failed(reason) => {
            eprintln!("railbook: booking failed: {reason}");
            ExitCode::FAILURE
        }
        Outcome::Cancelled => {
            eprintln!("railbook: booking cancelled");
            ExitCode::from(130)
        }
    }
}

async fn run_trains(config: &RailbookConfig, args: &TripArgs) -> ExitCode {
    let trip = match trip::build_trip(args, config) {
        Ok(trip) => trip,
        Err(message) => {
            eprintln!("railbook: {message}");
            return ExitCode::FAILURE;
        }
    };

    let mut orchestrator = match build_orchestrator(config, args) {
        Ok(o) => o,
        Err(message) => {
            eprintln!("railbook: {message}");
            return ExitCode::FAILURE;
        }
    };

    match orchestrator.list(&trip).await {
        ListingOutcome::Trains(trains) => {
            if args.json {
                render::print_trains_json(&trains);
            } else {
                render::print_trains(&trains);
            }
            ExitCode::SUCCESS
        }
        ListingOutcome::Failed(reason) => {
            eprintln!("railbook: listing failed: {reason}");
            ExitCode::FAILURE
        }
        ListingOutcome::Cancelled => {
            eprintln!("railbook: listing cancelled");
            ExitCode::from(130)
        }
    }
}

fn build_orchestrator(
    config: &RailbookConfig,
    args: &TripArgs,
) -> Result<Orchestrator, String> {
    let schema_version: SchemaVersion = config
        .booking
        .form_schema
        .parse()
        .map_err(|_| format!("unknown form schema `{}`", config.booking.form_schema))?;

    let client = WorkflowClient::new(ClientConfig {
        base_url: config.site.base_url.clone(),
        user_agent: config.site.user_agent.clone(),
        timeout: Duration::from_secs(config.site.timeout_secs),
        proxy: args.proxy.clone().or_else(|| config.site.proxy.clone()),
        schema: FormSchema::new(schema_version),
        max_tickets: config.booking.max_tickets,
    })
    .map_err(|e| e.to_string())?;

    let resolver = OcrClient::new(
        config.ocr.endpoint.clone(),
        Duration::from_secs(config.ocr.timeout_secs),
    )
    .map_err(|e| e.to_string())?;

    let cancel = install_signal_handler();

    Ok(Orchestrator::new(
        client,
        Arc::new(resolver),
        SelectionPrefs {
            auto: args.auto,
            index: args.train_index,
            latest_arrival: args
                .latest_arrival
                .as_deref()
                .and_then(|t| chrono::NaiveTime::parse_from_str(t, "%H:%M").ok()),
        },
        OrchestratorConfig {
            max_tickets: config.booking.max_tickets,
            max_captcha_retries: config.booking.max_captcha_retries,
            max_form_retries: config.booking.max_form_retries,
        },
        cancel,
    ))
}
