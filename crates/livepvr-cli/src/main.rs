//! livepvr - Live PVR Data command-line driver.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use livepvr_api::params::parse_utc_datetime;
use livepvr_api::{
    EventsRequest, EventsResponse, LocalLivePvrApi, OverrideRequest, Response, SimpleResponse,
    StatusRequest, StatusResponse,
};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Query the status of an event.
    Status(StatusArgs),
    /// List the events of a type on a date.
    Events(EventsArgs),
    /// Submit a team-name override.
    Override(OverrideArgs),
}

/// Arguments for the `status` subcommand.
#[derive(clap::Args)]
struct StatusArgs {
    /// Event type, usually the program title (e.g. "MLB Baseball").
    #[arg(long = "type")]
    event_type: String,

    /// The event's two teams, comma-separated (e.g. "Toronto,Cleveland").
    #[arg(
        long,
        value_delimiter = ',',
        conflicts_with = "details",
        required_unless_present = "details"
    )]
    teams: Option<Vec<String>>,

    /// Free-form event description (e.g. "Miami Dolphins at Buffalo Bills").
    #[arg(long)]
    details: Option<String>,

    /// Event start (default: now). Keep it fixed while monitoring one event.
    /// Formats: RFC 3339, "2024-01-01T19:05:00", "2024-01-01 19:05:00", "2024-01-01".
    #[arg(long)]
    start: Option<String>,
}

/// Arguments for the `events` subcommand.
#[derive(clap::Args)]
struct EventsArgs {
    /// Event type (e.g. "NHL Hockey").
    #[arg(long = "type")]
    event_type: String,

    /// Date to list (default: today, UTC). Same formats as `status --start`.
    #[arg(long)]
    date: Option<String>,
}

/// Arguments for the `override` subcommand.
#[derive(clap::Args)]
struct OverrideArgs {
    /// Team name as found in the EPG (e.g. "Oklahoma State").
    #[arg(long)]
    epg_name: String,

    /// Team name as found in the monitored feed (e.g. "Oklahoma St").
    #[arg(long)]
    feed_name: String,

    /// Address the confirmation link is sent to.
    #[arg(long)]
    email: Option<String>,
}

/// Parses an optional datetime argument, defaulting to now.
fn resolve_datetime(value: Option<&str>) -> Result<DateTime<Utc>> {
    value.map_or_else(|| Ok(Utc::now()), parse_utc_datetime)
}

/// Builds the status request from CLI arguments.
///
/// # Errors
///
/// Returns an error if `--teams` does not name exactly two teams, or
/// `--start` cannot be parsed.
fn build_status_request(args: &StatusArgs) -> Result<StatusRequest> {
    let start = resolve_datetime(args.start.as_deref())?;

    match (&args.teams, &args.details) {
        (Some(teams), _) => match teams.as_slice() {
            [home, away] => Ok(StatusRequest::with_teams(
                args.event_type.as_str(),
                home.as_str(),
                away.as_str(),
                start,
            )),
            _ => bail!("--teams requires exactly two team names, got {}", teams.len()),
        },
        (None, Some(details)) => Ok(StatusRequest::with_details(
            args.event_type.as_str(),
            details.as_str(),
            start,
        )),
        (None, None) => bail!("either --teams or --details must be specified"),
    }
}

/// Loads the config and builds the API client.
fn load_client(dir: Option<&PathBuf>) -> Result<livepvr_api::LivePvrClient> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    config.build_client().context("failed to build API client")
}

/// Logs a status response.
fn report_status(response: &Response<StatusResponse>) {
    match response {
        Response::Success(status) if !status.is_valid => {
            tracing::info!("Event is not monitored by the service");
        }
        Response::Success(status) => {
            tracing::info!(
                "{}: {} {} (active={}, complete={})",
                status.title,
                status.status,
                status.desc,
                status.is_active,
                status.is_complete,
            );
        }
        Response::Error(err) => {
            tracing::warn!("Service error (code={}): {}", err.code, err.message);
        }
    }
}

/// Logs an events response.
fn report_events(response: &Response<EventsResponse>) {
    match response {
        Response::Success(list) => {
            for event in &list.events {
                tracing::info!(
                    "{}\t{}\t{}",
                    event.description(),
                    event.status,
                    if event.is_complete { "complete" } else { "-" },
                );
            }
            tracing::info!("Total: {} events", list.events.len());
        }
        Response::Error(err) => {
            tracing::warn!("Service error (code={}): {}", err.code, err.message);
        }
    }
}

/// Logs an override submission response.
fn report_override(response: &Response<SimpleResponse>) {
    match response {
        Response::Success(ack) => {
            tracing::info!(
                "Override submitted: {}",
                ack.message.as_deref().unwrap_or("ok")
            );
        }
        Response::Error(err) => {
            tracing::warn!("Service error (code={}): {}", err.code, err.message);
        }
    }
}

/// Runs the `status` subcommand.
///
/// # Errors
///
/// Returns an error if the arguments are invalid, the client cannot be
/// built, or the request fails.
#[instrument(skip_all)]
async fn run_status(args: &StatusArgs, dir: Option<&PathBuf>) -> Result<()> {
    let req = build_status_request(args)?;
    let client = load_client(dir)?;

    let response = client
        .get_status(&req)
        .await
        .context("failed to query event status")?;
    report_status(&response);

    Ok(())
}

/// Runs the `events` subcommand.
///
/// # Errors
///
/// Returns an error if `--date` is invalid, the client cannot be built,
/// or the request fails.
#[instrument(skip_all)]
async fn run_events(args: &EventsArgs, dir: Option<&PathBuf>) -> Result<()> {
    let date = resolve_datetime(args.date.as_deref())?;
    let req = EventsRequest::new(args.event_type.as_str(), date);
    let client = load_client(dir)?;

    let response = client
        .get_events(&req)
        .await
        .context("failed to fetch events")?;
    report_events(&response);

    Ok(())
}

/// Runs the `override` subcommand.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the request fails.
#[instrument(skip_all)]
async fn run_override(args: &OverrideArgs, dir: Option<&PathBuf>) -> Result<()> {
    let mut req = OverrideRequest::new(args.epg_name.as_str(), args.feed_name.as_str());
    if let Some(ref email) = args.email {
        req = req.with_email(email.as_str());
    }
    let client = load_client(dir)?;

    let response = client
        .submit_override(&req)
        .await
        .context("failed to submit override")?;
    report_override(&response);

    Ok(())
}

/// Initializes the tracing subscriber (`RUST_LOG`, default `info`).
///
/// With the `otel` feature, spans are also exported over OTLP when
/// `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    #[cfg(not(feature = "otel"))]
    {
        fmt().with_env_filter(env_filter).with_target(false).init();
    }

    #[cfg(feature = "otel")]
    {
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Status(args) => run_status(&args, cli.dir.as_ref()).await,
        Commands::Events(args) => run_events(&args, cli.dir.as_ref()).await,
        Commands::Override(args) => run_override(&args, cli.dir.as_ref()).await,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use livepvr_api::{ErrorResponse, Event};
    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    use super::*;

    fn status_args(teams: Option<Vec<&str>>, details: Option<&str>) -> StatusArgs {
        StatusArgs {
            event_type: String::from("MLB Baseball"),
            teams: teams.map(|t| t.into_iter().map(String::from).collect()),
            details: details.map(String::from),
            start: Some(String::from("2011-03-13T07:06:40")),
        }
    }

    #[test]
    fn test_build_status_request_with_teams() {
        // Arrange
        let args = status_args(Some(vec!["Toronto", "Cleveland"]), None);

        // Act
        let req = build_status_request(&args).unwrap();

        // Assert
        assert_eq!(
            req.teams,
            Some(vec![String::from("Toronto"), String::from("Cleveland")])
        );
        assert!(req.details.is_none());
        assert_eq!(req.start, 1_300_000_000);
    }

    #[test]
    fn test_build_status_request_with_details() {
        // Arrange
        let args = status_args(None, Some("Toronto at Cleveland"));

        // Act
        let req = build_status_request(&args).unwrap();

        // Assert
        assert_eq!(req.details.as_deref(), Some("Toronto at Cleveland"));
        assert!(req.teams.is_none());
    }

    #[test]
    fn test_build_status_request_rejects_three_teams() {
        // Arrange
        let args = status_args(Some(vec!["A", "B", "C"]), None);

        // Act
        let result = build_status_request(&args);

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("--teams requires exactly two team names, got 3")
        );
    }

    #[test]
    fn test_report_status_active_event() {
        // Arrange
        let response = Response::Success(StatusResponse {
            title: String::from("MLB Baseball"),
            status: String::from("In Progress"),
            desc: String::from("Top 3rd"),
            is_valid: true,
            is_active: true,
            is_complete: false,
        });
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().with_fields(expect::msg(
                "MLB Baseball: In Progress Top 3rd (active=true, complete=false)",
            )))
            .only()
            .run_with_handle();

        // Act
        with_default(subscriber, || report_status(&response));

        // Assert
        handle.assert_finished();
    }

    #[test]
    fn test_report_status_unmonitored_event() {
        // Arrange
        let response = Response::Success(StatusResponse::default());
        let (subscriber, handle) = subscriber::mock()
            .event(
                expect::event().with_fields(expect::msg("Event is not monitored by the service")),
            )
            .only()
            .run_with_handle();

        // Act
        with_default(subscriber, || report_status(&response));

        // Assert
        handle.assert_finished();
    }

    #[test]
    fn test_report_status_service_error() {
        // Arrange
        let response: Response<StatusResponse> = Response::Error(ErrorResponse {
            message: String::from("bad event id"),
            code: 4,
        });
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().with_fields(expect::msg("Service error (code=4): bad event id")))
            .only()
            .run_with_handle();

        // Act
        with_default(subscriber, || report_status(&response));

        // Assert
        handle.assert_finished();
    }

    #[test]
    fn test_report_events_lists_each_event() {
        // Arrange
        let response = Response::Success(EventsResponse {
            events: vec![
                Event {
                    participants: vec![String::from("Ottawa"), String::from("Boston")],
                    status: String::from("Final"),
                    is_complete: true,
                },
                Event {
                    participants: vec![String::from("Toronto"), String::from("Montreal")],
                    status: String::from("2nd Period"),
                    is_complete: false,
                },
            ],
        });
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().with_fields(expect::msg("Ottawa vs. Boston\tFinal\tcomplete")))
            .event(expect::event().with_fields(expect::msg("Toronto vs. Montreal\t2nd Period\t-")))
            .event(expect::event().with_fields(expect::msg("Total: 2 events")))
            .only()
            .run_with_handle();

        // Act
        with_default(subscriber, || report_events(&response));

        // Assert
        handle.assert_finished();
    }

    #[test]
    fn test_report_override_acknowledged() {
        // Arrange
        let response = Response::Success(SimpleResponse::default());
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().with_fields(expect::msg("Override submitted: ok")))
            .only()
            .run_with_handle();

        // Act
        with_default(subscriber, || report_override(&response));

        // Assert
        handle.assert_finished();
    }
}
