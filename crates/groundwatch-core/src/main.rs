//! Groundwatch CLI
//!
//! Command-line interface for the ground-contact alert dashboard.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;

use groundwatch::models::{AlertView, Severity};
use groundwatch::service::AlertService;
use groundwatch::source::source_for;
use groundwatch::store::{AckStore, FileStore, KeyValueStore};
use groundwatch::tui::{apply_filter, sort_for_display, App, SeverityFilter};
use groundwatch::Config;

/// Groundwatch - Satellite Ground-Contact Alerts
#[derive(Parser)]
#[command(name = "groundwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "GROUNDWATCH_CONFIG")]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (for commands that support it)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
    Table,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the alert dashboard
    Dashboard {
        /// Refresh rate in milliseconds
        #[arg(long, default_value = "250")]
        refresh: u64,

        /// Contact document location (URL or path), overriding the config
        #[arg(long, env = "GROUNDWATCH_SOURCE")]
        source: Option<String>,
    },

    /// Query and acknowledge alerts
    Alerts {
        #[command(subcommand)]
        command: AlertsCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum AlertsCommands {
    /// List alerts, most recent first
    List {
        /// Severity filter (critical, serious, warning, caution, info)
        #[arg(long)]
        severity: Option<String>,

        /// Only show unacknowledged alerts
        #[arg(long)]
        unacked: bool,

        /// Contact document location (URL or path), overriding the config
        #[arg(long, env = "GROUNDWATCH_SOURCE")]
        source: Option<String>,
    },

    /// Show one alert in full
    Show {
        /// Alert identifier to display
        alert_id: String,

        /// Contact document location (URL or path), overriding the config
        #[arg(long, env = "GROUNDWATCH_SOURCE")]
        source: Option<String>,
    },

    /// Acknowledge alerts by identifier
    Ack {
        /// Alert identifiers to acknowledge
        #[arg(required = true)]
        alert_ids: Vec<String>,

        /// Contact document location (URL or path), overriding the config
        #[arg(long, env = "GROUNDWATCH_SOURCE")]
        source: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load(cli.config.as_deref().map(Path::new)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Dashboard { refresh, source } => run_dashboard(config, refresh, source).await,
        Commands::Alerts { command } => run_alerts(config, command, cli.format).await,
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Wire a service over the configured source and acknowledgment store
fn build_service(
    config: &Config,
    source_override: Option<&str>,
    progress_tick_ms: u64,
) -> anyhow::Result<Arc<AlertService>> {
    let location = source_override.unwrap_or(&config.source.location);
    let source = source_for(location);

    let store: Arc<dyn KeyValueStore> = match &config.storage.dir {
        Some(dir) => Arc::new(FileStore::new(dir)),
        None => Arc::new(FileStore::default_location()?),
    };
    let acks = Arc::new(AckStore::new(store, config.storage.slot.clone()));

    Ok(Arc::new(AlertService::new(
        source,
        acks,
        Duration::from_millis(progress_tick_ms),
    )))
}

/// Load once and return the display-sorted collection, or the surfaced error
async fn load_sorted(service: &AlertService) -> anyhow::Result<Vec<AlertView>> {
    service.load().await;

    if let Some(message) = service.error().borrow().as_deref() {
        anyhow::bail!("{message}");
    }

    let mut alerts = service.alerts().borrow().clone();
    sort_for_display(&mut alerts);
    Ok(alerts)
}

async fn run_dashboard(
    config: Config,
    refresh: u64,
    source: Option<String>,
) -> anyhow::Result<()> {
    info!("Starting dashboard with {}ms refresh", refresh);

    let service = build_service(&config, source.as_deref(), config.tui.progress_tick_ms)?;
    let mut app = App::new(service, refresh);
    app.run().await?;
    Ok(())
}

async fn run_alerts(
    config: Config,
    command: AlertsCommands,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match command {
        AlertsCommands::List {
            severity,
            unacked,
            source,
        } => {
            let filter = match severity.as_deref() {
                Some(s) => SeverityFilter::Only(
                    s.parse::<Severity>().map_err(anyhow::Error::msg)?,
                ),
                None => SeverityFilter::All,
            };

            let service = build_service(&config, source.as_deref(), 0)?;
            let alerts = load_sorted(&service).await?;
            let mut alerts = apply_filter(&alerts, filter);
            if unacked {
                alerts.retain(|a| !a.acknowledged);
            }

            print_alerts(&alerts, format)?;
        }
        AlertsCommands::Show { alert_id, source } => {
            let service = build_service(&config, source.as_deref(), 0)?;
            let alerts = load_sorted(&service).await?;
            let alert = alerts
                .iter()
                .find(|a| a.error_id == alert_id)
                .ok_or_else(|| groundwatch::Error::not_found("alert", &alert_id))?;

            print_alert_detail(alert, format)?;
        }
        AlertsCommands::Ack { alert_ids, source } => {
            let service = build_service(&config, source.as_deref(), 0)?;
            let alerts = load_sorted(&service).await?;

            for id in &alert_ids {
                if !alerts.iter().any(|a| a.error_id == *id) {
                    println!("{id}: not in the current collection, recording anyway");
                }
                service.acknowledge(id);
                println!("Acknowledged {id}");
            }
        }
    }
    Ok(())
}

fn print_alerts(alerts: &[AlertView], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(alerts)?);
        }
        OutputFormat::Table => {
            println!(
                "{:<16}  {:<8}  {:<12}  {:<8}  {:<4}  {}",
                "TIME", "SEVERITY", "SATELLITE", "CONTACT", "ACK", "MESSAGE"
            );
            for alert in alerts {
                println!(
                    "{:<16}  {:<8}  {:<12}  {:<8}  {:<4}  {}",
                    alert.occurred_display(),
                    alert.error_severity,
                    alert.contact_satellite,
                    alert.contact_name,
                    if alert.acknowledged { "yes" } else { "no" },
                    alert.error_message,
                );
            }
        }
        OutputFormat::Text => {
            for alert in alerts {
                let ack = if alert.acknowledged { " [ack]" } else { "" };
                println!(
                    "{}  {:<8}  {}  {}{}",
                    alert.occurred_display(),
                    alert.error_severity,
                    alert.contact_satellite,
                    alert.error_message,
                    ack,
                );
            }
        }
    }
    Ok(())
}

fn print_alert_detail(alert: &AlertView, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(alert)?);
        }
        OutputFormat::Text | OutputFormat::Table => {
            println!("Alert      {}", alert.error_id);
            println!("Severity   {}", alert.error_severity);
            println!("Category   {}", alert.error_category);
            println!("Occurred   {}", alert.occurred_display());
            println!("Satellite  {}", alert.contact_satellite);
            println!("Contact    {}", alert.contact_name);
            println!("Window     {}", alert.window_display());
            println!("Detail     {}", alert.contact_detail);
            println!("Status     {}", if alert.acknowledged { "acknowledged" } else { "unacknowledged" });
            println!();
            println!("{}", alert.error_message);
            println!("{}", alert.long_message);
        }
    }
    Ok(())
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "groundwatch", &mut io::stdout());
}
