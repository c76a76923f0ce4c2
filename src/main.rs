//! # HookRelay CLI
//!
//! Receives analytics webhooks, enriches them with a content recommendation
//! and an optimal send hour, and forwards them to a delivery platform.
//!
//! Usage:
//!   hookrelay serve                    # Start the webhook server
//!   hookrelay serve --port 9000        # Override the listen port
//!   hookrelay preview event.json       # Dry-run filter + schedule for an event
//!   hookrelay config init              # Write a starter config
//!   hookrelay config show              # Show configuration (secrets masked)

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hookrelay_core::RelayConfig;
use hookrelay_core::types::InboundEvent;
use hookrelay_pipeline::{FilterDecision, Relay, accepts};
use hookrelay_scheduler::{Clock, SystemClock, format_start_time, send_time};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "hookrelay",
    version,
    about = "HookRelay: enrich analytics webhooks with recommendations and send-time scheduling"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server
    Serve {
        /// Override listen host
        #[arg(long)]
        host: Option<String>,

        /// Override listen port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Decode an event file and show what the relay would do with it
    Preview {
        /// Path to a JSON event body
        file: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show system info
    Info,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the config file location
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "hookrelay=debug,hookrelay_pipeline=debug,hookrelay_providers=debug,hookrelay_channels=debug,hookrelay_gateway=debug,tower_http=debug"
    } else {
        "hookrelay=info,hookrelay_pipeline=info,hookrelay_gateway=info,tower_http=info"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    if cli.json_logs {
        tracing_subscriber::fmt().json().with_env_filter(env_filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).with_target(false).init();
    }

    let config_path = cli
        .config
        .as_deref()
        .map(RelayConfig::expand_path)
        .unwrap_or_else(RelayConfig::default_path);

    match cli.command {
        Commands::Serve { host, port } => {
            let mut config = load_config(cli.config.is_some(), &config_path)?;
            if let Some(h) = host {
                config.server.host = h;
            }
            if let Some(p) = port {
                config.server.port = p;
            }
            serve(config).await?;
        }

        Commands::Preview { file } => {
            let config = load_config(cli.config.is_some(), &config_path)?;
            let path = RelayConfig::expand_path(&file);
            let body = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            preview(&config, &body, &SystemClock);
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let config = load_config(cli.config.is_some(), &config_path)?;
                println!("{}", toml::to_string_pretty(&config.masked())?);
            }
            ConfigAction::Init { force } => {
                if config_path.exists() && !force {
                    println!("Config already exists at {} (use --force to overwrite)", config_path.display());
                    return Ok(());
                }
                RelayConfig::default().save_to(&config_path)?;
                println!("Config written to {}", config_path.display());
                println!("Next: set recommendation.api_key and the destination api_key/template.");
            }
            ConfigAction::Path => println!("{}", config_path.display()),
        },

        Commands::Info => {
            let config = load_config(cli.config.is_some(), &config_path)?;
            println!("HookRelay v{}", env!("CARGO_PKG_VERSION"));
            println!("   Config: {}", config_path.display());
            println!("   Listen: {}:{}", config.server.host, config.server.port);
            println!("   Destination: {}", config.destination);
            println!("   Optimal hour: {}", if config.optimal_hour { "enabled" } else { "disabled" });
            match config.filter.as_ref().filter(|f| !f.is_empty()) {
                Some(f) => println!(
                    "   Filter: name={} segment={}",
                    f.name().unwrap_or("*"),
                    f.segment().unwrap_or("*")
                ),
                None => println!("   Filter: none"),
            }
        }
    }

    Ok(())
}

/// An explicit `--config` must exist; the default location may be absent.
fn load_config(explicit: bool, path: &std::path::Path) -> Result<RelayConfig> {
    let config = if explicit {
        RelayConfig::load_from(path)?
    } else {
        RelayConfig::load()?
    };
    Ok(config)
}

async fn serve(config: RelayConfig) -> Result<()> {
    config.validate()?;

    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.http.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder.build().context("building HTTP client")?;

    let recommender = hookrelay_providers::create_recommender(&config.recommendation, client.clone())?;
    let destination = hookrelay_channels::create_destination(&config, client)?;
    tracing::info!(
        "relaying to '{}' (optimal hour {})",
        destination.name(),
        if config.optimal_hour { "on" } else { "off" }
    );

    let server_config = config.server.clone();
    let relay = Relay::new(Arc::new(config), Arc::from(recommender), Arc::from(destination));
    let state = Arc::new(hookrelay_gateway::AppState::new(relay));
    hookrelay_gateway::start_server(&server_config, state).await?;
    Ok(())
}

fn preview(config: &RelayConfig, body: &[u8], clock: &dyn Clock) {
    let event = match InboundEvent::from_slice(body) {
        Ok(event) => event,
        Err(e) => {
            println!("Rejected (500): {e}");
            return;
        }
    };

    println!("Event: {}", if event.name().is_empty() { "(unnamed)" } else { event.name() });
    println!("Email: {}", event.email().unwrap_or("(none)"));

    match accepts(&event, config.filter.as_ref()) {
        FilterDecision::Accept => println!("Filter: accepted"),
        FilterDecision::Reject(reason) => {
            println!("Filter: {} ({})", reason.message(), reason.status());
            return;
        }
    }

    if !config.optimal_hour {
        println!("Schedule: optimal hour disabled, send now");
        return;
    }
    match send_time(&event, clock) {
        Some(at) => println!("Schedule: {}", format_start_time(at)),
        None => println!("Schedule: send now"),
    }
}
