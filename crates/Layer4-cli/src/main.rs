//! Eventer CLI - Main entry point

mod demo;

use clap::{Parser, Subcommand};
use eventer_core::{Dispatched, EventerConfig, Protocol};
use eventer_foundation::{ConfigStore, EVENTER_CONFIG_FILE};
use eventer_host::{EventerExt, HasEventer, Hosted};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Eventer - fire events through the dispatch engine
#[derive(Parser, Debug)]
#[command(name = "eventer")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file (default: global, then project eventer.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fail when an event has no listeners
    #[arg(long)]
    strict: bool,

    /// Log handlers still pending every N milliseconds
    #[arg(long)]
    monitor_ms: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Emit an event on the demo handlers
    Emit {
        /// Event name
        event: String,

        /// Arguments (JSON, or plain strings)
        args: Vec<String>,

        /// parallel, reduce or sync (default: from config)
        #[arg(short, long)]
        protocol: Option<Protocol>,

        /// Emit the same event this many times
        #[arg(short, long, default_value = "1")]
        repeat: usize,
    },
    /// List demo events and their handlers
    Events,
    /// Show the effective configuration
    Config {
        /// Write it to ./.eventer/eventer.toml
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => EventerConfig::from_file(path)?,
        None => EventerConfig::load().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {}", e);
            EventerConfig::default()
        }),
    };
    if args.strict {
        config.emit_on_unknown_throws = true;
    }
    if let Some(ms) = args.monitor_ms {
        config.monitor_interval_ms = Some(ms);
    }

    match args.command {
        Command::Emit {
            event,
            args: raw,
            protocol,
            repeat,
        } => emit_cmd(config, &event, &raw, protocol, repeat).await,
        Command::Events => events_cmd(config),
        Command::Config { init } => config_cmd(&config, init),
    }
}

/// Emit an event and print each result as JSON
async fn emit_cmd(
    config: EventerConfig,
    event: &str,
    raw: &[String],
    protocol: Option<Protocol>,
    repeat: usize,
) -> anyhow::Result<()> {
    let bus = Hosted::with_config("cli", config);
    demo::install(bus.eventer());

    let args: Vec<_> = raw.iter().map(|a| demo::parse_arg(a)).collect();
    let protocol = protocol.unwrap_or(bus.eventer().config().default_protocol);

    for round in 1..=repeat.max(1) {
        tracing::debug!(event, %protocol, round, "Dispatching");
        let outcome = bus.dispatch(event, args.clone(), Some(protocol))?.await;

        match outcome {
            Ok(Dispatched::Parallel(results)) => {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
            Ok(Dispatched::Unhandled(value)) => {
                eprintln!("[no listeners for '{}']", event);
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            Ok(Dispatched::Reduce(value)) => {
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            Ok(Dispatched::Sync) => println!("ok"),
            Err(e) => {
                eprintln!("Error: {}", e);
                if let Some(reason) = e.rejection() {
                    eprintln!("Rejected with: {}", reason);
                }
                std::process::exit(1);
            }
        }
    }

    println!("\n[{} listener(s) left on '{}']", bus.listener_count(event), event);
    Ok(())
}

/// List demo events
fn events_cmd(config: EventerConfig) -> anyhow::Result<()> {
    let bus = Hosted::with_config((), config);
    demo::install(bus.eventer());

    let mut names = bus.event_names();
    names.sort();

    println!("\n📋 Demo Events\n");
    println!("{:<10} {:<12} {:<30}", "EVENT", "HANDLER", "ORIGIN");
    println!("{}", "-".repeat(54));
    for name in &names {
        for record in bus.eventer().handlers(name) {
            let kind = if record.listener.is_some() { " (once)" } else { "" };
            println!(
                "{:<10} {:<12} {}{}",
                name,
                record.id.to_string(),
                record.origin,
                kind
            );
        }
    }
    println!();

    Ok(())
}

/// Print (and optionally save) the effective configuration
fn config_cmd(config: &EventerConfig, init: bool) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(config)?);

    if init {
        let store = ConfigStore::current_project()?;
        store.save(EVENTER_CONFIG_FILE, config)?;
        println!("\n✓ Saved to {}", store.file_path(EVENTER_CONFIG_FILE).display());
    }

    Ok(())
}
