//! # FirstCrack — brew-by-notification engine
//!
//! Drives a simulated brew entirely through push notifications: the
//! scheduler walks the stage timeline and pushes one notification per
//! stage; the router decodes interactions back into navigation events.
//!
//! Usage:
//!   firstcrack start --brew-type espresso --dose 18 --temp 93 --pressure 9 --device dev-123
//!   firstcrack plan                          # Print the stage timeline
//!   firstcrack route '{"wire_action_id":"stop_shot","brew_id":"brew_1_2"}'
//!   firstcrack actions                       # List the action registry

use anyhow::Result;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use tracing_subscriber::EnvFilter;

use firstcrack_core::{actions, timeline, BrewRequest, FirstCrackConfig, RawInteraction, TIMELINE};
use firstcrack_payload::category_for;
use firstcrack_router::{bridge, ActionRouter, RouteOutcome};
use firstcrack_scheduler::{transport, BrewScheduler};

#[derive(Parser)]
#[command(
    name = "firstcrack",
    version,
    about = "☕ FirstCrack — brew-by-notification engine"
)]
struct Cli {
    /// Config file path (default: ~/.firstcrack/config.toml)
    #[arg(long)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a brew and run its notification timeline to completion
    Start {
        /// Brew style: espresso, doppio, lungo, ristretto
        #[arg(long, default_value = "espresso")]
        brew_type: String,

        /// Dose in grams (10-30)
        #[arg(long, default_value = "18")]
        dose: u32,

        /// Target temperature in Celsius (85-100)
        #[arg(long, default_value = "93")]
        temp: u32,

        /// Target pressure in bar (5-15)
        #[arg(long, default_value = "9")]
        pressure: u32,

        /// Device address to push to
        #[arg(long)]
        device: String,
    },

    /// Print the static stage timeline
    Plan,

    /// Decode one raw interaction (JSON) into a navigation event
    Route {
        /// e.g. '{"wire_action_id":"stop_shot","brew_id":"brew_1_2"}'
        json: String,
    },

    /// List the action registry
    Actions,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "firstcrack=debug,firstcrack_scheduler=debug,firstcrack_router=debug,firstcrack_payload=debug"
    } else {
        "firstcrack=info,firstcrack_scheduler=info,firstcrack_router=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => {
            let path = shellexpand::tilde(path).to_string();
            FirstCrackConfig::load_from(std::path::Path::new(&path))?
        }
        None => FirstCrackConfig::load()?,
    };

    match cli.command {
        Command::Start {
            brew_type,
            dose,
            temp,
            pressure,
            device,
        } => {
            let request = BrewRequest {
                brew_type,
                dose_grams: dose,
                target_temp_c: temp,
                target_pressure_bar: pressure,
                device_address: device,
            };
            let transport = transport::from_config(&config.transport);
            let scheduler = BrewScheduler::new(transport, config);

            let receipt = scheduler.start_brew(&request).await?;
            println!(
                "Brew {} started: {} stages, ~{}s",
                receipt.brew_id, receipt.stage_count, receipt.estimated_duration_seconds
            );

            scheduler.wait(&receipt.brew_id).await;
            println!("Brew {} finished", receipt.brew_id);
        }

        Command::Plan => {
            println!("{:<8} {:<14} {:<22} {:<18} actions", "offset", "stage", "title", "category");
            for entry in TIMELINE {
                let action_list = entry
                    .actions
                    .iter()
                    .map(|a| a.wire_id())
                    .collect::<Vec<_>>()
                    .join(", ");
                println!(
                    "+{:<7} {:<14} {:<22} {:<18} {}",
                    format!("{}s", entry.offset_seconds),
                    entry.stage.wire_name(),
                    entry.title,
                    category_for(entry.stage),
                    if action_list.is_empty() { "-" } else { action_list.as_str() }
                );
            }
            println!(
                "\n{} stages, estimated duration {}s",
                timeline::stage_count(),
                timeline::estimated_duration_seconds()
            );
        }

        Command::Route { json } => {
            let raw: RawInteraction = serde_json::from_str(&json)?;
            let mut stream = bridge::attach();
            let router = ActionRouter::with_scheme(&config.scheme);
            match router.handle(&raw) {
                RouteOutcome::Dispatched(_) => {
                    // The event is observed the way the UI layer would
                    // observe it: off the bridge stream.
                    if let Some(event) = stream.next().await {
                        println!("{}", serde_json::to_string_pretty(&event)?);
                    }
                }
                RouteOutcome::Rejected { reason } => {
                    println!("rejected: {reason}");
                }
            }
            bridge::detach();
        }

        Command::Actions => {
            println!("{:<14} {:<10} foreground", "wire id", "segment");
            for action in actions::ALL_ACTIONS {
                println!(
                    "{:<14} {:<10} {}",
                    action.wire_id(),
                    action.segment(),
                    action.requires_foreground()
                );
            }
        }
    }

    Ok(())
}
