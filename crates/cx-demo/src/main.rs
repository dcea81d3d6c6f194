//! cx-demo: contact repository demo
//!
//! Usage:
//!   cx-demo <command> [filter]  - Run one demo scenario
//!   cx-demo --cli               - Start interactive CLI mode
//!   cx-demo --help              - Show help

mod cli;
mod demo;
mod picker;

use std::sync::Arc;

use cx_contacts::{ContactsClient, ContactsConfig};
use demo::Command;
use picker::TerminalPicker;
use tracing_subscriber::EnvFilter;

/// Run mode
enum RunMode {
    /// Run a single scenario and exit
    Command(Command),
    /// Interactive CLI mode
    Cli,
    /// Show help
    Help,
    /// Show version
    Version,
    /// Unrecognised command
    Invalid(String),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mode = parse_args();

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("cx-demo {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Invalid(name) => {
            eprintln!("Unknown command: {}", name);
            eprintln!();
            print_help();
            std::process::exit(2);
        }
        _ => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    let config = ContactsConfig::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;
    tracing::info!("Store: {:?}, timeout: {:?}", config.store, config.operation_timeout());

    let client = ContactsClient::from_config(&config)
        .map_err(|e| anyhow::anyhow!("Failed to open contact store: {}", e))?
        .with_picker(Arc::new(TerminalPicker));

    match mode {
        RunMode::Cli => {
            tracing::info!("Running in CLI mode");
            cli::run_cli(client).await
        }
        RunMode::Command(command) => {
            println!("{}", demo::run(&client, command).await);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Parse command line arguments
/// `RUST_LOG` when it parses, `warn` otherwise
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn parse_args() -> RunMode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let Some(first) = args.first() else {
        return RunMode::Help;
    };
    match first.as_str() {
        "--cli" | "-c" => RunMode::Cli,
        "--help" | "-h" => RunMode::Help,
        "--version" | "-v" => RunMode::Version,
        name => match Command::parse(name, &args[1..].join(" ")) {
            Some(command) => RunMode::Command(command),
            None => RunMode::Invalid(name.to_string()),
        },
    }
}

/// Print help message
fn print_help() {
    println!("cx-demo - contact repository demo");
    println!();
    println!("Usage:");
    println!("  cx-demo save             Save \"Cordova Contact\" with two phone numbers");
    println!("  cx-demo find [filter]    Count contacts with a phone number matching filter");
    println!("  cx-demo delete [filter]  Remove the first contact whose display name matches");
    println!("  cx-demo list [filter]    List contacts (name, phone, email)");
    println!("  cx-demo show [filter]    Print matching contacts as JSON");
    println!("  cx-demo pick             Choose a contact interactively");
    println!("  cx-demo add              Add the sample contact \"Dooney Evans\"");
    println!("  cx-demo add-nameless     Add a sample contact without a name");
    println!("  cx-demo add-unicode      Add a sample contact with a Cyrillic name");
    println!("  cx-demo rename           Rename \"Dooney Evans\" to \"Urist McContact\"");
    println!("  cx-demo cleanup          Remove every sample contact");
    println!("  cx-demo --cli            Start interactive CLI mode");
    println!("  cx-demo --help           Show this help message");
    println!("  cx-demo --version        Show version");
    println!();
    println!("Environment Variables:");
    println!("  CX_STORE                 Store backend: sqlite, memory or unsupported (default: sqlite)");
    println!("  CX_DB_PATH               SQLite database path (default: data/cx-contacts.db)");
    println!("  CX_OPERATION_TIMEOUT     Seconds per store operation, 0 disables (default: 30)");
    println!("  CX_ACCESS                Address book access: granted or denied (default: granted)");
    println!("  RUST_LOG                 Log filter (default: warn)");
}
