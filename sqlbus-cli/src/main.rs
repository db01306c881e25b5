//! sqlbus-cli - Command-line interface for sqlbus
//!
//! Provides both a REPL and one-shot command execution.

mod output;
mod repl;

use clap::{Parser, Subcommand};
use colored::Colorize;
use sqlbus_client::Client;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlbus-cli")]
#[command(about = "Command-line interface for the sqlbus pub/sub SQL server")]
#[command(version)]
struct Cli {
    /// Server address (host:port)
    #[arg(short, long, env = "SQLBUS_SERVER", default_value = "127.0.0.1:7777")]
    server: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start interactive REPL
    Repl,

    /// Execute one command and print the result
    Exec {
        /// Command text, e.g. `select * from stocks`
        #[arg(required = true)]
        command: Vec<String>,
    },

    /// Send a fire-and-forget stream command (no response)
    Stream {
        /// Command text, e.g. `insert into stocks (ticker, bid) values (IBM, 12.5)`
        #[arg(required = true)]
        command: Vec<String>,
    },

    /// Subscribe and print pub/sub events until Ctrl+C
    Watch {
        /// Subscription command, e.g. `subscribe * from stocks`
        #[arg(required = true)]
        command: Vec<String>,

        /// Poll interval for events, in milliseconds
        #[arg(long, default_value = "1000")]
        timeout_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut client = Client::new();
    if !client.connect(&cli.server).await {
        eprintln!("{}: {}", "Connection failed".red(), client.error());
        std::process::exit(1);
    }

    match cli.command {
        Some(Commands::Repl) | None => {
            repl::run(&mut client, &cli.server).await?;
        }

        Some(Commands::Exec { command }) => {
            let command = command.join(" ");
            if client.execute(&command).await {
                println!("{}", output::render(&mut client).await);
            } else {
                eprintln!("{}: {}", "Error".red(), client.error());
                client.disconnect().await;
                std::process::exit(1);
            }
        }

        Some(Commands::Stream { command }) => {
            let command = command.join(" ");
            if !client.stream(&command).await {
                eprintln!("{}: {}", "Error".red(), client.error());
                client.disconnect().await;
                std::process::exit(1);
            }
        }

        Some(Commands::Watch {
            command,
            timeout_ms,
        }) => {
            let command = command.join(" ");
            if !client.execute(&command).await {
                eprintln!("{}: {}", "Error".red(), client.error());
                client.disconnect().await;
                std::process::exit(1);
            }
            eprintln!(
                "{} {} (pubsubid: {})",
                "Watching".green(),
                command.cyan(),
                client.pub_sub_id()
            );
            eprintln!("{}", "Press Ctrl+C to stop...".dimmed());

            loop {
                tokio::select! {
                    got_event = client.wait_for_pub_sub(Duration::from_millis(timeout_ms)) => {
                        if got_event {
                            println!("{}", client.json());
                        } else if client.failed() {
                            eprintln!("{}: {}", "Error".red(), client.error());
                            break;
                        }
                        // Quiet poll interval; keep waiting.
                    }
                    _ = tokio::signal::ctrl_c() => {
                        eprintln!("\n{}", "Stopping watch...".dimmed());
                        break;
                    }
                }
            }
        }
    }

    client.disconnect().await;
    Ok(())
}
