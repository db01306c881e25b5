//! Interactive REPL.

use crate::output;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use sqlbus_client::Client;
use std::time::Duration;

const HELP_TEXT: &str = r#"
Commands are sent to the server verbatim, e.g.:
  insert into stocks (ticker, bid) values (IBM, 12.5)
  select * from stocks
  subscribe * from stocks
  unsubscribe from stocks

Local commands:
  help            Show this help
  wait [ms]       Wait for one pub/sub event (default 10000 ms)
  quit, exit      Exit the REPL
"#;

pub async fn run(client: &mut Client, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "sqlbus CLI".bold().cyan());
    println!("Connected to {}.", addr);

    // Create readline editor
    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .build();
    let mut rl: Editor<(), DefaultHistory> = Editor::with_config(config)?;

    // Load history
    let history_path = std::env::var("HOME")
        .map(|h| std::path::PathBuf::from(h).join(".sqlbus_history"))
        .unwrap_or_else(|_| ".sqlbus_history".into());
    let _ = rl.load_history(&history_path);

    println!("Type 'help' for available commands.\n");

    loop {
        let prompt = format!("{} ", "sqlbus>".cyan());
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match dispatch(client, line).await {
                    Some(rendered) => println!("{}\n", rendered),
                    None => break, // Exit command
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                println!("{}: {:?}", "Error".red(), err);
                break;
            }
        }
    }

    // Save history
    let _ = rl.save_history(&history_path);

    client.disconnect().await;
    println!("{}", "Disconnected.".dimmed());

    Ok(())
}

async fn dispatch(client: &mut Client, line: &str) -> Option<String> {
    let mut parts = line.split_whitespace();
    let keyword = parts.next().unwrap_or("").to_lowercase();

    match keyword.as_str() {
        "help" => Some(HELP_TEXT.to_string()),
        "quit" | "exit" => None,
        "wait" => {
            let ms: u64 = parts.next().and_then(|v| v.parse().ok()).unwrap_or(10_000);
            if client.wait_for_pub_sub(Duration::from_millis(ms)).await {
                Some(format!(
                    "{} pubsubid={}\n{}",
                    client.action().to_string().green(),
                    client.pub_sub_id(),
                    client.json()
                ))
            } else if client.failed() {
                Some(format!("{}: {}", "Error".red(), client.error()))
            } else {
                Some("(timeout)".dimmed().to_string())
            }
        }
        _ => {
            if client.execute(line).await {
                Some(output::render(client).await)
            } else {
                Some(format!("{}: {}", "Error".red(), client.error()))
            }
        }
    }
}
