//! Result rendering.

use colored::Colorize;
use sqlbus_client::Client;

/// Renders the current response: an aligned table for result sets, a
/// one-line summary otherwise. Walks the cursor, so multi-batch result
/// sets are followed to the end.
pub async fn render(client: &mut Client) -> String {
    if client.row_count() == 0 {
        return summary(client);
    }

    let columns: Vec<String> = client.columns().to_vec();
    let mut rows: Vec<Vec<String>> = Vec::new();
    while client.next_row().await {
        rows.push(
            (0..columns.len())
                .map(|ordinal| client.value_by_ordinal(ordinal).to_string())
                .collect(),
        );
    }
    if client.failed() {
        return format!("{}: {}", "Error".red(), client.error());
    }

    let mut out = table(&columns, &rows);
    out.push_str(&format!("{} row(s)", client.row_count()).dimmed().to_string());
    out
}

fn summary(client: &Client) -> String {
    let mut line = format!("{} {}", "ok".green(), client.action());
    if !client.id().is_empty() {
        line.push_str(&format!(" id={}", client.id()));
    }
    if !client.pub_sub_id().is_empty() {
        line.push_str(&format!(" pubsubid={}", client.pub_sub_id()));
    }
    line
}

fn table(columns: &[String], rows: &[Vec<String>]) -> String {
    // Column widths before any coloring; escape codes would skew padding.
    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let mut out = String::new();
    for (i, column) in columns.iter().enumerate() {
        let padded = format!("{:<width$}", column, width = widths[i]);
        out.push_str(&padded.cyan().to_string());
        out.push_str("  ");
    }
    out.push('\n');
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            out.push_str(&format!("{:<width$}  ", cell, width = widths[i]));
        }
        out.push('\n');
    }
    out
}
