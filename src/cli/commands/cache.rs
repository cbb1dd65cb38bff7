//! Cache command - inspect or clear the persisted query cache

use crate::cache::{CacheEntry, EntryStatus};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::client::TaskClient;
use crate::error::TaskdeckResult;
use crate::ui::{self, Level, UiContext};
use console::style;

/// Execute the cache command
pub async fn execute(args: CacheArgs, client: &TaskClient) -> TaskdeckResult<()> {
    match args.action {
        CacheAction::List { format } => list_entries(client, format),
        CacheAction::Clear { yes } => clear_entries(client, yes).await,
    }
}

fn list_entries(client: &TaskClient, format: OutputFormat) -> TaskdeckResult<()> {
    let entries = client.cache().entries();

    if entries.is_empty() {
        match format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => println!("No cached queries."),
        }
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_table(&entries),
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Plain => {
            for entry in &entries {
                println!("{}", entry.fingerprint);
            }
        }
    }

    Ok(())
}

async fn clear_entries(client: &TaskClient, yes: bool) -> TaskdeckResult<()> {
    let ctx = UiContext::detect().with_auto_yes(yes);
    let count = client.cache().entries().len();

    if count == 0 {
        ui::notify(&ctx, Level::Info, "Cache is already empty");
        return Ok(());
    }

    let prompt = format!("Drop {} cached queries?", count);
    if !ui::confirm(&ctx, &prompt, false).await? {
        ui::notify(&ctx, Level::Info, "Nothing removed");
        ui::remark(&ctx, "Pass --yes to skip the confirmation");
        return Ok(());
    }

    client.cache().reset();
    ui::notify(&ctx, Level::Success, &format!("Removed {} cached queries", count));
    Ok(())
}

fn state_label(entry: &CacheEntry) -> &'static str {
    match (entry.status, entry.stale) {
        (EntryStatus::Fulfilled, false) => "fresh",
        (EntryStatus::Fulfilled, true) => "stale",
        (EntryStatus::Pending, _) => "pending",
        (EntryStatus::Rejected, _) => "failed",
        (EntryStatus::Uninitialized, _) => "empty",
    }
}

fn tag_list(entry: &CacheEntry) -> String {
    entry
        .tags
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn print_table(entries: &[CacheEntry]) {
    println!("{:<32} {:<8} {:<16} {:<20}", "QUERY", "STATE", "TAGS", "UPDATED");
    println!("{}", "-".repeat(78));

    for entry in entries {
        let state = state_cell(state_label(entry));
        let updated = entry
            .updated_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<32} {} {:<16} {:<20}",
            entry.fingerprint.as_str(),
            state,
            tag_list(entry),
            updated
        );
    }

    println!();
    println!("Total: {} cached quer{}", entries.len(), if entries.len() == 1 { "y" } else { "ies" });
}

/// Padded before styling so escape codes do not count toward the column width
fn state_cell(label: &str) -> String {
    let padded = format!("{:<8}", label);
    let styled = match label {
        "fresh" => style(padded).green(),
        "stale" => style(padded).yellow(),
        "failed" => style(padded).red(),
        _ => style(padded).dim(),
    };
    styled.to_string()
}

fn print_json(entries: &[CacheEntry]) -> TaskdeckResult<()> {
    #[derive(serde::Serialize)]
    struct EntryJson<'a> {
        query: &'a str,
        state: &'static str,
        tags: Vec<String>,
        updated_at: Option<String>,
    }

    let rows: Vec<EntryJson<'_>> = entries
        .iter()
        .map(|entry| EntryJson {
            query: entry.fingerprint.as_str(),
            state: state_label(entry),
            tags: entry.tags.iter().map(|t| t.to_string()).collect(),
            updated_at: entry.updated_at.map(|t| t.to_rfc3339()),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
