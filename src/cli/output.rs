//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use chrono::{DateTime, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::audit::AuditEvent;
use crate::vault::VaultItem;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of items (Id, Name, Kind, Updated), newest first.
pub fn print_items_table(items: &[VaultItem]) {
    if items.is_empty() {
        info("No items in this vault yet.");
        tip("Run `chaffvault add <name> KEY=VALUE ...` to add your first item.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Name", "Kind", "Updated"]);

    for item in items {
        table.add_row(vec![
            item.id.clone(),
            item.name.clone(),
            item.kind.to_string(),
            format_timestamp(item.updated_at),
        ]);
    }

    println!("{table}");
}

/// Print a table of audit events (Time, Type, Details).
pub fn print_audit_table(events: &[AuditEvent]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Type", "Details"]);

    for event in events {
        let kind = serde_json::to_value(event.kind)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default();
        table.add_row(vec![
            format_timestamp(event.timestamp),
            kind,
            event.details.to_string(),
        ]);
    }

    println!("{table}");
}

/// Render an epoch-ms timestamp as local-agnostic UTC.
fn format_timestamp(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}
