//! Text rendering of outcomes and listings

use bkt_core::{ItemOutcome, ItemStatus, ObjectInfo, SkipReason, Summary};
use comfy_table::Table;

fn human_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// One status line for a processed item
pub fn outcome_line(outcome: &ItemOutcome) -> String {
    let key = &outcome.key;
    match &outcome.status {
        ItemStatus::Uploaded { bytes, .. } => format!("Uploaded {key} ({})", human_size(*bytes)),
        ItemStatus::Downloaded { bytes, path } => format!(
            "Downloaded {key} -> {} ({})",
            path.display(),
            human_size(*bytes)
        ),
        ItemStatus::Deleted => format!("Deleted {key}"),
        ItemStatus::Skipped {
            reason: SkipReason::Ignored { pattern },
        } => format!("Skipped {key} (ignored by {pattern})"),
        ItemStatus::Skipped {
            reason: SkipReason::DirectoryMarker,
        } => format!("Skipped {key} (folder marker)"),
        ItemStatus::Failed { error } => format!("Failed {key}: {error}"),
    }
}

pub fn summary_line(summary: &Summary) -> String {
    format!(
        "{} succeeded, {} skipped, {} failed",
        summary.succeeded, summary.skipped, summary.failed
    )
}

/// Keys one per line, in listing order
pub fn view_text(items: &[ObjectInfo]) -> String {
    items
        .iter()
        .map(|item| item.key.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Long listing with size and modification time
pub fn view_table(items: &[ObjectInfo]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Key", "Size", "Last Modified"]);
    for item in items {
        let modified = item
            .last_modified
            .map(|ts| ts.strftime("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        table.add_row(vec![
            item.key.clone(),
            human_size(item.size_bytes.max(0) as u64),
            modified,
        ]);
    }
    table
}
