use crate::error::{Result, RuntimeError};
use nametag_engine::RosterEntry;
use std::path::Path;

/// Roster rows plus the header row they were keyed by
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedRoster {
    pub columns: Vec<String>,
    pub entries: Vec<RosterEntry>,
}

/// Load a roster from a CSV file with a header row.
///
/// Every column is kept as a string. Rows that are entirely blank are
/// skipped; short rows are padded with empty values.
pub async fn load_roster_csv(path: impl AsRef<Path>) -> Result<LoadedRoster> {
    let contents = tokio::fs::read(path.as_ref()).await?;
    tokio::task::spawn_blocking(move || parse_roster(&contents)).await?
}

pub fn parse_roster(data: &[u8]) -> Result<LoadedRoster> {
    // Spreadsheet exports often start with a UTF-8 byte order mark
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(data);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.iter().all(|c| c.is_empty()) {
        return Err(RuntimeError::MissingHeader);
    }

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut entry = RosterEntry::new((entries.len() + 1).to_string());
        for (index, column) in columns.iter().enumerate() {
            entry = entry.with_field(column.as_str(), record.get(index).unwrap_or(""));
        }
        entries.push(entry);
    }

    log::info!("Loaded {} roster entries with {} columns", entries.len(), columns.len());
    Ok(LoadedRoster { columns, entries })
}
