//! Contact list loading

use crate::{Result, VoiceBatchError};
use log::{debug, warn};
use std::fs;
use std::path::Path;

pub const NAME_COLUMN: &str = "Name";
pub const EMAIL_COLUMN: &str = "Email";

/// One contact from the input list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRecord {
    /// 1-based data row number (header excluded)
    pub row: usize,
    pub name: String,
    pub email: String,
}

impl BatchRecord {
    pub fn new(row: usize, name: &str, email: &str) -> Self {
        Self {
            row,
            name: name.trim().to_string(),
            email: email.trim().to_string(),
        }
    }

    /// Both name and email are present
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.email.is_empty()
    }
}

/// Read a CSV contact list from disk
pub fn read_records(path: &Path) -> Result<Vec<BatchRecord>> {
    if !path.exists() {
        return Err(VoiceBatchError::Input(format!(
            "contact list not found: {}",
            path.display()
        )));
    }
    let contents = fs::read_to_string(path)?;
    parse_records(&contents)
}

/// Parse CSV text with a header row containing Name and Email columns
///
/// Columns are found by header (trimmed, case-insensitive), so their order
/// does not matter. A leading byte-order mark is ignored and short rows read
/// as empty cells.
pub fn parse_records(contents: &str) -> Result<Vec<BatchRecord>> {
    let contents = contents.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let headers = reader.headers()?.clone();
    let find = |column: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(column))
            .ok_or_else(|| {
                VoiceBatchError::Input(format!("contact list has no {:?} column", column))
            })
    };
    let name_idx = find(NAME_COLUMN)?;
    let email_idx = find(EMAIL_COLUMN)?;

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!("Unreadable contact row {}: {}", i + 1, e);
                records.push(BatchRecord::new(i + 1, "", ""));
                continue;
            }
        };
        records.push(BatchRecord::new(
            i + 1,
            row.get(name_idx).unwrap_or(""),
            row.get(email_idx).unwrap_or(""),
        ));
    }

    debug!("Parsed {} contact rows", records.len());
    Ok(records)
}
