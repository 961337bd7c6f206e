use crate::domain::ContributorRecord;
use serde_json::Value;
use tracing::debug;

/// Turns NDJSON text into records in file order. Blank lines are skipped;
/// lines that are not JSON objects are dropped without error.
pub fn parse_records(text: &str) -> Vec<ContributorRecord> {
    let mut dropped = 0usize;

    let records: Vec<ContributorRecord> = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match parse_line(line) {
            Some(record) => Some(record),
            None => {
                dropped += 1;
                None
            }
        })
        .collect();

    if dropped > 0 {
        debug!("Dropped {} malformed contributor lines", dropped);
    }

    records
}

fn parse_line(line: &str) -> Option<ContributorRecord> {
    match serde_json::from_str::<Value>(line).ok()? {
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}
