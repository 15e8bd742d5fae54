//! Loader for the spreadsheet CSV export of the guidance table.
//!
//! The export has one header row of room categories and a single data row
//! where each cell is a JSON array of guidance records for that category.
//! Fetching the text is the caller's concern; this parses it.

use super::{GuidanceError, GuidanceTable, RawGuidanceRecord};

/// Parse an already-fetched sheet CSV export into a guidance table.
///
/// Unparseable cells are skipped with a warning rather than failing the
/// whole table; an export without a data row yields an empty table.
pub fn parse_sheet(text: &str) -> Result<GuidanceTable, GuidanceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();

    let mut table = GuidanceTable::new();
    let Some(row) = reader.records().next() else {
        return Ok(table);
    };
    let row = row?;

    for (i, header) in headers.iter().enumerate() {
        let category = header.trim();
        if category.is_empty() {
            continue;
        }
        let Some(cell) = row.get(i).map(str::trim).filter(|c| !c.is_empty()) else {
            continue;
        };
        let records: Vec<RawGuidanceRecord> = match serde_json::from_str(cell) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Skipping guidance cell for '{category}': {e}");
                continue;
            }
        };
        for record in records {
            let Some(label) = record.direction() else {
                continue;
            };
            table.insert(category, label, record.into_entry());
        }
    }
    Ok(table)
}

// ============================================================================
// Tests
// ============================================================================
