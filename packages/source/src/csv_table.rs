//! CSV loader.
//!
//! Parses a CSV with a header row into a [`SourceTable`]. Cells are typed on
//! load: empty cells and missing-value markers (`NaN`, `NA`, `null`, ...)
//! become null, integer and float literals become JSON numbers, and
//! everything else stays a string.

use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::{Row, SourceError, SourceTable};

/// Reads a CSV file from disk.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened or parsed.
pub fn read_csv_path(name: &str, path: &Path) -> Result<SourceTable, SourceError> {
    log::info!("[{name}] Reading CSV {}", path.display());
    let file = std::fs::File::open(path)?;
    read_csv(name, file)
}

/// Reads CSV data from any reader.
///
/// # Errors
///
/// Returns [`SourceError`] if the data has no header row or a record fails
/// to parse.
pub fn read_csv<R: Read>(name: &str, reader: R) -> Result<SourceTable, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(SourceError::Normalization {
            message: format!("CSV source '{name}' contains no header row"),
        });
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;

        let mut row = Row::new();
        for (i, header) in headers.iter().enumerate() {
            row.insert(header.clone(), parse_cell(record.get(i).unwrap_or("")));
        }
        rows.push(row);
    }

    log::info!("[{name}] Parsed {} rows ({} columns)", rows.len(), headers.len());

    Ok(SourceTable::new(name, headers, rows))
}

/// Cell spellings that mean "no value" in exported tables.
const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-NaN", "-nan", "<NA>", "N/A", "NA", "NULL", "NaN", "None",
    "n/a", "nan", "null",
];

/// Types a raw CSV cell.
#[must_use]
pub fn parse_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed) {
        return Value::Null;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }
    if let Some(number) = trimmed
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
    {
        return Value::Number(number);
    }
    Value::String(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn types_cells() {
        assert_eq!(parse_cell(""), Value::Null);
        assert_eq!(parse_cell("  "), Value::Null);
        assert_eq!(parse_cell("85123456"), json!(85_123_456));
        assert_eq!(parse_cell("0.25"), json!(0.25));
        assert_eq!(parse_cell("Tremont St"), json!("Tremont St"));
        assert_eq!(parse_cell("NaN"), Value::Null);
        assert_eq!(parse_cell("nan"), Value::Null);
        assert_eq!(parse_cell("#N/A"), Value::Null);
        assert_eq!(parse_cell("Nantucket Ave"), json!("Nantucket Ave"));
    }

    #[test]
    fn nan_heat_cells_load_as_null() {
        let data = "TLID,LST_weighted\n1,0.5\n2,NaN\n";
        let table = read_csv("urbanheat", data.as_bytes()).unwrap();
        assert_eq!(table.rows()[0]["LST_weighted"], json!(0.5));
        assert_eq!(table.rows()[1]["LST_weighted"], Value::Null);
    }

    #[test]
    fn reads_rows_keyed_by_header() {
        let data = "TLID,FULLNAM,MAIN,cluster\n1,Tremont St,1,2\n2,,0,\n";
        let table = read_csv("roads", data.as_bytes()).unwrap();

        assert_eq!(table.name(), "roads");
        assert_eq!(table.columns(), ["TLID", "FULLNAM", "MAIN", "cluster"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0]["FULLNAM"], json!("Tremont St"));
        assert_eq!(table.rows()[1]["FULLNAM"], Value::Null);
        assert_eq!(table.rows()[1]["cluster"], Value::Null);
    }

    #[test]
    fn short_records_fill_with_null() {
        let data = "TLID,full_address\n7\n";
        let table = read_csv("parcels", data.as_bytes()).unwrap();
        assert_eq!(table.rows()[0]["TLID"], json!(7));
        assert_eq!(table.rows()[0]["full_address"], Value::Null);
    }
}
