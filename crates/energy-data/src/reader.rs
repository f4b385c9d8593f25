//! Delimited-text loading for consumption logs.
//!
//! Turns a CSV file into the [`RawTable`] the parser consumes. All cells are
//! kept as strings; coercion happens in [`crate::parser`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use energy_core::{EnergyError, Result};
use serde_json::Value;
use tracing::debug;

use crate::parser::{ParseOutput, RawRow, RawTable, RecordParser};

/// Read CSV text with a header row into a [`RawTable`].
///
/// Rows may be shorter or longer than the header: missing cells are left out
/// of the row map and extra cells are ignored. A malformed CSV stream (for
/// example invalid UTF-8) fails the whole load.
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            // Spreadsheet exports often lead with a byte-order mark.
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut table = RawTable::new(headers.clone());
    for result in csv_reader.records() {
        let record = result?;
        let mut row = RawRow::new();
        for (h, cell) in headers.iter().zip(record.iter()) {
            // A repeated header keeps its left-most cell.
            row.entry(h.clone())
                .or_insert_with(|| Value::String(cell.to_string()));
        }
        table.push_row(row);
    }

    debug!("Read {} CSV rows with {} columns", table.len(), headers.len());
    Ok(table)
}

/// Open `path` and read it with [`read_csv`].
pub fn read_csv_file(path: &Path) -> Result<RawTable> {
    let file = File::open(path).map_err(|source| EnergyError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file)
}

/// Read and parse a consumption log in one step.
pub fn load_records(path: &Path) -> Result<ParseOutput> {
    let table = read_csv_file(path)?;
    RecordParser::parse(&table)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_read_csv_keeps_cells_as_strings() {
        let data = "timestamp,consumption_kwh,total_cost\n2024-01-01 19:00,5,10.0\n";
        let table = read_csv(data.as_bytes()).unwrap();

        assert_eq!(table.headers(), ["timestamp", "consumption_kwh", "total_cost"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0]["consumption_kwh"], Value::String("5".to_string()));
    }

    #[test]
    fn test_read_csv_strips_byte_order_mark() {
        let data = "\u{feff}timestamp,consumption_kwh,total_cost\n2024-01-01 19:00,5,10.0\n";
        let table = read_csv(data.as_bytes()).unwrap();
        assert_eq!(table.headers()[0], "timestamp");
    }

    #[test]
    fn test_read_csv_ragged_rows() {
        let data = "timestamp,consumption_kwh,total_cost\n2024-01-01 19:00,5\n2024-01-01 20:00,1,2,extra\n";
        let table = read_csv(data.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert!(!table.rows()[0].contains_key("total_cost"));
        assert_eq!(table.rows()[1].len(), 3);
    }

    #[test]
    fn test_read_csv_repeated_header_keeps_left_most_cell() {
        let data = "timestamp,consumption_kwh,consumption_kwh,total_cost\n\
                    2024-01-01 19:00,5,99,10.0\n";
        let table = read_csv(data.as_bytes()).unwrap();
        assert_eq!(table.rows()[0]["consumption_kwh"], Value::String("5".to_string()));

        let out = RecordParser::parse(&table).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].consumption_kwh(), 5.0);
        assert_eq!(out.records[0].total_cost(), 10.0);
    }

    #[test]
    fn test_read_csv_aliased_headers_use_left_most_column() {
        let data = "Data/hora,consumption_kwh,Consumo_kwh,Custo_total,total_cost\n\
                    2024-01-01 19:00,5,99,10.0,77\n";
        let table = read_csv(data.as_bytes()).unwrap();
        let out = RecordParser::parse(&table).unwrap();

        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].hour(), 19);
        assert_eq!(out.records[0].consumption_kwh(), 5.0);
        assert_eq!(out.records[0].total_cost(), 10.0);
    }

    #[test]
    fn test_read_csv_header_only() {
        let table = read_csv("timestamp,consumption_kwh,total_cost\n".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers().len(), 3);
    }

    #[test]
    fn test_read_csv_file_missing_path() {
        let err = read_csv_file(Path::new("/tmp/does-not-exist-energy-test.csv")).unwrap_err();
        assert!(matches!(err, EnergyError::FileRead { .. }));
    }

    #[test]
    fn test_load_records_end_to_end() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "usage.csv",
            "Timestamp, Consumption kWh ,Total Cost\n\
             2024-01-01 19:00,5,10.0\n\
             2024-01-01 02:00,3,6.0\n\
             broken,1,1\n\
             2024-01-02 19:00,4,8.0\n",
        );

        let out = load_records(&path).unwrap();
        assert_eq!(out.records.len(), 3);
        assert_eq!(out.stats.rows_dropped(), 1);
    }

    #[test]
    fn test_load_records_schema_error() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "usage.csv",
            "timestamp,consumption_kwh\n2024-01-01 19:00,5\n",
        );
        assert!(matches!(
            load_records(&path),
            Err(EnergyError::Schema { .. })
        ));
    }
}
