//! Validating conversion of raw rows into [`Record`]s.

use energy_core::data_processors::{NumberProcessor, TimestampProcessor};
use energy_core::models::{Field, FieldError, Record};
use energy_core::Result;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::columns::ColumnMap;

/// One input row: column name → raw cell value.
pub type RawRow = serde_json::Map<String, Value>;

// ── RawTable ──────────────────────────────────────────────────────────────────

/// Ordered header list plus ordered rows, as handed over by a loader.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table from rows alone; headers are the keys in first-seen order.
    pub fn from_rows(rows: Vec<RawRow>) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
        }
        Self { headers, rows }
    }

    pub fn push_row(&mut self, row: RawRow) {
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ── ParseStats ────────────────────────────────────────────────────────────────

/// Row accounting for one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub bad_timestamp: usize,
    pub bad_consumption: usize,
    pub bad_cost: usize,
}

impl ParseStats {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.rows_kept
    }

    fn count_failure(&mut self, error: &FieldError) {
        match error.field() {
            Field::Timestamp => self.bad_timestamp += 1,
            Field::Consumption => self.bad_consumption += 1,
            Field::Cost => self.bad_cost += 1,
        }
    }
}

/// Records in source order plus the accounting that produced them.
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub records: Vec<Record>,
    pub stats: ParseStats,
}

// ── RecordParser ──────────────────────────────────────────────────────────────

/// Stateless parser from [`RawTable`] to [`Record`]s.
pub struct RecordParser;

impl RecordParser {
    /// Parse every row of `table`.
    ///
    /// Fails only with [`energy_core::EnergyError::Schema`] when a required
    /// column is missing. Rows whose timestamp, consumption or cost does not
    /// coerce are dropped; the rest keep their original order. A table with
    /// no valid rows yields an empty output, not an error.
    pub fn parse(table: &RawTable) -> Result<ParseOutput> {
        let columns = ColumnMap::resolve(table.headers())?;

        let mut output = ParseOutput {
            records: Vec::with_capacity(table.len()),
            stats: ParseStats::default(),
        };

        for (index, row) in table.rows().iter().enumerate() {
            output.stats.rows_read += 1;
            match Self::parse_row(row, &columns) {
                Ok(record) => output.records.push(record),
                Err(e) => {
                    debug!("Dropping row {}: {}", index + 1, e);
                    output.stats.count_failure(&e);
                }
            }
        }
        output.stats.rows_kept = output.records.len();

        info!(
            "Parsed {} of {} rows ({} dropped)",
            output.stats.rows_kept,
            output.stats.rows_read,
            output.stats.rows_dropped()
        );
        Ok(output)
    }

    /// Coerce a single row. Missing keys count as null.
    pub fn parse_row(row: &RawRow, columns: &ColumnMap) -> std::result::Result<Record, FieldError> {
        let cell = |field: Field| row.get(columns.header(field)).unwrap_or(&Value::Null);

        let timestamp = TimestampProcessor::parse(cell(Field::Timestamp))?;
        let consumption = NumberProcessor::parse(cell(Field::Consumption), Field::Consumption)?;
        let cost = NumberProcessor::parse(cell(Field::Cost), Field::Cost)?;

        Record::new(timestamp, consumption, cost)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use energy_core::EnergyError;
    use serde_json::json;

    fn row(value: Value) -> RawRow {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn table(rows: Vec<Value>) -> RawTable {
        let mut table = RawTable::new(vec![
            "Timestamp".to_string(),
            "Consumption kWh".to_string(),
            "Total Cost".to_string(),
        ]);
        for r in rows {
            table.push_row(row(r));
        }
        table
    }

    fn entry(ts: &str, kwh: Value, cost: Value) -> Value {
        json!({"Timestamp": ts, "Consumption kWh": kwh, "Total Cost": cost})
    }

    // ── RawTable ──────────────────────────────────────────────────────────────

    #[test]
    fn test_raw_table_from_rows_collects_headers_in_order() {
        let table = RawTable::from_rows(vec![
            row(json!({"timestamp": "2024-01-01 00:00", "consumption_kwh": "1"})),
            row(json!({"total_cost": "2", "timestamp": "2024-01-01 01:00"})),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.headers(), ["timestamp", "consumption_kwh", "total_cost"]);
    }

    #[test]
    fn test_from_rows_left_most_alias_wins() {
        let t = RawTable::from_rows(vec![row(json!({
            "timestamp": "2024-01-01 19:00",
            "Consumo_kwh": "5",
            "consumption_kwh": "99",
            "total_cost": "10",
        }))]);
        assert_eq!(t.headers()[1], "Consumo_kwh");

        let out = RecordParser::parse(&t).unwrap();
        assert_eq!(out.records[0].consumption_kwh(), 5.0);
    }

    // ── RecordParser::parse ───────────────────────────────────────────────────

    #[test]
    fn test_parse_valid_rows_preserves_order() {
        let t = table(vec![
            entry("2024-01-02 10:00", json!("2.5"), json!("5.0")),
            entry("2024-01-01 09:00", json!(1), json!(2)),
        ]);
        let out = RecordParser::parse(&t).unwrap();

        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].consumption_kwh(), 2.5);
        assert_eq!(out.records[1].total_cost(), 2.0);
        assert_eq!(out.stats.rows_read, 2);
        assert_eq!(out.stats.rows_dropped(), 0);
    }

    #[test]
    fn test_parse_drops_rows_with_any_bad_field() {
        let t = table(vec![
            entry("not a date", json!("1"), json!("1")),
            entry("2024-01-01 01:00", json!("lots"), json!("1")),
            entry("2024-01-01 02:00", json!("1"), json!("")),
            entry("2024-01-01 03:00", json!("-4"), json!("1")),
            entry("2024-01-01 04:00", json!("3"), json!("6")),
        ]);
        let out = RecordParser::parse(&t).unwrap();

        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].hour(), 4);
        assert_eq!(out.stats.rows_dropped(), 4);
        assert_eq!(out.stats.bad_timestamp, 1);
        assert_eq!(out.stats.bad_consumption, 2);
        assert_eq!(out.stats.bad_cost, 1);
    }

    #[test]
    fn test_parse_output_never_longer_than_input() {
        let t = table(vec![
            entry("2024-01-01 01:00", json!("1"), json!("1")),
            entry("garbage", json!("x"), json!("y")),
            entry("2024-01-01 02:00", json!(null), json!("1")),
        ]);
        let out = RecordParser::parse(&t).unwrap();
        assert!(out.records.len() <= t.len());
        assert_eq!(out.stats.rows_kept + out.stats.rows_dropped(), t.len());
    }

    #[test]
    fn test_parse_missing_key_in_row_drops_row() {
        let mut t = table(vec![]);
        t.push_row(row(json!({"Timestamp": "2024-01-01 01:00", "Consumption kWh": "1"})));
        let out = RecordParser::parse(&t).unwrap();
        assert!(out.records.is_empty());
        assert_eq!(out.stats.bad_cost, 1);
    }

    #[test]
    fn test_parse_missing_cost_column_is_schema_error() {
        let mut t = RawTable::new(vec!["timestamp".to_string(), "consumption_kwh".to_string()]);
        t.push_row(row(json!({"timestamp": "2024-01-01 01:00", "consumption_kwh": "1"})));

        match RecordParser::parse(&t) {
            Err(EnergyError::Schema { missing }) => assert_eq!(missing, vec!["total_cost"]),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_missing_column_fails_even_with_no_rows() {
        let t = RawTable::new(vec!["timestamp".to_string()]);
        assert!(matches!(
            RecordParser::parse(&t),
            Err(EnergyError::Schema { .. })
        ));
    }

    #[test]
    fn test_parse_empty_table_is_not_an_error() {
        let out = RecordParser::parse(&table(vec![])).unwrap();
        assert!(out.records.is_empty());
        assert_eq!(out.stats, ParseStats::default());
    }

    #[test]
    fn test_parse_accepts_portuguese_headers() {
        let t = RawTable::from_rows(vec![row(json!({
            "Data/hora": "2024-01-01 19:00",
            "Consumo kwh": "5",
            "Custo total": "10.0",
        }))]);
        let out = RecordParser::parse(&t).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].hour(), 19);
    }
}
