//! Header normalization and the logical-column lookup table.

use energy_core::models::Field;
use energy_core::{EnergyError, Result};

/// Normalized header spellings and the logical column each one names.
///
/// The Portuguese spellings are the headers exported by the original
/// residential metering tool.
const COLUMN_ALIASES: &[(&str, Field)] = &[
    ("timestamp", Field::Timestamp),
    ("data/hora", Field::Timestamp),
    ("consumption_kwh", Field::Consumption),
    ("consumo_kwh", Field::Consumption),
    ("total_cost", Field::Cost),
    ("custo_total", Field::Cost),
];

/// Trim, turn spaces into underscores and lower-case a raw header.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().replace(' ', "_").to_lowercase()
}

/// Logical column for a raw header, if it names one.
pub fn lookup(raw_header: &str) -> Option<Field> {
    let normalized = normalize_header(raw_header);
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, field)| *field)
}

/// The raw header chosen for each logical column of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    headers: [String; 3],
}

impl ColumnMap {
    /// Resolve `headers` against the lookup table.
    ///
    /// The left-most header wins when several resolve to the same column.
    /// Fails with [`EnergyError::Schema`] naming every column still missing.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        let mut found: [Option<String>; 3] = [None, None, None];
        for header in headers {
            let header = header.as_ref();
            if let Some(field) = lookup(header) {
                let slot = &mut found[slot_of(field)];
                if slot.is_none() {
                    *slot = Some(header.to_string());
                }
            }
        }

        let missing: Vec<String> = Field::ALL
            .iter()
            .filter(|field| found[slot_of(**field)].is_none())
            .map(|field| field.column_name().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(EnergyError::Schema { missing });
        }

        let [Some(timestamp), Some(consumption), Some(cost)] = found else {
            return Err(EnergyError::Schema { missing: vec![] });
        };
        Ok(Self {
            headers: [timestamp, consumption, cost],
        })
    }

    /// Raw header carrying `field` in the source table.
    pub fn header(&self, field: Field) -> &str {
        &self.headers[slot_of(field)]
    }
}

fn slot_of(field: Field) -> usize {
    match field {
        Field::Timestamp => 0,
        Field::Consumption => 1,
        Field::Cost => 2,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Consumption kWh "), "consumption_kwh");
        assert_eq!(normalize_header("TOTAL COST"), "total_cost");
        assert_eq!(normalize_header("Data/hora"), "data/hora");
    }

    #[test]
    fn test_lookup_canonical_and_aliases() {
        assert_eq!(lookup("timestamp"), Some(Field::Timestamp));
        assert_eq!(lookup("Data/hora"), Some(Field::Timestamp));
        assert_eq!(lookup("Consumo kwh"), Some(Field::Consumption));
        assert_eq!(lookup(" Custo_total"), Some(Field::Cost));
        assert_eq!(lookup("Total Cost"), Some(Field::Cost));
    }

    #[test]
    fn test_lookup_unknown_header() {
        assert_eq!(lookup("meter_id"), None);
        assert_eq!(lookup("consumption"), None);
        assert_eq!(lookup(""), None);
    }

    #[test]
    fn test_resolve_keeps_raw_header_names() {
        let headers = ["Timestamp ", "Meter", "Consumption kWh", "Total Cost"];
        let map = ColumnMap::resolve(&headers).unwrap();
        assert_eq!(map.header(Field::Timestamp), "Timestamp ");
        assert_eq!(map.header(Field::Consumption), "Consumption kWh");
        assert_eq!(map.header(Field::Cost), "Total Cost");
    }

    #[test]
    fn test_resolve_first_header_wins() {
        let headers = ["timestamp", "consumo_kwh", "Consumption_kWh", "total_cost"];
        let map = ColumnMap::resolve(&headers).unwrap();
        assert_eq!(map.header(Field::Consumption), "consumo_kwh");
    }

    #[test]
    fn test_resolve_missing_cost_is_schema_error() {
        let headers = ["timestamp", "consumption_kwh"];
        match ColumnMap::resolve(&headers) {
            Err(EnergyError::Schema { missing }) => assert_eq!(missing, vec!["total_cost"]),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_reports_all_missing_columns() {
        let headers: [&str; 0] = [];
        match ColumnMap::resolve(&headers) {
            Err(EnergyError::Schema { missing }) => {
                assert_eq!(missing, vec!["timestamp", "consumption_kwh", "total_cost"])
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }
}
