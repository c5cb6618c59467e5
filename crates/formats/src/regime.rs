//! Preparation of the "régime d'exploitation des lignes" open dataset.
//!
//! Raw rows carry `code_ligne`, `rg_troncon`, `pkd`, `pkf`, `lib_ligne` and a
//! truncated `exploitati` column. The prepared table keeps the display
//! columns and adds the `lig_rg` lookup key and the segment length.

use serde_json::{Map, Value};

use crate::pk::length_km;
use crate::segment_table::{SegmentRow, SegmentTable, value_text};

pub const LINE_RANK_COLUMN: &str = "lig_rg";
pub const REGIME_COLUMN: &str = "exploitation";
pub const LINE_NAME_COLUMN: &str = "lib_ligne";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegimeError {
    MissingColumn { row: usize, column: &'static str },
    InvalidRank { row: usize, value: String },
}

impl std::fmt::Display for RegimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegimeError::MissingColumn { row, column } => {
                write!(f, "row {row} has no `{column}` value")
            }
            RegimeError::InvalidRank { row, value } => {
                write!(f, "row {row} has a non-integer rg_troncon: {value}")
            }
        }
    }
}

impl std::error::Error for RegimeError {}

/// `"1000"` and rank `1` give `"001000-1"`.
pub fn line_rank_key(code_ligne: &str, rank: i64) -> String {
    format!("{code_ligne:0>6}-{rank}")
}

pub fn prepare_regime_table(raw: &SegmentTable) -> Result<SegmentTable, RegimeError> {
    let mut rows = Vec::with_capacity(raw.len());
    for (index, row) in raw.rows().iter().enumerate() {
        rows.push(prepare_row(index, row)?);
    }
    Ok(SegmentTable::new(rows))
}

fn prepare_row(index: usize, row: &SegmentRow) -> Result<SegmentRow, RegimeError> {
    let required = |column: &'static str| {
        row.property_text(column)
            .ok_or(RegimeError::MissingColumn { row: index, column })
    };

    let code_ligne = required("code_ligne")?;
    let rank = parse_rank(index, row.property("rg_troncon"))?;
    let pkd = required("pkd")?;
    let pkf = required("pkf")?;

    let mut properties = Map::new();
    properties.insert(
        LINE_RANK_COLUMN.to_string(),
        Value::String(line_rank_key(&code_ligne, rank)),
    );
    properties.insert(
        LINE_NAME_COLUMN.to_string(),
        row.property(LINE_NAME_COLUMN).cloned().unwrap_or(Value::Null),
    );
    properties.insert(
        REGIME_COLUMN.to_string(),
        row.property("exploitati")
            .or_else(|| row.property(REGIME_COLUMN))
            .cloned()
            .unwrap_or(Value::Null),
    );
    properties.insert("pkd".to_string(), Value::String(pkd.clone()));
    properties.insert("pkf".to_string(), Value::String(pkf.clone()));
    properties.insert(
        "long_km".to_string(),
        length_km(&pkd, &pkf).map(Value::from).unwrap_or(Value::Null),
    );

    Ok(SegmentRow::new(row.id.clone(), properties, row.geometry.clone()))
}

fn parse_rank(row: usize, value: Option<&Value>) -> Result<i64, RegimeError> {
    let value = value
        .filter(|v| !v.is_null())
        .ok_or(RegimeError::MissingColumn {
            row,
            column: "rg_troncon",
        })?;
    let rank = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64),
        _ => None,
    };
    rank.ok_or_else(|| RegimeError::InvalidRank {
        row,
        value: value_text(value).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::{RegimeError, line_rank_key, prepare_regime_table};
    use crate::segment_table::{LoadOptions, SegmentTable};
    use serde_json::json;

    fn raw() -> SegmentTable {
        let value = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {
                        "code_ligne": "1000", "rg_troncon": 1.0,
                        "pkd": "012+345", "pkf": "020+845",
                        "lib_ligne": "Ligne de Paris-Nord à Lille",
                        "exploitati": "Double voie"
                    },
                    "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}
                },
                {
                    "type": "Feature",
                    "properties": {
                        "code_ligne": "983000", "rg_troncon": "2",
                        "pkd": "D+100", "pkf": "bad",
                        "lib_ligne": "Ligne des Invalides à Austerlitz",
                        "exploitati": "Voie unique"
                    },
                    "geometry": null
                }
            ]
        });
        SegmentTable::from_geojson_value(&value, LoadOptions::default()).expect("raw table")
    }

    #[test]
    fn pads_line_code() {
        assert_eq!(line_rank_key("1000", 1), "001000-1");
        assert_eq!(line_rank_key("983000", 12), "983000-12");
    }

    #[test]
    fn prepares_display_columns() {
        let table = prepare_regime_table(&raw()).expect("prepare");
        let first = &table.rows()[0];
        assert_eq!(first.property_text("lig_rg").as_deref(), Some("001000-1"));
        assert_eq!(first.property_text("exploitation").as_deref(), Some("Double voie"));
        assert_eq!(first.property("long_km"), Some(&json!(8.5)));
        assert!(first.property("exploitati").is_none());
        assert!(first.geometry.is_some());
    }

    #[test]
    fn unparseable_pk_leaves_length_empty() {
        let table = prepare_regime_table(&raw()).expect("prepare");
        let second = &table.rows()[1];
        assert_eq!(second.property_text("lig_rg").as_deref(), Some("983000-2"));
        assert_eq!(second.property("long_km"), Some(&serde_json::Value::Null));
        assert!(second.geometry.is_none());
    }

    #[test]
    fn oversized_pk_leaves_length_empty() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {
                    "code_ligne": "1000", "rg_troncon": 1,
                    "pkd": "99999999999999999+000", "pkf": "001+000"
                },
                "geometry": null
            }]
        });
        let raw = SegmentTable::from_geojson_value(&value, LoadOptions::default()).expect("raw");
        let table = prepare_regime_table(&raw).expect("prepare");
        assert_eq!(table.rows()[0].property("long_km"), Some(&serde_json::Value::Null));
        assert_eq!(
            table.rows()[0].property_text("pkd").as_deref(),
            Some("99999999999999999+000")
        );
    }

    #[test]
    fn missing_code_is_an_error() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"rg_troncon": 1, "pkd": "0+000", "pkf": "1+000"},
                "geometry": null
            }]
        });
        let raw = SegmentTable::from_geojson_value(&value, LoadOptions::default()).expect("raw");
        assert_eq!(
            prepare_regime_table(&raw),
            Err(RegimeError::MissingColumn {
                row: 0,
                column: "code_ligne"
            })
        );
    }
}
