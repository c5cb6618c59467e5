use std::collections::BTreeMap;

use formats::SegmentTable;
use serde::{Deserialize, Serialize};

/// Column a [`LookupIndex`] groups rows by.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKey {
    /// The row identifier.
    #[default]
    RowId,
    Column(String),
}

impl LookupKey {
    pub fn column(name: impl Into<String>) -> Self {
        LookupKey::Column(name.into())
    }

    pub fn label(&self) -> &str {
        match self {
            LookupKey::RowId => "id",
            LookupKey::Column(name) => name,
        }
    }
}

/// Read access to a text key → segment rows mapping.
pub trait LookupSource {
    /// Rows sharing `key`; empty when the key is unknown.
    fn lookup(&self, key: &str) -> &[u32];
}

/// Immutable text key → segment rows mapping.
///
/// Rows inside a group keep their table order. Rows with a null or missing
/// key are not indexed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupIndex {
    key: LookupKey,
    groups: BTreeMap<String, Vec<u32>>,
}

impl LookupIndex {
    pub fn build(table: &SegmentTable, key: &LookupKey) -> Self {
        let mut groups: BTreeMap<String, Vec<u32>> = BTreeMap::new();
        for (index, row) in table.rows().iter().enumerate() {
            let value = match key {
                LookupKey::RowId => Some(row.id.clone()),
                LookupKey::Column(column) => row.property_text(column),
            };
            let Some(value) = value else {
                continue;
            };
            groups.entry(value).or_default().push(index as u32);
        }
        Self {
            key: key.clone(),
            groups,
        }
    }

    pub fn from_groups(key: LookupKey, groups: BTreeMap<String, Vec<u32>>) -> Self {
        Self { key, groups }
    }

    pub fn key(&self) -> &LookupKey {
        &self.key
    }

    pub fn groups(&self) -> &BTreeMap<String, Vec<u32>> {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.groups.contains_key(key)
    }
}

impl LookupSource for LookupIndex {
    fn lookup(&self, key: &str) -> &[u32] {
        self.groups.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl LookupSource for BTreeMap<String, Vec<u32>> {
    fn lookup(&self, key: &str) -> &[u32] {
        self.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::{LookupIndex, LookupKey, LookupSource};
    use formats::{SegmentRow, SegmentTable};
    use pretty_assertions::assert_eq;
    use serde_json::{Map, Value, json};

    fn row(id: &str, lig_rg: Value) -> SegmentRow {
        let mut props = Map::new();
        props.insert("lig_rg".to_string(), lig_rg);
        SegmentRow::new(id, props, None)
    }

    fn table() -> SegmentTable {
        SegmentTable::new(vec![
            row("10", json!("001-1")),
            row("11", json!("001-2")),
            row("12", json!("002-1")),
            row("13", Value::Null),
            row("14", json!("001-2")),
        ])
    }

    #[test]
    fn groups_rows_in_table_order() {
        let index = LookupIndex::build(&table(), &LookupKey::column("lig_rg"));
        assert_eq!(index.lookup("001-1"), &[0]);
        assert_eq!(index.lookup("001-2"), &[1, 4]);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn unknown_key_is_empty() {
        let index = LookupIndex::build(&table(), &LookupKey::column("lig_rg"));
        assert!(index.lookup("999-9").is_empty());
        assert!(!index.contains("999-9"));
    }

    #[test]
    fn lookup_is_exact() {
        let index = LookupIndex::build(&table(), &LookupKey::column("lig_rg"));
        assert!(index.lookup("001").is_empty());
        assert!(index.lookup(" 001-1").is_empty());
    }

    #[test]
    fn groups_by_row_id() {
        let index = LookupIndex::build(&table(), &LookupKey::RowId);
        assert_eq!(index.lookup("13"), &[3]);
        assert_eq!(index.key().label(), "id");
    }

    #[test]
    fn numeric_keys_use_their_text() {
        let t = SegmentTable::new(vec![row("0", json!(7)), row("1", json!(7))]);
        let index = LookupIndex::build(&t, &LookupKey::column("lig_rg"));
        assert_eq!(index.lookup("7"), &[0, 1]);
    }
}
