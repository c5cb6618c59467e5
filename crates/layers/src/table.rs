use std::rc::Rc;

use formats::{SegmentRow, SegmentTable, value_text};
use selection::{SelectionSet, ViewAdapter, ViewRole};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberFormat {
    #[serde(rename = "0.0")]
    OneDecimal,
}

impl NumberFormat {
    pub fn apply(self, value: f64) -> String {
        match self {
            NumberFormat::OneDecimal => format!("{value:.1}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<NumberFormat>,
}

impl TableColumn {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            title: None,
            width: None,
            format: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_format(mut self, format: NumberFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.field)
    }

    /// Cell text for `row`; empty for null or missing values.
    pub fn cell(&self, row: &SegmentRow) -> String {
        match (row.property(&self.field), self.format) {
            (Some(Value::Number(n)), Some(format)) => match n.as_f64() {
                Some(v) => format.apply(v),
                None => n.to_string(),
            },
            (Some(value), _) => value_text(value).unwrap_or_default(),
            (None, _) => String::new(),
        }
    }
}

/// One column per descriptive field, in first-seen order.
pub fn default_columns(table: &SegmentTable) -> Vec<TableColumn> {
    table.columns().into_iter().map(TableColumn::new).collect()
}

/// Hover tooltip pairs `(title, "@field")` for the line layer.
pub fn hover_fields(columns: &[TableColumn]) -> Vec<(String, String)> {
    columns
        .iter()
        .map(|c| (c.title().to_string(), format!("@{}", c.field)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub index: u32,
    pub id: String,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableSnapshot {
    pub headers: Vec<String>,
    /// Column widths in pixels, parallel to `headers`; `None` lets the page size it.
    pub widths: Vec<Option<u32>>,
    pub rows: Vec<TableRow>,
}

/// Data table adapter: shows the rows it is pushed, in table order.
#[derive(Debug, Clone)]
pub struct TableView {
    table: Rc<SegmentTable>,
    columns: Vec<TableColumn>,
    shown: SelectionSet,
}

impl TableView {
    /// `columns` defaults to every descriptive column.
    pub fn new(table: Rc<SegmentTable>, columns: Option<Vec<TableColumn>>) -> Self {
        let columns = columns.unwrap_or_else(|| default_columns(&table));
        Self {
            table,
            columns,
            shown: SelectionSet::new(),
        }
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    pub fn shown(&self) -> &SelectionSet {
        &self.shown
    }

    pub fn snapshot(&self) -> TableSnapshot {
        let headers = self.columns.iter().map(|c| c.title().to_string()).collect();
        let widths = self.columns.iter().map(|c| c.width).collect();
        let rows = self
            .shown
            .iter()
            .filter_map(|index| {
                let row = self.table.row(index)?;
                Some(TableRow {
                    index,
                    id: row.id.clone(),
                    cells: self.columns.iter().map(|c| c.cell(row)).collect(),
                })
            })
            .collect();
        TableSnapshot {
            headers,
            widths,
            rows,
        }
    }
}

impl ViewAdapter for TableView {
    fn role(&self) -> ViewRole {
        ViewRole::Table
    }

    fn render(&mut self, selected: &SelectionSet) {
        self.shown = selected.clone();
    }
}
