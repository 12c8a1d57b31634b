//! Ordered lead tables.

use crate::CellValue;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

static NULL_CELL: CellValue = CellValue::Null;

/// Tabular lead dataset: ordered column names and rows in source order.
///
/// Every row has exactly one cell per column. Rows shorter than the header are
/// padded with [`CellValue::Null`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct LeadTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

#[derive(Deserialize)]
struct RawTable {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<CellValue>>,
}

impl TryFrom<RawTable> for LeadTable {
    type Error = String;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        let mut seen = HashSet::new();
        for column in &raw.columns {
            if !seen.insert(column.as_str()) {
                return Err(format!("duplicate column '{}'", column));
            }
        }
        Ok(LeadTable::new(raw.columns, raw.rows))
    }
}

impl LeadTable {
    /// Creates a table, normalizing every row to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Builds a table from spreadsheet values where the first row is the header.
    ///
    /// Blank header cells are named after their position (`column_3`).
    ///
    /// # Examples
    ///
    /// ```
    /// use outreach_core::{CellValue, LeadTable};
    ///
    /// let table = LeadTable::from_values(vec![
    ///     vec!["lead_id".into(), "email".into(), "bounce_reason".into()],
    ///     vec!["1".into(), "a@example.com".into()],
    /// ]);
    /// assert_eq!(table.len(), 1);
    /// let row = table.rows().next().unwrap();
    /// assert_eq!(row.value("bounce_reason"), &CellValue::Null);
    /// ```
    pub fn from_values(values: Vec<Vec<String>>) -> Self {
        let mut values = values.into_iter();
        let Some(header) = values.next() else {
            return Self::default();
        };
        let columns = header
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let name = name.trim().to_string();
                if name.is_empty() {
                    format!("column_{}", i + 1)
                } else {
                    name
                }
            })
            .collect();
        let rows = values
            .map(|row| row.into_iter().map(CellValue::from_raw).collect())
            .collect();
        Self::new(columns, rows)
    }

    /// Column names in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether the table carries a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in source order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().enumerate().map(move |(index, cells)| Row {
            table: self,
            index,
            cells,
        })
    }

    /// Keeps the rows matching `predicate`, preserving order and columns.
    pub fn filter<F>(&self, mut predicate: F) -> LeadTable
    where
        F: FnMut(&Row<'_>) -> bool,
    {
        let rows = self
            .rows()
            .filter(|row| predicate(row))
            .map(|row| row.cells.to_vec())
            .collect();
        LeadTable {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Same columns, no rows.
    pub fn empty_like(&self) -> LeadTable {
        LeadTable {
            columns: self.columns.clone(),
            rows: Vec::new(),
        }
    }

    /// Values of `column` that occur in more than one row.
    pub fn duplicate_values(&self, column: &str) -> Vec<String> {
        let Some(index) = self.column_index(column) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for row in &self.rows {
            if let Some(text) = row[index].as_text() {
                if !seen.insert(text.clone()) && !duplicates.contains(&text) {
                    duplicates.push(text);
                }
            }
        }
        duplicates
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a LeadTable,
    index: usize,
    cells: &'a [CellValue],
}

impl<'a> Row<'a> {
    /// Position of the row in its table.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell of `column`, `None` when the table has no such column.
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        self.table.column_index(column).map(|i| &self.cells[i])
    }

    /// Cell of `column`, blank when the table has no such column.
    pub fn value(&self, column: &str) -> &'a CellValue {
        self.get(column).unwrap_or(&NULL_CELL)
    }

    /// Text of `column`, `None` when missing or blank.
    pub fn text(&self, column: &str) -> Option<String> {
        self.value(column).as_text()
    }
}
