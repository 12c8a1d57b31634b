//! Spreadsheet cell values.

use serde::{Deserialize, Serialize};

/// A single cell of a lead table.
///
/// Blank spreadsheet cells and cells of columns a row does not have are both
/// [`CellValue::Null`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Builds a cell from raw spreadsheet text. Empty text is a blank cell.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.is_empty() {
            CellValue::Null
        } else {
            CellValue::Text(raw)
        }
    }

    /// True for blank cells and for the not-a-number sentinel.
    ///
    /// # Examples
    ///
    /// ```
    /// use outreach_core::CellValue;
    ///
    /// assert!(CellValue::Null.is_missing());
    /// assert!(CellValue::Number(f64::NAN).is_missing());
    /// assert!(!CellValue::Text(String::new()).is_missing());
    /// ```
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    /// Text rendering of a present cell, `None` for missing ones.
    pub fn as_text(&self) -> Option<String> {
        if self.is_missing() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => write!(f, ""),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) if n.is_nan() => write!(f, "NaN"),
            // Whole numbers come back from spreadsheets as floats; print them as integers.
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}
