//! Google Sheets snapshot download.

use crate::GoogleConfig;
use crate::http::{GoogleHttp, endpoint};
use outreach_core::LeadTable;
use outreach_error::{DataError, DataErrorKind, OutreachResult};
use serde::Deserialize;
use tracing::{info, instrument};

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Reads lead tables from a Google spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: GoogleHttp,
    base_url: String,
}

impl SheetsClient {
    /// Creates a Sheets client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &GoogleConfig) -> OutreachResult<Self> {
        Ok(Self {
            http: GoogleHttp::new(config)?,
            base_url: config.sheets_base_url().clone(),
        })
    }

    /// Downloads the first tab of a spreadsheet as a lead table.
    ///
    /// # Errors
    ///
    /// Returns an HTTP error when the API call fails and a data error when the
    /// spreadsheet has no tabs.
    #[instrument(skip(self))]
    pub async fn download(&self, spreadsheet_id: &str) -> OutreachResult<LeadTable> {
        let meta_url = endpoint(&self.base_url, &["spreadsheets", spreadsheet_id])?;
        let meta: SpreadsheetMeta = self
            .http
            .get_json(meta_url, &[("fields", "sheets.properties.title")])
            .await?;

        let title = meta
            .sheets
            .into_iter()
            .next()
            .map(|sheet| sheet.properties.title)
            .ok_or_else(|| DataError::new(DataErrorKind::NoSheets(spreadsheet_id.to_string())))?;

        let values_url = endpoint(
            &self.base_url,
            &["spreadsheets", spreadsheet_id, "values", &title],
        )?;
        let range: ValueRange = self.http.get_json(values_url, &[]).await?;
        let table = LeadTable::from_values(cells_to_strings(range.values));

        info!(
            sheet = %title,
            rows = table.len(),
            columns = table.columns().len(),
            "Downloaded spreadsheet tab"
        );
        Ok(table)
    }
}

fn cells_to_strings(values: Vec<Vec<serde_json::Value>>) -> Vec<Vec<String>> {
    values
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| match cell {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use outreach_core::CellValue;

    #[test]
    fn test_value_range_to_table() {
        let range: ValueRange = serde_json::from_str(
            r#"{
                "range": "Leads!A1:D3",
                "majorDimension": "ROWS",
                "values": [
                    ["lead_id", "email", "bounce_reason", "verified_at"],
                    ["L1", "a@example.com", "Mailbox full", "2026-10-16 08:00:00"],
                    [7, "b@example.com"]
                ]
            }"#,
        )
        .unwrap();
        let table = LeadTable::from_values(cells_to_strings(range.values));
        assert_eq!(table.len(), 2);
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].text("bounce_reason").as_deref(), Some("Mailbox full"));
        assert_eq!(rows[1].text("lead_id").as_deref(), Some("7"));
        assert_eq!(rows[1].value("bounce_reason"), &CellValue::Null);
    }

    #[test]
    fn test_empty_range_has_no_values() {
        let range: ValueRange = serde_json::from_str(r#"{"range": "Leads!A1:Z1"}"#).unwrap();
        assert!(LeadTable::from_values(cells_to_strings(range.values)).is_empty());
    }
}
