//! Best-effort timestamp parsing for spreadsheet cells.

use crate::CellValue;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

const ZONED_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parses a cell into a timestamp in `zone`.
///
/// Text with an explicit offset is converted into `zone`; text without one is
/// read as local time in `zone`. Slash dates are month-first, the way
/// en_US spreadsheets format them. Anything unparseable, including non-text
/// cells, yields `None` instead of an error.
///
/// # Examples
///
/// ```
/// use chrono::FixedOffset;
/// use outreach_core::{CellValue, parse_timestamp};
///
/// let ist = FixedOffset::east_opt(330 * 60).unwrap();
/// let ts = parse_timestamp(&CellValue::from("2026-10-16 09:30:00"), ist).unwrap();
/// assert_eq!(ts.to_rfc3339(), "2026-10-16T09:30:00+05:30");
/// assert!(parse_timestamp(&CellValue::from("yesterday-ish"), ist).is_none());
/// ```
pub fn parse_timestamp(cell: &CellValue, zone: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let CellValue::Text(raw) = cell else {
        return None;
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&zone));
    }
    for format in ZONED_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(raw, format) {
            return Some(ts.with_timezone(&zone));
        }
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    zone.from_local_datetime(&naive).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(330 * 60).unwrap()
    }

    #[test]
    fn test_offset_text_is_converted_into_zone() {
        let ts = parse_timestamp(&CellValue::from("2026-10-16T04:00:00Z"), ist()).unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-10-16T09:30:00+05:30");
    }

    #[test]
    fn test_date_only_is_midnight() {
        let ts = parse_timestamp(&CellValue::from("10/16/2026"), ist()).unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-10-16T00:00:00+05:30");
    }

    #[test]
    fn test_slash_dates_are_month_first() {
        let ts = parse_timestamp(&CellValue::from("10/16/2026 8:00:00"), ist()).unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-10-16T08:00:00+05:30");

        let ts = parse_timestamp(&CellValue::from("03/04/2026 08:00:00"), ist()).unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-03-04T08:00:00+05:30");

        assert!(parse_timestamp(&CellValue::from("16/10/2026 08:00"), ist()).is_none());
    }

    #[test]
    fn test_non_text_cells_do_not_parse() {
        assert!(parse_timestamp(&CellValue::Null, ist()).is_none());
        assert!(parse_timestamp(&CellValue::Number(45000.0), ist()).is_none());
        assert!(parse_timestamp(&CellValue::from("   "), ist()).is_none());
    }
}
