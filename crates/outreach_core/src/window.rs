//! Trailing report windows.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use derive_getters::Getters;
use std::num::NonZeroU32;

/// Default length of the trailing window.
pub const DEFAULT_WINDOW_HOURS: u32 = 24;

/// Trailing time window a report covers.
///
/// `window_end` is the generation time and `window_start` lies a whole,
/// non-zero number of hours before it, so `window_start < window_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct ReportWindow {
    generated_at: DateTime<FixedOffset>,
    window_start: DateTime<FixedOffset>,
    window_end: DateTime<FixedOffset>,
}

impl ReportWindow {
    /// Window of `hours` ending at `generated_at`.
    pub fn trailing(generated_at: DateTime<FixedOffset>, hours: NonZeroU32) -> Self {
        let window_start = generated_at - Duration::hours(i64::from(hours.get()));
        Self {
            generated_at,
            window_start,
            window_end: generated_at,
        }
    }

    /// Window of `hours` ending now, read in `zone`.
    pub fn now_in(zone: FixedOffset, hours: NonZeroU32) -> Self {
        Self::trailing(Utc::now().with_timezone(&zone), hours)
    }

    /// Whether a send timestamp falls inside the window.
    ///
    /// Only the lower bound is checked: rows stamped after the generation time
    /// still count as recent.
    pub fn admits(&self, sent_at: &DateTime<FixedOffset>) -> bool {
        *sent_at > self.window_start
    }
}

/// Renders a timestamp the way reports print them.
pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S %:z").to_string()
}

/// Report identifier for a date: `DDMMYYYY`.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use outreach_core::report_id_for;
///
/// let zone = FixedOffset::east_opt(0).unwrap();
/// let ts = zone.with_ymd_and_hms(2026, 10, 6, 12, 0, 0).unwrap();
/// assert_eq!(report_id_for(&ts), "06102026");
/// ```
pub fn report_id_for(ts: &DateTime<FixedOffset>) -> String {
    ts.format("%d%m%Y").to_string()
}

/// Whether `report_id` is usable in file names: non-empty ASCII letters,
/// digits, `-` and `_`.
///
/// ```
/// use outreach_core::is_valid_report_id;
///
/// assert!(is_valid_report_id("16102026"));
/// assert!(!is_valid_report_id("../16102026"));
/// assert!(!is_valid_report_id(""));
/// ```
pub fn is_valid_report_id(report_id: &str) -> bool {
    !report_id.is_empty()
        && report_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
