//! Window and bounce-reason filters.

use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use outreach_core::{CellValue, LeadColumns, LeadTable, ReportWindow};
use outreach_report::{filter_bounced, filter_window, qualifying_leads};
use std::num::NonZeroU32;

fn ist() -> FixedOffset {
    FixedOffset::east_opt(330 * 60).unwrap()
}

fn window_at(now: DateTime<FixedOffset>) -> ReportWindow {
    ReportWindow::trailing(now, NonZeroU32::new(24).unwrap())
}

fn window() -> ReportWindow {
    window_at(ist().with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap())
}

fn stamp(hours_ago: i64) -> String {
    (*window().generated_at() - Duration::hours(hours_ago))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn table(rows: Vec<Vec<CellValue>>) -> LeadTable {
    LeadTable::new(
        vec![
            "lead_id".into(),
            "sent_at".into(),
            "verified_at".into(),
            "bounce_reason".into(),
        ],
        rows,
    )
}

fn ids(table: &LeadTable) -> Vec<String> {
    table.rows().filter_map(|r| r.text("lead_id")).collect()
}

#[test]
fn test_window_excludes_old_and_unverified() {
    let t = table(vec![
        vec!["A".into(), stamp(2).into(), stamp(1).into(), "Mailbox full".into()],
        vec!["B".into(), stamp(30).into(), stamp(1).into(), "Mailbox full".into()],
        vec!["C".into(), stamp(2).into(), CellValue::Null, "Mailbox full".into()],
        vec!["D".into(), "not a date".into(), stamp(1).into(), "Mailbox full".into()],
    ]);
    let kept = filter_window(&t, &LeadColumns::default(), &window());
    assert_eq!(ids(&kept), vec!["A"]);
}

#[test]
fn test_window_without_verified_column_checks_send_time_only() {
    let t = LeadTable::new(
        vec!["lead_id".into(), "sent_at".into()],
        vec![
            vec!["A".into(), stamp(3).into()],
            vec!["B".into(), stamp(48).into()],
        ],
    );
    let kept = filter_window(&t, &LeadColumns::default(), &window());
    assert_eq!(ids(&kept), vec!["A"]);
}

#[test]
fn test_us_formatted_timestamps_qualify() {
    // 2026-10-16 08:00 is four hours before the window end
    let t = table(vec![vec![
        "A".into(),
        "10/16/2026 8:00:00".into(),
        "10/16/2026 9:00:00".into(),
        "Mailbox full".into(),
    ]]);
    let kept = qualifying_leads(&t, &LeadColumns::default(), &window());
    assert_eq!(ids(&kept), vec!["A"]);
}

#[test]
fn test_ambiguous_slash_dates_read_month_first() {
    let window = window_at(ist().with_ymd_and_hms(2026, 4, 3, 12, 0, 0).unwrap());
    let t = table(vec![
        // April 3rd, inside the window
        vec![
            "A".into(),
            "04/03/2026 08:00:00".into(),
            "04/03/2026 09:00:00".into(),
            "Mailbox full".into(),
        ],
        // March 4th, a month earlier
        vec![
            "B".into(),
            "03/04/2026 08:00:00".into(),
            "03/04/2026 09:00:00".into(),
            "Mailbox full".into(),
        ],
    ]);
    let kept = qualifying_leads(&t, &LeadColumns::default(), &window);
    assert_eq!(ids(&kept), vec!["A"]);
}

#[test]
fn test_sentinel_reasons_are_dropped() {
    let reasons: Vec<CellValue> = vec![
        CellValue::Null,
        CellValue::Number(f64::NAN),
        "".into(),
        "  ".into(),
        "none".into(),
        "None".into(),
        "NULL".into(),
        "550 5.1.1 User unknown".into(),
    ];
    let t = table(
        reasons
            .into_iter()
            .map(|r| vec!["x".into(), stamp(1).into(), stamp(1).into(), r])
            .collect(),
    );
    assert_eq!(filter_bounced(&t, &LeadColumns::default()).len(), 1);
}

#[test]
fn test_two_row_scenario_keeps_recent_bounce_only() {
    let t = table(vec![
        vec!["A".into(), stamp(2).into(), stamp(1).into(), "Mailbox full".into()],
        vec!["B".into(), stamp(30).into(), stamp(1).into(), "Invalid address".into()],
    ]);
    let kept = qualifying_leads(&t, &LeadColumns::default(), &window());
    assert_eq!(ids(&kept), vec!["A"]);
}

#[test]
fn test_missing_bounce_column_qualifies_nothing() {
    let t = LeadTable::new(
        vec!["lead_id".into(), "sent_at".into(), "verified_at".into()],
        vec![vec!["A".into(), stamp(2).into(), stamp(1).into()]],
    );
    let kept = qualifying_leads(&t, &LeadColumns::default(), &window());
    assert!(kept.is_empty());
    assert_eq!(kept.columns(), t.columns());
}
