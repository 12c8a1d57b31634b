//! Report layout and word wrapping.

use chrono::{FixedOffset, TimeZone};
use outreach_core::{LeadColumns, LeadRow, LeadTable, ReportWindow};
use outreach_report::{
    END_OF_REPORT, LeadSection, NO_LEADS_MESSAGE, REPORT_TITLE, ReportAssembler, wrap_words,
};
use std::num::{NonZeroU32, NonZeroUsize};

fn window() -> ReportWindow {
    let zone = FixedOffset::east_opt(330 * 60).unwrap();
    let now = zone.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
    ReportWindow::trailing(now, NonZeroU32::new(24).unwrap())
}

fn n(words: usize) -> NonZeroUsize {
    NonZeroUsize::new(words).unwrap()
}

#[test]
fn test_wrap_is_lossless_and_exact() {
    let text: String = (1..=37).map(|i| format!("w{} ", i)).collect();
    let wrapped = wrap_words(&text, n(15));
    let lines: Vec<&str> = wrapped.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].split_whitespace().count(), 15);
    assert_eq!(lines[1].split_whitespace().count(), 15);
    assert_eq!(lines[2].split_whitespace().count(), 7);
    let rejoined: Vec<&str> = wrapped.split_whitespace().collect();
    let original: Vec<&str> = text.split_whitespace().collect();
    assert_eq!(rejoined, original);
}

#[test]
fn test_wrap_empty_text() {
    assert_eq!(wrap_words("  \n ", n(15)), "");
}

#[test]
fn test_empty_report_has_only_no_leads_sentence() {
    let heavy = "=".repeat(117);
    let report = ReportAssembler::default().render("16102026", &window(), &[]);
    assert!(report.starts_with(&format!("{}\n{}\n{}\n", heavy, REPORT_TITLE, heavy)));
    assert!(report.contains("REPORT ID: 16102026\n"));
    assert!(report.contains("GENERATED ON: 2026-10-16 12:00:00 +05:30\n"));
    assert!(report.contains(
        "PERIOD: Last 24 Hours (From 2026-10-15 12:00:00 +05:30 to 2026-10-16 12:00:00 +05:30)\n"
    ));
    assert!(report.contains(&format!("{}\n\n{}\n", heavy, NO_LEADS_MESSAGE)));
    assert!(!report.contains("LEAD ID:"));
    assert!(report.ends_with(&format!("{}\n{}\n{}\n", heavy, END_OF_REPORT, heavy)));
}

#[test]
fn test_section_layout() {
    let table = LeadTable::from_values(vec![
        vec!["lead_id".into(), "first_name".into(), "last_name".into(), "email".into()],
        vec!["7".into(), "Ada".into(), "Lovelace".into(), "ada@example.com".into()],
    ]);
    let zone = FixedOffset::east_opt(0).unwrap();
    let lead = LeadRow::from_row(&table.rows().next().unwrap(), &LeadColumns::default(), zone);
    let sections = vec![LeadSection::new(lead, "one two three four five")];

    let report = ReportAssembler::new(n(2)).render("16102026", &window(), &sections);
    let expected = format!(
        "{light}\nLEAD ID: 7\nNAME: Ada Lovelace\nCOMPANY: N/A\nEMAIL: ada@example.com\nSTATUS: N/A\nBOUNCE_REASON_SUMMARY:\none two\nthree four\nfive\n{light}\n\n{heavy}\n{end}\n",
        light = "-".repeat(117),
        heavy = "=".repeat(117),
        end = END_OF_REPORT,
    );
    assert!(report.contains(&expected));
    assert!(!report.contains(NO_LEADS_MESSAGE));
}
