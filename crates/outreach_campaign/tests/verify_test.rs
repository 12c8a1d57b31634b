//! Delivery verification counts.

use outreach_campaign::verify_status;
use outreach_core::{CellValue, LeadColumns, LeadTable};

#[test]
fn test_counts_use_bounce_rule() {
    let table = LeadTable::new(
        vec!["email".into(), "bounce_reason".into()],
        vec![
            vec!["a@example.com".into(), "Mailbox full".into()],
            vec!["b@example.com".into(), CellValue::Null],
            vec!["c@example.com".into(), "none".into()],
            vec![CellValue::Null, " 550 User unknown ".into()],
        ],
    );
    let summary = verify_status(&table, &LeadColumns::default());
    assert_eq!(*summary.total_leads(), 4);
    assert_eq!(*summary.bounced(), 2);
    assert_eq!(*summary.delivered(), 2);

    let details = summary.bounce_details();
    assert_eq!(details[0].email().as_deref(), Some("a@example.com"));
    assert_eq!(*details[1].email(), None);
    assert_eq!(details[1].bounce_reason(), "550 User unknown");
    assert!(summary.to_string().contains("N/A: 550 User unknown"));
}

#[test]
fn test_missing_column_counts_everything_delivered() {
    let table = LeadTable::new(
        vec!["email".into()],
        vec![vec!["a@example.com".into()], vec!["b@example.com".into()]],
    );
    let summary = verify_status(&table, &LeadColumns::default());
    assert_eq!(*summary.delivered(), 2);
    assert_eq!(*summary.bounced(), 0);
    assert!(summary.bounce_details().is_empty());
}
