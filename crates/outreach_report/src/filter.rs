//! Qualifying-lead filters.

use outreach_core::{LeadColumns, LeadTable, ReportWindow, is_nonempty_bounce_reason, parse_timestamp};
use tracing::debug;

/// Keeps rows sent inside the window whose verification time is populated.
///
/// Timestamps are read in the window's timezone; a cell that does not parse
/// disqualifies its row. When the table has no verification column, only the
/// send time is checked.
pub fn filter_window(table: &LeadTable, columns: &LeadColumns, window: &ReportWindow) -> LeadTable {
    let zone = *window.generated_at().offset();
    let check_verified = table.has_column(columns.verified_at());
    if !check_verified {
        debug!(column = %columns.verified_at(), "Verification column absent, skipping check");
    }

    table.filter(|row| {
        let sent_in_window = parse_timestamp(row.value(columns.sent_at()), zone)
            .is_some_and(|sent_at| window.admits(&sent_at));
        sent_in_window
            && (!check_verified || parse_timestamp(row.value(columns.verified_at()), zone).is_some())
    })
}

/// Keeps rows carrying a real bounce reason. Without the column nothing qualifies.
pub fn filter_bounced(table: &LeadTable, columns: &LeadColumns) -> LeadTable {
    if !table.has_column(columns.bounce_reason()) {
        debug!(column = %columns.bounce_reason(), "Bounce reason column absent");
        return table.empty_like();
    }
    table.filter(|row| is_nonempty_bounce_reason(row.value(columns.bounce_reason())))
}

/// Window filter followed by the bounce-reason filter.
pub fn qualifying_leads(table: &LeadTable, columns: &LeadColumns, window: &ReportWindow) -> LeadTable {
    filter_bounced(&filter_window(table, columns, window), columns)
}

