//! Core data types for the outreach campaign workflow.
//!
//! Lead tables and typed lead rows, report windows, timestamp parsing, and the
//! request types sent to text-generation backends.

mod bounce;
mod cell;
mod lead;
mod message;
mod request;
mod role;
mod table;
mod timestamp;
mod window;

pub use bounce::is_nonempty_bounce_reason;
pub use cell::CellValue;
pub use lead::{
    COL_BOUNCE_CODE, COL_COMPANY, COL_FIRST_NAME, COL_LAST_NAME, COL_LEAD_ID, COL_STATUS,
    LeadColumns, LeadColumnsBuilder, LeadRow, or_na,
};
pub use message::{Message, MessageBuilder};
pub use request::{GenerateRequest, GenerateRequestBuilder};
pub use role::Role;
pub use table::{LeadTable, Row};
pub use timestamp::parse_timestamp;
pub use window::{
    DEFAULT_WINDOW_HOURS, ReportWindow, format_timestamp, is_valid_report_id, report_id_for,
};
