//! Campaign flows around the lead spreadsheet.
//!
//! - [`CampaignSender`] renders the day's [`EmailTemplate`] for every lead and
//!   hands the messages to a mail transport.
//! - [`verify_status`] counts bounced and delivered leads.
//! - [`CampaignScheduler`] runs send-then-verify cycles on a [`ScheduleType`].

mod schedule;
mod scheduler;
mod send;
mod template;
mod verify;

pub use schedule::{Schedule, ScheduleCheck, ScheduleType, parse_time_of_day};
pub use scheduler::{CampaignCycle, CampaignScheduler};
pub use send::{CampaignSender, SendSettings, SendSettingsBuilder, SendSummary};
pub use template::{DEFAULT_SUBJECT, DEFAULT_TEMPLATE_DIR, EmailTemplate};
pub use verify::{BounceDetail, VerificationSummary, verify_status};
