//! Email outreach campaigns with model-written lead status reports.
//!
//! This crate ties the workspace together: layered configuration, tracing
//! setup, the [`Workflow`] behind each command, and the `outreach` binary.
//!
//! # Example
//!
//! ```no_run
//! use outreach::{OutreachConfig, Workflow};
//!
//! # async fn run() -> outreach::OutreachResult<()> {
//! let workflow = Workflow::new(OutreachConfig::load(None)?)?;
//! let report = workflow.report(&workflow.today()?, false).await?;
//! println!("{}", report.path().display());
//! # Ok(())
//! # }
//! ```

mod cli;
mod config;
mod observability;
mod workflow;

pub use cli::{Cli, Commands};
pub use config::{
    CONFIG_FILE_NAME, ENV_PREFIX, EmailSection, GoogleSection, LeadsSection, ModelSection,
    OutreachConfig, ReportSection,
};
pub use observability::{LogFormat, init_tracing};
pub use workflow::Workflow;

pub use outreach_campaign::{
    CampaignCycle, CampaignScheduler, CampaignSender, EmailTemplate, ScheduleType, SendSummary,
    VerificationSummary, verify_status,
};
pub use outreach_core::{LeadColumns, LeadRow, LeadTable, ReportWindow, report_id_for};
pub use outreach_error::{OutreachError, OutreachErrorKind, OutreachResult};
pub use outreach_google::{GmailClient, GoogleConfig, SheetsClient};
pub use outreach_interface::{
    ExcerptFetcher, LeadTableLoader, MailTransport, ReportStore, TextGenerator,
};
pub use outreach_models::{OpenAICompatibleClient, ServerConfig};
pub use outreach_report::{
    DirectoryReportStore, GeneratedReport, ReportGenerator, ReportSettings, SnapshotLoader,
};
