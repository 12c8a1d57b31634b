//! Lead status report pipeline.
//!
//! Loads the lead table for a report identifier, keeps the leads verified
//! inside the trailing window that carry a bounce reason, asks a text
//! generator to explain each bounce, and writes the fixed-format report.
//!
//! ```text
//! LeadTableLoader -> filter_window -> filter_bounced -> Summarizer (per lead) -> ReportAssembler -> ReportStore
//! ```

mod assembler;
mod filter;
mod generator;
mod loader;
mod storage;
mod summarizer;

pub use assembler::{
    DEFAULT_WORDS_PER_LINE, END_OF_REPORT, LeadSection, NO_LEADS_MESSAGE, REPORT_TITLE,
    ReportAssembler, SEPARATOR_WIDTH, wrap_words,
};
pub use filter::{filter_bounced, filter_window, qualifying_leads};
pub use generator::{
    DEFAULT_UTC_OFFSET_MINUTES, GeneratedReport, ReportGenerator, ReportSettings,
    ReportSettingsBuilder,
};
pub use loader::{DEFAULT_SNAPSHOT_DIR, DEFAULT_SNAPSHOT_PREFIX, SnapshotLoader};
pub use storage::{DEFAULT_OUTPUT_DIR, DirectoryReportStore, validate_report_id};
pub use summarizer::{
    DEFAULT_MAX_TOKENS, DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE, Summarizer, SummarizerConfig,
    SummarizerConfigBuilder, build_prompt,
};
