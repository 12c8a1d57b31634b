//! Fixed-format report rendering.

use derive_getters::Getters;
use outreach_core::{LeadRow, ReportWindow, format_timestamp, or_na};
use std::fmt;
use std::num::NonZeroUsize;

/// Width of the `=` and `-` separator lines.
pub const SEPARATOR_WIDTH: usize = 117;
/// Default words per summary line.
pub const DEFAULT_WORDS_PER_LINE: usize = 15;
/// Report title line.
pub const REPORT_TITLE: &str = "OFFICIAL EMAIL LEADS STATUS REPORT";
/// Sentence printed when no lead qualifies.
pub const NO_LEADS_MESSAGE: &str =
    "No verified leads in the last 24 hours with a non-empty bounce_reason.";
/// Footer line.
pub const END_OF_REPORT: &str = "END OF REPORT";

/// One qualifying lead and its summary.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct LeadSection {
    lead: LeadRow,
    summary: String,
}

impl LeadSection {
    /// Pairs a lead with its summary text.
    pub fn new(lead: LeadRow, summary: impl Into<String>) -> Self {
        Self {
            lead,
            summary: summary.into(),
        }
    }
}

/// Splits `text` on whitespace and rejoins it `words_per_line` words per line.
///
/// Word order is kept and no word is split; every line but the last holds
/// exactly `words_per_line` words.
///
/// # Examples
///
/// ```
/// use outreach_report::wrap_words;
/// use std::num::NonZeroUsize;
///
/// let n = NonZeroUsize::new(2).unwrap();
/// assert_eq!(wrap_words("a b  c\nd e", n), "a b\nc d\ne");
/// ```
pub fn wrap_words(text: &str, words_per_line: NonZeroUsize) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .chunks(words_per_line.get())
        .map(|line| line.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders reports in the fixed official layout.
#[derive(Debug, Clone, Copy)]
pub struct ReportAssembler {
    words_per_line: NonZeroUsize,
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self {
            words_per_line: NonZeroUsize::new(DEFAULT_WORDS_PER_LINE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl ReportAssembler {
    /// Creates an assembler wrapping summaries at `words_per_line` words.
    pub fn new(words_per_line: NonZeroUsize) -> Self {
        Self { words_per_line }
    }

    /// Renders the full report text.
    pub fn render(&self, report_id: &str, window: &ReportWindow, sections: &[LeadSection]) -> String {
        ReportLayout {
            words_per_line: self.words_per_line,
            report_id,
            window,
            sections,
        }
        .to_string()
    }
}

/// One report laid out line by line.
struct ReportLayout<'a> {
    words_per_line: NonZeroUsize,
    report_id: &'a str,
    window: &'a ReportWindow,
    sections: &'a [LeadSection],
}

impl ReportLayout<'_> {
    fn write_header(&self, f: &mut fmt::Formatter<'_>, heavy: &str) -> fmt::Result {
        let window = self.window;
        let hours = (*window.window_end() - *window.window_start()).num_hours();
        writeln!(f, "{}", heavy)?;
        writeln!(f, "{}", REPORT_TITLE)?;
        writeln!(f, "{}", heavy)?;
        writeln!(f, "REPORT ID: {}", self.report_id)?;
        writeln!(f, "GENERATED ON: {}", format_timestamp(window.generated_at()))?;
        writeln!(
            f,
            "PERIOD: Last {} Hours (From {} to {})",
            hours,
            format_timestamp(window.window_start()),
            format_timestamp(window.window_end())
        )?;
        writeln!(f, "{}", heavy)?;
        writeln!(f)
    }

    fn write_section(&self, f: &mut fmt::Formatter<'_>, section: &LeadSection, light: &str) -> fmt::Result {
        let lead = section.lead();
        writeln!(f, "{}", light)?;
        writeln!(f, "LEAD ID: {}", or_na(lead.lead_id()))?;
        writeln!(f, "NAME: {}", or_na(&lead.full_name()))?;
        writeln!(f, "COMPANY: {}", or_na(lead.company()))?;
        writeln!(f, "EMAIL: {}", or_na(lead.email()))?;
        writeln!(f, "STATUS: {}", or_na(lead.status()))?;
        writeln!(f, "BOUNCE_REASON_SUMMARY:")?;
        writeln!(f, "{}", wrap_words(section.summary(), self.words_per_line))?;
        writeln!(f, "{}", light)?;
        writeln!(f)
    }
}

impl fmt::Display for ReportLayout<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heavy = "=".repeat(SEPARATOR_WIDTH);
        let light = "-".repeat(SEPARATOR_WIDTH);

        self.write_header(f, &heavy)?;
        if self.sections.is_empty() {
            writeln!(f, "{}", NO_LEADS_MESSAGE)?;
        }
        for section in self.sections {
            self.write_section(f, section, &light)?;
        }
        writeln!(f, "{}", heavy)?;
        writeln!(f, "{}", END_OF_REPORT)?;
        writeln!(f, "{}", heavy)
    }
}

