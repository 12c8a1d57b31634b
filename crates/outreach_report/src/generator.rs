//! Report pipeline orchestration.

use crate::assembler::{DEFAULT_WORDS_PER_LINE, LeadSection, ReportAssembler};
use crate::filter::qualifying_leads;
use crate::validate_report_id;
use crate::summarizer::{Summarizer, SummarizerConfig};
use chrono::{DateTime, FixedOffset, Utc};
use derive_getters::Getters;
use outreach_core::{COL_LEAD_ID, DEFAULT_WINDOW_HOURS, LeadColumns, LeadRow, ReportWindow};
use outreach_error::{ConfigError, OutreachResult, ReportError, ReportErrorKind};
use outreach_interface::{ExcerptFetcher, LeadTableLoader, ReportStore, TextGenerator};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::num::{NonZeroU32, NonZeroUsize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Default reference timezone offset in minutes east of UTC (IST).
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

/// Settings for one report pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct ReportSettings {
    /// Configurable column names
    columns: LeadColumns,
    /// Reference timezone, minutes east of UTC
    utc_offset_minutes: i32,
    /// Trailing window length in hours
    window_hours: u32,
    /// Words per summary line
    words_per_line: usize,
    /// Fetch message excerpts when the table references sent messages
    enable_excerpts: bool,
    /// Summary generation settings
    summarizer: SummarizerConfig,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            columns: LeadColumns::default(),
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            window_hours: DEFAULT_WINDOW_HOURS,
            words_per_line: DEFAULT_WORDS_PER_LINE,
            enable_excerpts: false,
            summarizer: SummarizerConfig::default(),
        }
    }
}

impl ReportSettings {
    /// Returns a builder for constructing ReportSettings.
    pub fn builder() -> ReportSettingsBuilder {
        ReportSettingsBuilder::default()
    }

    /// The reference timezone.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for offsets beyond ±24 hours.
    pub fn zone(&self) -> OutreachResult<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ConfigError::new(format!(
                    "Invalid UTC offset: {} minutes",
                    self.utc_offset_minutes
                ))
                .into()
            })
    }

    fn window_hours_nonzero(&self) -> OutreachResult<NonZeroU32> {
        NonZeroU32::new(self.window_hours)
            .ok_or_else(|| ConfigError::new("window_hours must be greater than zero").into())
    }

    fn words_per_line_nonzero(&self) -> OutreachResult<NonZeroUsize> {
        NonZeroUsize::new(self.words_per_line)
            .ok_or_else(|| ConfigError::new("words_per_line must be greater than zero").into())
    }

    /// Checks every setting that could fail a run later.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first invalid setting.
    pub fn validate(&self) -> OutreachResult<()> {
        self.zone()?;
        self.window_hours_nonzero()?;
        self.words_per_line_nonzero()?;
        Ok(())
    }
}

/// Outcome of a successful report run.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct GeneratedReport {
    report_id: String,
    path: PathBuf,
    lead_count: usize,
    window: ReportWindow,
}

/// Report identifiers with a run in progress.
#[derive(Debug, Default)]
struct InFlight(Mutex<HashSet<String>>);

impl InFlight {
    fn ids(&self) -> MutexGuard<'_, HashSet<String>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases a report identifier when the run ends, however it ends.
struct InFlightGuard {
    in_flight: Arc<InFlight>,
    report_id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.ids().remove(&self.report_id);
    }
}

/// Runs the report pipeline: load, filter, summarize each lead, assemble, store.
pub struct ReportGenerator {
    loader: Arc<dyn LeadTableLoader>,
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn ReportStore>,
    fetcher: Option<Arc<dyn ExcerptFetcher>>,
    settings: ReportSettings,
    in_flight: Arc<InFlight>,
}

impl std::fmt::Debug for ReportGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportGenerator")
            .field("model", &self.generator.model_name())
            .field("excerpts", &self.fetcher.is_some())
            .field("settings", &self.settings)
            .finish()
    }
}

impl ReportGenerator {
    /// Creates a generator from its collaborators.
    pub fn new(
        loader: Arc<dyn LeadTableLoader>,
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn ReportStore>,
        settings: ReportSettings,
    ) -> Self {
        Self {
            loader,
            generator,
            store,
            fetcher: None,
            settings,
            in_flight: Arc::new(InFlight::default()),
        }
    }

    /// Uses `fetcher` for message excerpts when excerpts are enabled.
    pub fn with_excerpt_fetcher(mut self, fetcher: Arc<dyn ExcerptFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Pipeline settings.
    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// Generates the report for `report_id` over the window ending now.
    ///
    /// # Errors
    ///
    /// See [`ReportGenerator::generate_at`].
    pub async fn generate(&self, report_id: &str) -> OutreachResult<GeneratedReport> {
        let now: DateTime<FixedOffset> = Utc::now().with_timezone(&self.settings.zone()?);
        self.generate_at(report_id, now).await
    }

    /// Generates the report for `report_id` over the window ending at `now`.
    ///
    /// Nothing is written unless every lead was summarized.
    ///
    /// # Errors
    ///
    /// - report error when the identifier is invalid or already being generated
    /// - configuration error when settings are invalid or the backend is unavailable
    /// - data error when no lead table exists for the identifier
    /// - backend error when a completion fails
    /// - storage error when the report cannot be written
    #[instrument(skip(self, now), fields(generated_at = %now))]
    pub async fn generate_at(
        &self,
        report_id: &str,
        now: DateTime<FixedOffset>,
    ) -> OutreachResult<GeneratedReport> {
        validate_report_id(report_id)?;
        self.settings.validate()?;
        let _guard = self.claim(report_id)?;

        self.generator.validate().await?;

        let table = self.loader.load(report_id).await?;
        let duplicates = table.duplicate_values(COL_LEAD_ID);
        if !duplicates.is_empty() {
            warn!(?duplicates, "Duplicate lead ids in report input");
        }

        let zone = self.settings.zone()?;
        let now = now.with_timezone(&zone);
        let window = ReportWindow::trailing(now, self.settings.window_hours_nonzero()?);
        let columns = &self.settings.columns;
        let qualifying = qualifying_leads(&table, columns, &window);
        info!(
            total = table.len(),
            qualifying = qualifying.len(),
            "Filtered leads"
        );

        let excerpts = match &self.fetcher {
            Some(fetcher) if self.settings.enable_excerpts && table.has_column(columns.gmail_msg_id()) => {
                Some(fetcher)
            }
            _ => None,
        };

        let summarizer = Summarizer::new(self.generator.clone(), self.settings.summarizer.clone());
        let mut sections = Vec::with_capacity(qualifying.len());
        for row in qualifying.rows() {
            let lead = LeadRow::from_row(&row, columns, zone);
            let excerpt = match excerpts {
                Some(fetcher) => {
                    let reference = lead.gmail_msg_id().clone().unwrap_or_default();
                    fetcher.fetch_excerpt(&reference).await.prompt_text()
                }
                None => String::new(),
            };
            let summary = summarizer.summarize(&lead, &excerpt).await?;
            debug!(lead_id = ?lead.lead_id(), "Lead summarized");
            sections.push(LeadSection::new(lead, summary));
        }

        let assembler = ReportAssembler::new(self.settings.words_per_line_nonzero()?);
        let contents = assembler.render(report_id, &window, &sections);
        let path = self.store.store(report_id, &contents).await?;

        info!(path = %path.display(), leads = sections.len(), "Report generated");
        Ok(GeneratedReport {
            report_id: report_id.to_string(),
            path,
            lead_count: sections.len(),
            window,
        })
    }

    fn claim(&self, report_id: &str) -> Result<InFlightGuard, ReportError> {
        if !self.in_flight.ids().insert(report_id.to_string()) {
            warn!(report_id, "Report already in progress");
            return Err(ReportError::new(ReportErrorKind::AlreadyRunning(
                report_id.to_string(),
            )));
        }
        Ok(InFlightGuard {
            in_flight: self.in_flight.clone(),
            report_id: report_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_validation() {
        assert!(ReportSettings::default().validate().is_ok());
        assert_eq!(
            ReportSettings::default().zone().unwrap(),
            FixedOffset::east_opt(330 * 60).unwrap()
        );

        let bad = ReportSettings::builder().words_per_line(0usize).build().unwrap();
        assert!(bad.validate().unwrap_err().kind().is_configuration());

        let bad = ReportSettings::builder().window_hours(0u32).build().unwrap();
        assert!(bad.validate().unwrap_err().kind().is_configuration());

        let bad = ReportSettings::builder()
            .utc_offset_minutes(25 * 60)
            .build()
            .unwrap();
        assert!(bad.validate().unwrap_err().kind().is_configuration());
    }
}
