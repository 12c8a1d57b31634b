//! The commands behind the CLI, wired to real services.

use crate::OutreachConfig;
use async_trait::async_trait;
use chrono::Utc;
use outreach_campaign::{
    CampaignCycle, CampaignScheduler, CampaignSender, SendSummary, VerificationSummary,
    verify_status,
};
use outreach_core::{LeadTable, report_id_for};
use outreach_error::{ConfigError, OutreachError, OutreachResult};
use outreach_google::{GmailClient, SheetsClient};
use outreach_models::{LOCAL_PROVIDER, OpenAICompatibleClient};
use outreach_report::{
    DirectoryReportStore, GeneratedReport, ReportGenerator, SnapshotLoader, validate_report_id,
};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

/// Download, send, verify, report and schedule.
///
/// The report generator is built once so its per-identifier guard covers
/// every report started through the same workflow.
pub struct Workflow {
    config: OutreachConfig,
    snapshots: SnapshotLoader,
    sheets: SheetsClient,
    gmail: GmailClient,
    reports: Option<ReportGenerator>,
}

impl std::fmt::Debug for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workflow")
            .field("snapshots", &self.snapshots)
            .field("reports", &self.reports)
            .finish_non_exhaustive()
    }
}

impl Workflow {
    /// Builds the service clients.
    ///
    /// The report generator is only built when a model is configured.
    ///
    /// # Errors
    ///
    /// Returns an error when an HTTP client cannot be constructed.
    pub fn new(config: OutreachConfig) -> OutreachResult<Self> {
        let google = config.google_config();
        let snapshots = SnapshotLoader::new(
            config.leads().snapshot_dir().clone(),
            config.leads().snapshot_prefix().clone(),
        );
        let sheets = SheetsClient::new(&google)?;
        let gmail =
            GmailClient::new(&google)?.with_max_excerpt_chars(*config.report().max_excerpt_chars());

        let reports = if config.require_model().is_ok() {
            let client = OpenAICompatibleClient::new(config.server_config()?, LOCAL_PROVIDER)?;
            let store = DirectoryReportStore::new(config.report().output_dir().clone());
            let generator = ReportGenerator::new(
                Arc::new(snapshots.clone()),
                Arc::new(client),
                Arc::new(store),
                config.report_settings(),
            )
            .with_excerpt_fetcher(Arc::new(gmail.clone()));
            Some(generator)
        } else {
            None
        };

        Ok(Self {
            config,
            snapshots,
            sheets,
            gmail,
            reports,
        })
    }

    /// Loaded configuration.
    pub fn config(&self) -> &OutreachConfig {
        &self.config
    }

    /// Today's report identifier in the reference timezone.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid offset.
    pub fn today(&self) -> OutreachResult<String> {
        let zone = self.config.zone()?;
        Ok(report_id_for(&Utc::now().with_timezone(&zone)))
    }

    /// The given identifier, or today's.
    ///
    /// # Errors
    ///
    /// Returns a report error when the given identifier is not a plain file
    /// stem, otherwise see [`Workflow::today`].
    pub fn report_id_or_today(&self, date: Option<&str>) -> OutreachResult<String> {
        match date {
            Some(date) => {
                validate_report_id(date)?;
                Ok(date.to_string())
            }
            None => self.today(),
        }
    }

    async fn download_table(&self, report_id: &str) -> OutreachResult<(PathBuf, LeadTable)> {
        self.config.require_spreadsheet()?;
        let table = self
            .sheets
            .download(self.config.leads().spreadsheet_id())
            .await?;
        let path = self.snapshots.save_snapshot(report_id, &table).await?;
        Ok((path, table))
    }

    /// Snapshots the first tab of the lead spreadsheet for `report_id`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error without a spreadsheet id, and HTTP, data
    /// or storage errors from the download.
    #[instrument(skip(self))]
    pub async fn download(&self, report_id: &str) -> OutreachResult<PathBuf> {
        let (path, table) = self.download_table(report_id).await?;
        info!(path = %path.display(), rows = table.len(), "Snapshot saved");
        Ok(path)
    }

    /// Downloads the leads, then sends the day's template to each of them.
    ///
    /// # Errors
    ///
    /// Returns download errors. Per-recipient failures and a missing template
    /// are reported in the summary.
    #[instrument(skip(self))]
    pub async fn send(&self, report_id: &str) -> OutreachResult<SendSummary> {
        let (_, table) = self.download_table(report_id).await?;
        let sender = CampaignSender::new(Arc::new(self.gmail.clone()), self.config.send_settings());
        sender.send_to_leads(report_id, &table).await
    }

    /// Downloads the leads, then counts delivered and bounced messages.
    ///
    /// # Errors
    ///
    /// Returns download errors.
    #[instrument(skip(self))]
    pub async fn verify(&self, report_id: &str) -> OutreachResult<VerificationSummary> {
        let (_, table) = self.download_table(report_id).await?;
        let summary = verify_status(&table, &self.config.lead_columns());
        info!(
            delivered = summary.delivered(),
            bounced = summary.bounced(),
            "Delivery verified"
        );
        Ok(summary)
    }

    /// Generates the lead status report, downloading a fresh snapshot first
    /// unless `skip_download` is set.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no model is configured, plus every
    /// error of [`ReportGenerator::generate`].
    #[instrument(skip(self))]
    pub async fn report(
        &self,
        report_id: &str,
        skip_download: bool,
    ) -> OutreachResult<GeneratedReport> {
        let reports = self.reports.as_ref().ok_or_else(model_missing)?;
        if !skip_download {
            self.download(report_id).await?;
        }
        reports.generate(report_id).await
    }

    /// Runs campaign cycles on the configured schedule until `shutdown`
    /// resolves. Returns immediately when scheduling is disabled.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid schedule.
    pub async fn schedule<F>(self: Arc<Self>, shutdown: F) -> OutreachResult<()>
    where
        F: Future<Output = ()>,
    {
        if !*self.config.email().schedule_enabled() {
            info!("Scheduling is disabled (email.schedule_enabled = false)");
            return Ok(());
        }
        let scheduler = CampaignScheduler::new(
            self.config.schedule()?,
            self.config.zone()?,
            self.config.verification_delay(),
            self.clone(),
        );
        scheduler.run_until(shutdown).await
    }
}

fn model_missing() -> OutreachError {
    ConfigError::new("model.model is not set (OUTREACH__MODEL__MODEL)").into()
}

#[async_trait]
impl CampaignCycle for Workflow {
    async fn send(&self, report_id: &str) -> OutreachResult<SendSummary> {
        Workflow::send(self, report_id).await
    }

    async fn verify(&self, report_id: &str) -> OutreachResult<VerificationSummary> {
        Workflow::verify(self, report_id).await
    }
}
