//! Scheduled send-then-verify cycles.

use crate::schedule::{Schedule, ScheduleType};
use crate::send::SendSummary;
use crate::verify::VerificationSummary;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use outreach_core::report_id_for;
use outreach_error::OutreachResult;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// The work done by one campaign cycle.
#[async_trait]
pub trait CampaignCycle: Send + Sync {
    /// Sends the campaign for `report_id`.
    async fn send(&self, report_id: &str) -> OutreachResult<SendSummary>;

    /// Checks delivery status for `report_id`.
    async fn verify(&self, report_id: &str) -> OutreachResult<VerificationSummary>;
}

/// Runs campaign cycles on a schedule, one at a time.
pub struct CampaignScheduler {
    schedule: ScheduleType,
    zone: FixedOffset,
    verification_delay: Duration,
    cycle: Arc<dyn CampaignCycle>,
}

impl std::fmt::Debug for CampaignScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampaignScheduler")
            .field("schedule", &self.schedule)
            .field("zone", &self.zone)
            .field("verification_delay", &self.verification_delay)
            .finish_non_exhaustive()
    }
}

impl CampaignScheduler {
    /// Creates a scheduler.
    ///
    /// `verification_delay` is how long a cycle waits after sending before it
    /// verifies.
    pub fn new(
        schedule: ScheduleType,
        zone: FixedOffset,
        verification_delay: Duration,
        cycle: Arc<dyn CampaignCycle>,
    ) -> Self {
        Self {
            schedule,
            zone,
            verification_delay,
            cycle,
        }
    }

    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.zone)
    }

    /// Runs one cycle for today's report identifier.
    ///
    /// Failures are logged; a failed send skips verification.
    #[instrument(skip(self, shutdown))]
    async fn run_cycle<F>(&self, report_id: &str, shutdown: &mut std::pin::Pin<&mut F>) -> bool
    where
        F: Future<Output = ()>,
    {
        match self.cycle.send(report_id).await {
            Ok(summary) => info!(%summary, "Campaign sent"),
            Err(e) => {
                error!(error = %e, "Campaign send failed");
                return false;
            }
        }

        if !self.verification_delay.is_zero() {
            info!(delay_secs = self.verification_delay.as_secs(), "Waiting before verification");
            tokio::select! {
                _ = tokio::time::sleep(self.verification_delay) => {}
                _ = shutdown.as_mut() => {
                    info!("Shutdown during verification wait");
                    return true;
                }
            }
        }

        match self.cycle.verify(report_id).await {
            Ok(summary) => info!(
                delivered = summary.delivered(),
                bounced = summary.bounced(),
                "Campaign verified"
            ),
            Err(e) => error!(error = %e, "Campaign verification failed"),
        }
        false
    }

    /// Runs cycles until `shutdown` completes.
    ///
    /// Cycles never overlap: the next execution time is computed after the
    /// previous cycle finishes.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the schedule is invalid.
    #[instrument(skip(self, shutdown), fields(schedule = ?self.schedule))]
    pub async fn run_until<F>(&self, shutdown: F) -> OutreachResult<()>
    where
        F: Future<Output = ()>,
    {
        self.schedule.validate()?;
        tokio::pin!(shutdown);

        // Cron and daily slots count from startup; intervals run at once.
        let mut last_run = match self.schedule {
            ScheduleType::Interval { .. } => None,
            _ => Some(self.now()),
        };
        loop {
            let now = self.now();
            let check = self.schedule.check(last_run, now);
            if check.should_run {
                last_run = Some(now);
                let report_id = report_id_for(&now);
                info!(report_id = %report_id, "Starting campaign cycle");
                if self.run_cycle(&report_id, &mut shutdown).await {
                    break;
                }
                continue;
            }

            let Some(next) = check.next_run else {
                warn!("Schedule has no further executions");
                break;
            };
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            info!(next_run = %next, wait_secs = wait.as_secs(), "Waiting for next cycle");
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = shutdown.as_mut() => {
                    info!("Scheduler shutting down");
                    break;
                }
            }
        }
        Ok(())
    }
}
