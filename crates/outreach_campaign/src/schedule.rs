//! Campaign schedules.
//!
//! A schedule decides from the last run and the current time whether a
//! campaign cycle is due and when the next one is. All times are read in the
//! campaign's reference timezone.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime};
use outreach_error::{ConfigError, OutreachResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Result of checking if a cycle should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleCheck {
    /// Whether the cycle should run now
    pub should_run: bool,
    /// When the cycle should run next (if applicable)
    pub next_run: Option<DateTime<FixedOffset>>,
}

impl ScheduleCheck {
    /// Create a new schedule check result.
    pub fn new(should_run: bool, next_run: Option<DateTime<FixedOffset>>) -> Self {
        Self {
            should_run,
            next_run,
        }
    }

    /// Cycle should not run yet, schedule for future time.
    pub fn wait_until(next_run: DateTime<FixedOffset>) -> Self {
        Self {
            should_run: false,
            next_run: Some(next_run),
        }
    }

    /// Cycle should run now and schedule for future time.
    pub fn run_and_schedule(next_run: DateTime<FixedOffset>) -> Self {
        Self {
            should_run: true,
            next_run: Some(next_run),
        }
    }
}

/// Trait for schedule types that can determine when cycles should run.
pub trait Schedule {
    /// Check if a cycle should run at `now` given when it last ran.
    fn check(
        &self,
        last_run: Option<DateTime<FixedOffset>>,
        now: DateTime<FixedOffset>,
    ) -> ScheduleCheck;

    /// Next execution strictly after `after`, or None if the schedule is unusable.
    fn next_execution(&self, after: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>>;
}

/// Types of campaign schedules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ScheduleType {
    /// Cron expression (7 fields: sec min hour day month weekday year)
    ///
    /// Example: "0 0 9 * * * *" = 9 AM daily
    Cron {
        /// Cron expression string
        expression: String,
    },

    /// Fixed interval in seconds, counted from the previous run
    Interval {
        /// Interval duration in seconds
        seconds: u64,
    },

    /// Every day at a wall-clock time
    Daily {
        /// Time of day as `HH:MM`
        at: String,
    },
}

/// Parses an `HH:MM` time of day.
///
/// # Errors
///
/// Returns a configuration error for anything else.
pub fn parse_time_of_day(value: &str) -> OutreachResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|e| {
        ConfigError::new(format!("Invalid schedule time '{}': {} (expected HH:MM)", value, e)).into()
    })
}

impl ScheduleType {
    /// Builds the schedule for a send time and a frequency in days.
    ///
    /// Every day becomes a daily cron at that time; longer frequencies become a
    /// fixed interval of that many days.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a malformed time or a zero frequency.
    ///
    /// # Examples
    ///
    /// ```
    /// use outreach_campaign::ScheduleType;
    ///
    /// let daily = ScheduleType::from_email_config("09:30", 1).unwrap();
    /// assert_eq!(daily, ScheduleType::Cron { expression: "0 30 9 * * * *".to_string() });
    ///
    /// let weekly = ScheduleType::from_email_config("09:30", 7).unwrap();
    /// assert_eq!(weekly, ScheduleType::Interval { seconds: 7 * 86_400 });
    /// ```
    pub fn from_email_config(schedule_time: &str, frequency_days: u32) -> OutreachResult<Self> {
        use chrono::Timelike;

        let time = parse_time_of_day(schedule_time)?;
        match frequency_days {
            0 => Err(ConfigError::new("schedule_frequency_days must be at least 1").into()),
            1 => Ok(ScheduleType::Cron {
                expression: format!("0 {} {} * * * *", time.minute(), time.hour()),
            }),
            days => Ok(ScheduleType::Interval {
                seconds: u64::from(days) * 86_400,
            }),
        }
    }

    /// Checks that the schedule can produce execution times.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a bad cron expression, a bad daily
    /// time or a zero interval.
    pub fn validate(&self) -> OutreachResult<()> {
        match self {
            ScheduleType::Cron { expression } => cron::Schedule::from_str(expression)
                .map(|_| ())
                .map_err(|e| {
                    ConfigError::new(format!("Invalid cron expression '{}': {}", expression, e))
                        .into()
                }),
            ScheduleType::Interval { seconds: 0 } => {
                Err(ConfigError::new("Schedule interval must be greater than zero").into())
            }
            ScheduleType::Interval { .. } => Ok(()),
            ScheduleType::Daily { at } => parse_time_of_day(at).map(|_| ()),
        }
    }
}

impl Schedule for ScheduleType {
    fn check(
        &self,
        last_run: Option<DateTime<FixedOffset>>,
        now: DateTime<FixedOffset>,
    ) -> ScheduleCheck {
        // Intervals start with a run; cron and daily wait for their first slot.
        if last_run.is_none() && matches!(self, ScheduleType::Interval { .. }) {
            return ScheduleCheck::new(true, self.next_execution(now));
        }
        match self.next_execution(last_run.unwrap_or(now)) {
            Some(next) if now >= next => ScheduleCheck::new(true, self.next_execution(now)),
            Some(next) => ScheduleCheck::wait_until(next),
            None => ScheduleCheck::new(false, None),
        }
    }

    fn next_execution(&self, after: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
        match self {
            ScheduleType::Interval { seconds } => {
                let seconds = i64::try_from(*seconds).ok()?;
                after.checked_add_signed(Duration::try_seconds(seconds)?)
            }
            ScheduleType::Cron { expression } => cron::Schedule::from_str(expression)
                .ok()?
                .after(&after)
                .next(),
            ScheduleType::Daily { at } => {
                let time = parse_time_of_day(at).ok()?;
                let today = after
                    .date_naive()
                    .and_time(time)
                    .and_local_timezone(*after.offset())
                    .single()?;
                if today > after {
                    Some(today)
                } else {
                    Some(today + Duration::days(1))
                }
            }
        }
    }
}

