//! Layered configuration.
//!
//! Sources, later ones win:
//!
//! 1. Built-in defaults
//! 2. `outreach.toml` (or the `--config` path), falling back to
//!    `<config_dir>/outreach/outreach.toml`
//! 3. `OUTREACH__<SECTION>__<KEY>` environment variables

use chrono::FixedOffset;
use derive_getters::Getters;
use outreach_campaign::{DEFAULT_SUBJECT, DEFAULT_TEMPLATE_DIR, ScheduleType, SendSettings};
use outreach_core::{DEFAULT_WINDOW_HOURS, LeadColumns};
use outreach_error::{ConfigError, OutreachResult};
use outreach_google::{DEFAULT_MAX_EXCERPT_CHARS, GoogleConfig};
use outreach_models::ServerConfig;
use outreach_report::{
    DEFAULT_MAX_TOKENS, DEFAULT_OUTPUT_DIR, DEFAULT_SNAPSHOT_DIR, DEFAULT_SNAPSHOT_PREFIX,
    DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE, DEFAULT_UTC_OFFSET_MINUTES,
    DEFAULT_WORDS_PER_LINE, ReportSettings, SummarizerConfig,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "outreach.toml";
/// Environment variable prefix.
pub const ENV_PREFIX: &str = "OUTREACH";

/// Largest accepted UTC offset, in minutes.
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Text-generation backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct ModelSection {
    /// API root of the OpenAI-compatible server
    base_url: String,
    /// Model identifier the server serves
    model: String,
    /// Optional bearer token
    api_key: Option<String>,
    /// Request timeout in seconds
    timeout_secs: u64,
    /// Sampling temperature
    temperature: f32,
    /// Output token cap per summary
    max_tokens: u32,
    /// System prompt for summaries
    system_prompt: String,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/v1".to_string(),
            model: String::new(),
            api_key: None,
            timeout_secs: 300,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Lead spreadsheet and snapshot settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct LeadsSection {
    /// Google spreadsheet holding the leads
    spreadsheet_id: String,
    /// Directory for dated snapshots
    snapshot_dir: PathBuf,
    /// Snapshot file name prefix
    snapshot_prefix: String,
    /// Send timestamp column
    col_sent_at: String,
    /// Verification timestamp column
    col_verified_at: String,
    /// Bounce reason column
    col_bounce_reason: String,
    /// Sent message reference column
    col_gmail_msg_id: String,
    /// Recipient address column
    email_column: String,
}

impl Default for LeadsSection {
    fn default() -> Self {
        let columns = LeadColumns::default();
        Self {
            spreadsheet_id: String::new(),
            snapshot_dir: PathBuf::from(DEFAULT_SNAPSHOT_DIR),
            snapshot_prefix: DEFAULT_SNAPSHOT_PREFIX.to_string(),
            col_sent_at: columns.sent_at().clone(),
            col_verified_at: columns.verified_at().clone(),
            col_bounce_reason: columns.bounce_reason().clone(),
            col_gmail_msg_id: columns.gmail_msg_id().clone(),
            email_column: columns.email().clone(),
        }
    }
}

/// Report pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct ReportSection {
    /// Directory reports are written to
    output_dir: PathBuf,
    /// Words per summary line
    words_per_line: usize,
    /// Trailing window length in hours
    window_hours: u32,
    /// Reference timezone, minutes east of UTC
    utc_offset_minutes: i32,
    /// Add sent-message excerpts to prompts
    enable_gmail_pull: bool,
    /// Excerpt budget in characters
    max_excerpt_chars: usize,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            words_per_line: DEFAULT_WORDS_PER_LINE,
            window_hours: DEFAULT_WINDOW_HOURS,
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            enable_gmail_pull: false,
            max_excerpt_chars: DEFAULT_MAX_EXCERPT_CHARS,
        }
    }
}

/// Google credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct GoogleSection {
    /// Authorized-user token file
    token_path: PathBuf,
    /// Access token overriding the token file
    access_token: Option<String>,
}

impl Default for GoogleSection {
    fn default() -> Self {
        Self {
            token_path: PathBuf::from("token.json"),
            access_token: None,
        }
    }
}

/// Email campaign settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct EmailSection {
    /// Directory holding `email_<id>.txt` templates
    template_dir: PathBuf,
    /// Subject for templates without a subject line
    default_subject: String,
    /// Sender address; read from the Gmail profile when unset
    sender_email: Option<String>,
    /// Run the campaign scheduler
    schedule_enabled: bool,
    /// Send time as `HH:MM` in the reference timezone
    schedule_time: String,
    /// Days between sends
    schedule_frequency_days: u32,
    /// Hours between sending and verifying
    verification_hours: u64,
}

impl Default for EmailSection {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            default_subject: DEFAULT_SUBJECT.to_string(),
            sender_email: None,
            schedule_enabled: false,
            schedule_time: "09:00".to_string(),
            schedule_frequency_days: 1,
            verification_hours: 12,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct OutreachConfig {
    /// Text-generation backend
    model: ModelSection,
    /// Lead spreadsheet and snapshots
    leads: LeadsSection,
    /// Report pipeline
    report: ReportSection,
    /// Google credentials
    google: GoogleSection,
    /// Email campaign
    email: EmailSection,
}

fn config_error(e: config::ConfigError) -> ConfigError {
    ConfigError::new(format!("Failed to load configuration: {}", e))
}

impl OutreachConfig {
    /// Loads configuration from defaults, a TOML file and the environment.
    ///
    /// An explicit `path` must exist. Without one, `outreach.toml` in the
    /// working directory is used, then the per-user config directory.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a source cannot be read or parsed,
    /// or when the result fails validation.
    #[instrument]
    pub fn load(path: Option<&Path>) -> OutreachResult<Self> {
        let mut builder = config::Config::builder();
        match path {
            Some(path) => {
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                if let Some(path) = default_config_path() {
                    debug!(path = %path.display(), "Using configuration file");
                    builder = builder.add_source(config::File::from(path).required(false));
                }
            }
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_error)?;
        let config: OutreachConfig = settings.try_deserialize().map_err(config_error)?;
        config.validate()?;
        info!(model = %config.model.model, "Configuration loaded");
        Ok(config)
    }

    /// Parses configuration from TOML text without consulting the environment.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid TOML or invalid values.
    pub fn from_toml_str(toml: &str) -> OutreachResult<Self> {
        let config: OutreachConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(config_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that would otherwise fail a run midway.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first invalid value.
    pub fn validate(&self) -> OutreachResult<()> {
        if self.report.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ConfigError::new(format!(
                "report.utc_offset_minutes must be within ±{}, got {}",
                MAX_OFFSET_MINUTES, self.report.utc_offset_minutes
            ))
            .into());
        }
        self.report_settings().validate()?;
        if self.email.schedule_enabled {
            self.schedule()?.validate()?;
        }
        Ok(())
    }

    /// Checks that a model is configured. Only report runs need one.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `model.model` is empty.
    pub fn require_model(&self) -> OutreachResult<()> {
        if self.model.model.trim().is_empty() {
            return Err(ConfigError::new(
                "model.model is not set (OUTREACH__MODEL__MODEL)",
            )
            .into());
        }
        Ok(())
    }

    /// Checks that a spreadsheet is configured.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `leads.spreadsheet_id` is empty.
    pub fn require_spreadsheet(&self) -> OutreachResult<()> {
        if self.leads.spreadsheet_id.trim().is_empty() {
            return Err(ConfigError::new(
                "leads.spreadsheet_id is not set (OUTREACH__LEADS__SPREADSHEET_ID)",
            )
            .into());
        }
        Ok(())
    }

    /// The reference timezone.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an out-of-range offset.
    pub fn zone(&self) -> OutreachResult<FixedOffset> {
        self.report_settings().zone()
    }

    /// Lead column names.
    pub fn lead_columns(&self) -> LeadColumns {
        LeadColumns::builder()
            .sent_at(self.leads.col_sent_at.clone())
            .verified_at(self.leads.col_verified_at.clone())
            .bounce_reason(self.leads.col_bounce_reason.clone())
            .gmail_msg_id(self.leads.col_gmail_msg_id.clone())
            .email(self.leads.email_column.clone())
            .build()
            .unwrap_or_default()
    }

    /// Connection settings for the model server.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the model is not set.
    pub fn server_config(&self) -> OutreachResult<ServerConfig> {
        self.require_model()?;
        ServerConfig::builder()
            .base_url(self.model.base_url.clone())
            .model(self.model.model.clone())
            .api_key(self.model.api_key.clone())
            .timeout_secs(self.model.timeout_secs)
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid model settings: {}", e)).into())
    }

    /// Report pipeline settings.
    pub fn report_settings(&self) -> ReportSettings {
        let summarizer = SummarizerConfig::builder()
            .system_prompt(self.model.system_prompt.clone())
            .temperature(self.model.temperature)
            .max_tokens(self.model.max_tokens)
            .build()
            .unwrap_or_default();
        ReportSettings::builder()
            .columns(self.lead_columns())
            .utc_offset_minutes(self.report.utc_offset_minutes)
            .window_hours(self.report.window_hours)
            .words_per_line(self.report.words_per_line)
            .enable_excerpts(self.report.enable_gmail_pull)
            .summarizer(summarizer)
            .build()
            .unwrap_or_default()
    }

    /// Google API settings.
    pub fn google_config(&self) -> GoogleConfig {
        let mut builder = GoogleConfig::builder();
        builder.token_path(self.google.token_path.clone());
        if let Some(token) = &self.google.access_token {
            builder.access_token(token.clone());
        }
        builder.build().unwrap_or_default()
    }

    /// Send flow settings.
    pub fn send_settings(&self) -> SendSettings {
        let mut builder = SendSettings::builder();
        builder
            .template_dir(self.email.template_dir.clone())
            .default_subject(self.email.default_subject.clone())
            .email_column(self.leads.email_column.clone());
        if let Some(sender) = &self.email.sender_email {
            builder.sender_email(sender.clone());
        }
        builder.build().unwrap_or_default()
    }

    /// The campaign schedule.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a malformed time or zero frequency.
    pub fn schedule(&self) -> OutreachResult<ScheduleType> {
        ScheduleType::from_email_config(&self.email.schedule_time, self.email.schedule_frequency_days)
    }

    /// Time between sending and verifying in a scheduled cycle.
    pub fn verification_delay(&self) -> Duration {
        Duration::from_secs(self.email.verification_hours.saturating_mul(3600))
    }
}

/// `outreach.toml` in the working directory, else the per-user config file.
fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("outreach").join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}
