//! Command-line interface.

use crate::LogFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Email outreach campaigns and lead status reports.
#[derive(Debug, Parser)]
#[command(name = "outreach", version, about)]
pub struct Cli {
    /// Configuration file (defaults to outreach.toml)
    #[arg(long, global = true, env = "OUTREACH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
///
/// `DATE` is a report identifier in `DDMMYYYY` form, defaulting to today in
/// the reference timezone.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Snapshot the lead spreadsheet
    Download {
        /// Report date (DDMMYYYY)
        date: Option<String>,
    },
    /// Download the leads, then send the day's template to each of them
    Send {
        /// Report date (DDMMYYYY)
        date: Option<String>,
    },
    /// Download the leads, then count delivered and bounced messages
    Verify {
        /// Report date (DDMMYYYY)
        date: Option<String>,
    },
    /// Generate the lead status report
    Report {
        /// Report date (DDMMYYYY)
        date: Option<String>,
        /// Use the existing snapshot instead of downloading
        #[arg(long)]
        skip_download: bool,
    },
    /// Run send-then-verify cycles on the configured schedule until Ctrl-C
    Schedule,
}

impl Commands {
    /// The date argument, if the command takes one and it was given.
    pub fn date(&self) -> Option<&str> {
        match self {
            Commands::Download { date }
            | Commands::Send { date }
            | Commands::Verify { date }
            | Commands::Report { date, .. } => date.as_deref(),
            Commands::Schedule => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_report_flags() {
        let cli = Cli::try_parse_from([
            "outreach",
            "--log-format",
            "json",
            "report",
            "15012025",
            "--skip-download",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.command.date(), Some("15012025"));
        assert!(matches!(
            cli.command,
            Commands::Report {
                skip_download: true,
                ..
            }
        ));
    }

    #[test]
    fn test_date_is_optional() {
        let cli = Cli::try_parse_from(["outreach", "send"]).unwrap();
        assert_eq!(cli.command.date(), None);
        assert_eq!(cli.log_format, LogFormat::Plain);

        let cli = Cli::try_parse_from(["outreach", "schedule", "--config", "alt.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
    }

    #[test]
    fn test_unknown_log_format_is_rejected() {
        assert!(Cli::try_parse_from(["outreach", "--log-format", "xml", "verify"]).is_err());
    }
}
