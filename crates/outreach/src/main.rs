//! The `outreach` command-line tool.

use clap::Parser;
use outreach::{Cli, Commands, OutreachConfig, Workflow, init_tracing};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = OutreachConfig::load(cli.config.as_deref())?;
    let workflow = Arc::new(Workflow::new(config)?);
    let report_id = workflow.report_id_or_today(cli.command.date())?;

    match cli.command {
        Commands::Download { .. } => {
            let path = workflow.download(&report_id).await?;
            println!("Snapshot saved to {}", path.display());
        }
        Commands::Send { .. } => {
            let summary = workflow.send(&report_id).await?;
            println!("{}", summary);
        }
        Commands::Verify { .. } => {
            let summary = workflow.verify(&report_id).await?;
            println!("{}", summary);
        }
        Commands::Report { skip_download, .. } => {
            let report = workflow.report(&report_id, skip_download).await?;
            println!(
                "Report {} written to {} ({} leads)",
                report.report_id(),
                report.path().display(),
                report.lead_count()
            );
        }
        Commands::Schedule => {
            info!("Starting campaign scheduler");
            workflow
                .schedule(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        error!(error = %e, "Failed to listen for Ctrl-C");
                    }
                })
                .await?;
            info!("Campaign scheduler stopped");
        }
    }
    Ok(())
}
