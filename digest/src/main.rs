//! Daily Job Digest
//!
//! Searches each configured role on Google Jobs, keeps today's postings and
//! emails a summary. Meant to be started once a day by cron or CI.

use anyhow::{Context, Result};
use job_digest::{
    Config, LogMailer, Mailer, Notifier, Orchestrator, ResendClient, RunOutcome, SerpApiClient,
};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,job_digest=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    ExitCode::from(exit_status(run()))
}

/// Logs a fatal error and maps the run result to the process status.
fn exit_status(result: Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("Job digest failed: {:#}", e);
            1
        }
    }
}

fn run() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(roles = config.roles.len(), dry_run = config.dry_run, "Configuration loaded");

    let search = SerpApiClient::new(config.serpapi_api_key.clone(), config.http_timeout)
        .context("Failed to create SerpApi client")?;

    if config.dry_run {
        digest_with(&config, &search, LogMailer)
    } else {
        let mailer = ResendClient::new(config.resend_api_key.clone(), config.http_timeout)
            .context("Failed to create Resend client")?;
        digest_with(&config, &search, mailer)
    }
}

fn digest_with<M: Mailer>(config: &Config, search: &SerpApiClient, mailer: M) -> Result<()> {
    let notifier = Notifier::new(mailer, config.email_from.clone(), config.email_to.clone());

    match Orchestrator::new(search, &notifier).run(&config.roles)? {
        RunOutcome::Sent { sections } => {
            tracing::info!(sections = sections.len(), "Job digest complete, report sent");
        }
        RunOutcome::NothingToReport => {
            tracing::info!("Job digest complete, nothing new today");
        }
    }
    Ok(())
}
