//! `scout search`: run one scouting session in the terminal.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, ValueEnum};
use scout_client::ScoutClient;
use scout_core::{AppConfig, Location};
use scout_session::{FailureKind, SearchSession, SubmitOutcome, PROFILE_INCOMPLETE_MESSAGE};

use crate::profile::{build_profile_store, ProfileArgs};
use crate::render::{self, TerminalTrace};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Html,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Job title or keywords (e.g. "Lead Product Engineer")
    #[arg(long)]
    pub query: String,

    /// Region: Remote, USA, Europe, Asia, Worldwide or Hybrid
    #[arg(long, default_value = "Remote")]
    pub location: Location,

    /// Report output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Write the report to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Resubmit this many times after a rate limit, waiting out each cooldown
    #[arg(long, default_value_t = 0)]
    pub rate_limit_retries: u32,

    #[command(flatten)]
    pub profile: ProfileArgs,
}

pub(crate) async fn run_search(config: &AppConfig, args: &SearchArgs) -> anyhow::Result<()> {
    let client = ScoutClient::from_config(config)?;
    let store = build_profile_store(&args.profile)?;

    let mut session = SearchSession::new(client, store)
        .with_rate_limit_cooldown(config.rate_limit_cooldown_secs)
        .with_observer(Box::new(TerminalTrace));

    if !session.continue_to_search() {
        let missing: Vec<String> = session
            .profile()
            .profile()
            .missing_fields()
            .iter()
            .map(ToString::to_string)
            .collect();
        anyhow::bail!("{PROFILE_INCOMPLETE_MESSAGE} Missing: {}", missing.join(", "));
    }

    session.set_query(args.query.as_str());
    session.set_location(args.location);

    let mut retries_left = args.rate_limit_retries;
    loop {
        match session.submit().await {
            SubmitOutcome::Completed { .. } => break,
            SubmitOutcome::Failed(failure)
                if failure.kind == FailureKind::RateLimit && retries_left > 0 =>
            {
                retries_left -= 1;
                tracing::info!(retries_left, "waiting out rate-limit cooldown");
                wait_out_cooldown(&session).await;
            }
            SubmitOutcome::CoolingDown { .. } => wait_out_cooldown(&session).await,
            SubmitOutcome::Failed(failure) => anyhow::bail!("{}", failure.message),
            SubmitOutcome::ProfileIncomplete => anyhow::bail!(PROFILE_INCOMPLETE_MESSAGE),
        }
    }

    let Some(report) = session.report() else {
        println!("Search finished without a report.");
        return Ok(());
    };

    let now = chrono::Utc::now();
    let rendered = match args.format {
        ReportFormat::Text => render::report_text(report, now),
        ReportFormat::Html => render::report_html(report, now),
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            eprintln!("Report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Show the "Wait (Ns)" countdown until the cooldown reaches zero.
async fn wait_out_cooldown(session: &SearchSession) {
    let mut remaining = session.cooldown().subscribe();
    loop {
        if *remaining.borrow_and_update() == 0 {
            break;
        }
        eprint!("\r{}   ", session.submit_label());
        if remaining.changed().await.is_err() {
            break;
        }
    }
    eprintln!();
}
