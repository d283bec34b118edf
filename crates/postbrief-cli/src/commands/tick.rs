//! `postbrief tick` -- run a single pipeline tick and exit.
//!
//! Useful for cron-style deployments and for verifying credentials
//! end to end. Unlike the scheduler loop, a tick failure here is
//! reported through the exit code.

use clap::Args;
use tracing::info;

/// Arguments for the `postbrief tick` subcommand.
#[derive(Args)]
pub struct TickArgs {}

pub async fn execute(_args: TickArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    let pipeline = super::build_pipeline(&config);

    let report = pipeline.run_once().await?;
    info!(
        fetched = report.fetched,
        processed = report.processed,
        failed = report.failed,
        "tick complete"
    );

    Ok(())
}
