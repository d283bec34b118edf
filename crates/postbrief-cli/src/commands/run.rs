//! `postbrief run` -- start the scheduler loop.
//!
//! Loads configuration, wires the collaborators, and runs ticks at the
//! configured interval until Ctrl-C. Steady-state failures are logged
//! and absorbed; only a configuration error exits.

use std::time::Duration;

use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::info;

use postbrief_core::Scheduler;

/// Arguments for the `postbrief run` subcommand.
#[derive(Args)]
pub struct RunArgs {}

pub async fn execute(_args: RunArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    let pipeline = super::build_pipeline(&config);
    let scheduler = Scheduler::new(Duration::from_secs(config.schedule.interval_secs));

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
            signal_cancel.cancel();
        }
    });

    scheduler.run(|| pipeline.run_once(), cancel).await;

    info!("stopped");
    Ok(())
}
