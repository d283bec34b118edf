//! The fixed-interval scheduler loop.
//!
//! Runs a supplied unit of work, waits the configured interval, and
//! repeats. Ticks are strictly sequential: the wait starts only after the
//! work and its failure handling complete, so there is no overlap and no
//! queueing of missed ticks. Tick failures are logged and absorbed; only
//! cancellation stops the loop.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use postbrief_types::TickReport;

use crate::error::StepError;

/// Drives the unit of work on a fixed interval.
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    /// Create a scheduler with the given inter-tick interval.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Run the loop until the token is cancelled.
    ///
    /// The first tick starts immediately. Cancellation during a tick
    /// aborts it at the next suspension point; no rollback of completed
    /// steps is attempted.
    pub async fn run<F, Fut>(&self, mut work: F, cancel: CancellationToken)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<TickReport, StepError>>,
    {
        info!(interval_secs = self.interval.as_secs(), "scheduler started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("scheduler shutting down");
                    return;
                }
                result = work() => match result {
                    Ok(report) => info!(
                        fetched = report.fetched,
                        processed = report.processed,
                        failed = report.failed,
                        "tick complete"
                    ),
                    Err(err) => error!(error = %err, "tick failed"),
                },
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("scheduler shutting down");
                    return;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineStep;
    use postbrief_types::ConnectorError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn runs_ticks_until_cancelled() {
        let ticks = Arc::new(AtomicU32::new(0));
        let ticks_clone = ticks.clone();

        let scheduler = Scheduler::new(Duration::from_millis(10));
        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();

        let handle = tokio::spawn(async move {
            scheduler
                .run(
                    move || {
                        ticks_clone.fetch_add(1, Ordering::SeqCst);
                        std::future::ready(Ok(TickReport::default()))
                    },
                    cancel_clone,
                )
                .await;
        });

        tokio::time::sleep(Duration::from_millis(55)).await;
        cancel.cancel();
        handle.await.unwrap();

        // First tick fires immediately, then roughly every 10ms.
        assert!(ticks.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn tick_failures_do_not_stop_the_loop() {
        let ticks = Arc::new(AtomicU32::new(0));
        let ticks_clone = ticks.clone();

        let scheduler = Scheduler::new(Duration::from_millis(5));
        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();

        let handle = tokio::spawn(async move {
            scheduler
                .run(
                    move || {
                        ticks_clone.fetch_add(1, Ordering::SeqCst);
                        std::future::ready(Err(StepError::new(
                            PipelineStep::Fetch,
                            ConnectorError::ConnectionFailed("down".into()),
                        )))
                    },
                    cancel_clone,
                )
                .await;
        });

        tokio::time::sleep(Duration::from_millis(30)).await;
        cancel.cancel();
        handle.await.unwrap();

        assert!(ticks.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn cancellation_aborts_a_tick_in_progress() {
        let scheduler = Scheduler::new(Duration::from_millis(5));
        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();

        let handle = tokio::spawn(async move {
            scheduler
                .run(
                    || async {
                        // A tick that would outlive the test by far.
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                        Ok(TickReport::default())
                    },
                    cancel_clone,
                )
                .await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        // Must return promptly, not after the hour-long tick.
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("scheduler did not stop on cancellation")
            .unwrap();
    }

    #[tokio::test]
    async fn ticks_are_sequential() {
        // A slow tick must delay the next one; with a 10ms tick body and
        // a 10ms interval, 35ms admits at most two completed starts.
        let ticks = Arc::new(AtomicU32::new(0));
        let ticks_clone = ticks.clone();

        let scheduler = Scheduler::new(Duration::from_millis(10));
        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();

        let handle = tokio::spawn(async move {
            scheduler
                .run(
                    move || {
                        ticks_clone.fetch_add(1, Ordering::SeqCst);
                        async {
                            tokio::time::sleep(Duration::from_millis(10)).await;
                            Ok(TickReport::default())
                        }
                    },
                    cancel_clone,
                )
                .await;
        });

        tokio::time::sleep(Duration::from_millis(35)).await;
        cancel.cancel();
        handle.await.unwrap();

        assert!(ticks.load(Ordering::SeqCst) <= 3);
    }
}
