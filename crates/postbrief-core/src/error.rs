//! Pipeline error types.

use std::fmt;

use thiserror::Error;

/// The pipeline step a failure originated from, for log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    Fetch,
    Summarize,
    Persist,
    Notify,
    Cleanup,
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStep::Fetch => "fetch",
            PipelineStep::Summarize => "summarize",
            PipelineStep::Persist => "persist",
            PipelineStep::Notify => "notify",
            PipelineStep::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// A failure escalated from one pipeline step, after retries.
#[derive(Error, Debug)]
#[error("{step} failed: {source}")]
pub struct StepError {
    /// The originating step.
    pub step: PipelineStep,
    /// The collaborator's final error.
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl StepError {
    /// Wrap a collaborator error with its originating step.
    pub fn new(
        step: PipelineStep,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            step,
            source: Box::new(source),
        }
    }
}
