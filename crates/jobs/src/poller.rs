//! Bounded, cancellable status polling for a submitted job.
//!
//! [`JobPoller::wait_for_artifact`] queries the job's status location at a
//! fixed interval until [`PollMachine`] reaches a terminal phase. Waiting
//! is a cooperative `tokio` sleep, so many jobs can be polled concurrently
//! without dedicating a thread to each. A [`CancellationToken`] stops the
//! loop between or during queries once the caller has gone away.

use std::time::Duration;

use mediagen_core::job::{JobHandle, JobState, PollMachine, PollPhase};
use mediagen_core::job::{MAX_POLL_ATTEMPTS, POLL_INTERVAL};
use tokio_util::sync::CancellationToken;

use crate::api::JobBackendError;
use crate::backend::JobBackend;

/// Polling cadence. The worst-case wait is `interval * (max_attempts - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Fixed delay between consecutive status queries.
    pub interval: Duration,
    /// Status queries allowed before giving up.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }
}

/// Terminal non-success outcomes of a poll loop.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// The status query itself failed. Not retried: a broken status
    /// endpoint does not recover by waiting.
    #[error("Status query for job {job_id} failed: {source}")]
    Query {
        job_id: String,
        #[source]
        source: JobBackendError,
    },

    /// The backend reported the job as failed or canceled.
    #[error("Job {job_id} finished with status: {state}")]
    JobFailed { job_id: String, state: JobState },

    /// The attempt budget ran out while the job was still running.
    #[error("Job {job_id} did not finish after {attempts} status checks")]
    TimedOut { job_id: String, attempts: u32 },

    /// The caller went away before the job finished.
    #[error("Polling of job {job_id} was cancelled")]
    Cancelled { job_id: String },
}

/// Drives a submitted job to a terminal state.
#[derive(Debug, Clone, Default)]
pub struct JobPoller {
    config: PollConfig,
}

impl JobPoller {
    pub fn new(config: PollConfig) -> Self {
        Self { config }
    }

    /// Poll `handle` until it yields its final artifact or fails.
    ///
    /// Returns the **last** artifact of the first succeeded snapshot that
    /// has any. No query is issued after `cancel` fires.
    pub async fn wait_for_artifact(
        &self,
        backend: &dyn JobBackend,
        handle: &JobHandle,
        cancel: &CancellationToken,
    ) -> Result<String, PollError> {
        let job_id = handle.id();
        let mut machine = PollMachine::new(self.config.max_attempts);

        loop {
            let query = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(job_id, &machine)),
                result = backend.fetch_status(handle) => result,
            };

            let snapshot = query.map_err(|source| {
                tracing::warn!(job_id, error = %source, "Job status query failed");
                PollError::Query {
                    job_id: job_id.to_string(),
                    source,
                }
            })?;

            tracing::debug!(
                job_id,
                attempt = machine.attempts() + 1,
                state = %snapshot.state(),
                artifacts = snapshot.artifacts().len(),
                "Polled job status",
            );

            match machine.observe(&snapshot).clone() {
                PollPhase::Succeeded { artifact } => {
                    tracing::info!(job_id, %artifact, "Job succeeded");
                    return Ok(artifact);
                }
                PollPhase::Failed { reported } => {
                    tracing::warn!(job_id, state = %reported, "Job ended without success");
                    return Err(PollError::JobFailed {
                        job_id: job_id.to_string(),
                        state: reported,
                    });
                }
                PollPhase::TimedOut => {
                    tracing::warn!(job_id, attempts = machine.attempts(), "Job polling timed out");
                    return Err(PollError::TimedOut {
                        job_id: job_id.to_string(),
                        attempts: machine.attempts(),
                    });
                }
                PollPhase::Pending | PollPhase::Polling => {}
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(job_id, &machine)),
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }
    }
}

fn cancelled(job_id: &str, machine: &PollMachine) -> PollError {
    tracing::info!(job_id, attempts = machine.attempts(), "Job polling cancelled");
    PollError::Cancelled {
        job_id: job_id.to_string(),
    }
}
