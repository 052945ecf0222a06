//! Job status model and the bounded polling state machine.
//!
//! A generation job is identified by a [`JobHandle`] and observed through a
//! series of [`JobStatusSnapshot`]s. [`PollMachine`] folds those snapshots
//! into a [`PollPhase`], deciding when the job is done, when it has failed,
//! and when the attempt budget is exhausted. The async loop that actually
//! queries the backend lives in `mediagen-jobs`.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Polling defaults
// ---------------------------------------------------------------------------

/// Hard ceiling on status queries for a single job.
pub const MAX_POLL_ATTEMPTS: u32 = 60;
/// Fixed delay between two consecutive status queries.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Job handle
// ---------------------------------------------------------------------------

/// Identifies a submitted asynchronous generation job.
///
/// Both fields are assigned by the backend at submission and never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    id: String,
    status_location: String,
}

impl JobHandle {
    pub fn new(id: impl Into<String>, status_location: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status_location: status_location.into(),
        }
    }

    /// Opaque backend-assigned job id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// URI used for every status query of this job.
    pub fn status_location(&self) -> &str {
        &self.status_location
    }
}

// ---------------------------------------------------------------------------
// Job state
// ---------------------------------------------------------------------------

/// Backend-reported progress of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Queued,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl JobState {
    /// Map a backend status string onto a [`JobState`].
    ///
    /// `starting` is the backend's name for a queued job. Returns `None`
    /// for strings the backend is not known to emit.
    pub fn from_backend_status(status: &str) -> Option<Self> {
        match status {
            "starting" | "queued" => Some(Self::Queued),
            "processing" => Some(Self::Processing),
            "succeeded" => Some(Self::Succeeded),
            "failed" => Some(Self::Failed),
            "canceled" | "cancelled" => Some(Self::Canceled),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
        }
    }

    /// Whether the backend will report no further progress for this job.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Status snapshot
// ---------------------------------------------------------------------------

/// One polled observation of job progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatusSnapshot {
    state: JobState,
    artifacts: Vec<String>,
}

impl JobStatusSnapshot {
    /// Build a snapshot. Artifacts are only kept for a succeeded job.
    pub fn new(state: JobState, artifacts: Vec<String>) -> Self {
        let artifacts = if state == JobState::Succeeded {
            artifacts
        } else {
            Vec::new()
        };
        Self { state, artifacts }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn artifacts(&self) -> &[String] {
        &self.artifacts
    }

    /// The canonical result of a finished job: the **last** artifact.
    ///
    /// Backends may append intermediate previews ahead of the final render,
    /// so the tail of the list wins. `None` until the job has succeeded
    /// with at least one artifact.
    pub fn final_artifact(&self) -> Option<&str> {
        if self.state != JobState::Succeeded {
            return None;
        }
        self.artifacts.last().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Poll state machine
// ---------------------------------------------------------------------------

/// Phase of the polling state machine.
///
/// `Succeeded`, `Failed` and `TimedOut` are terminal: once reached, further
/// observations are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollPhase {
    Pending,
    Polling,
    Succeeded { artifact: String },
    Failed { reported: JobState },
    TimedOut,
}

impl PollPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded { .. } | Self::Failed { .. } | Self::TimedOut
        )
    }
}

/// Folds status snapshots into a [`PollPhase`] under a fixed attempt budget.
#[derive(Debug, Clone)]
pub struct PollMachine {
    phase: PollPhase,
    attempts: u32,
    max_attempts: u32,
}

impl PollMachine {
    /// `max_attempts` is clamped to at least one query.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            phase: PollPhase::Pending,
            attempts: 0,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn phase(&self) -> &PollPhase {
        &self.phase
    }

    /// Number of observations that left the job non-terminal.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Record one snapshot and return the resulting phase.
    ///
    /// - succeeded with artifacts -> `Succeeded` with the last artifact
    /// - failed / canceled -> `Failed`
    /// - anything else (including succeeded with no artifacts yet) counts
    ///   one attempt; reaching the ceiling -> `TimedOut`, else `Polling`
    pub fn observe(&mut self, snapshot: &JobStatusSnapshot) -> &PollPhase {
        if self.phase.is_terminal() {
            return &self.phase;
        }

        self.phase = match snapshot.state() {
            JobState::Failed | JobState::Canceled => PollPhase::Failed {
                reported: snapshot.state(),
            },
            _ => match snapshot.final_artifact() {
                Some(artifact) => PollPhase::Succeeded {
                    artifact: artifact.to_string(),
                },
                None => {
                    self.attempts += 1;
                    if self.attempts >= self.max_attempts {
                        PollPhase::TimedOut
                    } else {
                        PollPhase::Polling
                    }
                }
            },
        };

        &self.phase
    }
}

impl Default for PollMachine {
    fn default() -> Self {
        Self::new(MAX_POLL_ATTEMPTS)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
