//! Job record and state machine.
//!
//! A [`Job`] holds the observable state of one download. It is mutated by the
//! single runner bound to it and read concurrently by status polls. All
//! access goes through an `RwLock`; callers only ever see cloned
//! [`JobSnapshot`]s, so a reader observes a record either before or after
//! an update, never halfway through one.
//!
//! Phases move `preparing -> downloading <-> converting` and end in exactly
//! one of `completed` or `failed`. Once finished, every mutation is a no-op.

use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interpreter::LineEffect;
use crate::mode::DownloadMode;

/// `conversionPct` value meaning "conversion progress not yet quantifiable".
pub const CONVERSION_INDETERMINATE: f64 = -1.0;

// ============================================================================
// Identifier
// ============================================================================

/// Opaque job identifier: 128 random bits, lowercase hex.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Generate a fresh identifier from the thread-local CSPRNG.
    pub fn generate() -> Self {
        Self(format!("{:032x}", rand::random::<u128>()))
    }

    /// The identifier as sent over the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::borrow::Borrow<str> for JobId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Phase
// ============================================================================

/// Coarse stage of a job, shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobPhase {
    /// Submitted, no recognized output yet.
    Preparing,
    /// Download percentages are arriving.
    Downloading,
    /// Merging or converting streams.
    Converting,
    /// Downloader exited successfully.
    Completed,
    /// Launch failed, downloader exited abnormally, or the run timed out.
    Failed,
}

impl JobPhase {
    /// `true` for `Completed` and `Failed`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Lowercase name, as serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preparing => "preparing",
            Self::Downloading => "downloading",
            Self::Converting => "converting",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Point-in-time copy of a job, as returned by status polls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSnapshot {
    pub id: JobId,
    pub mode: DownloadMode,
    pub status: JobPhase,
    /// 0 to 100.
    pub download_pct: f64,
    /// [`CONVERSION_INDETERMINATE`] or 0 to 100.
    pub conversion_pct: f64,
    /// Latest line surfaced to the user.
    pub message: String,
    /// Full transcript, oldest first.
    pub log: Vec<String>,
    /// Set only when the job failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub finished: bool,
    pub started_at: DateTime<Utc>,
    /// Set exactly when `finished` is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobSnapshot {
    fn new(id: JobId, mode: DownloadMode) -> Self {
        Self {
            id,
            mode,
            status: JobPhase::Preparing,
            download_pct: 0.0,
            conversion_pct: CONVERSION_INDETERMINATE,
            message: String::new(),
            log: Vec::new(),
            error: None,
            finished: false,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    fn push_line(&mut self, line: String) {
        self.message.clone_from(&line);
        self.log.push(line);
    }

    fn finish(&mut self, phase: JobPhase) {
        self.status = phase;
        self.finished = true;
        self.completed_at = Some(Utc::now());
    }
}

// ============================================================================
// Job
// ============================================================================

/// One download operation and its synchronized state.
#[derive(Debug)]
pub struct Job {
    id: JobId,
    mode: DownloadMode,
    state: RwLock<JobSnapshot>,
}

impl Job {
    /// Create a job in the `preparing` phase.
    pub fn new(id: JobId, mode: DownloadMode) -> Self {
        Self {
            state: RwLock::new(JobSnapshot::new(id.clone(), mode)),
            id,
            mode,
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub const fn mode(&self) -> DownloadMode {
        self.mode
    }

    /// Consistent copy of the current state.
    pub fn snapshot(&self) -> JobSnapshot {
        self.read().clone()
    }

    pub fn phase(&self) -> JobPhase {
        self.read().status
    }

    /// Append a transcript line and make it the current message.
    ///
    /// Returns `false` if the job already finished.
    pub fn append_log(&self, line: impl Into<String>) -> bool {
        let line = line.into();
        self.update(|state| state.push_line(line))
    }

    /// Apply the effect of an interpreted output line.
    ///
    /// Download progress enters (or stays in) `downloading`; conversion
    /// activity enters (or stays in) `converting` and turns an indeterminate
    /// conversion percentage into 0. The two may interleave freely.
    pub fn apply(&self, effect: LineEffect) -> bool {
        self.update(|state| match effect {
            LineEffect::DownloadProgress(pct) => {
                state.status = JobPhase::Downloading;
                state.download_pct = pct.clamp(0.0, 100.0);
            }
            LineEffect::Converting => {
                state.status = JobPhase::Converting;
                if state.conversion_pct < 0.0 {
                    state.conversion_pct = 0.0;
                }
            }
        })
    }

    /// Terminal success: both percentages are forced to 100.
    pub fn complete(&self) -> bool {
        self.update(|state| {
            state.download_pct = 100.0;
            state.conversion_pct = 100.0;
            state.finish(JobPhase::Completed);
        })
    }

    /// Terminal failure: the error goes to the transcript, the message and
    /// the `error` field. An empty error text leaves `error` unset.
    pub fn fail(&self, error: impl fmt::Display) -> bool {
        let text = error.to_string();
        self.update(|state| {
            state.push_line(format!("error: {text}"));
            state.message.clone_from(&text);
            state.error = Some(text).filter(|text| !text.is_empty());
            state.finish(JobPhase::Failed);
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, JobSnapshot> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `mutate` under the write lock unless the job already finished.
    fn update(&self, mutate: impl FnOnce(&mut JobSnapshot)) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.finished {
            return false;
        }
        mutate(&mut state);
        true
    }
}
